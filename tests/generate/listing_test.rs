// tests/generate/listing_test.rs

#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{entity, licensing_entities};
    use insta::assert_snapshot;
    use scaffold::config::Settings;
    use scaffold::generate::listing::{self, FIELD, INCLUDE_COUNTS, VALUE};
    use scaffold::generate::{Artifact, ArtifactKind, EntityContext};
    use scaffold::sql::validate::validate_sql;
    use scaffold::sql::Dialect;
    use serde_json::{json, Value};

    fn list_values(name: &str, settings: &Settings) -> Artifact {
        let entities = licensing_entities(settings);
        let ctx = EntityContext::new(entity(&entities, name), settings);
        listing::build(&ctx).unwrap()
    }

    #[test]
    fn test_parameters() {
        let artifact = list_values("licenses", &Settings::default());
        assert_eq!(artifact.name, "list_licenses_values");
        assert_eq!(artifact.kind, ArtifactKind::Listing);
        assert_eq!(artifact.parameter_names(), vec![FIELD, INCLUDE_COUNTS]);

        let field = artifact.parameter(FIELD).unwrap();
        assert_eq!(field.default, Some(json!("bl_status_en")));
        assert_eq!(
            field.enum_values.clone().unwrap(),
            vec![json!("bl_status_en"), json!("license_type")]
        );
        assert_eq!(
            artifact.parameter(INCLUDE_COUNTS).unwrap().default,
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_owner_type_listing() {
        let artifact = list_values("owners", &Settings::default());
        assert_snapshot!(artifact.sql, @r###"
        SELECT
          CASE WHEN $field = 'owner_type' THEN "owner_type" ELSE "owner_type" END AS "value",
          CASE WHEN $includeCounts THEN COUNT(*) ELSE NULL END AS "count"
        FROM "dim_owners"
        WHERE CASE WHEN $field = 'owner_type' THEN "owner_type" ELSE "owner_type" END IS NOT NULL
        GROUP BY CASE WHEN $field = 'owner_type' THEN "owner_type" ELSE "owner_type" END
        ORDER BY COUNT(*) DESC, "value" ASC
        "###);
    }

    #[test]
    fn test_return_shape() {
        let artifact = list_values("licenses", &Settings::default());
        assert!(artifact.returns.property(VALUE).is_some());
        assert!(artifact.returns.property("count").is_some());
        assert_eq!(artifact.returns.properties.len(), 2);
    }

    #[test]
    fn test_parses_in_both_dialects() {
        for dialect in [Dialect::DuckDb, Dialect::Postgres] {
            let mut settings = Settings::default();
            settings.generation.dialect = dialect;
            for name in ["licenses", "owners"] {
                let artifact = list_values(name, &settings);
                assert!(artifact.undeclared_placeholders().is_empty());
                assert!(artifact.unused_parameters().is_empty());
                validate_sql(&artifact.sql, dialect).unwrap();
            }
        }
    }
}

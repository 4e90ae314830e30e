// tests/generate/aggregate_test.rs

#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{entity, licensing_entities};
    use scaffold::config::Settings;
    use scaffold::generate::aggregate::{self, groupable_columns, TOTAL_COUNT, UNIQUE_COUNT};
    use scaffold::generate::{Artifact, ArtifactKind, EntityContext, JsonType};
    use scaffold::model::{ColumnModel, ModelGraph, TableModel};
    use scaffold::semantic::assemble;
    use scaffold::sql::validate::validate_sql;
    use scaffold::sql::Dialect;
    use serde_json::json;

    fn aggregate_licenses(settings: &Settings) -> Artifact {
        let entities = licensing_entities(settings);
        let ctx = EntityContext::new(entity(&entities, "licenses"), settings);
        aggregate::build(&ctx).unwrap()
    }

    #[test]
    fn test_groupable_columns() {
        let settings = Settings::default();
        let entities = licensing_entities(&settings);
        let ctx = EntityContext::new(entity(&entities, "licenses"), &settings);
        let names: Vec<&str> = groupable_columns(&ctx)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["bl_status_en", "license_type", "emirate_city"]);
    }

    #[test]
    fn test_switches_and_filters() {
        let artifact = aggregate_licenses(&Settings::default());
        assert_eq!(artifact.name, "aggregate_licenses");
        assert_eq!(artifact.kind, ArtifactKind::Aggregate);
        assert_eq!(
            artifact.parameter_names(),
            vec![
                "groupByBlStatusEn",
                "groupByLicenseType",
                "groupByEmirateCity",
                "filterBlStatusEn",
                "filterLicenseType",
                "IssueDateFrom",
                "IssueDateTo",
                "ExpiryDateFrom",
                "ExpiryDateTo",
            ]
        );

        let switch = artifact.parameter("groupByLicenseType").unwrap();
        assert_eq!(switch.json_type, JsonType::Boolean);
        assert_eq!(switch.default, Some(json!(false)));

        let filter = artifact.parameter("filterBlStatusEn").unwrap();
        assert!(filter.is_optional());
        assert_eq!(filter.enum_values.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn test_dimensions_collapse_to_all() {
        let sql = aggregate_licenses(&Settings::default()).sql;
        assert!(sql.starts_with(
            "SELECT\n  CASE WHEN $groupByBlStatusEn THEN \"bl_status_en\" ELSE 'All' END AS \"bl_status_en\",\n"
        ));
        assert!(sql.contains("COUNT(*) AS \"total_count\""));
        assert!(sql.contains("COUNT(DISTINCT \"license_id\") AS \"unique_count\""));
        assert!(sql.contains(
            "\nGROUP BY CASE WHEN $groupByBlStatusEn THEN \"bl_status_en\" ELSE 'All' END, "
        ));
        assert!(sql.ends_with("ORDER BY \"total_count\" DESC\nLIMIT 100"));
    }

    #[test]
    fn test_filters_apply_before_the_row_cap() {
        let artifact = aggregate_licenses(&Settings::default());
        let sql = &artifact.sql;
        assert!(sql.contains("FROM (\nSELECT\n  *\nFROM \"dim_licenses\"\nWHERE ($filterBlStatusEn IS NULL OR \"bl_status_en\" = $filterBlStatusEn)"));
        assert!(sql.contains(
            "\n  AND ($IssueDateFrom IS NULL OR CAST(\"issue_date\" AS DATE) >= CAST($IssueDateFrom AS DATE))"
        ));
        assert!(sql.contains(
            "LIMIT CASE WHEN $filterBlStatusEn IS NULL AND $filterLicenseType IS NULL AND \
             $IssueDateFrom IS NULL AND $IssueDateTo IS NULL AND $ExpiryDateFrom IS NULL AND \
             $ExpiryDateTo IS NULL THEN 10000 ELSE 1000000 END\n) AS \"scan\""
        ));

        let cap = artifact.template.row_cap.as_ref().unwrap();
        assert_eq!(cap.cap_for(&[]), 10_000);
        assert_eq!(cap.cap_for(&["groupByLicenseType"]), 10_000);
        assert_eq!(cap.cap_for(&["ExpiryDateTo"]), 1_000_000);
    }

    #[test]
    fn test_configured_row_caps() {
        let mut settings = Settings::default();
        settings.generation.row_caps.unfiltered = 500;
        settings.generation.row_caps.filtered = 50_000;
        settings.generation.result_limit = 25;
        let sql = aggregate_licenses(&settings).sql;
        assert!(sql.contains("THEN 500 ELSE 50000 END"));
        assert!(sql.ends_with("LIMIT 25"));
    }

    #[test]
    fn test_return_shape() {
        let artifact = aggregate_licenses(&Settings::default());
        let names: Vec<&str> = artifact
            .returns
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["bl_status_en", "license_type", "emirate_city", TOTAL_COUNT, UNIQUE_COUNT]
        );
        assert_eq!(
            artifact.returns.property(TOTAL_COUNT).unwrap().json_type,
            JsonType::Integer
        );
    }

    #[test]
    fn test_parses_in_both_dialects() {
        for dialect in [Dialect::DuckDb, Dialect::Postgres] {
            let mut settings = Settings::default();
            settings.generation.dialect = dialect;
            let artifact = aggregate_licenses(&settings);
            assert!(artifact.undeclared_placeholders().is_empty());
            assert!(artifact.unused_parameters().is_empty());
            validate_sql(&artifact.sql, dialect).unwrap();
        }
    }

    #[test]
    fn test_skipped_without_groupable_columns() {
        let graph = ModelGraph::new().with_table(
            TableModel::new("fact_payments")
                .with_column(ColumnModel::new("payment_id", "bigint").primary_key())
                .with_column(ColumnModel::new("paid_amount", "decimal(12,2)")),
        );
        let settings = Settings::default();
        let entities = assemble(&graph, &settings).unwrap();
        let ctx = EntityContext::new(&entities[0], &settings);
        assert!(aggregate::build(&ctx).is_none());
    }

    #[test]
    fn test_skipped_when_only_text_dates() {
        let graph = ModelGraph::new().with_table(
            TableModel::new("dim_events")
                .with_column(ColumnModel::new("event_id", "bigint").primary_key())
                .with_column(ColumnModel::new("event_date", "varchar")),
        );
        let settings = Settings::default();
        let entities = assemble(&graph, &settings).unwrap();
        let ctx = EntityContext::new(&entities[0], &settings);

        let names: Vec<&str> = groupable_columns(&ctx)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["event_date"]);
        assert!(aggregate::build(&ctx).is_none());
    }

    #[test]
    fn test_text_columns_join_a_status_dimension() {
        let graph = ModelGraph::new().with_table(
            TableModel::new("dim_sites")
                .with_column(ColumnModel::new("site_id", "bigint").primary_key())
                .with_column(ColumnModel::new("site_city", "varchar"))
                .with_column(ColumnModel::new("site_status", "varchar")),
        );
        let settings = Settings::default();
        let entities = assemble(&graph, &settings).unwrap();
        let ctx = EntityContext::new(&entities[0], &settings);
        let artifact = aggregate::build(&ctx).unwrap();

        assert_eq!(
            &artifact.parameter_names()[..2],
            &["groupBySiteStatus", "groupBySiteCity"]
        );
    }
}

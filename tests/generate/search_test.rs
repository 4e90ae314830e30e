// tests/generate/search_test.rs

#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{entity, licensing_entities};
    use scaffold::config::Settings;
    use scaffold::generate::search::{self, PAGE, PAGE_SIZE};
    use scaffold::generate::{ArtifactKind, EntityContext, JsonType};
    use scaffold::model::{ColumnModel, ModelGraph, TableModel};
    use scaffold::semantic::assemble;
    use scaffold::sql::validate::validate_sql;
    use scaffold::sql::Dialect;
    use serde_json::{json, Value};

    fn find_licenses(settings: &Settings) -> scaffold::generate::Artifact {
        let entities = licensing_entities(settings);
        let ctx = EntityContext::new(entity(&entities, "licenses"), settings);
        search::build(&ctx).unwrap()
    }

    #[test]
    fn test_name_and_kind() {
        let artifact = find_licenses(&Settings::default());
        assert_eq!(artifact.name, "find_licenses");
        assert_eq!(artifact.kind, ArtifactKind::Search);
        assert_eq!(artifact.entity, "licenses");
        assert_eq!(artifact.format_version, "1.0.0");
    }

    #[test]
    fn test_parameters_follow_column_order() {
        let artifact = find_licenses(&Settings::default());
        assert_eq!(
            artifact.parameter_names(),
            vec![
                "License",
                "LicenseNumber",
                "Owner",
                "CoOwner",
                "ActivityCode",
                "BlStatusEn",
                "LicenseType",
                "TradeName",
                "IssueDateFrom",
                "IssueDateTo",
                "ExpiryDateFrom",
                "ExpiryDateTo",
                "AnnualFeeMin",
                "AnnualFeeMax",
                "EmployeeCountMin",
                "EmployeeCountMax",
                "EmirateCity",
                "LatDdMin",
                "LatDdMax",
                "LonDdMin",
                "LonDdMax",
                "page",
                "page_size",
            ]
        );
    }

    #[test]
    fn test_parameter_shapes() {
        let artifact = find_licenses(&Settings::default());

        let status = artifact.parameter("BlStatusEn").unwrap();
        assert_eq!(status.json_type, JsonType::String);
        assert_eq!(
            status.enum_values.as_deref(),
            Some(&[json!("Active"), json!("Expired"), json!("Suspended"), Value::Null][..])
        );
        assert!(status.is_optional());

        let license = artifact.parameter("License").unwrap();
        assert_eq!(license.json_type, JsonType::Integer);
        assert!(license.is_optional());

        let issued = artifact.parameter("IssueDateFrom").unwrap();
        assert_eq!(issued.format.as_deref(), Some("date"));

        assert_eq!(
            artifact.parameter("EmployeeCountMin").unwrap().json_type,
            JsonType::Integer
        );
        assert_eq!(artifact.parameter("LatDdMax").unwrap().json_type, JsonType::Number);
    }

    #[test]
    fn test_paging_parameters() {
        let artifact = find_licenses(&Settings::default());

        let page = artifact.parameter(PAGE).unwrap();
        assert_eq!(page.default, Some(json!(1)));
        assert_eq!(page.minimum, Some(1));
        assert!(!page.is_optional());

        let page_size = artifact.parameter(PAGE_SIZE).unwrap();
        assert_eq!(page_size.default, Some(json!(20)));
        assert_eq!(page_size.maximum, Some(1000));
    }

    #[test]
    fn test_every_filter_is_optional() {
        let artifact = find_licenses(&Settings::default());
        assert_eq!(artifact.template.filters.len(), 21);
        assert!(artifact.template.active_filters(&[]).is_empty());

        let active = artifact.template.active_filters(&["TradeName", "page"]);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].param, "TradeName");
    }

    #[test]
    fn test_sql_shape() {
        let sql = find_licenses(&Settings::default()).sql;

        assert!(sql.starts_with("SELECT\n  *\nFROM \"dim_licenses\"\nWHERE "));
        assert!(sql.contains("($License IS NULL OR \"license_id\" = $License)"));
        assert!(sql.contains(
            "($TradeName IS NULL OR \"trade_name\" ILIKE '%' || $TradeName || '%')"
        ));
        assert!(sql.contains(
            "($IssueDateFrom IS NULL OR \"issue_date\" >= CAST($IssueDateFrom AS DATE))"
        ));
        assert!(sql.contains("($AnnualFeeMin IS NULL OR \"annual_fee\" >= $AnnualFeeMin)"));
        assert!(sql.contains("\n  AND ($BlStatusEn IS NULL OR \"bl_status_en\" = $BlStatusEn)"));
        assert!(sql.ends_with(
            "ORDER BY \"issue_date\" DESC\nLIMIT $page_size OFFSET (($page - 1) * $page_size)"
        ));
    }

    #[test]
    fn test_text_identifiers_use_partial_match() {
        let sql = find_licenses(&Settings::default()).sql;
        assert!(sql.contains(
            "($LicenseNumber IS NULL OR \"license_number\" ILIKE '%' || $LicenseNumber || '%')"
        ));
        assert!(sql.contains(
            "($ActivityCode IS NULL OR \"activity_code\" ILIKE '%' || $ActivityCode || '%')"
        ));
        assert!(sql.contains("($Owner IS NULL OR \"owner_id\" = $Owner)"));
    }

    #[test]
    fn test_text_status_uses_partial_match() {
        let graph = ModelGraph::new().with_table(
            TableModel::new("dim_orders")
                .with_column(ColumnModel::new("order_id", "bigint").primary_key())
                .with_column(ColumnModel::new("order_status", "varchar"))
                .with_column(ColumnModel::new("is_paid", "boolean")),
        );
        let settings = Settings::default();
        let entities = assemble(&graph, &settings).unwrap();
        let ctx = EntityContext::new(&entities[0], &settings);
        let sql = search::build(&ctx).unwrap().sql;

        assert!(sql.contains(
            "($OrderStatus IS NULL OR \"order_status\" ILIKE '%' || $OrderStatus || '%')"
        ));
        assert!(sql.contains("($IsPaid IS NULL OR \"is_paid\" = $IsPaid)"));
    }

    #[test]
    fn test_placeholders_match_parameters() {
        let artifact = find_licenses(&Settings::default());
        assert!(artifact.undeclared_placeholders().is_empty());
        assert!(artifact.unused_parameters().is_empty());
    }

    #[test]
    fn test_parses_in_both_dialects() {
        for dialect in [Dialect::DuckDb, Dialect::Postgres] {
            let mut settings = Settings::default();
            settings.generation.dialect = dialect;
            let artifact = find_licenses(&settings);
            validate_sql(&artifact.sql, dialect).unwrap();
        }
    }

    #[test]
    fn test_suffix_and_schema_qualification() {
        let mut settings = Settings::default();
        settings.generation.relation_suffix = "_v1".into();
        settings.generation.qualify_schema = true;
        let sql = find_licenses(&settings).sql;
        assert!(sql.contains("FROM \"marts\".\"dim_licenses_v1\""));
    }

    #[test]
    fn test_custom_page_size() {
        let mut settings = Settings::default();
        settings.generation.default_page_size = 50;
        settings.generation.max_page_size = 500;
        let artifact = find_licenses(&settings);
        let page_size = artifact.parameter(PAGE_SIZE).unwrap();
        assert_eq!(page_size.default, Some(json!(50)));
        assert_eq!(page_size.maximum, Some(500));
    }
}

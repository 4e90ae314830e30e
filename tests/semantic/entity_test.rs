// tests/semantic/entity_test.rs

#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{entity, licensing_graph};
    use scaffold::config::{NamingSettings, Settings};
    use scaffold::model::{ColumnModel, ModelGraph, TableModel};
    use scaffold::semantic::{assemble, SemanticError, SemanticRole};

    #[test]
    fn test_one_entity_per_primary_table() {
        let entities = assemble(&licensing_graph(), &Settings::default()).unwrap();
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["licenses", "owners"]);
    }

    #[test]
    fn test_entity_fields() {
        let entities = assemble(&licensing_graph(), &Settings::default()).unwrap();
        let licenses = entity(&entities, "licenses");

        assert_eq!(licenses.table, "dim_licenses");
        assert_eq!(licenses.model, "dim_licenses");
        assert_eq!(licenses.schema.as_deref(), Some("marts"));
        assert_eq!(licenses.description.as_deref(), Some("Business licenses"));
        assert_eq!(licenses.columns.len(), 15);
        assert_eq!(licenses.related_tables, vec!["bridge_owner_licenses"]);
        assert!(licenses.relationships.is_empty());

        let owners = entity(&entities, "owners");
        assert!(owners.related_tables.is_empty());
    }

    #[test]
    fn test_column_roles() {
        let entities = assemble(&licensing_graph(), &Settings::default()).unwrap();
        let licenses = entity(&entities, "licenses");

        let role = |name: &str| licenses.column(name).unwrap().role;
        assert_eq!(role("license_id"), SemanticRole::Identifier);
        assert_eq!(role("co_owner_id"), SemanticRole::Identifier);
        assert_eq!(role("bl_status_en"), SemanticRole::Categorical);
        assert_eq!(role("license_type"), SemanticRole::Categorical);
        assert_eq!(role("trade_name"), SemanticRole::Descriptive);
        assert_eq!(role("issue_date"), SemanticRole::Temporal);
        assert_eq!(role("annual_fee"), SemanticRole::Monetary);
        assert_eq!(role("employee_count"), SemanticRole::Metric);
        assert_eq!(role("emirate_city"), SemanticRole::Geographic);
        assert_eq!(role("lat_dd"), SemanticRole::Unknown);

        let status = licenses.column("bl_status_en").unwrap();
        assert!(status.is_enumerated());
        assert_eq!(status.enum_values, vec!["Active", "Expired", "Suspended"]);

        assert_eq!(licenses.columns_with_role(SemanticRole::Temporal).count(), 2);
        assert!(licenses.has_role(SemanticRole::Metric));
        assert!(!licenses.has_role(SemanticRole::BusinessStatus));

        let owners = entity(&entities, "owners");
        assert_eq!(
            owners.column("is_verified").unwrap().role,
            SemanticRole::BusinessStatus
        );
    }

    #[test]
    fn test_primary_keys() {
        let entities = assemble(&licensing_graph(), &Settings::default()).unwrap();
        assert_eq!(entity(&entities, "licenses").primary_key, "license_id");
        assert_eq!(entity(&entities, "owners").primary_key, "owner_id");
        assert!(entity(&entities, "owners").primary_key_column().unwrap().primary_key);
    }

    #[test]
    fn test_primary_key_by_singular_convention() {
        let graph = ModelGraph::new().with_table(
            TableModel::new("dim_licenses")
                .with_column(ColumnModel::new("owner_id", "bigint"))
                .with_column(ColumnModel::new("license_id", "bigint")),
        );
        let entities = assemble(&graph, &Settings::default()).unwrap();
        assert_eq!(entities[0].primary_key, "license_id");
    }

    #[test]
    fn test_entity_without_columns() {
        let graph = ModelGraph::new().with_table(TableModel::new("dim_regions"));
        let entities = assemble(&graph, &Settings::default()).unwrap();
        assert_eq!(entities[0].name, "regions");
        assert_eq!(entities[0].primary_key, "");
        assert!(entities[0].primary_key_column().is_none());
    }

    #[test]
    fn test_no_primary_tables() {
        let graph = ModelGraph::new()
            .with_table(TableModel::new("stg_licenses"))
            .with_table(TableModel::new("bridge_owner_licenses"));
        let entities = assemble(&graph, &Settings::default()).unwrap();
        assert!(entities.is_empty());
    }

    #[test]
    fn test_custom_prefixes() {
        let mut settings = Settings::default();
        settings.naming = NamingSettings {
            entity_prefixes: vec!["mart_".into()],
            strip_prefixes: vec!["mart_".into()],
            ..Default::default()
        };
        let graph = ModelGraph::new()
            .with_table(TableModel::new("mart_orders"))
            .with_table(TableModel::new("dim_customers"));
        let entities = assemble(&graph, &settings).unwrap();
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["orders"]);
    }

    #[test]
    fn test_duplicate_entity() {
        let graph = ModelGraph::new()
            .with_table(TableModel::new("dim_licenses"))
            .with_table(TableModel::new("fact_licenses"));
        let err = assemble(&graph, &Settings::default()).unwrap_err();
        assert_eq!(
            err,
            SemanticError::DuplicateEntity {
                entity: "licenses".into(),
                tables: vec!["dim_licenses".into(), "fact_licenses".into()],
            }
        );
        assert!(err.to_string().contains("dim_licenses, fact_licenses"));
    }

    #[test]
    fn test_duplicate_table() {
        let graph = ModelGraph::new()
            .with_table(TableModel::new("dim_licenses"))
            .with_table(TableModel::new("dim_licenses"));
        let err = assemble(&graph, &Settings::default()).unwrap_err();
        assert_eq!(err, SemanticError::DuplicateTable("dim_licenses".into()));
    }

    #[test]
    fn test_duplicate_column() {
        let graph = ModelGraph::new().with_table(
            TableModel::new("dim_licenses")
                .with_column(ColumnModel::new("license_id", "bigint"))
                .with_column(ColumnModel::new("license_id", "varchar")),
        );
        let err = assemble(&graph, &Settings::default()).unwrap_err();
        assert!(matches!(err, SemanticError::DuplicateColumn { ref column, .. } if column == "license_id"));
    }

    #[test]
    fn test_empty_names_rejected() {
        let graph = ModelGraph::new().with_table(TableModel::new(" "));
        assert!(matches!(
            assemble(&graph, &Settings::default()),
            Err(SemanticError::InvalidModel(_))
        ));

        let graph = ModelGraph::new()
            .with_table(TableModel::new("dim_licenses").with_column(ColumnModel::new("", "int")));
        assert!(matches!(
            assemble(&graph, &Settings::default()),
            Err(SemanticError::InvalidModel(_))
        ));
    }
}

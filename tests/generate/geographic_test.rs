// tests/generate/geographic_test.rs

#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use super::common::{entity, licensing_entities};
    use scaffold::config::Settings;
    use scaffold::generate::geographic::{
        self, coordinate_columns, GROUP_BY_FIELD, INCLUDE_COORDINATES, LOCATION,
    };
    use scaffold::generate::{Artifact, ArtifactKind, EntityContext, JsonType};
    use scaffold::model::{ColumnModel, ModelGraph, TableModel};
    use scaffold::semantic::{assemble, Entity};
    use scaffold::sql::validate::validate_sql;
    use scaffold::sql::Dialect;
    use serde_json::json;

    fn geo_licenses(settings: &Settings) -> Artifact {
        let entities = licensing_entities(settings);
        let ctx = EntityContext::new(entity(&entities, "licenses"), settings);
        geographic::build(&ctx).unwrap()
    }

    fn sites() -> Vec<Entity> {
        let graph = ModelGraph::new().with_table(
            TableModel::new("dim_sites")
                .with_column(ColumnModel::new("site_id", "bigint").primary_key())
                .with_column(ColumnModel::new("site_city", "varchar"))
                .with_column(ColumnModel::new("site_country", "varchar"))
                .with_column(ColumnModel::new("site_latitude", "double"))
                .with_column(ColumnModel::new("site_longitude", "double")),
        );
        assemble(&graph, &Settings::default()).unwrap()
    }

    #[test]
    fn test_parameters() {
        let artifact = geo_licenses(&Settings::default());
        assert_eq!(artifact.name, "geo_licenses");
        assert_eq!(artifact.kind, ArtifactKind::Geographic);
        assert_eq!(
            artifact.parameter_names(),
            vec![
                GROUP_BY_FIELD,
                INCLUDE_COORDINATES,
                "minLat",
                "maxLat",
                "minLon",
                "maxLon"
            ]
        );
        let field = artifact.parameter(GROUP_BY_FIELD).unwrap();
        assert_eq!(field.default, Some(json!("emirate_city")));
        assert_eq!(
            artifact.parameter(INCLUDE_COORDINATES).unwrap().default,
            Some(json!(false))
        );
        let bound = artifact.parameter("minLat").unwrap();
        assert_eq!(bound.json_type, JsonType::Number);
        assert!(bound.is_optional());
    }

    #[test]
    fn test_sql_shape() {
        let sql = geo_licenses(&Settings::default()).sql;
        let location = "CASE WHEN $groupByField = 'emirate_city' THEN \"emirate_city\" ELSE \"emirate_city\" END";

        assert!(sql.starts_with(&format!("SELECT\n  {} AS \"location\",\n", location)));
        assert!(sql.contains(
            "CASE WHEN $includeCoordinates THEN AVG(\"lat_dd\") ELSE NULL END AS \"avg_latitude\""
        ));
        assert!(sql.contains(
            "CASE WHEN $includeCoordinates THEN MAX(\"lon_dd\") ELSE NULL END AS \"max_longitude\""
        ));
        assert!(sql.contains(&format!("\nWHERE {} IS NOT NULL\n", location)));
        assert!(sql.contains("\n  AND ($minLat IS NULL OR \"lat_dd\" >= $minLat)"));
        assert!(sql.contains("\n  AND ($maxLon IS NULL OR \"lon_dd\" <= $maxLon)"));
        assert!(sql.contains(&format!("\nGROUP BY {}\n", location)));
        assert!(sql.ends_with("ORDER BY \"count\" DESC\nLIMIT 100"));
    }

    #[test]
    fn test_return_shape() {
        let artifact = geo_licenses(&Settings::default());
        let names: Vec<&str> = artifact
            .returns
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                LOCATION,
                "count",
                "unique_count",
                "avg_latitude",
                "min_latitude",
                "max_latitude",
                "avg_longitude",
                "min_longitude",
                "max_longitude"
            ]
        );
    }

    #[test]
    fn test_coordinate_columns_by_name() {
        let entities = sites();
        let settings = Settings::default();
        let ctx = EntityContext::new(&entities[0], &settings);
        assert_eq!(
            coordinate_columns(&ctx),
            ("site_latitude".to_string(), "site_longitude".to_string())
        );

        let artifact = geographic::build(&ctx).unwrap();
        let field = artifact.parameter(GROUP_BY_FIELD).unwrap();
        assert_eq!(
            field.enum_values.clone().unwrap(),
            vec![json!("site_city"), json!("site_country")]
        );
    }

    #[test]
    fn test_configured_fallback_coordinates() {
        let graph = ModelGraph::new().with_table(
            TableModel::new("dim_branches")
                .with_column(ColumnModel::new("branch_id", "bigint").primary_key())
                .with_column(ColumnModel::new("branch_city", "varchar")),
        );
        let mut settings = Settings::default();
        settings.generation.latitude_fallback = "y_coord".into();
        settings.generation.longitude_fallback = "x_coord".into();
        let entities = assemble(&graph, &settings).unwrap();
        let ctx = EntityContext::new(&entities[0], &settings);

        assert_eq!(
            coordinate_columns(&ctx),
            ("y_coord".to_string(), "x_coord".to_string())
        );
        let sql = geographic::build(&ctx).unwrap().sql;
        assert!(sql.contains("\"y_coord\" >= $minLat"));
    }

    #[test]
    fn test_parses_in_both_dialects() {
        for dialect in [Dialect::DuckDb, Dialect::Postgres] {
            let mut settings = Settings::default();
            settings.generation.dialect = dialect;
            let artifact = geo_licenses(&settings);
            assert!(artifact.undeclared_placeholders().is_empty());
            assert!(artifact.unused_parameters().is_empty());
            validate_sql(&artifact.sql, dialect).unwrap();
        }
    }

    #[test]
    fn test_skipped_without_locations() {
        let settings = Settings::default();
        let entities = licensing_entities(&settings);
        let ctx = EntityContext::new(entity(&entities, "owners"), &settings);
        assert!(geographic::build(&ctx).is_none());
    }
}

// tests/common/mod.rs
//
// Shared licensing model used across the integration tests.

#![allow(dead_code)]

use scaffold::config::Settings;
use scaffold::model::{ColumnModel, ColumnTest, ModelGraph, TableModel};
use scaffold::semantic::{assemble, resolve_relationships, Entity};

/// Licenses, their owners, and a bridge table between them.
pub fn licensing_graph() -> ModelGraph {
    ModelGraph::new()
        .with_table(licenses_table())
        .with_table(owners_table())
        .with_table(
            TableModel::new("bridge_owner_licenses")
                .with_schema("marts")
                .with_column(ColumnModel::new("owner_id", "bigint"))
                .with_column(ColumnModel::new("license_id", "bigint")),
        )
}

pub fn licenses_table() -> TableModel {
    TableModel::new("dim_licenses")
        .with_schema("marts")
        .with_description("Business licenses")
        .with_column(
            ColumnModel::new("license_id", "bigint")
                .with_test(ColumnTest::Unique)
                .with_test(ColumnTest::NotNull),
        )
        .with_column(ColumnModel::new("license_number", "varchar"))
        .with_column(ColumnModel::new("owner_id", "bigint").references("dim_owners", "owner_id"))
        .with_column(ColumnModel::new("co_owner_id", "bigint"))
        .with_column(ColumnModel::new("activity_code", "varchar"))
        .with_column(
            ColumnModel::new("bl_status_en", "varchar")
                .with_accepted_values(&["Active", "Expired", "Suspended"]),
        )
        .with_column(ColumnModel::new("license_type", "varchar"))
        .with_column(ColumnModel::new("trade_name", "varchar"))
        .with_column(ColumnModel::new("issue_date", "date"))
        .with_column(ColumnModel::new("expiry_date", "date"))
        .with_column(ColumnModel::new("annual_fee", "decimal(12,2)"))
        .with_column(ColumnModel::new("employee_count", "integer"))
        .with_column(ColumnModel::new("emirate_city", "varchar"))
        .with_column(ColumnModel::new("lat_dd", "double"))
        .with_column(ColumnModel::new("lon_dd", "double"))
}

pub fn owners_table() -> TableModel {
    TableModel::new("dim_owners")
        .with_schema("marts")
        .with_column(ColumnModel::new("owner_id", "bigint").primary_key())
        .with_column(ColumnModel::new("owner_name", "varchar"))
        .with_column(
            ColumnModel::new("owner_type", "varchar")
                .with_accepted_values(&["Individual", "Company"]),
        )
        .with_column(ColumnModel::new("created_at", "timestamp"))
        .with_column(ColumnModel::new("is_verified", "boolean"))
}

/// Assembled and linked entities of [`licensing_graph`].
pub fn licensing_entities(settings: &Settings) -> Vec<Entity> {
    let entities = assemble(&licensing_graph(), settings).unwrap();
    resolve_relationships(entities)
}

pub fn entity<'a>(entities: &'a [Entity], name: &str) -> &'a Entity {
    entities
        .iter()
        .find(|e| e.name == name)
        .unwrap_or_else(|| panic!("entity '{}' not assembled", name))
}

//! Business entities.
//!
//! One [`Entity`] per primary table. A table is primary when its name carries
//! one of the configured entity prefixes (`dim_`, `fact_`); the entity name
//! is the table name with one recognized prefix stripped.
//!
//! Assembly is the first of two phases. Relationships are left empty here and
//! filled by [`resolve_relationships`](super::resolve_relationships) once
//! every entity exists.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::classifier::{self, classify};
use super::error::{SemanticError, SemanticResult};
use super::inflection::singular_name;
use super::relationships::Relationship;
use super::role::SemanticRole;
use crate::config::{NamingSettings, Settings};
use crate::model::{ColumnModel, ModelGraph, RelationshipTest, TableModel};
use crate::sql::DataType;

// =============================================================================
// Column
// =============================================================================

/// A classified column. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub role: SemanticRole,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub primary_key: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipTest>,
}

impl Column {
    /// Classify a modeled column.
    pub fn classify(model: &ColumnModel) -> Self {
        let enum_values = model.enum_values();
        let role = classify(
            &model.name,
            &model.data_type,
            model.meta.classification.as_deref(),
            &enum_values,
        );
        Self {
            name: model.name.clone(),
            data_type: model.data_type.clone(),
            role,
            enum_values,
            description: model.description.clone(),
            primary_key: model.is_primary_key(),
            relationships: model.relationship_tests(),
        }
    }

    /// Declared type, parsed. `None` when the type is not recognized.
    pub fn parsed_type(&self) -> Option<DataType> {
        DataType::parse(&self.data_type)
    }

    pub fn is_enumerated(&self) -> bool {
        !self.enum_values.is_empty()
    }

    pub fn is_string_typed(&self) -> bool {
        self.parsed_type().is_some_and(|t| t.is_string())
    }

    pub fn is_numeric_typed(&self) -> bool {
        self.parsed_type().is_some_and(|t| t.is_numeric())
    }

    pub fn is_boolean_typed(&self) -> bool {
        matches!(self.parsed_type(), Some(DataType::Bool))
    }

    /// A latitude/longitude column rather than a place name.
    pub fn is_coordinate(&self) -> bool {
        classifier::is_coordinate(&self.name)
    }
}

// =============================================================================
// Entity
// =============================================================================

/// The unit of artifact generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    /// Business-facing name (`licenses` for `dim_licenses`).
    pub name: String,
    /// Physical relation queried by generated templates.
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Name of the primary table in the model graph.
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<Column>,
    /// Resolved row key. Empty only for an entity without columns.
    pub primary_key: String,
    pub related_tables: Vec<String>,
    pub relationships: BTreeMap<String, Relationship>,
}

impl Entity {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns_with_role(&self, role: SemanticRole) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.role == role)
    }

    pub fn has_role(&self, role: SemanticRole) -> bool {
        self.columns.iter().any(|c| c.role == role)
    }

    /// The resolved primary-key column.
    pub fn primary_key_column(&self) -> Option<&Column> {
        self.column(&self.primary_key)
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Build one entity per primary table, in declaration order.
///
/// Fails on structurally unusable input: empty names, duplicate tables or
/// columns, and two primary tables that reduce to one entity name.
pub fn assemble(graph: &ModelGraph, settings: &Settings) -> SemanticResult<Vec<Entity>> {
    validate_graph(graph)?;

    let naming = &settings.naming;
    let primaries: Vec<&TableModel> = graph
        .tables
        .iter()
        .filter(|t| is_primary_table(&t.name, naming))
        .collect();

    let mut producers: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for table in &primaries {
        producers
            .entry(entity_name(&table.name, naming))
            .or_default()
            .push(table.name.clone());
    }
    for table in &primaries {
        let name = entity_name(&table.name, naming);
        if let Some(tables) = producers.get(&name).filter(|t| t.len() > 1) {
            return Err(SemanticError::DuplicateEntity {
                entity: name,
                tables: tables.clone(),
            });
        }
    }

    let entities: Vec<Entity> = primaries
        .iter()
        .map(|table| build_entity(table, graph, naming))
        .collect();

    tracing::info!(
        tables = graph.tables.len(),
        entities = entities.len(),
        "assembled entities"
    );
    Ok(entities)
}

/// True when the table name carries an entity prefix.
pub fn is_primary_table(table: &str, naming: &NamingSettings) -> bool {
    naming
        .entity_prefixes
        .iter()
        .any(|p| table.starts_with(p.as_str()))
}

/// Table name with the first matching strip prefix removed.
pub fn entity_name(table: &str, naming: &NamingSettings) -> String {
    naming
        .strip_prefixes
        .iter()
        .filter_map(|p| table.strip_prefix(p.as_str()))
        .find(|rest| !rest.is_empty())
        .unwrap_or(table)
        .to_string()
}

fn validate_graph(graph: &ModelGraph) -> SemanticResult<()> {
    let mut seen = HashSet::new();
    for table in &graph.tables {
        if table.name.trim().is_empty() {
            return Err(SemanticError::InvalidModel("table with an empty name".into()));
        }
        if !seen.insert(table.name.as_str()) {
            return Err(SemanticError::DuplicateTable(table.name.clone()));
        }

        let mut columns = HashSet::new();
        for column in &table.columns {
            if column.name.trim().is_empty() {
                return Err(SemanticError::InvalidModel(format!(
                    "table '{}' has a column with an empty name",
                    table.name
                )));
            }
            if !columns.insert(column.name.as_str()) {
                return Err(SemanticError::DuplicateColumn {
                    table: table.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn build_entity(table: &TableModel, graph: &ModelGraph, naming: &NamingSettings) -> Entity {
    let name = entity_name(&table.name, naming);
    let columns: Vec<Column> = table.columns.iter().map(Column::classify).collect();
    let primary_key = resolve_primary_key(&name, &columns);
    let related_tables = related_tables(&name, &table.name, graph, naming);

    if columns.is_empty() {
        tracing::warn!(entity = %name, table = %table.name, "entity has no columns");
    }
    tracing::debug!(
        entity = %name,
        columns = columns.len(),
        primary_key = %primary_key,
        related = related_tables.len(),
        "built entity"
    );

    Entity {
        name,
        table: table.relation.clone(),
        schema: table.schema.clone(),
        model: table.name.clone(),
        description: table.description.clone(),
        columns,
        primary_key,
        related_tables,
        relationships: BTreeMap::new(),
    }
}

/// Primary-key fallback chain: flagged column, conventional identifier name,
/// first identifier, first column.
pub fn resolve_primary_key(entity: &str, columns: &[Column]) -> String {
    if let Some(c) = columns.iter().find(|c| c.primary_key) {
        return c.name.clone();
    }

    let singular = singular_name(entity);
    let conventional = [
        "id".to_string(),
        format!("{}_id", entity),
        format!("{}_key", entity),
        format!("{}_id", singular),
        format!("{}_key", singular),
    ];
    let identifiers = || columns.iter().filter(|c| c.role == SemanticRole::Identifier);

    identifiers()
        .find(|c| conventional.contains(&c.name.to_lowercase()))
        .or_else(|| identifiers().next())
        .or_else(|| columns.first())
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

/// Non-primary tables associated with an entity by name or by a
/// foreign-key-like column.
fn related_tables(
    entity: &str,
    primary_table: &str,
    graph: &ModelGraph,
    naming: &NamingSettings,
) -> Vec<String> {
    graph
        .tables
        .iter()
        .filter(|t| !is_primary_table(&t.name, naming))
        .filter(|t| {
            t.name.contains(entity)
                || t.name.contains(primary_table)
                || t.columns.iter().any(|c| {
                    let name = c.name.to_lowercase();
                    name.contains(entity)
                        && naming
                            .identifier_suffixes
                            .iter()
                            .any(|s| name.ends_with(s.as_str()))
                })
        })
        .map(|t| t.name.clone())
        .collect()
}

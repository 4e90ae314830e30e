//! The normalized model graph consumed by the pipeline.
//!
//! A [`ModelGraph`] is what a loader hands over: tables in declaration order,
//! each with typed columns and the tests attached to them. Nothing here
//! interprets the data; classification and assembly happen in
//! [`crate::semantic`].

use serde::{Deserialize, Serialize};

/// A collection of modeled tables, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelGraph {
    #[serde(default)]
    pub tables: Vec<TableModel>,
}

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style table addition.
    pub fn with_table(mut self, table: TableModel) -> Self {
        self.tables.push(table);
        self
    }

    /// Look up a table by model name.
    pub fn table(&self, name: &str) -> Option<&TableModel> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// One modeled table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableModel {
    /// Model name (`dim_licenses`).
    pub name: String,

    /// Physical relation the model materializes to. Usually the same as
    /// `name` unless the model is aliased.
    pub relation: String,

    #[serde(default)]
    pub schema: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub columns: Vec<ColumnModel>,
}

impl TableModel {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            relation: name.into(),
            schema: None,
            description: None,
            tags: vec![],
            columns: vec![],
        }
    }

    pub fn with_relation(mut self, relation: &str) -> Self {
        self.relation = relation.into();
        self
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_column(mut self, column: ColumnModel) -> Self {
        self.columns.push(column);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnModel> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnModel> {
        self.columns.iter_mut().find(|c| c.name == name)
    }
}

/// One modeled column with its declared type and attached tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnModel {
    pub name: String,

    /// Declared type, free text as written in the model (`varchar(255)`).
    #[serde(default)]
    pub data_type: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub meta: ColumnMeta,

    #[serde(default)]
    pub tests: Vec<ColumnTest>,
}

/// Column-level metadata supplied by the modeler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Explicit semantic role hint, e.g. `"temporal"`.
    #[serde(default)]
    pub classification: Option<String>,

    #[serde(default)]
    pub is_primary_key: bool,
}

/// A test attached to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTest {
    Unique,
    NotNull,
    AcceptedValues { values: Vec<String> },
    Relationship(RelationshipTest),
}

/// A declared foreign-key style test: this column references
/// `to_table.field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipTest {
    pub to_table: String,
    pub field: String,
}

impl RelationshipTest {
    pub fn new(to_table: &str, field: &str) -> Self {
        Self {
            to_table: to_table.into(),
            field: field.into(),
        }
    }
}

impl ColumnModel {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            description: None,
            meta: ColumnMeta::default(),
            tests: vec![],
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an explicit classification hint.
    pub fn with_classification(mut self, hint: &str) -> Self {
        self.meta.classification = Some(hint.into());
        self
    }

    /// Flag this column as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.meta.is_primary_key = true;
        self
    }

    pub fn with_test(mut self, test: ColumnTest) -> Self {
        self.tests.push(test);
        self
    }

    /// Shorthand for an accepted-values test.
    pub fn with_accepted_values(self, values: &[&str]) -> Self {
        self.with_test(ColumnTest::AcceptedValues {
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    /// Shorthand for a relationship test.
    pub fn references(self, to_table: &str, field: &str) -> Self {
        self.with_test(ColumnTest::Relationship(RelationshipTest::new(
            to_table, field,
        )))
    }

    /// The union of all accepted-values tests, in order, without duplicates.
    pub fn enum_values(&self) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for test in &self.tests {
            if let ColumnTest::AcceptedValues { values: accepted } = test {
                for v in accepted {
                    if !values.contains(v) {
                        values.push(v.clone());
                    }
                }
            }
        }
        values
    }

    pub fn relationship_tests(&self) -> Vec<RelationshipTest> {
        self.tests
            .iter()
            .filter_map(|t| match t {
                ColumnTest::Relationship(rel) => Some(rel.clone()),
                _ => None,
            })
            .collect()
    }

    /// Explicitly flagged, or carrying both `unique` and `not_null` tests.
    pub fn is_primary_key(&self) -> bool {
        if self.meta.is_primary_key {
            return true;
        }
        let unique = self.tests.iter().any(|t| matches!(t, ColumnTest::Unique));
        let not_null = self.tests.iter().any(|t| matches!(t, ColumnTest::NotNull));
        unique && not_null
    }
}

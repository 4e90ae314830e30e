//! Error types for the semantic layer.
//!
//! Only malformed input is an error here. Ambiguity (an unclassifiable
//! column, an unresolvable relationship, an entity lacking the columns an
//! artifact needs) is resolved locally and never surfaces as a
//! `SemanticError`.

use std::fmt;

/// Result type for semantic operations.
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Error type for the semantic layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    /// The graph is structurally unusable (empty names and the like).
    InvalidModel(String),

    /// Two tables share a model name.
    DuplicateTable(String),

    /// Two primary tables reduce to the same entity name.
    DuplicateEntity {
        entity: String,
        tables: Vec<String>,
    },

    /// A table declares the same column twice.
    DuplicateColumn { table: String, column: String },
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticError::InvalidModel(msg) => {
                write!(f, "Invalid model: {}", msg)
            }
            SemanticError::DuplicateTable(name) => {
                write!(f, "Duplicate table '{}' in model graph", name)
            }
            SemanticError::DuplicateEntity { entity, tables } => {
                write!(
                    f,
                    "Entity '{}' is produced by more than one table: {}",
                    entity,
                    tables.join(", ")
                )
            }
            SemanticError::DuplicateColumn { table, column } => {
                write!(f, "Duplicate column '{}' on table '{}'", column, table)
            }
        }
    }
}

impl std::error::Error for SemanticError {}

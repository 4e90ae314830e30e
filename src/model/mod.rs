//! Input model: the normalized graph of tables, columns and column tests.
//!
//! - [`graph`] - the graph types handed to the pipeline
//! - [`loader`] - builds a graph from a dbt manifest

pub mod graph;
pub mod loader;

pub use graph::{ColumnMeta, ColumnModel, ColumnTest, ModelGraph, RelationshipTest, TableModel};
pub use loader::{load_manifest, parse_manifest, LoadError, LoadResult};

//! # Scaffold
//!
//! Generates parameterized query artifacts from a warehouse model graph.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        dbt manifest.json  /  hand-built ModelGraph       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model::loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │   ModelGraph (tables, columns, column tests)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [semantic: classify + assemble]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Entities (classified columns, primary keys)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [semantic: resolve relationships]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Linked entities                                        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [generate + sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Artifacts, resources, smoke tests, metadata            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`pipeline::Pipeline`] runs the whole chain.

pub mod config;
pub mod generate;
pub mod model;
pub mod pipeline;
pub mod semantic;
pub mod sql;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::generate::{
        generate, Artifact, ArtifactKind, GeneratedArtifacts, Parameter, QueryTemplate,
        Resource, SmokeTest,
    };
    pub use crate::model::{ColumnModel, ColumnTest, ModelGraph, TableModel};
    pub use crate::pipeline::{Pipeline, PipelineError, PipelineResult};
    pub use crate::semantic::{
        assemble, resolve_relationships, to_parameter_name, Column, Entity, Relationship,
        SemanticRole,
    };
    pub use crate::sql::{Dialect, Expr, ExprExt, Query, TableRef};
}

pub use config::Settings;
pub use pipeline::{Pipeline, PipelineError};
pub use sql::Dialect;

//! Semantic layer - column roles, entities and relationships.
//!
//! Turns a [`ModelGraph`](crate::model::ModelGraph) into business entities
//! in two explicit phases:
//!
//! 1. **Assemble** - classify every column and build one [`Entity`] per
//!    primary table ([`assemble`])
//! 2. **Resolve** - link entities through relationship tests and
//!    foreign-key-like column names ([`resolve_relationships`])
//!
//! Resolution needs every entity to exist, so the phases never interleave.
//! The [`naming`] transform maps column names to the parameter names used by
//! generated templates.

pub mod classifier;
pub mod entity;
pub mod error;
pub mod inflection;
pub mod naming;
pub mod relationships;
pub mod role;

pub use classifier::classify;
pub use entity::{assemble, Column, Entity};
pub use error::{SemanticError, SemanticResult};
pub use naming::{to_parameter_name, NameCollision, NamingTransform, ParameterNames};
pub use relationships::{
    resolve_relationships, Cardinality, JoinKey, Relationship, RelationshipSource,
};
pub use role::SemanticRole;

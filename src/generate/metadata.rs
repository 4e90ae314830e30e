//! Bundle metadata: what was generated from what.
//!
//! Carries no timestamps, so regenerating from the same input yields an
//! identical bundle.

use std::collections::BTreeMap;

use serde::Serialize;

use super::artifact::{Artifact, ArtifactKind};
use super::resources::Resource;
use super::smoke::SmokeTest;
use crate::semantic::{Entity, SemanticRole};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationMetadata {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub statistics: Statistics,
    pub entities: BTreeMap<String, EntitySummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub entities: usize,
    pub artifacts: usize,
    pub artifacts_by_kind: BTreeMap<ArtifactKind, usize>,
    pub resources: usize,
    pub tests: usize,
}

/// Per-entity view of the semantic model behind the bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    pub primary_table: String,
    pub primary_key: String,
    pub related_tables: Vec<String>,
    pub columns: usize,
    pub roles: BTreeMap<SemanticRole, usize>,
    pub relationships: Vec<String>,
    pub artifacts: Vec<String>,
}

impl GenerationMetadata {
    pub fn build(
        version: &str,
        entities: &[Entity],
        artifacts: &[Artifact],
        resources: &[Resource],
        tests: &[SmokeTest],
    ) -> Self {
        let mut by_kind = BTreeMap::new();
        for artifact in artifacts {
            *by_kind.entry(artifact.kind).or_insert(0) += 1;
        }

        let summaries = entities
            .iter()
            .map(|entity| {
                let mut roles = BTreeMap::new();
                for column in &entity.columns {
                    *roles.entry(column.role).or_insert(0) += 1;
                }
                let summary = EntitySummary {
                    primary_table: entity.model.clone(),
                    primary_key: entity.primary_key.clone(),
                    related_tables: entity.related_tables.clone(),
                    columns: entity.columns.len(),
                    roles,
                    relationships: entity.relationships.keys().cloned().collect(),
                    artifacts: artifacts
                        .iter()
                        .filter(|a| a.entity == entity.name)
                        .map(|a| a.name.clone())
                        .collect(),
                };
                (entity.name.clone(), summary)
            })
            .collect();

        Self {
            version: version.into(),
            source: None,
            statistics: Statistics {
                entities: entities.len(),
                artifacts: artifacts.len(),
                artifacts_by_kind: by_kind,
                resources: resources.len(),
                tests: tests.len(),
            },
            entities: summaries,
        }
    }
}

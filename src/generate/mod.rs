//! Artifact generation.
//!
//! Turns resolved entities into parameterized query artifacts:
//!
//! - [`search`] - `find_<entity>`, filtered and paginated rows
//! - [`aggregate`] - `aggregate_<entity>`, counts by selectable dimensions
//! - [`metrics`] - `analyze_<entity>_metrics`, metric totals by dimension
//! - [`timeseries`] - `timeseries_<entity>`, counts per period
//! - [`geographic`] - `geo_<entity>`, counts per location
//! - [`listing`] - `list_<entity>_values`, distinct categorical values
//! - [`navigation`] - `get_<entity>_with_<target>`, one per relationship
//!
//! plus [`resources`], [`smoke`] tests and bundle [`metadata`]. Every
//! template is built as a [`QueryTemplate`] and rendered once, at the end.
//!
//! A kind whose required columns are missing is skipped for that entity.

pub mod aggregate;
pub mod artifact;
pub mod context;
pub mod geographic;
pub mod listing;
pub mod metadata;
pub mod metrics;
pub mod navigation;
pub mod resources;
pub mod schema;
pub mod search;
pub mod smoke;
pub mod template;
pub mod timeseries;

use std::collections::BTreeMap;

use serde::Serialize;

pub use artifact::{Artifact, ArtifactKind};
pub use context::EntityContext;
pub use metadata::{EntitySummary, GenerationMetadata, Statistics};
pub use resources::Resource;
pub use schema::{JsonType, Parameter, Property, ReturnSchema};
pub use smoke::{Expectation, SmokeTest};
pub use template::{OptionalFilter, QueryTemplate, RowCap};

use crate::config::Settings;
use crate::semantic::Entity;

/// Everything one generation run produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedArtifacts {
    pub artifacts: Vec<Artifact>,
    /// Artifact name to rendered SQL.
    pub templates: BTreeMap<String, String>,
    pub resources: Vec<Resource>,
    pub tests: Vec<SmokeTest>,
    pub metadata: GenerationMetadata,
}

impl GeneratedArtifacts {
    /// Record where the input model came from.
    pub fn with_source(mut self, source: &str) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn artifacts_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }
}

/// Generate the artifact bundle for resolved entities.
pub fn generate(entities: &[Entity], settings: &Settings) -> GeneratedArtifacts {
    let generation = &settings.generation;
    let mut artifacts: Vec<Artifact> = Vec::new();
    let mut resources: Vec<Resource> = Vec::new();

    for entity in entities {
        if entity.primary_key_column().is_none() {
            tracing::debug!(entity = %entity.name, "entity has no columns, nothing generated");
            continue;
        }
        let ctx = EntityContext::new(entity, settings);
        for collision in ctx.names.collisions() {
            tracing::warn!(
                entity = %entity.name,
                parameter = %collision.parameter,
                kept = %collision.kept,
                dropped = %collision.dropped,
                "columns share a parameter name; the later column gets no filter"
            );
        }

        for kind in ArtifactKind::all() {
            if !generation.is_enabled(*kind) {
                continue;
            }
            match kind {
                ArtifactKind::Search => artifacts.extend(search::build(&ctx)),
                ArtifactKind::Aggregate => artifacts.extend(aggregate::build(&ctx)),
                ArtifactKind::Metrics => artifacts.extend(metrics::build(&ctx)),
                ArtifactKind::Timeseries => artifacts.extend(timeseries::build(&ctx)),
                ArtifactKind::Geographic => artifacts.extend(geographic::build(&ctx)),
                ArtifactKind::Listing => artifacts.extend(listing::build(&ctx)),
                ArtifactKind::Navigation => {
                    artifacts.extend(navigation::build(&ctx, entities))
                }
            }
        }

        if generation.resources {
            resources.extend(resources::active_resource(&ctx));
            resources.extend(resources::metrics_summary_resource(&ctx));
        }
    }
    if generation.resources {
        resources.extend(resources::overview_resource(entities, generation));
    }

    let mut templates = BTreeMap::new();
    artifacts.retain(|artifact| {
        if templates.contains_key(&artifact.name) {
            tracing::warn!(artifact = %artifact.name, "duplicate artifact name dropped");
            return false;
        }
        templates.insert(artifact.name.clone(), artifact.sql.clone());
        true
    });

    let tests: Vec<SmokeTest> = if generation.smoke_tests {
        artifacts.iter().flat_map(smoke::smoke_tests).collect()
    } else {
        Vec::new()
    };

    let metadata = GenerationMetadata::build(
        &generation.format_version,
        entities,
        &artifacts,
        &resources,
        &tests,
    );

    tracing::info!(
        entities = entities.len(),
        artifacts = artifacts.len(),
        resources = resources.len(),
        tests = tests.len(),
        "generated artifacts"
    );

    GeneratedArtifacts {
        artifacts,
        templates,
        resources,
        tests,
        metadata,
    }
}

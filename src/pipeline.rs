//! End-to-end generation from a model graph to an artifact bundle.
//!
//! ```text
//! ModelGraph → assemble → resolve relationships → generate → check → GeneratedArtifacts
//! ```
//!
//! A run returns the whole bundle or an error, never a partial one.
//!
//! # Example
//!
//! ```ignore
//! use scaffold::config::Settings;
//! use scaffold::model::load_manifest;
//! use scaffold::pipeline::Pipeline;
//! use std::path::Path;
//!
//! let settings = Settings::load()?;
//! let graph = load_manifest(Path::new("target/manifest.json"), &settings.loader)?;
//! let bundle = Pipeline::new(settings).run(&graph)?;
//! println!("{}", bundle.templates["find_licenses"]);
//! ```

use std::path::Path;

use crate::config::Settings;
use crate::generate::{self, GeneratedArtifacts};
use crate::model::{load_manifest, LoadError, ModelGraph};
use crate::semantic::{self, Entity, SemanticError};
use crate::sql::validate::validate_sql;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can stop a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Generated SQL for '{artifact}' does not parse: {message}")]
    InvalidSql { artifact: String, message: String },

    #[error(
        "Parameters of '{artifact}' do not match its placeholders \
         (undeclared: {undeclared:?}, unused: {unused:?})"
    )]
    ParameterMismatch {
        artifact: String,
        undeclared: Vec<String>,
        unused: Vec<String>,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;

// ============================================================================
// Pipeline
// ============================================================================

/// Runs the semantic and generation phases under one configuration.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Classify, assemble and link entities without generating anything.
    pub fn entities(&self, graph: &ModelGraph) -> PipelineResult<Vec<Entity>> {
        let entities = semantic::assemble(graph, &self.settings)?;
        Ok(semantic::resolve_relationships(entities))
    }

    /// Run every phase on a graph.
    pub fn run(&self, graph: &ModelGraph) -> PipelineResult<GeneratedArtifacts> {
        let entities = self.entities(graph)?;
        let bundle = generate::generate(&entities, &self.settings);
        self.check(&bundle)?;
        Ok(bundle)
    }

    /// Load a manifest and run every phase on it.
    pub fn run_manifest(&self, path: &Path) -> PipelineResult<GeneratedArtifacts> {
        let graph = load_manifest(path, &self.settings.loader)?;
        tracing::info!(path = %path.display(), tables = graph.tables.len(), "loaded manifest");
        Ok(self.run(&graph)?.with_source(&path.display().to_string()))
    }

    /// Placeholders must match declared parameters one to one, and, when
    /// enabled, every template must parse for the target dialect.
    fn check(&self, bundle: &GeneratedArtifacts) -> PipelineResult<()> {
        for artifact in &bundle.artifacts {
            let undeclared = artifact.undeclared_placeholders();
            let unused = artifact.unused_parameters();
            if !undeclared.is_empty() || !unused.is_empty() {
                return Err(PipelineError::ParameterMismatch {
                    artifact: artifact.name.clone(),
                    undeclared,
                    unused,
                });
            }
        }

        if !self.settings.generation.validate_sql {
            return Ok(());
        }
        let dialect = self.settings.generation.dialect;
        let statements = bundle
            .artifacts
            .iter()
            .map(|a| (&a.name, &a.sql))
            .chain(bundle.resources.iter().map(|r| (&r.name, &r.sql)));
        for (name, sql) in statements {
            validate_sql(sql, dialect).map_err(|message| PipelineError::InvalidSql {
                artifact: name.clone(),
                message,
            })?;
        }
        tracing::debug!(%dialect, "generated SQL validated");
        Ok(())
    }
}

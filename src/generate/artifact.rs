//! Generated artifacts.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::{Parameter, ReturnSchema};
use super::template::QueryTemplate;
use crate::sql::validate::placeholders;

/// The kinds of query artifact the generator produces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Search,
    Aggregate,
    Metrics,
    Timeseries,
    Geographic,
    Listing,
    Navigation,
}

impl ArtifactKind {
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Search,
            ArtifactKind::Aggregate,
            ArtifactKind::Metrics,
            ArtifactKind::Timeseries,
            ArtifactKind::Geographic,
            ArtifactKind::Listing,
            ArtifactKind::Navigation,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Search => "search",
            ArtifactKind::Aggregate => "aggregate",
            ArtifactKind::Metrics => "metrics",
            ArtifactKind::Timeseries => "timeseries",
            ArtifactKind::Geographic => "geographic",
            ArtifactKind::Listing => "listing",
            ArtifactKind::Navigation => "navigation",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, parameterized query over one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub name: String,
    pub kind: ArtifactKind,
    pub entity: String,
    pub description: String,
    pub format_version: String,
    pub parameters: Vec<Parameter>,
    pub returns: ReturnSchema,
    #[serde(skip)]
    pub template: QueryTemplate,
    pub sql: String,
}

impl Artifact {
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Placeholders in the SQL with no declared parameter.
    pub fn undeclared_placeholders(&self) -> Vec<String> {
        placeholders(&self.sql)
            .into_iter()
            .filter(|p| self.parameter(p).is_none())
            .collect()
    }

    /// Declared parameters the SQL never references.
    pub fn unused_parameters(&self) -> Vec<String> {
        let used = placeholders(&self.sql);
        self.parameters
            .iter()
            .filter(|p| !used.contains(&p.name))
            .map(|p| p.name.clone())
            .collect()
    }
}

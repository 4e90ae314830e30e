//! Semantic role taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a column means to the business, independent of its storage type.
///
/// Every classified column carries exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticRole {
    Identifier,
    BusinessStatus,
    Temporal,
    Geographic,
    Monetary,
    Descriptive,
    Metric,
    Categorical,
    Unknown,
}

impl SemanticRole {
    pub const ALL: [SemanticRole; 9] = [
        SemanticRole::Identifier,
        SemanticRole::BusinessStatus,
        SemanticRole::Temporal,
        SemanticRole::Geographic,
        SemanticRole::Monetary,
        SemanticRole::Descriptive,
        SemanticRole::Metric,
        SemanticRole::Categorical,
        SemanticRole::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticRole::Identifier => "identifier",
            SemanticRole::BusinessStatus => "business_status",
            SemanticRole::Temporal => "temporal",
            SemanticRole::Geographic => "geographic",
            SemanticRole::Monetary => "monetary",
            SemanticRole::Descriptive => "descriptive",
            SemanticRole::Metric => "metric",
            SemanticRole::Categorical => "categorical",
            SemanticRole::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticRole {
    type Err = String;

    /// Case-insensitive; accepts `business-status` as well as `business_status`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        SemanticRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| format!("unknown semantic role: {}", s))
    }
}

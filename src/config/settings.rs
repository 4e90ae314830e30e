//! TOML-based configuration for scaffold.
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults below.
//!
//! Example configuration:
//! ```toml
//! [naming]
//! entity_prefixes = ["dim_", "fact_"]
//! language_suffixes = ["_en", "_ar"]
//!
//! [generation]
//! dialect = "postgres"
//! relation_suffix = "_v1"
//! default_page_size = 20
//! max_page_size = 1000
//!
//! [generation.row_caps]
//! unfiltered = 10000
//! filtered = 1000000
//!
//! [loader]
//! path_filters = ["marts"]
//! default_schema = "public"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::generate::ArtifactKind;
use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Naming conventions for tables and parameters.
    pub naming: NamingSettings,

    /// Artifact generation knobs.
    pub generation: GenerationSettings,

    /// Manifest loading.
    pub loader: LoaderSettings,
}

/// Naming conventions.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingSettings {
    /// Table-name prefixes that mark a table as a primary (entity) table.
    pub entity_prefixes: Vec<String>,

    /// Prefixes stripped from a table name to form the entity name, and from
    /// a column name to form a parameter name. At most one is stripped.
    pub strip_prefixes: Vec<String>,

    /// Structural suffixes removed from column names when forming
    /// parameter names.
    pub identifier_suffixes: Vec<String>,

    /// Two-letter language markers preserved through the naming transform.
    pub language_suffixes: Vec<String>,
}

impl Default for NamingSettings {
    fn default() -> Self {
        Self {
            entity_prefixes: vec!["dim_".into(), "fact_".into()],
            strip_prefixes: vec!["dim_".into(), "fact_".into(), "bridge_".into()],
            identifier_suffixes: vec!["_id".into(), "_key".into()],
            language_suffixes: vec!["_en".into(), "_ar".into()],
        }
    }
}

/// Row caps applied to aggregation scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RowCapSettings {
    /// Cap when no filter parameter is supplied.
    pub unfiltered: u64,

    /// Cap when at least one filter parameter is supplied.
    pub filtered: u64,
}

impl Default for RowCapSettings {
    fn default() -> Self {
        Self {
            unfiltered: 10_000,
            filtered: 1_000_000,
        }
    }
}

/// Artifact generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Target SQL dialect for rendered templates.
    pub dialect: Dialect,

    /// Suffix appended to every physical relation name (e.g. `_v1` for
    /// versioned views).
    pub relation_suffix: String,

    /// Qualify relations with the table's schema.
    pub qualify_schema: bool,

    pub default_page_size: u64,
    pub max_page_size: u64,

    pub row_caps: RowCapSettings,

    /// Maximum number of categorical/status columns offered as exact-match
    /// filters on aggregation-style artifacts.
    pub max_category_filters: usize,

    /// Maximum number of temporal columns offered as date-range filters on
    /// aggregation-style artifacts.
    pub max_date_filters: usize,

    /// Maximum dimensions and metrics on the metrics analysis artifact.
    pub max_metric_dimensions: usize,
    pub max_metrics: usize,

    /// Maximum number of columns described in a return schema.
    pub max_return_properties: usize,

    /// Rows returned by relationship navigation and aggregation artifacts.
    pub result_limit: u64,

    /// Artifact kinds to generate.
    pub artifacts: Vec<ArtifactKind>,

    /// Emit resources (active records, summaries, overview).
    pub resources: bool,

    /// Emit smoke test cases for each artifact.
    pub smoke_tests: bool,

    /// Syntax-check every rendered template before returning it.
    pub validate_sql: bool,

    /// Coordinate column names used when an entity has none that match.
    pub latitude_fallback: String,
    pub longitude_fallback: String,

    /// Format version stamped on every artifact and on the bundle metadata.
    pub format_version: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            relation_suffix: String::new(),
            qualify_schema: false,
            default_page_size: 20,
            max_page_size: 1000,
            row_caps: RowCapSettings::default(),
            max_category_filters: 10,
            max_date_filters: 2,
            max_metric_dimensions: 5,
            max_metrics: 5,
            max_return_properties: 20,
            result_limit: 100,
            artifacts: ArtifactKind::all().to_vec(),
            resources: true,
            smoke_tests: true,
            validate_sql: true,
            latitude_fallback: "lat_dd".into(),
            longitude_fallback: "lon_dd".into(),
            format_version: "1.0.0".into(),
        }
    }
}

impl GenerationSettings {
    pub fn is_enabled(&self, kind: ArtifactKind) -> bool {
        self.artifacts.contains(&kind)
    }
}

/// Manifest loader settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Only models whose path contains one of these fragments are loaded.
    /// Empty means every model.
    pub path_filters: Vec<String>,

    /// Schema assigned to models that do not declare one.
    pub default_schema: String,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            path_filters: vec!["marts".into()],
            default_schema: "public".into(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text and check them.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SCAFFOLD_CONFIG`
    /// 2. `./scaffold.toml`
    /// 3. `~/.config/scaffold/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SCAFFOLD_CONFIG") {
            let expanded = expand_env_vars(&path)?;
            return Self::from_file(&expanded);
        }

        let local_config = PathBuf::from("scaffold.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("scaffold").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Reject settings that would produce unusable templates.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let generation = &self.generation;
        if generation.default_page_size == 0 {
            return Err(SettingsError::InvalidConfig(
                "generation.default_page_size must be at least 1".into(),
            ));
        }
        if generation.default_page_size > generation.max_page_size {
            return Err(SettingsError::InvalidConfig(format!(
                "generation.default_page_size ({}) exceeds max_page_size ({})",
                generation.default_page_size, generation.max_page_size
            )));
        }
        if generation.row_caps.unfiltered > generation.row_caps.filtered {
            return Err(SettingsError::InvalidConfig(format!(
                "generation.row_caps.unfiltered ({}) exceeds filtered ({})",
                generation.row_caps.unfiltered, generation.row_caps.filtered
            )));
        }
        if self.naming.entity_prefixes.iter().any(|p| p.is_empty()) {
            return Err(SettingsError::InvalidConfig(
                "naming.entity_prefixes must not contain an empty prefix".into(),
            ));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}

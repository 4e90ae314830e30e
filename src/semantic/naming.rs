//! Column name to parameter name mapping.
//!
//! The transform is a pure function of the column name, so every template
//! that mentions a column agrees on its external name:
//!
//! ```text
//! bl_status_en      -> BlStatusEn
//! license_owner_id  -> LicenseOwner
//! dim_customer_key  -> Customer
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::config::NamingSettings;

static DEFAULT_TRANSFORM: Lazy<NamingTransform> =
    Lazy::new(|| NamingTransform::new(&NamingSettings::default()));

/// Parameter name for a column under the default naming conventions.
pub fn to_parameter_name(column: &str) -> String {
    DEFAULT_TRANSFORM.parameter_name(column)
}

/// Naming transform configured from [`NamingSettings`].
#[derive(Debug, Clone, PartialEq)]
pub struct NamingTransform {
    strip_prefixes: Vec<String>,
    identifier_suffixes: Vec<String>,
    language_suffixes: Vec<String>,
}

impl NamingTransform {
    pub fn new(settings: &NamingSettings) -> Self {
        let lower = |v: &[String]| -> Vec<String> { v.iter().map(|s| s.to_lowercase()).collect() };
        Self {
            strip_prefixes: lower(&settings.strip_prefixes),
            identifier_suffixes: lower(&settings.identifier_suffixes),
            language_suffixes: lower(&settings.language_suffixes),
        }
    }

    /// Map a column name to its parameter name.
    pub fn parameter_name(&self, column: &str) -> String {
        let lower = column.to_lowercase();
        let mut rest = lower.as_str();

        // Language marker comes off first so `_id_en` style names still lose
        // their structural suffix.
        let mut language = None;
        if let Some(suffix) = self
            .language_suffixes
            .iter()
            .find(|s| rest.len() > s.len() && rest.ends_with(s.as_str()))
        {
            rest = &rest[..rest.len() - suffix.len()];
            language = Some(suffix.trim_start_matches('_'));
        }

        if let Some(prefix) = self
            .strip_prefixes
            .iter()
            .find(|p| rest.len() > p.len() && rest.starts_with(p.as_str()))
        {
            rest = &rest[prefix.len()..];
        }

        if let Some(suffix) = self
            .identifier_suffixes
            .iter()
            .find(|s| rest.len() > s.len() && rest.ends_with(s.as_str()))
        {
            rest = &rest[..rest.len() - suffix.len()];
        }

        let mut name: String = rest.split('_').map(capitalize).collect();
        if let Some(language) = language {
            name.push_str(&capitalize(language));
        }
        name
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Two columns that map to the same parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    pub parameter: String,
    /// The column that owns the parameter (declared first).
    pub kept: String,
    pub dropped: String,
}

/// Per-entity column/parameter mapping, reversible.
///
/// When two columns produce the same parameter name the first declared
/// column keeps it and the other is recorded as a collision, so a
/// parameter always refers to exactly one column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterNames {
    forward: BTreeMap<String, String>,
    reverse: BTreeMap<String, String>,
    collisions: Vec<NameCollision>,
}

impl ParameterNames {
    pub fn build<'a>(
        transform: &NamingTransform,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut names = ParameterNames::default();
        for column in columns {
            let parameter = transform.parameter_name(column);
            if let Some(kept) = names.reverse.get(&parameter) {
                if kept != column {
                    tracing::debug!(%parameter, kept = %kept, dropped = %column, "parameter name collision");
                    names.collisions.push(NameCollision {
                        parameter,
                        kept: kept.clone(),
                        dropped: column.to_string(),
                    });
                }
                continue;
            }
            names.forward.insert(column.to_string(), parameter.clone());
            names.reverse.insert(parameter, column.to_string());
        }
        names
    }

    /// Parameter owned by `column`, if it owns one.
    pub fn parameter(&self, column: &str) -> Option<&str> {
        self.forward.get(column).map(String::as_str)
    }

    /// Column a parameter name refers to.
    pub fn column(&self, parameter: &str) -> Option<&str> {
        self.reverse.get(parameter).map(String::as_str)
    }

    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

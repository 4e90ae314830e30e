//! Column classification.
//!
//! Assigns each column exactly one [`SemanticRole`], trying in order:
//!
//! 1. an explicit hint from column metadata, if it names a role
//! 2. an accepted-values test (categorical)
//! 3. name patterns, role by role in a fixed order
//! 4. the declared data type
//! 5. `unknown`
//!
//! The name-pattern order is load-bearing: `status_id` is an identifier,
//! not a status, because identifier patterns are tried first.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

use super::role::SemanticRole;
use crate::sql::DataType;

/// Name patterns per role, tried in this order. Matched case-insensitively
/// against the whole column name.
const NAME_PATTERNS: &[(SemanticRole, &[&str])] = &[
    (
        SemanticRole::Identifier,
        &[
            r".*_id", r".*_key", r".*_code", r".*_number", r".*_no", r".*_pk", "id", "key",
            "code", "pk",
        ],
    ),
    (
        SemanticRole::BusinessStatus,
        &[
            r".*_status", r".*_state", r"is_.*", r"has_.*", r".*_flag", "active", "enabled",
        ],
    ),
    (
        SemanticRole::Temporal,
        &[
            r".*_date", r".*_time", r".*_at", r"created_.*", r"updated_.*", r"deleted_.*",
            r".*_timestamp", "date", "time",
        ],
    ),
    (
        SemanticRole::Geographic,
        &[
            r".*_city", r".*_country", r".*_location", r".*_address", r".*_region", r".*_zip",
            r".*_postal.*", "latitude", "longitude", "lat", "lon", "lng", r".*_lat", r".*_lon",
            r".*_lng", r".*_latitude", r".*_longitude",
        ],
    ),
    (
        SemanticRole::Monetary,
        &[
            r".*_amount", r".*_price", r".*_cost", r".*_revenue", r".*_fee", r".*_payment",
            r".*_balance", "amount", "price",
        ],
    ),
    (
        SemanticRole::Descriptive,
        &[
            r".*_name", r".*_description", r".*_title", r".*_text", r".*_comment", "name",
            "description", "title",
        ],
    ),
    (
        SemanticRole::Metric,
        &[
            r".*_count", r".*_total", r".*_sum", r".*_avg", r".*_min", r".*_max",
            r".*_percentage", r".*_ratio",
        ],
    ),
];

/// Compiled pattern sets, one per role, in evaluation order.
static ROLE_PATTERNS: Lazy<Vec<(SemanticRole, RegexSet)>> = Lazy::new(|| {
    NAME_PATTERNS
        .iter()
        .map(|(role, patterns)| {
            let anchored = patterns.iter().map(|p| format!("(?i)^(?:{})$", p));
            let set = RegexSet::new(anchored).expect("role patterns are valid");
            (*role, set)
        })
        .collect()
});

/// Coordinate column names: the lat/lon family, excluding place names.
static LATITUDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|_)lat(itude)?(_|$)").expect("latitude pattern is valid"));
static LONGITUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|_)(lon|lng|long|longitude)(_|$)").expect("longitude pattern is valid")
});

/// Classify a column from its name, declared type, optional hint and
/// accepted values.
///
/// Pure: the same inputs always yield the same role.
pub fn classify(
    name: &str,
    data_type: &str,
    hint: Option<&str>,
    enum_values: &[String],
) -> SemanticRole {
    if let Some(hint) = hint {
        match hint.parse::<SemanticRole>() {
            Ok(role) => return role,
            Err(_) => {
                tracing::debug!(column = name, hint, "ignoring unrecognized classification hint");
            }
        }
    }

    if !enum_values.is_empty() {
        return SemanticRole::Categorical;
    }

    if let Some(role) = role_from_name(name) {
        return role;
    }

    role_from_type(data_type).unwrap_or(SemanticRole::Unknown)
}

/// The first role whose name patterns match, if any.
pub fn role_from_name(name: &str) -> Option<SemanticRole> {
    ROLE_PATTERNS
        .iter()
        .find(|(_, set)| set.is_match(name))
        .map(|(role, _)| *role)
}

/// Type-based fallback.
pub fn role_from_type(data_type: &str) -> Option<SemanticRole> {
    match DataType::parse(data_type) {
        Some(DataType::Bool) => Some(SemanticRole::BusinessStatus),
        Some(dt) if dt.is_temporal() => Some(SemanticRole::Temporal),
        Some(DataType::Decimal(_, _)) => Some(SemanticRole::Monetary),
        Some(dt) if dt.is_string() => Some(SemanticRole::Categorical),
        Some(_) => None,
        None => role_from_type_name(data_type),
    }
}

/// Substring heuristics for type names the parser does not know
/// (`datetime2`, `smallmoney`, `boolean_flag`).
fn role_from_type_name(data_type: &str) -> Option<SemanticRole> {
    let lower = data_type.to_lowercase();
    if lower.contains("bool") {
        Some(SemanticRole::BusinessStatus)
    } else if lower.contains("date") || lower.contains("time") {
        Some(SemanticRole::Temporal)
    } else if ["decimal", "numeric", "money"]
        .iter()
        .any(|t| lower.contains(t))
    {
        Some(SemanticRole::Monetary)
    } else {
        None
    }
}

/// True for latitude-like column names (`lat`, `lat_dd`, `site_latitude`).
pub fn is_latitude(name: &str) -> bool {
    LATITUDE.is_match(name)
}

/// True for longitude-like column names (`lon`, `lng`, `lon_dd`, `site_longitude`).
pub fn is_longitude(name: &str) -> bool {
    LONGITUDE.is_match(name)
}

/// True for a geographic column holding a coordinate rather than a place.
pub fn is_coordinate(name: &str) -> bool {
    is_latitude(name) || is_longitude(name)
}

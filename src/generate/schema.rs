//! Parameter and return-shape schemas.
//!
//! These serialize to the JSON-schema-like shape downstream tooling
//! expects: `{"name", "type", "enum", "default", "format", ...}` for a
//! parameter and `{"type": "array", "items": {"type": "object",
//! "properties": {...}}}` for a return shape.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::semantic::{Column, SemanticRole};
use crate::sql::DataType;

/// JSON type of a parameter or returned property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

/// JSON type for a declared column type.
///
/// Integer family -> integer, other numerics -> number, boolean -> boolean,
/// arrays and structured types -> array, everything else (temporal
/// included) -> string.
pub fn json_type(data_type: &str) -> JsonType {
    match DataType::parse(data_type) {
        Some(dt) if dt.is_integer() => JsonType::Integer,
        Some(dt) if dt.is_fractional() => JsonType::Number,
        Some(DataType::Bool) => JsonType::Boolean,
        Some(DataType::Array | DataType::Json) => JsonType::Array,
        Some(_) => JsonType::String,
        None => json_type_from_name(data_type),
    }
}

fn json_type_from_name(data_type: &str) -> JsonType {
    let lower = data_type.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
    if has(&["int", "serial"]) {
        JsonType::Integer
    } else if has(&["decimal", "numeric", "real", "double", "float", "money"]) {
        JsonType::Number
    } else if has(&["bool"]) {
        JsonType::Boolean
    } else if has(&["array", "json", "struct"]) {
        JsonType::Array
    } else {
        JsonType::String
    }
}

/// String format hint for a temporal column: `date` or `date-time`.
pub fn temporal_format(column: &Column) -> &'static str {
    match column.parsed_type() {
        Some(dt) if dt.has_time_component() => "date-time",
        _ if column.data_type.to_lowercase().contains("time") => "date-time",
        _ => "date",
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// One declared artifact parameter.
///
/// `default: Some(Value::Null)` marks an optional filter: leaving it unset
/// disables the predicate it guards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub json_type: JsonType,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
}

impl Parameter {
    pub fn new(name: &str, json_type: JsonType, description: &str) -> Self {
        Self {
            name: name.into(),
            json_type,
            description: description.into(),
            enum_values: None,
            default: None,
            format: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, JsonType::String, description)
    }

    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, JsonType::Integer, description)
    }

    pub fn number(name: &str, description: &str) -> Self {
        Self::new(name, JsonType::Number, description)
    }

    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, JsonType::Boolean, description)
    }

    /// Restrict to a set of string values.
    pub fn with_enum<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.enum_values = Some(
            values
                .iter()
                .map(|v| Value::String(v.as_ref().to_string()))
                .collect(),
        );
        self
    }

    /// Optional: defaults to `null`, and `null` is accepted even when an
    /// enum is declared.
    pub fn optional(mut self) -> Self {
        if let Some(values) = &mut self.enum_values {
            if !values.contains(&Value::Null) {
                values.push(Value::Null);
            }
        }
        self.default = Some(Value::Null);
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_range(mut self, minimum: Option<i64>, maximum: Option<i64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// True when leaving the parameter unset is valid.
    pub fn is_optional(&self) -> bool {
        matches!(self.default, Some(Value::Null))
    }
}

/// Parameters of one artifact, unique by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterList {
    params: Vec<Parameter>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when none of `names` is declared yet.
    pub fn is_free(&self, names: &[&str]) -> bool {
        names
            .iter()
            .all(|n| !self.params.iter().any(|p| p.name == *n))
    }

    /// Add a parameter. Returns false and leaves the list unchanged when
    /// the name is taken.
    pub fn add(&mut self, param: Parameter) -> bool {
        if !self.is_free(&[param.name.as_str()]) {
            tracing::debug!(parameter = %param.name, "duplicate parameter name skipped");
            return false;
        }
        self.params.push(param);
        true
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Parameter> {
        self.params
    }
}

// =============================================================================
// Return schema
// =============================================================================

/// One returned property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type")]
    pub json_type: JsonType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Property {
    pub fn new(name: &str, json_type: JsonType) -> Self {
        Self {
            name: name.into(),
            json_type,
            format: None,
            description: None,
        }
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Property describing a column as stored.
    pub fn from_column(column: &Column) -> Self {
        let mut prop = Property::new(&column.name, json_type(&column.data_type));
        prop.description = Some(
            column
                .description
                .clone()
                .unwrap_or_else(|| format!("{} field", column.name)),
        );
        if column.role == SemanticRole::Temporal
            && prop.json_type == JsonType::String
        {
            prop.format = Some(temporal_format(column).into());
        }
        prop
    }
}

/// Shape of an artifact's result: an array of objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnSchema {
    pub properties: Vec<Property>,
}

impl ReturnSchema {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl Serialize for ReturnSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Items<'a> {
            #[serde(rename = "type")]
            kind: &'static str,
            #[serde(skip_serializing_if = "PropertyMap::is_empty")]
            properties: PropertyMap<'a>,
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "array")?;
        map.serialize_entry(
            "items",
            &Items {
                kind: "object",
                properties: PropertyMap(&self.properties),
            },
        )?;
        map.end()
    }
}

/// Properties keyed by name, in declaration order.
struct PropertyMap<'a>(&'a [Property]);

impl PropertyMap<'_> {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PropertyMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for prop in self.0 {
            map.serialize_entry(&prop.name, prop)?;
        }
        map.end()
    }
}

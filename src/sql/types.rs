//! SQL-level data types.
//!
//! Column types arrive from the model graph as free text (`varchar(255)`,
//! `DECIMAL(18,2)`, `timestamp with time zone`, `integer[]`). This module
//! parses them into a closed enum so the classifier, the return-schema
//! mapping, and CAST emission agree on what a type means.

use std::fmt;

/// SQL-level data type.
///
/// # Examples
///
/// ```ignore
/// use scaffold::sql::types::DataType;
///
/// let parsed = DataType::parse("decimal(10,2)").unwrap();
/// assert_eq!(parsed, DataType::Decimal(10, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type.
    Bool,

    /// 16-bit signed integer (SMALLINT).
    Int16,

    /// 32-bit signed integer (INT/INTEGER).
    Int32,

    /// 64-bit signed integer (BIGINT).
    Int64,

    /// 32-bit floating point (REAL/FLOAT4).
    Float32,

    /// 64-bit floating point (DOUBLE PRECISION/FLOAT8).
    Float64,

    /// Fixed-precision decimal with precision and scale.
    Decimal(u8, u8),

    /// Variable-length string (TEXT, VARCHAR without limit).
    String,

    /// Fixed-length character string.
    Char(u16),

    /// Variable-length character string with maximum length.
    Varchar(u16),

    /// Date without time.
    Date,

    /// Time without date or timezone.
    Time,

    /// Timestamp without timezone.
    Timestamp,

    /// Timestamp with timezone.
    TimestampTz,

    /// Binary data (BLOB, BYTEA).
    Binary,

    /// JSON and other structured types (STRUCT, MAP).
    Json,

    /// Array / list of any element type.
    Array,

    /// UUID/GUID type.
    Uuid,
}

impl DataType {
    /// Parse a SQL data type from a string.
    ///
    /// Returns `None` for names this module does not recognize; callers fall
    /// back to substring heuristics in that case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        if s.ends_with("[]") || s.starts_with("array") || s.starts_with("list") {
            return Some(DataType::Array);
        }
        if s.starts_with("struct") || s.starts_with("map") {
            return Some(DataType::Json);
        }

        // Handle types with parameters first
        if let Some(inner) = extract_parens(&s, "decimal")
            .or_else(|| extract_parens(&s, "numeric"))
        {
            return parse_decimal_params(&inner);
        }

        if let Some(inner) = extract_parens(&s, "varchar")
            .or_else(|| extract_parens(&s, "character varying"))
            .or_else(|| extract_parens(&s, "nvarchar"))
        {
            return parse_length_param(&inner).map(DataType::Varchar);
        }

        if let Some(inner) = extract_parens(&s, "char")
            .or_else(|| extract_parens(&s, "character"))
            .or_else(|| extract_parens(&s, "nchar"))
        {
            return parse_length_param(&inner).map(DataType::Char);
        }

        if extract_parens(&s, "timestamp").is_some() {
            return Some(DataType::Timestamp);
        }

        match s.as_str() {
            "bool" | "boolean" | "bit" => Some(DataType::Bool),

            "tinyint" | "smallint" | "int2" | "smallserial" => Some(DataType::Int16),
            "int" | "integer" | "int4" | "serial" => Some(DataType::Int32),
            "bigint" | "int8" | "bigserial" | "hugeint" | "ubigint" => Some(DataType::Int64),

            "real" | "float4" => Some(DataType::Float32),
            "double" | "float8" | "double precision" | "float" => Some(DataType::Float64),

            "decimal" | "numeric" | "number" => Some(DataType::Decimal(18, 2)),
            "money" => Some(DataType::Decimal(19, 4)),

            "text" | "string" | "clob" | "varchar" | "nvarchar" | "character varying"
            | "char" | "bpchar" => Some(DataType::String),

            "date" => Some(DataType::Date),
            "time" => Some(DataType::Time),
            "timestamp" | "datetime" | "timestamp without time zone" | "timestamp_ns"
            | "timestamp_ms" | "timestamp_s" => Some(DataType::Timestamp),
            "timestamptz" | "timestamp with time zone" => Some(DataType::TimestampTz),

            "binary" | "blob" | "bytea" | "varbinary" => Some(DataType::Binary),
            "json" | "jsonb" => Some(DataType::Json),
            "uuid" | "guid" => Some(DataType::Uuid),

            _ => None,
        }
    }

    /// Returns true if this is a numeric type.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_fractional()
    }

    /// Returns true if this is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, DataType::Int16 | DataType::Int32 | DataType::Int64)
    }

    /// Returns true for floating point and decimal types.
    pub fn is_fractional(&self) -> bool {
        matches!(
            self,
            DataType::Float32 | DataType::Float64 | DataType::Decimal(_, _)
        )
    }

    /// Returns true if this is a string/text type.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            DataType::String | DataType::Char(_) | DataType::Varchar(_)
        )
    }

    /// Returns true if this is a temporal (date/time) type.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date | DataType::Time | DataType::Timestamp | DataType::TimestampTz
        )
    }

    /// Returns true if values of this type carry a time-of-day component.
    pub fn has_time_component(&self) -> bool {
        matches!(
            self,
            DataType::Time | DataType::Timestamp | DataType::TimestampTz
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Bool => write!(f, "BOOLEAN"),
            DataType::Int16 => write!(f, "SMALLINT"),
            DataType::Int32 => write!(f, "INTEGER"),
            DataType::Int64 => write!(f, "BIGINT"),
            DataType::Float32 => write!(f, "REAL"),
            DataType::Float64 => write!(f, "DOUBLE PRECISION"),
            DataType::Decimal(p, s) => write!(f, "DECIMAL({}, {})", p, s),
            DataType::String => write!(f, "TEXT"),
            DataType::Char(n) => write!(f, "CHAR({})", n),
            DataType::Varchar(n) => write!(f, "VARCHAR({})", n),
            DataType::Date => write!(f, "DATE"),
            DataType::Time => write!(f, "TIME"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::TimestampTz => write!(f, "TIMESTAMP WITH TIME ZONE"),
            DataType::Binary => write!(f, "BYTEA"),
            DataType::Json => write!(f, "JSON"),
            DataType::Array => write!(f, "JSON"),
            DataType::Uuid => write!(f, "UUID"),
        }
    }
}

/// Extract content inside parentheses for a given type prefix.
/// e.g., extract_parens("decimal(10,2)", "decimal") returns Some("10,2")
fn extract_parens(s: &str, prefix: &str) -> Option<String> {
    let s = s.trim();
    if !s.starts_with(prefix) {
        return None;
    }

    let rest = s[prefix.len()..].trim();
    if !rest.starts_with('(') || !rest.ends_with(')') {
        return None;
    }

    Some(rest[1..rest.len() - 1].to_string())
}

/// Parse decimal parameters "precision,scale" or "precision".
fn parse_decimal_params(inner: &str) -> Option<DataType> {
    let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();
    match parts.as_slice() {
        [p] => Some(DataType::Decimal(p.parse().ok()?, 0)),
        [p, s] => Some(DataType::Decimal(p.parse().ok()?, s.parse().ok()?)),
        _ => None,
    }
}

/// Parse a single length parameter.
fn parse_length_param(inner: &str) -> Option<u16> {
    let inner = inner.trim();
    if inner.eq_ignore_ascii_case("max") {
        return Some(u16::MAX);
    }
    inner.parse().ok()
}

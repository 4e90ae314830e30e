//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use crate::sql::token::{Token, TokenStream};
use crate::sql::types::DataType;

// =============================================================================
// Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: Postgres, DuckDB
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Format boolean as literal true/false.
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Standard `LIMIT n OFFSET m` with expression bounds.
pub fn emit_limit_offset_standard(
    limit: Option<&TokenStream>,
    offset: Option<&TokenStream>,
) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit).space().append(lim);
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset).space().append(off);
    }

    ts
}

// =============================================================================
// Data Types
// =============================================================================

/// ANSI spelling of a data type (used by Postgres).
pub fn emit_data_type_ansi(dt: &DataType) -> String {
    match dt {
        DataType::Float64 => "DOUBLE PRECISION".into(),
        DataType::Binary => "BYTEA".into(),
        other => other.to_string(),
    }
}

/// DuckDB spelling of a data type.
pub fn emit_data_type_duckdb(dt: &DataType) -> String {
    match dt {
        DataType::String => "VARCHAR".into(),
        DataType::Float64 => "DOUBLE".into(),
        DataType::Binary => "BLOB".into(),
        DataType::TimestampTz => "TIMESTAMPTZ".into(),
        other => other.to_string(),
    }
}

//! Syntax checks for rendered templates.
//!
//! Uses sqlparser-rs to parse emitted SQL so that a template which would be
//! rejected by the target engine is caught at generation time.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::dialect::{DuckDbDialect, PostgreSqlDialect};
use sqlparser::parser::Parser;

use super::dialect::Dialect;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern is valid")
});

/// Names of the `$name` placeholders in a rendered template, in order of
/// first appearance.
pub fn placeholders(sql: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for cap in PLACEHOLDER.captures_iter(sql) {
        let name = &cap[1];
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Replace every placeholder with `NULL`.
///
/// Parsers disagree on named-placeholder syntax; binding NULL keeps the
/// statement shape intact for a syntax check.
pub fn bind_nulls(sql: &str) -> String {
    PLACEHOLDER.replace_all(sql, "NULL").into_owned()
}

/// Validates that a SQL template is syntactically valid for the given dialect.
///
/// # Example
///
/// ```ignore
/// use scaffold::sql::validate::validate_sql;
/// use scaffold::sql::Dialect;
///
/// validate_sql("SELECT * FROM owners WHERE id = $OwnerId", Dialect::Postgres).unwrap();
/// ```
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let bound = bind_nulls(sql);
    let result = match dialect {
        Dialect::Postgres => Parser::parse_sql(&PostgreSqlDialect {}, &bound),
        Dialect::DuckDb => Parser::parse_sql(&DuckDbDialect {}, &bound),
    };

    result
        .map(|_| ())
        .map_err(|e| format!("invalid SQL for {}: {}", dialect, e))
}

//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that renders parameterized
//! templates for DuckDB and PostgreSQL. It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations
//! - [`types`] - Column type parsing
//! - [`validate`] - Syntax checks for rendered templates

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;
pub mod types;
pub mod validate;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    avg, case_when, cast, col, conjunction, count, count_distinct, count_star, func, lit_bool,
    lit_float, lit_int, lit_null, lit_str, max, min, param, paren, raw_sql, star, sum, table_col,
    table_star, BinaryOperator, Expr, ExprExt, Literal,
};
pub use query::{
    Join, LimitOffset, OrderByExpr, Query, SelectExpr, SetOperation, SortDir, TableRef,
    TableSource,
};
pub use token::{Token, TokenStream};
pub use types::DataType;

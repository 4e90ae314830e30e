//! Query template IR.
//!
//! A [`QueryTemplate`] keeps the parts of a generated query that carry
//! meaning apart until the last step:
//!
//! - `source` - the relation scanned
//! - `guards` - predicates that always apply
//! - `filters` - [`OptionalFilter`]s, each disabled by leaving its
//!   parameter unset
//! - `row_cap` - an optional [`RowCap`] bounding the scan
//! - `projection` - SELECT list, grouping, ordering and paging
//!
//! [`QueryTemplate::render`] is the only place SQL text is produced, so
//! which predicates are optional can be checked without string matching.

use crate::sql::{
    case_when, conjunction, lit_int, param, paren, Dialect, Expr, ExprExt, Query, TableRef,
};

/// Alias of the scan-bounding derived table.
pub const SCAN_ALIAS: &str = "scan";

/// A predicate that collapses to TRUE when its parameter is unset.
///
/// Renders as `($P IS NULL OR <predicate>)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalFilter {
    pub param: String,
    pub predicate: Expr,
}

impl OptionalFilter {
    pub fn new(param: &str, predicate: Expr) -> Self {
        Self {
            param: param.into(),
            predicate,
        }
    }

    pub fn to_expr(&self) -> Expr {
        paren(param(&self.param).is_null().or(self.predicate.clone()))
    }

    /// True when a request supplying `supplied` activates this filter.
    pub fn is_active(&self, supplied: &[&str]) -> bool {
        supplied.contains(&self.param.as_str())
    }
}

/// Asymmetric scan cap: small when no filter parameter is supplied, large
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCap {
    pub unfiltered: u64,
    pub filtered: u64,
    /// Parameters whose presence switches to the `filtered` cap.
    pub filter_params: Vec<String>,
}

impl RowCap {
    /// The cap a request supplying `supplied` runs under.
    pub fn cap_for(&self, supplied: &[&str]) -> u64 {
        if self
            .filter_params
            .iter()
            .any(|p| supplied.contains(&p.as_str()))
        {
            self.filtered
        } else {
            self.unfiltered
        }
    }

    /// `CASE WHEN $a IS NULL AND $b IS NULL THEN <unfiltered> ELSE <filtered> END`.
    pub fn limit_expr(&self) -> Expr {
        let all_unset = conjunction(
            self.filter_params
                .iter()
                .map(|p| param(p).is_null())
                .collect(),
        );
        match all_unset {
            Some(condition) => case_when(
                vec![(condition, lit_int(self.unfiltered as i64))],
                Some(lit_int(self.filtered as i64)),
            ),
            None => lit_int(self.unfiltered as i64),
        }
    }
}

/// Structured form of a generated query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTemplate {
    pub source: TableRef,
    pub filters: Vec<OptionalFilter>,
    pub guards: Vec<Expr>,
    pub row_cap: Option<RowCap>,
    /// Everything but FROM and WHERE. Its `from` is replaced on render.
    pub projection: Query,
}

impl QueryTemplate {
    pub fn new(source: TableRef, projection: Query) -> Self {
        Self {
            source,
            filters: vec![],
            guards: vec![],
            row_cap: None,
            projection,
        }
    }

    pub fn with_filters(mut self, filters: Vec<OptionalFilter>) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn with_guard(mut self, guard: Expr) -> Self {
        self.guards.push(guard);
        self
    }

    pub fn with_row_cap(mut self, cap: RowCap) -> Self {
        self.row_cap = Some(cap);
        self
    }

    /// Filters a request supplying `supplied` activates. None when nothing
    /// is supplied.
    pub fn active_filters(&self, supplied: &[&str]) -> Vec<&OptionalFilter> {
        self.filters.iter().filter(|f| f.is_active(supplied)).collect()
    }

    /// Assemble the final query.
    ///
    /// With a row cap the filtered scan becomes a derived table
    /// (`SELECT * ... LIMIT CASE ... END`) and the projection reads from it.
    pub fn to_query(&self) -> Query {
        let mut conditions = self.guards.clone();
        conditions.extend(self.filters.iter().map(OptionalFilter::to_expr));
        let predicate = conjunction(conditions);

        let mut query = self.projection.clone();
        match &self.row_cap {
            Some(cap) => {
                let mut scan = Query::new().select_star().from(self.source.clone());
                if let Some(predicate) = predicate {
                    scan = scan.filter(predicate);
                }
                scan = scan.limit_expr(cap.limit_expr());
                query.from = Some(TableRef::subquery(scan, SCAN_ALIAS));
            }
            None => {
                query.from = Some(self.source.clone());
                if let Some(predicate) = predicate {
                    query = query.filter(predicate);
                }
            }
        }
        query
    }

    /// Render SQL text for a dialect.
    pub fn render(&self, dialect: Dialect) -> String {
        self.to_query().to_sql(dialect)
    }
}

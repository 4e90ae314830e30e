//! `find_<entity>`: filtered, paginated row search.

use super::artifact::{Artifact, ArtifactKind};
use super::context::EntityContext;
use super::schema::{json_type, temporal_format, JsonType, Parameter, ParameterList};
use super::template::{OptionalFilter, QueryTemplate};
use crate::semantic::{Column, SemanticRole};
use crate::sql::{
    cast, col, lit_int, lit_str, param, paren, DataType, Expr, ExprExt, OrderByExpr, Query,
};

pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "page_size";

/// How a column is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    DateRange,
    Enumerated,
    Exact,
    NumericRange,
    Partial,
}

fn match_kind(column: &Column) -> Match {
    if column.role == SemanticRole::Temporal {
        Match::DateRange
    } else if column.is_enumerated() {
        Match::Enumerated
    } else if column.is_boolean_typed() {
        Match::Exact
    } else if matches!(
        column.role,
        SemanticRole::Identifier | SemanticRole::BusinessStatus
    ) {
        if column.is_string_typed() {
            Match::Partial
        } else {
            Match::Exact
        }
    } else if matches!(column.role, SemanticRole::Metric | SemanticRole::Monetary)
        || column.is_numeric_typed()
    {
        Match::NumericRange
    } else if column.is_string_typed() || column.parsed_type().is_none() {
        Match::Partial
    } else {
        Match::Exact
    }
}

pub fn build(ctx: &EntityContext<'_>) -> Option<Artifact> {
    let entity = ctx.entity;
    let mut params = ParameterList::new();
    let mut filters = Vec::new();

    for column in &entity.columns {
        let Some(name) = ctx.param_name(column) else {
            continue;
        };
        filters.extend(column_filters(ctx, column, name, &mut params));
    }

    params.add(
        Parameter::integer(PAGE, "Page number, starting at 1")
            .with_default(1)
            .with_range(Some(1), None),
    );
    params.add(
        Parameter::integer(PAGE_SIZE, "Rows per page")
            .with_default(ctx.settings.default_page_size)
            .with_range(Some(1), Some(ctx.settings.max_page_size as i64)),
    );

    let mut projection = Query::new().select_star();
    if let Some(order) = ctx.order_column() {
        projection = projection.order_by(vec![OrderByExpr::desc(col(&order.name))]);
    }
    let offset = paren(paren(param(PAGE).sub(lit_int(1))).mul(param(PAGE_SIZE)));
    projection = projection.limit_expr(param(PAGE_SIZE)).offset_expr(offset);

    let template = QueryTemplate::new(ctx.source(), projection).with_filters(filters);
    Some(ctx.finish(
        ArtifactKind::Search,
        format!("find_{}", entity.name),
        format!("Search {} with optional filters and pagination", entity.name),
        params,
        ctx.return_schema(),
        template,
    ))
}

fn column_filters(
    ctx: &EntityContext<'_>,
    column: &Column,
    name: &str,
    params: &mut ParameterList,
) -> Vec<OptionalFilter> {
    let target = col(&column.name);
    match match_kind(column) {
        Match::DateRange => {
            let format = temporal_format(column);
            let as_type = if format == "date" {
                DataType::Date
            } else {
                DataType::Timestamp
            };
            let target = match column.parsed_type() {
                Some(dt) if dt.is_temporal() => target,
                _ => cast(target, as_type.clone()),
            };
            let from = format!("{}From", name);
            let to = format!("{}To", name);
            if !params.is_free(&[&from, &to]) {
                return vec![];
            }
            params.add(
                Parameter::string(&from, &format!("{} on or after", column.name))
                    .with_format(format)
                    .optional(),
            );
            params.add(
                Parameter::string(&to, &format!("{} on or before", column.name))
                    .with_format(format)
                    .optional(),
            );
            vec![
                OptionalFilter::new(
                    &from,
                    target.clone().gte(cast(param(&from), as_type.clone())),
                ),
                OptionalFilter::new(&to, target.lte(cast(param(&to), as_type))),
            ]
        }
        Match::Enumerated => {
            let parameter = Parameter::string(name, &format!("Filter by {}", column.name))
                .with_enum(&column.enum_values)
                .optional();
            exact(params, parameter, target, name)
        }
        Match::Exact => {
            let parameter = Parameter::new(
                name,
                json_type(&column.data_type),
                &format!("Filter by {}", column.name),
            )
            .optional();
            exact(params, parameter, target, name)
        }
        Match::NumericRange => {
            let min = format!("{}Min", name);
            let max = format!("{}Max", name);
            if !params.is_free(&[&min, &max]) {
                return vec![];
            }
            let number = match json_type(&column.data_type) {
                JsonType::Integer => JsonType::Integer,
                _ => JsonType::Number,
            };
            params.add(
                Parameter::new(&min, number, &format!("Minimum {}", column.name)).optional(),
            );
            params.add(
                Parameter::new(&max, number, &format!("Maximum {}", column.name)).optional(),
            );
            let value = ctx.numeric_expr(column);
            vec![
                OptionalFilter::new(&min, value.clone().gte(param(&min))),
                OptionalFilter::new(&max, value.lte(param(&max))),
            ]
        }
        Match::Partial => {
            let parameter = Parameter::string(
                name,
                &format!("Partial, case-insensitive match on {}", column.name),
            )
            .optional();
            if !params.add(parameter) {
                return vec![];
            }
            let pattern = lit_str("%").concat(param(name)).concat(lit_str("%"));
            vec![OptionalFilter::new(name, ctx.text_expr(column).ilike(pattern))]
        }
    }
}

fn exact(
    params: &mut ParameterList,
    parameter: Parameter,
    target: Expr,
    name: &str,
) -> Vec<OptionalFilter> {
    if params.add(parameter) {
        vec![OptionalFilter::new(name, target.eq(param(name)))]
    } else {
        vec![]
    }
}

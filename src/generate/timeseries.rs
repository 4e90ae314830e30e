//! `timeseries_<entity>`: row counts per period over a selectable temporal
//! column.

use super::artifact::{Artifact, ArtifactKind};
use super::context::{count_property, EntityContext};
use super::schema::{JsonType, Parameter, ParameterList, Property, ReturnSchema};
use super::template::{OptionalFilter, QueryTemplate};
use crate::semantic::{Column, SemanticRole};
use crate::sql::{
    case_when, cast, col, count_distinct, count_star, func, lit_str, param, DataType, Expr,
    ExprExt, OrderByExpr, Query,
};

pub const TIME_FIELD: &str = "timeField";
pub const GRANULARITY: &str = "granularity";
pub const START_DATE: &str = "startDate";
pub const END_DATE: &str = "endDate";
pub const PERIOD: &str = "period";

pub const GRANULARITIES: [&str; 5] = ["day", "week", "month", "quarter", "year"];
pub const DEFAULT_GRANULARITY: &str = "month";

/// Timestamp-valued expression for a temporal column.
fn timestamp_expr(column: &Column) -> Expr {
    match column.parsed_type() {
        Some(dt) if dt.is_temporal() => col(&column.name),
        _ => cast(col(&column.name), DataType::Timestamp),
    }
}

pub fn build(ctx: &EntityContext<'_>) -> Option<Artifact> {
    let entity = ctx.entity;
    let temporal: Vec<&Column> = entity.columns_with_role(SemanticRole::Temporal).collect();
    let Some(first) = temporal.first() else {
        tracing::debug!(entity = %entity.name, "no temporal columns, time series skipped");
        return None;
    };
    let pk = ctx.primary_key()?;

    let mut params = ParameterList::new();
    let names: Vec<&str> = temporal.iter().map(|c| c.name.as_str()).collect();
    params.add(
        Parameter::string(TIME_FIELD, "Temporal column to bucket by")
            .with_enum(&names)
            .with_default(first.name.as_str()),
    );
    params.add(
        Parameter::string(GRANULARITY, "Period size")
            .with_enum(&GRANULARITIES)
            .with_default(DEFAULT_GRANULARITY),
    );
    params.add(
        Parameter::string(START_DATE, "Only rows on or after this date")
            .with_format("date")
            .optional(),
    );
    params.add(
        Parameter::string(END_DATE, "Only rows on or before this date")
            .with_format("date")
            .optional(),
    );

    let field = case_when(
        temporal
            .iter()
            .map(|c| (param(TIME_FIELD).eq(lit_str(&c.name)), timestamp_expr(c)))
            .collect(),
        Some(timestamp_expr(first)),
    );
    let period = func("DATE_TRUNC", vec![param(GRANULARITY), field.clone()]);

    let mut filters = vec![
        OptionalFilter::new(
            START_DATE,
            field.clone().gte(cast(param(START_DATE), DataType::Date)),
        ),
        OptionalFilter::new(
            END_DATE,
            field.clone().lte(cast(param(END_DATE), DataType::Date)),
        ),
    ];
    filters.extend(ctx.common_filters(&mut params));

    let projection = Query::new()
        .select(vec![
            period.clone().alias(PERIOD),
            count_star().alias("count"),
            count_distinct(col(&pk.name)).alias("unique_count"),
        ])
        .group_by(vec![period])
        .order_by(vec![OrderByExpr::desc(col(PERIOD))]);

    let template = QueryTemplate::new(ctx.source(), projection)
        .with_guard(field.is_not_null())
        .with_filters(filters);

    let returns = ReturnSchema::new(vec![
        Property::new(PERIOD, JsonType::String).with_format("date-time"),
        count_property("count", "Rows in the period"),
        count_property("unique_count", &format!("Distinct {} in the period", pk.name)),
    ]);

    Some(ctx.finish(
        ArtifactKind::Timeseries,
        format!("timeseries_{}", entity.name),
        format!("{} over time", entity.name),
        params,
        returns,
        template,
    ))
}

//! `analyze_<entity>_metrics`: SUM/AVG/MAX of metric columns, optionally
//! broken down by one dimension.

use super::artifact::{Artifact, ArtifactKind};
use super::context::{count_property, text_property, EntityContext};
use super::schema::{JsonType, Parameter, ParameterList, Property, ReturnSchema};
use super::template::QueryTemplate;
use crate::semantic::{Column, SemanticRole};
use crate::sql::{
    avg, case_when, col, count_star, lit_str, max, param, sum, ExprExt, OrderByExpr, Query,
    SelectExpr,
};

pub const GROUP_BY: &str = "groupBy";
pub const DIMENSION: &str = "dimension";
pub const RECORD_COUNT: &str = "record_count";

pub fn build(ctx: &EntityContext<'_>) -> Option<Artifact> {
    let entity = ctx.entity;
    let metrics: Vec<&Column> = entity
        .columns_with_role(SemanticRole::Metric)
        .take(ctx.settings.max_metrics)
        .collect();
    if metrics.is_empty() {
        tracing::debug!(entity = %entity.name, "no metric columns, metrics analysis skipped");
        return None;
    }

    let dimensions: Vec<&Column> = ctx
        .columns_with_roles(&[
            SemanticRole::Categorical,
            SemanticRole::Geographic,
            SemanticRole::Temporal,
        ])
        .filter(|c| !c.is_coordinate())
        .take(ctx.settings.max_metric_dimensions)
        .collect();

    let mut params = ParameterList::new();
    let mut select: Vec<SelectExpr> = Vec::new();
    let mut returns = Vec::new();
    let mut group_by = Vec::new();

    // A constant GROUP BY is rejected by Postgres, so without dimensions the
    // query aggregates over the whole scan instead.
    if !dimensions.is_empty() {
        let names: Vec<&str> = dimensions.iter().map(|c| c.name.as_str()).collect();
        params.add(
            Parameter::string(GROUP_BY, "Dimension to break metrics down by")
                .with_enum(&names)
                .optional(),
        );
        let dimension = case_when(
            dimensions
                .iter()
                .map(|c| (param(GROUP_BY).eq(lit_str(&c.name)), ctx.text_expr(c)))
                .collect(),
            Some(lit_str("All")),
        );
        select.push(dimension.clone().alias(DIMENSION));
        group_by.push(dimension);
        returns.push(text_property(
            DIMENSION,
            "Value of the selected dimension, or 'All'",
        ));
    }

    select.push(count_star().alias(RECORD_COUNT));
    returns.push(count_property(RECORD_COUNT, "Number of rows"));
    for metric in &metrics {
        let value = ctx.numeric_expr(metric);
        for (prefix, aggregate) in [
            ("total", sum(value.clone())),
            ("avg", avg(value.clone())),
            ("max", max(value.clone())),
        ] {
            let alias = format!("{}_{}", prefix, metric.name);
            let mut prop = Property::new(&alias, JsonType::Number);
            prop.description = Some(format!("{} of {}", prefix, metric.name));
            returns.push(prop);
            select.push(aggregate.alias(&alias));
        }
    }

    let filters = ctx.common_filters(&mut params);
    let row_cap = ctx.row_cap(&filters);

    let projection = Query::new()
        .select(select)
        .group_by(group_by)
        .order_by(vec![OrderByExpr::desc(col(RECORD_COUNT))])
        .limit(ctx.settings.result_limit);

    let template = QueryTemplate::new(ctx.source(), projection)
        .with_filters(filters)
        .with_row_cap(row_cap);

    Some(ctx.finish(
        ArtifactKind::Metrics,
        format!("analyze_{}_metrics", entity.name),
        format!("Analyze {} metrics by dimension", entity.name),
        params,
        ReturnSchema::new(returns),
        template,
    ))
}

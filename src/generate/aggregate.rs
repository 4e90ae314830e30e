//! `aggregate_<entity>`: counts grouped by any subset of dimensions.
//!
//! Each groupable column gets a `groupBy<Name>` switch. A switched-off
//! dimension collapses to the literal `'All'`, so one template serves every
//! combination of groupings.

use super::artifact::{Artifact, ArtifactKind};
use super::context::{count_property, text_property, EntityContext};
use super::schema::{Parameter, ParameterList, ReturnSchema};
use super::template::QueryTemplate;
use crate::semantic::{Column, Entity, SemanticRole};
use crate::sql::{
    case_when, col, count_distinct, count_star, lit_str, param, ExprExt, OrderByExpr, Query,
    SelectExpr,
};

pub const TOTAL_COUNT: &str = "total_count";
pub const UNIQUE_COUNT: &str = "unique_count";

/// Columns worth grouping by: categorical and status columns first, then
/// free-text columns that are neither descriptive nor identifiers.
///
/// The extra text columns only ride along; without a categorical or status
/// column no aggregate is built.
pub fn groupable_columns<'a>(ctx: &EntityContext<'a>) -> Vec<&'a Column> {
    let entity: &'a Entity = ctx.entity;
    let mut columns: Vec<&'a Column> = ctx
        .columns_with_roles(&[SemanticRole::Categorical, SemanticRole::BusinessStatus])
        .collect();
    columns.extend(entity.columns.iter().filter(|c| {
        c.is_string_typed()
            && !matches!(
                c.role,
                SemanticRole::Descriptive
                    | SemanticRole::Identifier
                    | SemanticRole::Categorical
                    | SemanticRole::BusinessStatus
            )
    }));
    columns
}

pub fn build(ctx: &EntityContext<'_>) -> Option<Artifact> {
    let entity = ctx.entity;
    let pk = ctx.primary_key()?;
    if ctx
        .columns_with_roles(&[SemanticRole::Categorical, SemanticRole::BusinessStatus])
        .next()
        .is_none()
    {
        tracing::debug!(entity = %entity.name, "no categorical or status columns, aggregate skipped");
        return None;
    }

    let mut params = ParameterList::new();
    let mut dimensions = Vec::new();
    for column in groupable_columns(ctx) {
        let Some(name) = ctx.param_name(column) else {
            continue;
        };
        let switch = format!("groupBy{}", name);
        let added = params.add(
            Parameter::boolean(&switch, &format!("Group results by {}", column.name))
                .with_default(false),
        );
        if added {
            dimensions.push((column, switch));
        }
    }
    if dimensions.is_empty() {
        tracing::debug!(entity = %entity.name, "no groupable columns, aggregate skipped");
        return None;
    }

    let filters = ctx.common_filters(&mut params);
    let row_cap = ctx.row_cap(&filters);

    let mut select: Vec<SelectExpr> = Vec::new();
    let mut group_by = Vec::new();
    let mut returns = Vec::new();
    for (column, switch) in &dimensions {
        let dimension = case_when(
            vec![(param(switch), ctx.text_expr(column))],
            Some(lit_str("All")),
        );
        select.push(dimension.clone().alias(&column.name));
        group_by.push(dimension);
        returns.push(text_property(
            &column.name,
            &format!("{} value, or 'All' when not grouped", column.name),
        ));
    }
    select.push(count_star().alias(TOTAL_COUNT));
    select.push(count_distinct(col(&pk.name)).alias(UNIQUE_COUNT));
    returns.push(count_property(TOTAL_COUNT, "Number of rows"));
    returns.push(count_property(
        UNIQUE_COUNT,
        &format!("Number of distinct {}", pk.name),
    ));

    let projection = Query::new()
        .select(select)
        .group_by(group_by)
        .order_by(vec![OrderByExpr::desc(col(TOTAL_COUNT))])
        .limit(ctx.settings.result_limit);

    let template = QueryTemplate::new(ctx.source(), projection)
        .with_filters(filters)
        .with_row_cap(row_cap);

    Some(ctx.finish(
        ArtifactKind::Aggregate,
        format!("aggregate_{}", entity.name),
        format!("Count {} grouped by selected dimensions", entity.name),
        params,
        ReturnSchema::new(returns),
        template,
    ))
}

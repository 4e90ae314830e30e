//! `list_<entity>_values`: distinct values of a categorical column.

use super::artifact::{Artifact, ArtifactKind};
use super::context::{count_property, text_property, EntityContext};
use super::schema::{Parameter, ParameterList, ReturnSchema};
use super::template::QueryTemplate;
use crate::semantic::{Column, SemanticRole};
use crate::sql::{
    case_when, col, count_star, lit_null, lit_str, param, ExprExt, OrderByExpr, Query,
};

pub const FIELD: &str = "field";
pub const INCLUDE_COUNTS: &str = "includeCounts";
pub const VALUE: &str = "value";

pub fn build(ctx: &EntityContext<'_>) -> Option<Artifact> {
    let entity = ctx.entity;
    let categorical: Vec<&Column> = entity
        .columns_with_role(SemanticRole::Categorical)
        .collect();
    let Some(first) = categorical.first() else {
        tracing::debug!(entity = %entity.name, "no categorical columns, listing skipped");
        return None;
    };

    let mut params = ParameterList::new();
    let names: Vec<&str> = categorical.iter().map(|c| c.name.as_str()).collect();
    params.add(
        Parameter::string(FIELD, "Column to list values of")
            .with_enum(&names)
            .with_default(first.name.as_str()),
    );
    params.add(
        Parameter::boolean(INCLUDE_COUNTS, "Include the row count per value").with_default(true),
    );

    let value = case_when(
        categorical
            .iter()
            .map(|c| (param(FIELD).eq(lit_str(&c.name)), ctx.text_expr(c)))
            .collect(),
        Some(ctx.text_expr(first)),
    );
    let count = case_when(vec![(param(INCLUDE_COUNTS), count_star())], Some(lit_null()));

    let projection = Query::new()
        .select(vec![value.clone().alias(VALUE), count.alias("count")])
        .group_by(vec![value.clone()])
        .order_by(vec![
            OrderByExpr::desc(count_star()),
            OrderByExpr::asc(col(VALUE)),
        ]);

    let template =
        QueryTemplate::new(ctx.source(), projection).with_guard(value.is_not_null());

    let returns = ReturnSchema::new(vec![
        text_property(VALUE, "Distinct value of the selected column"),
        count_property("count", "Rows with the value, when counts are included"),
    ]);

    Some(ctx.finish(
        ArtifactKind::Listing,
        format!("list_{}_values", entity.name),
        format!("Distinct categorical values of {}", entity.name),
        params,
        returns,
        template,
    ))
}

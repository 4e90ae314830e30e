//! `get_<entity>_with_<target>`: one artifact per resolved relationship.

use super::artifact::{Artifact, ArtifactKind};
use super::context::{source_table, EntityContext};
use super::schema::{json_type, Parameter, ParameterList, Property, ReturnSchema};
use super::template::{OptionalFilter, QueryTemplate};
use crate::semantic::{Entity, Relationship};
use crate::sql::{conjunction, param, table_col, table_star, ExprExt, Query, SelectExpr};

const OWNER: &str = "a";
const TARGET: &str = "b";

pub fn build(ctx: &EntityContext<'_>, entities: &[Entity]) -> Vec<Artifact> {
    ctx.entity
        .relationships
        .iter()
        .filter_map(|(key, rel)| {
            let Some(target) = entities.iter().find(|e| e.name == rel.to_entity) else {
                tracing::debug!(relationship = %key, "navigation target missing");
                return None;
            };
            build_one(ctx, key, rel, target)
        })
        .collect()
}

/// `get_<entity>_with_<target>`, with `_via_<column>` for a secondary link
/// to the same target.
pub fn artifact_name(key: &str, rel: &Relationship) -> String {
    let base = format!("get_{}_with_{}", rel.from_entity, rel.to_entity);
    if key == format!("{}_to_{}", rel.from_entity, rel.to_entity) {
        base
    } else {
        format!("{}_via_{}", base, rel.from_column())
    }
}

fn build_one(
    ctx: &EntityContext<'_>,
    key: &str,
    rel: &Relationship,
    target: &Entity,
) -> Option<Artifact> {
    let entity = ctx.entity;
    let on = conjunction(
        rel.join_keys
            .iter()
            .map(|k| table_col(OWNER, &k.from).eq(table_col(TARGET, &k.to)))
            .collect(),
    )?;

    let mut select: Vec<SelectExpr> = vec![SelectExpr::new(table_star(OWNER))];
    let mut returns = ctx.return_schema().properties;
    for column in &target.columns {
        if rel.join_keys.iter().any(|k| k.to == column.name) {
            continue;
        }
        let clashes = entity.column(&column.name).is_some();
        let alias = if clashes {
            format!("{}_{}", target.name, column.name)
        } else {
            column.name.clone()
        };
        let expr = table_col(TARGET, &column.name);
        select.push(if clashes {
            expr.alias(&alias)
        } else {
            SelectExpr::new(expr)
        });
        if returns.len() < ctx.settings.max_return_properties {
            let mut prop = Property::from_column(column);
            prop.name = alias;
            returns.push(prop);
        }
    }

    let mut params = ParameterList::new();
    let mut filters = Vec::new();
    if let Some(pk) = ctx.primary_key() {
        if let Some(name) = ctx.param_name(pk) {
            params.add(
                Parameter::new(
                    name,
                    json_type(&pk.data_type),
                    &format!("Only the {} row with this {}", entity.name, pk.name),
                )
                .optional(),
            );
            filters.push(OptionalFilter::new(
                name,
                table_col(OWNER, &pk.name).eq(param(name)),
            ));
        }
    }

    let projection = Query::new()
        .select(select)
        .left_join(
            source_table(target, ctx.settings).with_alias(TARGET),
            on,
        )
        .limit(ctx.settings.result_limit);

    let template =
        QueryTemplate::new(ctx.source().with_alias(OWNER), projection).with_filters(filters);

    Some(ctx.finish(
        ArtifactKind::Navigation,
        artifact_name(key, rel),
        format!("{} with their related {}", entity.name, target.name),
        params,
        ReturnSchema::new(returns),
        template,
    ))
}

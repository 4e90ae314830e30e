//! `geo_<entity>`: counts per location with optional coordinate statistics
//! and a bounding box.

use super::artifact::{Artifact, ArtifactKind};
use super::context::{count_property, text_property, EntityContext};
use super::schema::{JsonType, Parameter, ParameterList, Property, ReturnSchema};
use super::template::{OptionalFilter, QueryTemplate};
use crate::semantic::classifier::{is_latitude, is_longitude};
use crate::semantic::{Column, SemanticRole};
use crate::sql::{
    avg, case_when, col, count_distinct, count_star, lit_null, lit_str, max, min, param,
    ExprExt, OrderByExpr, Query, SelectExpr,
};

pub const GROUP_BY_FIELD: &str = "groupByField";
pub const INCLUDE_COORDINATES: &str = "includeCoordinates";
pub const LOCATION: &str = "location";

/// Latitude and longitude columns: the first name match, else the
/// configured fallback names.
pub fn coordinate_columns(ctx: &EntityContext<'_>) -> (String, String) {
    let find = |pred: fn(&str) -> bool, fallback: &str| {
        ctx.entity
            .columns
            .iter()
            .find(|c| pred(&c.name))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| fallback.to_string())
    };
    (
        find(is_latitude, &ctx.settings.latitude_fallback),
        find(is_longitude, &ctx.settings.longitude_fallback),
    )
}

pub fn build(ctx: &EntityContext<'_>) -> Option<Artifact> {
    let entity = ctx.entity;
    let locations: Vec<&Column> = entity
        .columns_with_role(SemanticRole::Geographic)
        .filter(|c| !c.is_coordinate())
        .collect();
    let Some(first) = locations.first() else {
        tracing::debug!(entity = %entity.name, "no location columns, geographic skipped");
        return None;
    };
    let pk = ctx.primary_key()?;
    let (latitude, longitude) = coordinate_columns(ctx);

    let mut params = ParameterList::new();
    let names: Vec<&str> = locations.iter().map(|c| c.name.as_str()).collect();
    params.add(
        Parameter::string(GROUP_BY_FIELD, "Location column to group by")
            .with_enum(&names)
            .with_default(first.name.as_str()),
    );
    params.add(
        Parameter::boolean(INCLUDE_COORDINATES, "Include coordinate statistics")
            .with_default(false),
    );

    let mut filters = Vec::new();
    let bounds = [
        ("minLat", "Southern bound", &latitude, true),
        ("maxLat", "Northern bound", &latitude, false),
        ("minLon", "Western bound", &longitude, true),
        ("maxLon", "Eastern bound", &longitude, false),
    ];
    for (name, description, column, lower) in bounds {
        params.add(Parameter::number(name, description).optional());
        let predicate = if lower {
            col(column).gte(param(name))
        } else {
            col(column).lte(param(name))
        };
        filters.push(OptionalFilter::new(name, predicate));
    }

    let location = case_when(
        locations
            .iter()
            .map(|c| (param(GROUP_BY_FIELD).eq(lit_str(&c.name)), ctx.text_expr(c)))
            .collect(),
        Some(ctx.text_expr(first)),
    );

    let mut select: Vec<SelectExpr> = vec![
        location.clone().alias(LOCATION),
        count_star().alias("count"),
        count_distinct(col(&pk.name)).alias("unique_count"),
    ];
    let mut returns = vec![
        text_property(LOCATION, "Value of the selected location column"),
        count_property("count", "Rows at the location"),
        count_property("unique_count", &format!("Distinct {} at the location", pk.name)),
    ];
    for (axis, column) in [("latitude", &latitude), ("longitude", &longitude)] {
        for (prefix, aggregate) in [
            ("avg", avg(col(column))),
            ("min", min(col(column))),
            ("max", max(col(column))),
        ] {
            let alias = format!("{}_{}", prefix, axis);
            let gated = case_when(vec![(param(INCLUDE_COORDINATES), aggregate)], Some(lit_null()));
            select.push(gated.alias(&alias));
            let mut prop = Property::new(&alias, JsonType::Number);
            prop.description = Some(format!("{} {} when coordinates are included", prefix, axis));
            returns.push(prop);
        }
    }

    let projection = Query::new()
        .select(select)
        .group_by(vec![location.clone()])
        .order_by(vec![OrderByExpr::desc(col("count"))])
        .limit(ctx.settings.result_limit);

    let template = QueryTemplate::new(ctx.source(), projection)
        .with_guard(location.is_not_null())
        .with_filters(filters);

    Some(ctx.finish(
        ArtifactKind::Geographic,
        format!("geo_{}", entity.name),
        format!("{} by location", entity.name),
        params,
        ReturnSchema::new(returns),
        template,
    ))
}

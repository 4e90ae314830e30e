//! Fixed, parameterless views published next to the artifacts.
//!
//! - `active_<entity>` - rows in an active-like state
//! - `<entity>_metrics_summary` - whole-table metric totals
//! - `business_entities_overview` - record counts across entities

use serde::Serialize;

use super::context::{source_table, EntityContext};
use crate::config::GenerationSettings;
use crate::semantic::{Column, Entity, SemanticRole};
use crate::sql::{
    avg, case_when, cast, col, conjunction, count_distinct, count_star, lit_bool, lit_int,
    lit_null, lit_str, max, raw_sql, sum, DataType, Expr, ExprExt, OrderByExpr, Query,
    SetOperation, TableRef,
};

/// Enum values containing one of these words mark an active row.
pub const ACTIVE_WORDS: [&str; 11] = [
    "active",
    "enabled",
    "current",
    "valid",
    "open",
    "live",
    "published",
    "approved",
    "confirmed",
    "available",
    "running",
];

/// Summaries are only worth publishing when some dimension has a small
/// declared value set.
const MAX_SUMMARY_CARDINALITY: usize = 20;

pub const OVERVIEW: &str = "business_entities_overview";

/// A named, parameterless query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub name: String,
    pub uri: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip)]
    pub query: Query,
    pub sql: String,
}

impl Resource {
    fn new(
        name: String,
        uri: String,
        description: String,
        entity: Option<&str>,
        query: Query,
        settings: &GenerationSettings,
    ) -> Self {
        let sql = query.to_sql(settings.dialect);
        tracing::debug!(resource = %name, %uri, "built resource");
        Self {
            name,
            uri,
            description,
            entity: entity.map(str::to_string),
            query,
            sql,
        }
    }
}

// =============================================================================
// Active records
// =============================================================================

/// True when any word of the value is an active-like word.
///
/// Matching is by whole word, so `Inactive` and `Invalid` are not active.
pub fn is_active_value(value: &str) -> bool {
    value
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| ACTIVE_WORDS.contains(&word))
}

fn is_status_name(name: &str) -> bool {
    let name = name.to_lowercase();
    ["status", "state", "active", "enabled"]
        .iter()
        .any(|p| name.contains(p))
}

/// Predicates selecting active rows.
///
/// Status columns with active-like enum values and boolean `is_`/`has_`
/// flags come first; expiry dates are only consulted when neither exists.
pub fn active_conditions(entity: &Entity) -> Vec<Expr> {
    let mut conditions = Vec::new();
    for column in &entity.columns {
        let status_like = column.role == SemanticRole::BusinessStatus
            || (column.role == SemanticRole::Categorical && is_status_name(&column.name));
        if !status_like {
            continue;
        }

        if column.is_enumerated() {
            let active: Vec<Expr> = column
                .enum_values
                .iter()
                .filter(|v| is_active_value(v))
                .map(|v| lit_str(v))
                .collect();
            if !active.is_empty() && is_status_name(&column.name) {
                conditions.push(col(&column.name).in_list(active));
            }
        } else if column.is_boolean_typed() {
            let name = column.name.to_lowercase();
            if name.starts_with("is_") || name.starts_with("has_") {
                conditions.push(col(&column.name).eq(lit_bool(true)));
            }
        }
    }

    if conditions.is_empty() {
        conditions.extend(
            entity
                .columns_with_role(SemanticRole::Temporal)
                .filter(|c| is_expiry_date(c))
                .map(|c| col(&c.name).gt(raw_sql("CURRENT_DATE"))),
        );
    }
    conditions
}

fn is_expiry_date(column: &Column) -> bool {
    let name = column.name.to_lowercase();
    matches!(column.parsed_type(), Some(DataType::Date))
        && (name.contains("exp") || name.contains("end"))
}

pub fn active_resource(ctx: &EntityContext<'_>) -> Option<Resource> {
    let entity = ctx.entity;
    let Some(predicate) = conjunction(active_conditions(entity)) else {
        tracing::debug!(entity = %entity.name, "no active-state columns, resource skipped");
        return None;
    };

    let order = entity
        .columns_with_role(SemanticRole::Temporal)
        .find(|c| c.name.to_lowercase().contains("created"))
        .map(|c| OrderByExpr::desc(col(&c.name)))
        .or_else(|| ctx.primary_key().map(|pk| OrderByExpr::new(col(&pk.name))));

    let mut query = Query::new()
        .select_star()
        .from(ctx.source())
        .filter(predicate)
        .limit(ctx.settings.max_page_size);
    if let Some(order) = order {
        query = query.order_by(vec![order]);
    }

    Some(Resource::new(
        format!("active_{}", entity.name),
        format!("data://active/{}", entity.name),
        format!("Currently active {} records", entity.name),
        Some(&entity.name),
        query,
        ctx.settings,
    ))
}

// =============================================================================
// Metrics summary
// =============================================================================

pub fn metrics_summary_resource(ctx: &EntityContext<'_>) -> Option<Resource> {
    let entity = ctx.entity;
    let metrics: Vec<&Column> = entity
        .columns_with_role(SemanticRole::Metric)
        .take(ctx.settings.max_metrics)
        .collect();
    let pk = ctx.primary_key()?;
    let has_small_dimension = ctx
        .columns_with_roles(&[SemanticRole::Categorical, SemanticRole::Geographic])
        .any(|c| c.is_enumerated() && c.enum_values.len() < MAX_SUMMARY_CARDINALITY);
    if metrics.is_empty() || !has_small_dimension {
        return None;
    }

    let mut select = vec![
        lit_str("Summary").alias("metric_type"),
        count_star().alias("total_count"),
    ];
    for metric in metrics {
        let value = ctx.numeric_expr(metric);
        select.push(sum(value.clone()).alias(&format!("total_{}", metric.name)));
        select.push(avg(value.clone()).alias(&format!("avg_{}", metric.name)));
        let positive = case_when(vec![(value.gt(lit_int(0)), col(&pk.name))], None);
        select.push(count_distinct(positive).alias(&format!("count_with_{}", metric.name)));
    }

    let query = Query::new().select(select).from(ctx.source());
    Some(Resource::new(
        format!("{}_metrics_summary", entity.name),
        format!("data://summary/{}", entity.name),
        format!("Metric totals for {}", entity.name),
        Some(&entity.name),
        query,
        ctx.settings,
    ))
}

// =============================================================================
// Overview
// =============================================================================

/// Cross-entity record counts. Only produced for more than one entity.
pub fn overview_resource(entities: &[Entity], settings: &GenerationSettings) -> Option<Resource> {
    let usable: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.primary_key_column().is_some())
        .collect();
    if usable.len() < 2 {
        return None;
    }

    let parts: Vec<Query> = usable
        .iter()
        .map(|entity| {
            let latest = entity
                .columns_with_role(SemanticRole::Temporal)
                .find(|c| {
                    let name = c.name.to_lowercase();
                    ["created", "updated", "modified"]
                        .iter()
                        .any(|w| name.contains(w))
                })
                .map(|c| cast(max(col(&c.name)), DataType::Date))
                .unwrap_or_else(|| cast(lit_null(), DataType::Date));
            Query::new()
                .select(vec![
                    lit_str(&entity.name).alias("entity_type"),
                    count_distinct(col(&entity.primary_key)).alias("record_count"),
                    latest.alias("latest_record_date"),
                ])
                .from(source_table(entity, settings))
        })
        .collect();

    let union = SetOperation::union_all_of(parts)?;
    let query = Query::new()
        .select_star()
        .from(TableRef::subquery(union, "overview"))
        .order_by(vec![OrderByExpr::desc(col("record_count"))]);

    Some(Resource::new(
        OVERVIEW.into(),
        "data://overview".into(),
        "Record counts and latest activity across business entities".into(),
        None,
        query,
        settings,
    ))
}

//! Relationship resolution between entities.
//!
//! Second phase of the semantic pass: runs once every entity exists, reads
//! them all, and returns new entities with their relationship maps filled.
//!
//! For each identifier column, in order of precedence:
//!
//! 1. a declared relationship test whose target is a known entity and whose
//!    field exists there gives an explicit link on `(column, field)`;
//! 2. otherwise the column name is matched against the other entities'
//!    names (plural or singular). The longest match wins; two distinct
//!    targets matching at the same length are ambiguous and dropped. The
//!    link joins `(column, target primary key)`.
//!
//! Anything that cannot be resolved is dropped with a `debug` log. A
//! partial relationship graph is a normal outcome.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use super::entity::{Column, Entity};
use super::inflection::singular_name;
use super::role::SemanticRole;

/// Relationship cardinality, from the owning entity's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cardinality {
    #[serde(rename = "many-to-one")]
    ManyToOne,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::ManyToOne => write!(f, "many-to-one"),
        }
    }
}

/// How a relationship was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipSource {
    /// From a declared relationship test.
    Explicit,
    /// From the column name containing the target entity's name.
    NameMatch,
}

/// One join column pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinKey {
    /// Column on the owning entity.
    pub from: String,
    /// Column on the target entity.
    pub to: String,
}

/// Directed link from one entity to another.
///
/// Always carries at least one join key, and every key names columns that
/// exist on both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub from_entity: String,
    pub to_entity: String,
    pub cardinality: Cardinality,
    pub source: RelationshipSource,
    pub join_keys: Vec<JoinKey>,
}

impl Relationship {
    /// The owning entity's column of the first join key.
    pub fn from_column(&self) -> &str {
        self.join_keys.first().map(|k| k.from.as_str()).unwrap_or_default()
    }
}

/// Resolve relationships for every entity.
pub fn resolve_relationships(entities: Vec<Entity>) -> Vec<Entity> {
    let resolved: Vec<Vec<Relationship>> = {
        let index = EntityIndex::new(&entities);
        entities
            .iter()
            .map(|entity| {
                entity
                    .columns_with_role(SemanticRole::Identifier)
                    .filter_map(|column| {
                        explicit_relationship(entity, column, &index, &entities)
                            .or_else(|| name_matched_relationship(entity, column, &entities))
                    })
                    .collect()
            })
            .collect()
    };

    let total: usize = resolved.iter().map(Vec::len).sum();
    tracing::info!(relationships = total, "resolved relationships");

    entities
        .into_iter()
        .zip(resolved)
        .map(|(mut entity, relationships)| {
            for rel in relationships {
                let key = relationship_key(&entity.relationships, &rel);
                entity.relationships.insert(key, rel);
            }
            entity
        })
        .collect()
}

/// `<entity>_to_<target>`, or `<entity>_to_<target>_via_<column>` when that
/// key is already taken.
fn relationship_key(existing: &BTreeMap<String, Relationship>, rel: &Relationship) -> String {
    let key = format!("{}_to_{}", rel.from_entity, rel.to_entity);
    if existing.contains_key(&key) {
        format!("{}_via_{}", key, rel.from_column())
    } else {
        key
    }
}

/// Lookup from model name or entity name to entity position.
struct EntityIndex<'a> {
    by_name: HashMap<&'a str, usize>,
}

impl<'a> EntityIndex<'a> {
    fn new(entities: &'a [Entity]) -> Self {
        let mut by_name = HashMap::new();
        for (i, e) in entities.iter().enumerate() {
            by_name.entry(e.model.as_str()).or_insert(i);
            by_name.entry(e.name.as_str()).or_insert(i);
        }
        Self { by_name }
    }

    fn get(&self, table: &str) -> Option<usize> {
        self.by_name.get(table).copied()
    }
}

fn explicit_relationship(
    entity: &Entity,
    column: &Column,
    index: &EntityIndex<'_>,
    entities: &[Entity],
) -> Option<Relationship> {
    for test in &column.relationships {
        let Some(target) = index.get(&test.to_table).map(|i| &entities[i]) else {
            tracing::debug!(
                entity = %entity.name,
                column = %column.name,
                target = %test.to_table,
                "relationship target is not a known entity"
            );
            continue;
        };
        if target.column(&test.field).is_none() {
            tracing::debug!(
                entity = %entity.name,
                column = %column.name,
                target = %target.name,
                field = %test.field,
                "relationship field does not exist on target"
            );
            continue;
        }
        return Some(Relationship {
            from_entity: entity.name.clone(),
            to_entity: target.name.clone(),
            cardinality: Cardinality::ManyToOne,
            source: RelationshipSource::Explicit,
            join_keys: vec![JoinKey {
                from: column.name.clone(),
                to: test.field.clone(),
            }],
        });
    }
    None
}

fn name_matched_relationship(
    entity: &Entity,
    column: &Column,
    entities: &[Entity],
) -> Option<Relationship> {
    let target = match_target(&column.name, &entity.name, entities)?;
    if target.primary_key_column().is_none() {
        tracing::debug!(
            entity = %entity.name,
            column = %column.name,
            target = %target.name,
            "name-matched target has no primary key"
        );
        return None;
    }

    Some(Relationship {
        from_entity: entity.name.clone(),
        to_entity: target.name.clone(),
        cardinality: Cardinality::ManyToOne,
        source: RelationshipSource::NameMatch,
        join_keys: vec![JoinKey {
            from: column.name.clone(),
            to: target.primary_key.clone(),
        }],
    })
}

/// The other entity whose name (or singular form) is the longest one
/// contained in `column`. `None` when nothing matches or when the longest
/// match is shared by two different entities.
pub fn match_target<'a>(column: &str, owner: &str, entities: &'a [Entity]) -> Option<&'a Entity> {
    let column = column.to_lowercase();

    let mut best: Option<(usize, &Entity)> = None;
    let mut tied = false;
    for candidate in entities.iter().filter(|e| e.name != owner) {
        let plural = candidate.name.to_lowercase();
        let singular = singular_name(&plural);
        let Some(len) = [plural.as_str(), singular.as_str()]
            .iter()
            .filter(|form| !form.is_empty() && column.contains(*form))
            .map(|form| form.len())
            .max()
        else {
            continue;
        };

        match best {
            Some((best_len, _)) if len < best_len => {}
            Some((best_len, _)) if len == best_len => tied = true,
            _ => {
                best = Some((len, candidate));
                tied = false;
            }
        }
    }

    match best {
        Some((_, target)) if !tied => Some(target),
        Some((len, _)) => {
            tracing::debug!(%column, owner, length = len, "ambiguous name match dropped");
            None
        }
        None => None,
    }
}

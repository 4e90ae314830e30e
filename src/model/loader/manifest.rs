//! dbt `manifest.json` loader.
//!
//! Two passes over `nodes`: model nodes under the configured paths become
//! tables, then test nodes attach to the columns they were declared on.
//! Node order in the file is kept, so the resulting graph is stable.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{LoadError, LoadResult};
use crate::config::LoaderSettings;
use crate::model::{ColumnModel, ColumnTest, ModelGraph, RelationshipTest, TableModel};

static REF_ARGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ref\(([^)]*)\)").expect("ref pattern is valid"));
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).expect("quoted pattern is valid"));

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNode {
    resource_type: String,
    name: Option<String>,
    alias: Option<String>,
    schema: Option<String>,
    path: String,
    original_file_path: String,
    description: Option<String>,
    tags: Vec<String>,
    columns: Map<String, Value>,
    test_metadata: Option<RawTestMetadata>,
    attached_node: Option<String>,
    column_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTestMetadata {
    name: String,
    kwargs: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawColumn {
    name: Option<String>,
    data_type: Option<String>,
    description: Option<String>,
    meta: RawColumnMeta,
    is_primary_key: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawColumnMeta {
    classification: Option<String>,
    is_primary_key: bool,
}

/// A column test waiting to be attached to `model.column`.
struct PendingTest {
    model: String,
    column: String,
    test: ColumnTest,
}

/// Parse a manifest document into a model graph.
pub fn parse_manifest(content: &str, options: &LoaderSettings) -> LoadResult<ModelGraph> {
    let root: Value = serde_json::from_str(content)?;

    let nodes = match root.get("nodes") {
        None | Some(Value::Null) => return Err(LoadError::MissingSection("nodes".into())),
        Some(Value::Object(map)) => map,
        Some(_) => {
            return Err(LoadError::InvalidSection {
                section: "nodes".into(),
                message: "must be an object".into(),
            })
        }
    };

    let mut graph = ModelGraph::new();
    let mut pending = Vec::new();

    for (id, value) in nodes {
        let node: RawNode = match serde_json::from_value(value.clone()) {
            Ok(node) => node,
            Err(e) => {
                tracing::warn!(node = %id, error = %e, "skipping malformed manifest node");
                continue;
            }
        };

        match node.resource_type.as_str() {
            "model" if in_scope(&node, options) => {
                graph.tables.push(table_from_node(id, node, options));
            }
            "test" => {
                if let Some(test) = test_from_node(&node) {
                    pending.push(test);
                }
            }
            _ => {}
        }
    }

    let mut attached = 0usize;
    for PendingTest {
        model,
        column,
        test,
    } in pending
    {
        let Some(table) = graph.tables.iter_mut().find(|t| t.name == model) else {
            tracing::debug!(%model, %column, "test attached to a model outside the graph");
            continue;
        };
        let Some(col) = table.column_mut(&column) else {
            tracing::debug!(%model, %column, "test attached to an undeclared column");
            continue;
        };
        col.tests.push(test);
        attached += 1;
    }

    tracing::info!(
        tables = graph.tables.len(),
        tests = attached,
        "parsed manifest"
    );
    Ok(graph)
}

fn in_scope(node: &RawNode, options: &LoaderSettings) -> bool {
    options.path_filters.is_empty()
        || options.path_filters.iter().any(|filter| {
            node.path.contains(filter.as_str()) || node.original_file_path.contains(filter.as_str())
        })
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

fn table_from_node(id: &str, node: RawNode, options: &LoaderSettings) -> TableModel {
    let name = node
        .name
        .clone()
        .unwrap_or_else(|| id.rsplit('.').next().unwrap_or(id).to_string());
    let relation = non_empty(node.alias).unwrap_or_else(|| name.clone());

    let columns = node
        .columns
        .into_iter()
        .map(|(key, value)| {
            let raw: RawColumn = serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::debug!(model = %name, column = %key, error = %e, "column metadata unreadable");
                RawColumn::default()
            });
            let mut column = ColumnModel::new(
                &non_empty(raw.name).unwrap_or(key),
                &raw.data_type.unwrap_or_default(),
            );
            column.description = non_empty(raw.description);
            column.meta.classification = non_empty(raw.meta.classification);
            column.meta.is_primary_key = raw.is_primary_key || raw.meta.is_primary_key;
            column
        })
        .collect();

    TableModel {
        name,
        relation,
        schema: Some(non_empty(node.schema).unwrap_or_else(|| options.default_schema.clone())),
        description: non_empty(node.description),
        tags: node.tags,
        columns,
    }
}

/// Model name a test node belongs to.
///
/// `attached_node` looks like `model.<project>.<model>[.<version>]`; older
/// manifests only carry the `model` kwarg with a `ref(...)`.
fn attached_model(node: &RawNode, kwargs: &Map<String, Value>) -> Option<String> {
    if let Some(attached) = &node.attached_node {
        let parts: Vec<&str> = attached.split('.').collect();
        if parts.len() >= 3 {
            return Some(parts[2].to_string());
        }
    }
    kwargs
        .get("model")
        .and_then(Value::as_str)
        .and_then(ref_target)
}

/// Extract the model from `ref('x')`, `ref('package', 'x')` or
/// `ref('x', version='2')`: the last quoted positional argument.
fn ref_target(expr: &str) -> Option<String> {
    let args = REF_ARGS.captures(expr)?;
    args[1]
        .split(',')
        .take_while(|arg| !arg.contains('='))
        .filter_map(|arg| QUOTED.captures(arg).map(|cap| cap[1].to_string()))
        .last()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn test_from_node(node: &RawNode) -> Option<PendingTest> {
    let metadata = node.test_metadata.as_ref()?;
    let kwargs = &metadata.kwargs;

    let model = attached_model(node, kwargs)?;
    let column = node
        .column_name
        .clone()
        .or_else(|| kwargs.get("column_name").and_then(Value::as_str).map(String::from))?;

    let test = match metadata.name.as_str() {
        "unique" => ColumnTest::Unique,
        "not_null" => ColumnTest::NotNull,
        "accepted_values" => {
            let values: Vec<String> = kwargs
                .get("values")
                .and_then(Value::as_array)
                .map(|vals| vals.iter().map(value_to_string).collect())
                .unwrap_or_default();
            if values.is_empty() {
                return None;
            }
            ColumnTest::AcceptedValues { values }
        }
        "relationships" => {
            let to_table = kwargs.get("to").and_then(Value::as_str).and_then(ref_target)?;
            let field = kwargs.get("field").and_then(Value::as_str)?;
            if field.is_empty() {
                return None;
            }
            ColumnTest::Relationship(RelationshipTest::new(&to_table, field))
        }
        other => {
            tracing::debug!(test = %other, "ignoring unsupported test kind");
            return None;
        }
    };

    Some(PendingTest {
        model,
        column,
        test,
    })
}

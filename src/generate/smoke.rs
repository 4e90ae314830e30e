//! Smoke test cases for generated artifacts.
//!
//! Each artifact gets a `basic` case that should run and return rows, and,
//! when it declares parameters, an `invalid_params` case that should be
//! rejected by whatever executes it.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::artifact::Artifact;
use super::schema::{JsonType, Parameter};

pub const INVALID_PARAM: &str = "invalid_param";

/// What a smoke test expects from running the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Runs successfully and returns at least one row.
    Results,
    /// Rejected before or during execution.
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmokeTest {
    pub name: String,
    pub artifact: String,
    pub description: String,
    pub arguments: Map<String, Value>,
    pub expect: Expectation,
}

/// Smoke tests for one artifact.
pub fn smoke_tests(artifact: &Artifact) -> Vec<SmokeTest> {
    let mut tests = vec![SmokeTest {
        name: format!("test_{}_basic", artifact.name),
        artifact: artifact.name.clone(),
        description: format!("{} runs with sample parameters", artifact.name),
        arguments: basic_arguments(&artifact.parameters),
        expect: Expectation::Results,
    }];

    if !artifact.parameters.is_empty() {
        let mut arguments = Map::new();
        arguments.insert(INVALID_PARAM.into(), json!("test"));
        tests.push(SmokeTest {
            name: format!("test_{}_invalid_params", artifact.name),
            artifact: artifact.name.clone(),
            description: format!("{} rejects unknown parameters", artifact.name),
            arguments,
            expect: Expectation::Error,
        });
    }
    tests
}

/// Arguments for the basic case: declared defaults, optional filters left
/// unset, samples for required parameters.
pub fn basic_arguments(parameters: &[Parameter]) -> Map<String, Value> {
    parameters
        .iter()
        .filter(|p| !p.is_optional())
        .map(|p| {
            let value = p.default.clone().unwrap_or_else(|| sample_value(p));
            (p.name.clone(), value)
        })
        .collect()
}

/// A plausible value for a parameter: its first enum value, else a sample
/// of its type.
pub fn sample_value(param: &Parameter) -> Value {
    if let Some(first) = param
        .enum_values
        .as_ref()
        .and_then(|values| values.iter().find(|v| !v.is_null()))
    {
        return first.clone();
    }
    match (param.json_type, param.format.as_deref()) {
        (JsonType::String, Some("date")) => json!("2024-01-01"),
        (JsonType::String, Some("date-time")) => json!("2024-01-01T00:00:00"),
        (JsonType::String, _) => json!("test_value"),
        (JsonType::Integer, _) => json!(param.minimum.unwrap_or(1)),
        (JsonType::Number, _) => json!(1),
        (JsonType::Boolean, _) => json!(true),
        (JsonType::Array, _) => json!([]),
        (JsonType::Object, _) => json!({}),
    }
}

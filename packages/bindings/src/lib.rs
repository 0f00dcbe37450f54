use napi::Result as NapiResult;
use napi_derive::napi;

use debt_scenarios_core::amortization::PayoffPolicy;
use debt_scenarios_core::scenario::compose_snapshot;
use debt_scenarios_core::types::CustomerSnapshot;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn run(input_json: &str, with_breakdown: bool) -> NapiResult<serde_json::Value> {
    let snapshot: CustomerSnapshot = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = compose_snapshot(&snapshot, &PayoffPolicy::default(), with_breakdown)
        .map_err(to_napi_error)?;
    serde_json::to_value(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenario comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let value = run(&input_json, false)?;
    serde_json::to_string(&value).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios_with_breakdown(input_json: String) -> NapiResult<String> {
    let value = run(&input_json, true)?;
    serde_json::to_string(&value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Single scenarios
// ---------------------------------------------------------------------------

fn single_scenario(input_json: String, which: &str) -> NapiResult<String> {
    let mut value = run(&input_json, false)?;
    let scenario = value
        .get_mut("result")
        .and_then(|r| r.get_mut(which))
        .map(serde_json::Value::take)
        .ok_or_else(|| napi::Error::from_reason(format!("missing scenario '{which}'")))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("result".into(), scenario);
    }
    serde_json::to_string(&value).map_err(to_napi_error)
}

#[napi]
pub fn minimum_scenario(input_json: String) -> NapiResult<String> {
    single_scenario(input_json, "minimum")
}

#[napi]
pub fn optimized_scenario(input_json: String) -> NapiResult<String> {
    single_scenario(input_json, "optimized")
}

#[napi]
pub fn consolidation_scenario(input_json: String) -> NapiResult<String> {
    single_scenario(input_json, "consolidation")
}

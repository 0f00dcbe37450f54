pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The engine's `result` field: either the three-scenario comparison or a
/// single scenario object.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// True when the result holds the full comparison rather than one scenario.
pub(crate) fn is_comparison(result: &Value) -> bool {
    result.get("minimum").is_some()
}

pub(crate) const SCENARIO_KEYS: [&str; 3] = ["minimum", "optimized", "consolidation"];

pub(crate) const SCENARIO_FIELDS: [&str; 6] = [
    "kind",
    "total_monthly_payment",
    "total_payoff_months",
    "total_interest",
    "total_payments",
    "savings_vs_minimum",
];

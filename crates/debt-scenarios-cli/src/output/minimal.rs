use serde_json::Value;

use super::{is_comparison, result_of};

/// Print just the headline answer: the savings figure.
///
/// For a comparison that is the optimized scenario's savings against the
/// minimum baseline; for a single scenario, its own savings field. Falls back
/// to the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    let headline = if is_comparison(result) {
        result
            .get("optimized")
            .and_then(|s| s.get("savings_vs_minimum"))
    } else {
        result.get("savings_vs_minimum")
    };

    if let Some(val) = headline {
        println!("{}", format_minimal(val));
        return;
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

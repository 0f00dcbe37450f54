use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{is_comparison, result_of, SCENARIO_FIELDS, SCENARIO_KEYS};

/// Format scenario output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let result = result_of(value);

    if is_comparison(result) {
        print_comparison(result);
    } else if result.get("payment_plans").is_some() {
        print_scenario(result);
    } else {
        print_flat_object(result);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// One row per scenario, one column per headline figure.
fn print_comparison(result: &Value) {
    let mut builder = Builder::default();
    builder.push_record([
        "Scenario",
        "Monthly",
        "Months",
        "Interest",
        "Payments",
        "Savings vs minimum",
    ]);
    for key in SCENARIO_KEYS {
        if let Some(scenario) = result.get(key) {
            builder.push_record(scenario_row(key, scenario));
        }
    }
    println!("{}", Table::from(builder));

    for key in SCENARIO_KEYS {
        if let Some(Value::String(desc)) = result.get(key).and_then(|s| s.get("description")) {
            println!("{}: {}", key, desc);
        }
    }
}

fn print_scenario(scenario: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for field in SCENARIO_FIELDS {
        if let Some(val) = scenario.get(field) {
            builder.push_record([field.to_string(), format_value(val)]);
        }
    }
    println!("{}", Table::from(builder));

    if let Some(Value::Array(plans)) = scenario.get("payment_plans") {
        let mut builder = Builder::default();
        builder.push_record(["Debt", "Monthly", "Months", "Interest", "Payments"]);
        for plan in plans {
            builder.push_record([
                field_str(plan, "debt_id"),
                field_str(plan, "monthly_payment"),
                field_str(plan, "payoff_months"),
                field_str(plan, "total_interest"),
                field_str(plan, "total_payments"),
            ]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::String(desc)) = scenario.get("description") {
        println!("{}", desc);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.clone(), format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", value);
    }
}

fn scenario_row(key: &str, scenario: &Value) -> [String; 6] {
    [
        key.to_string(),
        field_str(scenario, "total_monthly_payment"),
        field_str(scenario, "total_payoff_months"),
        field_str(scenario, "total_interest"),
        field_str(scenario, "total_payments"),
        field_str(scenario, "savings_vs_minimum"),
    ]
}

fn field_str(value: &Value, field: &str) -> String {
    value.get(field).map(format_value).unwrap_or_default()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

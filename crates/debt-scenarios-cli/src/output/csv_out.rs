use serde_json::Value;

use super::{is_comparison, result_of, SCENARIO_KEYS};

/// Format scenario output as CSV on stdout: one row per scenario for a
/// comparison, one row per payment plan for a single scenario.
pub fn print_csv(value: &Value) {
    let result = result_of(value);
    let mut writer = csv::Writer::from_writer(std::io::stdout());

    let outcome = if is_comparison(result) {
        write_scenario_rows(&mut writer, result)
    } else {
        write_plan_rows(&mut writer, result)
    };

    if let Err(e) = outcome.and_then(|_| writer.flush().map_err(Into::into)) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_scenario_rows(
    writer: &mut csv::Writer<std::io::Stdout>,
    result: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    writer.write_record([
        "scenario",
        "total_monthly_payment",
        "total_payoff_months",
        "total_interest",
        "total_payments",
        "savings_vs_minimum",
    ])?;
    for key in SCENARIO_KEYS {
        if let Some(scenario) = result.get(key) {
            writer.write_record([
                key.to_string(),
                cell(scenario, "total_monthly_payment"),
                cell(scenario, "total_payoff_months"),
                cell(scenario, "total_interest"),
                cell(scenario, "total_payments"),
                cell(scenario, "savings_vs_minimum"),
            ])?;
        }
    }
    Ok(())
}

fn write_plan_rows(
    writer: &mut csv::Writer<std::io::Stdout>,
    scenario: &Value,
) -> Result<(), Box<dyn std::error::Error>> {
    writer.write_record([
        "debt_id",
        "monthly_payment",
        "payoff_months",
        "total_interest",
        "total_payments",
    ])?;
    if let Some(Value::Array(plans)) = scenario.get("payment_plans") {
        for plan in plans {
            writer.write_record([
                cell(plan, "debt_id"),
                cell(plan, "monthly_payment"),
                cell(plan, "payoff_months"),
                cell(plan, "total_interest"),
                cell(plan, "total_payments"),
            ])?;
        }
    }
    Ok(())
}

fn cell(value: &Value, field: &str) -> String {
    match value.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

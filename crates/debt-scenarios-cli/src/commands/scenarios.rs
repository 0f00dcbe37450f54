use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_scenarios_core::amortization::PayoffPolicy;
use debt_scenarios_core::scenario::compose_snapshot;
use debt_scenarios_core::types::CustomerSnapshot;

use crate::input;

/// Arguments shared by all scenario commands
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to a JSON customer snapshot (debts, cashflow, offers)
    #[arg(long)]
    pub input: Option<String>,

    /// Include the month-by-month payment breakdown in each plan
    #[arg(long)]
    pub breakdown: bool,

    /// Simulation horizon in months
    #[arg(long)]
    pub horizon_months: Option<u32>,

    /// Interest multiple reported for debts that never amortize
    #[arg(long)]
    pub penalty_factor: Option<Decimal>,
}

pub fn run_compare(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (snapshot, payoff, breakdown) = prepare(args)?;
    let output = compose_snapshot(&snapshot, &payoff, breakdown)?;
    Ok(serde_json::to_value(output)?)
}

/// Run the full comparison and keep a single scenario from it. The minimum
/// baseline is always computed regardless, since the savings fields refer to
/// it.
pub fn run_single(args: ScenarioArgs, which: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = run_compare(args)?;
    let scenario = value
        .get_mut("result")
        .and_then(|r| r.get_mut(which))
        .map(Value::take)
        .ok_or_else(|| format!("missing scenario '{which}' in engine output"))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("result".into(), scenario);
    }
    Ok(value)
}

fn prepare(
    args: ScenarioArgs,
) -> Result<(CustomerSnapshot, PayoffPolicy, bool), Box<dyn std::error::Error>> {
    let snapshot: CustomerSnapshot = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("no input: provide --input <file> or pipe a JSON snapshot to stdin".into());
    };

    let mut payoff = PayoffPolicy::default();
    if let Some(horizon) = args.horizon_months {
        payoff.horizon_months = horizon;
    }
    if let Some(factor) = args.penalty_factor {
        payoff.non_amortizing_penalty_factor = factor;
    }

    Ok((snapshot, payoff, args.breakdown))
}

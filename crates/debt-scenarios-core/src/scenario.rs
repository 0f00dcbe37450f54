//! Scenario composition: the three canonical strategies side by side.
//!
//! The minimum scenario is always computed first; it is the baseline the
//! other two reference for their savings figures. Savings are the
//! total-payments difference against that baseline.

use std::time::Instant;

use crate::amortization::{self, PayoffPolicy};
use crate::avalanche;
use crate::consolidation;
use crate::types::{
    with_metadata, CashflowProfile, ComputationOutput, CustomerSnapshot, DebtItem, OfferBook,
    PaymentPlan, ScenarioKind, ScenarioResult,
};
use crate::DebtScenarioResult;

/// The three scenarios for one customer snapshot.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScenarioComparison {
    pub minimum: ScenarioResult,
    pub optimized: ScenarioResult,
    pub consolidation: ScenarioResult,
}

/// Minimum-payment baseline: every debt on its own contractual minimum.
pub fn minimum_scenario(
    debts: &[DebtItem],
    payoff: &PayoffPolicy,
    with_breakdown: bool,
) -> ScenarioResult {
    let plans: Vec<PaymentPlan> = debts
        .iter()
        .map(|d| {
            amortization::simulate(d.balance, d.annual_rate_pct, &d.minimum, payoff, with_breakdown)
                .into_plan(&d.id)
        })
        .collect();
    ScenarioResult::from_plans(
        ScenarioKind::Minimum,
        plans,
        "Every debt is paid with its required minimum only.".into(),
    )
}

/// Compute the minimum, optimized and consolidation scenarios for one
/// customer snapshot.
///
/// Absent cashflow degrades the optimized scenario to the baseline; absent
/// offers degrade consolidation to the optimized plan. Both degradations are
/// stated in the scenario descriptions and surfaced as envelope warnings,
/// never silently.
pub fn compose(
    debts: &[DebtItem],
    cashflow: Option<&CashflowProfile>,
    offers: &OfferBook,
    payoff: &PayoffPolicy,
    with_breakdown: bool,
) -> DebtScenarioResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    for debt in debts {
        debt.validate()?;
    }

    let mut warnings: Vec<String> = Vec::new();
    let minimum = minimum_scenario(debts, payoff, with_breakdown);

    let budget = cashflow.map(CashflowProfile::conservative_cashflow);
    let mut optimized = match budget {
        Some(b) => avalanche::allocate(debts, b, payoff, with_breakdown),
        None => {
            warnings.push(
                "Cashflow data unavailable; the optimized scenario falls back to minimum payments."
                    .into(),
            );
            minimum.clone().relabeled(
                ScenarioKind::Optimized,
                "Cashflow data is unavailable, so no surplus can be allocated; the \
                 minimum-payment plan is shown."
                    .into(),
            )
        }
    };

    if offers.eligible.is_empty() {
        warnings.push(
            "No eligible consolidation offers; the consolidation scenario falls back to the \
             optimized plan."
                .into(),
        );
    }
    let mut consolidation = consolidation::fit(debts, offers, budget, payoff, with_breakdown);

    optimized.set_savings_against(&minimum);
    consolidation.set_savings_against(&minimum);

    let assumptions = serde_json::json!({
        "savings_convention": "total_payments_difference",
        "horizon_months": payoff.horizon_months,
        "sentinel_months": payoff.sentinel_months,
        "non_amortizing_penalty_factor": payoff.non_amortizing_penalty_factor.to_string(),
        "conservative_monthly_budget": budget.map(|b| b.to_string()),
    });
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Debt scenario comparison (minimum / avalanche / consolidation)",
        &assumptions,
        warnings,
        elapsed,
        ScenarioComparison {
            minimum,
            optimized,
            consolidation,
        },
    ))
}

/// Convenience entry point over a single read-consistent customer snapshot.
pub fn compose_snapshot(
    snapshot: &CustomerSnapshot,
    payoff: &PayoffPolicy,
    with_breakdown: bool,
) -> DebtScenarioResult<ComputationOutput<ScenarioComparison>> {
    compose(
        &snapshot.debts,
        snapshot.cashflow.as_ref(),
        &snapshot.offers,
        payoff,
        with_breakdown,
    )
}

//! Month-by-month payoff simulation for a single debt.
//!
//! Pure functions of their inputs; the caller's `DebtItem` snapshot is never
//! touched. Balances below [`PAYOFF_EPSILON`] count as paid off, and every
//! simulation is bounded by the payoff horizon in [`PayoffPolicy`].

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, MonthlyPaymentDetail, PaymentPlan, PaymentPolicy, RatePct};

/// Balances at or below this are treated as fully paid.
pub const PAYOFF_EPSILON: Decimal = dec!(0.01);

/// Simulation bounds and the non-amortizing penalty convention.
///
/// The penalty factor is a reporting policy, not a financial projection: a
/// debt whose payment never covers interest is reported with
/// `sentinel_months` and `balance * non_amortizing_penalty_factor` of
/// interest so that callers can recognise and flag it, never display it as a
/// real payoff date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffPolicy {
    pub horizon_months: u32,
    pub sentinel_months: u32,
    pub non_amortizing_penalty_factor: Decimal,
}

impl Default for PayoffPolicy {
    fn default() -> Self {
        PayoffPolicy {
            horizon_months: 600,
            sentinel_months: 999,
            non_amortizing_penalty_factor: dec!(10),
        }
    }
}

/// Outcome of simulating one debt under one payment policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffResult {
    pub months: u32,
    /// First-month payment; later months may differ for percentage minimums.
    pub first_payment: Money,
    pub total_interest: Money,
    pub total_payments: Money,
    /// False when the sentinel convention applies (payment never covers
    /// interest, or the horizon was exhausted).
    pub amortizes: bool,
    pub breakdown: Option<Vec<MonthlyPaymentDetail>>,
}

impl PayoffResult {
    pub fn into_plan(self, debt_id: impl Into<String>) -> PaymentPlan {
        PaymentPlan {
            debt_id: debt_id.into(),
            monthly_payment: self.first_payment,
            payoff_months: self.months,
            total_interest: self.total_interest,
            total_payments: self.total_payments,
            breakdown: self.breakdown,
        }
    }
}

/// Periodic rate for an annual percentage rate.
pub fn monthly_rate(annual_rate_pct: RatePct) -> Decimal {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// Standard amortizing-loan payment: `P * r(1+r)^n / ((1+r)^n - 1)`,
/// degenerating to `P / n` at zero rate.
pub fn annuity_payment(principal: Money, annual_rate_pct: RatePct, term_months: u32) -> Money {
    if term_months == 0 || principal <= Decimal::ZERO {
        return principal.max(Decimal::ZERO);
    }
    let r = monthly_rate(annual_rate_pct);
    if r.is_zero() {
        return principal / Decimal::from(term_months);
    }
    let growth = (Decimal::ONE + r).powd(Decimal::from(term_months));
    principal * r * growth / (growth - Decimal::ONE)
}

/// Simulate the payoff of one debt month by month.
///
/// Each month the payment due is re-derived from the policy (fixed, or
/// percentage of the live balance), interest accrues at the monthly rate,
/// and the remainder reduces principal. The final month pays only what is
/// owed, so `total_payments = total_interest + original balance` to within
/// rounding whenever the debt amortizes.
pub fn simulate(
    balance: Money,
    annual_rate_pct: RatePct,
    policy: &PaymentPolicy,
    payoff: &PayoffPolicy,
    with_breakdown: bool,
) -> PayoffResult {
    if balance <= PAYOFF_EPSILON {
        return PayoffResult {
            months: 0,
            first_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_payments: Decimal::ZERO,
            amortizes: true,
            breakdown: with_breakdown.then(Vec::new),
        };
    }

    let rate = monthly_rate(annual_rate_pct);
    let mut bal = balance;
    let mut months = 0u32;
    let mut total_interest = Decimal::ZERO;
    let mut total_payments = Decimal::ZERO;
    let mut first_payment: Option<Money> = None;
    let mut breakdown = with_breakdown.then(Vec::new);

    while bal > PAYOFF_EPSILON && months < payoff.horizon_months {
        months += 1;
        let payment_due = policy.payment_for(bal);
        let interest = bal * rate;

        if payment_due - interest <= Decimal::ZERO {
            // Never amortizes under this payment.
            return sentinel_result(balance, payment_due, payoff);
        }

        let principal = (payment_due - interest).min(bal);
        let cash = interest + principal;
        bal -= principal;
        total_interest += interest;
        total_payments += cash;
        first_payment.get_or_insert(payment_due);

        if let Some(ref mut rows) = breakdown {
            rows.push(MonthlyPaymentDetail {
                month: months,
                payment: cash,
                interest,
                principal,
                remaining_balance: bal,
            });
        }
    }

    if bal > PAYOFF_EPSILON {
        // Horizon exhausted without convergence; treat as non-amortizing.
        let due = policy.payment_for(bal);
        return sentinel_result(balance, first_payment.unwrap_or(due), payoff);
    }

    PayoffResult {
        months,
        first_payment: first_payment.unwrap_or(Decimal::ZERO),
        total_interest,
        total_payments,
        amortizes: true,
        breakdown,
    }
}

/// The sentinel convention for a debt that never pays off: signal months, a
/// punitive interest total, and no schedule. A deliberate signal value, not a
/// projection.
fn sentinel_result(original_balance: Money, payment: Money, payoff: &PayoffPolicy) -> PayoffResult {
    PayoffResult {
        months: payoff.sentinel_months,
        first_payment: payment,
        total_interest: original_balance * payoff.non_amortizing_penalty_factor,
        total_payments: payment * Decimal::from(payoff.sentinel_months),
        amortizes: false,
        breakdown: None,
    }
}

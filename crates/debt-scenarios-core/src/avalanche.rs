//! Cascading avalanche allocation of a monthly repayment budget.
//!
//! Every active debt receives its (re-derived) minimum each month; the whole
//! surplus goes to the single highest-priority open debt, never split. A
//! retired debt frees its minimum implicitly, because minimums are recomputed
//! from the live debt set every month.

use rust_decimal::Decimal;

use crate::amortization::{monthly_rate, PayoffPolicy, PAYOFF_EPSILON};
use crate::priority;
use crate::scenario;
use crate::types::{DebtItem, Money, MonthlyPaymentDetail, PaymentPlan, ScenarioKind, ScenarioResult};

/// Private working ledger for one debt during the cascade.
#[derive(Debug)]
struct DebtLedger {
    balance: Money,
    rate: Decimal,
    paid_off_month: Option<u32>,
    total_interest: Money,
    total_paid: Money,
    first_payment: Option<Money>,
    breakdown: Option<Vec<MonthlyPaymentDetail>>,
}

impl DebtLedger {
    fn active(&self) -> bool {
        self.paid_off_month.is_none() && self.balance > PAYOFF_EPSILON
    }
}

/// Simulate the avalanche strategy for the whole debt set under one monthly
/// budget (the customer's risk-adjusted disposable cashflow).
///
/// A budget that does not exceed the first-month minimums degenerates to the
/// minimum-payment scenario, reported explicitly in the description.
pub fn allocate(
    debts: &[DebtItem],
    monthly_budget: Money,
    payoff: &PayoffPolicy,
    with_breakdown: bool,
) -> ScenarioResult {
    let budget = monthly_budget.max(Decimal::ZERO);
    let first_minimums: Money = debts
        .iter()
        .filter(|d| d.balance > PAYOFF_EPSILON)
        .map(|d| d.minimum_payment())
        .sum();

    if budget <= first_minimums {
        return scenario::minimum_scenario(debts, payoff, with_breakdown).relabeled(
            ScenarioKind::Optimized,
            "No extra cashflow available beyond the required minimums; the plan \
             matches the minimum-payment scenario."
                .into(),
        );
    }

    let order = priority::rank_descending(debts);
    let mut ledgers: Vec<DebtLedger> = debts
        .iter()
        .map(|d| DebtLedger {
            balance: d.balance,
            rate: monthly_rate(d.annual_rate_pct),
            paid_off_month: if d.balance > PAYOFF_EPSILON {
                None
            } else {
                Some(0)
            },
            total_interest: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            first_payment: None,
            breakdown: with_breakdown.then(Vec::new),
        })
        .collect();

    let mut month = 0u32;
    while month < payoff.horizon_months && ledgers.iter().any(DebtLedger::active) {
        month += 1;
        let mut spent = Decimal::ZERO;

        // Minimums first, on every open debt.
        for (debt, ledger) in debts.iter().zip(ledgers.iter_mut()) {
            if !ledger.active() {
                continue;
            }
            let payment_due = debt.minimum.payment_for(ledger.balance);
            let interest = ledger.balance * ledger.rate;
            // Negative principal lets the balance grow when the minimum does
            // not cover interest; the horizon cap bounds that case.
            let principal = (payment_due - interest).min(ledger.balance);
            let cash = interest + principal;

            ledger.balance -= principal;
            ledger.total_interest += interest;
            ledger.total_paid += cash;
            ledger.first_payment.get_or_insert(payment_due);
            spent += cash;

            if let Some(ref mut rows) = ledger.breakdown {
                rows.push(MonthlyPaymentDetail {
                    month,
                    payment: cash,
                    interest,
                    principal,
                    remaining_balance: ledger.balance,
                });
            }
        }

        // The entire surplus targets the top-priority open debt; it is never
        // split, even when it retires that debt mid-month.
        let surplus = budget - spent;
        if surplus > Decimal::ZERO {
            if let Some(target) = order.iter().copied().find(|&i| ledgers[i].active()) {
                let ledger = &mut ledgers[target];
                let extra = surplus.min(ledger.balance);
                ledger.balance -= extra;
                ledger.total_paid += extra;
                if month == 1 {
                    if let Some(fp) = ledger.first_payment.as_mut() {
                        *fp += extra;
                    }
                }
                if let Some(ref mut rows) = ledger.breakdown {
                    if let Some(row) = rows.last_mut() {
                        row.payment += extra;
                        row.principal += extra;
                        row.remaining_balance = ledger.balance;
                    }
                }
            }
        }

        for ledger in ledgers.iter_mut() {
            if ledger.paid_off_month.is_none() && ledger.balance <= PAYOFF_EPSILON {
                ledger.paid_off_month = Some(month);
            }
        }
    }

    let extra = (budget - first_minimums).round_dp(2);
    let plans: Vec<PaymentPlan> = order
        .iter()
        .map(|&i| ledger_into_plan(&debts[i], &mut ledgers[i], payoff))
        .collect();

    ScenarioResult::from_plans(
        ScenarioKind::Optimized,
        plans,
        format!(
            "Avalanche plan: minimums on every debt, with {extra}/month of \
             surplus cashflow concentrated on the highest-priority open debt."
        ),
    )
}

fn ledger_into_plan(debt: &DebtItem, ledger: &mut DebtLedger, payoff: &PayoffPolicy) -> PaymentPlan {
    match ledger.paid_off_month {
        Some(month) => PaymentPlan {
            debt_id: debt.id.clone(),
            monthly_payment: ledger.first_payment.unwrap_or(Decimal::ZERO),
            payoff_months: month,
            total_interest: ledger.total_interest,
            total_payments: ledger.total_paid,
            breakdown: ledger.breakdown.take(),
        },
        // Horizon exhausted: sentinel convention, mirroring the simulator.
        None => {
            let first = ledger.first_payment.unwrap_or(Decimal::ZERO);
            PaymentPlan {
                debt_id: debt.id.clone(),
                monthly_payment: first,
                payoff_months: payoff.sentinel_months,
                total_interest: debt.balance * payoff.non_amortizing_penalty_factor,
                total_payments: first * Decimal::from(payoff.sentinel_months),
                breakdown: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DebtKind, PaymentPolicy};
    use rust_decimal_macros::dec;

    fn two_debts() -> Vec<DebtItem> {
        vec![
            DebtItem::card("CARD", dec!(5000), dec!(24), dec!(3), dec!(25), 0),
            DebtItem::loan("LOAN", dec!(8000), dec!(10), 24, false, 0),
        ]
    }

    #[test]
    fn test_surplus_goes_to_single_top_debt() {
        let debts = vec![
            DebtItem::loan("HIGH", dec!(4000), dec!(20), 24, false, 0),
            DebtItem::loan("LOW", dec!(4000), dec!(8), 24, false, 0),
        ];
        let result = allocate(&debts, dec!(800), &PayoffPolicy::default(), true);

        // In every month before HIGH retires, only HIGH pays above its fixed
        // minimum; the surplus is never split.
        let high_min = debts[0].minimum_payment();
        let low_min = debts[1].minimum_payment();
        let high = result.payment_plans.iter().find(|p| p.debt_id == "HIGH").unwrap();
        let low = result.payment_plans.iter().find(|p| p.debt_id == "LOW").unwrap();
        for row in high.breakdown.as_ref().unwrap().iter().take(high.payoff_months as usize - 1) {
            assert!(row.payment > high_min);
        }
        for row in low.breakdown.as_ref().unwrap().iter().take(high.payoff_months as usize - 1) {
            assert!((row.payment - low_min).abs() < dec!(0.01));
        }
    }

    #[test]
    fn test_freed_minimum_cascades_to_next_debt() {
        let debts = two_debts();
        let result = allocate(&debts, dec!(1000), &PayoffPolicy::default(), true);

        let card = result.payment_plans.iter().find(|p| p.debt_id == "CARD").unwrap();
        let loan = result.payment_plans.iter().find(|p| p.debt_id == "LOAN").unwrap();
        assert!(card.payoff_months < loan.payoff_months);

        // After the card retires, the loan receives the whole budget.
        let rows = loan.breakdown.as_ref().unwrap();
        let after = &rows[card.payoff_months as usize];
        assert!(after.payment > debts[1].minimum_payment());
    }

    #[test]
    fn test_budget_below_minimums_degenerates() {
        let debts = two_debts();
        let min_sum: Decimal = debts.iter().map(|d| d.minimum_payment()).sum();
        let result = allocate(&debts, min_sum - dec!(50), &PayoffPolicy::default(), false);
        assert_eq!(result.kind, ScenarioKind::Optimized);
        assert!(result.description.contains("No extra cashflow"));
    }

    #[test]
    fn test_horizon_leftover_reports_sentinel_plan() {
        // 100.05 against 100.00 of month-1 interest barely amortizes, and the
        // 0.01 of surplus does not change that inside 600 months.
        let debt = DebtItem {
            id: "SLOW".into(),
            kind: DebtKind::Loan,
            balance: dec!(10000),
            annual_rate_pct: dec!(12),
            minimum: PaymentPolicy::Fixed { amount: dec!(100.05) },
            days_past_due: 0,
            secured: true,
        };
        let result = allocate(&[debt], dec!(100.06), &PayoffPolicy::default(), true);

        let plan = &result.payment_plans[0];
        assert_eq!(plan.payoff_months, 999);
        assert_eq!(plan.total_interest, dec!(100000));
        // Sentinel plans never carry a schedule, even when requested.
        assert!(plan.breakdown.is_none());
    }

    #[test]
    fn test_first_month_spend_equals_budget() {
        let debts = two_debts();
        let result = allocate(&debts, dec!(1000), &PayoffPolicy::default(), false);
        // Month-1 payments (minimums + surplus) add up to the whole budget.
        assert!((result.total_monthly_payment - dec!(1000)).abs() < dec!(0.01));
    }
}

use debt_scenarios_core::amortization::PayoffPolicy;
use debt_scenarios_core::scenario::compose;
use debt_scenarios_core::types::{CashflowProfile, DebtItem, OfferBook, ScenarioKind};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

// ===========================================================================
// Scenario composition tests
// ===========================================================================

fn single_loan() -> Vec<DebtItem> {
    // 10k at 12% over 36 remaining months => annuity minimum ≈ 332.14
    vec![DebtItem::loan("L1", dec!(10000), dec!(12), 36, false, 0)]
}

fn card_and_loan() -> Vec<DebtItem> {
    vec![
        DebtItem::card("CARD", dec!(5000), dec!(24), dec!(3), dec!(25), 0),
        DebtItem::loan("LOAN", dec!(8000), dec!(10), 24, false, 0),
    ]
}

fn cashflow(income: rust_decimal::Decimal, expenses: rust_decimal::Decimal) -> CashflowProfile {
    CashflowProfile {
        monthly_income_avg: income,
        income_variability_pct: dec!(0),
        essential_expenses_avg: expenses,
    }
}

#[test]
fn test_single_loan_minimum_baseline() {
    let out = compose(
        &single_loan(),
        None,
        &OfferBook::default(),
        &PayoffPolicy::default(),
        false,
    )
    .unwrap();
    let min = &out.result.minimum;

    assert_eq!(min.kind, ScenarioKind::Minimum);
    assert_eq!(min.total_payoff_months, 36);
    // Annuity payment ≈ 332.14/month
    assert!((min.total_monthly_payment - dec!(332.14)).abs() < dec!(0.05));
    // Lifetime interest ≈ 1957
    assert!((min.total_interest - dec!(1957)).abs() < dec!(2));
    // Conservation: paid = interest + principal within a currency unit
    let drift = min.total_payments - min.total_interest - dec!(10000);
    assert!(drift.abs() < dec!(1), "drift {drift}");
}

#[test]
fn test_avalanche_retires_card_before_its_minimum_only_payoff() {
    let debts = card_and_loan();
    let out = compose(
        &debts,
        Some(&cashflow(dec!(2700), dec!(1700))),
        &OfferBook::default(),
        &PayoffPolicy::default(),
        false,
    )
    .unwrap();
    let r = &out.result;

    // The card has the top priority score (24 + revolving bonus); it gets the
    // surplus and must clear well before its minimum-only schedule.
    let min_card = r.minimum.payment_plans.iter().find(|p| p.debt_id == "CARD").unwrap();
    let opt_card = r.optimized.payment_plans.iter().find(|p| p.debt_id == "CARD").unwrap();
    assert!(opt_card.payoff_months < min_card.payoff_months);

    // The loan never finishes later than its contractual term.
    let opt_loan = r.optimized.payment_plans.iter().find(|p| p.debt_id == "LOAN").unwrap();
    assert!(opt_loan.payoff_months <= 24);
}

#[test]
fn test_extra_budget_never_increases_interest() {
    let out = compose(
        &card_and_loan(),
        Some(&cashflow(dec!(2700), dec!(1700))),
        &OfferBook::default(),
        &PayoffPolicy::default(),
        false,
    )
    .unwrap();
    let r = &out.result;

    assert!(r.optimized.total_interest <= r.minimum.total_interest);
    assert!(r.consolidation.total_interest <= r.minimum.total_interest);
}

#[test]
fn test_savings_are_total_payments_difference() {
    let out = compose(
        &card_and_loan(),
        Some(&cashflow(dec!(2700), dec!(1700))),
        &OfferBook::default(),
        &PayoffPolicy::default(),
        false,
    )
    .unwrap();
    let r = &out.result;

    // Pinned convention: savings compare total payments, not interest.
    assert_eq!(
        r.optimized.savings_vs_minimum,
        r.minimum.total_payments - r.optimized.total_payments
    );
    assert_eq!(r.minimum.savings_vs_minimum, dec!(0));
}

#[test]
fn test_identical_snapshots_yield_identical_results() {
    let run = || {
        compose(
            &card_and_loan(),
            Some(&cashflow(dec!(2700), dec!(1700))),
            &OfferBook::default(),
            &PayoffPolicy::default(),
            true,
        )
        .unwrap()
    };
    let a = serde_json::to_value(&run().result).unwrap();
    let b = serde_json::to_value(&run().result).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_non_amortizing_card_reports_sentinel() {
    // 1% minimum of a 3000 balance pays 30 against 90/month of interest.
    let debts = vec![DebtItem::card("C1", dec!(3000), dec!(36), dec!(1), dec!(10), 0)];
    let out = compose(
        &debts,
        None,
        &OfferBook::default(),
        &PayoffPolicy::default(),
        false,
    )
    .unwrap();
    let plan = &out.result.minimum.payment_plans[0];

    assert_eq!(plan.payoff_months, 999);
    assert_eq!(plan.total_interest, dec!(30000)); // balance * penalty factor 10
}

#[test]
fn test_zero_rate_loan_pays_in_exactly_twelve_months() {
    let debts = vec![DebtItem::loan("Z1", dec!(1200), dec!(0), 12, false, 0)];
    let out = compose(
        &debts,
        None,
        &OfferBook::default(),
        &PayoffPolicy::default(),
        false,
    )
    .unwrap();
    let plan = &out.result.minimum.payment_plans[0];

    assert_eq!(plan.payoff_months, 12);
    assert_eq!(plan.total_interest, dec!(0));
    assert_eq!(plan.monthly_payment, dec!(100));
}

#[test]
fn test_breakdown_available_for_milestones() {
    let out = compose(
        &single_loan(),
        None,
        &OfferBook::default(),
        &PayoffPolicy::default(),
        true,
    )
    .unwrap();
    let plan = &out.result.minimum.payment_plans[0];
    let rows = plan.breakdown.as_ref().unwrap();

    assert_eq!(rows.len(), 36);
    // Balances are monotonically decreasing, usable for 25/50/75% markers.
    for pair in rows.windows(2) {
        assert!(pair[1].remaining_balance < pair[0].remaining_balance);
    }
}

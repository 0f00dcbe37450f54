//! Consolidation-offer selection and fitting.
//!
//! Offers arrive pre-screened by the eligibility collaborator; this module
//! only performs the financial fit: pick the cheapest usable offer, decide
//! which debts go under its balance cap, price the new blended payment, and
//! route whatever stays outside through the avalanche allocator.

use rust_decimal::Decimal;

use crate::amortization::{self, annuity_payment, PayoffPolicy, PAYOFF_EPSILON};
use crate::avalanche;
use crate::scenario;
use crate::types::{
    DebtItem, EligibleOffer, Money, OfferBook, PaymentPlan, PaymentPolicy, ScenarioKind,
    ScenarioResult,
};

/// Identifier used for the merged consolidated-loan plan.
pub const CONSOLIDATED_PLAN_ID: &str = "CONSOLIDATED";

/// Fit the best available offer to the customer's debts.
///
/// When no offer is usable or no debt qualifies, the optimized scenario is
/// returned relabeled, with the collaborator's ineligibility reasons echoed
/// in the description. The fitter never fabricates a consolidation.
pub fn fit(
    debts: &[DebtItem],
    offers: &OfferBook,
    monthly_budget: Option<Money>,
    payoff: &PayoffPolicy,
    with_breakdown: bool,
) -> ScenarioResult {
    let usable: Vec<&EligibleOffer> = offers
        .eligible
        .iter()
        .filter(|e| e.offer.is_usable())
        .collect();

    let Some(best) = select_best(&usable) else {
        return fallback(
            debts,
            monthly_budget,
            payoff,
            with_breakdown,
            "No usable consolidation offer is available.",
            &offers.ineligibility_reasons,
        );
    };

    let (consolidated, unconsolidated) = partition(debts, best);
    if consolidated.is_empty() {
        return fallback(
            debts,
            monthly_budget,
            payoff,
            with_breakdown,
            "No debt qualifies under the available consolidation offers.",
            &offers.ineligibility_reasons,
        );
    }

    let offer = &best.offer;
    let consolidated_balance: Money = consolidated.iter().map(|d| d.balance).sum();
    let payment = annuity_payment(consolidated_balance, offer.new_rate_pct, offer.max_term_months);
    let term = Decimal::from(offer.max_term_months);
    // The schedule is re-simulated only when the caller wants the monthly
    // rows; the plan totals stay on the closed-form annuity figures.
    let breakdown = if with_breakdown {
        amortization::simulate(
            consolidated_balance,
            offer.new_rate_pct,
            &PaymentPolicy::Fixed { amount: payment },
            payoff,
            true,
        )
        .breakdown
    } else {
        None
    };
    let consolidated_plan = PaymentPlan {
        debt_id: CONSOLIDATED_PLAN_ID.into(),
        monthly_payment: payment,
        payoff_months: offer.max_term_months,
        total_interest: payment * term - consolidated_balance,
        total_payments: payment * term,
        breakdown,
    };

    let mut plans = vec![consolidated_plan];
    if !unconsolidated.is_empty() {
        let remainder = match monthly_budget {
            // Whatever budget survives the consolidated payment drives an
            // avalanche over the leftover debts; the allocator itself
            // degenerates to minimums when nothing survives.
            Some(budget) => avalanche::allocate(
                &unconsolidated,
                (budget - payment).max(Decimal::ZERO),
                payoff,
                with_breakdown,
            ),
            None => scenario::minimum_scenario(&unconsolidated, payoff, with_breakdown),
        };
        plans.extend(remainder.payment_plans);
    }

    // A qualifying debt left outside means the cap bound the selection.
    let partial = unconsolidated.iter().any(|d| {
        offer.eligible_kinds.contains(&d.kind)
            && !d.is_severely_delinquent()
            && d.balance > PAYOFF_EPSILON
    });
    let mut description = format!(
        "Consolidation with offer {} at {}% annual over {} months.",
        offer.id, offer.new_rate_pct, offer.max_term_months
    );
    if partial {
        description.push_str(
            " The offer's balance cap permits partial consolidation only; the \
             remaining debts stay on their own schedules.",
        );
    }

    ScenarioResult::from_plans(ScenarioKind::Consolidation, plans, description)
}

/// Lowest new rate wins; eligibility confidence breaks exact rate ties.
fn select_best<'a>(usable: &[&'a EligibleOffer]) -> Option<&'a EligibleOffer> {
    usable.iter().copied().min_by(|a, b| {
        a.offer
            .new_rate_pct
            .cmp(&b.offer.new_rate_pct)
            .then(b.confidence.cmp(&a.confidence))
    })
}

/// Split the debt set into consolidated and unconsolidated buckets.
///
/// A debt is consolidatable iff its kind is eligible and it is not severely
/// delinquent. When the candidates exceed the balance cap, they are taken
/// greedily by rate descending, most expensive first, and anything that does
/// not fit falls back to the unconsolidated bucket.
fn partition(debts: &[DebtItem], best: &EligibleOffer) -> (Vec<DebtItem>, Vec<DebtItem>) {
    let offer = &best.offer;
    let mut candidates: Vec<&DebtItem> = Vec::new();
    let mut unconsolidated: Vec<DebtItem> = Vec::new();

    for debt in debts {
        let eligible = debt.balance > PAYOFF_EPSILON
            && offer.eligible_kinds.contains(&debt.kind)
            && !debt.is_severely_delinquent();
        if eligible {
            candidates.push(debt);
        } else {
            unconsolidated.push(debt.clone());
        }
    }

    let total: Money = candidates.iter().map(|d| d.balance).sum();
    let mut consolidated: Vec<DebtItem> = Vec::new();
    if total > offer.max_consolidated_balance {
        candidates.sort_by(|a, b| b.annual_rate_pct.cmp(&a.annual_rate_pct));
        let mut remaining = offer.max_consolidated_balance;
        for debt in candidates {
            if debt.balance <= remaining {
                remaining -= debt.balance;
                consolidated.push(debt.clone());
            } else {
                unconsolidated.push(debt.clone());
            }
        }
    } else {
        consolidated = candidates.into_iter().cloned().collect();
    }

    (consolidated, unconsolidated)
}

fn fallback(
    debts: &[DebtItem],
    monthly_budget: Option<Money>,
    payoff: &PayoffPolicy,
    with_breakdown: bool,
    cause: &str,
    reasons: &[String],
) -> ScenarioResult {
    let base = match monthly_budget {
        Some(budget) => avalanche::allocate(debts, budget, payoff, with_breakdown),
        None => scenario::minimum_scenario(debts, payoff, with_breakdown),
    };
    let mut description = format!("{cause} The optimized repayment plan is shown instead.");
    if !reasons.is_empty() {
        description.push_str(&format!(" Reported reasons: {}.", reasons.join("; ")));
    }
    base.relabeled(ScenarioKind::Consolidation, description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConsolidationOffer, DebtKind};
    use rust_decimal_macros::dec;

    fn offer(id: &str, rate: Decimal, cap: Decimal, term: u32) -> ConsolidationOffer {
        ConsolidationOffer {
            id: id.into(),
            eligible_kinds: vec![DebtKind::Loan, DebtKind::Card],
            max_consolidated_balance: cap,
            new_rate_pct: rate,
            max_term_months: term,
        }
    }

    #[test]
    fn test_lowest_rate_wins_confidence_breaks_ties() {
        let offers = [
            EligibleOffer { offer: offer("A", dec!(12), dec!(10000), 36), confidence: dec!(0.9) },
            EligibleOffer { offer: offer("B", dec!(9), dec!(10000), 36), confidence: dec!(0.7) },
            EligibleOffer { offer: offer("C", dec!(9), dec!(10000), 36), confidence: dec!(0.95) },
        ];
        let usable: Vec<&EligibleOffer> = offers.iter().collect();
        let best = select_best(&usable).unwrap();
        assert_eq!(best.offer.id, "C");
    }

    #[test]
    fn test_delinquent_debt_stays_out() {
        let debts = vec![
            DebtItem::loan("OK", dec!(5000), dec!(15), 36, false, 10),
            DebtItem::loan("LATE", dec!(5000), dec!(15), 36, false, 45),
        ];
        let best = EligibleOffer { offer: offer("A", dec!(9), dec!(20000), 36), confidence: dec!(1) };
        let (consolidated, unconsolidated) = partition(&debts, &best);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated[0].id, "OK");
        assert_eq!(unconsolidated[0].id, "LATE");
    }

    #[test]
    fn test_cap_selects_highest_rate_first() {
        let debts = vec![
            DebtItem::loan("CHEAP", dec!(7000), dec!(9), 36, false, 0),
            DebtItem::loan("DEAR", dec!(8000), dec!(15), 36, false, 0),
        ];
        let best = EligibleOffer { offer: offer("A", dec!(8), dec!(10000), 36), confidence: dec!(1) };
        let (consolidated, unconsolidated) = partition(&debts, &best);
        assert_eq!(consolidated.len(), 1);
        assert_eq!(consolidated[0].id, "DEAR");
        assert_eq!(unconsolidated.len(), 1);
        assert_eq!(unconsolidated[0].id, "CHEAP");
    }

    #[test]
    fn test_consolidated_plan_carries_breakdown_when_requested() {
        let debts = vec![DebtItem::loan("A", dec!(10000), dec!(15), 36, false, 0)];
        let book = OfferBook {
            eligible: vec![EligibleOffer { offer: offer("A", dec!(12), dec!(20000), 36), confidence: dec!(1) }],
            ineligibility_reasons: vec![],
        };
        let result = fit(&debts, &book, None, &PayoffPolicy::default(), true);

        let plan = result
            .payment_plans
            .iter()
            .find(|p| p.debt_id == CONSOLIDATED_PLAN_ID)
            .unwrap();
        let rows = plan.breakdown.as_ref().unwrap();
        assert_eq!(rows.len(), 36);
        assert!(rows[35].remaining_balance <= dec!(0.01));
        // The simulated first row matches the plan's annuity payment.
        assert!((rows[0].payment - plan.monthly_payment).abs() < dec!(0.01));
    }

    #[test]
    fn test_no_offers_falls_back_with_reasons() {
        let debts = vec![DebtItem::loan("L1", dec!(5000), dec!(15), 36, false, 0)];
        let book = OfferBook {
            eligible: vec![],
            ineligibility_reasons: vec!["Credit score below threshold".into()],
        };
        let result = fit(&debts, &book, Some(dec!(500)), &PayoffPolicy::default(), false);
        assert_eq!(result.kind, ScenarioKind::Consolidation);
        assert!(result.description.contains("No usable consolidation offer"));
        assert!(result.description.contains("Credit score below threshold"));
    }

    #[test]
    fn test_zero_term_offer_is_skipped() {
        let debts = vec![DebtItem::loan("L1", dec!(5000), dec!(15), 36, false, 0)];
        let book = OfferBook {
            eligible: vec![EligibleOffer { offer: offer("A", dec!(9), dec!(10000), 0), confidence: dec!(1) }],
            ineligibility_reasons: vec![],
        };
        let result = fit(&debts, &book, None, &PayoffPolicy::default(), false);
        assert!(result.description.contains("No usable consolidation offer"));
    }
}

//! Payoff-priority scoring and ranking for the avalanche allocator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{DebtItem, DebtKind};

/// Score added per day past due.
pub const PAST_DUE_WEIGHT: Decimal = dec!(0.5);

/// Bonus for unsecured loans: nothing to repossess raises urgency.
pub const UNSECURED_LOAN_BONUS: Decimal = dec!(5);

/// Bonus for revolving card debt, which compounds faster and carries
/// behavioural urgency.
pub const REVOLVING_BONUS: Decimal = dec!(10);

/// Payoff-priority score; higher means pay first. Total order, always
/// defined.
pub fn score(debt: &DebtItem) -> Decimal {
    let mut score = debt.annual_rate_pct;
    if debt.days_past_due > 0 {
        score += Decimal::from(debt.days_past_due) * PAST_DUE_WEIGHT;
    }
    score += match debt.kind {
        DebtKind::Card => REVOLVING_BONUS,
        DebtKind::Loan if !debt.secured => UNSECURED_LOAN_BONUS,
        DebtKind::Loan => Decimal::ZERO,
    };
    score
}

/// Indices of `debts` ordered by descending score. The sort is stable: ties
/// keep their input order, and callers must not rely on anything further.
pub fn rank_descending(debts: &[DebtItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len()).collect();
    order.sort_by(|&a, &b| score(&debts[b]).cmp(&score(&debts[a])));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_card_outranks_cheaper_loan() {
        let card = DebtItem::card("C1", dec!(5000), dec!(24), dec!(3), dec!(25), 0);
        let loan = DebtItem::loan("L1", dec!(8000), dec!(10), 24, false, 0);
        // card: 24 + 10 = 34; loan: 10 + 5 = 15
        assert_eq!(score(&card), dec!(34));
        assert_eq!(score(&loan), dec!(15));
    }

    #[test]
    fn test_past_due_raises_priority() {
        let current = DebtItem::loan("L1", dec!(8000), dec!(10), 24, false, 0);
        let late = DebtItem::loan("L2", dec!(8000), dec!(10), 24, false, 20);
        // 20 days late adds 10 points
        assert_eq!(score(&late) - score(&current), dec!(10));
    }

    #[test]
    fn test_secured_loan_gets_no_kind_bonus() {
        let secured = DebtItem::loan("L1", dec!(8000), dec!(10), 24, true, 0);
        assert_eq!(score(&secured), dec!(10));
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let a = DebtItem::loan("A", dec!(1000), dec!(10), 12, false, 0);
        let b = DebtItem::loan("B", dec!(2000), dec!(10), 12, false, 0);
        let c = DebtItem::card("C", dec!(3000), dec!(30), dec!(3), dec!(25), 0);
        let order = rank_descending(&[a, b, c]);
        // Card first; tied loans keep input order.
        assert_eq!(order, vec![2, 0, 1]);
    }
}

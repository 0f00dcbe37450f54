use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{amortization, priority, DebtScenarioError, DebtScenarioResult};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual rates expressed as percentages (12.5 = 12.5% p.a.).
pub type RatePct = Decimal;

/// A debt is treated as severely delinquent past this many days.
pub const SEVERE_DELINQUENCY_DAYS: u32 = 30;

/// Product kind of a debt record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    Loan,
    Card,
}

/// Minimum-payment rule attached to a debt.
///
/// Loans carry a fixed annuity payment; cards re-derive their minimum each
/// month as a percentage of the live balance, with a floor that keeps the
/// payoff from stalling near zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentPolicy {
    Fixed { amount: Money },
    PercentOfBalance { pct: Decimal, floor: Money },
}

impl PaymentPolicy {
    /// Minimum payment due against the given balance.
    pub fn payment_for(&self, balance: Money) -> Money {
        match self {
            PaymentPolicy::Fixed { amount } => *amount,
            PaymentPolicy::PercentOfBalance { pct, floor } => {
                (balance * pct / dec!(100)).max(*floor)
            }
        }
    }
}

/// Unified view of a loan or card, snapshotted for one scenario calculation.
///
/// The engine never mutates a `DebtItem`; simulations run against private
/// working copies of the balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtItem {
    pub id: String,
    pub kind: DebtKind,
    pub balance: Money,
    pub annual_rate_pct: RatePct,
    pub minimum: PaymentPolicy,
    #[serde(default)]
    pub days_past_due: u32,
    #[serde(default)]
    pub secured: bool,
}

impl DebtItem {
    /// Build a loan snapshot. The minimum payment is the standard annuity
    /// payment over the remaining term.
    pub fn loan(
        id: impl Into<String>,
        principal: Money,
        annual_rate_pct: RatePct,
        remaining_term_months: u32,
        secured: bool,
        days_past_due: u32,
    ) -> Self {
        let amount = amortization::annuity_payment(principal, annual_rate_pct, remaining_term_months);
        DebtItem {
            id: id.into(),
            kind: DebtKind::Loan,
            balance: principal,
            annual_rate_pct,
            minimum: PaymentPolicy::Fixed { amount },
            days_past_due,
            secured,
        }
    }

    /// Build a card snapshot. Cards are always unsecured; the minimum is a
    /// percentage of the live balance with a fixed floor.
    pub fn card(
        id: impl Into<String>,
        balance: Money,
        annual_rate_pct: RatePct,
        min_payment_pct: Decimal,
        floor: Money,
        days_past_due: u32,
    ) -> Self {
        DebtItem {
            id: id.into(),
            kind: DebtKind::Card,
            balance,
            annual_rate_pct,
            minimum: PaymentPolicy::PercentOfBalance {
                pct: min_payment_pct,
                floor,
            },
            days_past_due,
            secured: false,
        }
    }

    /// First-month minimum payment against the snapshot balance.
    pub fn minimum_payment(&self) -> Money {
        self.minimum.payment_for(self.balance)
    }

    /// Payoff-priority score; higher means pay first.
    pub fn priority_score(&self) -> Decimal {
        priority::score(self)
    }

    pub fn is_severely_delinquent(&self) -> bool {
        self.days_past_due > SEVERE_DELINQUENCY_DAYS
    }

    pub fn validate(&self) -> DebtScenarioResult<()> {
        if self.balance < Decimal::ZERO {
            return Err(DebtScenarioError::InvalidInput {
                field: format!("debt[{}].balance", self.id),
                reason: "Balance cannot be negative.".into(),
            });
        }
        if self.annual_rate_pct < Decimal::ZERO || self.annual_rate_pct > dec!(100) {
            return Err(DebtScenarioError::InvalidInput {
                field: format!("debt[{}].annual_rate_pct", self.id),
                reason: "Annual rate must be between 0 and 100 percent.".into(),
            });
        }
        Ok(())
    }
}

/// One simulated month for one debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPaymentDetail {
    /// 1-based month index.
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub remaining_balance: Money,
}

/// Per-debt outcome of a simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub debt_id: String,
    /// First-month payment when the payment varies over time.
    pub monthly_payment: Money,
    /// Months to payoff, or the non-amortizing sentinel (see `PayoffPolicy`).
    pub payoff_months: u32,
    pub total_interest: Money,
    pub total_payments: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Vec<MonthlyPaymentDetail>>,
}

/// The three canonical repayment strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Minimum,
    Optimized,
    Consolidation,
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScenarioKind::Minimum => "Minimum Payments",
            ScenarioKind::Optimized => "Optimized (Avalanche)",
            ScenarioKind::Consolidation => "Consolidation",
        };
        f.write_str(name)
    }
}

/// Aggregate of all payment plans under one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub kind: ScenarioKind,
    pub total_monthly_payment: Money,
    /// Max over the per-debt payoff months.
    pub total_payoff_months: u32,
    pub total_interest: Money,
    pub total_payments: Money,
    /// Total-payments difference against the minimum-payment baseline for the
    /// same debt snapshot. Zero for the baseline itself.
    pub savings_vs_minimum: Money,
    pub payment_plans: Vec<PaymentPlan>,
    pub description: String,
}

impl ScenarioResult {
    /// Assemble a scenario from its plans; savings are filled in later by the
    /// composer against the minimum baseline.
    pub fn from_plans(kind: ScenarioKind, plans: Vec<PaymentPlan>, description: String) -> Self {
        let total_monthly_payment = plans.iter().map(|p| p.monthly_payment).sum();
        let total_payoff_months = plans.iter().map(|p| p.payoff_months).max().unwrap_or(0);
        let total_interest = plans.iter().map(|p| p.total_interest).sum();
        let total_payments = plans.iter().map(|p| p.total_payments).sum();
        ScenarioResult {
            kind,
            total_monthly_payment,
            total_payoff_months,
            total_interest,
            total_payments,
            savings_vs_minimum: Decimal::ZERO,
            payment_plans: plans,
            description,
        }
    }

    /// Re-present this result under another scenario label, for the documented
    /// degradation paths (no cashflow, no eligible offer).
    pub fn relabeled(mut self, kind: ScenarioKind, description: String) -> Self {
        self.kind = kind;
        self.description = description;
        self
    }

    /// Fill in savings as the total-payments difference against the baseline.
    pub fn set_savings_against(&mut self, baseline: &ScenarioResult) {
        self.savings_vs_minimum = baseline.total_payments - self.total_payments;
    }
}

/// Candidate bank consolidation offer. Eligibility is decided upstream; the
/// engine only performs the financial fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationOffer {
    pub id: String,
    pub eligible_kinds: Vec<DebtKind>,
    pub max_consolidated_balance: Money,
    pub new_rate_pct: RatePct,
    pub max_term_months: u32,
}

impl ConsolidationOffer {
    /// An offer with a non-positive term or balance cap cannot be used.
    pub fn is_usable(&self) -> bool {
        self.max_term_months > 0 && self.max_consolidated_balance > Decimal::ZERO
    }
}

/// An offer the eligibility collaborator has already approved, with its
/// confidence weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibleOffer {
    pub offer: ConsolidationOffer,
    pub confidence: Decimal,
}

/// The eligibility collaborator's full answer for one customer: approved
/// offers plus free-text reasons for any rejections, echoed back to the
/// customer when no consolidation is possible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferBook {
    #[serde(default)]
    pub eligible: Vec<EligibleOffer>,
    #[serde(default)]
    pub ineligibility_reasons: Vec<String>,
}

/// Customer cashflow figures used to derive the monthly repayment budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowProfile {
    pub monthly_income_avg: Money,
    pub income_variability_pct: Decimal,
    pub essential_expenses_avg: Money,
}

impl CashflowProfile {
    /// Income minus essential expenses, floored at zero.
    pub fn available_cashflow(&self) -> Money {
        (self.monthly_income_avg - self.essential_expenses_avg).max(Decimal::ZERO)
    }

    /// Available cashflow after an income-variability haircut, floored at
    /// zero. This is the budget the avalanche allocator works with.
    pub fn conservative_cashflow(&self) -> Money {
        let haircut = Decimal::ONE - self.income_variability_pct / dec!(100);
        (self.monthly_income_avg * haircut - self.essential_expenses_avg).max(Decimal::ZERO)
    }
}

/// One read-consistent view of a customer's records, taken before entering
/// the engine. The engine never re-reads mid-calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub debts: Vec<DebtItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashflow: Option<CashflowProfile>,
    #[serde(default)]
    pub offers: OfferBook,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

//! Narrow data-access seams and the scenario service that snapshots them.
//!
//! The engine itself is pure; these traits are the only place collaborator
//! data enters. Implementations are injected explicitly, with no ambient
//! client or process-wide handle, and the service reads each repository
//! exactly once per calculation.

use std::collections::HashMap;

use crate::amortization::PayoffPolicy;
use crate::scenario::{self, ScenarioComparison};
use crate::types::{CashflowProfile, ComputationOutput, CustomerSnapshot, DebtItem, OfferBook};
use crate::DebtScenarioResult;

pub trait DebtRepository {
    fn debts_for(&self, customer_id: &str) -> DebtScenarioResult<Vec<DebtItem>>;
}

pub trait CashflowRepository {
    fn cashflow_for(&self, customer_id: &str) -> DebtScenarioResult<Option<CashflowProfile>>;
}

pub trait OfferRepository {
    fn offers_for(&self, customer_id: &str) -> DebtScenarioResult<OfferBook>;
}

/// Composes scenarios from injected repositories.
pub struct ScenarioService<D, C, O> {
    debts: D,
    cashflows: C,
    offers: O,
    payoff: PayoffPolicy,
}

impl<D, C, O> ScenarioService<D, C, O>
where
    D: DebtRepository,
    C: CashflowRepository,
    O: OfferRepository,
{
    pub fn new(debts: D, cashflows: C, offers: O, payoff: PayoffPolicy) -> Self {
        ScenarioService {
            debts,
            cashflows,
            offers,
            payoff,
        }
    }

    /// Take one snapshot of the customer's records and run the composer over
    /// it. Nothing is re-read mid-calculation.
    pub fn scenarios_for(
        &self,
        customer_id: &str,
        with_breakdown: bool,
    ) -> DebtScenarioResult<ComputationOutput<ScenarioComparison>> {
        let snapshot = CustomerSnapshot {
            debts: self.debts.debts_for(customer_id)?,
            cashflow: self.cashflows.cashflow_for(customer_id)?,
            offers: self.offers.offers_for(customer_id)?,
        };
        scenario::compose_snapshot(&snapshot, &self.payoff, with_breakdown)
    }
}

/// In-memory store backing all three repository traits; used by the CLI and
/// in tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCustomerStore {
    debts: HashMap<String, Vec<DebtItem>>,
    cashflows: HashMap<String, CashflowProfile>,
    offers: HashMap<String, OfferBook>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_snapshot(&mut self, customer_id: impl Into<String>, snapshot: CustomerSnapshot) {
        let id = customer_id.into();
        self.debts.insert(id.clone(), snapshot.debts);
        if let Some(cf) = snapshot.cashflow {
            self.cashflows.insert(id.clone(), cf);
        }
        self.offers.insert(id, snapshot.offers);
    }
}

impl DebtRepository for InMemoryCustomerStore {
    fn debts_for(&self, customer_id: &str) -> DebtScenarioResult<Vec<DebtItem>> {
        Ok(self.debts.get(customer_id).cloned().unwrap_or_default())
    }
}

impl CashflowRepository for InMemoryCustomerStore {
    fn cashflow_for(&self, customer_id: &str) -> DebtScenarioResult<Option<CashflowProfile>> {
        Ok(self.cashflows.get(customer_id).cloned())
    }
}

impl OfferRepository for InMemoryCustomerStore {
    fn offers_for(&self, customer_id: &str) -> DebtScenarioResult<OfferBook> {
        Ok(self.offers.get(customer_id).cloned().unwrap_or_default())
    }
}

pub mod amortization;
pub mod avalanche;
pub mod consolidation;
pub mod error;
pub mod priority;
pub mod repository;
pub mod scenario;
pub mod types;

pub use error::DebtScenarioError;
pub use types::*;

/// Standard result type for all debt-scenario operations
pub type DebtScenarioResult<T> = Result<T, DebtScenarioError>;

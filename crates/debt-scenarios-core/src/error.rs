use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebtScenarioError {
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Data access error: {0}")]
    DataAccess(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for DebtScenarioError {
    fn from(e: serde_json::Error) -> Self {
        DebtScenarioError::SerializationError(e.to_string())
    }
}

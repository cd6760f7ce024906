use thiserror::Error;

#[derive(Debug, Error)]
pub enum FincheckError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing payload: no {field} provided")]
    MissingPayload { field: String },

    #[error("Industry not found: {0}")]
    UnknownIndustry(String),

    #[error("Invalid benchmark table: {0}")]
    InvalidBenchmarkTable(String),

    #[error("Ingestion failure: {0}")]
    IngestionFailure(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FincheckError {
    fn from(e: serde_json::Error) -> Self {
        FincheckError::SerializationError(e.to_string())
    }
}

pub mod error;
pub mod types;

#[cfg(feature = "scoring")]
pub mod scoring;

#[cfg(feature = "benchmarks")]
pub mod benchmarks;

#[cfg(feature = "ingest")]
pub mod ingest;

pub use error::FincheckError;
pub use types::*;

/// Standard result type for all fincheck operations
pub type FincheckResult<T> = Result<T, FincheckError>;

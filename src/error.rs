use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid low-stock threshold {0}: must be finite and non-negative")]
    InvalidThreshold(f64),

    #[error("Invalid discount tolerance {0}: must be finite and non-negative")]
    InvalidTolerance(f64),

    #[error("Charge keyword list is empty: at least one keyword is required to classify service lines")]
    EmptyChargeKeywords,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;

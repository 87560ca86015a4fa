use thiserror::Error;

/// Errors raised by the shared combat types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpireError {
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid temperature: {0}")]
    InvalidTemperature(f64),
}

/// Convenience Result type for spire operations
pub type Result<T> = std::result::Result<T, SpireError>;

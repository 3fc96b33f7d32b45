//! Error types for volsim
//!
//! Only structural problems surface as errors: bad parameter domains, empty
//! inputs, unreadable files. A single option whose implied volatility cannot be
//! recovered is not an error; the solver reports it as a missing value.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VolSimError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Pricing error: {0}")]
    Pricing(String),

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type VolSimResult<T> = Result<T, VolSimError>;

impl VolSimError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn pricing(msg: impl Into<String>) -> Self {
        Self::Pricing(msg.into())
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }
}

impl From<serde_json::Error> for VolSimError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

/// Reject NaN, infinities, zero and negatives.
pub(crate) fn ensure_positive(value: f64, name: &str) -> VolSimResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(VolSimError::invalid_input(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(value)
}

/// Reject NaN and infinities; zero and negatives are allowed.
pub(crate) fn ensure_finite(value: f64, name: &str) -> VolSimResult<f64> {
    if !value.is_finite() {
        return Err(VolSimError::invalid_input(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_message() {
        let err = VolSimError::invalid_input("n_steps must be positive");
        assert!(format!("{err}").contains("n_steps must be positive"));

        let err = VolSimError::pricing("sigma must be positive");
        assert!(format!("{err}").starts_with("Pricing error"));
    }

    #[test]
    fn test_validation_helpers() {
        assert!(ensure_positive(1.0, "spot").is_ok());
        assert!(ensure_positive(0.0, "spot").is_err());
        assert!(ensure_positive(f64::NAN, "spot").is_err());
        assert!(ensure_finite(-0.02, "rate").is_ok());
        assert!(ensure_finite(f64::INFINITY, "rate").is_err());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VolSimError>();
    }
}

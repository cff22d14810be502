//! Error type shared by both LoKi tasks.
//!
//! Setters validate their input and return [`LoKiError::InvalidParameter`];
//! numerical failures are surfaced as distinct variants instead of silently
//! handing back whatever the underlying solver produced.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoKiError>;

#[derive(Error, Debug)]
pub enum LoKiError {
    /// a parameter is outside its admissible range
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// IVP solver finished without producing a solution
    #[error("integration with {method} failed: {message}")]
    IntegrationFailed { method: String, message: String },

    /// trajectory contains a non-finite or non-positive population
    #[error("trajectory from {method} is invalid at t = {t}: {message}")]
    InvalidTrajectory {
        method: String,
        t: f64,
        message: String,
    },

    /// Newton-Raphson did not bring the residual below the threshold
    #[error("nonlinear solver did not converge within {max_iterations} iterations (residual norm: {residual:.3e})")]
    NotConverged { max_iterations: usize, residual: f64 },

    /// Newton-Raphson returned nothing, or a vector that cannot be a solution
    #[error("nonlinear solver returned no usable solution: {message}")]
    NoSolution { message: String },

    /// factor of a stationarity equation is not linear in the unknowns
    #[error("factor '{factor}' is not linear in {unknowns:?}")]
    NonLinearFactor {
        factor: String,
        unknowns: Vec<String>,
    },

    #[error("no equilibrium point found")]
    NoEquilibrium,

    #[error("failed to parse task file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoKiError {
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn integration_failed(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::IntegrationFailed {
            method: method.into(),
            message: message.into(),
        }
    }
}

/// Returns an error unless `value` is finite and strictly positive.
pub fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LoKiError::invalid_parameter(
            name,
            format!("must be positive, got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_values_pass() {
        assert!(require_positive("a", 1.1).is_ok());
        assert!(require_positive("R7", 20.0).is_ok());
    }

    #[test]
    fn zero_negative_and_nan_are_rejected() {
        for bad in [0.0, -0.4, f64::NAN, f64::INFINITY] {
            let err = require_positive("b", bad).unwrap_err();
            assert!(matches!(err, LoKiError::InvalidParameter { ref name, .. } if name == "b"));
        }
    }

    #[test]
    fn messages_are_readable() {
        let err = LoKiError::NotConverged {
            max_iterations: 1000,
            residual: 1.5e-3,
        };
        assert_eq!(
            err.to_string(),
            "nonlinear solver did not converge within 1000 iterations (residual norm: 1.500e-3)"
        );
    }
}

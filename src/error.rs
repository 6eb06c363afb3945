// src/error.rs
//! Error taxonomy for the wizard session controller

use thiserror::Error;

/// Errors surfaced by the wizard session and the analysis service client.
///
/// `Validation` and `State` are always raised before any network traffic;
/// `Transport` wraps a failed or rejected call to the analysis service.
#[derive(Debug, Error)]
pub enum WizardError {
    /// User input was rejected locally. Recoverable by correcting the input;
    /// the session is not mutated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An operation was invoked out of sequence or while another operation
    /// was still in flight.
    #[error("invalid operation: {0}")]
    State(String),

    /// The analysis service call failed or returned a non-success status.
    /// The message is surfaced verbatim; retrying the same operation is the
    /// caller's decision.
    #[error("analysis service error: {0}")]
    Transport(String),
}

impl WizardError {
    pub fn is_validation(&self) -> bool {
        matches!(self, WizardError::Validation(_))
    }

    pub fn is_state(&self) -> bool {
        matches!(self, WizardError::State(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, WizardError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;

//! Error types for the kiosk console.

use crate::onboarding::model::DraftField;
use crate::onboarding::state::OnboardingStep;

/// Top-level error type for the console.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Key-value store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors raised by the onboarding flow controller.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("{field} is invalid on step {step}: {reason}")]
    Validation {
        step: OnboardingStep,
        field: DraftField,
        reason: String,
    },

    #[error("Client {id} not found")]
    ClientNotFound { id: String },

    #[error("Field {field} cannot be edited on step {step}")]
    FieldNotOnStep {
        field: DraftField,
        step: OnboardingStep,
    },

    #[error("Cannot {action} from step {from}")]
    InvalidTransition {
        from: OnboardingStep,
        action: &'static str,
    },

    #[error("Onboarding flow already finished")]
    Finished,

    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(#[from] StoreError),
}

impl OnboardingError {
    /// Whether the flow can continue after this error.
    ///
    /// Only a missing referenced record forces the caller out of the flow.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ClientNotFound { .. } | Self::Finished)
    }
}

/// Result type alias for the console.
pub type Result<T> = std::result::Result<T, Error>;

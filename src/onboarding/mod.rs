//! Onboarding system — the five-step wizard that creates a client.
//!
//! The controller owns the active step and the Draft. Steps advance through
//! validation gates, go back freely, and the last step commits the Draft
//! into the persisted client collection.

pub mod manager;
pub mod model;
pub mod state;
pub mod view;

pub use manager::{AdvanceOutcome, FlowEvent, OnboardingController};
pub use model::{Draft, DraftField, FieldEdit, ValidationPolicy};
pub use state::OnboardingStep;
pub use view::{FieldError, StepView, ViewBody};

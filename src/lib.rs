//! Kiosk console — client onboarding for a kiosk fleet admin console.

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod store;
pub mod terminal;

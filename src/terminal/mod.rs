//! Terminal front end — a stdin/stdout wizard over the onboarding controller.

pub mod command;
pub mod render;
pub mod session;

pub use command::ConsoleCommand;
pub use render::{render_clients, render_step};
pub use session::{SessionEnd, run_session};

//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::clients::model::Tier;
use crate::config::ConsoleConfig;
use crate::onboarding::model::ValidationPolicy;

#[derive(Debug, Parser)]
#[command(
    name = "kiosk-console",
    version,
    about = "Admin console for kiosk fleet clients"
)]
pub struct Cli {
    /// Database file (overrides KIOSK_CONSOLE_DB_PATH)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Enforce validation on every wizard step, not only the first
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Onboard a new client through the step-by-step wizard
    Onboard,
    /// Re-run the wizard for an existing client
    Edit {
        /// Id of the client to edit
        id: String,
    },
    /// List committed clients
    Clients {
        /// Only clients on this tier
        #[arg(long)]
        tier: Option<Tier>,
        /// Only clients whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
}

impl Cli {
    /// Layer command-line overrides on top of `config`.
    pub fn apply_to(&self, config: &mut ConsoleConfig) {
        if let Some(path) = &self.db_path {
            config.db_path = path.clone();
        }
        if self.strict {
            config.validation = ValidationPolicy::EveryStep;
        }
    }
}

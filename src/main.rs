use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::broadcast::error::RecvError;

use kiosk_console::cli::{Cli, Command};
use kiosk_console::clients::{ClientCollection, ClientFilter};
use kiosk_console::config::ConsoleConfig;
use kiosk_console::error::OnboardingError;
use kiosk_console::onboarding::OnboardingController;
use kiosk_console::store::{KeyValueStore, LibSqlStore};
use kiosk_console::terminal::{SessionEnd, render_clients, run_session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ConsoleConfig::from_env()?;
    cli.apply_to(&mut config);

    let store: Arc<dyn KeyValueStore> = Arc::new(
        LibSqlStore::new_local(&config.db_path)
            .await
            .with_context(|| format!("opening store at {}", config.db_path.display()))?,
    );

    let controller = match cli.command {
        Command::Clients { tier, search } => {
            let clients = ClientCollection::new(store).load().await?;
            let filter = ClientFilter { tier, search };
            println!("{}", render_clients(&filter.apply(&clients)));
            return Ok(());
        }
        Command::Onboard => OnboardingController::start(store, &config).await?,
        Command::Edit { id } => match OnboardingController::resume(store, &config, &id).await {
            Ok(controller) => controller,
            Err(e @ OnboardingError::ClientNotFound { .. }) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
    };

    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!(?event, "Flow event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Flow event listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    match run_session(controller, stdin, &mut stdout).await? {
        SessionEnd::Committed(record) => {
            tracing::info!(client_id = %record.id, "Wizard finished");
        }
        SessionEnd::Abandoned => {}
    }

    Ok(())
}

//! Interactive wizard session over line-oriented input.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::clients::model::ClientRecord;
use crate::error::{Error, OnboardingError};
use crate::onboarding::manager::{AdvanceOutcome, OnboardingController};

use super::command::{ConsoleCommand, HELP};
use super::render::render_step;

/// How a session ended.
#[derive(Debug, Clone)]
pub enum SessionEnd {
    Committed(ClientRecord),
    Abandoned,
}

/// Drive `controller` with commands read from `input`, writing to `out`.
///
/// End of input abandons the flow. Errors the flow can recover from are
/// printed and the session continues; any other error ends the session.
pub async fn run_session<R, W>(
    mut controller: OnboardingController,
    input: R,
    out: &mut W,
) -> Result<SessionEnd, Error>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}\n", render_step(&controller.view()))?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            controller.abandon();
            return Ok(SessionEnd::Abandoned);
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "! {message}")?;
                continue;
            }
        };

        let result = match command {
            ConsoleCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            ConsoleCommand::Quit => {
                controller.abandon();
                writeln!(out, "Left without saving.")?;
                return Ok(SessionEnd::Abandoned);
            }
            ConsoleCommand::Show => Ok(()),
            ConsoleCommand::Set(edit) => controller.apply(edit),
            ConsoleCommand::Back => controller.retreat().map(|_| ()),
            ConsoleCommand::AddLocation {
                name,
                address,
                primary,
            } => controller
                .add_location(&name, address.as_deref(), primary)
                .map(|_| ()),
            ConsoleCommand::RemoveLocation(index) => match controller.remove_location(index) {
                Ok(Some(_)) => Ok(()),
                Ok(None) => {
                    writeln!(out, "! no location number {}", index + 1)?;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            ConsoleCommand::Next => match controller.advance().await {
                Ok(AdvanceOutcome::Moved(_)) => Ok(()),
                Ok(AdvanceOutcome::Committed(record)) => {
                    writeln!(out, "Saved client {} ({}).", record.name, record.id)?;
                    return Ok(SessionEnd::Committed(record));
                }
                Err(e) => Err(e),
            },
        };

        if let Err(e) = result {
            report(out, &e)?;
            if !e.is_recoverable() {
                return Err(e.into());
            }
        }

        writeln!(out, "\n{}\n", render_step(&controller.view()))?;
    }
}

fn report<W: Write>(out: &mut W, err: &OnboardingError) -> std::io::Result<()> {
    match err {
        // The field cue is part of the redrawn step.
        OnboardingError::Validation { .. } => Ok(()),
        other => writeln!(out, "! {other}"),
    }
}

//! Plain-text rendering of step views and client listings.

use std::fmt::Write;

use crate::clients::model::ClientRecord;
use crate::onboarding::view::{StepView, ViewBody};

/// Render a step view as terminal text.
pub fn render_step(view: &StepView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "── Step {}/{}: {} ──",
        view.position, view.total, view.title
    );

    match &view.body {
        ViewBody::Form { fields } => {
            for field in fields {
                let marker = if field.required { "*" } else { " " };
                let value = if field.value.is_empty() {
                    "(empty)"
                } else {
                    field.value.as_str()
                };
                let _ = write!(out, " {marker} {:<14} {value}", field.label);
                if !field.choices.is_empty() {
                    let _ = write!(out, "  [{}]", field.choices.join(" | "));
                }
                out.push('\n');
                if let Some(error) = &field.error {
                    let _ = writeln!(out, "   ! {error}");
                }
            }
        }
        ViewBody::Locations { rows, error } => {
            if rows.is_empty() {
                out.push_str("   (no locations yet)\n");
            }
            for row in rows {
                let primary = if row.is_primary { " ★ primary" } else { "" };
                let _ = write!(out, "  {}. {}", row.index + 1, row.name);
                if let Some(address) = &row.address {
                    let _ = write!(out, " — {address}");
                }
                let _ = writeln!(out, "{primary}");
            }
            if let Some(error) = error {
                let _ = writeln!(out, "   ! {}", error.reason);
            }
        }
        ViewBody::Review { sections } => {
            for section in sections {
                let _ = writeln!(out, "  {}", section.title);
                if section.entries.is_empty() {
                    out.push_str("    (none)\n");
                }
                for entry in &section.entries {
                    let _ = writeln!(out, "    {:<12} {}", entry.label, entry.value);
                }
            }
        }
    }

    let back = if view.can_retreat { "back · " } else { "" };
    let _ = write!(out, "[{back}next: {}]", view.advance_label);
    out
}

/// Render a client listing as an aligned table.
pub fn render_clients(clients: &[&ClientRecord]) -> String {
    if clients.is_empty() {
        return "No clients.".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<38} {:<24} {:<11} {:<9} {:>9}",
        "ID", "NAME", "TIER", "STATUS", "LOCATIONS"
    );
    for client in clients {
        let _ = writeln!(
            out,
            "{:<38} {:<24} {:<11} {:<9} {:>9}",
            client.id,
            client.name,
            client.tier.to_string(),
            client.status.to_string(),
            client.locations.len()
        );
    }
    out.pop();
    out
}

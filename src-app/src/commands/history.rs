//! History and colour preference commands.

use crate::state::AppState;
use anyhow::{bail, Context};
use qrkit_core::HistoryId;
use qrkit_history::HexColor;
use std::io::Write;

pub fn list(state: &AppState, out: &mut dyn Write) -> anyhow::Result<()> {
    let entries = state.history.list();
    if entries.is_empty() {
        writeln!(out, "No history yet")?;
        return Ok(());
    }

    for entry in entries {
        writeln!(
            out,
            "{}  {}  {:<14} {}",
            entry.id,
            entry.timestamp.to_rfc3339(),
            entry.template_name,
            entry.content.escape_debug()
        )?;
    }
    Ok(())
}

pub fn remove(state: &AppState, id: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let id = HistoryId::new(id).context("invalid history id")?;
    if state.history.get(&id).is_none() {
        bail!("no history entry with id {id}");
    }
    if !state.history.remove(&id) {
        bail!("history entry {id} could not be removed");
    }
    writeln!(out, "Removed {id}")?;
    Ok(())
}

pub fn clear(state: &AppState, out: &mut dyn Write) -> anyhow::Result<()> {
    if !state.history.clear() {
        bail!("history could not be cleared");
    }
    writeln!(out, "History cleared")?;
    Ok(())
}

pub fn show_colors(state: &AppState, out: &mut dyn Write) -> anyhow::Result<()> {
    let colors = state.preferences.colors();
    writeln!(out, "dark:  {}", colors.dark)?;
    writeln!(out, "light: {}", colors.light)?;
    Ok(())
}

/// Validate both colours before saving either.
pub fn set_colors(
    state: &AppState,
    dark: Option<&str>,
    light: Option<&str>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    if dark.is_none() && light.is_none() {
        bail!("pass --dark and/or --light");
    }
    let dark = dark.map(HexColor::new).transpose()?;
    let light = light.map(HexColor::new).transpose()?;

    if let Some(color) = &dark {
        if !state.preferences.set_dark(color) {
            tracing::warn!("Dark colour was not saved");
        }
    }
    if let Some(color) = &light {
        if !state.preferences.set_light(color) {
            tracing::warn!("Light colour was not saved");
        }
    }
    show_colors(state, out)
}

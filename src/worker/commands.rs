//! Command layer for the data collector.

use crate::{
    lock,
    models::{resolve_hotspot, CompletionStatus, FieldValue},
    AppState,
};

use super::{ConfigAvailability, EditContext, ProgressEntry};

/// Reloads configuration and data. Returns a warning the user should see, if any.
pub fn load(state: &AppState) -> Result<Option<String>, String> {
    let mut collector = lock(&state.collector);
    let availability = collector.load(&state.repo).map_err(|e| e.to_string())?;

    Ok(match availability {
        ConfigAvailability::Loaded(_) => None,
        ConfigAvailability::Missing => Some(
            "no diagram available: the administrator has not saved a configuration yet"
                .to_string(),
        ),
        ConfigAvailability::Corrupt(_) => {
            Some("error loading the configuration; nothing to fill in".to_string())
        }
    })
}

pub fn progress(state: &AppState) -> Vec<ProgressEntry> {
    lock(&state.collector).progress()
}

/// Selects a hotspot addressed by id or 1-based number.
pub fn select_hotspot(state: &AppState, reference: &str) -> Result<EditContext, String> {
    let mut collector = lock(&state.collector);
    let id = resolve_hotspot(collector.hotspots(), reference)
        .map(|hotspot| hotspot.id.clone())
        .ok_or_else(|| format!("no hotspot '{reference}'"))?;
    collector
        .select_hotspot(&id)
        .cloned()
        .map_err(|e| e.to_string())
}

pub fn submit_value(state: &AppState, value: &str) -> Result<FieldValue, String> {
    lock(&state.collector)
        .submit_value(value, &state.repo)
        .map_err(|e| e.to_string())
}

pub fn cancel_selection(state: &AppState) {
    lock(&state.collector).cancel_selection();
}

pub fn completion_status(state: &AppState) -> CompletionStatus {
    lock(&state.collector).completion_status()
}

//! Command layer for the report view.

use std::path::{Path, PathBuf};

use chrono::Local;

use super::report::{export_file_name, Report, ReportRow, Stats};
use crate::{lock, log_info, AppState};

const ENABLE_LOGS: bool = true;

/// Re-reads both documents. Returns user-visible warnings.
pub fn refresh(state: &AppState) -> Result<Vec<String>, String> {
    let report = Report::load(&state.repo).map_err(|e| e.to_string())?;
    let mut warnings = report.warnings().to_vec();
    if !report.has_config() && warnings.is_empty() {
        warnings.push("no data available: no diagram has been configured yet".to_string());
    }
    *lock(&state.report) = report;
    Ok(warnings)
}

pub fn stats(state: &AppState) -> Stats {
    lock(&state.report).stats()
}

pub fn orphaned(state: &AppState) -> usize {
    lock(&state.report).orphaned()
}

pub fn rows(state: &AppState) -> Vec<ReportRow> {
    lock(&state.report).rows()
}

/// Export text using the configured delimiter and language.
pub fn export_text(state: &AppState) -> String {
    let export = state.settings.export();
    lock(&state.report).export_delimited(export.delimiter, state.settings.language())
}

/// Writes the export into `dir` under today's date and returns the file path.
pub fn export_to_dir(state: &AppState, dir: &Path) -> Result<PathBuf, String> {
    if !lock(&state.report).has_config() {
        return Err("nothing to export: no diagram has been configured".to_string());
    }

    let prefix = state.settings.export().file_prefix;
    let path = dir.join(export_file_name(&prefix, Local::now().date_naive()));
    let contents = export_text(state);
    std::fs::write(&path, contents)
        .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    log_info!("Exported report to {}", path.display());
    Ok(path)
}

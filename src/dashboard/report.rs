//! Completion report over the saved configuration and collected data.

use std::borrow::Cow;

use chrono::NaiveDate;

use crate::display::{export_header, field_type_name, status_name, EntryStatus, Language};
use crate::error::{SketchError, SketchResult};
use crate::models::{FieldType, FieldValue, HotspotData, SketchConfig};
use crate::store::Repository;
use crate::{log_error, log_warn};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// 1-based position in the configuration.
    pub index: usize,
    pub hotspot_id: String,
    pub label: String,
    pub field_type: FieldType,
    pub value: Option<FieldValue>,
    pub status: EntryStatus,
}

impl ReportRow {
    pub fn value_text(&self) -> String {
        self.value
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Cells in export column order.
    pub fn cells(&self, language: Language) -> [String; 5] {
        [
            self.index.to_string(),
            self.label.clone(),
            field_type_name(self.field_type, language).to_string(),
            self.value_text(),
            status_name(self.status, language).to_string(),
        ]
    }
}

/// Read-only snapshot of both documents.
#[derive(Debug, Clone, Default)]
pub struct Report {
    config: Option<SketchConfig>,
    data: HotspotData,
    warnings: Vec<String>,
}

impl Report {
    pub fn new(config: Option<SketchConfig>, data: HotspotData) -> Self {
        Self {
            config,
            data,
            warnings: Vec::new(),
        }
    }

    /// Reads both documents; corrupt ones count as absent.
    pub fn load(repo: &Repository) -> SketchResult<Self> {
        let mut warnings = Vec::new();

        let config = match repo.get_config() {
            Ok(config) => config,
            Err(SketchError::PersistedStateCorrupt { reason, .. }) => {
                log_warn!("Saved configuration is unreadable: {reason}");
                warnings.push(format!("the saved configuration could not be read ({reason})"));
                None
            }
            Err(err) => return Err(err),
        };

        let data = match repo.get_data() {
            Ok(data) => data,
            Err(SketchError::PersistedStateCorrupt { reason, .. }) => {
                log_error!("Collected data is unreadable, reporting none: {reason}");
                HotspotData::default()
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            config,
            data,
            warnings,
        })
    }

    pub fn has_config(&self) -> bool {
        self.config.is_some()
    }

    /// User-visible problems found while loading.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn stats(&self) -> Stats {
        let status = match &self.config {
            Some(config) => self.data.completion(&config.hotspots),
            None => Default::default(),
        };
        Stats {
            total: status.total,
            completed: status.completed,
            pending: status.pending(),
        }
    }

    /// Collected values whose hotspot is no longer configured.
    pub fn orphaned(&self) -> usize {
        let hotspots = self
            .config
            .as_ref()
            .map(|config| config.hotspots.as_slice())
            .unwrap_or(&[]);
        self.data.orphaned(hotspots)
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        let Some(config) = &self.config else {
            return Vec::new();
        };
        config
            .hotspots
            .iter()
            .enumerate()
            .map(|(index, hotspot)| {
                let value = self.data.get(&hotspot.id).cloned();
                ReportRow {
                    index: index + 1,
                    hotspot_id: hotspot.id.clone(),
                    label: hotspot.label.clone(),
                    field_type: hotspot.field_type,
                    status: EntryStatus::from_completed(value.is_some()),
                    value,
                }
            })
            .collect()
    }

    /// Header plus one line per row; fields are quoted where needed.
    pub fn export_delimited(&self, delimiter: char, language: Language) -> String {
        let header = export_header(language).map(str::to_string);
        std::iter::once(header)
            .chain(self.rows().iter().map(|row| row.cells(language)))
            .map(|cells| join_record(&cells, delimiter))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn join_record(cells: &[String], delimiter: char) -> String {
    cells
        .iter()
        .map(|cell| escape_field(cell, delimiter))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string())
}

/// Quotes a field containing the delimiter, a quote or a line break, doubling inner quotes.
pub fn escape_field(field: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || matches!(c, '"' | '\n' | '\r'));
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Name of the export file for `date`, e.g. `sketch-data-2026-03-01.csv`.
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.csv", date.format("%Y-%m-%d"))
}

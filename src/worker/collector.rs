//! Data collector: fill in values at the hotspots of the saved configuration.

use crate::error::{SketchError, SketchResult};
use crate::models::{CompletionStatus, FieldType, FieldValue, Hotspot, HotspotData, SketchConfig};
use crate::store::Repository;
use crate::{log_error, log_info, log_warn};

const ENABLE_LOGS: bool = true;

/// What `load_config` found. `Missing` and `Corrupt` both render as an
/// empty hotspot set but warrant different messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAvailability {
    Missing,
    Corrupt(String),
    Loaded(SketchConfig),
}

/// A hotspot opened for editing and the value typed so far.
#[derive(Debug, Clone, PartialEq)]
pub struct EditContext {
    pub hotspot: Hotspot,
    pub value: String,
}

/// One line of the progress summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEntry {
    pub number: usize,
    pub hotspot_id: String,
    pub label: String,
    pub value: Option<FieldValue>,
}

#[derive(Debug, Clone)]
pub struct DataCollector {
    config: ConfigAvailability,
    data: HotspotData,
    selection: Option<EditContext>,
}

impl Default for DataCollector {
    fn default() -> Self {
        Self {
            config: ConfigAvailability::Missing,
            data: HotspotData::default(),
            selection: None,
        }
    }
}

impl DataCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads both documents.
    pub fn load(&mut self, repo: &Repository) -> SketchResult<&ConfigAvailability> {
        self.load_data(repo)?;
        self.load_config(repo)
    }

    pub fn load_config(&mut self, repo: &Repository) -> SketchResult<&ConfigAvailability> {
        self.config = match repo.get_config() {
            Ok(Some(config)) => ConfigAvailability::Loaded(config),
            Ok(None) => ConfigAvailability::Missing,
            Err(SketchError::PersistedStateCorrupt { reason, .. }) => {
                log_warn!("Saved configuration is unreadable: {reason}");
                ConfigAvailability::Corrupt(reason)
            }
            Err(err) => return Err(err),
        };

        let selection_survives = self
            .selection
            .as_ref()
            .map(|ctx| self.hotspots().iter().any(|h| h.id == ctx.hotspot.id))
            .unwrap_or(false);
        if !selection_survives {
            self.selection = None;
        }

        Ok(&self.config)
    }

    /// Loads collected values. A corrupt document is logged and treated as empty.
    pub fn load_data(&mut self, repo: &Repository) -> SketchResult<()> {
        self.data = match repo.get_data() {
            Ok(data) => data,
            Err(SketchError::PersistedStateCorrupt { reason, .. }) => {
                log_error!("Collected data is unreadable, starting empty: {reason}");
                HotspotData::default()
            }
            Err(err) => return Err(err),
        };
        Ok(())
    }

    pub fn availability(&self) -> &ConfigAvailability {
        &self.config
    }

    pub fn config(&self) -> Option<&SketchConfig> {
        match &self.config {
            ConfigAvailability::Loaded(config) => Some(config),
            _ => None,
        }
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        self.config()
            .map(|config| config.hotspots.as_slice())
            .unwrap_or(&[])
    }

    pub fn data(&self) -> &HotspotData {
        &self.data
    }

    pub fn selection(&self) -> Option<&EditContext> {
        self.selection.as_ref()
    }

    /// Opens the hotspot with `id`, pre-filled with its current value.
    pub fn select_hotspot(&mut self, id: &str) -> SketchResult<&EditContext> {
        let hotspot = self
            .config()
            .and_then(|config| config.hotspot(id))
            .cloned()
            .ok_or_else(|| SketchError::validation(format!("no hotspot '{id}'")))?;
        let value = self
            .data
            .get(&hotspot.id)
            .map(ToString::to_string)
            .unwrap_or_default();

        Ok(&*self.selection.insert(EditContext { hotspot, value }))
    }

    pub fn cancel_selection(&mut self) {
        self.selection = None;
    }

    /// Stores a value for the selected hotspot and closes the editing context.
    ///
    /// The new mapping is persisted before it replaces the in-memory one.
    pub fn submit_value(&mut self, raw: &str, repo: &Repository) -> SketchResult<FieldValue> {
        let Some(ctx) = &self.selection else {
            return Err(SketchError::validation("select a hotspot first"));
        };
        let value = parse_value(&ctx.hotspot, raw)?;

        let mut next = self.data.clone();
        next.insert(ctx.hotspot.id.clone(), value.clone());
        repo.set_data(&next)?;

        log_info!("Recorded value for hotspot {}", ctx.hotspot.id);
        self.data = next;
        self.selection = None;
        Ok(value)
    }

    pub fn completion_status(&self) -> CompletionStatus {
        self.data.completion(self.hotspots())
    }

    pub fn progress(&self) -> Vec<ProgressEntry> {
        self.hotspots()
            .iter()
            .enumerate()
            .map(|(index, hotspot)| ProgressEntry {
                number: index + 1,
                hotspot_id: hotspot.id.clone(),
                label: hotspot.label.clone(),
                value: self.data.get(&hotspot.id).cloned(),
            })
            .collect()
    }
}

/// Converts user input into the value type of `hotspot`.
pub fn parse_value(hotspot: &Hotspot, raw: &str) -> SketchResult<FieldValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SketchError::validation("fill in the field"));
    }

    match hotspot.field_type {
        FieldType::Number => match trimmed.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(FieldValue::Number(number)),
            _ => Err(SketchError::validation(format!(
                "'{trimmed}' is not a number"
            ))),
        },
        FieldType::Select => {
            if hotspot.options().iter().any(|option| option == trimmed) {
                Ok(FieldValue::Text(trimmed.to_string()))
            } else {
                Err(SketchError::validation(format!(
                    "'{trimmed}' is not one of: {}",
                    hotspot.options().join(", ")
                )))
            }
        }
        FieldType::Text => Ok(FieldValue::Text(raw.to_string())),
    }
}

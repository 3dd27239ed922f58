use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::display::Language;
use crate::error::{SketchError, SketchResult};
use crate::log_warn;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub delimiter: char,
    pub file_prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            file_prefix: "sketch-data".into(),
        }
    }
}

impl ExportSettings {
    pub fn validate(&self) -> SketchResult<()> {
        if matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(SketchError::validation(
                "the export delimiter cannot be a quote or a line break",
            ));
        }
        if self.file_prefix.trim().is_empty() {
            return Err(SketchError::validation("the export file prefix is empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct UserSettings {
    #[serde(default)]
    language: Language,
    #[serde(default)]
    export: ExportSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!(
                    "Ignoring unreadable settings in {}: {err}",
                    path.display()
                );
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn language(&self) -> Language {
        self.read().language
    }

    pub fn export(&self) -> ExportSettings {
        self.read().export.clone()
    }

    pub fn update_language(&self, language: Language) -> Result<()> {
        let mut guard = self.write();
        guard.language = language;
        self.persist(&guard)
    }

    pub fn update_export(&self, settings: ExportSettings) -> SketchResult<()> {
        settings.validate()?;
        let mut guard = self.write();
        guard.export = settings;
        self.persist(&guard)?;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, UserSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

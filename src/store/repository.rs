use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::DocumentStore;
use crate::error::{SketchError, SketchResult};
use crate::log_info;
use crate::models::{HotspotData, SketchConfig};

const ENABLE_LOGS: bool = true;

pub const CONFIG_KEY: &str = "sketchConfig";
pub const DATA_KEY: &str = "hotspotData";

/// Typed access to the two persisted documents.
///
/// Decoding is strict: anything that does not match the data model comes
/// back as [`SketchError::PersistedStateCorrupt`]. Deciding what to do about
/// it is left to the caller.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn get_config(&self) -> SketchResult<Option<SketchConfig>> {
        let Some(config) = self.read::<SketchConfig>(CONFIG_KEY)? else {
            return Ok(None);
        };
        config
            .check_shape()
            .map_err(|reason| SketchError::corrupt(CONFIG_KEY, reason))?;
        Ok(Some(config))
    }

    pub fn set_config(&self, config: &SketchConfig) -> SketchResult<()> {
        self.write(CONFIG_KEY, config)
    }

    /// Collected values; an absent document is an empty mapping.
    pub fn get_data(&self) -> SketchResult<HotspotData> {
        Ok(self.read::<HotspotData>(DATA_KEY)?.unwrap_or_default())
    }

    pub fn set_data(&self, data: &HotspotData) -> SketchResult<()> {
        self.write(DATA_KEY, data)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> SketchResult<Option<T>> {
        let Some(body) = self.store.load(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| SketchError::corrupt(key, err.to_string()))
    }

    fn write<T: Serialize>(&self, key: &str, document: &T) -> SketchResult<()> {
        let body = serde_json::to_string(document)
            .map_err(|err| anyhow::Error::new(err).context(format!("failed to encode {key}")))?;
        self.store.save(key, &body)?;
        log_info!("saved {key} ({} bytes)", body.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldType, FieldValue, Hotspot};
    use crate::store::MemoryStore;

    fn repo_with(entries: &[(&str, &str)]) -> Repository {
        let store = MemoryStore::new();
        for (key, body) in entries {
            store.save(key, body).unwrap();
        }
        Repository::new(Arc::new(store))
    }

    #[test]
    fn absent_documents_are_none_and_empty() {
        let repo = repo_with(&[]);
        assert!(repo.get_config().unwrap().is_none());
        assert!(repo.get_data().unwrap().is_empty());
    }

    #[test]
    fn config_round_trips_through_the_store() {
        let repo = repo_with(&[]);
        let config = SketchConfig {
            image: "data:image/png;base64,AA==".into(),
            hotspots: vec![Hotspot {
                id: "hs_1".into(),
                x: 25.0,
                y: 75.0,
                field_type: FieldType::Select,
                label: "Floor".into(),
                options: Some(vec!["1".into(), "2".into()]),
            }],
        };
        repo.set_config(&config).unwrap();
        assert_eq!(repo.get_config().unwrap(), Some(config));
    }

    #[test]
    fn reads_documents_written_by_the_browser_version() {
        let repo = repo_with(&[
            (
                CONFIG_KEY,
                r#"{"image":"data:image/png;base64,AA==","hotspots":[{"id":"1712345678901","x":50,"y":50,"fieldType":"number","label":"Room Number"}]}"#,
            ),
            (DATA_KEY, r#"{"1712345678901":12}"#),
        ]);
        let config = repo.get_config().unwrap().unwrap();
        assert_eq!(config.hotspots[0].field_type, FieldType::Number);
        assert_eq!(
            repo.get_data().unwrap().get("1712345678901"),
            Some(&FieldValue::Number(12.0))
        );
    }

    #[test]
    fn unparsable_config_is_corrupt() {
        let repo = repo_with(&[(CONFIG_KEY, "{not json")]);
        assert!(matches!(
            repo.get_config(),
            Err(SketchError::PersistedStateCorrupt { ref key, .. }) if key == CONFIG_KEY
        ));
    }

    #[test]
    fn shape_mismatch_is_corrupt() {
        let repo = repo_with(&[(
            CONFIG_KEY,
            r#"{"image":"data:,","hotspots":[{"id":"a","x":500,"y":5,"fieldType":"text","label":"A"}]}"#,
        )]);
        assert!(matches!(
            repo.get_config(),
            Err(SketchError::PersistedStateCorrupt { .. })
        ));

        let repo = repo_with(&[(CONFIG_KEY, r#"{"image":"data:,","hotspots":[{"id":"a"}]}"#)]);
        assert!(repo.get_config().is_err());
    }

    #[test]
    fn corrupt_data_is_reported() {
        let repo = repo_with(&[(DATA_KEY, r#"{"a":{"nested":true}}"#)]);
        assert!(matches!(
            repo.get_data(),
            Err(SketchError::PersistedStateCorrupt { ref key, .. }) if key == DATA_KEY
        ));
    }
}

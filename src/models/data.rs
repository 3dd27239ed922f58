//! Collected values keyed by hotspot id.
//!
//! Completion is decided by key presence only: a stored `0` or an empty
//! string still counts as completed. Entries whose hotspot no longer exists
//! are kept and ignored.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::hotspot::Hotspot;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct HotspotData {
    entries: BTreeMap<String, FieldValue>,
}

impl HotspotData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hotspot_id: &str) -> Option<&FieldValue> {
        self.entries.get(hotspot_id)
    }

    pub fn is_completed(&self, hotspot_id: &str) -> bool {
        self.entries.contains_key(hotspot_id)
    }

    pub fn insert(&mut self, hotspot_id: impl Into<String>, value: FieldValue) {
        self.entries.insert(hotspot_id.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn completion(&self, hotspots: &[Hotspot]) -> CompletionStatus {
        let completed = hotspots
            .iter()
            .filter(|hotspot| self.is_completed(&hotspot.id))
            .count();
        CompletionStatus {
            completed,
            total: hotspots.len(),
        }
    }

    /// Number of stored entries that reference none of the given hotspots.
    pub fn orphaned(&self, hotspots: &[Hotspot]) -> usize {
        self.entries
            .keys()
            .filter(|id| !hotspots.iter().any(|hotspot| &hotspot.id == *id))
            .count()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStatus {
    pub completed: usize,
    pub total: usize,
}

impl CompletionStatus {
    pub fn pending(&self) -> usize {
        self.total - self.completed
    }

    /// Completion as a percentage; 0 when there is nothing to complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64 * 100.0
        }
    }

    pub fn is_all_completed(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;

    fn hotspot(id: &str) -> Hotspot {
        Hotspot {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            field_type: FieldType::Number,
            label: id.to_uppercase(),
            options: None,
        }
    }

    #[test]
    fn zero_counts_as_completed() {
        let mut data = HotspotData::new();
        data.insert("a", FieldValue::Number(0.0));
        let status = data.completion(&[hotspot("a"), hotspot("b")]);
        assert_eq!(status, CompletionStatus { completed: 1, total: 2 });
        assert_eq!(status.pending(), 1);
        assert!(!status.is_all_completed());
    }

    #[test]
    fn orphaned_entries_do_not_count() {
        let mut data = HotspotData::new();
        data.insert("gone", FieldValue::Text("x".into()));
        let hotspots = [hotspot("a")];
        assert_eq!(data.completion(&hotspots).completed, 0);
        assert_eq!(data.orphaned(&hotspots), 1);
    }

    #[test]
    fn empty_configuration_is_never_all_completed() {
        let status = CompletionStatus::default();
        assert!(!status.is_all_completed());
        assert_eq!(status.percent(), 0.0);
    }

    #[test]
    fn decodes_mixed_value_types() {
        let data: HotspotData = serde_json::from_str(r#"{"a": 12, "b": "north"}"#).unwrap();
        assert_eq!(data.get("a"), Some(&FieldValue::Number(12.0)));
        assert_eq!(data.get("b"), Some(&FieldValue::Text("north".into())));
        assert_eq!(data.get("a").unwrap().to_string(), "12");
    }

    #[test]
    fn rejects_values_that_are_neither_text_nor_number() {
        assert!(serde_json::from_str::<HotspotData>(r#"{"a": true}"#).is_err());
        assert!(serde_json::from_str::<HotspotData>(r#"{"a": null}"#).is_err());
        assert!(serde_json::from_str::<HotspotData>("[]").is_err());
    }
}

//! Hotspot data models.
//!
//! A hotspot is a labeled point on a diagram. Positions are stored as
//! percentages of the image width/height so they survive any scaling.

use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};

pub const HOTSPOT_ID_PREFIX: &str = "hs_";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Number,
    Select,
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::Text
    }
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Select => "select",
        }
    }

    pub fn parse(value: &str) -> Option<FieldType> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Some(FieldType::Text),
            "number" => Some(FieldType::Number),
            "select" => Some(FieldType::Select),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Hotspot {
    /// Options offered by a `select` hotspot; empty for other field types.
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    /// Shape check applied to hotspots decoded from storage.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("hotspot with empty id".into());
        }
        if !is_percentage(self.x) || !is_percentage(self.y) {
            return Err(format!(
                "hotspot {} has coordinates ({}, {}) outside 0-100",
                self.id, self.x, self.y
            ));
        }
        if self.label.trim().is_empty() {
            return Err(format!("hotspot {} has an empty label", self.id));
        }
        match (self.field_type, &self.options) {
            (FieldType::Select, Some(options)) if !options.is_empty() => Ok(()),
            (FieldType::Select, _) => Err(format!("select hotspot {} has no options", self.id)),
            (_, Some(_)) => Err(format!(
                "{} hotspot {} carries select options",
                self.field_type.as_str(),
                self.id
            )),
            (_, None) => Ok(()),
        }
    }
}

fn is_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

pub fn generate_hotspot_id() -> String {
    format!("{HOTSPOT_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

/// Pending hotspot definition, filled in before the canvas click that places it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotDraft {
    pub label: String,
    pub field_type: FieldType,
    pub options: Vec<String>,
}

impl HotspotDraft {
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            field_type,
            options: Vec::new(),
        }
    }

    /// Sets the options from comma-separated user input.
    pub fn with_options_input(mut self, raw: &str) -> Self {
        self.options = parse_options(raw);
        self
    }

    pub fn validate(&self) -> SketchResult<()> {
        if self.label.trim().is_empty() {
            return Err(SketchError::validation(
                "fill in the hotspot label before placing it",
            ));
        }
        if self.field_type == FieldType::Select && self.options.is_empty() {
            return Err(SketchError::validation(
                "a select hotspot needs at least one option",
            ));
        }
        Ok(())
    }

    pub fn into_hotspot(self, x: f64, y: f64) -> Hotspot {
        let options = match self.field_type {
            FieldType::Select => Some(self.options),
            _ => None,
        };
        Hotspot {
            id: generate_hotspot_id(),
            x,
            y,
            field_type: self.field_type,
            label: self.label.trim().to_string(),
            options,
        }
    }
}

/// Splits comma-separated input, trimming entries and dropping empty ones.
pub fn parse_options(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bounding box of the canvas the diagram is drawn on, in the same units as clicks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A canvas whose coordinates are already percentages.
    pub fn unit() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    /// Converts a raw click into percentage coordinates clamped to [0, 100].
    pub fn to_percent(&self, click_x: f64, click_y: f64) -> SketchResult<(f64, f64)> {
        let usable = |extent: f64| extent.is_finite() && extent > 0.0;
        if !usable(self.width) || !usable(self.height) {
            return Err(SketchError::validation(format!(
                "canvas size {}x{} must be positive",
                self.width, self.height
            )));
        }
        if !click_x.is_finite() || !click_y.is_finite() {
            return Err(SketchError::validation("click position must be a number"));
        }

        let x = ((click_x - self.left) / self.width) * 100.0;
        let y = ((click_y - self.top) / self.height) * 100.0;
        Ok((clamp_percent(x), clamp_percent(y)))
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

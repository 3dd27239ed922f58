use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::hotspot::Hotspot;

/// The diagram image plus its ordered hotspots.
///
/// Insertion order is display order and numbering order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SketchConfig {
    /// `data:` URL of the uploaded image or PDF.
    pub image: String,
    pub hotspots: Vec<Hotspot>,
}

impl SketchConfig {
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|hotspot| hotspot.id == id)
    }

    pub fn check_shape(&self) -> Result<(), String> {
        if self.image.trim().is_empty() {
            return Err("configuration has no image".into());
        }

        let mut seen = HashSet::new();
        for hotspot in &self.hotspots {
            hotspot.check_shape()?;
            if !seen.insert(hotspot.id.as_str()) {
                return Err(format!("duplicate hotspot id {}", hotspot.id));
            }
        }
        Ok(())
    }
}

/// Resolves a hotspot id, falling back to a 1-based position.
pub fn resolve_hotspot<'a>(hotspots: &'a [Hotspot], reference: &str) -> Option<&'a Hotspot> {
    let reference = reference.trim();
    if let Some(hotspot) = hotspots.iter().find(|hotspot| hotspot.id == reference) {
        return Some(hotspot);
    }
    match reference.parse::<usize>() {
        Ok(number) if number >= 1 => hotspots.get(number - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldType;

    fn hotspot(id: &str, label: &str) -> Hotspot {
        Hotspot {
            id: id.into(),
            x: 10.0,
            y: 10.0,
            field_type: FieldType::Text,
            label: label.into(),
            options: None,
        }
    }

    #[test]
    fn resolves_by_id_before_number() {
        let hotspots = vec![hotspot("2", "A"), hotspot("x", "B")];
        assert_eq!(resolve_hotspot(&hotspots, "2").unwrap().label, "A");
        assert_eq!(resolve_hotspot(&hotspots, "x").unwrap().label, "B");
        assert_eq!(resolve_hotspot(&hotspots, "1").unwrap().label, "A");
        assert!(resolve_hotspot(&hotspots, "0").is_none());
        assert!(resolve_hotspot(&hotspots, "3").is_none());
    }

    #[test]
    fn lookup_by_id_ignores_positions() {
        let config = SketchConfig {
            image: "data:image/png;base64,AA==".into(),
            hotspots: vec![hotspot("a", "A"), hotspot("b", "B")],
        };
        assert_eq!(config.hotspot("b").unwrap().label, "B");
        assert!(config.hotspot("1").is_none());
    }

    #[test]
    fn duplicate_ids_fail_the_shape_check() {
        let config = SketchConfig {
            image: "data:image/png;base64,AA==".into(),
            hotspots: vec![hotspot("a", "A"), hotspot("a", "B")],
        };
        assert!(config.check_shape().unwrap_err().contains("duplicate"));
    }
}

//! Command layer for the configuration editor.
//!
//! Errors are flattened to user-facing messages here.

use std::path::Path;

use super::ConfigEditor;
use crate::{
    display::field_type_name,
    error::SketchError,
    lock,
    media::UploadedFile,
    models::{resolve_hotspot, CanvasRect, FieldType, Hotspot, HotspotDraft},
    AppState,
};

/// Hotspot as listed in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotListing {
    pub number: usize,
    pub id: String,
    pub label: String,
    pub field_type: String,
    pub x: f64,
    pub y: f64,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorStatus {
    pub has_image: bool,
    pub hotspot_count: usize,
    pub placing: Option<String>,
}

pub fn upload_image(state: &AppState, path: &Path) -> Result<String, String> {
    let file = UploadedFile::from_path(path).map_err(|e| format!("{e:#}"))?;
    let description = format!("{} ({})", file.file_name, file.mime_type);
    lock(&state.editor)
        .upload_image(file)
        .map_err(|e| e.to_string())?;
    Ok(description)
}

/// Loads the saved configuration into the editor; returns a note about what was found.
pub fn open_saved_config(state: &AppState) -> Result<String, String> {
    let (editor, message) = match state.repo.get_config() {
        Ok(Some(config)) => {
            let count = config.hotspots.len();
            (
                ConfigEditor::from_config(config),
                format!("opened saved configuration with {count} hotspot(s)"),
            )
        }
        Ok(None) => (ConfigEditor::new(), "no configuration saved yet".to_string()),
        Err(err @ SketchError::PersistedStateCorrupt { .. }) => {
            log::warn!("{err}");
            (
                ConfigEditor::new(),
                "warning: the saved configuration could not be read; starting empty".to_string(),
            )
        }
        Err(err) => return Err(err.to_string()),
    };
    *lock(&state.editor) = editor;
    Ok(message)
}

pub fn begin_placement(
    state: &AppState,
    label: &str,
    field_type: &str,
    options: Option<&str>,
) -> Result<(), String> {
    let field_type = FieldType::parse(field_type)
        .ok_or_else(|| format!("unknown field type '{field_type}' (text, number, select)"))?;

    let mut draft = HotspotDraft::new(label, field_type);
    if field_type == FieldType::Select {
        draft = draft.with_options_input(options.unwrap_or_default());
    }

    lock(&state.editor)
        .begin_placement(draft)
        .map_err(|e| e.to_string())
}

pub fn place_hotspot(
    state: &AppState,
    click_x: f64,
    click_y: f64,
    canvas: CanvasRect,
) -> Result<Hotspot, String> {
    lock(&state.editor)
        .place_hotspot(click_x, click_y, canvas)
        .cloned()
        .map_err(|e| e.to_string())
}

pub fn cancel_placement(state: &AppState) {
    lock(&state.editor).cancel_placement();
}

/// Removes a hotspot addressed by id or 1-based number.
pub fn remove_hotspot(state: &AppState, reference: &str) -> Option<Hotspot> {
    let mut editor = lock(&state.editor);
    let id = resolve_hotspot(editor.hotspots(), reference)?.id.clone();
    editor.remove_hotspot(&id)
}

pub fn list_hotspots(state: &AppState) -> Vec<HotspotListing> {
    let language = state.settings.language();
    lock(&state.editor)
        .hotspots()
        .iter()
        .enumerate()
        .map(|(index, hotspot)| HotspotListing {
            number: index + 1,
            id: hotspot.id.clone(),
            label: hotspot.label.clone(),
            field_type: field_type_name(hotspot.field_type, language).to_string(),
            x: hotspot.x,
            y: hotspot.y,
            options: hotspot.options().to_vec(),
        })
        .collect()
}

pub fn editor_status(state: &AppState) -> EditorStatus {
    let editor = lock(&state.editor);
    EditorStatus {
        has_image: editor.has_image(),
        hotspot_count: editor.hotspots().len(),
        placing: editor
            .is_placing()
            .then(|| editor.draft().label.clone()),
    }
}

/// Saves the configuration; returns the number of hotspots written.
pub fn save_config(state: &AppState) -> Result<usize, String> {
    let editor = lock(&state.editor);
    editor
        .save(&state.repo)
        .map(|config| config.hotspots.len())
        .map_err(|e| e.to_string())
}

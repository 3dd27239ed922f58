//! Configuration editor: upload a diagram, place hotspots, save.

use crate::error::{SketchError, SketchResult};
use crate::log_info;
use crate::media::UploadedFile;
use crate::models::{CanvasRect, Hotspot, HotspotDraft, SketchConfig};
use crate::store::Repository;

const ENABLE_LOGS: bool = true;

/// In-memory editing state; nothing is persisted until [`ConfigEditor::save`].
#[derive(Debug, Clone, Default)]
pub struct ConfigEditor {
    image: Option<String>,
    hotspots: Vec<Hotspot>,
    draft: HotspotDraft,
    placing: bool,
}

impl ConfigEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: SketchConfig) -> Self {
        Self {
            image: Some(config.image),
            hotspots: config.hotspots,
            ..Self::default()
        }
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn draft(&self) -> &HotspotDraft {
        &self.draft
    }

    pub fn is_placing(&self) -> bool {
        self.placing
    }

    /// Replaces the diagram. Existing hotspots are dropped, which orphans any
    /// values collected for them.
    pub fn upload_image(&mut self, file: UploadedFile) -> SketchResult<()> {
        let file_name = file.file_name.clone();
        let image = file.into_data_url()?;

        self.image = Some(image);
        self.hotspots.clear();
        self.placing = false;
        log_info!("Uploaded diagram {file_name}; hotspots reset");
        Ok(())
    }

    /// Arms placement mode; the next canvas click places `draft`.
    pub fn begin_placement(&mut self, draft: HotspotDraft) -> SketchResult<()> {
        if !self.has_image() {
            return Err(SketchError::validation(
                "upload a diagram before adding hotspots",
            ));
        }
        draft.validate()?;

        self.draft = draft;
        self.placing = true;
        Ok(())
    }

    /// Leaves placement mode and discards the draft.
    pub fn cancel_placement(&mut self) {
        self.placing = false;
        self.draft = HotspotDraft::default();
    }

    /// Places the pending draft at a click inside `canvas`.
    pub fn place_hotspot(
        &mut self,
        click_x: f64,
        click_y: f64,
        canvas: CanvasRect,
    ) -> SketchResult<&Hotspot> {
        if !self.placing {
            return Err(SketchError::validation(
                "choose \"add hotspot\" before clicking the diagram",
            ));
        }
        if !self.has_image() {
            return Err(SketchError::validation("no diagram is loaded"));
        }
        self.draft.validate()?;
        let (x, y) = canvas.to_percent(click_x, click_y)?;

        let hotspot = std::mem::take(&mut self.draft).into_hotspot(x, y);
        log_info!(
            "Placed hotspot {} '{}' at ({x:.2}, {y:.2})",
            hotspot.id,
            hotspot.label
        );
        self.hotspots.push(hotspot);
        self.placing = false;

        Ok(&self.hotspots[self.hotspots.len() - 1])
    }

    /// Removes the hotspot with `id`. Unknown ids are a no-op.
    pub fn remove_hotspot(&mut self, id: &str) -> Option<Hotspot> {
        let position = self.hotspots.iter().position(|hotspot| hotspot.id == id)?;
        let removed = self.hotspots.remove(position);
        log_info!("Removed hotspot {}", removed.id);
        Some(removed)
    }

    pub fn to_config(&self) -> SketchResult<SketchConfig> {
        let Some(image) = &self.image else {
            return Err(SketchError::validation(
                "upload a diagram and add at least one hotspot before saving",
            ));
        };
        if self.hotspots.is_empty() {
            return Err(SketchError::validation(
                "upload a diagram and add at least one hotspot before saving",
            ));
        }
        Ok(SketchConfig {
            image: image.clone(),
            hotspots: self.hotspots.clone(),
        })
    }

    /// Overwrites the persisted configuration with the current one.
    pub fn save(&self, repo: &Repository) -> SketchResult<SketchConfig> {
        let config = self.to_config()?;
        repo.set_config(&config)?;
        Ok(config)
    }
}

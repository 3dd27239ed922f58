pub mod data;
pub mod hotspot;
pub mod sketch;

pub use data::{CompletionStatus, FieldValue, HotspotData};
pub use hotspot::{parse_options, CanvasRect, FieldType, Hotspot, HotspotDraft};
pub use sketch::{resolve_hotspot, SketchConfig};

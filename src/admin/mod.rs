pub mod commands;
pub mod editor;

pub use editor::ConfigEditor;

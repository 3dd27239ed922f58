//! User-facing names for field types, completion states and export columns.

use serde::{Deserialize, Serialize};

use crate::models::FieldType;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "he")]
    Hebrew,
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl Language {
    pub fn parse(value: &str) -> Option<Language> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Language::English),
            "he" | "hebrew" => Some(Language::Hebrew),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hebrew => "he",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EntryStatus {
    Completed,
    Pending,
}

impl EntryStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            EntryStatus::Completed
        } else {
            EntryStatus::Pending
        }
    }
}

pub fn field_type_name(field_type: FieldType, language: Language) -> &'static str {
    match (language, field_type) {
        (Language::English, FieldType::Text) => "Text",
        (Language::English, FieldType::Number) => "Number",
        (Language::English, FieldType::Select) => "Select",
        (Language::Hebrew, FieldType::Text) => "טקסט",
        (Language::Hebrew, FieldType::Number) => "מספר",
        (Language::Hebrew, FieldType::Select) => "בחירה",
    }
}

pub fn status_name(status: EntryStatus, language: Language) -> &'static str {
    match (language, status) {
        (Language::English, EntryStatus::Completed) => "Completed",
        (Language::English, EntryStatus::Pending) => "Pending",
        (Language::Hebrew, EntryStatus::Completed) => "הושלם",
        (Language::Hebrew, EntryStatus::Pending) => "ממתין",
    }
}

/// Column titles of the delimited export, in column order.
pub fn export_header(language: Language) -> [&'static str; 5] {
    match language {
        Language::English => ["Point", "Label", "Field type", "Value", "Status"],
        Language::Hebrew => ["נקודה", "תווית", "סוג שדה", "ערך", "סטטוס"],
    }
}

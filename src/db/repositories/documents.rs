use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{helpers::parse_datetime, Database};

/// A stored document body together with the time it was last written.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub key: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

fn row_to_document(row: &Row) -> Result<DocumentRecord> {
    let updated_at: String = row.get("updated_at")?;

    Ok(DocumentRecord {
        key: row.get("key")?,
        body: row.get("body")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    /// Get a document by key
    pub fn get_document(&self, key: &str) -> Result<Option<DocumentRecord>> {
        let key = key.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT key, body, updated_at
                 FROM documents
                 WHERE key = ?1",
            )?;

            let mut rows = stmt.query(params![key])?;
            match rows.next()? {
                Some(row) => Ok(Some(row_to_document(row)?)),
                None => Ok(None),
            }
        })
    }

    /// Replace the document stored under `key` in a single statement
    pub fn put_document(&self, key: &str, body: &str) -> Result<DocumentRecord> {
        let key = key.to_string();
        let body = body.to_string();
        self.execute(move |conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO documents (key, body, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     body = excluded.body,
                     updated_at = excluded.updated_at",
                params![key, body, now.to_rfc3339()],
            )
            .with_context(|| format!("failed to write document {key}"))?;

            Ok(DocumentRecord {
                key,
                body,
                updated_at: now,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_overwrites_previous_body() {
        let db = Database::in_memory().unwrap();
        db.put_document("sketchConfig", "{\"v\":1}").unwrap();
        db.put_document("sketchConfig", "{\"v\":2}").unwrap();

        let record = db.get_document("sketchConfig").unwrap().unwrap();
        assert_eq!(record.body, "{\"v\":2}");
        assert_eq!(record.key, "sketchConfig");
    }

    #[test]
    fn missing_document_is_none() {
        let db = Database::in_memory().unwrap();
        assert!(db.get_document("hotspotData").unwrap().is_none());
    }
}

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_into_utc() {
        let parsed = parse_datetime("2026-03-01T10:00:00+02:00", "updated_at").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T08:00:00+00:00");
    }

    #[test]
    fn error_names_the_field() {
        let err = parse_datetime("yesterday", "updated_at").unwrap_err();
        assert!(err.to_string().contains("updated_at"));
    }
}

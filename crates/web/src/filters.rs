//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Trims a rendered timestamp down to minute precision.
///
/// Works on anything whose `Display` output starts `YYYY-MM-DD HH:MM`
/// (chrono's `DateTime<Utc>` does; a bare `NaiveDate` passes through
/// unchanged).
///
/// Usage in templates: `{{ record.created_at|short_date }}`
#[askama::filter_fn]
pub fn short_date(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(truncate_to_minute(&value.to_string()))
}

fn truncate_to_minute(rendered: &str) -> String {
    rendered.chars().take(16).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_timestamps() {
        let ts = "2026-08-06 09:15:42.123456789 UTC";
        assert_eq!(truncate_to_minute(ts), "2026-08-06 09:15");
    }

    #[test]
    fn test_keeps_bare_dates() {
        assert_eq!(truncate_to_minute("2026-08-06"), "2026-08-06");
    }
}

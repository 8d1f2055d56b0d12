//! Helpers for parsing posted form fields.

use chrono::NaiveDate;

use crate::error::{AppError, AppResult};

/// Date format used by every date input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` form value.
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

/// Empty or whitespace-only input becomes `None`.
pub fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            parse_date(" 2024-03-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(matches!(parse_date("01/03/2024"), Err(AppError::Validation(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(AppError::Validation(_))));
        assert!(matches!(parse_date(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  "), None);
        assert_eq!(non_empty(" notes "), Some("notes".to_string()));
    }
}

use chrono::{NaiveDate, Utc};
use common::MonthWindow;

use crate::error::{ReportError, Result};

/// Date format accepted for caller-supplied reference dates.
const REFERENCE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves an optional caller-supplied reference date.
///
/// A missing reference defaults to the current date at call time; a present
/// but unparseable one fails with `InvalidArgument`.
pub fn resolve_reference_date(reference: Option<&str>) -> Result<NaiveDate> {
    match reference {
        Some(raw) => NaiveDate::parse_from_str(raw, REFERENCE_DATE_FORMAT).map_err(|e| {
            ReportError::InvalidArgument(format!("unparseable reference date '{raw}': {e}"))
        }),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Computes the month window for an optional reference date string.
pub fn resolve_window(reference: Option<&str>) -> Result<MonthWindow> {
    Ok(MonthWindow::containing(resolve_reference_date(reference)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reference_date_parses_iso_date() {
        let date = resolve_reference_date(Some("2024-01-15")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_resolve_reference_date_rejects_garbage() {
        let err = resolve_reference_date(Some("not-a-date")).unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument(_)));

        let err = resolve_reference_date(Some("2024-13-40")).unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument(_)));
    }

    #[test]
    fn test_resolve_reference_date_defaults_to_today() {
        let date = resolve_reference_date(None).unwrap();
        assert_eq!(date, Utc::now().date_naive());
    }

    #[test]
    fn test_resolve_window_covers_reference_month() {
        let window = resolve_window(Some("2024-06-17")).unwrap();
        assert_eq!(window.first_day(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(window.last_day(), NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }
}

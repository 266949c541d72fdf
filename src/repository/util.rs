//! Repository utilities.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};

use super::pool::DbError;

/// Plain-message error info for errors raised outside SQLite itself.
#[derive(Debug)]
pub struct DbErrorInfo(pub String);

impl DatabaseErrorInformation for DbErrorInfo {
    fn message(&self) -> &str {
        &self.0
    }
    fn details(&self) -> Option<&str> {
        None
    }
    fn hint(&self) -> Option<&str> {
        None
    }
    fn table_name(&self) -> Option<&str> {
        None
    }
    fn column_name(&self) -> Option<&str> {
        None
    }
    fn constraint_name(&self) -> Option<&str> {
        None
    }
    fn statement_position(&self) -> Option<i32> {
        None
    }
}

/// Convert any displayable error to a diesel error with proper message.
pub fn to_diesel_error(e: impl std::fmt::Display) -> DbError {
    DbError::DatabaseError(DatabaseErrorKind::Unknown, Box::new(DbErrorInfo(e.to_string())))
}

/// Whether `e` came from a UNIQUE constraint.
pub fn is_unique_violation(e: &DbError) -> bool {
    matches!(e, DbError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
}

/// Timestamp text stored in `created_at` columns.
///
/// Fixed-width microsecond RFC 3339 so lexical order matches time order.
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Build a `LIKE` pattern matching `query` anywhere, escaping wildcards with `\`.
///
/// A blank query yields `%`, which matches every row.
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    if pattern.len() > 1 {
        pattern.push('%');
    }
    pattern
}

/// Row offset for a 1-based page. Saturates for huge page numbers.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    page.max(1).saturating_sub(1).saturating_mul(per_page.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern(""), "%");
        assert_eq!(like_pattern("  "), "%");
        assert_eq!(like_pattern("smith"), "%smith%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(i64::MAX, 20), i64::MAX);
        assert_eq!(page_offset(i64::MIN, 20), 0);
    }

    #[test]
    fn test_timestamp_roundtrip_and_order() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(1500);
        let (sa, sb) = (format_timestamp(&a), format_timestamp(&b));
        assert_eq!(sa.len(), sb.len());
        assert!(sa < sb);
        assert_eq!(parse_datetime(&sb), b);
        assert_eq!(parse_datetime("garbage"), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(!is_unique_violation(&to_diesel_error("boom")));
        assert!(!is_unique_violation(&DbError::NotFound));
    }
}

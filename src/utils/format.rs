//! Human-readable formatting for document tables.

use chrono::{DateTime, Utc};

/// Format a byte count, or "-" when unknown.
pub fn format_size(bytes: Option<i64>) -> String {
    let Some(bytes) = bytes.filter(|b| *b >= 0) else {
        return "-".to_string();
    };
    let bytes = bytes as f64;
    if bytes >= 1_048_576.0 {
        format!("{:.1} MB", bytes / 1_048_576.0)
    } else if bytes >= 1024.0 {
        format!("{:.1} KB", bytes / 1024.0)
    } else {
        format!("{} B", bytes as i64)
    }
}

/// Short date used in document and activity tables.
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %d, %Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(None), "-");
        assert_eq!(format_size(Some(0)), "0 B");
        assert_eq!(format_size(Some(512)), "512 B");
        assert_eq!(format_size(Some(1536)), "1.5 KB");
        assert_eq!(format_size(Some(5 * 1_048_576)), "5.0 MB");
    }

    #[test]
    fn test_format_date() {
        let dt = Utc.with_ymd_and_hms(2024, 4, 15, 9, 30, 0).unwrap();
        assert_eq!(format_date(&dt), "Apr 15, 2024 09:30");
    }
}

//! Filename handling for blob keys and download headers.

/// Make a single path segment safe for use as part of a blob key.
///
/// Path separators, NUL and control characters become `_`, and a segment
/// made only of dots is replaced so it cannot climb out of its directory.
pub fn sanitize_segment(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build an attachment `Content-Disposition` value for `file_name`.
///
/// Emits an ASCII fallback plus an RFC 5987 `filename*` for non-ASCII names.
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ascii == file_name {
        format!("attachment; filename=\"{}\"", ascii)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            ascii,
            urlencoding::encode(file_name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_segment_replaces_separators() {
        assert_eq!(sanitize_segment("w2_2024.pdf"), "w2_2024.pdf");
        assert_eq!(sanitize_segment("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_segment("tab\there"), "tab_here");
        assert_eq!(sanitize_segment("Last Year Tax Returns"), "Last Year Tax Returns");
    }

    #[test]
    fn test_sanitize_segment_dot_names() {
        assert_eq!(sanitize_segment(".."), "file");
        assert_eq!(sanitize_segment("   "), "file");
        assert_eq!(sanitize_segment("..pdf"), "..pdf");
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("w2_2024.pdf"),
            "attachment; filename=\"w2_2024.pdf\""
        );
        let header = content_disposition("résumé.pdf");
        assert!(header.starts_with("attachment; filename=\"r_sum_.pdf\""));
        assert!(header.contains("filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"));
    }
}

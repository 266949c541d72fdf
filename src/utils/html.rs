//! HTML escaping utilities.

/// Escape HTML special characters for safe rendering in text and attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Append a `notice` toast message to a redirect target.
pub fn notice_query(path: &str, message: &str) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{}{}notice={}", path, sep, urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_markup() {
        assert_eq!(html_escape("w2_2024.pdf"), "w2_2024.pdf");
        assert_eq!(html_escape("<b>W2s</b>"), "&lt;b&gt;W2s&lt;/b&gt;");
        assert_eq!(html_escape("Tom & Jerry's"), "Tom &amp; Jerry&#39;s");
        assert_eq!(html_escape("\"x\""), "&quot;x&quot;");
    }

    #[test]
    fn test_notice_query() {
        assert_eq!(
            notice_query("/dashboard/upload", "Files uploaded"),
            "/dashboard/upload?notice=Files%20uploaded"
        );
        assert_eq!(
            notice_query("/admin/users?page=2", "Deleted"),
            "/admin/users?page=2&notice=Deleted"
        );
    }
}

//! Small HTML fragments built with `format!` and spliced into templates.

use crate::utils::html_escape;

/// Rows per page on admin listings.
pub const PER_PAGE: i64 = 20;

/// Number of pages needed for `total` rows.
pub fn page_count(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        1
    } else {
        (total + per_page - 1) / per_page
    }
}

/// Previous/next links for a paged admin table.
///
/// `base` is the listing path; the search query is carried across pages.
pub fn pagination(base: &str, query: &str, page: i64, total: i64, per_page: i64) -> String {
    let pages = page_count(total, per_page);
    if pages <= 1 {
        return String::new();
    }

    let link = |target: i64| {
        let mut href = format!("{}?page={}", base, target);
        if !query.trim().is_empty() {
            href.push_str("&q=");
            href.push_str(&urlencoding::encode(query.trim()));
        }
        html_escape(&href)
    };

    // Past the end, Previous jumps back to the last page.
    let prev = if page > 1 {
        format!(
            r#"<a class="btn btn-outline" href="{}">Previous</a>"#,
            link((page - 1).min(pages))
        )
    } else {
        r#"<span class="btn btn-outline disabled">Previous</span>"#.to_string()
    };
    let next = if page < pages {
        format!(r#"<a class="btn btn-outline" href="{}">Next</a>"#, link(page + 1))
    } else {
        r#"<span class="btn btn-outline disabled">Next</span>"#.to_string()
    };

    format!(
        r#"<nav class="pagination">{}<span class="page-info">Page {} of {}</span>{}</nav>"#,
        prev, page, pages, next
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(21, 20), 2);
    }

    #[test]
    fn test_single_page_has_no_links() {
        assert_eq!(pagination("/admin/users", "", 1, 5, 20), "");
    }

    #[test]
    fn test_pagination_links_keep_query() {
        let html = pagination("/admin/users", "smith & co", 2, 45, 20);
        assert!(html.contains("Page 2 of 3"));
        assert!(html.contains("/admin/users?page=1&amp;q=smith%20%26%20co"));
        assert!(html.contains("/admin/users?page=3&amp;q=smith%20%26%20co"));
    }

    #[test]
    fn test_page_past_end_links_back_to_last() {
        let html = pagination("/admin/users", "", i64::MAX, 45, 20);
        assert!(html.contains("/admin/users?page=3"));
        assert!(html.contains(r#"<span class="btn btn-outline disabled">Next</span>"#));
    }

    #[test]
    fn test_first_page_disables_previous() {
        let html = pagination("/admin/activities", "", 1, 45, 20);
        assert!(html.contains(r#"<span class="btn btn-outline disabled">Previous</span>"#));
        assert!(html.contains("/admin/activities?page=2"));
    }
}

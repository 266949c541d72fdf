//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Every page carries a `PageChrome` that `base.html` reads for the title,
//! the navigation and the notice toast.

use askama::Template;

use super::content::Service;
use crate::models::{Activity, DocumentKind, DocumentRecord, Profile, SessionUser};
use crate::services::{AdminStats, ClientStats};
use crate::utils::{format_date, format_size};

/// Shared page frame: title, signed-in user and an optional notice.
pub struct PageChrome {
    pub title: String,
    pub user: Option<NavUser>,
    pub notice: Option<String>,
}

/// What the navigation bar needs to know about the signed-in user.
pub struct NavUser {
    pub display_name: String,
    pub is_admin: bool,
}

impl PageChrome {
    pub fn new(title: impl Into<String>, user: Option<&SessionUser>, notice: Option<String>) -> Self {
        Self {
            title: title.into(),
            user: user.map(|u| NavUser {
                display_name: u.display_name.clone(),
                is_admin: u.is_admin(),
            }),
            notice: notice.filter(|n| !n.trim().is_empty()),
        }
    }
}

/// One row of a document table.
pub struct DocumentRow {
    pub id: String,
    pub file_name: String,
    pub category: String,
    pub year: String,
    pub size_str: String,
    pub date_str: String,
    pub download_url: String,
    pub delete_url: String,
}

impl DocumentRow {
    pub fn from_record(record: &DocumentRecord) -> Self {
        let base = format!("/documents/{}/{}", record.kind.as_str(), record.id);
        Self {
            id: record.id.clone(),
            file_name: record.file_name.clone(),
            category: record.category.clone(),
            year: record.year.clone(),
            size_str: format_size(record.file_size),
            date_str: format_date(&record.created_at),
            download_url: format!("{}/download", base),
            delete_url: format!("{}/delete", base),
        }
    }
}

/// Upload form shown above a document table.
pub struct UploadForm {
    pub action: String,
    pub years: Vec<&'static str>,
    pub categories: Vec<&'static str>,
    /// Client uploads must pick a category; other kinds have a fixed one.
    pub choose_category: bool,
    /// Admin uploads of drafts and finals choose the copy type.
    pub choose_kind: bool,
    pub submit_label: String,
}

impl UploadForm {
    pub fn for_kind(kind: DocumentKind, action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            years: crate::models::TAX_YEARS.to_vec(),
            categories: kind.categories().to_vec(),
            choose_category: kind == DocumentKind::Upload,
            choose_kind: false,
            submit_label: format!("Upload {}", kind.label()),
        }
    }

    /// Form on the admin user page for sending a draft or final copy.
    pub fn for_copies(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            years: crate::models::TAX_YEARS.to_vec(),
            categories: crate::models::COPY_CATEGORIES.to_vec(),
            choose_category: false,
            choose_kind: true,
            submit_label: "Upload Copy".to_string(),
        }
    }
}

/// Link in a tab strip.
pub struct TabLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// One row on the admin users table.
pub struct UserRow {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub date_str: String,
}

impl UserRow {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            name: profile.full_name(),
            email: profile.email.clone(),
            contact_number: profile.contact_number.clone(),
            date_str: format_date(&profile.created_at),
        }
    }
}

/// One row on the activity log table.
pub struct ActivityRow {
    pub user_email: String,
    pub action: String,
    pub description: String,
    pub ip_address: String,
    pub browser_info: String,
    pub date_str: String,
}

impl ActivityRow {
    pub fn from_activity(activity: &Activity) -> Self {
        Self {
            user_email: activity.user_email.clone(),
            action: activity.action.clone(),
            description: activity.description.clone(),
            ip_address: activity.ip_address.clone().unwrap_or_else(|| "-".to_string()),
            browser_info: activity.browser_info.clone().unwrap_or_else(|| "-".to_string()),
            date_str: format_date(&activity.created_at),
        }
    }
}

/// Dashboard tile linking to a document page.
pub struct DashboardCard {
    pub label: &'static str,
    pub count: i64,
    pub href: &'static str,
}

/// Landing page.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub page: PageChrome,
    pub services: &'a [Service],
}

/// About page.
#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub page: PageChrome,
}

/// Contact form. Field values survive a rejected submission.
#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageChrome,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// A single service description.
#[derive(Template)]
#[template(path = "service.html")]
pub struct ServiceTemplate<'a> {
    pub page: PageChrome,
    pub service: &'a Service,
    pub services: &'a [Service],
}

#[derive(Template)]
#[template(path = "refund_status.html")]
pub struct RefundStatusTemplate<'a> {
    pub page: PageChrome,
    pub irs_url: &'a str,
}

/// Link to a state revenue department.
pub struct StateLink {
    pub name: &'static str,
    pub url: &'static str,
}

#[derive(Template)]
#[template(path = "state_refund.html")]
pub struct StateRefundTemplate {
    pub page: PageChrome,
    pub states: Vec<StateLink>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: PageChrome,
    pub email: String,
}

/// Sign-up form. Field values survive a rejected submission; passwords do not.
#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub page: PageChrome,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub alternative_contact_number: String,
}

/// Client dashboard.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageChrome,
    pub stats: ClientStats,
    pub cards: Vec<DashboardCard>,
}

/// Any document table: the four client pages and the admin tax-form page.
#[derive(Template)]
#[template(path = "documents.html")]
pub struct DocumentsTemplate {
    pub page: PageChrome,
    pub heading: String,
    pub search_action: String,
    pub query: String,
    pub rows: Vec<DocumentRow>,
    pub upload: Option<UploadForm>,
    pub can_delete: bool,
    pub return_to: String,
    pub empty_message: String,
}

/// Admin dashboard.
#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct AdminDashboardTemplate {
    pub page: PageChrome,
    pub stats: AdminStats,
}

/// Paged list of client profiles.
#[derive(Template)]
#[template(path = "admin_users.html")]
pub struct AdminUsersTemplate {
    pub page: PageChrome,
    pub query: String,
    pub rows: Vec<UserRow>,
    pub total: i64,
    pub pagination: String,
}

/// One client's profile and documents.
#[derive(Template)]
#[template(path = "admin_user_detail.html")]
pub struct AdminUserDetailTemplate {
    pub page: PageChrome,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub alternative_contact_number: String,
    pub joined: String,
    pub tabs: Vec<TabLink>,
    pub rows: Vec<DocumentRow>,
    pub upload: Option<UploadForm>,
    pub can_delete: bool,
    pub return_to: String,
    pub empty_message: String,
}

/// Paged activity log.
#[derive(Template)]
#[template(path = "admin_activities.html")]
pub struct AdminActivitiesTemplate {
    pub page: PageChrome,
    pub query: String,
    pub rows: Vec<ActivityRow>,
    pub total: i64,
    pub pagination: String,
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page: PageChrome,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_document_row_urls() {
        let record = DocumentRecord {
            id: "abc".to_string(),
            kind: DocumentKind::Draft,
            owner: Some("U1".to_string()),
            category: "Draft".to_string(),
            year: "2024".to_string(),
            file_name: "return.pdf".to_string(),
            file_path: "U1/2024/Draft/1_return.pdf".to_string(),
            file_size: Some(2048),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        };
        let row = DocumentRow::from_record(&record);
        assert_eq!(row.download_url, "/documents/drafts/abc/download");
        assert_eq!(row.delete_url, "/documents/drafts/abc/delete");
        assert_eq!(row.size_str, "2.0 KB");
    }

    #[test]
    fn test_blank_notice_dropped() {
        let chrome = PageChrome::new("Home", None, Some("  ".to_string()));
        assert!(chrome.notice.is_none());
        assert!(chrome.user.is_none());
    }

    #[test]
    fn test_error_template_escapes() {
        let html = ErrorTemplate {
            page: PageChrome::new("Error", None, None),
            message: "<script>".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("&lt;script&gt;"));
    }
}

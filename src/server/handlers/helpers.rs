//! Helper types and utility functions for handlers.

use askama::Template;
use axum::{
    extract::Multipart,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use serde::Deserialize;

use super::super::error::ApiError;
use super::super::template_structs::{ErrorTemplate, PageChrome};
use crate::models::{DocumentKind, DocumentRecord, SessionUser};
use crate::services::UploadFile;
use crate::utils::{content_disposition, notice_query};

/// Query params shared by listing pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub notice: Option<String>,
    pub tab: Option<String>,
    /// Admin-only filter on owned document kinds.
    pub user_id: Option<String>,
}

impl ListParams {
    pub fn query(&self) -> String {
        self.q.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Query params for pages that only show a notice.
#[derive(Debug, Default, Deserialize)]
pub struct NoticeParams {
    pub notice: Option<String>,
}

/// Form body for delete buttons.
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    pub return_to: Option<String>,
}

/// Fields of an upload form.
#[derive(Debug, Default)]
pub struct ParsedUpload {
    pub year: String,
    pub category: String,
    /// Target client for admin uploads.
    pub user_id: Option<String>,
    /// Copy type for admin uploads of drafts and finals.
    pub kind: Option<String>,
    pub files: Vec<UploadFile>,
}

/// Read an upload form. Repeated `files` parts become one batch; parts with
/// an empty filename (an untouched file input) are skipped.
pub async fn parse_upload(mut multipart: Multipart) -> Result<ParsedUpload, ApiError> {
    let mut parsed = ParsedUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" | "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data: Bytes = field.bytes().await.map_err(multipart_error)?;
                if file_name.trim().is_empty() {
                    continue;
                }
                parsed.files.push(UploadFile { file_name, data });
            }
            "year" => parsed.year = field.text().await.map_err(multipart_error)?,
            "category" => parsed.category = field.text().await.map_err(multipart_error)?,
            "user_id" => parsed.user_id = non_empty(field.text().await.map_err(multipart_error)?),
            "kind" => parsed.kind = non_empty(field.text().await.map_err(multipart_error)?),
            other => tracing::debug!("Ignoring upload form field '{}'", other),
        }
    }

    Ok(parsed)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::BadRequest("Upload exceeds the maximum allowed size".to_string())
    } else {
        ApiError::BadRequest(format!("Invalid upload form: {}", e.body_text()))
    }
}

/// Document kind from a URL slug.
pub fn parse_kind(slug: &str) -> Result<DocumentKind, ApiError> {
    DocumentKind::from_str(slug)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown document type '{}'", slug)))
}

/// File bytes as an attachment named after the record.
pub fn download_response(record: &DocumentRecord, data: Bytes) -> Response {
    let mime = mime_guess::from_path(&record.file_name)
        .first_or_octet_stream()
        .to_string();
    (
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_DISPOSITION, content_disposition(&record.file_name)),
        ],
        data,
    )
        .into_response()
}

/// Render a template, falling back to a plain 500 on template errors.
pub fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Error page with the given status.
pub fn error_page(status: StatusCode, user: Option<&SessionUser>, message: impl Into<String>) -> Response {
    let template = ErrorTemplate {
        page: PageChrome::new("Error", user, None),
        message: message.into(),
    };
    (status, render(&template)).into_response()
}

/// Local redirect target from a form, or `fallback` when absent or off-site.
///
/// Browsers drop tabs and newlines from URLs, so any whitespace or control
/// character is refused.
pub fn safe_return_to(raw: Option<&str>, fallback: &str) -> String {
    match raw.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(|c| c.is_control() || c.is_whitespace()) =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}

/// Redirect with a toast.
pub fn redirect_notice(path: &str, message: &str) -> Response {
    Redirect::to(&notice_query(path, message)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_return_to() {
        assert_eq!(safe_return_to(Some("/admin/users/u1?tab=drafts"), "/"), "/admin/users/u1?tab=drafts");
        assert_eq!(safe_return_to(Some("//evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_return_to(Some("https://evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_return_to(None, "/dashboard"), "/dashboard");
        assert_eq!(safe_return_to(Some("/\t/evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_return_to(Some("/\n/evil.example"), "/dashboard"), "/dashboard");
        assert_eq!(safe_return_to(Some("/ /evil.example"), "/dashboard"), "/dashboard");
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("drafts").unwrap(), DocumentKind::Draft);
        assert!(matches!(parse_kind("receipts"), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams {
            q: Some("  smith ".to_string()),
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(params.query(), "smith");
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_download_headers() {
        let record = DocumentRecord {
            id: "1".to_string(),
            kind: DocumentKind::Upload,
            owner: Some("U1".to_string()),
            category: "W2s".to_string(),
            year: "2024".to_string(),
            file_name: "w2.pdf".to_string(),
            file_path: "U1/2024/W2s/1_w2.pdf".to_string(),
            file_size: Some(3),
            created_at: chrono::Utc::now(),
        };
        let response = download_response(&record, Bytes::from_static(b"pdf"));
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"w2.pdf\""
        );
    }
}

//! Client portal: dashboard, document pages, download and delete.
//!
//! The four document pages share one renderer parameterized by
//! `DocumentKind`; only the heading and the upload form differ.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Form,
};

use super::super::error::ApiError;
use super::super::session::{client_info, PageUser};
use super::super::template_structs::{
    DashboardCard, DashboardTemplate, DocumentRow, DocumentsTemplate, PageChrome, UploadForm,
};
use super::super::AppState;
use super::helpers::{
    download_response, error_page, parse_kind, parse_upload, redirect_notice, render,
    safe_return_to, ListParams, NoticeParams, ReturnForm,
};
use crate::models::{DocumentKind, SessionUser};
use crate::services::UploadRequest;

/// Client page path for each document kind.
pub fn client_page_path(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::TaxForm => "/dashboard/tax-information-form",
        DocumentKind::Upload => "/dashboard/upload-documents",
        DocumentKind::Draft => "/dashboard/draft-copy",
        DocumentKind::Final => "/dashboard/final-copy",
    }
}

fn page_heading(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::TaxForm => "Tax Information Forms",
        DocumentKind::Upload => "Upload Documents",
        DocumentKind::Draft => "Draft Copies",
        DocumentKind::Final => "Final Copies",
    }
}

fn empty_message(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::TaxForm => "No tax information forms are available yet.",
        DocumentKind::Upload => "You have not uploaded any documents yet.",
        DocumentKind::Draft => "No draft copies have been shared with you yet.",
        DocumentKind::Final => "No final copies have been shared with you yet.",
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(params): Query<NoticeParams>,
) -> Response {
    let stats = match state.stats.client(&user.user_id).await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Failed to load dashboard stats: {}", e);
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&user),
                "Failed to load your dashboard",
            );
        }
    };

    let cards = vec![
        DashboardCard {
            label: "Tax Information Forms",
            count: stats.tax_forms,
            href: client_page_path(DocumentKind::TaxForm),
        },
        DashboardCard {
            label: "Uploaded Documents",
            count: stats.uploaded_documents,
            href: client_page_path(DocumentKind::Upload),
        },
        DashboardCard {
            label: "Draft Copies",
            count: stats.draft_copies,
            href: client_page_path(DocumentKind::Draft),
        },
        DashboardCard {
            label: "Final Copies",
            count: stats.final_copies,
            href: client_page_path(DocumentKind::Final),
        },
    ];

    render(&DashboardTemplate {
        page: PageChrome::new("Dashboard", Some(&user), params.notice),
        stats,
        cards,
    })
}

pub async fn tax_forms_page(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(params): Query<ListParams>,
) -> Response {
    documents_page(&state, &user, params, DocumentKind::TaxForm).await
}

pub async fn uploads_page(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(params): Query<ListParams>,
) -> Response {
    documents_page(&state, &user, params, DocumentKind::Upload).await
}

pub async fn drafts_page(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(params): Query<ListParams>,
) -> Response {
    documents_page(&state, &user, params, DocumentKind::Draft).await
}

pub async fn finals_page(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Query(params): Query<ListParams>,
) -> Response {
    documents_page(&state, &user, params, DocumentKind::Final).await
}

async fn documents_page(
    state: &AppState,
    user: &SessionUser,
    params: ListParams,
    kind: DocumentKind,
) -> Response {
    let query = params.query();
    let records = match state.documents.list(user, kind, None, &query).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list {}: {}", kind, e);
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(user),
                format!("Failed to load {}", page_heading(kind).to_lowercase()),
            );
        }
    };

    let path = client_page_path(kind);
    let upload = (kind == DocumentKind::Upload).then(|| UploadForm::for_kind(kind, path));

    render(&DocumentsTemplate {
        page: PageChrome::new(page_heading(kind), Some(user), params.notice),
        heading: page_heading(kind).to_string(),
        search_action: path.to_string(),
        query,
        rows: records.iter().map(DocumentRow::from_record).collect(),
        upload,
        can_delete: user.is_admin() || kind == DocumentKind::Upload,
        return_to: path.to_string(),
        empty_message: empty_message(kind).to_string(),
    })
}

/// Client upload form on the upload-documents page.
pub async fn upload_documents(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let back = client_page_path(DocumentKind::Upload);
    let form = match parse_upload(multipart).await {
        Ok(form) => form,
        Err(e) => return redirect_notice(back, &e.to_string()),
    };

    let client = client_info(&headers);
    let request = UploadRequest {
        kind: DocumentKind::Upload,
        owner: None,
        year: form.year,
        category: form.category,
        files: form.files,
        ip_address: client.ip_address,
        browser_info: client.browser_info,
    };

    match state.documents.upload(&user, request).await {
        Ok(stored) => redirect_notice(
            back,
            &format!("{} file(s) uploaded successfully", stored.len()),
        ),
        Err(e) => redirect_notice(back, &ApiError::from(e).to_string()),
    }
}

/// Download any visible document.
pub async fn download_document(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Path((kind, id)): Path<(String, String)>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error_page(StatusCode::NOT_FOUND, Some(&user), e.to_string()),
    };
    match state.documents.download(&user, kind, &id).await {
        Ok((record, data)) => download_response(&record, data),
        Err(e) => {
            let e = ApiError::from(e);
            error_page(e.status(), Some(&user), e.to_string())
        }
    }
}

/// Delete a document, then return to the page the form came from.
pub async fn delete_document(
    State(state): State<AppState>,
    PageUser(user): PageUser,
    Path((kind, id)): Path<(String, String)>,
    Form(form): Form<ReturnForm>,
) -> Response {
    let kind = match parse_kind(&kind) {
        Ok(kind) => kind,
        Err(e) => return error_page(StatusCode::NOT_FOUND, Some(&user), e.to_string()),
    };
    let back = safe_return_to(form.return_to.as_deref(), client_page_path(kind));
    match state.documents.delete(&user, kind, &id).await {
        Ok(record) => redirect_notice(&back, &format!("Deleted {}", record.file_name)),
        Err(e) => redirect_notice(&back, &ApiError::from(e).to_string()),
    }
}

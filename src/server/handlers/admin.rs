//! Admin screens: dashboard, users, shared tax forms, activity log.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use super::super::error::ApiError;
use super::super::session::{client_info, PageAdmin};
use super::super::template_structs::{
    ActivityRow, AdminActivitiesTemplate, AdminDashboardTemplate, AdminUserDetailTemplate,
    AdminUsersTemplate, DocumentRow, DocumentsTemplate, PageChrome, TabLink, UploadForm, UserRow,
};
use super::super::templates::{pagination, PER_PAGE};
use super::super::AppState;
use super::helpers::{error_page, parse_upload, redirect_notice, render, ListParams, NoticeParams};
use crate::models::DocumentKind;
use crate::services::UploadRequest;

const TAX_FORMS_PATH: &str = "/admin/tax-forms";

pub async fn dashboard(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    Query(params): Query<NoticeParams>,
) -> Response {
    match state.stats.admin().await {
        Ok(stats) => render(&AdminDashboardTemplate {
            page: PageChrome::new("Admin Dashboard", Some(&admin), params.notice),
            stats,
        }),
        Err(e) => {
            tracing::error!("Failed to load admin stats: {}", e);
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&admin),
                "Failed to load dashboard statistics",
            )
        }
    }
}

/// Shared tax forms with an upload form.
pub async fn tax_forms(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    Query(params): Query<ListParams>,
) -> Response {
    let query = params.query();
    let records = match state
        .documents
        .list(&admin, DocumentKind::TaxForm, None, &query)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list tax forms: {}", e);
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&admin),
                "Failed to load tax forms",
            );
        }
    };

    render(&DocumentsTemplate {
        page: PageChrome::new("Tax Information Forms", Some(&admin), params.notice),
        heading: "Manage Tax Information Forms".to_string(),
        search_action: TAX_FORMS_PATH.to_string(),
        query,
        rows: records.iter().map(DocumentRow::from_record).collect(),
        upload: Some(UploadForm::for_kind(DocumentKind::TaxForm, TAX_FORMS_PATH)),
        can_delete: true,
        return_to: TAX_FORMS_PATH.to_string(),
        empty_message: "No tax information forms uploaded yet.".to_string(),
    })
}

pub async fn upload_tax_forms(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let form = match parse_upload(multipart).await {
        Ok(form) => form,
        Err(e) => return redirect_notice(TAX_FORMS_PATH, &e.to_string()),
    };

    let client = client_info(&headers);
    let request = UploadRequest {
        kind: DocumentKind::TaxForm,
        owner: None,
        year: form.year,
        category: form.category,
        files: form.files,
        ip_address: client.ip_address,
        browser_info: client.browser_info,
    };

    match state.documents.upload(&admin, request).await {
        Ok(stored) => redirect_notice(
            TAX_FORMS_PATH,
            &format!("{} tax form(s) uploaded successfully", stored.len()),
        ),
        Err(e) => redirect_notice(TAX_FORMS_PATH, &ApiError::from(e).to_string()),
    }
}

/// Paged, searchable client list.
pub async fn users(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    Query(params): Query<ListParams>,
) -> Response {
    let query = params.query();
    let page = params.page();
    match state.db.profiles().search_page(&query, page, PER_PAGE).await {
        Ok((profiles, total)) => render(&AdminUsersTemplate {
            page: PageChrome::new("Users", Some(&admin), params.notice),
            pagination: pagination("/admin/users", &query, page, total, PER_PAGE),
            query,
            rows: profiles.iter().map(UserRow::from_profile).collect(),
            total,
        }),
        Err(e) => {
            tracing::error!("Failed to list users: {}", e);
            error_page(StatusCode::INTERNAL_SERVER_ERROR, Some(&admin), "Failed to load users")
        }
    }
}

fn tab_kind(tab: Option<&str>) -> DocumentKind {
    match tab {
        Some("drafts") => DocumentKind::Draft,
        Some("finals") => DocumentKind::Final,
        _ => DocumentKind::Upload,
    }
}

/// One client's profile with tabs for their uploads, drafts and finals.
pub async fn user_detail(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    Path(user_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Response {
    let profile = match state.db.profiles().get_by_user(&user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return error_page(StatusCode::NOT_FOUND, Some(&admin), "User not found"),
        Err(e) => {
            tracing::error!("Failed to load profile {}: {}", user_id, e);
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&admin),
                "Failed to load user",
            );
        }
    };

    let kind = tab_kind(params.tab.as_deref());
    let records = match state
        .documents
        .list(&admin, kind, Some(&user_id), &params.query())
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to list {} for {}: {}", kind, user_id, e);
            return error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&admin),
                "Failed to load documents",
            );
        }
    };

    let base = format!("/admin/users/{}", urlencoding::encode(&user_id));
    let tabs = [
        ("Uploaded Documents", "uploads", DocumentKind::Upload),
        ("Draft Copies", "drafts", DocumentKind::Draft),
        ("Final Copies", "finals", DocumentKind::Final),
    ]
    .into_iter()
    .map(|(label, slug, tab)| TabLink {
        label: label.to_string(),
        href: format!("{}?tab={}", base, slug),
        active: tab == kind,
    })
    .collect();

    render(&AdminUserDetailTemplate {
        page: PageChrome::new(profile.full_name(), Some(&admin), params.notice),
        name: profile.full_name(),
        email: profile.email.clone(),
        contact_number: profile.contact_number.clone(),
        alternative_contact_number: profile
            .alternative_contact_number
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        joined: crate::utils::format_date(&profile.created_at),
        tabs,
        rows: records.iter().map(DocumentRow::from_record).collect(),
        upload: Some(UploadForm::for_copies(format!("{}/upload", base))),
        can_delete: true,
        return_to: format!("{}?tab={}", base, kind.as_str()),
        empty_message: "No documents in this section.".to_string(),
        user_id,
    })
}

/// Send a draft or final copy to a client.
pub async fn upload_copy(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let base = format!("/admin/users/{}", urlencoding::encode(&user_id));
    let form = match parse_upload(multipart).await {
        Ok(form) => form,
        Err(e) => return redirect_notice(&base, &e.to_string()),
    };

    // The copy type comes from the kind selector, falling back to the category.
    let kind = match form
        .kind
        .as_deref()
        .or(Some(form.category.as_str()))
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("draft") | Some("drafts") => DocumentKind::Draft,
        Some("final") | Some("finals") => DocumentKind::Final,
        _ => return redirect_notice(&base, "Please choose Draft or Final"),
    };
    let back = format!("{}?tab={}", base, kind.as_str());

    let client = client_info(&headers);
    let request = UploadRequest {
        kind,
        owner: Some(user_id),
        year: form.year,
        category: kind.default_category().to_string(),
        files: form.files,
        ip_address: client.ip_address,
        browser_info: client.browser_info,
    };

    match state.documents.upload(&admin, request).await {
        Ok(stored) => redirect_notice(
            &back,
            &format!("{} {} file(s) uploaded successfully", stored.len(), kind.default_category()),
        ),
        Err(e) => redirect_notice(&back, &ApiError::from(e).to_string()),
    }
}

/// Remove a client's account. Their documents stay in place.
pub async fn delete_user(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    Path(user_id): Path<String>,
) -> Response {
    if admin.user_id == user_id {
        return redirect_notice("/admin/users", "You cannot delete your own account");
    }
    match state.auth.delete_account(&user_id).await {
        Ok(()) => redirect_notice("/admin/users", "User deleted successfully"),
        Err(e) => redirect_notice("/admin/users", &ApiError::from(e).to_string()),
    }
}

/// Paged, searchable activity log.
pub async fn activities(
    State(state): State<AppState>,
    PageAdmin(admin): PageAdmin,
    Query(params): Query<ListParams>,
) -> Response {
    let query = params.query();
    let page = params.page();
    match state.db.activities().search_page(&query, page, PER_PAGE).await {
        Ok((entries, total)) => render(&AdminActivitiesTemplate {
            page: PageChrome::new("Activity Log", Some(&admin), params.notice),
            pagination: pagination("/admin/activities", &query, page, total, PER_PAGE),
            query,
            rows: entries.iter().map(ActivityRow::from_activity).collect(),
            total,
        }),
        Err(e) => {
            tracing::error!("Failed to list activities: {}", e);
            error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(&admin),
                "Failed to load activities",
            )
        }
    }
}

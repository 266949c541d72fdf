//! JSON API handlers.
//!
//! Mirrors the portal pages for non-browser clients. Errors come back as
//! `{"error": "..."}` with a matching status code.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::super::error::ApiError;
use super::super::session::{
    client_info, removal_cookie, session_cookie, session_token, ApiAdmin, ApiUser, MaybeUser,
};
use super::super::templates::PER_PAGE;
use super::super::AppState;
use super::helpers::{download_response, parse_kind, parse_upload, ListParams};
use crate::models::{Activity, DocumentRecord, Profile, ProfileInput, SessionUser};
use crate::services::{AdminStats, ClientStats, UploadRequest};

/// Current session, or `{"user": null}`.
pub async fn session(MaybeUser(user): MaybeUser) -> Json<serde_json::Value> {
    Json(json!({ "user": user }))
}

/// Register. Does not sign in.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<ProfileInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth.sign_up(&input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub user: SessionUser,
    /// Bearer token for API clients; browsers also get the cookie.
    pub token: String,
}

pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(request): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .auth
        .sign_in(&request.email, &request.password, client_info(&headers))
        .await?;
    let token = user.token.clone();
    let jar = jar.add(session_cookie(token.clone()));
    Ok((jar, Json(SignInResponse { user, token })))
}

pub async fn signout(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = session_token(&headers) {
        state.auth.sign_out(&token).await?;
    }
    Ok((jar.remove(removal_cookie()), StatusCode::NO_CONTENT))
}

/// Records of one kind visible to the caller, filtered by `q`.
pub async fn list_documents(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(kind): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    let kind = parse_kind(&kind)?;
    let records = state
        .documents
        .list(&user, kind, params.user_id.as_deref(), &params.query())
        .await?;
    Ok(Json(records))
}

/// Multipart upload: `year`, `category`, optional `user_id`, repeated `files`.
pub async fn upload_documents(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path(kind): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    let form = parse_upload(multipart).await?;
    let client = client_info(&headers);

    let stored = state
        .documents
        .upload(
            &user,
            UploadRequest {
                kind,
                owner: form.user_id,
                year: form.year,
                category: form.category,
                files: form.files,
                ip_address: client.ip_address,
                browser_info: client.browser_info,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn download_document(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let kind = parse_kind(&kind)?;
    let (record, data) = state.documents.download(&user, kind, &id).await?;
    Ok(download_response(&record, data))
}

pub async fn delete_document(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<DocumentRecord>, ApiError> {
    let kind = parse_kind(&kind)?;
    let record = state.documents.delete(&user, kind, &id).await?;
    Ok(Json(record))
}

pub async fn client_stats(
    State(state): State<AppState>,
    ApiUser(user): ApiUser,
) -> Result<Json<ClientStats>, ApiError> {
    Ok(Json(state.stats.client(&user.user_id).await?))
}

pub async fn admin_stats(
    State(state): State<AppState>,
    ApiAdmin(_admin): ApiAdmin,
) -> Result<Json<AdminStats>, ApiError> {
    Ok(Json(state.stats.admin().await?))
}

/// One page of a searchable admin listing.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    #[serde(flatten)]
    pub items: T,
}

#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub users: Vec<Profile>,
}

#[derive(Debug, Serialize)]
pub struct ActivitiesPage {
    pub activities: Vec<Activity>,
}

pub async fn admin_users(
    State(state): State<AppState>,
    ApiAdmin(_admin): ApiAdmin,
    Query(params): Query<ListParams>,
) -> Result<Json<PagedResponse<UsersPage>>, ApiError> {
    let page = params.page();
    let (users, total) = state
        .db
        .profiles()
        .search_page(&params.query(), page, PER_PAGE)
        .await?;
    Ok(Json(PagedResponse {
        page,
        per_page: PER_PAGE,
        total,
        items: UsersPage { users },
    }))
}

pub async fn admin_delete_user(
    State(state): State<AppState>,
    ApiAdmin(admin): ApiAdmin,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if admin.user_id == user_id {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }
    state.auth.delete_account(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_activities(
    State(state): State<AppState>,
    ApiAdmin(_admin): ApiAdmin,
    Query(params): Query<ListParams>,
) -> Result<Json<PagedResponse<ActivitiesPage>>, ApiError> {
    let page = params.page();
    let (activities, total) = state
        .db
        .activities()
        .search_page(&params.query(), page, PER_PAGE)
        .await?;
    Ok(Json(PagedResponse {
        page,
        per_page: PER_PAGE,
        total,
        items: ActivitiesPage { activities },
    }))
}

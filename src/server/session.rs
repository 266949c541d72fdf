//! Session extraction for pages and API routes.
//!
//! A session token arrives either as the `leotax_session` cookie (browser
//! pages) or as `Authorization: Bearer <token>` (API clients).

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::error::ApiError;
use super::AppState;
use crate::models::SessionUser;
use crate::services::auth::ClientInfo;
use crate::utils::notice_query;

pub const SESSION_COOKIE: &str = "leotax_session";

/// Pull the session token from the bearer header or the cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        let bearer = bearer.trim();
        if !bearer.is_empty() {
            return Some(bearer.to_string());
        }
    }
    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Cookie carrying a freshly issued session token.
///
/// Expiry is enforced server-side, so the cookie itself lives for the
/// browser session.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the session.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Request metadata for the activity log.
pub fn client_info(headers: &HeaderMap) -> ClientInfo {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    ClientInfo {
        ip_address: header_value("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .or_else(|| header_value("x-real-ip")),
        browser_info: header_value(header::USER_AGENT.as_str()),
    }
}

async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<Option<SessionUser>, ApiError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };
    Ok(state.auth.current_session(&token).await?)
}

/// Signed-in user for JSON routes; 401 otherwise.
pub struct ApiUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for ApiUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(state, &parts.headers)
            .await?
            .map(ApiUser)
            .ok_or_else(ApiError::unauthorized)
    }
}

/// Signed-in admin for JSON routes; 401 or 403 otherwise.
pub struct ApiAdmin(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for ApiAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ApiUser(user) = ApiUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::Forbidden("Administrator access required".to_string()));
        }
        Ok(ApiAdmin(user))
    }
}

/// Whoever is signed in, if anyone. Never rejects.
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(state, &parts.headers).await {
            Ok(user) => Ok(MaybeUser(user)),
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                Ok(MaybeUser(None))
            }
        }
    }
}

/// Signed-in user for HTML pages; redirects to the login page otherwise.
pub struct PageUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for PageUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = match MaybeUser::from_request_parts(parts, state).await {
            Ok(user) => user,
            Err(never) => match never {},
        };
        user.map(PageUser).ok_or_else(|| {
            Redirect::to(&notice_query("/login", "Please sign in to continue")).into_response()
        })
    }
}

/// Signed-in admin for HTML pages.
///
/// Anonymous visitors go to the login page, clients back to their dashboard.
pub struct PageAdmin(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for PageAdmin {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let PageUser(user) = PageUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(
                Redirect::to(&notice_query("/dashboard", "Administrator access required"))
                    .into_response(),
            );
        }
        Ok(PageAdmin(user))
    }
}

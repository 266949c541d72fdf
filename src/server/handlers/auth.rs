//! Sign-in, sign-up and sign-out pages.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::super::session::{client_info, removal_cookie, session_cookie, session_token, MaybeUser};
use super::super::template_structs::{LoginTemplate, PageChrome, SignupTemplate};
use super::super::AppState;
use super::helpers::{redirect_notice, render, NoticeParams};
use crate::models::{ProfileInput, SessionUser};
use crate::services::AuthError;

/// Where a user lands after signing in.
pub fn landing_path(user: &SessionUser) -> &'static str {
    if user.is_admin() {
        "/admin"
    } else {
        "/dashboard"
    }
}

pub async fn login_page(MaybeUser(user): MaybeUser, Query(params): Query<NoticeParams>) -> Response {
    if let Some(user) = user {
        return Redirect::to(landing_path(&user)).into_response();
    }
    render(&LoginTemplate {
        page: PageChrome::new("Sign In", None, params.notice),
        email: String::new(),
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Response {
    match state
        .auth
        .sign_in(&form.email, &form.password, client_info(&headers))
        .await
    {
        Ok(user) => {
            let target = landing_path(&user);
            let jar = jar.add(session_cookie(user.token));
            (jar, Redirect::to(target)).into_response()
        }
        Err(e) => {
            if !matches!(e, AuthError::InvalidCredentials) {
                tracing::error!("Sign-in failed: {}", e);
            }
            let notice = match e {
                AuthError::InvalidCredentials => e.to_string(),
                _ => "Sign in failed. Please try again.".to_string(),
            };
            render(&LoginTemplate {
                page: PageChrome::new("Sign In", None, Some(notice)),
                email: form.email,
            })
        }
    }
}

pub async fn signup_page(MaybeUser(user): MaybeUser, Query(params): Query<NoticeParams>) -> Response {
    if let Some(user) = user {
        return Redirect::to(landing_path(&user)).into_response();
    }
    render(&SignupTemplate {
        page: PageChrome::new("Create Account", None, params.notice),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        contact_number: String::new(),
        alternative_contact_number: String::new(),
    })
}

/// Register, then send the user to sign in.
pub async fn signup_submit(State(state): State<AppState>, Form(input): Form<ProfileInput>) -> Response {
    match state.auth.sign_up(&input).await {
        Ok(_) => redirect_notice("/login", "Account created successfully. Please sign in."),
        Err(e) => {
            let notice = match &e {
                AuthError::AlreadyRegistered(m) => m.to_string(),
                AuthError::Invalid { message, .. } => message.clone(),
                _ => {
                    tracing::error!("Sign-up failed: {}", e);
                    "Sign up failed. Please try again.".to_string()
                }
            };
            render(&SignupTemplate {
                page: PageChrome::new("Create Account", None, Some(notice)),
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                contact_number: input.contact_number,
                alternative_contact_number: input.alternative_contact_number.unwrap_or_default(),
            })
        }
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        if let Err(e) = state.auth.sign_out(&token).await {
            tracing::warn!("Sign-out failed: {}", e);
        }
    }
    let jar = jar.remove(removal_cookie());
    (jar, redirect_notice("/", "You have been signed out")).into_response()
}

//! Router configuration for the web server.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use super::handlers::{self, admin, api, auth, pages, portal};
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes;

    Router::new()
        // Marketing pages
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact).post(pages::contact_submit))
        .route("/services/:slug", get(pages::service))
        .route("/refund-status", get(pages::refund_status))
        .route("/refund-status/state", get(pages::state_refund_status))
        // Sign in / sign up
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/signup", get(auth::signup_page).post(auth::signup_submit))
        .route("/logout", post(auth::logout))
        // Client portal
        .route("/dashboard", get(portal::dashboard))
        .route("/dashboard/tax-information-form", get(portal::tax_forms_page))
        .route(
            "/dashboard/upload-documents",
            get(portal::uploads_page).post(portal::upload_documents),
        )
        .route("/dashboard/draft-copy", get(portal::drafts_page))
        .route("/dashboard/final-copy", get(portal::finals_page))
        .route(
            "/documents/:kind/:id/download",
            get(portal::download_document),
        )
        .route("/documents/:kind/:id/delete", post(portal::delete_document))
        // Admin screens
        .route("/admin", get(admin::dashboard))
        .route(
            "/admin/tax-forms",
            get(admin::tax_forms).post(admin::upload_tax_forms),
        )
        .route("/admin/users", get(admin::users))
        .route("/admin/users/:user_id", get(admin::user_detail))
        .route("/admin/users/:user_id/upload", post(admin::upload_copy))
        .route("/admin/users/:user_id/delete", post(admin::delete_user))
        .route("/admin/activities", get(admin::activities))
        // JSON API
        .route("/api/session", get(api::session))
        .route("/api/auth/signup", post(api::signup))
        .route("/api/auth/signin", post(api::signin))
        .route("/api/auth/signout", post(api::signout))
        .route(
            "/api/documents/:kind",
            get(api::list_documents).post(api::upload_documents),
        )
        .route(
            "/api/documents/:kind/:id",
            axum::routing::delete(api::delete_document),
        )
        .route(
            "/api/documents/:kind/:id/download",
            get(api::download_document),
        )
        .route("/api/stats", get(api::client_stats))
        .route("/api/admin/stats", get(api::admin_stats))
        .route("/api/admin/users", get(api::admin_users))
        .route(
            "/api/admin/users/:user_id",
            axum::routing::delete(api::admin_delete_user),
        )
        .route("/api/admin/activities", get(api::admin_activities))
        // Static assets (CSS/JS)
        .route("/static/style.css", get(handlers::serve_css))
        .route("/static/app.js", get(handlers::serve_js))
        .fallback(pages::not_found)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

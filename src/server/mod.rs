//! Web server for the marketing site and the client document portal.
//!
//! Provides:
//! - Static marketing pages (home, about, services, refund status, contact)
//! - Session-based sign up / sign in
//! - Client document pages (tax forms, uploads, draft and final copies)
//! - Admin screens (users, tax forms, activity log)
//! - A JSON API under `/api` mirroring the portal operations

mod assets;
mod content;
mod error;
mod handlers;
mod routes;
mod session;
mod template_structs;
mod templates;

pub use error::ApiError;
pub use routes::create_router;
pub use session::SESSION_COOKIE;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::repository::DbContext;
use crate::services::{AuthService, DocumentService, StatsService};
use crate::storage::BlobStore;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub db: DbContext,
    pub documents: DocumentService,
    pub auth: AuthService,
    pub stats: StatsService,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State backed by the configured database and local blob store.
    pub fn new(settings: &Settings) -> Self {
        let blobs: Arc<dyn BlobStore> = Arc::new(settings.blob_store());
        Self::with_parts(settings.create_db_context(), blobs, settings)
    }

    /// State over an explicit database and blob store.
    pub fn with_parts(db: DbContext, blobs: Arc<dyn BlobStore>, settings: &Settings) -> Self {
        Self {
            documents: DocumentService::new(&db, blobs),
            auth: AuthService::new(&db, settings),
            stats: StatsService::new(&db),
            settings: Arc::new(settings.clone()),
            db,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    settings.ensure_directories()?;
    let state = AppState::new(settings);
    state.db.init_schema().await?;

    let purged = state
        .db
        .auth()
        .purge_expired_sessions(chrono::Utc::now())
        .await?;
    if purged > 0 {
        tracing::info!("Purged {} expired session(s)", purged);
    }

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

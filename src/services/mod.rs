//! Service layer for portal business logic.
//!
//! Services sit between the front-ends (web, CLI) and the record/blob
//! stores. They own validation and access rules; the stores only persist.

pub mod audit;
pub mod auth;
pub mod documents;
pub mod stats;

pub use audit::{AuditReport, AuditService, OrphanBlob};
pub use auth::{AuthError, AuthService};
pub use documents::{DocumentService, UploadFile, UploadRequest};
pub use stats::{AdminStats, ClientStats, StatsService};

use thiserror::Error;

use crate::repository::DbError;
use crate::storage::StorageError;

/// Errors from document and admin operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    /// A batch upload stopped part way; earlier files stay stored.
    #[error("Failed to upload {file_name} ({stored} earlier file(s) were saved): {source}")]
    UploadFailed {
        file_name: String,
        stored: usize,
        #[source]
        source: Box<ServiceError>,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

//! Database context for managing connections and repository access.
//!
//! The DbContext is the primary entry point for all database operations.
//! It holds the connection pool and provides access to all repositories.

use std::path::Path;

use diesel_async::SimpleAsyncConnection;

use super::activity::ActivityRepository;
use super::auth::AuthRepository;
use super::document::DocumentRepository;
use super::pool::{DbError, DbPool};
use super::profile::ProfileRepository;

/// Database context that manages the connection pool and provides repository access.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::new(&settings.database_path());
/// ctx.init_schema().await?;
/// let uploads = ctx.documents().list(DocumentKind::Upload, Some(user_id)).await?;
/// ```
#[derive(Clone, Debug)]
pub struct DbContext {
    pool: DbPool,
}

impl DbContext {
    /// Create a context from a database file path.
    pub fn new(db_path: &Path) -> Self {
        Self {
            pool: DbPool::from_path(db_path),
        }
    }

    /// Create a context from a database URL (`sqlite:` prefix optional).
    pub fn from_url(url: &str) -> Self {
        Self {
            pool: DbPool::new(url),
        }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn documents(&self) -> DocumentRepository {
        DocumentRepository::new(self.pool.clone())
    }

    pub fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(self.pool.clone())
    }

    pub fn activities(&self) -> ActivityRepository {
        ActivityRepository::new(self.pool.clone())
    }

    /// Users and sessions.
    pub fn auth(&self) -> AuthRepository {
        AuthRepository::new(self.pool.clone())
    }

    /// Create all tables and indexes if they don't exist.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        conn.batch_execute(SCHEMA_SQL).await?;
        tracing::debug!("Schema initialized at {}", self.pool.database_url());
        Ok(())
    }
}

const SCHEMA_SQL: &str = r#"
    PRAGMA journal_mode = WAL;

    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'client',
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

    CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        contact_number TEXT NOT NULL,
        alternative_contact_number TEXT,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_profiles_created ON profiles(created_at);

    CREATE TABLE IF NOT EXISTS activity_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        user_email TEXT NOT NULL,
        action TEXT NOT NULL,
        description TEXT NOT NULL,
        ip_address TEXT,
        browser_info TEXT,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_activity_created ON activity_logs(created_at);

    CREATE TABLE IF NOT EXISTS tax_information_forms (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        category TEXT NOT NULL,
        year TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_path TEXT NOT NULL UNIQUE,
        file_size INTEGER,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_tax_forms_created ON tax_information_forms(created_at);

    CREATE TABLE IF NOT EXISTS uploaded_documents (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        category TEXT NOT NULL,
        year TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_path TEXT NOT NULL UNIQUE,
        file_size INTEGER,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_uploads_user ON uploaded_documents(user_id, created_at);

    CREATE TABLE IF NOT EXISTS draft_copies (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        category TEXT NOT NULL,
        year TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_path TEXT NOT NULL UNIQUE,
        file_size INTEGER,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_drafts_user ON draft_copies(user_id, created_at);

    CREATE TABLE IF NOT EXISTS final_copies (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        category TEXT NOT NULL,
        year TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_path TEXT NOT NULL UNIQUE,
        file_size INTEGER,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_finals_user ON final_copies(user_id, created_at);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let ctx = DbContext::new(&dir.path().join("leotax.db"));
        ctx.init_schema().await.unwrap();
        ctx.init_schema().await.unwrap();
        assert_eq!(ctx.profiles().count().await.unwrap(), 0);
    }
}

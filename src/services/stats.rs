//! Dashboard counters.

use serde::Serialize;

use super::ServiceResult;
use crate::models::DocumentKind;
use crate::repository::{DbContext, DocumentRepository, ProfileRepository};

/// Counters on the client dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClientStats {
    pub uploaded_documents: i64,
    pub draft_copies: i64,
    pub final_copies: i64,
    pub tax_forms: i64,
}

/// Counters on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total_users: i64,
    /// Drafts plus finals prepared for clients.
    pub total_downloads: i64,
    pub total_uploads: i64,
}

#[derive(Clone)]
pub struct StatsService {
    documents: DocumentRepository,
    profiles: ProfileRepository,
}

impl StatsService {
    pub fn new(db: &DbContext) -> Self {
        Self {
            documents: db.documents(),
            profiles: db.profiles(),
        }
    }

    pub async fn client(&self, user_id: &str) -> ServiceResult<ClientStats> {
        Ok(ClientStats {
            uploaded_documents: self.documents.count(DocumentKind::Upload, Some(user_id)).await?,
            draft_copies: self.documents.count(DocumentKind::Draft, Some(user_id)).await?,
            final_copies: self.documents.count(DocumentKind::Final, Some(user_id)).await?,
            tax_forms: self.documents.count(DocumentKind::TaxForm, None).await?,
        })
    }

    pub async fn admin(&self) -> ServiceResult<AdminStats> {
        let drafts = self.documents.count(DocumentKind::Draft, None).await?;
        let finals = self.documents.count(DocumentKind::Final, None).await?;
        Ok(AdminStats {
            total_users: self.profiles.count().await?,
            total_downloads: drafts + finals,
            total_uploads: self.documents.count(DocumentKind::Upload, None).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentRecord;
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(kind: DocumentKind, owner: Option<&str>) -> DocumentRecord {
        let id = uuid::Uuid::new_v4().to_string();
        DocumentRecord {
            file_path: format!("x/{}", id),
            id,
            kind,
            owner: owner.map(str::to_string),
            category: kind.default_category().to_string(),
            year: "2024".to_string(),
            file_name: "f.pdf".to_string(),
            file_size: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_counts() {
        let dir = tempdir().unwrap();
        let db = DbContext::new(&dir.path().join("test.db"));
        db.init_schema().await.unwrap();
        let docs = db.documents();
        for r in [
            record(DocumentKind::Upload, Some("U1")),
            record(DocumentKind::Upload, Some("U1")),
            record(DocumentKind::Upload, Some("U2")),
            record(DocumentKind::Draft, Some("U1")),
            record(DocumentKind::Final, Some("U2")),
            record(DocumentKind::TaxForm, None),
        ] {
            docs.insert(&r).await.unwrap();
        }

        let stats = StatsService::new(&db);
        assert_eq!(
            stats.client("U1").await.unwrap(),
            ClientStats {
                uploaded_documents: 2,
                draft_copies: 1,
                final_copies: 0,
                tax_forms: 1,
            }
        );
        assert_eq!(
            stats.admin().await.unwrap(),
            AdminStats {
                total_users: 0,
                total_downloads: 2,
                total_uploads: 3,
            }
        );
    }
}

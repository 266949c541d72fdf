//! Document lifecycle: list, upload, download and delete.
//!
//! One service drives all four document kinds. Blob writes and record
//! inserts are separate calls with no transaction between them: an upload
//! writes the blob first, a delete removes the blob first.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use super::{ServiceError, ServiceResult};
use crate::models::{
    filter_records, ActivityAction, DocumentKind, DocumentRecord, NewActivity, SessionUser,
};
use crate::repository::{ActivityRepository, DbContext, DocumentRepository, ProfileRepository};
use crate::storage::BlobStore;

static LAST_STAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp that strictly increases within this process.
///
/// Two uploads in the same millisecond get consecutive stamps, so their blob
/// keys never collide even when the file names match.
pub fn next_stamp_ms() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_STAMP_MS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP_MS.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// One file in an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub data: Bytes,
}

/// A batch of files of one kind, year and category.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub kind: DocumentKind,
    /// Client the files belong to. Ignored for tax forms; defaults to the
    /// uploader for client uploads.
    pub owner: Option<String>,
    pub year: String,
    pub category: String,
    pub files: Vec<UploadFile>,
    /// Request metadata for the activity log.
    pub ip_address: Option<String>,
    pub browser_info: Option<String>,
}

/// Parameterized document service shared by every document page.
#[derive(Clone)]
pub struct DocumentService {
    documents: DocumentRepository,
    profiles: ProfileRepository,
    activities: ActivityRepository,
    blobs: Arc<dyn BlobStore>,
}

impl DocumentService {
    pub fn new(db: &DbContext, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            documents: db.documents(),
            profiles: db.profiles(),
            activities: db.activities(),
            blobs,
        }
    }

    /// Records of `kind` visible to `actor`, filtered by `query`, newest first.
    ///
    /// Clients see their own uploads/drafts/finals and every tax form.
    /// Admins see everything, or one client's records with `for_user`.
    pub async fn list(
        &self,
        actor: &SessionUser,
        kind: DocumentKind,
        for_user: Option<&str>,
        query: &str,
    ) -> ServiceResult<Vec<DocumentRecord>> {
        let scope = if !kind.is_owned() {
            None
        } else if actor.is_admin() {
            for_user
        } else {
            Some(actor.user_id.as_str())
        };

        let records = self.documents.list(kind, scope).await?;
        Ok(filter_records(records, query))
    }

    /// Store each file then insert its record, in order.
    ///
    /// Stops at the first failure. Files already stored stay stored.
    pub async fn upload(
        &self,
        actor: &SessionUser,
        request: UploadRequest,
    ) -> ServiceResult<Vec<DocumentRecord>> {
        let kind = request.kind;
        let owner = self.resolve_upload_owner(actor, &request)?;

        if request.files.is_empty() {
            return Err(ServiceError::Validation(
                "Please select files to upload".to_string(),
            ));
        }
        let year = request.year.trim().to_string();
        if year.is_empty() {
            return Err(ServiceError::Validation("Please select a year".to_string()));
        }
        let category = match request.category.trim() {
            "" => match kind {
                DocumentKind::Upload => {
                    return Err(ServiceError::Validation(
                        "Please select a category".to_string(),
                    ))
                }
                _ => kind.default_category().to_string(),
            },
            c => c.to_string(),
        };

        let client_name = match (&owner, kind) {
            (Some(owner), DocumentKind::Draft | DocumentKind::Final) => Some(
                self.profiles
                    .get_by_user(owner)
                    .await?
                    .map(|p| p.full_name())
                    .unwrap_or_else(|| owner.clone()),
            ),
            _ => None,
        };

        let mut stored = Vec::with_capacity(request.files.len());
        for file in request.files {
            let file_name = file.file_name.clone();
            match self
                .store_one(kind, owner.as_deref(), &year, &category, file)
                .await
            {
                Ok(record) => {
                    if let Some(ref name) = client_name {
                        self.log_copy_upload(actor, kind, name, &request.ip_address, &request.browser_info)
                            .await;
                    }
                    stored.push(record);
                }
                Err(e) => {
                    tracing::error!(
                        "Upload of {} as {} stopped after {} file(s): {}",
                        file_name,
                        kind,
                        stored.len(),
                        e
                    );
                    return Err(ServiceError::UploadFailed {
                        file_name,
                        stored: stored.len(),
                        source: Box::new(e),
                    });
                }
            }
        }

        tracing::info!(
            "{} uploaded {} {} file(s)",
            actor.email,
            stored.len(),
            kind
        );
        Ok(stored)
    }

    /// Fetch a record and its bytes for download.
    pub async fn download(
        &self,
        actor: &SessionUser,
        kind: DocumentKind,
        id: &str,
    ) -> ServiceResult<(DocumentRecord, Bytes)> {
        let record = self.get_visible(actor, kind, id).await?;
        let data = self
            .blobs
            .get(kind.bucket(), &record.file_path)
            .await
            .map_err(|e| {
                tracing::warn!("Download of {} failed: {}", record.file_path, e);
                ServiceError::from(e)
            })?;
        Ok((record, data))
    }

    /// Remove the blob, then the record.
    ///
    /// A blob failure leaves the record untouched. A record failure after
    /// the blob is gone leaves a record without a blob. A record that
    /// vanished in between is reported as not found.
    pub async fn delete(
        &self,
        actor: &SessionUser,
        kind: DocumentKind,
        id: &str,
    ) -> ServiceResult<DocumentRecord> {
        let record = self.get_visible(actor, kind, id).await?;
        if !can_delete(actor, kind) {
            return Err(ServiceError::Forbidden(format!(
                "Only administrators can delete a {}",
                kind.label()
            )));
        }

        self.blobs
            .remove(kind.bucket(), &record.file_path)
            .await
            .map_err(|e| {
                tracing::error!("Failed to remove blob {}: {}", record.file_path, e);
                ServiceError::from(e)
            })?;

        match self.documents.delete(kind, &record.id).await {
            Ok(true) => {
                tracing::info!("{} deleted {} {}", actor.email, kind, record.file_path);
                Ok(record)
            }
            Ok(false) => {
                tracing::warn!("Record {} was already deleted", record.id);
                Err(ServiceError::NotFound(kind.label().to_string()))
            }
            Err(e) => {
                tracing::error!(
                    "Blob {} removed but record {} remains: {}",
                    record.file_path,
                    record.id,
                    e
                );
                Err(e.into())
            }
        }
    }

    fn resolve_upload_owner(
        &self,
        actor: &SessionUser,
        request: &UploadRequest,
    ) -> ServiceResult<Option<String>> {
        match request.kind {
            DocumentKind::TaxForm if actor.is_admin() => Ok(None),
            DocumentKind::Upload if !actor.is_admin() => Ok(Some(actor.user_id.clone())),
            DocumentKind::Upload | DocumentKind::Draft | DocumentKind::Final
                if actor.is_admin() =>
            {
                match request.owner.as_deref().map(str::trim) {
                    Some(owner) if !owner.is_empty() => Ok(Some(owner.to_string())),
                    _ => Err(ServiceError::Validation(
                        "Please choose the client these files belong to".to_string(),
                    )),
                }
            }
            kind => Err(ServiceError::Forbidden(format!(
                "Only administrators can upload a {}",
                kind.label()
            ))),
        }
    }

    async fn store_one(
        &self,
        kind: DocumentKind,
        owner: Option<&str>,
        year: &str,
        category: &str,
        file: UploadFile,
    ) -> ServiceResult<DocumentRecord> {
        let file_path = kind.blob_path(owner, year, category, next_stamp_ms(), &file.file_name);
        let file_size = i64::try_from(file.data.len()).ok();

        self.blobs.put(kind.bucket(), &file_path, file.data).await?;

        let record = DocumentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            owner: owner.map(str::to_string),
            category: category.to_string(),
            year: year.to_string(),
            file_name: file.file_name,
            file_path,
            file_size,
            created_at: Utc::now(),
        };
        self.documents.insert(&record).await?;
        tracing::debug!("Stored {} at {}/{}", record.file_name, kind.bucket(), record.file_path);
        Ok(record)
    }

    async fn get_visible(
        &self,
        actor: &SessionUser,
        kind: DocumentKind,
        id: &str,
    ) -> ServiceResult<DocumentRecord> {
        let record = self
            .documents
            .get(kind, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(kind.label().to_string()))?;

        let visible = actor.is_admin()
            || !kind.is_owned()
            || record.owner.as_deref() == Some(actor.user_id.as_str());
        if !visible {
            return Err(ServiceError::NotFound(kind.label().to_string()));
        }
        Ok(record)
    }

    async fn log_copy_upload(
        &self,
        actor: &SessionUser,
        kind: DocumentKind,
        client_name: &str,
        ip_address: &Option<String>,
        browser_info: &Option<String>,
    ) {
        let which = if kind == DocumentKind::Draft {
            "Draft"
        } else {
            "Final"
        };
        let entry = NewActivity::new(
            Some(actor.user_id.clone()),
            actor.email.clone(),
            ActivityAction::Upload,
            format!(
                "Leo Tax Filing Uploaded {} file Successfully for {}",
                which, client_name
            ),
        )
        .with_client(ip_address.clone(), browser_info.clone());

        if let Err(e) = self.activities.log(&entry).await {
            tracing::warn!("Failed to record upload activity: {}", e);
        }
    }
}

/// Clients may delete their own uploads; everything else is admin-only.
fn can_delete(actor: &SessionUser, kind: DocumentKind) -> bool {
    actor.is_admin() || kind == DocumentKind::Upload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Profile, Role};
    use crate::storage::{Bucket, LocalBlobStore, StorageError, StorageResult};
    use async_trait::async_trait;
    use tempfile::tempdir;

    fn client(id: &str) -> SessionUser {
        SessionUser {
            user_id: id.to_string(),
            email: format!("{}@example.com", id.to_lowercase()),
            role: Role::Client,
            display_name: id.to_string(),
            token: "t".to_string(),
        }
    }

    fn admin() -> SessionUser {
        SessionUser {
            user_id: "ADMIN".to_string(),
            email: "admin@leotax.test".to_string(),
            role: Role::Admin,
            display_name: "Admin".to_string(),
            token: "t".to_string(),
        }
    }

    fn file(name: &str, body: &'static [u8]) -> UploadFile {
        UploadFile {
            file_name: name.to_string(),
            data: Bytes::from_static(body),
        }
    }

    fn upload_request(kind: DocumentKind, owner: Option<&str>, files: Vec<UploadFile>) -> UploadRequest {
        UploadRequest {
            kind,
            owner: owner.map(str::to_string),
            year: "2024".to_string(),
            category: "W2s".to_string(),
            files,
            ip_address: None,
            browser_info: None,
        }
    }

    async fn setup() -> (DocumentService, DbContext, Arc<LocalBlobStore>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = DbContext::new(&dir.path().join("test.db"));
        db.init_schema().await.unwrap();
        let blobs = Arc::new(LocalBlobStore::new(dir.path().join("storage")));
        let service = DocumentService::new(&db, blobs.clone());
        (service, db, blobs, dir)
    }

    #[test]
    fn test_stamps_strictly_increase() {
        let stamps: Vec<i64> = (0..1000).map(|_| next_stamp_ms()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_upload_list_search_delete_scenario() {
        let (service, _db, blobs, _dir) = setup().await;
        let u1 = client("U1");

        let stored = service
            .upload(
                &u1,
                upload_request(DocumentKind::Upload, None, vec![file("w2_2024.pdf", b"%PDF")]),
            )
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        let rec = &stored[0];
        assert!(rec.file_path.starts_with("U1/2024/W2s/"));
        assert!(rec.file_path.ends_with("_w2_2024.pdf"));
        assert_eq!(rec.file_size, Some(4));

        let listed = service.list(&u1, DocumentKind::Upload, None, "").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_name, "w2_2024.pdf");
        assert_eq!(listed[0].category, "W2s");
        assert_eq!(listed[0].year, "2024");

        let found = service.list(&u1, DocumentKind::Upload, None, "w2").await.unwrap();
        assert_eq!(found.len(), 1);
        let none = service.list(&u1, DocumentKind::Upload, None, "1099").await.unwrap();
        assert!(none.is_empty());

        let (record, bytes) = service.download(&u1, DocumentKind::Upload, &rec.id).await.unwrap();
        assert_eq!(record.file_name, "w2_2024.pdf");
        assert_eq!(&bytes[..], b"%PDF");

        service.delete(&u1, DocumentKind::Upload, &rec.id).await.unwrap();
        assert!(service.list(&u1, DocumentKind::Upload, None, "").await.unwrap().is_empty());
        assert!(matches!(
            blobs.get(Bucket::UserDocuments, &rec.file_path).await,
            Err(StorageError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_same_name_gets_distinct_paths() {
        let (service, _db, _blobs, _dir) = setup().await;
        let u1 = client("U1");
        let stored = service
            .upload(
                &u1,
                upload_request(
                    DocumentKind::Upload,
                    None,
                    vec![file("w2.pdf", b"a"), file("w2.pdf", b"b")],
                ),
            )
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0].file_path, stored[1].file_path);

        let listed = service.list(&u1, DocumentKind::Upload, None, "").await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let (service, _db, _blobs, _dir) = setup().await;
        let err = service
            .upload(&client("U1"), upload_request(DocumentKind::Upload, None, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Please select files to upload"));
    }

    #[tokio::test]
    async fn test_clients_are_scoped() {
        let (service, _db, _blobs, _dir) = setup().await;
        let u1 = client("U1");
        let u2 = client("U2");
        let stored = service
            .upload(&u1, upload_request(DocumentKind::Upload, None, vec![file("a.pdf", b"a")]))
            .await
            .unwrap();

        assert!(service.list(&u2, DocumentKind::Upload, None, "").await.unwrap().is_empty());
        // Clients cannot widen their scope with `for_user`.
        assert!(service
            .list(&u2, DocumentKind::Upload, Some("U1"), "")
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            service.download(&u2, DocumentKind::Upload, &stored[0].id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(
            service
                .list(&admin(), DocumentKind::Upload, Some("U1"), "")
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_admin_copy_upload_logs_activity() {
        let (service, db, _blobs, _dir) = setup().await;
        let user = crate::models::User {
            id: "U1".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "x".to_string(),
            role: Role::Client,
            created_at: Utc::now(),
        };
        db.auth().create_user(&user).await.unwrap();
        db.profiles()
            .insert(&Profile {
                id: "P1".to_string(),
                user_id: "U1".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Smith".to_string(),
                email: "jane@example.com".to_string(),
                contact_number: "5551234567".to_string(),
                alternative_contact_number: None,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let mut req = upload_request(DocumentKind::Draft, Some("U1"), vec![file("ret.pdf", b"x")]);
        req.category = String::new();
        let stored = service.upload(&admin(), req).await.unwrap();
        assert!(stored[0].file_path.starts_with("U1/2024/Draft/"));
        assert_eq!(stored[0].category, "Draft");

        let (entries, _) = db.activities().search_page("", 1, 10).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].description,
            "Leo Tax Filing Uploaded Draft file Successfully for Jane Smith"
        );

        // The client can read but not delete the draft.
        let u1 = client("U1");
        assert_eq!(service.list(&u1, DocumentKind::Draft, None, "").await.unwrap().len(), 1);
        assert!(matches!(
            service.delete(&u1, DocumentKind::Draft, &stored[0].id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_client_cannot_upload_tax_forms() {
        let (service, _db, _blobs, _dir) = setup().await;
        let err = service
            .upload(
                &client("U1"),
                upload_request(DocumentKind::TaxForm, None, vec![file("f.pdf", b"x")]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    /// Blob store whose writes succeed only `budget` times and whose removes always fail.
    struct FlakyStore {
        inner: LocalBlobStore,
        budget: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl BlobStore for FlakyStore {
        async fn put(&self, bucket: Bucket, path: &str, data: Bytes) -> StorageResult<()> {
            if self.budget.load(Ordering::SeqCst) == 0 {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.budget.fetch_sub(1, Ordering::SeqCst);
            self.inner.put(bucket, path, data).await
        }
        async fn get(&self, bucket: Bucket, path: &str) -> StorageResult<Bytes> {
            self.inner.get(bucket, path).await
        }
        async fn remove(&self, _bucket: Bucket, _path: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("permission denied")))
        }
        async fn exists(&self, bucket: Bucket, path: &str) -> StorageResult<bool> {
            self.inner.exists(bucket, path).await
        }
        async fn list(&self, bucket: Bucket) -> StorageResult<Vec<String>> {
            self.inner.list(bucket).await
        }
        fn storage_type(&self) -> &'static str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_upload_stops_at_first_failure_without_rollback() {
        let dir = tempdir().unwrap();
        let db = DbContext::new(&dir.path().join("test.db"));
        db.init_schema().await.unwrap();
        let store = Arc::new(FlakyStore {
            inner: LocalBlobStore::new(dir.path().join("storage")),
            budget: std::sync::atomic::AtomicUsize::new(1),
        });
        let service = DocumentService::new(&db, store);
        let u1 = client("U1");

        let err = service
            .upload(
                &u1,
                upload_request(
                    DocumentKind::Upload,
                    None,
                    vec![file("one.pdf", b"1"), file("two.pdf", b"2"), file("three.pdf", b"3")],
                ),
            )
            .await
            .unwrap_err();
        match err {
            ServiceError::UploadFailed { file_name, stored, .. } => {
                assert_eq!(file_name, "two.pdf");
                assert_eq!(stored, 1);
            }
            other => panic!("unexpected error: {other}"),
        }

        let listed = service.list(&u1, DocumentKind::Upload, None, "").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_name, "one.pdf");

        // Failing blob removal is reported and the record survives.
        let err = service
            .delete(&u1, DocumentKind::Upload, &listed[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(service.list(&u1, DocumentKind::Upload, None, "").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_download_with_missing_blob_is_not_found() {
        let (service, _db, blobs, _dir) = setup().await;
        let u1 = client("U1");
        let stored = service
            .upload(&u1, upload_request(DocumentKind::Upload, None, vec![file("w2.pdf", b"x")]))
            .await
            .unwrap();
        blobs
            .remove(Bucket::UserDocuments, &stored[0].file_path)
            .await
            .unwrap();

        let err = service
            .download(&u1, DocumentKind::Upload, &stored[0].id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Storage(StorageError::NotFound { .. })));
    }

    /// Blob store whose remove also drops the matching row, standing in for
    /// a concurrent delete. With `break_table`, the record table disappears
    /// instead so the row delete fails.
    struct RacingStore {
        inner: LocalBlobStore,
        db: DbContext,
        kind: DocumentKind,
        id: String,
        break_table: bool,
    }

    #[async_trait]
    impl BlobStore for RacingStore {
        async fn put(&self, bucket: Bucket, path: &str, data: Bytes) -> StorageResult<()> {
            self.inner.put(bucket, path, data).await
        }
        async fn get(&self, bucket: Bucket, path: &str) -> StorageResult<Bytes> {
            self.inner.get(bucket, path).await
        }
        async fn remove(&self, bucket: Bucket, path: &str) -> StorageResult<()> {
            self.inner.remove(bucket, path).await?;
            if self.break_table {
                use diesel_async::SimpleAsyncConnection;
                let mut conn = self.db.pool().get().await.unwrap();
                conn.batch_execute(&format!("DROP TABLE {}", self.kind.table_name()))
                    .await
                    .unwrap();
            } else {
                self.db.documents().delete(self.kind, &self.id).await.unwrap();
            }
            Ok(())
        }
        async fn exists(&self, bucket: Bucket, path: &str) -> StorageResult<bool> {
            self.inner.exists(bucket, path).await
        }
        async fn list(&self, bucket: Bucket) -> StorageResult<Vec<String>> {
            self.inner.list(bucket).await
        }
        fn storage_type(&self) -> &'static str {
            "racing"
        }
    }

    async fn racing_delete(break_table: bool) -> ServiceResult<DocumentRecord> {
        let (service, db, blobs, _dir) = setup().await;
        let u1 = client("U1");
        let stored = service
            .upload(&u1, upload_request(DocumentKind::Upload, None, vec![file("w2.pdf", b"x")]))
            .await
            .unwrap();

        let racing = DocumentService::new(
            &db,
            Arc::new(RacingStore {
                inner: (*blobs).clone(),
                db: db.clone(),
                kind: DocumentKind::Upload,
                id: stored[0].id.clone(),
                break_table,
            }),
        );
        let result = racing.delete(&u1, DocumentKind::Upload, &stored[0].id).await;
        assert!(!blobs
            .exists(Bucket::UserDocuments, &stored[0].file_path)
            .await
            .unwrap());
        result
    }

    #[tokio::test]
    async fn test_delete_of_vanished_record_is_not_found() {
        let err = racing_delete(false).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_reports_record_failure_after_blob_removal() {
        let err = racing_delete(true).await.unwrap_err();
        assert!(matches!(err, ServiceError::Database(_)));
    }
}

//! Read-only consistency check between the record store and the blob store.
//!
//! Uploads and deletes touch the two stores in separate calls, so a failure
//! between them can leave a blob with no record or a record with no blob.
//! This module only reports such drift; it never repairs it.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::ServiceResult;
use crate::models::{DocumentKind, DocumentRecord};
use crate::repository::{DbContext, DocumentRepository};
use crate::storage::{BlobStore, Bucket};

/// A stored file that no record points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanBlob {
    pub bucket: Bucket,
    pub path: String,
}

/// Findings from one audit pass.
#[derive(Debug, Default, Serialize)]
pub struct AuditReport {
    pub records_checked: usize,
    pub blobs_checked: usize,
    pub orphan_blobs: Vec<OrphanBlob>,
    pub dangling_records: Vec<DocumentRecord>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_blobs.is_empty() && self.dangling_records.is_empty()
    }
}

pub struct AuditService {
    documents: DocumentRepository,
    blobs: Arc<dyn BlobStore>,
}

impl AuditService {
    pub fn new(db: &DbContext, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            documents: db.documents(),
            blobs,
        }
    }

    pub async fn run(&self) -> ServiceResult<AuditReport> {
        let mut report = AuditReport::default();

        for bucket in Bucket::ALL {
            let kinds: Vec<DocumentKind> = DocumentKind::ALL
                .into_iter()
                .filter(|k| k.bucket() == bucket)
                .collect();

            let mut referenced = HashSet::new();
            for kind in kinds {
                for record in self.documents.list(kind, None).await? {
                    report.records_checked += 1;
                    referenced.insert(record.file_path.clone());
                    if !self.blobs.exists(bucket, &record.file_path).await? {
                        tracing::debug!("Record {} has no blob at {}", record.id, record.file_path);
                        report.dangling_records.push(record);
                    }
                }
            }

            for path in self.blobs.list(bucket).await? {
                report.blobs_checked += 1;
                if !referenced.contains(&path) {
                    report.orphan_blobs.push(OrphanBlob { bucket, path });
                }
            }
        }

        if !report.is_clean() {
            tracing::warn!(
                "Audit found {} orphan blob(s) and {} dangling record(s)",
                report.orphan_blobs.len(),
                report.dangling_records.len()
            );
        }
        Ok(report)
    }
}

//! Document records shared by the tax-form, upload, draft and final pages.
//!
//! All four entities have the same shape. A `DocumentKind` carries the
//! per-entity configuration (table, bucket, storage scope) so that the
//! upload/list/download/delete lifecycle is written once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Bucket;
use crate::utils::sanitize_segment;

/// Categories offered on the client upload form.
pub const UPLOAD_CATEGORIES: &[&str] = &["W2s", "1099s", "1098s", "Last Year Tax Returns", "Other"];

/// Categories offered when an admin uploads a draft or final copy.
pub const COPY_CATEGORIES: &[&str] = &["Draft", "Final"];

/// Categories offered for shared tax information forms.
pub const TAX_FORM_CATEGORIES: &[&str] = &["Tax Information Form"];

/// Tax years offered by the upload forms.
pub const TAX_YEARS: &[&str] = &["2025", "2024", "2023", "2022"];

/// Which of the four document tables a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Blank forms published by the office, visible to every client.
    TaxForm,
    /// Source documents a client uploads (W2s, 1099s, ...).
    Upload,
    /// Draft returns prepared for a client.
    Draft,
    /// Final returns prepared for a client.
    Final,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [Self::TaxForm, Self::Upload, Self::Draft, Self::Final];

    /// URL slug used by the API and CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaxForm => "tax-forms",
            Self::Upload => "uploads",
            Self::Draft => "drafts",
            Self::Final => "finals",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tax-forms" | "tax_form" | "tax-form" => Some(Self::TaxForm),
            "uploads" | "upload" => Some(Self::Upload),
            "drafts" | "draft" => Some(Self::Draft),
            "finals" | "final" => Some(Self::Final),
            _ => None,
        }
    }

    /// Record store table holding this kind.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::TaxForm => "tax_information_forms",
            Self::Upload => "uploaded_documents",
            Self::Draft => "draft_copies",
            Self::Final => "final_copies",
        }
    }

    /// Blob store bucket holding this kind's files.
    pub fn bucket(&self) -> Bucket {
        match self {
            Self::TaxForm => Bucket::TaxForms,
            Self::Upload | Self::Draft | Self::Final => Bucket::UserDocuments,
        }
    }

    /// Human-readable entity name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TaxForm => "Tax Information Form",
            Self::Upload => "Uploaded Document",
            Self::Draft => "Draft Copy",
            Self::Final => "Final Copy",
        }
    }

    /// Whether records of this kind belong to a single client.
    pub fn is_owned(&self) -> bool {
        !matches!(self, Self::TaxForm)
    }

    /// Categories the upload form offers for this kind.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Self::TaxForm => TAX_FORM_CATEGORIES,
            Self::Upload => UPLOAD_CATEGORIES,
            Self::Draft | Self::Final => COPY_CATEGORIES,
        }
    }

    /// Category stored when an upload form leaves it blank.
    pub fn default_category(&self) -> &'static str {
        match self {
            Self::TaxForm => "Tax Information Form",
            Self::Upload => "Other",
            Self::Draft => "Draft",
            Self::Final => "Final",
        }
    }

    /// Build the blob path for a new file.
    ///
    /// Layout per kind:
    /// - tax forms: `tax-forms/{year}/{stamp}_{name}`
    /// - uploads: `{owner}/{year}/{category}/{stamp}_{name}`
    /// - drafts/finals: `{owner}/{year}/Draft|Final/{stamp}_{name}`
    ///
    /// `stamp` is a millisecond timestamp; callers guarantee it is unique per
    /// process so same-named files never share a path.
    pub fn blob_path(
        &self,
        owner: Option<&str>,
        year: &str,
        category: &str,
        stamp_ms: i64,
        file_name: &str,
    ) -> String {
        let file_component = format!("{}_{}", stamp_ms, sanitize_segment(file_name));
        let mut segments: Vec<String> = Vec::with_capacity(4);
        match self {
            Self::TaxForm => {
                segments.push("tax-forms".to_string());
                segments.push(sanitize_segment(year));
            }
            Self::Upload => {
                segments.push(sanitize_segment(owner.unwrap_or("shared")));
                segments.push(sanitize_segment(year));
                segments.push(sanitize_segment(category));
            }
            Self::Draft | Self::Final => {
                segments.push(sanitize_segment(owner.unwrap_or("shared")));
                segments.push(sanitize_segment(year));
                segments.push(
                    if *self == Self::Draft {
                        "Draft"
                    } else {
                        "Final"
                    }
                    .to_string(),
                );
            }
        }
        segments.push(file_component);
        segments.join("/")
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A metadata row pointing at one stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub kind: DocumentKind,
    /// Owning user; `None` for shared tax forms.
    pub owner: Option<String>,
    pub category: String,
    pub year: String,
    /// Name as uploaded, also used as the download name.
    pub file_name: String,
    /// Blob key within the kind's bucket.
    pub file_path: String,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Case-insensitive substring match over file name, category and year.
    ///
    /// A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.file_name.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
            || self.year.to_lowercase().contains(&needle)
    }
}

/// Keep only records matching `query`, preserving order.
pub fn filter_records(records: Vec<DocumentRecord>, query: &str) -> Vec<DocumentRecord> {
    records
        .into_iter()
        .filter(|r| r.matches_query(query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file_name: &str, category: &str, year: &str) -> DocumentRecord {
        DocumentRecord {
            id: uuid::Uuid::new_v4().to_string(),
            kind: DocumentKind::Upload,
            owner: Some("U1".to_string()),
            category: category.to_string(),
            year: year.to_string(),
            file_name: file_name.to_string(),
            file_path: format!("U1/{}/{}/1_{}", year, category, file_name),
            file_size: Some(10),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_roundtrip_slugs() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(DocumentKind::from_str("bogus"), None);
    }

    #[test]
    fn test_kind_tables_and_buckets() {
        assert_eq!(DocumentKind::TaxForm.table_name(), "tax_information_forms");
        assert_eq!(DocumentKind::Upload.table_name(), "uploaded_documents");
        assert_eq!(DocumentKind::Draft.table_name(), "draft_copies");
        assert_eq!(DocumentKind::Final.table_name(), "final_copies");
        assert_eq!(DocumentKind::TaxForm.bucket(), Bucket::TaxForms);
        assert_eq!(DocumentKind::Final.bucket(), Bucket::UserDocuments);
        assert!(!DocumentKind::TaxForm.is_owned());
        assert!(DocumentKind::Draft.is_owned());
    }

    #[test]
    fn test_upload_blob_path() {
        let path = DocumentKind::Upload.blob_path(
            Some("U1"),
            "2024",
            "W2s",
            1_700_000_000_000,
            "w2_2024.pdf",
        );
        assert_eq!(path, "U1/2024/W2s/1700000000000_w2_2024.pdf");
    }

    #[test]
    fn test_copy_blob_path_uses_kind_segment() {
        let draft = DocumentKind::Draft.blob_path(Some("U1"), "2025", "Final", 5, "ret.pdf");
        assert_eq!(draft, "U1/2025/Draft/5_ret.pdf");
        let final_copy = DocumentKind::Final.blob_path(Some("U1"), "2025", "Draft", 6, "ret.pdf");
        assert_eq!(final_copy, "U1/2025/Final/6_ret.pdf");
    }

    #[test]
    fn test_tax_form_blob_path() {
        let path = DocumentKind::TaxForm.blob_path(None, "2025", "Tax Information Form", 7, "f.pdf");
        assert_eq!(path, "tax-forms/2025/7_f.pdf");
    }

    #[test]
    fn test_blob_path_neutralizes_separators() {
        let path = DocumentKind::Upload.blob_path(Some("U1"), "2024", "W2s", 1, "../../etc/passwd");
        assert_eq!(path.matches('/').count(), 3);
        assert!(path.starts_with("U1/2024/W2s/1_"));
    }

    #[test]
    fn test_matches_query_fields() {
        let r = record("w2_2024.pdf", "W2s", "2024");
        assert!(r.matches_query("w2"));
        assert!(r.matches_query("W2S"));
        assert!(r.matches_query("2024"));
        assert!(r.matches_query(""));
        assert!(r.matches_query("   "));
        assert!(!r.matches_query("1099"));
    }

    #[test]
    fn test_filter_is_subset_in_order() {
        let records = vec![
            record("w2_2024.pdf", "W2s", "2024"),
            record("brokerage.pdf", "1099s", "2024"),
            record("mortgage.pdf", "1098s", "2023"),
        ];
        let filtered = filter_records(records.clone(), "2024");
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| records.contains(r)));
        assert_eq!(filtered[0].file_name, "w2_2024.pdf");
        assert_eq!(filtered[1].file_name, "brokerage.pdf");
    }
}

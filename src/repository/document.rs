//! Document record repository.
//!
//! The four document tables share one column layout, so every query is
//! written once and dispatched to the right table by `DocumentKind`.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::DocumentRow;
use super::pool::{DbError, DbPool};
use super::util::{format_timestamp, parse_datetime};
use crate::models::{DocumentKind, DocumentRecord};

/// Run `$body` with `$t` bound to the schema module of `$kind`'s table.
macro_rules! with_document_table {
    ($kind:expr, $t:ident => $body:block) => {
        match $kind {
            DocumentKind::TaxForm => {
                use crate::schema::tax_information_forms as $t;
                $body
            }
            DocumentKind::Upload => {
                use crate::schema::uploaded_documents as $t;
                $body
            }
            DocumentKind::Draft => {
                use crate::schema::draft_copies as $t;
                $body
            }
            DocumentKind::Final => {
                use crate::schema::final_copies as $t;
                $body
            }
        }
    };
}

/// Column list matching `DocumentRow`.
macro_rules! document_columns {
    ($t:ident) => {
        (
            $t::id,
            $t::user_id,
            $t::category,
            $t::year,
            $t::file_name,
            $t::file_path,
            $t::file_size,
            $t::created_at,
        )
    };
}

impl DocumentRow {
    fn into_record(self, kind: DocumentKind) -> DocumentRecord {
        DocumentRecord {
            id: self.id,
            kind,
            owner: self.user_id,
            category: self.category,
            year: self.year,
            file_name: self.file_name,
            file_path: self.file_path,
            file_size: self.file_size,
            created_at: parse_datetime(&self.created_at),
        }
    }
}

/// Repository over the tax form, upload, draft and final tables.
#[derive(Clone, Debug)]
pub struct DocumentRepository {
    pool: DbPool,
}

impl DocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// All records of `kind`, newest first. `owner` narrows to one user.
    pub async fn list(
        &self,
        kind: DocumentKind,
        owner: Option<&str>,
    ) -> Result<Vec<DocumentRecord>, DbError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<DocumentRow> = with_document_table!(kind, t => {
            match owner {
                Some(owner) => {
                    t::table
                        .filter(t::user_id.eq(owner))
                        .select(document_columns!(t))
                        .order((t::created_at.desc(), t::file_path.desc()))
                        .load::<DocumentRow>(&mut conn)
                        .await?
                }
                None => {
                    t::table
                        .select(document_columns!(t))
                        .order((t::created_at.desc(), t::file_path.desc()))
                        .load::<DocumentRow>(&mut conn)
                        .await?
                }
            }
        });

        Ok(rows.into_iter().map(|r| r.into_record(kind)).collect())
    }

    /// Get a record by ID.
    pub async fn get(&self, kind: DocumentKind, id: &str) -> Result<Option<DocumentRecord>, DbError> {
        let mut conn = self.pool.get().await?;

        let row: Option<DocumentRow> = with_document_table!(kind, t => {
            t::table
                .filter(t::id.eq(id))
                .select(document_columns!(t))
                .first::<DocumentRow>(&mut conn)
                .await
                .optional()?
        });

        Ok(row.map(|r| r.into_record(kind)))
    }

    /// Insert a new record into its kind's table.
    pub async fn insert(&self, record: &DocumentRecord) -> Result<(), DbError> {
        let mut conn = self.pool.get().await?;
        let created_at = format_timestamp(&record.created_at);

        with_document_table!(record.kind, t => {
            diesel::insert_into(t::table)
                .values((
                    t::id.eq(&record.id),
                    t::user_id.eq(record.owner.as_deref()),
                    t::category.eq(&record.category),
                    t::year.eq(&record.year),
                    t::file_name.eq(&record.file_name),
                    t::file_path.eq(&record.file_path),
                    t::file_size.eq(record.file_size),
                    t::created_at.eq(&created_at),
                ))
                .execute(&mut conn)
                .await?;
        });

        Ok(())
    }

    /// Delete a record. Returns whether a row was removed.
    pub async fn delete(&self, kind: DocumentKind, id: &str) -> Result<bool, DbError> {
        let mut conn = self.pool.get().await?;

        let rows = with_document_table!(kind, t => {
            diesel::delete(t::table.filter(t::id.eq(id)))
                .execute(&mut conn)
                .await?
        });

        Ok(rows > 0)
    }

    /// Count records of `kind`, optionally for one owner.
    pub async fn count(&self, kind: DocumentKind, owner: Option<&str>) -> Result<i64, DbError> {
        let mut conn = self.pool.get().await?;

        let count: i64 = with_document_table!(kind, t => {
            match owner {
                Some(owner) => {
                    t::table
                        .filter(t::user_id.eq(owner))
                        .select(count_star())
                        .first(&mut conn)
                        .await?
                }
                None => t::table.select(count_star()).first(&mut conn).await?,
            }
        });

        Ok(count)
    }
}

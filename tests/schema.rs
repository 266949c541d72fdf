//! Schema Tests
//!
//! Verifies that `DbContext::init_schema` produces the tables and constraints
//! the portal relies on, inspected through a plain SQLite connection.

use std::collections::BTreeSet;
use std::path::Path;

use leotax::repository::DbContext;
use rusqlite::{Connection, Result as SqliteResult};

const DOCUMENT_TABLES: [&str; 4] = [
    "tax_information_forms",
    "uploaded_documents",
    "draft_copies",
    "final_copies",
];

fn table_names(conn: &Connection) -> SqliteResult<BTreeSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<SqliteResult<BTreeSet<String>>>()?;
    Ok(names)
}

fn column_names(conn: &Connection, table: &str) -> SqliteResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\")", table))?;
    let names = stmt
        .query_map([], |row| row.get(1))?
        .collect::<SqliteResult<Vec<String>>>()?;
    Ok(names)
}

/// Columns covered by a unique index on `table`.
fn unique_columns(conn: &Connection, table: &str) -> SqliteResult<BTreeSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA index_list(\"{}\")", table))?;
    let indexes = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, bool>(2)?)))?
        .collect::<SqliteResult<Vec<_>>>()?;

    let mut columns = BTreeSet::new();
    for (name, unique) in indexes {
        if !unique {
            continue;
        }
        let mut info = conn.prepare(&format!("PRAGMA index_info(\"{}\")", name))?;
        for column in info.query_map([], |row| row.get::<_, String>(2))? {
            columns.insert(column?);
        }
    }
    Ok(columns)
}

async fn init(path: &Path) -> Connection {
    let ctx = DbContext::new(path);
    ctx.init_schema().await.expect("schema init");
    Connection::open(path).expect("open sqlite")
}

#[tokio::test]
async fn test_all_tables_created() {
    let dir = tempfile::tempdir().unwrap();
    let conn = init(&dir.path().join("leotax.db")).await;

    let tables = table_names(&conn).unwrap();
    for expected in [
        "users",
        "sessions",
        "profiles",
        "activity_logs",
        "tax_information_forms",
        "uploaded_documents",
        "draft_copies",
        "final_copies",
    ] {
        assert!(tables.contains(expected), "missing table {}", expected);
    }
}

#[tokio::test]
async fn test_document_tables_share_columns() {
    let dir = tempfile::tempdir().unwrap();
    let conn = init(&dir.path().join("leotax.db")).await;

    let expected = vec![
        "id",
        "user_id",
        "category",
        "year",
        "file_name",
        "file_path",
        "file_size",
        "created_at",
    ];
    for table in DOCUMENT_TABLES {
        assert_eq!(column_names(&conn, table).unwrap(), expected, "table {}", table);
    }
}

#[tokio::test]
async fn test_file_path_is_unique() {
    let dir = tempfile::tempdir().unwrap();
    let conn = init(&dir.path().join("leotax.db")).await;

    for table in DOCUMENT_TABLES {
        assert!(
            unique_columns(&conn, table).unwrap().contains("file_path"),
            "file_path not unique in {}",
            table
        );
    }

    let insert = "INSERT INTO uploaded_documents \
        (id, user_id, category, year, file_name, file_path, file_size, created_at) \
        VALUES (?1, 'U1', 'W2s', '2024', 'w2.pdf', 'U1/2024/W2s/1_w2.pdf', 10, '2024-01-01T00:00:00Z')";
    conn.execute(insert, ["a"]).unwrap();
    assert!(conn.execute(insert, ["b"]).is_err());
}

#[tokio::test]
async fn test_user_email_is_unique() {
    let dir = tempfile::tempdir().unwrap();
    let conn = init(&dir.path().join("leotax.db")).await;

    assert!(unique_columns(&conn, "users").unwrap().contains("email"));
    assert!(unique_columns(&conn, "profiles").unwrap().contains("user_id"));
}

#[tokio::test]
async fn test_init_schema_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leotax.db");
    let ctx = DbContext::new(&path);
    ctx.init_schema().await.unwrap();
    ctx.init_schema().await.unwrap();

    let conn = Connection::open(&path).unwrap();
    assert_eq!(table_names(&conn).unwrap().len(), 8);
}

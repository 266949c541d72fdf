//! Database maintenance commands.

use std::sync::Arc;

use console::style;

use crate::config::Settings;
use crate::services::AuditService;
use crate::storage::BlobStore;

/// Report blobs without records and records without blobs. Changes nothing.
pub async fn cmd_db_audit(settings: &Settings, json: bool) -> anyhow::Result<()> {
    if !settings.database_exists() {
        anyhow::bail!(
            "No database at {}. Run 'leotax init' first.",
            settings.database_path().display()
        );
    }

    let ctx = settings.create_db_context();
    let blobs: Arc<dyn BlobStore> = Arc::new(settings.blob_store());
    let report = AuditService::new(&ctx, blobs).run().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} Storage audit", style("→").cyan());
    println!("  Records checked: {}", report.records_checked);
    println!("  Blobs checked:   {}", report.blobs_checked);

    if report.is_clean() {
        println!("{} Record store and blob store agree", style("✓").green());
        return Ok(());
    }

    if !report.orphan_blobs.is_empty() {
        println!(
            "\n{} {} blob(s) with no record:",
            style("!").yellow(),
            report.orphan_blobs.len()
        );
        for blob in &report.orphan_blobs {
            println!("  {}/{}", blob.bucket, blob.path);
        }
    }

    if !report.dangling_records.is_empty() {
        println!(
            "\n{} {} record(s) with no blob:",
            style("!").yellow(),
            report.dangling_records.len()
        );
        for record in &report.dangling_records {
            println!(
                "  {} {} {} ({})",
                record.kind.table_name(),
                record.id,
                record.file_path,
                record.file_name
            );
        }
    }

    Ok(())
}

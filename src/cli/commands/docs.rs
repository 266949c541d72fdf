//! Document listing command.

use console::style;

use crate::config::Settings;
use crate::models::{filter_records, DocumentKind};
use crate::utils::{format_date, format_size};

/// List records of one kind, optionally for one user and filtered by a query.
pub async fn cmd_docs_ls(
    settings: &Settings,
    kind: &str,
    user_id: Option<&str>,
    query: &str,
) -> anyhow::Result<()> {
    let kind = DocumentKind::from_str(kind).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown document type '{}'. Use one of: tax-forms, uploads, drafts, finals",
            kind
        )
    })?;

    let ctx = settings.create_db_context();
    let owner = if kind.is_owned() { user_id } else { None };
    let records = filter_records(ctx.documents().list(kind, owner).await?, query);

    if records.is_empty() {
        println!("{} No {} records found", style("!").yellow(), kind.label().to_lowercase());
        return Ok(());
    }

    println!(
        "{:<36} {:<6} {:<22} {:>9} {:<18} {}",
        style("ID").bold(),
        style("Year").bold(),
        style("Category").bold(),
        style("Size").bold(),
        style("Uploaded").bold(),
        style("File").bold()
    );
    println!("{}", "-".repeat(110));

    for record in &records {
        println!(
            "{:<36} {:<6} {:<22} {:>9} {:<18} {}",
            record.id,
            record.year,
            record.category,
            format_size(record.file_size),
            format_date(&record.created_at),
            record.file_name
        );
        println!("  {}", style(&record.file_path).dim());
    }

    println!("\n{} record(s)", records.len());
    Ok(())
}

//! Initialize command.

use console::style;

use crate::config::Settings;
use crate::storage::Bucket;

/// Initialize the data directory, blob buckets and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;
    for bucket in Bucket::ALL {
        std::fs::create_dir_all(settings.storage_dir.join(bucket.as_str()))?;
    }

    let ctx = settings.create_db_context();
    ctx.init_schema().await?;

    println!(
        "{} Initialized Leo Tax Filing in {}",
        style("✓").green(),
        settings.data_dir.display()
    );
    println!("  Database: {}", settings.database_url());
    println!("  Storage:  {}", settings.storage_dir.display());

    if settings.admin_emails.is_empty() {
        println!(
            "{} No admin_emails configured; use 'leotax user promote <email>' after signing up",
            style("!").yellow()
        );
    }

    Ok(())
}

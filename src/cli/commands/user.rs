//! User management commands.

use console::style;

use crate::config::Settings;
use crate::services::AuthService;

/// List registered accounts with their role.
pub async fn cmd_user_list(settings: &Settings) -> anyhow::Result<()> {
    let ctx = settings.create_db_context();
    let users = ctx.auth().list_users().await?;

    if users.is_empty() {
        println!("{} No users registered", style("!").yellow());
        return Ok(());
    }

    let profiles = ctx.profiles();
    println!(
        "{:<38} {:<32} {:<8} {}",
        style("ID").bold(),
        style("Email").bold(),
        style("Role").bold(),
        style("Name").bold()
    );
    println!("{}", "-".repeat(100));

    for user in &users {
        let name = profiles
            .get_by_user(&user.id)
            .await?
            .map(|p| p.full_name())
            .unwrap_or_else(|| "-".to_string());
        let role = if user.is_admin() {
            style(user.role.as_str()).cyan()
        } else {
            style(user.role.as_str()).dim()
        };
        println!("{:<38} {:<32} {:<8} {}", user.id, user.email, role, name);
    }

    println!("\n{} user(s)", users.len());
    Ok(())
}

/// Grant the admin role to an existing account.
pub async fn cmd_user_promote(settings: &Settings, email: &str) -> anyhow::Result<()> {
    let ctx = settings.create_db_context();
    let auth = AuthService::new(&ctx, settings);

    if auth.promote(email).await? {
        println!("{} {} is now an admin", style("✓").green(), email);
        Ok(())
    } else {
        println!("{} No user with email {}", style("✗").red(), email);
        Err(anyhow::anyhow!("User not found: {}", email))
    }
}

//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod db;
mod docs;
mod init;
mod serve;
mod user;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "leotax")]
#[command(about = "Leo Tax Filing client portal")]
#[command(version)]
pub struct Cli {
    /// Target directory or database file (overrides config file).
    /// Can be a directory containing leotax.db or a .db file directly.
    #[arg(long, short = 't', global = true)]
    target: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory, storage buckets and database
    Init,

    /// Start the web server
    Serve {
        /// Address to bind: port, host, or host:port (defaults to config `bind`)
        bind: Option<String>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Inspect document records
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },

    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all accounts
    List,
    /// Grant the admin role to an account
    Promote {
        /// Email address of the account
        email: String,
    },
}

#[derive(Subcommand)]
enum DocsCommands {
    /// List records of one type
    Ls {
        /// Document type: tax-forms, uploads, drafts, finals
        kind: String,
        /// Only records belonging to this user ID
        #[arg(short, long)]
        user: Option<String>,
        /// Case-insensitive filter on file name, category or year
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Report blobs without records and records without blobs
    Audit {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
        target: cli.target,
    };
    let (settings, _config) = load_settings_with_options(options).await;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::User { command } => match command {
            UserCommands::List => user::cmd_user_list(&settings).await,
            UserCommands::Promote { email } => user::cmd_user_promote(&settings, &email).await,
        },
        Commands::Docs { command } => match command {
            DocsCommands::Ls { kind, user, query } => {
                docs::cmd_docs_ls(&settings, &kind, user.as_deref(), &query).await
            }
        },
        Commands::Db { command } => match command {
            DbCommands::Audit { json } => db::cmd_db_audit(&settings, json).await,
        },
    }
}

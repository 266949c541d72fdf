//! Configuration management for leotax using the prefer crate.
//!
//! Precedence, lowest to highest: built-in defaults, a discovered or
//! explicit config file, the `--target` flag, then `DATABASE_URL`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repository::DbContext;
use crate::storage::LocalBlobStore;

/// Default database filename.
pub const DEFAULT_DATABASE_FILENAME: &str = "leotax.db";

/// Default storage subdirectory name.
const STORAGE_SUBDIR: &str = "storage";

/// Default HTTP bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

/// Default session lifetime (one week).
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 168;

/// Default request body limit for uploads (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename.
    pub database_filename: String,
    /// Database URL (overrides data_dir/database_filename if set).
    pub database_url: Option<String>,
    /// Root of the blob store; buckets are subdirectories.
    pub storage_dir: PathBuf,
    /// Address the web server binds to.
    pub bind: String,
    /// Lifetime of a login session.
    pub session_ttl_hours: u64,
    /// Maximum accepted request body for uploads.
    pub max_upload_bytes: usize,
    /// Emails granted the admin role at sign-up (lowercase).
    pub admin_emails: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        // Documents dir -> Home dir -> Current dir
        let data_dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("leotax");

        Self {
            storage_dir: data_dir.join(STORAGE_SUBDIR),
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
            bind: DEFAULT_BIND.to_string(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            admin_emails: Vec::new(),
        }
    }
}

impl Settings {
    /// Create settings with a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            storage_dir: data_dir.join(STORAGE_SUBDIR),
            data_dir,
            ..Default::default()
        }
    }

    /// Get the database URL, constructing from path if not explicitly set.
    pub fn database_url(&self) -> String {
        if let Some(ref url) = self.database_url {
            url.clone()
        } else {
            format!("sqlite:{}", self.database_path().display())
        }
    }

    /// Get the full path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        match self.database_url {
            Some(ref url) => {
                let url = url.strip_prefix("sqlite:").unwrap_or(url);
                PathBuf::from(url.strip_prefix("//").unwrap_or(url))
            }
            None => self.data_dir.join(&self.database_filename),
        }
    }

    /// Check if the database file has been created.
    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }

    /// Whether `email` is configured as an administrator.
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }

    /// Ensure the data and storage directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            Self::log_directory_diagnostics(&self.data_dir, "data_dir");
            Self::log_directory_diagnostics(&self.storage_dir, "storage_dir");
        }

        for (dir, label) in [(&self.data_dir, "data"), (&self.storage_dir, "storage")] {
            fs::create_dir_all(dir).map_err(|e| {
                std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create {} directory '{}': {}",
                        label,
                        dir.display(),
                        e
                    ),
                )
            })?;
        }
        Ok(())
    }

    /// Log ownership and mode of a directory for debugging permission issues.
    #[cfg(unix)]
    fn log_directory_diagnostics(path: &Path, label: &str) {
        use std::os::unix::fs::MetadataExt;
        let uid = unsafe { libc::getuid() };
        let gid = unsafe { libc::getgid() };
        tracing::debug!(
            "{} check: path={}, running as uid={} gid={}",
            label,
            path.display(),
            uid,
            gid
        );

        match fs::metadata(path) {
            Ok(meta) => tracing::debug!(
                "{} exists: owner={}:{}, mode={:o}, is_dir={}",
                label,
                meta.uid(),
                meta.gid(),
                meta.mode() & 0o7777,
                meta.is_dir()
            ),
            Err(_) => tracing::debug!("{} does not exist, will attempt to create", label),
        }
    }

    /// Create a database context for the configured database.
    pub fn create_db_context(&self) -> DbContext {
        DbContext::from_url(&self.database_url())
    }

    /// Create the blob store rooted at `storage_dir`.
    pub fn blob_store(&self) -> LocalBlobStore {
        LocalBlobStore::new(&self.storage_dir)
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "target")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Blob store directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<String>,
    /// HTTP bind address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Session lifetime in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_ttl_hours: Option<u64>,
    /// Upload request body limit in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload_bytes: Option<u64>,
    /// Emails that become admins at sign-up.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[prefer(default)]
    pub admin_emails: Vec<String>,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Discover a `leotax` config file in the standard locations.
    pub async fn load() -> Self {
        match prefer::load("leotax").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path).await.unwrap_or_else(|e| {
                    tracing::warn!("{}", e);
                    Self::default()
                }),
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Parses TOML, YAML or JSON based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// The config file's parent directory, used for relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a possibly relative or `~`-prefixed path against `base_dir`.
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
            settings.storage_dir = settings.data_dir.join(STORAGE_SUBDIR);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref storage_dir) = self.storage_dir {
            settings.storage_dir = self.resolve_path(storage_dir, base_dir);
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        if let Some(ttl) = self.session_ttl_hours {
            settings.session_ttl_hours = ttl;
        }
        if let Some(limit) = self.max_upload_bytes {
            settings.max_upload_bytes = usize::try_from(limit).unwrap_or(usize::MAX);
        }
        if !self.admin_emails.is_empty() {
            settings.admin_emails = self
                .admin_emails
                .iter()
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
    /// Data directory or database file (`--target`).
    pub target: Option<PathBuf>,
}

/// A `--target` resolved to a data directory and optional database filename.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedTarget {
    data_dir: PathBuf,
    database_filename: Option<String>,
}

impl ResolvedTarget {
    /// A `.db`/`.sqlite` path names the database itself; anything else is a directory.
    fn from_path(path: &Path) -> Self {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(path)
        };

        let is_db_file = path
            .extension()
            .is_some_and(|ext| ext == "db" || ext == "sqlite" || ext == "sqlite3")
            || path.is_file();

        if is_db_file {
            Self {
                database_filename: path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string),
                data_dir: path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            }
        } else {
            Self {
                data_dir: path,
                database_filename: None,
            }
        }
    }
}

/// Look for `leotax.{ext}` or `config.{ext}` inside a data directory.
fn find_config_in_data_dir(data_dir: &Path) -> Option<PathBuf> {
    let extensions = ["toml", "yaml", "yml", "json"];
    let basenames = ["leotax", "config"];

    for basename in basenames {
        for ext in extensions {
            let path = data_dir.join(format!("{}.{}", basename, ext));
            if path.exists() {
                return Some(path);
            }
        }
    }
    None
}

/// `DATABASE_URL`, if set to a SQLite location.
fn database_url_from_env() -> Option<String> {
    let url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty())?;
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        tracing::warn!("Ignoring DATABASE_URL: only SQLite databases are supported");
        return None;
    }
    Some(url)
}

async fn load_file_config(options: &LoadOptions, target: Option<&ResolvedTarget>) -> Config {
    // Priority 1: explicit --config
    if let Some(ref config_path) = options.config_path {
        return Config::load_from_path(config_path).await.unwrap_or_else(|e| {
            tracing::warn!("{}", e);
            Config::default()
        });
    }

    // Priority 2: config inside the target data dir
    if let Some(target) = target {
        if let Some(config_path) = find_config_in_data_dir(&target.data_dir) {
            tracing::debug!("Found config in data dir: {}", config_path.display());
            return Config::load_from_path(&config_path)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("{}", e);
                    Config::default()
                });
        }
    }

    // Priority 3: auto-discover via prefer
    Config::load().await
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let target = options.target.as_deref().map(ResolvedTarget::from_path);
    let config = load_file_config(&options, target.as_ref()).await;

    let mut settings = Settings::default();

    let base_dir = if options.use_cwd {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    } else {
        config
            .base_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    };

    config.apply_to_settings(&mut settings, &base_dir);

    // --target takes precedence over the file for data_dir and storage_dir
    if let Some(target) = target {
        settings.storage_dir = target.data_dir.join(STORAGE_SUBDIR);
        settings.data_dir = target.data_dir;
        if let Some(filename) = target.database_filename {
            settings.database_filename = filename;
        }
    }

    // DATABASE_URL environment variable takes highest precedence
    if let Some(database_url) = database_url_from_env() {
        tracing::debug!("Using DATABASE_URL from environment: {}", database_url);
        settings.database_url = Some(database_url);
    }

    (settings, config)
}

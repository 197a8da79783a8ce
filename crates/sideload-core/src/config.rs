//! Configuration module
//!
//! The importer itself only needs [`ImporterConfig`]; [`Config`] adds what an
//! embedding service needs to build the storage and repository collaborators
//! from the environment.

use std::env;
use std::time::Duration;

use crate::mime::DEFAULT_ALLOWED_MIME_TYPES;
use crate::storage_types::StorageBackend;

// Common constants
const FETCH_TIMEOUT_SECS: u64 = 10;
const MAX_FILE_SIZE_MB: usize = 10;
const DB_MAX_CONNECTIONS: u32 = 5;

/// Settings for one importer instance.
#[derive(Clone, Debug)]
pub struct ImporterConfig {
    /// Upper bound for the whole remote fetch.
    pub fetch_timeout: Duration,
    /// Lowercase MIME types the type gate accepts.
    pub allowed_mime_types: Vec<String>,
    pub max_file_size_bytes: usize,
    pub user_agent: String,
    /// Delete the stored file when the record cannot be created.
    pub cleanup_on_record_failure: bool,
    /// Let the fetcher reach loopback, private and link-local addresses.
    pub allow_private_hosts: bool,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            user_agent: default_user_agent(),
            cleanup_on_record_failure: false,
            allow_private_hosts: false,
        }
    }
}

fn default_user_agent() -> String {
    format!("sideload/{}", env!("CARGO_PKG_VERSION"))
}

fn lookup_flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Storage backend selection.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            local_storage_path: None,
            local_storage_base_url: None,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub importer: ImporterConfig,
    pub storage: StorageConfig,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch_timeout_secs = lookup("SIDELOAD_FETCH_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(FETCH_TIMEOUT_SECS);

        let allowed_mime_types = lookup("SIDELOAD_ALLOWED_CONTENT_TYPES")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|types| !types.is_empty())
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_MIME_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let max_file_size_mb = lookup("SIDELOAD_MAX_FILE_SIZE_MB")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let max_file_size_bytes = max_file_size_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            anyhow::anyhow!("SIDELOAD_MAX_FILE_SIZE_MB is too large: {}", max_file_size_mb)
        })?;

        let user_agent = lookup("SIDELOAD_USER_AGENT")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_user_agent);

        let cleanup_on_record_failure = lookup_flag(&lookup, "SIDELOAD_CLEANUP_ON_RECORD_FAILURE");
        let allow_private_hosts = lookup_flag(&lookup, "SIDELOAD_ALLOW_PRIVATE_HOSTS");

        let backend = match lookup("STORAGE_BACKEND") {
            Some(name) => name.parse::<StorageBackend>()?,
            None => StorageBackend::Local,
        };

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DB_MAX_CONNECTIONS);

        Ok(Config {
            importer: ImporterConfig {
                fetch_timeout: Duration::from_secs(fetch_timeout_secs),
                allowed_mime_types,
                max_file_size_bytes,
                user_agent,
                cleanup_on_record_failure,
                allow_private_hosts,
            },
            storage: StorageConfig {
                backend,
                local_storage_path: lookup("LOCAL_STORAGE_PATH"),
                local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            },
            database_url: lookup("DATABASE_URL"),
            db_max_connections,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.importer.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "SIDELOAD_MAX_FILE_SIZE_MB must be greater than zero"
            ));
        }

        match self.storage.backend {
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH is required for the local storage backend"
                    ));
                }
                if self.storage.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL is required for the local storage backend"
                    ));
                }
            }
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.importer.fetch_timeout
    }

    pub fn allowed_mime_types(&self) -> &[String] {
        &self.importer.allowed_mime_types
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}

use std::sync::Arc;
use std::time::Duration;

use crate::database::Database;
use crate::diagnostics::DiagnosticSink;
use crate::error::SocialDbError;

/// Environment variable naming the database file.
pub const DB_PATH_ENV: &str = "SOCIAL_NETWORK_DB";
/// Environment variable overriding the busy timeout, in milliseconds.
pub const BUSY_TIMEOUT_ENV: &str = "SOCIAL_NETWORK_BUSY_TIMEOUT_MS";

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for the single `SQLite` connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbOptions {
    pub db_path: String,
    pub busy_timeout: Duration,
    pub create_if_missing: bool,
}

impl DbOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            create_if_missing: true,
        }
    }

    #[must_use]
    pub fn builder(db_path: impl Into<String>) -> DbOptionsBuilder {
        DbOptionsBuilder::new(db_path)
    }

    /// Read options from the process environment.
    ///
    /// # Errors
    /// Returns `SocialDbError::ConfigError` if the path is missing or the
    /// timeout is not a number.
    pub fn from_env() -> Result<Self, SocialDbError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `SocialDbError::ConfigError` if the path is missing or blank, or
    /// if the timeout does not parse as milliseconds.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SocialDbError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(DB_PATH_ENV)
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| SocialDbError::ConfigError(format!("{DB_PATH_ENV} is not set")))?;
        let mut builder = DbOptionsBuilder::new(db_path);
        if let Some(raw) = lookup(BUSY_TIMEOUT_ENV) {
            let ms: u64 = raw.trim().parse().map_err(|e| {
                SocialDbError::ConfigError(format!("{BUSY_TIMEOUT_ENV}={raw:?}: {e}"))
            })?;
            builder = builder.busy_timeout(Duration::from_millis(ms));
        }
        Ok(builder.finish())
    }
}

/// Fluent builder for [`DbOptions`].
#[derive(Debug, Clone)]
pub struct DbOptionsBuilder {
    opts: DbOptions,
}

impl DbOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: DbOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.opts.busy_timeout = busy_timeout;
        self
    }

    #[must_use]
    pub fn create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.opts.create_if_missing = create_if_missing;
        self
    }

    #[must_use]
    pub fn finish(self) -> DbOptions {
        self.opts
    }

    /// Build a [`Database`] and install the schema.
    ///
    /// # Errors
    ///
    /// Returns `SocialDbError` if the schema script cannot be applied.
    pub async fn build(self, sink: Arc<dyn DiagnosticSink>) -> Result<Database, SocialDbError> {
        let db = Database::new(self.finish(), sink);
        db.install_schema().await?;
        Ok(db)
    }
}

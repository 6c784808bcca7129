//! Lazily initialized connection pool shared by one generation run

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Once, PoisonError, RwLock as SettingsLock};
use std::time::Duration;

use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};
use tokio::sync::RwLock;
use tracing::{debug, error, info};
use url::Url;

use crate::dialect::DatabaseKind;
use crate::error::{Error, Result};

/// Maximum number of pooled connections
pub const POOL_MAX_SIZE: u32 = 10;
/// Connections kept open while idle
pub const POOL_MIN_IDLE: u32 = 5;
/// Time allowed for acquiring a connection
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
/// Idle connections are closed after this long
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
/// Connections are recycled after this long
pub const MAX_LIFETIME: Duration = Duration::from_secs(1800);

static INSTALL_DRIVERS: Once = Once::new();

fn install_drivers() {
    INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
}

/// Connection parameters for one database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbSettings {
    /// Connection URL, optionally with a `jdbc:` prefix
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Driver identifier from the configuration; informational only
    pub driver: Option<String>,
    /// Overrides [`ACQUIRE_TIMEOUT`]
    pub acquire_timeout: Option<Duration>,
}

impl DbSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Dialect of the configured URL
    pub fn kind(&self) -> Result<DatabaseKind> {
        DatabaseKind::resolve(&self.url)
    }

    /// The URL handed to sqlx: `jdbc:` stripped, credentials filled in.
    pub fn connect_url(&self) -> Result<String> {
        let kind = self.kind()?;
        let trimmed = self.url.trim();
        let raw = match trimmed.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("jdbc:") => &trimmed[5..],
            _ => trimmed,
        };

        if kind == DatabaseKind::Sqlite {
            return Ok(raw.to_string());
        }

        let mut url = Url::parse(raw)
            .map_err(|e| Error::Configuration(format!("invalid database url: {}", e)))?;

        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            if url.username().is_empty() {
                url.set_username(username).map_err(|_| {
                    Error::Configuration("database url cannot carry a username".into())
                })?;
            }
        }
        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            if url.password().is_none() {
                url.set_password(Some(password)).map_err(|_| {
                    Error::Configuration("database url cannot carry a password".into())
                })?;
            }
        }

        Ok(url.into())
    }
}

/// Owner of the run's connection pool.
///
/// The pool is built on first use. Concurrent first callers are serialized
/// by a double-checked read/write lock, so exactly one pool is ever built
/// per initialization. [`ConnectionManager::close`] must be sequenced after
/// every metadata query has finished.
#[derive(Debug, Default)]
pub struct ConnectionManager {
    settings: SettingsLock<Option<DbSettings>>,
    pool: RwLock<Option<AnyPool>>,
    pools_built: AtomicUsize,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager that is already configured
    pub fn with_settings(settings: DbSettings) -> Self {
        let manager = Self::new();
        manager.configure(settings);
        manager
    }

    /// Store connection settings. The last call before the first
    /// connection request wins.
    pub fn configure(&self, settings: DbSettings) {
        debug!("Configuring database connection for {}", settings.url);
        *self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(settings);
    }

    /// Currently stored settings
    pub fn settings(&self) -> Option<DbSettings> {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Dialect of the configured database
    pub fn kind(&self) -> Result<DatabaseKind> {
        self.settings()
            .ok_or_else(not_configured)?
            .kind()
    }

    /// Pool handle, building the pool on first call
    pub async fn pool(&self) -> Result<AnyPool> {
        if let Some(pool) = self.pool.read().await.as_ref() {
            return Ok(pool.clone());
        }

        let mut guard = self.pool.write().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let pool = self.build_pool().await?;
        *guard = Some(pool.clone());
        Ok(pool)
    }

    /// Check out one pooled connection
    pub async fn acquire(&self) -> Result<PoolConnection<Any>> {
        let pool = self.pool().await?;
        pool.acquire().await.map_err(|e| {
            error!("Failed to acquire database connection: {}", e);
            Error::Connection(e.to_string())
        })
    }

    /// Whether the pool has been built and not yet closed
    pub async fn is_initialized(&self) -> bool {
        self.pool.read().await.is_some()
    }

    /// Number of pools built over this manager's lifetime
    pub fn pools_built(&self) -> usize {
        self.pools_built.load(Ordering::SeqCst)
    }

    /// Close the pool. Does nothing if it was never built.
    pub async fn close(&self) {
        let pool = self.pool.write().await.take();
        if let Some(pool) = pool {
            pool.close().await;
            info!("Database connection pool closed");
        }
    }

    async fn build_pool(&self) -> Result<AnyPool> {
        let settings = self.settings().ok_or_else(not_configured)?;
        let kind = settings.kind()?;
        if !kind.has_driver() {
            return Err(Error::Connection(format!(
                "no database driver is available for {}",
                kind
            )));
        }
        if let Some(driver) = &settings.driver {
            debug!("Driver identifier {} is resolved from the url scheme", driver);
        }

        install_drivers();
        let url = settings.connect_url()?;

        let pool = AnyPoolOptions::new()
            .max_connections(POOL_MAX_SIZE)
            .min_connections(POOL_MIN_IDLE)
            .acquire_timeout(settings.acquire_timeout.unwrap_or(ACQUIRE_TIMEOUT))
            .idle_timeout(IDLE_TIMEOUT)
            .max_lifetime(MAX_LIFETIME)
            .connect(&url)
            .await
            .map_err(|e| {
                error!("Failed to initialize connection pool: {}", e);
                Error::Connection(e.to_string())
            })?;

        self.pools_built.fetch_add(1, Ordering::SeqCst);
        info!("Database connection pool initialized ({})", kind);
        Ok(pool)
    }
}

fn not_configured() -> Error {
    Error::Configuration("database settings are not configured".into())
}

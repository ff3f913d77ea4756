use crate::config::database::DbConfig;
use crate::domain::model::Engine;
use crate::domain::ports::HealthCheck;
use crate::utils::error::{SdkError, Result};
use crate::utils::logger::{Logger, Millis};
use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Instant;

/// Relational database handle. Queries go straight through [`DbClient::pool`].
#[derive(Debug, Clone)]
pub struct DbClient {
    pool: Option<MySqlPool>,
    logger: Logger,
}

impl DbClient {
    /// Opens a pool for `config`.
    ///
    /// The handle is returned even when opening fails (it then holds no
    /// pool), so the accompanying result must be checked, not just the handle.
    /// Use [`DbClient::connect`] to get a plain `Result` instead.
    pub async fn open(logger: Logger, config: &DbConfig) -> (Self, Result<()>) {
        let log = logger.with("method", "open");

        let opened = match Engine::from_name(&config.engine) {
            Some(Engine::MySql) => Self::open_mysql(&log, config).await,
            None => Err(SdkError::UnsupportedEngine {
                engine: config.engine.clone(),
            }),
        };

        match opened {
            Ok(pool) => (
                Self {
                    pool: Some(pool),
                    logger,
                },
                Ok(()),
            ),
            Err(e) => {
                log.error(
                    "open database error",
                    &[("error", &e), ("engine", &config.engine)],
                );
                (Self { pool: None, logger }, Err(e))
            }
        }
    }

    pub async fn connect(logger: Logger, config: &DbConfig) -> Result<Self> {
        let (client, opened) = Self::open(logger, config).await;
        opened.map(|_| client)
    }

    async fn open_mysql(log: &Logger, config: &DbConfig) -> Result<MySqlPool> {
        let options = config.connect_options()?;
        log.debug("", &[("dsn", &config.redacted_dsn())]);

        let started = Instant::now();
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(config.timeout())
            .connect_with(options)
            .await?;

        log.debug(
            "database connected",
            &[("elapsed_ms", &Millis(started.elapsed()))],
        );
        Ok(pool)
    }

    pub fn pool(&self) -> Option<&MySqlPool> {
        self.pool.as_ref()
    }

    pub fn require_pool(&self) -> Result<&MySqlPool> {
        self.pool.as_ref().ok_or(SdkError::NotConnected)
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

#[async_trait]
impl HealthCheck for DbClient {
    async fn ping(&self) -> Result<()> {
        let pool = self.require_pool()?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

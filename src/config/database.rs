use super::Resolver;
use crate::domain::model::Engine;
use crate::utils::error::{SdkError, Result};
use crate::utils::validation::{
    validate_identifier, validate_non_empty_string, validate_port, Validate,
};
use serde::{Deserialize, Serialize};
use sqlx::mysql::MySqlConnectOptions;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CHARSET: &str = "utf8mb4";
pub const DEFAULT_CONN_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the relational client.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub engine: String,
    pub user: String,
    pub password: String,
    pub db_name: String,
    pub host: String,
    pub port: String,
    pub charset: String,
    pub timeout_secs: u64,
}

impl DbConfig {
    /// Merges `explicit` over the `DB_*` settings field by field: a non-empty
    /// explicit field wins, anything else falls back to the resolver, and the
    /// charset and timeout defaults fill what is still missing.
    pub fn resolve(explicit: Option<&DbConfig>, resolver: &Resolver) -> Self {
        let explicit = explicit.cloned().unwrap_or_default();
        let pick = |value: String, key: &str| {
            if value.is_empty() {
                resolver.get_string(key)
            } else {
                value
            }
        };

        let mut charset = pick(explicit.charset, "DB_CHARSET");
        if charset.is_empty() {
            charset = DEFAULT_CHARSET.to_string();
        }

        let mut timeout_secs = if explicit.timeout_secs > 0 {
            explicit.timeout_secs
        } else {
            resolver.get_u64("DB_CONN_TIMEOUT")
        };
        if timeout_secs == 0 {
            timeout_secs = DEFAULT_CONN_TIMEOUT_SECS;
        }

        Self {
            engine: pick(explicit.engine, "DB_ENGINE"),
            user: pick(explicit.user, "DB_USER"),
            password: pick(explicit.password, "DB_PASSWORD"),
            db_name: pick(explicit.db_name, "DB_NAME"),
            host: pick(explicit.host, "DB_HOST"),
            port: pick(explicit.port, "DB_PORT"),
            charset,
            timeout_secs,
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(None, &Resolver::from_env())
    }

    pub fn engine(&self) -> Result<Engine> {
        Engine::from_name(&self.engine).ok_or_else(|| SdkError::UnsupportedEngine {
            engine: self.engine.clone(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `user:password@tcp(host:port)/dbname?charset=..&parseTime=True&loc=Local&timeout=Ns`
    pub fn dsn(&self) -> String {
        self.format_dsn(&self.password)
    }

    /// Same as [`DbConfig::dsn`] with the password masked, for logs.
    pub fn redacted_dsn(&self) -> String {
        self.format_dsn("***")
    }

    fn format_dsn(&self, password: &str) -> String {
        format!(
            "{}:{}@tcp({}:{})/{}?charset={}&parseTime=True&loc=Local&timeout={}s",
            self.user, password, self.host, self.port, self.db_name, self.charset, self.timeout_secs
        )
    }

    /// The `sqlx` equivalent of [`DbConfig::dsn`].
    pub fn connect_options(&self) -> Result<MySqlConnectOptions> {
        self.validate()?;
        let port = validate_port("DB_PORT", &self.port)?;

        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(port)
            .username(&self.user)
            .password(&self.password)
            .charset(&self.charset);

        // 空的 DB_NAME 代表連線時不指定預設資料庫
        if self.db_name.is_empty() {
            Ok(options)
        } else {
            Ok(options.database(&self.db_name))
        }
    }
}

impl Validate for DbConfig {
    fn validate(&self) -> Result<()> {
        self.engine()?;
        validate_non_empty_string("DB_HOST", &self.host)?;
        validate_port("DB_PORT", &self.port)?;
        validate_identifier("DB_CHARSET", &self.charset)?;
        Ok(())
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("engine", &self.engine)
            .field("user", &self.user)
            .field("password", &"***")
            .field("db_name", &self.db_name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("charset", &self.charset)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

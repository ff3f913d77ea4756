pub mod database;
pub mod document;
pub mod http;
pub mod logging;
pub mod store;

pub use database::DbConfig;
pub use document::MongoConfig;
pub use http::HttpConfig;
pub use logging::{LogConfig, LogOption};

use crate::utils::error::Result;
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Reads named settings for the client factories.
///
/// Lookups walk three layers and stop at the first non-empty value:
/// explicit overrides set with [`Resolver::set`], the process environment
/// (exact key first, then upper-cased), then an optional TOML config store.
/// Missing keys produce zero values; defaults are the caller's business.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    overrides: HashMap<String, String>,
    store: HashMap<String, String>,
    read_env: bool,
}

impl Resolver {
    /// Resolver backed by the process environment.
    pub fn from_env() -> Self {
        Self {
            read_env: true,
            ..Self::default()
        }
    }

    /// Resolver that never touches the process environment.
    pub fn isolated() -> Self {
        Self::default()
    }

    /// 載入 TOML 設定檔作為最低優先層
    pub fn with_toml_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.store.extend(store::load_file(path)?);
        Ok(self)
    }

    pub fn with_toml_str(mut self, content: &str) -> Result<Self> {
        self.store.extend(store::load_str(content)?);
        Ok(self)
    }

    pub fn set(mut self, key: &str, value: impl Into<String>) -> Self {
        self.overrides.insert(key.to_uppercase(), value.into());
        self
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        let upper = key.to_uppercase();

        if let Some(value) = self.overrides.get(&upper).filter(|v| !v.is_empty()) {
            return Some(value.clone());
        }

        if self.read_env {
            for name in [key, upper.as_str()] {
                if let Ok(value) = env::var(name) {
                    if !value.is_empty() {
                        return Some(value);
                    }
                }
            }
        }

        self.store.get(&upper).filter(|v| !v.is_empty()).cloned()
    }

    pub fn get_string(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }

    /// First non-empty value among `keys`, in order.
    pub fn get_first_string(&self, keys: &[&str]) -> String {
        keys.iter()
            .find_map(|key| self.lookup(key))
            .unwrap_or_default()
    }

    pub fn get_i64(&self, key: &str) -> i64 {
        self.lookup(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn get_u64(&self, key: &str) -> u64 {
        self.lookup(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn get_u32(&self, key: &str) -> u32 {
        self.lookup(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.lookup(key).map(|v| parse_bool(&v)).unwrap_or(false)
    }

    /// `None` when the key is unset, so callers can tell "false" from "absent".
    pub fn get_opt_bool(&self, key: &str) -> Option<bool> {
        self.lookup(key).map(|v| parse_bool(&v))
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "t" | "true" | "y" | "yes" | "on"
    )
}

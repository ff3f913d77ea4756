use super::Resolver;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    /// Reads `HTTP_CLIENT_TIMEOUT`; zero or unset means the default.
    pub fn resolve(resolver: &Resolver) -> Self {
        let timeout_secs = match resolver.get_u64("HTTP_CLIENT_TIMEOUT") {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        Self { timeout_secs }
    }

    pub fn from_env() -> Self {
        Self::resolve(&Resolver::from_env())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

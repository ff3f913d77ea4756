use crate::utils::error::Result;
use async_trait::async_trait;
use std::fmt;

/// Generic key-value logging seam, for code that only knows how to hand over
/// a flat `key, value, key, value, ...` sequence.
pub trait KeyValueLogger: Send + Sync {
    fn log(&self, keyvals: &[&dyn fmt::Display]) -> Result<()>;
}

/// Connectivity check implemented by every database client.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

pub mod adapters;
pub mod config;
pub mod domain;
pub mod utils;

pub use adapters::document::{decode_document, encode_document, MongoClient};
pub use adapters::http::{client_from_env, new_client};
pub use adapters::relational::DbClient;
pub use config::{DbConfig, HttpConfig, LogConfig, LogOption, MongoConfig, Resolver};
pub use domain::model::{DispatchMode, Engine, LogLevel};
pub use domain::ports::{HealthCheck, KeyValueLogger};
pub use utils::error::{Result, SdkError};
pub use utils::logger::{flush_logger, Logger};

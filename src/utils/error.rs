use std::time::Duration;
use thiserror::Error;

/// Message prefix MySQL uses for unique-key violations.
pub const DUPLICATE_ENTRY_PREFIX: &str = "Error 1062: Duplicate entry";

const MYSQL_DUPLICATE_ENTRY: u16 = 1062;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Document store error: {0}")]
    DocumentStoreError(#[from] mongodb::error::Error),

    #[error("Document encode error: {0}")]
    EncodeError(#[from] mongodb::bson::ser::Error),

    #[error("Document decode error: {0}")]
    DecodeError(#[from] mongodb::bson::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{engine} is an unsupported database engine")]
    UnsupportedEngine { engine: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}': '{value}' - {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{operation} timed out after {timeout:?}")]
    TimeoutError { operation: String, timeout: Duration },

    #[error("Logger initialization failed: {message}")]
    LoggerError { message: String },

    #[error("Relational client has no open connection")]
    NotConnected,
}

impl SdkError {
    /// Reports whether this error is a MySQL duplicate-key violation.
    pub fn is_duplicate_entry(&self) -> bool {
        if let SdkError::DatabaseError(sqlx::Error::Database(db_err)) = self {
            if let Some(mysql) = db_err.try_downcast_ref::<sqlx::mysql::MySqlDatabaseError>() {
                return mysql.number() == MYSQL_DUPLICATE_ENTRY;
            }
        }
        is_duplicate_entry_message(&self.to_string())
    }
}

/// Classifies an error message by the MySQL duplicate-entry signature.
pub fn is_duplicate_entry_message(message: &str) -> bool {
    message.starts_with(DUPLICATE_ENTRY_PREFIX)
}

pub type Result<T> = std::result::Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_entry_message() {
        assert!(is_duplicate_entry_message(
            "Error 1062: Duplicate entry 'alice' for key 'users.name'"
        ));
        assert!(!is_duplicate_entry_message(
            "Error 1452: Cannot add or update a child row"
        ));
        assert!(!is_duplicate_entry_message(
            "wrapped: Error 1062: Duplicate entry 'alice'"
        ));
    }

    #[test]
    fn test_unsupported_engine_message() {
        let err = SdkError::UnsupportedEngine {
            engine: "oracle".to_string(),
        };
        assert_eq!(err.to_string(), "oracle is an unsupported database engine");
        assert!(!err.is_duplicate_entry());
    }

    #[test]
    fn test_config_error_is_not_duplicate_entry() {
        let err = SdkError::ConfigError {
            message: "Error 1062: Duplicate entry".to_string(),
        };
        // Display adds a prefix, so the raw signature no longer leads the message.
        assert!(!err.is_duplicate_entry());
    }
}

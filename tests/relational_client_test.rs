use anyhow::Result;
use sdk_common::utils::error::is_duplicate_entry_message;
use sdk_common::{DbClient, DbConfig, HealthCheck, LogConfig, Logger, SdkError};

fn quiet_logger() -> Result<Logger> {
    let config = LogConfig {
        disable_stacktrace: true,
        ..Default::default()
    };
    Ok(Logger::new(&config)?)
}

fn unsupported_config() -> DbConfig {
    DbConfig {
        engine: "X".to_string(),
        user: "u".to_string(),
        password: "p".to_string(),
        db_name: "d".to_string(),
        host: "localhost".to_string(),
        port: "3306".to_string(),
        charset: "utf8mb4".to_string(),
        timeout_secs: 1,
    }
}

#[tokio::test]
async fn test_unsupported_engine_returns_handle_and_error() -> Result<()> {
    let (client, opened) = DbClient::open(quiet_logger()?, &unsupported_config()).await;

    let err = opened.unwrap_err();
    assert!(matches!(err, SdkError::UnsupportedEngine { .. }));
    assert!(err.to_string().contains("X is an unsupported database engine"));
    assert!(!client.is_connected());
    assert!(client.pool().is_none());
    assert!(matches!(client.require_pool(), Err(SdkError::NotConnected)));
    Ok(())
}

#[tokio::test]
async fn test_connect_is_strict() -> Result<()> {
    let result = DbClient::connect(quiet_logger()?, &unsupported_config()).await;
    assert!(matches!(result, Err(SdkError::UnsupportedEngine { .. })));
    Ok(())
}

#[tokio::test]
async fn test_ping_without_pool_fails() -> Result<()> {
    let (client, _) = DbClient::open(quiet_logger()?, &unsupported_config()).await;
    assert!(matches!(client.ping().await, Err(SdkError::NotConnected)));
    client.close().await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_port_is_reported_before_connecting() -> Result<()> {
    let config = DbConfig {
        engine: "mysql".to_string(),
        port: "not-a-port".to_string(),
        ..unsupported_config()
    };

    let (client, opened) = DbClient::open(quiet_logger()?, &config).await;
    assert!(matches!(
        opened,
        Err(SdkError::InvalidConfigValueError { .. })
    ));
    assert!(!client.is_connected());
    Ok(())
}

#[tokio::test]
async fn test_empty_db_name_reaches_the_driver() -> Result<()> {
    let config = DbConfig {
        engine: "mysql".to_string(),
        db_name: String::new(),
        host: "127.0.0.1".to_string(),
        port: "1".to_string(),
        ..unsupported_config()
    };

    let (client, opened) = DbClient::open(quiet_logger()?, &config).await;
    assert!(matches!(opened, Err(SdkError::DatabaseError(_))));
    assert!(!client.is_connected());
    Ok(())
}

#[test]
fn test_duplicate_entry_classification() {
    assert!(is_duplicate_entry_message(
        "Error 1062: Duplicate entry 'a@b.c' for key 'email'"
    ));
    assert!(!is_duplicate_entry_message("Error 1045: Access denied"));
    assert!(!SdkError::NotConnected.is_duplicate_entry());
}

use crate::config::http::HttpConfig;
use crate::utils::error::Result;
use reqwest::Client;

/// Builds an HTTP client whose requests time out after the configured duration.
pub fn new_client(config: &HttpConfig) -> Result<Client> {
    tracing::debug!("Building HTTP client with {}s timeout", config.timeout_secs);
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(client)
}

/// [`new_client`] configured from `HTTP_CLIENT_TIMEOUT`.
pub fn client_from_env() -> Result<Client> {
    new_client(&HttpConfig::from_env())
}

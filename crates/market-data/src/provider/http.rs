//! Shared HTTP plumbing for provider clients.

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::errors::ProviderError;

const USER_AGENT: &str = concat!("alfred-market-data/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all providers.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug)]
pub(crate) struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a 2xx reply, or [`ProviderError::Http`].
    pub fn into_success_body(self) -> Result<String, ProviderError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ProviderError::Http {
                status: self.status,
            })
        }
    }
}

/// Issue a GET and read the whole body.
///
/// Connection failures, timeouts and truncated bodies are
/// [`ProviderError::Transport`]; the status is left for the caller to judge.
pub(crate) async fn get(
    client: &Client,
    provider: &str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<HttpReply, ProviderError> {
    debug!("{} GET {} {:?}", provider, url, query);

    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| ProviderError::Transport(format!("Request failed: {}", e)))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::Transport(format!("Failed to read response: {}", e)))?;

    debug!("{} replied with HTTP {}", provider, status);
    Ok(HttpReply { status, body })
}

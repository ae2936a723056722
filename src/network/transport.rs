//! HTTP transport
//!
//! The single seam between the client and the network. Everything above it
//! deals in [`RequestResult`]s only, which keeps it mockable.

use super::error::ApiError;
use super::result::RequestResult;
use crate::consts::cli_consts::http;
use reqwest::{Client, ClientBuilder};

#[cfg(test)]
use mockall::automock;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with client version
const USER_AGENT: &str = concat!("beer-analytics-cli/", env!("CARGO_PKG_VERSION"));

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Performs one GET. Never fails: transport errors become status 0.
    async fn fetch(&self, url: &str, query: &[(String, String)]) -> RequestResult;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(http::connect_timeout())
            .timeout(http::request_timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, query: &[(String, String)]) -> RequestResult {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .send()
            .await;

        match response {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => RequestResult::new(status, body),
                    Err(e) if status == 200 => {
                        // A truncated success is no success
                        RequestResult::transport_failure(format!(
                            "Failed to read response body: {}",
                            e
                        ))
                    }
                    Err(_) => RequestResult::new(status, String::new()),
                }
            }
            Err(e) => RequestResult::transport_failure(e.to_string()),
        }
    }
}

#[cfg(test)]
/// These are ignored by default since they require a running site.
mod live_site_tests {
    use super::*;
    use crate::consts::cli_consts::analyzer;
    use crate::environment::Environment;

    #[tokio::test]
    #[ignore] // This test requires a live site instance.
    /// Should download the analyzer entities.
    async fn test_fetch_entities() {
        let transport = HttpTransport::new().unwrap();
        let url = format!(
            "{}{}",
            Environment::Production.base_url(),
            analyzer::ENTITIES_PATH
        );
        let result = transport.fetch(&url, &[]).await;
        assert_eq!(result.status, 200, "unexpected body: {}", result.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    /// A refused connection is reported as a transport failure, not an error.
    async fn test_unreachable_host_is_status_zero() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.fetch("http://127.0.0.1:9/nothing", &[]).await;
        assert!(result.is_transport_failure());
        assert!(!result.body.is_empty());
    }
}

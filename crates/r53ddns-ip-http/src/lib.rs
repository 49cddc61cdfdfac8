// # HTTP IP Source
//
// This crate provides the public address lookup for the updater.
//
// ## Behavior
//
// One GET request to an IP-echo service (default `https://api.ipify.org`).
// No headers, authentication or query parameters are added. The whole
// response body is taken verbatim as the address: no trimming and no
// IPv4/IPv6 syntax check.
//
// Only transport failures and body-read failures are errors. A non-2xx
// status is logged but its body is still returned.
//
// ## Timeouts
//
// By default there is no request timeout. `HttpIpSource::with_timeout`
// bounds the whole request when the configuration asks for it.

use r53ddns_core::traits::{IpSource, ResolvedAddress};
use r53ddns_core::{Error, Result};

use std::time::Duration;

/// HTTP-based public address lookup
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source without a request timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://api.ipify.org")
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with a request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::resolution(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Build from the configured endpoint and optional timeout
    pub fn from_config(config: &r53ddns_core::DdnsConfig) -> Result<Self> {
        match config.lookup_timeout_secs {
            Some(secs) => Self::with_timeout(&config.get_ip_address_host, Duration::from_secs(secs)),
            None => Ok(Self::new(&config.get_ip_address_host)),
        }
    }

    /// The endpoint this source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the address text from the HTTP service
    async fn fetch_address(&self) -> Result<ResolvedAddress> {
        tracing::debug!("Requesting public address from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::resolution(format!("Error retrieving IP address: {}", e)))?;

        if !response.status().is_success() {
            tracing::warn!(
                "Address service {} answered with HTTP {}",
                self.url,
                response.status()
            );
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::resolution(format!("Error reading IP address response: {}", e)))?;

        Ok(ResolvedAddress::new(String::from_utf8_lossy(&body).into_owned()))
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<ResolvedAddress> {
        self.fetch_address().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn body_is_returned_verbatim() {
        let url = serve_once("200 OK", "203.0.113.9").await;
        let address = HttpIpSource::new(url).current().await.unwrap();
        assert_eq!(address.as_str(), "203.0.113.9");
    }

    #[tokio::test]
    async fn no_format_validation() {
        let url = serve_once("200 OK", "not-an-ip\n").await;
        let address = HttpIpSource::new(url).current().await.unwrap();
        assert_eq!(address.as_str(), "not-an-ip\n");
    }

    #[tokio::test]
    async fn error_status_still_returns_body() {
        let url = serve_once("503 Service Unavailable", "busy").await;
        let address = HttpIpSource::new(url).current().await.unwrap();
        assert_eq!(address.as_str(), "busy");
    }

    #[tokio::test]
    async fn connection_failure_is_resolution_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = HttpIpSource::new(format!("http://{}/", addr))
            .current()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }

    #[test]
    fn from_config_uses_endpoint() {
        let config = r53ddns_core::DdnsConfig::from_yaml_str("lookup_timeout_secs: 5").unwrap();
        let source = HttpIpSource::from_config(&config).unwrap();
        assert_eq!(source.url(), "https://api.ipify.org");
    }
}

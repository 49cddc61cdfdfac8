// # IP Source Trait
//
// Defines the interface for discovering the caller's public address.
//
// ## Implementations
//
// - HTTP echo service: `r53ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use r53ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     let address = source.current().await?;
//     println!("Public address: {}", address);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;

/// The caller's public address as reported by the discovery service
///
/// The text is kept exactly as received. No IPv4/IPv6 syntax check is
/// applied; the DNS provider is the one that rejects a malformed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedAddress(String);

impl ResolvedAddress {
    /// Wrap the discovered address text
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for public address lookups
///
/// A run performs exactly one lookup. Implementations are not expected to
/// cache, poll or retry.
///
/// Implementations must be thread-safe: the lookup runs on its own spawned
/// task (see [`crate::lookup`]).
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the current public address
    ///
    /// # Returns
    ///
    /// - `Ok(ResolvedAddress)`: The address text
    /// - `Err(Error::Resolution)`: If the service could not be reached or its response read
    async fn current(&self) -> Result<ResolvedAddress, crate::Error>;
}

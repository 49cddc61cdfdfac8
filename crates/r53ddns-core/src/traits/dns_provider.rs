// # DNS Provider Trait
//
// Defines the interface for submitting record changes to a DNS provider,
// together with the change-batch model the provider receives.
//
// ## Implementations
//
// - AWS Route 53: `r53ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use r53ddns_core::{ChangeRequest, DnsProvider, ResolvedAddress, SiteConfig};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let site = SiteConfig::new("Z123").with_record("home.example.com");
//     let request = ChangeRequest::for_site(&site, &ResolvedAddress::new("203.0.113.9"));
//     provider.change_record_sets(&request).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;

use crate::config::SiteConfig;
use crate::traits::ResolvedAddress;

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// A record (IPv4)
    A,
    /// AAAA record (IPv6)
    Aaaa,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Change action
///
/// Only create-or-replace is ever issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    /// Create the record, or overwrite it if it exists
    Upsert,
}

impl ChangeAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Upsert => "UPSERT",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record change inside a change batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Fully-qualified record name
    pub name: String,
    /// Time-to-live in seconds
    pub ttl: i64,
    /// A or AAAA
    pub record_type: RecordType,
    /// Change action
    pub action: ChangeAction,
    /// Record value (the resolved address)
    pub value: String,
}

/// One change batch, targeted at one hosted zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Target hosted zone id
    pub hosted_zone_id: String,
    /// Change batch comment
    pub comment: String,
    /// One change per configured record name, in configuration order
    pub changes: Vec<ChangeRecord>,
}

impl ChangeRequest {
    /// Build the upsert batch for a site
    ///
    /// Every change shares the site's TTL and record type and carries the
    /// resolved address as its only value. The batch is not checked for
    /// emptiness or a missing zone id.
    pub fn for_site(site: &SiteConfig, address: &ResolvedAddress) -> Self {
        let record_type = site.record_type();

        let changes = site
            .record_names
            .iter()
            .map(|name| ChangeRecord {
                name: name.clone(),
                ttl: site.ttl,
                record_type,
                action: ChangeAction::Upsert,
                value: address.as_str().to_string(),
            })
            .collect();

        Self {
            hosted_zone_id: site.hosted_zone_id.clone(),
            comment: site.comment.clone(),
            changes,
        }
    }
}

/// Provider acknowledgement of a submitted change batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeInfo {
    /// Provider-assigned change id
    pub id: String,
    /// Provider-reported status (e.g. `PENDING`)
    pub status: String,
}

/// Trait for DNS provider implementations
///
/// This trait defines the interface for submitting a change batch.
/// Implementations must handle the specifics of each provider's API.
///
/// # Contract
///
/// - One remote call per invocation
/// - No retry or backoff
/// - Known provider rejections map to [`Error::ProviderApi`](crate::Error::ProviderApi);
///   credential problems to `Session` / `Authentication`; anything else to `Unknown`
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Submit a change batch
    ///
    /// # Parameters
    ///
    /// - `request`: The batch to submit
    ///
    /// # Returns
    ///
    /// - `Ok(ChangeInfo)`: The provider accepted the batch
    /// - `Err(Error)`: If the provider rejected the batch or could not be reached
    async fn change_record_sets(
        &self,
        request: &ChangeRequest,
    ) -> Result<ChangeInfo, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

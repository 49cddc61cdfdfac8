//! Record reconciler
//!
//! The Reconciler is responsible for:
//! - Building one upsert change batch per configured site
//! - Submitting each batch to the DnsProvider, one site at a time
//! - Deciding whether a provider rejection ends the run
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ SiteConfig  │──┐
//! └─────────────┘  │   ChangeRequest::for_site
//!                  ├──────────────────────────┐
//! ┌─────────────┐  │                          ▼
//! │ Resolved    │──┘                 ┌──────────────┐
//! │ Address     │                    │ Reconciler   │
//! └─────────────┘                    └──────────────┘
//!                                            │
//!                                            ▼
//!                                    ┌──────────────┐
//!                                    │ DnsProvider  │
//!                                    │ (submit)     │
//!                                    └──────────────┘
//! ```
//!
//! ## Error Flow
//!
//! 1. Provider API rejection (`Error::ProviderApi`): logged and skipped under
//!    [`ProviderErrorPolicy::Continue`], fatal under [`ProviderErrorPolicy::Abort`]
//! 2. Anything else: fatal, remaining sites are not submitted

use crate::config::{ProviderErrorPolicy, SiteConfig};
use crate::error::Result;
use crate::traits::{ChangeRequest, DnsProvider, ResolvedAddress};
use tracing::{debug, error, info};

/// Outcome of processing every configured site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The address pushed to every site
    pub address: ResolvedAddress,
    /// Sites whose change batch was accepted
    pub sites_updated: usize,
    /// Sites whose change batch was rejected and skipped
    pub sites_failed: usize,
}

/// Submits per-site change batches to a DNS provider
///
/// Sites are processed strictly in order; a site's remote call completes
/// before the next site's batch is built. Nothing is retried.
pub struct Reconciler {
    /// DNS provider for submitting change batches
    provider: Box<dyn DnsProvider>,

    /// Handling of categorized provider rejections
    policy: ProviderErrorPolicy,
}

impl Reconciler {
    /// Create a new reconciler
    pub fn new(provider: Box<dyn DnsProvider>, policy: ProviderErrorPolicy) -> Self {
        Self { provider, policy }
    }

    /// Build and submit the change batch for one site
    ///
    /// Returns the provider's error unchanged; policy is applied by
    /// [`Reconciler::reconcile_all`].
    pub async fn reconcile(&self, site: &SiteConfig, address: &ResolvedAddress) -> Result<()> {
        let request = ChangeRequest::for_site(site, address);

        info!(
            "Submitting {} {} change(s) to hosted zone {} via {}",
            request.changes.len(),
            site.record_type(),
            request.hosted_zone_id,
            self.provider.provider_name()
        );
        for change in &request.changes {
            debug!(
                "{} {} {} ttl={} -> {}",
                change.action, change.name, change.record_type, change.ttl, change.value
            );
        }

        let change_info = self.provider.change_record_sets(&request).await?;

        info!(
            "Hosted zone {} accepted change {} (status: {})",
            request.hosted_zone_id, change_info.id, change_info.status
        );
        Ok(())
    }

    /// Reconcile every site in configuration order
    ///
    /// # Returns
    ///
    /// - `Ok(RunSummary)`: Every site was submitted, or skipped under `Continue`
    /// - `Err(Error)`: First fatal error; later sites were not submitted
    pub async fn reconcile_all(
        &self,
        sites: &[SiteConfig],
        address: &ResolvedAddress,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary {
            address: address.clone(),
            sites_updated: 0,
            sites_failed: 0,
        };

        for site in sites {
            match self.reconcile(site, address).await {
                Ok(()) => summary.sites_updated += 1,
                Err(e) if e.is_provider_api() && self.policy == ProviderErrorPolicy::Continue => {
                    error!("Hosted zone {}: {}", site.hosted_zone_id, e);
                    summary.sites_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }
}

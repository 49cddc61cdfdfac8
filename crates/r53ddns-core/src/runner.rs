//! One-shot run orchestration
//!
//! Sequences the address lookup and the per-site reconciliation. The
//! binary wires concrete implementations in and maps the result to an exit
//! code; this function holds no process-level concerns.

use std::sync::Arc;

use tracing::info;

use crate::config::DdnsConfig;
use crate::error::Result;
use crate::lookup::resolve_address;
use crate::reconciler::{Reconciler, RunSummary};
use crate::traits::{DnsProvider, IpSource};

/// Resolve the public address and push it to every configured site
///
/// The provider is not touched until the address is available, so a
/// failed lookup never produces a provider call.
pub async fn run_once(
    config: &DdnsConfig,
    source: Arc<dyn IpSource>,
    provider: Box<dyn DnsProvider>,
) -> Result<RunSummary> {
    let address = resolve_address(source).await?;
    info!("Resolved public address: {}", address);

    let reconciler = Reconciler::new(provider, config.on_provider_error);
    let summary = reconciler.reconcile_all(&config.sites, &address).await?;

    info!("IP address successfully updated to: {}", summary.address);
    Ok(summary)
}

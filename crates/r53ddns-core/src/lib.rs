// # r53ddns-core
//
// Core library for the one-shot Route 53 dynamic-DNS updater.
//
// ## Architecture Overview
//
// This library provides the provider-independent part of an update run:
// - **DdnsConfig**: YAML configuration with defaults applied after parsing
// - **IpSource**: Trait for discovering the current public address
// - **DnsProvider**: Trait for submitting change batches via provider APIs
// - **Reconciler**: Builds one upsert batch per site and submits them in order
// - **run_once**: Lookup → reconcile sequencing used by the binary
//
// ## Run Flow
//
// 1. Load configuration once
// 2. Spawn the single address lookup and wait on its oneshot hand-off
// 3. Submit one change batch per site, sequentially
// 4. Report the resolved address

pub mod traits;
pub mod reconciler;
pub mod config;
pub mod error;
pub mod lookup;
pub mod runner;

// Re-export core types for convenience
pub use traits::{
    ChangeAction, ChangeInfo, ChangeRecord, ChangeRequest, DnsProvider, IpSource, RecordType,
    ResolvedAddress,
};
pub use reconciler::{Reconciler, RunSummary};
pub use config::{AwsConfig, DdnsConfig, ProviderErrorPolicy, SiteConfig};
pub use error::{Error, ProviderErrorKind, Result};
pub use runner::run_once;

//! Core traits for the updater
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the current public address
//! - [`DnsProvider`]: Submit record change batches via provider APIs

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, ResolvedAddress};
pub use dns_provider::{
    ChangeAction, ChangeInfo, ChangeRecord, ChangeRequest, DnsProvider, RecordType,
};

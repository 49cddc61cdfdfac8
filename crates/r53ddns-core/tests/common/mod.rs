//! Test doubles and common utilities for run contract tests
//!
//! This module provides minimal test doubles that record what the run
//! does without talking to any network service.

#![allow(dead_code)]

use r53ddns_core::config::{DdnsConfig, ProviderErrorPolicy, SiteConfig};
use r53ddns_core::error::{Error, Result};
use r53ddns_core::traits::{ChangeInfo, ChangeRequest, DnsProvider, IpSource, ResolvedAddress};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An IpSource that always reports the same address
pub struct StaticIpSource {
    address: &'static str,
    /// Call counter for current()
    current_call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(address: &'static str) -> Self {
        Self {
            address,
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }

    /// Create a new StaticIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            address: other.address,
            current_call_count: Arc::clone(&other.current_call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<ResolvedAddress> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(ResolvedAddress::new(self.address))
    }
}

/// An IpSource whose endpoint is unreachable
pub struct FailingIpSource;

#[async_trait::async_trait]
impl IpSource for FailingIpSource {
    async fn current(&self) -> Result<ResolvedAddress> {
        Err(Error::resolution("Error retrieving IP address: connection refused"))
    }
}

/// How a RecordingProvider answers a given hosted zone
#[derive(Clone, Copy)]
pub enum Answer {
    Accept,
    NoSuchHostedZone,
    InvalidChangeBatch,
    Session,
    Unknown,
}

/// A mock DnsProvider that records every submitted request
pub struct RecordingProvider {
    /// Submitted requests, in order
    requests: Arc<std::sync::Mutex<Vec<ChangeRequest>>>,
    /// Per-zone answers; zones not listed are accepted
    answers: Vec<(String, Answer)>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(std::sync::Mutex::new(Vec::new())),
            answers: Vec::new(),
        }
    }

    /// Answer requests for `zone` with `answer`
    pub fn answering(mut self, zone: &str, answer: Answer) -> Self {
        self.answers.push((zone.to_string(), answer));
        self
    }

    /// Get the number of times change_record_sets() was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Get the submitted requests
    pub fn requests(&self) -> Vec<ChangeRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Create a new RecordingProvider that shares its request log with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            requests: Arc::clone(&other.requests),
            answers: other.answers.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn change_record_sets(&self, request: &ChangeRequest) -> Result<ChangeInfo> {
        self.requests.lock().unwrap().push(request.clone());

        let answer = self
            .answers
            .iter()
            .find(|(zone, _)| *zone == request.hosted_zone_id)
            .map(|(_, answer)| *answer)
            .unwrap_or(Answer::Accept);

        match answer {
            Answer::Accept => Ok(ChangeInfo {
                id: "/change/C0000000000000".to_string(),
                status: "PENDING".to_string(),
            }),
            Answer::NoSuchHostedZone => Err(Error::provider_api(
                r53ddns_core::ProviderErrorKind::NoSuchHostedZone,
                format!("No hosted zone found with ID: {}", request.hosted_zone_id),
            )),
            Answer::InvalidChangeBatch => Err(Error::provider_api(
                r53ddns_core::ProviderErrorKind::InvalidChangeBatch,
                "Invalid change batch",
            )),
            Answer::Session => Err(Error::session("No credentials available")),
            Answer::Unknown => Err(Error::unknown("dispatch failure: connection reset")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Helper to create a configuration for the given sites
pub fn config_with_sites(sites: Vec<SiteConfig>, policy: ProviderErrorPolicy) -> DdnsConfig {
    let mut config = DdnsConfig {
        sites,
        on_provider_error: policy,
        ..DdnsConfig::default()
    };
    config.normalize();
    config
}

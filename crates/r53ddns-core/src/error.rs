//! Error types for the updater
//!
//! This module defines all error types used throughout the crate.

use std::fmt;
use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Address discovery endpoint unreachable or response unreadable
    #[error("Address resolution error: {0}")]
    Resolution(String),

    /// Provider session could not be established
    #[error("Provider session error: {0}")]
    Session(String),

    /// Provider rejected the credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Structured error returned by the DNS provider API
    #[error("{kind}: {message}")]
    ProviderApi {
        /// Provider error category
        kind: ProviderErrorKind,
        /// Provider supplied message
        message: String,
    },

    /// Anything not covered above (transport failures, unrecognized provider errors)
    #[error("{0}")]
    Unknown(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an address resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a provider API error
    pub fn provider_api(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self::ProviderApi {
            kind,
            message: message.into(),
        }
    }

    /// Create an unknown error
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// Whether this is a categorized provider API error
    ///
    /// Only these errors are subject to [`ProviderErrorPolicy`](crate::config::ProviderErrorPolicy).
    /// Everything else always aborts the run.
    pub fn is_provider_api(&self) -> bool {
        matches!(self, Self::ProviderApi { .. })
    }

    /// Whether this error originates from loading configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Known DNS provider API error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// The hosted zone does not exist
    NoSuchHostedZone,
    /// A referenced health check does not exist
    NoSuchHealthCheck,
    /// The change batch was rejected
    InvalidChangeBatch,
    /// The request input was invalid
    InvalidInput,
    /// An earlier change for the same zone is still in progress
    PriorRequestNotComplete,
}

impl ProviderErrorKind {
    /// All known categories
    pub const ALL: [ProviderErrorKind; 5] = [
        ProviderErrorKind::NoSuchHostedZone,
        ProviderErrorKind::NoSuchHealthCheck,
        ProviderErrorKind::InvalidChangeBatch,
        ProviderErrorKind::InvalidInput,
        ProviderErrorKind::PriorRequestNotComplete,
    ];

    /// The provider's wire error code
    pub fn code(&self) -> &'static str {
        match self {
            ProviderErrorKind::NoSuchHostedZone => "NoSuchHostedZone",
            ProviderErrorKind::NoSuchHealthCheck => "NoSuchHealthCheck",
            ProviderErrorKind::InvalidChangeBatch => "InvalidChangeBatch",
            ProviderErrorKind::InvalidInput => "InvalidInput",
            ProviderErrorKind::PriorRequestNotComplete => "PriorRequestNotComplete",
        }
    }

    /// Look up a category by wire error code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Unknown(err.to_string())
    }
}

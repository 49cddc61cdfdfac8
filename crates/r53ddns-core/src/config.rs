//! Configuration types for the updater
//!
//! The configuration is a single YAML document read once at start-up.
//! After decoding, [`DdnsConfig::normalize`] fills in the defaults; the
//! result is never mutated again.

use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::traits::RecordType;

/// Address discovery endpoint used when none is configured
pub const DEFAULT_IP_ADDRESS_HOST: &str = "https://api.ipify.org";

/// TTL applied to sites configured with a zero TTL
pub const DEFAULT_TTL: i64 = 300;

/// Change batch comment applied to sites configured without one
pub const DEFAULT_COMMENT: &str = "AWS Route53 DDNS Client";

/// Decode a key left empty (`ttl:`) the same way as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DdnsConfig {
    /// URL of the "what is my IP" service
    #[serde(default, deserialize_with = "null_as_default")]
    pub get_ip_address_host: String,

    /// Optional request timeout for the address lookup, in seconds
    #[serde(default)]
    pub lookup_timeout_secs: Option<u64>,

    /// What to do when the provider rejects a site's change batch
    #[serde(default, deserialize_with = "null_as_default")]
    pub on_provider_error: ProviderErrorPolicy,

    /// Append log output to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// AWS credential selection
    #[serde(default, deserialize_with = "null_as_default")]
    pub aws: AwsConfig,

    /// Sites to update, in order
    #[serde(default, deserialize_with = "null_as_default")]
    pub sites: Vec<SiteConfig>,
}

impl DdnsConfig {
    /// Load and normalize a configuration file
    ///
    /// Fails with [`Error::Config`] when the file cannot be read or is not
    /// a structurally valid document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Error reading configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&contents).map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse and normalize a configuration document held in memory
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        // An empty document decodes to `null`; treat it as all defaults.
        let mut config: DdnsConfig = if contents.trim().is_empty() {
            DdnsConfig::default()
        } else {
            serde_yaml::from_str(contents)
                .map_err(|e| Error::config(format!("Error decoding configuration YAML: {}", e)))?
        };

        config.normalize();
        Ok(config)
    }

    /// Fill in defaults for empty or zero fields
    pub fn normalize(&mut self) {
        if self.get_ip_address_host.is_empty() {
            self.get_ip_address_host = DEFAULT_IP_ADDRESS_HOST.to_string();
        }

        for site in &mut self.sites {
            site.normalize();
        }
    }

    /// Log configuration problems the provider will reject later
    ///
    /// Nothing is rejected here: a site with an empty zone id or no record
    /// names is still submitted.
    pub fn warn_suspicious(&self) {
        if self.sites.is_empty() {
            tracing::warn!("No sites configured, nothing will be updated");
        }

        for (index, site) in self.sites.iter().enumerate() {
            if site.hosted_zone_id.is_empty() {
                tracing::warn!("Site #{} has an empty hosted_zone_id", index);
            }
            if site.record_names.is_empty() {
                tracing::warn!("Site #{} ({}) has no record_names", index, site.hosted_zone_id);
            }
        }
    }
}

/// Handling of categorized provider API errors
///
/// Provider API errors (no such zone, invalid change batch, ...) are either
/// logged and skipped or treated as fatal. All other errors are always fatal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderErrorPolicy {
    /// Stop at the first provider API error
    #[default]
    Abort,
    /// Log the error and continue with the next site
    Continue,
}

/// AWS credential selection
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsConfig {
    /// Named profile in the shared credentials file
    #[serde(default)]
    pub profile: Option<String>,

    /// Credentials file to read instead of the default location
    #[serde(default)]
    pub credentials_file: Option<PathBuf>,
}

/// One hosted zone and the records to point at the current address
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SiteConfig {
    /// Route 53 hosted zone id
    #[serde(default, deserialize_with = "null_as_default")]
    pub hosted_zone_id: String,

    /// Record TTL in seconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub ttl: i64,

    /// Publish AAAA records instead of A records
    #[serde(default, deserialize_with = "null_as_default")]
    pub ipv6: bool,

    /// Change batch comment
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,

    /// Fully-qualified record names
    #[serde(default, deserialize_with = "null_as_default")]
    pub record_names: Vec<String>,
}

impl SiteConfig {
    /// Create a site for the given zone with default settings
    pub fn new(hosted_zone_id: impl Into<String>) -> Self {
        Self {
            hosted_zone_id: hosted_zone_id.into(),
            ttl: DEFAULT_TTL,
            ipv6: false,
            comment: DEFAULT_COMMENT.to_string(),
            record_names: Vec::new(),
        }
    }

    /// Add a record name
    pub fn with_record(mut self, name: impl Into<String>) -> Self {
        self.record_names.push(name.into());
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = ttl;
        self
    }

    /// Publish AAAA records
    pub fn with_ipv6(mut self, ipv6: bool) -> Self {
        self.ipv6 = ipv6;
        self
    }

    /// Set the change comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Record type derived from the address family flag
    pub fn record_type(&self) -> RecordType {
        if self.ipv6 { RecordType::Aaaa } else { RecordType::A }
    }

    fn normalize(&mut self) {
        if self.ttl == 0 {
            self.ttl = DEFAULT_TTL;
        }

        if self.comment.is_empty() {
            self.comment = DEFAULT_COMMENT.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_endpoint_gets_default() {
        let config = DdnsConfig::from_yaml_str("sites: []").unwrap();
        assert_eq!(config.get_ip_address_host, DEFAULT_IP_ADDRESS_HOST);

        let config = DdnsConfig::from_yaml_str("get_ip_address_host: \"\"").unwrap();
        assert_eq!(config.get_ip_address_host, DEFAULT_IP_ADDRESS_HOST);
    }

    #[test]
    fn configured_endpoint_is_kept() {
        let config =
            DdnsConfig::from_yaml_str("get_ip_address_host: https://icanhazip.com").unwrap();
        assert_eq!(config.get_ip_address_host, "https://icanhazip.com");
    }

    #[test]
    fn site_defaults_applied() {
        let yaml = r#"
sites:
  - hosted_zone_id: Z123
    ttl: 0
    record_names: [home.example.com]
  - hosted_zone_id: Z456
    comment: ""
    record_names: [a.example.org]
  - hosted_zone_id: Z789
    ttl: 60
    ipv6: true
    comment: office
    record_names: [office.example.net, vpn.example.net]
"#;
        let config = DdnsConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.sites.len(), 3);
        assert_eq!(config.sites[0].ttl, DEFAULT_TTL);
        assert_eq!(config.sites[0].comment, DEFAULT_COMMENT);
        assert!(!config.sites[0].ipv6);
        assert_eq!(config.sites[1].ttl, DEFAULT_TTL);
        assert_eq!(config.sites[1].comment, DEFAULT_COMMENT);

        let site = &config.sites[2];
        assert_eq!(site.ttl, 60);
        assert_eq!(site.comment, "office");
        assert_eq!(site.record_type(), RecordType::Aaaa);
        assert_eq!(site.record_names, vec!["office.example.net", "vpn.example.net"]);
    }

    #[test]
    fn empty_values_read_as_absent() {
        let yaml = r#"
get_ip_address_host:
on_provider_error:
aws:
sites:
  - hosted_zone_id: Z1
    ttl:
    ipv6:
    comment:
    record_names: [a.example.com]
  - hosted_zone_id:
    record_names:
"#;
        let config = DdnsConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.get_ip_address_host, DEFAULT_IP_ADDRESS_HOST);
        assert_eq!(config.on_provider_error, ProviderErrorPolicy::Abort);
        assert!(config.aws.profile.is_none());

        let site = &config.sites[0];
        assert_eq!(site.ttl, DEFAULT_TTL);
        assert!(!site.ipv6);
        assert_eq!(site.comment, DEFAULT_COMMENT);
        assert_eq!(site.record_names, vec!["a.example.com"]);

        assert_eq!(config.sites[1].hosted_zone_id, "");
        assert!(config.sites[1].record_names.is_empty());
    }

    #[test]
    fn missing_required_fields_pass_through() {
        let config = DdnsConfig::from_yaml_str("sites:\n  - ttl: 30\n").unwrap();
        assert_eq!(config.sites[0].hosted_zone_id, "");
        assert!(config.sites[0].record_names.is_empty());
    }

    #[test]
    fn policy_and_aws_settings_decode() {
        let yaml = r#"
on_provider_error: continue
log_file: /var/log/r53ddns.log
lookup_timeout_secs: 5
aws:
  profile: ddns
  credentials_file: conf/aws_credentials.ini
"#;
        let config = DdnsConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.on_provider_error, ProviderErrorPolicy::Continue);
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/r53ddns.log")));
        assert_eq!(config.lookup_timeout_secs, Some(5));
        assert_eq!(config.aws.profile.as_deref(), Some("ddns"));
        assert_eq!(
            config.aws.credentials_file,
            Some(PathBuf::from("conf/aws_credentials.ini"))
        );
    }

    #[test]
    fn policy_defaults_to_abort() {
        let config = DdnsConfig::from_yaml_str("").unwrap();
        assert_eq!(config.on_provider_error, ProviderErrorPolicy::Abort);
        assert!(config.sites.is_empty());
    }

    #[test]
    fn malformed_yaml_is_config_error() {
        let err = DdnsConfig::from_yaml_str("sites: [unterminated").unwrap_err();
        assert!(err.is_config());

        let err = DdnsConfig::from_yaml_str("sites:\n  - ttl: not-a-number\n").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "sites:\n  - hosted_zone_id: Z123\n    record_names: [home.example.com]"
        )
        .unwrap();

        let config = DdnsConfig::load(file.path()).unwrap();
        assert_eq!(config.sites[0].hosted_zone_id, "Z123");
        assert_eq!(config.sites[0].ttl, DEFAULT_TTL);
    }

    #[test]
    fn example_configuration_parses() {
        let config = DdnsConfig::from_yaml_str(include_str!(
            "../../../conf/configuration.example.yaml"
        ))
        .unwrap();
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].record_names.len(), 2);
        assert_eq!(config.on_provider_error, ProviderErrorPolicy::Abort);
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DdnsConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("missing.yaml"));
    }
}

// # Route 53 DNS Provider
//
// This crate provides the AWS Route 53 DNS provider for the updater.
//
// ## Behavior
//
// - One `ChangeResourceRecordSets` call per change batch
// - Region pinned to `us-east-1` (Route 53 is a global service served there)
// - Credentials from the ambient AWS chain, optionally narrowed to a named
//   profile and/or an explicit credentials file
// - The session is established lazily, on the first submitted batch, and
//   reused for the rest of the run
// - NO retry logic, NO backoff, NO diffing against existing records
//
// ## Error Classification
//
// | Route 53 response | Error |
// |-------------------|-------|
// | NoSuchHostedZone, NoSuchHealthCheck, InvalidChangeBatch, InvalidInput, PriorRequestNotComplete | `Error::ProviderApi` |
// | AccessDenied, InvalidClientTokenId, SignatureDoesNotMatch, ExpiredToken, ... | `Error::Authentication` |
// | No credentials resolvable | `Error::Session` |
// | Anything else (transport, timeouts, unmodeled errors) | `Error::Unknown` |
//
// ## Dry-Run Mode
//
// In dry-run mode the provider logs the batch it would submit and returns
// success without resolving credentials or contacting AWS.

use async_trait::async_trait;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_route53::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::operation::change_resource_record_sets::ChangeResourceRecordSetsError;
use aws_sdk_route53::types::{self as r53, RrType};
use r53ddns_core::config::AwsConfig;
use r53ddns_core::traits::{ChangeAction, ChangeInfo, ChangeRecord, ChangeRequest, DnsProvider, RecordType};
use r53ddns_core::{Error, ProviderErrorKind, Result};
use tokio::sync::OnceCell;

/// Region all Route 53 API calls are sent to
pub const ROUTE53_REGION: &str = "us-east-1";

/// Error codes Route 53 / STS use for rejected credentials
const AUTH_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "AccessDeniedException",
    "ExpiredToken",
    "IncompleteSignature",
    "InvalidClientTokenId",
    "MissingAuthenticationToken",
    "SignatureDoesNotMatch",
    "UnrecognizedClientException",
];

/// Route 53 DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Log the intended change batch
/// - **NOT** resolve credentials or call the Route 53 API
pub struct Route53Provider {
    /// Credential selection
    aws: AwsConfig,

    /// Route 53 client, created on first use
    client: OnceCell<aws_sdk_route53::Client>,

    /// Dry-run mode: if true, log batches but never submit them
    dry_run: bool,
}

// Custom Debug implementation that leaves out the client and its credentials
impl std::fmt::Debug for Route53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Provider")
            .field("profile", &self.aws.profile)
            .field("credentials_file", &self.aws.credentials_file)
            .field("connected", &self.client.initialized())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl Route53Provider {
    /// Create a new Route 53 provider
    ///
    /// # Parameters
    ///
    /// - `aws`: Profile / credentials file selection (empty = ambient chain)
    /// - `dry_run`: If true, log change batches instead of submitting them
    pub fn new(aws: AwsConfig, dry_run: bool) -> Self {
        Self {
            aws,
            client: OnceCell::new(),
            dry_run,
        }
    }

    /// Create a new Route 53 provider (production/live mode)
    pub fn new_live(aws: AwsConfig) -> Self {
        Self::new(aws, false)
    }

    /// Create a new Route 53 provider (dry-run mode)
    pub fn new_dry_run(aws: AwsConfig) -> Self {
        Self::new(aws, true)
    }

    /// Whether the provider is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get the Route 53 client, establishing the session on first use
    async fn client(&self) -> Result<&aws_sdk_route53::Client> {
        self.client.get_or_try_init(|| connect(&self.aws)).await
    }
}

/// Load AWS configuration and verify credentials can be resolved
///
/// Credentials are resolved eagerly so that a missing or broken profile
/// surfaces as a session error rather than as a failed API call.
async fn connect(aws: &AwsConfig) -> Result<aws_sdk_route53::Client> {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(ROUTE53_REGION));

    if let Some(profile) = &aws.profile {
        tracing::debug!("Using AWS profile: {}", profile);
        loader = loader.profile_name(profile);
    }

    if let Some(path) = &aws.credentials_file {
        tracing::debug!("Using AWS credentials file: {}", path.display());
        let files = ProfileFiles::builder()
            .with_file(ProfileFileKind::Credentials, path)
            .include_default_config_file(true)
            .build();
        loader = loader.profile_files(files);
    }

    let sdk_config = loader.load().await;

    let credentials = sdk_config
        .credentials_provider()
        .ok_or_else(|| Error::session("No AWS credentials provider configured"))?;

    credentials.provide_credentials().await.map_err(|e| {
        Error::session(format!(
            "Error loading AWS credentials: {}",
            DisplayErrorContext(&e)
        ))
    })?;

    Ok(aws_sdk_route53::Client::new(&sdk_config))
}

/// Translate a change batch into the Route 53 request shape
fn to_change_batch(request: &ChangeRequest) -> Result<r53::ChangeBatch> {
    let changes = request
        .changes
        .iter()
        .map(to_change)
        .collect::<Result<Vec<_>>>()?;

    r53::ChangeBatch::builder()
        .set_changes(Some(changes))
        .comment(&request.comment)
        .build()
        .map_err(|e| Error::unknown(format!("Failed to build change batch: {}", e)))
}

fn to_change(record: &ChangeRecord) -> Result<r53::Change> {
    let build_err = |e: aws_sdk_route53::error::BuildError| {
        Error::unknown(format!("Failed to build change for {}: {}", record.name, e))
    };

    let value = r53::ResourceRecord::builder()
        .value(&record.value)
        .build()
        .map_err(build_err)?;

    let record_set = r53::ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(rr_type(record.record_type))
        .ttl(record.ttl)
        .resource_records(value)
        .build()
        .map_err(build_err)?;

    r53::Change::builder()
        .action(change_action(record.action))
        .resource_record_set(record_set)
        .build()
        .map_err(build_err)
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Aaaa => RrType::Aaaa,
    }
}

fn change_action(action: ChangeAction) -> r53::ChangeAction {
    match action {
        ChangeAction::Upsert => r53::ChangeAction::Upsert,
    }
}

/// JSON rendering of a change batch, in Route 53 request layout
pub fn request_payload(request: &ChangeRequest) -> serde_json::Value {
    let changes: Vec<serde_json::Value> = request
        .changes
        .iter()
        .map(|change| {
            serde_json::json!({
                "Action": change.action.as_str(),
                "ResourceRecordSet": {
                    "Name": change.name,
                    "Type": change.record_type.as_str(),
                    "TTL": change.ttl,
                    "ResourceRecords": [{ "Value": change.value }],
                },
            })
        })
        .collect();

    serde_json::json!({
        "HostedZoneId": request.hosted_zone_id,
        "ChangeBatch": {
            "Comment": request.comment,
            "Changes": changes,
        },
    })
}

/// Category and message of a modeled Route 53 error
///
/// The modeled shapes carry their own message; it is preferred over the
/// one in the response metadata.
fn modeled_error(
    err: &ChangeResourceRecordSetsError,
) -> Option<(ProviderErrorKind, Option<&str>)> {
    use ChangeResourceRecordSetsError as E;

    match err {
        E::NoSuchHostedZone(e) => Some((ProviderErrorKind::NoSuchHostedZone, e.message())),
        E::NoSuchHealthCheck(e) => Some((ProviderErrorKind::NoSuchHealthCheck, e.message())),
        E::InvalidChangeBatch(e) => Some((ProviderErrorKind::InvalidChangeBatch, e.message())),
        E::InvalidInput(e) => Some((ProviderErrorKind::InvalidInput, e.message())),
        E::PriorRequestNotComplete(e) => {
            Some((ProviderErrorKind::PriorRequestNotComplete, e.message()))
        }
        _ => None,
    }
}

/// Map a Route 53 SDK failure onto the updater's error taxonomy
fn classify<R>(err: SdkError<ChangeResourceRecordSetsError, R>) -> Error
where
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service_err) => {
            let err = service_err.into_err();

            let (kind, modeled_message) = match modeled_error(&err) {
                Some((kind, message)) => (Some(kind), message),
                None => (err.code().and_then(ProviderErrorKind::from_code), None),
            };
            let message = modeled_message
                .or_else(|| err.message())
                .unwrap_or("no error message")
                .to_string();

            if let Some(kind) = kind {
                return Error::provider_api(kind, message);
            }

            match err.code() {
                Some(code) if AUTH_ERROR_CODES.contains(&code) => {
                    Error::auth(format!("{}: {}", code, message))
                }
                _ => Error::unknown(DisplayErrorContext(&err).to_string()),
            }
        }
        other => Error::unknown(DisplayErrorContext(&other).to_string()),
    }
}

#[async_trait]
impl DnsProvider for Route53Provider {
    /// Submit a change batch to Route 53
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /2013-04-01/hostedzone/{Id}/rrset
    /// <ChangeResourceRecordSetsRequest>
    ///   <ChangeBatch> ... UPSERT ... </ChangeBatch>
    /// </ChangeResourceRecordSetsRequest>
    /// ```
    async fn change_record_sets(&self, request: &ChangeRequest) -> Result<ChangeInfo> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send ChangeResourceRecordSets with payload: {}",
                request_payload(request)
            );
            return Ok(ChangeInfo {
                id: "dry-run".to_string(),
                status: "DRY-RUN".to_string(),
            });
        }

        let batch = to_change_batch(request)?;
        let client = self.client().await?;

        let output = client
            .change_resource_record_sets()
            .hosted_zone_id(&request.hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(classify)?;

        let info = output
            .change_info()
            .map(|info| ChangeInfo {
                id: info.id().to_string(),
                status: info.status().as_str().to_string(),
            })
            .unwrap_or_else(|| ChangeInfo {
                id: "unknown".to_string(),
                status: "UNKNOWN".to_string(),
            });

        Ok(info)
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

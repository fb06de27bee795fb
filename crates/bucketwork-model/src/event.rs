//! The bucket request envelope.
//!
//! A [`BucketEvent`] is decoded from every inbound message, validated, mutated
//! by the lifecycle operation (the bucket URI after a create, the error
//! message after a failure) and serialized back onto the bus as the reply.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::grant::GranteeSpec;

/// Request and reply envelope for one bucket lifecycle operation.
///
/// The four datacenter/bucket keys without `#[serde(default)]` must be present
/// in the payload (they may be empty; [`BucketEvent::validate`] reports that).
/// Everything else defaults when absent.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEvent {
    /// Correlation id assigned by the orchestrator.
    #[serde(rename = "_uuid", default)]
    pub uuid: String,
    /// Batch id assigned by the orchestrator.
    #[serde(rename = "_batch_id", default)]
    pub batch_id: String,
    /// Provider type tag, passed through untouched.
    #[serde(rename = "_type", default)]
    pub provider_type: String,
    /// Optional human readable datacenter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter_name: Option<String>,
    /// Region the bucket lives in.
    pub datacenter_region: String,
    /// Credential half used as the secret access key.
    pub datacenter_token: String,
    /// Credential half used as the access key id.
    pub datacenter_secret: String,
    /// Bucket name.
    pub name: String,
    /// Canned ACL policy name (e.g. `private`, `public-read`).
    #[serde(default)]
    pub acl: String,
    /// Location constraint passed on bucket creation.
    #[serde(default)]
    pub bucket_location: String,
    /// Location reported by the provider once the bucket has been created.
    #[serde(default)]
    pub bucket_uri: String,
    /// Explicit access grants, in request order.
    #[serde(default)]
    pub grantees: Vec<GranteeSpec>,
    /// Failure message; present only on error replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BucketEvent {
    /// Decode an envelope from a raw message payload.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the payload is malformed or lacks one of the
    /// required keys.
    pub fn from_slice(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    /// Encode the envelope for publishing.
    ///
    /// # Errors
    ///
    /// Propagates the serializer error. The envelope only holds strings and
    /// lists of strings, so this does not fail in practice.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Check that every field a provider call needs is present.
    ///
    /// Rules are checked in order and the first failure wins: region,
    /// credentials, bucket name, then each grantee's type tag.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first rule that fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.datacenter_region.is_empty() {
            return Err(ValidationError::InvalidRegion);
        }

        if self.datacenter_secret.is_empty() || self.datacenter_token.is_empty() {
            return Err(ValidationError::InvalidCredentials);
        }

        if self.name.is_empty() {
            return Err(ValidationError::InvalidBucketName);
        }

        for grantee in &self.grantees {
            grantee.grantee_kind()?;
        }

        Ok(())
    }

    /// The bucket an ACL update is addressed to.
    ///
    /// Uses the bucket named by `bucket_uri` once a create has recorded one,
    /// and falls back to `name` otherwise.
    #[must_use]
    pub fn acl_target(&self) -> &str {
        location_bucket(&self.bucket_uri).unwrap_or(&self.name)
    }

    /// Record a failure message on the envelope.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

// Credentials must not end up in logs.
impl fmt::Debug for BucketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketEvent")
            .field("uuid", &self.uuid)
            .field("batch_id", &self.batch_id)
            .field("provider_type", &self.provider_type)
            .field("datacenter_name", &self.datacenter_name)
            .field("datacenter_region", &self.datacenter_region)
            .field("datacenter_token", &redact(&self.datacenter_token))
            .field("datacenter_secret", &redact(&self.datacenter_secret))
            .field("name", &self.name)
            .field("acl", &self.acl)
            .field("bucket_location", &self.bucket_location)
            .field("bucket_uri", &self.bucket_uri)
            .field("grantees", &self.grantees)
            .field("error", &self.error)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "***" }
}

/// Extract the bucket name from a location returned by a create call.
///
/// Handles the path form (`/my-bucket`) and the virtual-hosted form
/// (`http://my-bucket.s3.amazonaws.com/`). Bucket names may contain dots, so
/// the host is cut at the last `.s3.` or `.s3-` marker. Returns `None` for
/// anything else, including an empty location.
#[must_use]
pub fn location_bucket(location: &str) -> Option<&str> {
    let location = location.trim();

    if let Some(rest) = location
        .strip_prefix("https://")
        .or_else(|| location.strip_prefix("http://"))
    {
        let host = rest.split('/').next().unwrap_or_default();
        let end = [host.rfind(".s3."), host.rfind(".s3-")]
            .into_iter()
            .flatten()
            .max()?;
        return (end > 0).then(|| &host[..end]);
    }

    let path = location.strip_prefix('/')?.trim_end_matches('/');
    (!path.is_empty() && !path.contains('/')).then_some(path)
}

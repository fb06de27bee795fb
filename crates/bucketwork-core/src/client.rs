//! Storage provider client abstraction.
//!
//! [`BucketClient`] is the set of provider calls the lifecycle needs, and
//! [`ClientFactory`] builds a fresh, region-scoped client from the credentials
//! carried by a request. The production implementation lives in
//! [`crate::aws`]; tests substitute a scripted one.

use async_trait::async_trait;
use aws_sdk_s3::types::Grant;
use bucketwork_model::BucketEvent;

use crate::error::ProviderError;

/// Region and static credentials for one request.
#[derive(Clone, Copy)]
pub struct DatacenterCredentials<'a> {
    /// Region the client is scoped to.
    pub region: &'a str,
    /// Access key id.
    pub access_key_id: &'a str,
    /// Secret access key.
    pub secret_access_key: &'a str,
}

impl<'a> DatacenterCredentials<'a> {
    /// Borrow the datacenter fields of an envelope.
    ///
    /// The orchestrator sends the access key id as `datacenter_secret` and the
    /// secret access key as `datacenter_token`.
    #[must_use]
    pub fn from_event(event: &'a BucketEvent) -> Self {
        Self {
            region: &event.datacenter_region,
            access_key_id: &event.datacenter_secret,
            secret_access_key: &event.datacenter_token,
        }
    }
}

impl std::fmt::Debug for DatacenterCredentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatacenterCredentials")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Provider calls used by the bucket lifecycle.
///
/// Errors are returned as reported by the provider; implementations do not
/// retry beyond what the underlying SDK does on its own.
#[async_trait]
pub trait BucketClient: Send + Sync {
    /// Create a bucket. `acl` and `location` are omitted from the request when
    /// empty. Returns the location reported by the provider, if any.
    async fn create_bucket(
        &self,
        name: &str,
        acl: &str,
        location: &str,
    ) -> Result<Option<String>, ProviderError>;

    /// Block until the bucket is visible, bounded by the client's timeout.
    async fn wait_until_exists(&self, name: &str) -> Result<(), ProviderError>;

    /// Replace the bucket's ACL with a canned ACL and/or explicit grants.
    /// An empty `acl` is omitted from the request.
    async fn put_bucket_acl(
        &self,
        bucket: &str,
        acl: &str,
        grants: Vec<Grant>,
    ) -> Result<(), ProviderError>;

    /// Delete a bucket.
    async fn delete_bucket(&self, name: &str) -> Result<(), ProviderError>;
}

/// Builds a provider client per operation invocation.
pub trait ClientFactory: Send + Sync {
    /// The client type produced.
    type Client: BucketClient;

    /// Build a client authenticated with `credentials` and scoped to their region.
    fn client(&self, credentials: DatacenterCredentials<'_>) -> Self::Client;
}

//! AWS S3 implementation of the provider client.
//!
//! [`S3ClientFactory`] holds only immutable settings (optional endpoint
//! override, path-style addressing, waiter timeout). Every call to
//! [`ClientFactory::client`] builds a new [`aws_sdk_s3::Client`] from the
//! request's static credentials; nothing is cached between requests.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::client::Waiters;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{
    AccessControlPolicy, BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration,
    Grant,
};
use tracing::debug;

use crate::client::{BucketClient, ClientFactory, DatacenterCredentials};
use crate::error::ProviderError;

/// Provider name attached to the static credentials.
const CREDENTIALS_PROVIDER: &str = "bucketwork";

/// Builds S3 clients from per-request credentials.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use bucketwork_core::S3ClientFactory;
///
/// let factory = S3ClientFactory::new(Duration::from_secs(30))
///     .with_endpoint_url("http://localhost:4566")
///     .with_force_path_style(true);
/// assert_eq!(factory.wait_timeout(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct S3ClientFactory {
    endpoint_url: Option<String>,
    force_path_style: bool,
    wait_timeout: Duration,
}

impl S3ClientFactory {
    /// Create a factory targeting the provider's default endpoints.
    #[must_use]
    pub fn new(wait_timeout: Duration) -> Self {
        Self {
            endpoint_url: None,
            force_path_style: false,
            wait_timeout,
        }
    }

    /// Send requests to an S3-compatible endpoint instead of AWS.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Use path-style bucket addressing.
    #[must_use]
    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Upper bound for the post-create existence wait.
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }
}

impl ClientFactory for S3ClientFactory {
    type Client = S3BucketClient;

    fn client(&self, credentials: DatacenterCredentials<'_>) -> S3BucketClient {
        let creds = Credentials::new(
            credentials.access_key_id,
            credentials.secret_access_key,
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(credentials.region.to_owned()))
            .credentials_provider(creds)
            .force_path_style(self.force_path_style);
        if let Some(url) = &self.endpoint_url {
            builder = builder.endpoint_url(url);
        }

        S3BucketClient {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            wait_timeout: self.wait_timeout,
        }
    }
}

/// A region-scoped S3 client for a single operation.
#[derive(Debug, Clone)]
pub struct S3BucketClient {
    client: aws_sdk_s3::Client,
    wait_timeout: Duration,
}

#[async_trait]
impl BucketClient for S3BucketClient {
    async fn create_bucket(
        &self,
        name: &str,
        acl: &str,
        location: &str,
    ) -> Result<Option<String>, ProviderError> {
        let mut req = self.client.create_bucket().bucket(name);
        if !acl.is_empty() {
            req = req.acl(BucketCannedAcl::from(acl));
        }
        if !location.is_empty() {
            req = req.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(location))
                    .build(),
            );
        }

        let output = req.send().await.map_err(|e| ProviderError::CreateBucket {
            message: DisplayErrorContext(e).to_string(),
        })?;

        debug!(bucket = %name, location = ?output.location(), "create_bucket completed");
        Ok(output.location().map(ToOwned::to_owned))
    }

    async fn wait_until_exists(&self, name: &str) -> Result<(), ProviderError> {
        self.client
            .wait_until_bucket_exists()
            .bucket(name)
            .wait(self.wait_timeout)
            .await
            .map_err(|e| ProviderError::WaitForBucket {
                message: DisplayErrorContext(e).to_string(),
            })?;

        debug!(bucket = %name, "bucket exists");
        Ok(())
    }

    async fn put_bucket_acl(
        &self,
        bucket: &str,
        acl: &str,
        grants: Vec<Grant>,
    ) -> Result<(), ProviderError> {
        let mut req = self.client.put_bucket_acl().bucket(bucket);
        if !acl.is_empty() {
            req = req.acl(BucketCannedAcl::from(acl));
        }

        if !grants.is_empty() {
            // An access control policy must name the bucket owner.
            let current = self
                .client
                .get_bucket_acl()
                .bucket(bucket)
                .send()
                .await
                .map_err(|e| ProviderError::PutBucketAcl {
                    message: DisplayErrorContext(e).to_string(),
                })?;

            req = req.access_control_policy(
                AccessControlPolicy::builder()
                    .set_owner(current.owner().cloned())
                    .set_grants(Some(grants))
                    .build(),
            );
        }

        req.send().await.map_err(|e| ProviderError::PutBucketAcl {
            message: DisplayErrorContext(e).to_string(),
        })?;

        debug!(bucket = %bucket, acl = %acl, "put_bucket_acl completed");
        Ok(())
    }

    async fn delete_bucket(&self, name: &str) -> Result<(), ProviderError> {
        self.client
            .delete_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(|e| ProviderError::DeleteBucket {
                message: DisplayErrorContext(e).to_string(),
            })?;

        debug!(bucket = %name, "delete_bucket completed");
        Ok(())
    }
}

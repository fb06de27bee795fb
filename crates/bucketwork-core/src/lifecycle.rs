//! Bucket lifecycle operations.
//!
//! Create is a three step protocol: create the bucket, wait until the provider
//! reports it as existing, then apply the requested ACL through [`update`].
//! The first failing step aborts the operation and its error is returned as
//! is. Nothing is retried and a partially created bucket is left in place.
//!
//! [`update`]: BucketLifecycle::update

use bucketwork_model::{BucketEvent, BucketOperation};
use tracing::debug;

use crate::client::{BucketClient, ClientFactory, DatacenterCredentials};
use crate::error::WorkerResult;
use crate::grants::translate_grants;

/// Canned ACL applied when a request carries neither an ACL nor grants.
pub const DEFAULT_CANNED_ACL: &str = "private";

/// Runs lifecycle operations against clients built by a [`ClientFactory`].
#[derive(Debug, Clone)]
pub struct BucketLifecycle<F> {
    factory: F,
}

impl<F: ClientFactory> BucketLifecycle<F> {
    /// Create a lifecycle runner.
    #[must_use]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Returns the client factory.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Run `op` for a validated envelope.
    pub async fn run(&self, op: BucketOperation, event: &mut BucketEvent) -> WorkerResult<()> {
        match op {
            BucketOperation::Create => self.create(event).await,
            BucketOperation::Update => self.update(event).await,
            BucketOperation::Delete => self.delete(event).await,
        }
    }

    /// Create the bucket, wait for it, record its URI and apply its ACL.
    ///
    /// `bucket_uri` is only set once the bucket has been confirmed to exist,
    /// so a failed ACL step still reports the URI while a failed create or
    /// wait leaves it empty.
    pub async fn create(&self, event: &mut BucketEvent) -> WorkerResult<()> {
        let client = self.factory.client(DatacenterCredentials::from_event(event));

        let location = client
            .create_bucket(&event.name, &event.acl, &event.bucket_location)
            .await?;

        client.wait_until_exists(&event.name).await?;

        event.bucket_uri = location.unwrap_or_else(|| format!("/{}", event.name));
        debug!(bucket = %event.name, uri = %event.bucket_uri, "bucket created");

        self.update(event).await
    }

    /// Apply the envelope's canned ACL and grants to the bucket.
    pub async fn update(&self, event: &BucketEvent) -> WorkerResult<()> {
        let client = self.factory.client(DatacenterCredentials::from_event(event));
        let grants = translate_grants(&event.grantees)?;

        let acl = if event.acl.is_empty() && grants.is_empty() {
            DEFAULT_CANNED_ACL
        } else {
            event.acl.as_str()
        };

        let target = event.acl_target();
        debug!(bucket = %target, acl = %acl, grants = grants.len(), "applying bucket acl");
        client.put_bucket_acl(target, acl, grants).await?;
        Ok(())
    }

    /// Delete the bucket named by the envelope.
    pub async fn delete(&self, event: &BucketEvent) -> WorkerResult<()> {
        let client = self.factory.client(DatacenterCredentials::from_event(event));
        client.delete_bucket(&event.name).await?;
        debug!(bucket = %event.name, "bucket deleted");
        Ok(())
    }
}

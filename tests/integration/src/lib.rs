//! Integration tests for the bucketwork worker.
//!
//! These tests drive the dispatcher against a running S3-compatible server at
//! `localhost:4566` (override with `S3_ENDPOINT_URL`). They are marked
//! `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p bucketwork-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use bucketwork_core::{Dispatcher, PublishError, Publisher, S3ClientFactory, WorkerConfig};
use bytes::Bytes;
use parking_lot::Mutex;

static INIT: Once = Once::new();

/// Region used for every test request.
pub const REGION: &str = "us-east-1";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
fn endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

/// Create a configured S3 client pointing at the local server, for assertions.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new("test", "test", None, None, "integration-test");

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(REGION))
        .credentials_provider(creds)
        .endpoint_url(endpoint_url())
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Publisher that keeps replies in memory.
#[derive(Debug, Clone, Default)]
pub struct CapturePublisher {
    messages: Arc<Mutex<Vec<(String, Bytes)>>>,
}

impl CapturePublisher {
    /// Take the replies published so far.
    #[must_use]
    pub fn take(&self) -> Vec<(String, serde_json::Value)> {
        std::mem::take(&mut *self.messages.lock())
            .into_iter()
            .map(|(subject, payload)| {
                let value = serde_json::from_slice(&payload).unwrap_or(serde_json::Value::Null);
                (subject, value)
            })
            .collect()
    }
}

#[async_trait]
impl Publisher for CapturePublisher {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<(), PublishError> {
        self.messages.lock().push((subject, payload));
        Ok(())
    }
}

/// A dispatcher wired to the local server with a capturing publisher.
#[must_use]
pub fn dispatcher() -> (Dispatcher<S3ClientFactory, CapturePublisher>, CapturePublisher) {
    init_tracing();

    let config = WorkerConfig::builder()
        .endpoint_url(Some(endpoint_url()))
        .force_path_style(true)
        .bucket_wait_timeout_secs(30)
        .build();
    let publisher = CapturePublisher::default();
    (
        Dispatcher::new(config.client_factory(), publisher.clone()),
        publisher,
    )
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// JSON request envelope for `bucket` with the given extra fields merged in.
#[must_use]
pub fn request(bucket: &str, extra: serde_json::Value) -> Bytes {
    let mut body = serde_json::json!({
        "_uuid": uuid::Uuid::new_v4().to_string(),
        "_batch_id": "integration",
        "_type": "aws",
        "datacenter_region": REGION,
        "datacenter_token": "test",
        "datacenter_secret": "test",
        "name": bucket,
        "acl": "",
        "bucket_location": "",
        "bucket_uri": "",
        "grantees": [],
    });
    if let (Some(body), serde_json::Value::Object(extra)) = (body.as_object_mut(), extra) {
        body.extend(extra);
    }
    Bytes::from(serde_json::to_vec(&body).unwrap_or_default())
}

/// Delete a bucket directly, ignoring errors.
pub async fn cleanup_bucket(client: &aws_sdk_s3::Client, bucket: &str) {
    let _ = client.delete_bucket().bucket(bucket).send().await;
}

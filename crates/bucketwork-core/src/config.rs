//! Worker configuration.
//!
//! Provides [`WorkerConfig`] for the bucketwork worker. Configuration values
//! are loaded from environment variables.

use std::time::Duration;

use bucketwork_model::BucketOperation;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::aws::S3ClientFactory;

/// Worker configuration.
///
/// # Examples
///
/// ```
/// use bucketwork_core::WorkerConfig;
///
/// let config = WorkerConfig::default();
/// assert_eq!(config.subjects(), vec!["s3.create.aws", "s3.update.aws", "s3.delete.aws"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct WorkerConfig {
    /// NATS server URL.
    #[builder(default = String::from("nats://127.0.0.1:4222"))]
    pub nats_uri: String,

    /// Resource segment of the subscribed subjects.
    #[builder(default = String::from("s3"))]
    pub resource: String,

    /// Provider segment of the subscribed subjects.
    #[builder(default = String::from("aws"))]
    pub provider: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Upper bound in seconds for the post-create existence wait.
    #[builder(default = 120)]
    pub bucket_wait_timeout_secs: u64,

    /// Endpoint override for S3-compatible services.
    #[builder(default)]
    pub endpoint_url: Option<String>,

    /// Whether to use path-style bucket addressing.
    #[builder(default = false)]
    pub force_path_style: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `NATS_URI` | `nats://127.0.0.1:4222` |
    /// | `RESOURCE` | `s3` |
    /// | `PROVIDER` | `aws` |
    /// | `LOG_LEVEL` | `info` |
    /// | `BUCKET_WAIT_TIMEOUT_SECS` | `120` |
    /// | `AWS_ENDPOINT_URL` | *(unset)* |
    /// | `S3_FORCE_PATH_STYLE` | `false` |
    ///
    /// A `BUCKET_WAIT_TIMEOUT_SECS` that is not a whole number of seconds is
    /// ignored, and an empty `AWS_ENDPOINT_URL` counts as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup, using the same keys and rules
    /// as [`WorkerConfig::from_env`].
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("NATS_URI") {
            config.nats_uri = v;
        }
        if let Some(v) = lookup("RESOURCE") {
            config.resource = v;
        }
        if let Some(v) = lookup("PROVIDER") {
            config.provider = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("BUCKET_WAIT_TIMEOUT_SECS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                config.bucket_wait_timeout_secs = n;
            }
        }
        if let Some(v) = lookup("AWS_ENDPOINT_URL") {
            if !v.is_empty() {
                config.endpoint_url = Some(v);
            }
        }
        if let Some(v) = lookup("S3_FORCE_PATH_STYLE") {
            config.force_path_style = parse_bool(&v);
        }

        config
    }

    /// Inbound subject for `op`, e.g. `s3.create.aws`.
    #[must_use]
    pub fn subject(&self, op: BucketOperation) -> String {
        format!("{}.{}.{}", self.resource, op, self.provider)
    }

    /// All inbound subjects, in subscription order.
    #[must_use]
    pub fn subjects(&self) -> Vec<String> {
        BucketOperation::ALL
            .into_iter()
            .map(|op| self.subject(op))
            .collect()
    }

    /// Existence wait timeout as a [`Duration`].
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.bucket_wait_timeout_secs)
    }

    /// Build the S3 client factory described by this configuration.
    #[must_use]
    pub fn client_factory(&self) -> S3ClientFactory {
        let factory =
            S3ClientFactory::new(self.wait_timeout()).with_force_path_style(self.force_path_style);
        match &self.endpoint_url {
            Some(url) => factory.with_endpoint_url(url.clone()),
            None => factory,
        }
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

//! NATS transport for outbound replies.

use async_trait::async_trait;
use bucketwork_core::{PublishError, Publisher};
use bytes::Bytes;

/// [`Publisher`] backed by a shared NATS client connection.
#[derive(Debug, Clone)]
pub struct NatsPublisher {
    client: async_nats::Client,
}

impl NatsPublisher {
    /// Wrap a connected client.
    #[must_use]
    pub fn new(client: async_nats::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Publisher for NatsPublisher {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<(), PublishError> {
        self.client
            .publish(subject.clone(), payload)
            .await
            .map_err(|e| PublishError::Transport {
                subject,
                message: e.to_string(),
            })
    }
}

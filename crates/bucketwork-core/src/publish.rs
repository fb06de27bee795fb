//! Outbound event publishing.
//!
//! The transport connection is injected into the [`crate::Dispatcher`] as a
//! [`Publisher`] rather than held globally. The worker binary implements it
//! on top of a NATS client.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

/// Suffix of the subject carrying error replies.
pub const ERROR_SUFFIX: &str = "error";

/// Suffix of the subject carrying completion replies.
pub const DONE_SUFFIX: &str = "done";

/// Failure to hand a message to the transport.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The transport rejected the message.
    #[error("failed to publish to {subject}: {message}")]
    Transport {
        /// Target subject.
        subject: String,
        /// Transport error message.
        message: String,
    },
}

/// Capability to publish a payload on a subject.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `payload` on `subject`.
    async fn publish(&self, subject: String, payload: Bytes) -> Result<(), PublishError>;
}

#[async_trait]
impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    async fn publish(&self, subject: String, payload: Bytes) -> Result<(), PublishError> {
        (**self).publish(subject, payload).await
    }
}

/// Subject for the error reply to a message received on `subject`.
#[must_use]
pub fn error_subject(subject: &str) -> String {
    format!("{subject}.{ERROR_SUFFIX}")
}

/// Subject for the completion reply to a message received on `subject`.
#[must_use]
pub fn done_subject(subject: &str) -> String {
    format!("{subject}.{DONE_SUFFIX}")
}

//! Inbound message dispatch.
//!
//! [`Dispatcher::handle`] takes one message from the bus and always publishes
//! exactly one reply: the completed envelope on `<subject>.done`, or the
//! failed envelope (or the undecodable raw payload) on `<subject>.error`.

use bucketwork_model::{BucketEvent, BucketOperation};
use bytes::Bytes;
use tracing::{debug, error, info, warn};

use crate::client::ClientFactory;
use crate::error::{WorkerError, WorkerResult};
use crate::lifecycle::BucketLifecycle;
use crate::publish::{Publisher, done_subject, error_subject};

/// How a message was answered.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The operation succeeded and the completion event was published.
    Completed,
    /// Decoding, validation, routing or the provider failed; the error event
    /// carries the envelope with this message.
    Failed(String),
    /// The payload could not be decoded; the raw bytes were forwarded.
    Rejected,
}

/// Routes inbound messages to lifecycle operations and publishes replies.
#[derive(Debug)]
pub struct Dispatcher<F, P> {
    lifecycle: BucketLifecycle<F>,
    publisher: P,
}

impl<F: ClientFactory, P: Publisher> Dispatcher<F, P> {
    /// Create a dispatcher over a client factory and a publisher.
    #[must_use]
    pub fn new(factory: F, publisher: P) -> Self {
        Self {
            lifecycle: BucketLifecycle::new(factory),
            publisher,
        }
    }

    /// Returns the lifecycle runner.
    #[must_use]
    pub fn lifecycle(&self) -> &BucketLifecycle<F> {
        &self.lifecycle
    }

    /// Handle one message received on `subject`.
    ///
    /// # Panics
    ///
    /// Panics if the envelope cannot be serialized for the reply, which would
    /// mean the envelope type itself is broken.
    pub async fn handle(&self, subject: &str, payload: Bytes) -> Outcome {
        let mut event = match BucketEvent::from_slice(&payload) {
            Ok(event) => event,
            Err(e) => {
                let err = WorkerError::Decode(e);
                warn!(subject = %subject, step = err.step(), error = %err, "rejecting undecodable message");
                self.emit(error_subject(subject), payload).await;
                return Outcome::Rejected;
            }
        };

        match self.process(subject, &mut event).await {
            Ok(()) => {
                info!(subject = %subject, uuid = %event.uuid, bucket = %event.name, "bucket operation completed");
                self.emit(done_subject(subject), encode(&event)).await;
                Outcome::Completed
            }
            Err(err) => {
                let message = err.to_string();
                warn!(
                    subject = %subject,
                    uuid = %event.uuid,
                    bucket = %event.name,
                    step = err.step(),
                    error = %message,
                    "bucket operation failed"
                );
                event.fail(message.clone());
                self.emit(error_subject(subject), encode(&event)).await;
                Outcome::Failed(message)
            }
        }
    }

    async fn process(&self, subject: &str, event: &mut BucketEvent) -> WorkerResult<()> {
        event.validate()?;

        let op = BucketOperation::from_subject(subject).ok_or_else(|| {
            WorkerError::UnknownOperation {
                subject: subject.to_owned(),
            }
        })?;

        debug!(operation = %op, uuid = %event.uuid, bucket = %event.name, "dispatching bucket operation");
        self.lifecycle.run(op, event).await
    }

    async fn emit(&self, subject: String, payload: Bytes) {
        if let Err(e) = self.publisher.publish(subject, payload).await {
            error!(error = %e, "failed to publish reply");
        }
    }
}

fn encode(event: &BucketEvent) -> Bytes {
    match event.to_vec() {
        Ok(data) => Bytes::from(data),
        Err(e) => panic!("bucket event is not serializable: {e}"),
    }
}

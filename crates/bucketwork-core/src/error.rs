//! Error types for bucket lifecycle handling.
//!
//! [`WorkerError`] is the single error a request can end with. Its display
//! string is copied verbatim into the `error` field of the reply envelope, so
//! provider failures keep the provider's own message.

use bucketwork_model::ValidationError;

/// A failed call against the storage provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The create bucket call failed.
    #[error("{message}")]
    CreateBucket {
        /// Provider error message.
        message: String,
    },

    /// The bucket did not become visible before the wait gave up.
    #[error("{message}")]
    WaitForBucket {
        /// Provider or waiter error message.
        message: String,
    },

    /// The put bucket ACL call (or its owner lookup) failed.
    #[error("{message}")]
    PutBucketAcl {
        /// Provider error message.
        message: String,
    },

    /// The delete bucket call failed.
    #[error("{message}")]
    DeleteBucket {
        /// Provider error message.
        message: String,
    },

    /// A grant could not be expressed as a provider grant object.
    #[error("invalid grant: {message}")]
    InvalidGrant {
        /// Builder error message.
        message: String,
    },
}

impl ProviderError {
    /// Name of the provider step that failed, for logging.
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            Self::CreateBucket { .. } => "create_bucket",
            Self::WaitForBucket { .. } => "wait_until_bucket_exists",
            Self::PutBucketAcl { .. } => "put_bucket_acl",
            Self::DeleteBucket { .. } => "delete_bucket",
            Self::InvalidGrant { .. } => "translate_grants",
        }
    }
}

/// Terminal failure of one inbound request.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// The payload could not be decoded into an envelope.
    #[error("failed to decode bucket event: {0}")]
    Decode(#[from] serde_json::Error),

    /// The envelope is missing something a provider call needs.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The subject does not name a known operation.
    #[error("unsupported operation in subject {subject}")]
    UnknownOperation {
        /// The inbound subject.
        subject: String,
    },

    /// The storage provider rejected a call.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl WorkerError {
    /// Name of the stage that failed, for logging.
    ///
    /// Provider failures report the provider step, so a failed create can be
    /// told apart from a failed existence wait or ACL update.
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Validation(_) => "validate",
            Self::UnknownOperation { .. } => "route",
            Self::Provider(e) => e.step(),
        }
    }
}

/// Convenience result type for lifecycle operations.
pub type WorkerResult<T> = Result<T, WorkerError>;

//! Validation error taxonomy for inbound bucket events.

/// Reasons an inbound [`crate::BucketEvent`] is rejected before any provider
/// call is attempted.
///
/// The display strings are what the orchestrator sees in the `error` field of
/// the reply, so they are kept stable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The datacenter identifier is not valid.
    ///
    /// Part of the taxonomy shared with other connectors; no current check
    /// produces it.
    #[error("Datacenter VPC ID invalid")]
    InvalidDatacenterId,

    /// `datacenter_region` is empty.
    #[error("Datacenter Region invalid")]
    InvalidRegion,

    /// `datacenter_token` or `datacenter_secret` is empty.
    #[error("Datacenter credentials invalid")]
    InvalidCredentials,

    /// `name` is empty.
    #[error("S3 bucket name is invalid")]
    InvalidBucketName,

    /// A grantee carries a `type` other than `id`, `email`, `emailaddress` or `uri`.
    #[error("S3 grantee type is invalid: {kind}")]
    InvalidGranteeType {
        /// The unrecognized type tag.
        kind: String,
    },
}

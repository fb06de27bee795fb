//! Wire types for the bucketwork bucket lifecycle worker.
//!
//! The upstream orchestrator sends a JSON [`BucketEvent`] on a subject of the
//! form `<resource>.<operation>.<provider>`. This crate owns that envelope,
//! the access grant descriptors it carries, the [`BucketOperation`] parsed
//! from the subject, and the [`ValidationError`] taxonomy checked before any
//! provider call is made.

pub mod error;
pub mod event;
pub mod grant;
pub mod operations;

pub use error::ValidationError;
pub use event::BucketEvent;
pub use grant::{GranteeKind, GranteeSpec};
pub use operations::BucketOperation;

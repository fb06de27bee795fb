//! Bucket lifecycle orchestration for bucketwork.
//!
//! This crate turns a decoded [`bucketwork_model::BucketEvent`] into calls
//! against an object storage provider and reports the outcome through an
//! injected [`Publisher`].
//!
//! # Architecture
//!
//! ```text
//! inbound message (subject, payload)
//!        |
//!        v
//!   Dispatcher (decode, validate, route, reply)
//!        |
//!        v
//!   BucketLifecycle (create / update / delete)
//!        |
//!        v
//!   ClientFactory -> BucketClient (aws-sdk-s3)
//! ```
//!
//! Every message is handled on its own task with its own envelope and its own
//! provider client; nothing is shared between requests except the immutable
//! factory configuration and the publisher handle.

pub mod aws;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod grants;
pub mod lifecycle;
pub mod publish;

#[cfg(test)]
mod testing;

pub use aws::{S3BucketClient, S3ClientFactory};
pub use client::{BucketClient, ClientFactory, DatacenterCredentials};
pub use config::WorkerConfig;
pub use dispatch::{Dispatcher, Outcome};
pub use error::{ProviderError, WorkerError};
pub use lifecycle::BucketLifecycle;
pub use publish::{PublishError, Publisher};

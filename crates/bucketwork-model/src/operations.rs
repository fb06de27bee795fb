//! Bucket lifecycle operation enum.

use std::fmt;

/// Lifecycle operations the worker subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketOperation {
    /// Create a bucket, wait for it to exist, then apply its ACL.
    Create,
    /// Apply the requested ACL and grants to an existing bucket.
    Update,
    /// Delete a bucket.
    Delete,
}

impl BucketOperation {
    /// All operations, in subscription order.
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Delete];

    /// Returns the subject segment for this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Parse a subject segment into a `BucketOperation`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Extract the operation from a `<resource>.<operation>.<provider>` subject.
    ///
    /// Returns `None` when the subject has no second segment or the segment is
    /// not a known operation.
    #[must_use]
    pub fn from_subject(subject: &str) -> Option<Self> {
        subject.split('.').nth(1).and_then(Self::from_name)
    }
}

impl fmt::Display for BucketOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

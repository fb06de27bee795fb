//! Access grant descriptors as sent by the orchestrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One entry of the envelope's `grantees` list.
///
/// `id` holds the grantee identity whose meaning depends on `kind`: a
/// canonical user id, an email address, or a group URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranteeSpec {
    /// Grantee identity.
    #[serde(default)]
    pub id: String,
    /// Grantee type tag (`id`, `email`, `emailaddress` or `uri`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Permission string, passed through to the provider (e.g. `READ`).
    #[serde(default)]
    pub permissions: String,
}

impl GranteeSpec {
    /// Parse the type tag of this grantee.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGranteeType`] for an unknown tag.
    pub fn grantee_kind(&self) -> Result<GranteeKind, ValidationError> {
        self.kind.parse()
    }
}

/// Which identity field of a provider grant a grantee descriptor fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GranteeKind {
    /// Canonical user id.
    Id,
    /// Account email address.
    Email,
    /// Predefined group URI.
    Uri,
}

impl GranteeKind {
    /// Returns the canonical tag for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::Uri => "uri",
        }
    }
}

impl FromStr for GranteeKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "email" | "emailaddress" => Ok(Self::Email),
            "uri" => Ok(Self::Uri),
            _ => Err(ValidationError::InvalidGranteeType { kind: s.to_owned() }),
        }
    }
}

impl fmt::Display for GranteeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

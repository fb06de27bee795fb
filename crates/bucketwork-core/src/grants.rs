//! Translation of grant descriptors into S3 grants.

use aws_sdk_s3::types::{Grant, Grantee, Permission, Type};
use bucketwork_model::{GranteeKind, GranteeSpec};

use crate::error::{ProviderError, WorkerResult};

/// Translate one grant descriptor into an S3 [`Grant`].
///
/// The grantee kind selects the single identity field that is set: `id` fills
/// the canonical user id, `email` the email address and `uri` the group URI.
///
/// # Errors
///
/// Returns a validation error for an unknown grantee type.
pub fn translate_grant(spec: &GranteeSpec) -> WorkerResult<Grant> {
    let builder = match spec.grantee_kind()? {
        GranteeKind::Id => Grantee::builder()
            .r#type(Type::CanonicalUser)
            .id(&spec.id),
        GranteeKind::Email => Grantee::builder()
            .r#type(Type::AmazonCustomerByEmail)
            .email_address(&spec.id),
        GranteeKind::Uri => Grantee::builder().r#type(Type::Group).uri(&spec.id),
    };

    let grantee = builder.build().map_err(|e| ProviderError::InvalidGrant {
        message: e.to_string(),
    })?;

    Ok(Grant::builder()
        .grantee(grantee)
        .permission(Permission::from(spec.permissions.as_str()))
        .build())
}

/// Translate all grant descriptors, preserving order.
///
/// # Errors
///
/// Fails on the first descriptor [`translate_grant`] rejects.
pub fn translate_grants(specs: &[GranteeSpec]) -> WorkerResult<Vec<Grant>> {
    specs.iter().map(translate_grant).collect()
}

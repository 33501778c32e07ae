//! Principal and User — identities asserted by the external provider.
//!
//! A credential arrives as an opaque bearer string; an [`IdentityVerifier`]
//! turns it into a [`Principal`] or rejects it. The verified `subject_id` is
//! the only value ever trusted for ownership comparisons — request paths and
//! bodies are not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A verified identity derived from a bearer credential, valid for the
/// duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
  pub subject_id:   String,
  pub email:        String,
  pub display_name: String,
}

/// The stored mirror of a principal's provider-asserted profile fields.
///
/// Created on first successful verification for a `subject_id`; profile
/// fields are overwritten on later verifications, `id` and `subject_id`
/// never change. Users are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:           Uuid,
  pub subject_id:   String,
  pub email:        String,
  pub display_name: String,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Why credential verification failed.
#[derive(Debug, Error)]
pub enum VerifyError {
  /// No credential was presented at all.
  #[error("no credential presented")]
  Missing,

  /// A credential was presented but is malformed, forged or expired.
  #[error("credential rejected: {0}")]
  Rejected(String),
}

/// Turns a raw bearer credential into a trusted [`Principal`].
///
/// Pure verification — implementations must not touch storage. Callers map
/// [`VerifyError::Missing`] to 401 and [`VerifyError::Rejected`] to 403.
pub trait IdentityVerifier: Send + Sync {
  fn verify(&self, raw_credential: &str) -> Result<Principal, VerifyError>;
}

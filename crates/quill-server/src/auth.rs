//! Bearer-credential verification and the `Identity` extractor.
//!
//! Tokens are HMAC-SHA256 signed: `base64url(claims JSON) "." base64url(tag)`.
//! The shared secret comes from `ServerConfig::token_secret`; the server's
//! `--mint-token` mode issues tokens for the same secret.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use quill_core::{
  asset::AssetStore,
  identity::{IdentityVerifier, Principal, VerifyError},
  store::BlogStore,
};

use crate::{AppState, error::Error};

type HmacSha256 = Hmac<Sha256>;

/// The signed payload of a credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// Stable subject id — becomes `Principal::subject_id`.
  pub sub:   String,
  pub email: String,
  pub name:  String,
  /// Unix expiry timestamp. Absent means non-expiring.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub exp:   Option<i64>,
}

/// Verifies tokens signed with a shared HMAC-SHA256 secret.
pub struct HmacVerifier {
  key: Vec<u8>,
}

impl HmacVerifier {
  pub fn new(secret: &str) -> Self {
    Self { key: secret.as_bytes().to_vec() }
  }
}

impl IdentityVerifier for HmacVerifier {
  fn verify(&self, raw_credential: &str) -> Result<Principal, VerifyError> {
    let (payload_b64, tag_b64) = raw_credential
      .split_once('.')
      .ok_or_else(|| VerifyError::Rejected("malformed token".into()))?;

    let payload = B64
      .decode(payload_b64)
      .map_err(|_| VerifyError::Rejected("malformed payload".into()))?;
    let tag = B64
      .decode(tag_b64)
      .map_err(|_| VerifyError::Rejected("malformed signature".into()))?;

    let mut mac = HmacSha256::new_from_slice(&self.key)
      .expect("HMAC accepts keys of any length");
    mac.update(&payload);
    // Constant-time comparison.
    mac
      .verify_slice(&tag)
      .map_err(|_| VerifyError::Rejected("signature mismatch".into()))?;

    let claims: Claims = serde_json::from_slice(&payload)
      .map_err(|e| VerifyError::Rejected(format!("bad claims: {e}")))?;

    if let Some(exp) = claims.exp
      && exp < Utc::now().timestamp()
    {
      return Err(VerifyError::Rejected("token expired".into()));
    }

    Ok(Principal {
      subject_id:   claims.sub,
      email:        claims.email,
      display_name: claims.name,
    })
  }
}

/// Sign `claims` with `secret`, producing a credential [`HmacVerifier`]
/// accepts.
pub fn mint_token(secret: &str, claims: &Claims) -> String {
  let payload = serde_json::to_vec(claims).expect("claims serialise");

  let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
    .expect("HMAC accepts keys of any length");
  mac.update(&payload);
  let tag = mac.finalize().into_bytes();

  format!("{}.{}", B64.encode(&payload), B64.encode(tag))
}

/// Pull the bearer token out of the `Authorization` header.
///
/// An absent header (or a non-Bearer scheme) is `Missing` — the caller never
/// presented a credential at all. Anything after `Bearer ` is handed to the
/// verifier as-is.
fn bearer_token(headers: &HeaderMap) -> Result<&str, VerifyError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(VerifyError::Missing)
}

/// The verified principal for this request.
///
/// Present in a handler's signature means the request carried a valid
/// credential; the wrapped [`Principal`] is the sole source of truth for
/// ownership comparisons.
pub struct Identity(pub Principal);

impl<S, A> FromRequestParts<AppState<S, A>> for Identity
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, A>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)?;
    let principal = state.verifier.verify(token)?;
    Ok(Identity(principal))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn claims(sub: &str) -> Claims {
    Claims {
      sub:   sub.to_owned(),
      email: format!("{sub}@example.com"),
      name:  format!("User {sub}"),
      exp:   None,
    }
  }

  #[test]
  fn mint_then_verify_round_trips() {
    let verifier = HmacVerifier::new("secret");
    let token = mint_token("secret", &claims("u1"));

    let principal = verifier.verify(&token).unwrap();
    assert_eq!(principal.subject_id, "u1");
    assert_eq!(principal.email, "u1@example.com");
    assert_eq!(principal.display_name, "User u1");
  }

  #[test]
  fn wrong_secret_is_rejected() {
    let verifier = HmacVerifier::new("secret");
    let token = mint_token("other-secret", &claims("u1"));
    assert!(matches!(
      verifier.verify(&token),
      Err(VerifyError::Rejected(_))
    ));
  }

  #[test]
  fn tampered_payload_is_rejected() {
    let verifier = HmacVerifier::new("secret");
    let token = mint_token("secret", &claims("u1"));

    // Swap the signed payload for one claiming a different subject.
    let forged_payload = B64.encode(
      serde_json::to_vec(&claims("u2")).unwrap(),
    );
    let tag = token.split_once('.').unwrap().1;
    let forged = format!("{forged_payload}.{tag}");

    assert!(matches!(
      verifier.verify(&forged),
      Err(VerifyError::Rejected(_))
    ));
  }

  #[test]
  fn garbage_is_rejected() {
    let verifier = HmacVerifier::new("secret");
    assert!(matches!(
      verifier.verify("not-a-token"),
      Err(VerifyError::Rejected(_))
    ));
    assert!(matches!(
      verifier.verify("!!!.###"),
      Err(VerifyError::Rejected(_))
    ));
  }

  #[test]
  fn expired_token_is_rejected() {
    let verifier = HmacVerifier::new("secret");
    let mut expired = claims("u1");
    expired.exp = Some(Utc::now().timestamp() - 60);
    let token = mint_token("secret", &expired);

    assert!(matches!(
      verifier.verify(&token),
      Err(VerifyError::Rejected(_))
    ));
  }

  #[test]
  fn future_expiry_is_accepted() {
    let verifier = HmacVerifier::new("secret");
    let mut fresh = claims("u1");
    fresh.exp = Some(Utc::now().timestamp() + 3600);
    let token = mint_token("secret", &fresh);

    assert!(verifier.verify(&token).is_ok());
  }

  #[test]
  fn bearer_token_missing_header() {
    let headers = HeaderMap::new();
    assert!(matches!(bearer_token(&headers), Err(VerifyError::Missing)));
  }

  #[test]
  fn bearer_token_wrong_scheme() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
    assert!(matches!(bearer_token(&headers), Err(VerifyError::Missing)));
  }

  #[test]
  fn bearer_token_extracts_credential() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
    assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
  }
}

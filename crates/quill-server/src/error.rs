//! Error taxonomy and axum `IntoResponse` implementation.
//!
//! Every failure surfaces as `{"error": <message>}` with the matching status
//! code. Infrastructure failures (store, upload) are logged in full and
//! returned with a generic message — internal detail never reaches the
//! client.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use quill_core::{NotOwner, VerifyError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No credential was presented. 401.
  #[error("missing credentials")]
  Unauthenticated,

  /// A verified identity that is not allowed to act on this resource,
  /// or a credential that failed verification. 403.
  #[error("forbidden")]
  Forbidden,

  /// A syntactically invalid post id. Checked before any store lookup. 400.
  #[error("invalid post id: {0}")]
  InvalidId(String),

  /// A well-formed id with no matching post. 404.
  #[error("post not found")]
  NotFound,

  /// A request body the server cannot interpret. 400.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The asset store failed; the enclosing mutation was aborted with no
  /// store write. 500.
  #[error("upload failed: {0}")]
  Upload(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The document store failed. 500.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<VerifyError> for Error {
  fn from(e: VerifyError) -> Self {
    match e {
      VerifyError::Missing => Error::Unauthenticated,
      VerifyError::Rejected(_) => Error::Forbidden,
    }
  }
}

impl From<NotOwner> for Error {
  fn from(_: NotOwner) -> Self {
    Error::Forbidden
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthenticated => {
        (StatusCode::UNAUTHORIZED, "missing credentials".to_owned())
      }
      Error::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_owned()),
      Error::InvalidId(id) => {
        (StatusCode::BAD_REQUEST, format!("invalid post id: {id}"))
      }
      Error::NotFound => (StatusCode::NOT_FOUND, "post not found".to_owned()),
      Error::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::Upload(e) => {
        tracing::error!(error = %e, "asset upload failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

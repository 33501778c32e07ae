//! `POST /verifyToken` — mirror the verified principal into the user
//! directory.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use quill_core::{asset::AssetStore, store::BlogStore};

use crate::{AppState, auth::Identity, error::Error};

/// Upsert the caller's User record. Idempotent: repeated calls with the
/// same credential converge to the same stored state.
pub async fn verify_token<S, A>(
  State(state): State<AppState<S, A>>,
  Identity(principal): Identity,
) -> Result<Json<Value>, Error>
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  let user = state
    .store
    .upsert_user(&principal)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(Json(json!({
    "message": "user authenticated and saved",
    "user": user,
  })))
}

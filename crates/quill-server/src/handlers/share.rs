//! `GET /user/{ownerId}/post/{id}/share` — the link-shareable projection.
//!
//! Authorization here is against the path's owner id, not the caller: any
//! verified user may fetch the share view of a post through its owner's
//! link. The payload is sanitised — it never carries `owner_subject_id` or
//! a raw email address.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;

use quill_core::{asset::AssetStore, authz::assert_owner, store::BlogStore};

use crate::{
  AppState,
  auth::Identity,
  error::Error,
  handlers::posts::parse_post_id,
};

/// What leaves the building when a post is shared.
#[derive(Debug, Serialize)]
pub struct SharePayload {
  pub title:      String,
  pub summary:    String,
  pub content:    String,
  pub cover:      Option<String>,
  /// The owner's display name — never their email.
  pub author:     String,
  pub share_link: String,
}

pub async fn handler<S, A>(
  State(state): State<AppState<S, A>>,
  Path((owner_id, id)): Path<(String, String)>,
  Identity(_principal): Identity,
) -> Result<Json<SharePayload>, Error>
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  // Id shape first, then existence, then ownership.
  let id = parse_post_id(&id)?;

  let post = state
    .store
    .get_post(id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::NotFound)?;
  assert_owner(&post, &owner_id)?;

  let author = state
    .store
    .find_user(&post.owner_subject_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .map(|u| u.display_name)
    // Owner never hit /verifyToken on this deployment; don't fall back to
    // the email, which must not appear in the payload.
    .unwrap_or_else(|| "unknown".to_owned());

  let share_link = format!(
    "{}/post/{id}/share",
    state.config.public_base_url.trim_end_matches('/')
  );

  Ok(Json(SharePayload {
    title: post.title,
    summary: post.summary,
    content: post.content,
    cover: post.cover_url,
    author,
    share_link,
  }))
}

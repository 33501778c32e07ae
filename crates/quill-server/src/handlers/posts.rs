//! Post CRUD handlers.
//!
//! | Method   | Path                        | Auth | Notes |
//! |----------|-----------------------------|------|-------|
//! | `GET`    | `/user/{ownerId}/posts`     | yes  | ≤ 20, newest first |
//! | `POST`   | `/user/{ownerId}/post`      | yes  | multipart; 403 if caller ≠ owner |
//! | `PUT`    | `/user/{ownerId}/post/{id}` | yes  | multipart; 404/403 |
//! | `DELETE` | `/user/{ownerId}/post/{id}` | yes  | 404/403 |
//! | `GET`    | `/post/{id}`                | no   | 400 invalid id, 404 unknown |
//!
//! Ownership is always decided against the verified principal's subject id,
//! never against a path segment or body field.

use axum::{
  Json,
  extract::{Multipart, Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bytes::Bytes;
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::{
  asset::AssetStore,
  authz::assert_owner,
  post::{NewPost, Post, PostPatch},
  store::{BlogStore, OWNER_FEED_LIMIT},
};

use crate::{AppState, auth::Identity, error::Error};

// ─── Multipart form ───────────────────────────────────────────────────────────

/// The `{title, summary, content, file?}` multipart body shared by create
/// and update.
pub struct PostForm {
  pub title:   String,
  pub summary: String,
  pub content: String,
  /// `(original filename, bytes)` of the cover image, if one was attached.
  pub file:    Option<(String, Bytes)>,
}

impl PostForm {
  pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
    let mut title   = None;
    let mut summary = None;
    let mut content = None;
    let mut file    = None;

    while let Some(field) = multipart
      .next_field()
      .await
      .map_err(|e| Error::BadRequest(format!("malformed multipart body: {e}")))?
    {
      let name = field.name().unwrap_or_default().to_owned();
      match name.as_str() {
        "title" => title = Some(read_text(field, "title").await?),
        "summary" => summary = Some(read_text(field, "summary").await?),
        "content" => content = Some(read_text(field, "content").await?),
        "file" => {
          let filename = field.file_name().unwrap_or("upload").to_owned();
          let bytes = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("unreadable file field: {e}")))?;
          file = Some((filename, bytes));
        }
        // Unknown fields are ignored, matching lenient form handling.
        _ => {}
      }
    }

    Ok(Self {
      title:   title.ok_or_else(|| missing("title"))?,
      summary: summary.ok_or_else(|| missing("summary"))?,
      content: content.ok_or_else(|| missing("content"))?,
      file,
    })
  }
}

async fn read_text(
  field: axum::extract::multipart::Field<'_>,
  name: &str,
) -> Result<String, Error> {
  field
    .text()
    .await
    .map_err(|e| Error::BadRequest(format!("unreadable field {name}: {e}")))
}

fn missing(name: &str) -> Error {
  Error::BadRequest(format!("missing field: {name}"))
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Id syntax is checked before any store access; a malformed id is a 400
/// even when no post could possibly match.
pub fn parse_post_id(raw: &str) -> Result<Uuid, Error> {
  Uuid::parse_str(raw).map_err(|_| Error::InvalidId(raw.to_owned()))
}

/// Upload the cover (if any) before the store write, so a failed upload
/// aborts the whole mutation with nothing persisted.
async fn upload_cover<A: AssetStore>(
  assets: &A,
  file: &Option<(String, Bytes)>,
) -> Result<Option<String>, Error> {
  match file {
    Some((name, bytes)) => {
      let url = assets
        .put(bytes, name)
        .await
        .map_err(|e| Error::Upload(Box::new(e)))?;
      Ok(Some(url))
    }
    None => Ok(None),
  }
}

fn store_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Store(Box::new(e))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /user/{ownerId}/post`
pub async fn create<S, A>(
  State(state): State<AppState<S, A>>,
  Path(owner_id): Path<String>,
  Identity(principal): Identity,
  multipart: Multipart,
) -> Result<impl IntoResponse, Error>
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  // A caller may only create posts in their own space.
  if principal.subject_id != owner_id {
    return Err(Error::Forbidden);
  }

  let form = PostForm::from_multipart(multipart).await?;
  let cover_url = upload_cover(state.assets.as_ref(), &form.file).await?;

  let post = state
    .store
    .create_post(NewPost {
      owner_subject_id: principal.subject_id,
      title:            form.title,
      summary:          form.summary,
      content:          form.content,
      cover_url,
      author_email:     principal.email,
    })
    .await
    .map_err(store_err)?;

  Ok((StatusCode::CREATED, Json(post)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /user/{ownerId}/posts`
///
/// Owner-scoped: the feed belongs to the path's owner id, and any verified
/// caller may read it. Verification is still required to hit the endpoint.
pub async fn list<S, A>(
  State(state): State<AppState<S, A>>,
  Path(owner_id): Path<String>,
  Identity(_principal): Identity,
) -> Result<Json<Vec<Post>>, Error>
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  let posts = state
    .store
    .list_posts_by_owner(&owner_id, OWNER_FEED_LIMIT)
    .await
    .map_err(store_err)?;
  Ok(Json(posts))
}

// ─── Fetch single (public) ────────────────────────────────────────────────────

/// `GET /post/{id}` — no principal required.
pub async fn get_one<S, A>(
  State(state): State<AppState<S, A>>,
  Path(id): Path<String>,
) -> Result<Json<Post>, Error>
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  let id = parse_post_id(&id)?;
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(store_err)?
    .ok_or(Error::NotFound)?;
  Ok(Json(post))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /user/{ownerId}/post/{id}`
pub async fn update<S, A>(
  State(state): State<AppState<S, A>>,
  Path((_owner_id, id)): Path<(String, String)>,
  Identity(principal): Identity,
  multipart: Multipart,
) -> Result<Json<Post>, Error>
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  let id = parse_post_id(&id)?;

  // Ownership is decided before the body is even looked at — a non-owner
  // gets 403 no matter what they sent.
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(store_err)?
    .ok_or(Error::NotFound)?;
  assert_owner(&post, &principal.subject_id)?;

  let form = PostForm::from_multipart(multipart).await?;

  // New file replaces the cover; no file keeps the stored one.
  let cover_url = upload_cover(state.assets.as_ref(), &form.file).await?;

  let updated = state
    .store
    .update_post(id, PostPatch {
      title:   Some(form.title),
      summary: Some(form.summary),
      content: Some(form.content),
      cover_url,
    })
    .await
    .map_err(store_err)?
    // Deleted by a concurrent request between our read and write.
    .ok_or(Error::NotFound)?;

  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /user/{ownerId}/post/{id}`
///
/// The cover asset is intentionally left in place — orphaned assets are an
/// accepted limitation.
pub async fn delete<S, A>(
  State(state): State<AppState<S, A>>,
  Path((_owner_id, id)): Path<(String, String)>,
  Identity(principal): Identity,
) -> Result<Json<Value>, Error>
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  let id = parse_post_id(&id)?;

  let post = state
    .store
    .get_post(id)
    .await
    .map_err(store_err)?
    .ok_or(Error::NotFound)?;
  assert_owner(&post, &principal.subject_id)?;

  let deleted = state.store.delete_post(id).await.map_err(store_err)?;
  if !deleted {
    return Err(Error::NotFound);
  }

  Ok(Json(json!({ "message": "post deleted" })))
}

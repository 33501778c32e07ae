//! The `BlogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `quill-store-sqlite`).
//! Higher layers (`quill-server`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  identity::{Principal, User},
  post::{NewPost, Post, PostPatch},
};

/// Page size for the per-owner feed. [`BlogStore::list_posts_by_owner`]
/// never returns more rows than this.
pub const OWNER_FEED_LIMIT: usize = 20;

/// Abstraction over a Quill storage backend.
///
/// Ids and timestamps are server-assigned: `create_post` and `upsert_user`
/// mint them, callers never supply them. All methods return `Send` futures
/// so the trait can be used in multi-threaded async runtimes (tokio with
/// `axum`).
pub trait BlogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Mirror a verified principal into the user directory.
  ///
  /// Creates the user on first sight of `subject_id`; otherwise overwrites
  /// `email` and `display_name` and leaves `id`/`subject_id` untouched.
  /// Idempotent: repeated calls with the same principal converge.
  fn upsert_user<'a>(
    &'a self,
    principal: &'a Principal,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + 'a;

  /// Look up a user by subject id. Returns `None` if never seen.
  fn find_user<'a>(
    &'a self,
    subject_id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post. The store assigns `id`, `created_at` and
  /// `updated_at`.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Retrieve a post by id. Returns `None` if not found.
  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// The newest posts owned by `owner_subject_id`, at most `limit` of
  /// them, in non-increasing `created_at` order.
  fn list_posts_by_owner<'a>(
    &'a self,
    owner_subject_id: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;

  /// Apply a partial update and bump `updated_at`. Returns the updated
  /// post as re-read from the store, or `None` if the id no longer exists.
  fn update_post(
    &self,
    id: Uuid,
    patch: PostPatch,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Remove a post. Returns `false` if the id did not exist.
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

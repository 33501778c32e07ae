//! HTTP layer for the Quill blog backend.
//!
//! Exposes an axum [`Router`] implementing the post-ownership API, backed by
//! any [`BlogStore`] and [`AssetStore`]. Credentials are verified by an
//! injected [`IdentityVerifier`] — there are no ambient globals, so tests
//! substitute fakes freely.

pub mod assets;
pub mod auth;
pub mod error;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use quill_core::{
  asset::AssetStore, identity::IdentityVerifier, store::BlogStore,
};

use handlers::{posts, share, users};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Prefix for asset URLs and share links, e.g. `https://blog.example.com`.
  pub public_base_url: String,
  pub store_path:      PathBuf,
  pub media_dir:       PathBuf,
  /// Shared secret for [`auth::HmacVerifier`].
  pub token_secret:    String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
///
/// Constructed once at process start and injected; handlers never reach for
/// process-wide singletons.
pub struct AppState<S: BlogStore, A: AssetStore> {
  pub store:    Arc<S>,
  pub assets:   Arc<A>,
  pub verifier: Arc<dyn IdentityVerifier>,
  pub config:   Arc<ServerConfig>,
}

impl<S: BlogStore, A: AssetStore> Clone for AppState<S, A> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      assets:   Arc::clone(&self.assets),
      verifier: Arc::clone(&self.verifier),
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the blog API.
///
/// Uploaded covers are served read-only under `/media/`.
pub fn router<S, A>(state: AppState<S, A>) -> Router
where
  S: BlogStore + 'static,
  A: AssetStore + 'static,
{
  let media = ServeDir::new(&state.config.media_dir);

  Router::new()
    .route("/verifyToken", post(users::verify_token::<S, A>))
    .route("/user/{owner_id}/posts", get(posts::list::<S, A>))
    .route("/user/{owner_id}/post", post(posts::create::<S, A>))
    .route(
      "/user/{owner_id}/post/{id}",
      put(posts::update::<S, A>).delete(posts::delete::<S, A>),
    )
    .route("/user/{owner_id}/post/{id}/share", get(share::handler::<S, A>))
    .route("/post/{id}", get(posts::get_one::<S, A>))
    .nest_service("/media", media)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

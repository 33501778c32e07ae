//! Filesystem-backed [`AssetStore`].
//!
//! Covers land under a configured media directory and are served read-only
//! at `{public_base_url}/media/{key}` by the router. Keys carry a
//! millisecond timestamp prefix and a random segment so repeated uploads
//! of the same filename never collide, even concurrent ones.

use std::path::PathBuf;

use chrono::Utc;
use quill_core::asset::AssetStore;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("asset write failed: {0}")]
  Io(#[from] std::io::Error),
}

pub struct FsAssetStore {
  media_dir:       PathBuf,
  public_base_url: String,
}

impl FsAssetStore {
  pub fn new(media_dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
    Self {
      media_dir:       media_dir.into(),
      public_base_url: public_base_url.trim_end_matches('/').to_owned(),
    }
  }
}

impl AssetStore for FsAssetStore {
  type Error = Error;

  async fn put(&self, bytes: &[u8], suggested_name: &str) -> Result<String, Error> {
    // Timestamp keeps keys roughly sortable; the random segment keeps two
    // same-named uploads in the same millisecond from colliding.
    let key = format!(
      "{}_{}_{}",
      Utc::now().timestamp_millis(),
      Uuid::new_v4().simple(),
      sanitize(suggested_name)
    );

    tokio::fs::create_dir_all(&self.media_dir).await?;
    tokio::fs::write(self.media_dir.join(&key), bytes).await?;

    Ok(format!("{}/media/{key}", self.public_base_url))
  }
}

/// Reduce a client-supplied filename to a safe storage key component.
/// Path separators and anything exotic become `-`.
fn sanitize(name: &str) -> String {
  let cleaned: String = name
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
        c
      } else {
        '-'
      }
    })
    .collect();

  if cleaned.trim_matches('-').is_empty() {
    "upload".to_owned()
  } else {
    cleaned
  }
}

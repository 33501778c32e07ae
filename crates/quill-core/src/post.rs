//! Post — the owned blog entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A published blog post.
///
/// `id`, `created_at` and `updated_at` are assigned by the store;
/// `owner_subject_id` is written exactly once, at creation, and is the sole
/// input to every later authorization decision about this post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub id:               Uuid,
  pub owner_subject_id: String,
  pub title:            String,
  pub summary:          String,
  /// Rich text / HTML, stored verbatim.
  pub content:          String,
  /// Public URL of the cover image, if one was ever uploaded.
  pub cover_url:        Option<String>,
  pub author_email:     String,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

/// Fields for a post that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub owner_subject_id: String,
  pub title:            String,
  pub summary:          String,
  pub content:          String,
  pub cover_url:        Option<String>,
  pub author_email:     String,
}

/// A partial update to an existing post.
///
/// `None` fields are left as stored. In particular an absent `cover_url`
/// retains the existing cover — a cover, once set, is never silently
/// cleared.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
  pub title:     Option<String>,
  pub summary:   Option<String>,
  pub content:   Option<String>,
  pub cover_url: Option<String>,
}

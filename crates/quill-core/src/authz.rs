//! The ownership guard shared by update, delete and share.
//!
//! Every mutating path compares the same two values the same way; the check
//! lives here once instead of being re-derived per handler.

use thiserror::Error;
use uuid::Uuid;

use crate::post::Post;

/// Returned when a subject is not the owner of a post.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("subject {subject_id:?} does not own post {post_id}")]
pub struct NotOwner {
  pub post_id:    Uuid,
  pub subject_id: String,
}

/// Succeeds iff `subject_id` matches the post's immutable owner.
pub fn assert_owner(post: &Post, subject_id: &str) -> Result<(), NotOwner> {
  if post.owner_subject_id == subject_id {
    Ok(())
  } else {
    Err(NotOwner {
      post_id:    post.id,
      subject_id: subject_id.to_owned(),
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;

  fn post_owned_by(subject_id: &str) -> Post {
    Post {
      id:               Uuid::new_v4(),
      owner_subject_id: subject_id.to_owned(),
      title:            "t".into(),
      summary:          "s".into(),
      content:          "<p>c</p>".into(),
      cover_url:        None,
      author_email:     "owner@example.com".into(),
      created_at:       Utc::now(),
      updated_at:       Utc::now(),
    }
  }

  #[test]
  fn owner_passes() {
    let post = post_owned_by("u1");
    assert!(assert_owner(&post, "u1").is_ok());
  }

  #[test]
  fn non_owner_is_rejected() {
    let post = post_owned_by("u1");
    let err = assert_owner(&post, "u2").unwrap_err();
    assert_eq!(err.post_id, post.id);
    assert_eq!(err.subject_id, "u2");
  }

  #[test]
  fn comparison_is_exact() {
    // No case folding, no trimming — subject ids are opaque.
    let post = post_owned_by("u1");
    assert!(assert_owner(&post, "U1").is_err());
    assert!(assert_owner(&post, "u1 ").is_err());
  }
}

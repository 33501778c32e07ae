//! Conversions between domain types and their SQLite text encodings.

use chrono::{DateTime, SecondsFormat, Utc};
use quill_core::{identity::User, post::Post};
use uuid::Uuid;

use crate::{Error, Result};

pub fn encode_uuid(id: Uuid) -> String {
  id.to_string()
}

/// Fixed-width RFC 3339 with microseconds, so lexicographic order on the
/// column matches chronological order.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|d| d.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `users` row as it comes off the wire, before decoding.
pub struct RawUser {
  pub id:           String,
  pub subject_id:   String,
  pub email:        String,
  pub display_name: String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:           Uuid::parse_str(&self.id)?,
      subject_id:   self.subject_id,
      email:        self.email,
      display_name: self.display_name,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// A `posts` row as it comes off the wire, before decoding.
pub struct RawPost {
  pub id:               String,
  pub owner_subject_id: String,
  pub title:            String,
  pub summary:          String,
  pub content:          String,
  pub cover_url:        Option<String>,
  pub author_email:     String,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      id:               Uuid::parse_str(&self.id)?,
      owner_subject_id: self.owner_subject_id,
      title:            self.title,
      summary:          self.summary,
      content:          self.content,
      cover_url:        self.cover_url,
      author_email:     self.author_email,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

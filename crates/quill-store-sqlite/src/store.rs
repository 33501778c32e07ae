//! [`SqliteStore`] — the SQLite implementation of [`BlogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use quill_core::{
  identity::{Principal, User},
  post::{NewPost, Post, PostPatch},
  store::BlogStore,
};

use crate::{
  Error, Result,
  encode::{RawPost, RawUser, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const POST_COLUMNS: &str = "id, owner_subject_id, title, summary, content, \
                            cover_url, author_email, created_at, updated_at";

fn read_post_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPost> {
  Ok(RawPost {
    id:               row.get(0)?,
    owner_subject_id: row.get(1)?,
    title:            row.get(2)?,
    summary:          row.get(3)?,
    content:          row.get(4)?,
    cover_url:        row.get(5)?,
    author_email:     row.get(6)?,
    created_at:       row.get(7)?,
    updated_at:       row.get(8)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quill blog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch_post(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
              rusqlite::params![id_str],
              read_post_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }
}

// ─── BlogStore impl ──────────────────────────────────────────────────────────

impl BlogStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn upsert_user(&self, principal: &Principal) -> Result<User> {
    let p       = principal.clone();
    let now_str = encode_dt(Utc::now());
    let new_id  = encode_uuid(Uuid::new_v4());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        let existing: Option<String> = conn
          .query_row(
            "SELECT id FROM users WHERE subject_id = ?1",
            rusqlite::params![p.subject_id],
            |r| r.get(0),
          )
          .optional()?;

        if existing.is_some() {
          conn.execute(
            "UPDATE users SET email = ?1, display_name = ?2, updated_at = ?3
             WHERE subject_id = ?4",
            rusqlite::params![p.email, p.display_name, now_str, p.subject_id],
          )?;
        } else {
          conn.execute(
            "INSERT INTO users (id, subject_id, email, display_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![new_id, p.subject_id, p.email, p.display_name, now_str, now_str],
          )?;
        }

        let raw = conn.query_row(
          "SELECT id, subject_id, email, display_name, created_at, updated_at
           FROM users WHERE subject_id = ?1",
          rusqlite::params![p.subject_id],
          |row| {
            Ok(RawUser {
              id:           row.get(0)?,
              subject_id:   row.get(1)?,
              email:        row.get(2)?,
              display_name: row.get(3)?,
              created_at:   row.get(4)?,
              updated_at:   row.get(5)?,
            })
          },
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_user()
  }

  async fn find_user(&self, subject_id: &str) -> Result<Option<User>> {
    let subject_id = subject_id.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, subject_id, email, display_name, created_at, updated_at
               FROM users WHERE subject_id = ?1",
              rusqlite::params![subject_id],
              |row| {
                Ok(RawUser {
                  id:           row.get(0)?,
                  subject_id:   row.get(1)?,
                  email:        row.get(2)?,
                  display_name: row.get(3)?,
                  created_at:   row.get(4)?,
                  updated_at:   row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let now  = Utc::now();
    let post = Post {
      id:               Uuid::new_v4(),
      owner_subject_id: input.owner_subject_id,
      title:            input.title,
      summary:          input.summary,
      content:          input.content,
      cover_url:        input.cover_url,
      author_email:     input.author_email,
      created_at:       now,
      updated_at:       now,
    };

    let id_str    = encode_uuid(post.id);
    let owner     = post.owner_subject_id.clone();
    let title     = post.title.clone();
    let summary   = post.summary.clone();
    let content   = post.content.clone();
    let cover_url = post.cover_url.clone();
    let email     = post.author_email.clone();
    let at_str    = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (id, owner_subject_id, title, summary, content,
                              cover_url, author_email, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, owner, title, summary, content, cover_url, email, at_str, at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    self.fetch_post(id).await
  }

  async fn list_posts_by_owner(
    &self,
    owner_subject_id: &str,
    limit: usize,
  ) -> Result<Vec<Post>> {
    let owner = owner_subject_id.to_owned();

    let raws: Vec<RawPost> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {POST_COLUMNS} FROM posts
           WHERE owner_subject_id = ?1
           ORDER BY created_at DESC, id DESC
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner, limit as i64], read_post_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<Option<Post>> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    // COALESCE keeps the stored value for any absent patch field; in
    // particular an absent cover_url never clears an existing cover.
    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET
             title      = COALESCE(?2, title),
             summary    = COALESCE(?3, summary),
             content    = COALESCE(?4, content),
             cover_url  = COALESCE(?5, cover_url),
             updated_at = ?6
           WHERE id = ?1",
          rusqlite::params![
            id_str,
            patch.title,
            patch.summary,
            patch.content,
            patch.cover_url,
            now_str,
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Ok(None);
    }
    self.fetch_post(id).await
  }

  async fn delete_post(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM posts WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}

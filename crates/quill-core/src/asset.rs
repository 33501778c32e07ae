//! The `AssetStore` trait — durable binary storage for cover images.

use std::future::Future;

/// Stores raw bytes outside the document store and hands back a publicly
/// resolvable URL.
///
/// Implementations must only return once the bytes are durably stored; the
/// post service persists the returned URL and never re-derives it.
pub trait AssetStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `bytes` under a collision-resistant key derived from
  /// `suggested_name` and return the retrieval URL.
  fn put<'a>(
    &'a self,
    bytes: &'a [u8],
    suggested_name: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

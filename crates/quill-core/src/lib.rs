//! Core types and trait definitions for the Quill blog backend.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod asset;
pub mod authz;
pub mod identity;
pub mod post;
pub mod store;

pub use authz::NotOwner;
pub use identity::{Principal, VerifyError};

//! Request handlers — the authorized post operations.

pub mod posts;
pub mod share;
pub mod users;

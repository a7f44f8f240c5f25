//! Networking layer: HTTP client, error taxonomy, wire types and the
//! per-resource endpoint helpers.

pub mod auth;
pub mod error;
pub mod http;
pub mod posts;
pub mod types;
pub mod user;

#[cfg(test)]
pub(crate) mod mock;

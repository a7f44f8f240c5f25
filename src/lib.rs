//! WordNest client core.
//!
//! SYSTEM CONTEXT
//! ==============
//! A thin client over the WordNest blogging REST API. The backend owns
//! authentication, persistence and pagination; this crate owns the request
//! plumbing, the session lifecycle and the view-local state that front ends
//! (the `wordnest` CLI, tests) drive.
//!
//! LAYOUT
//! ======
//! - [`storage`]: key-value capability and the single bearer-token slot.
//! - [`net`]: HTTP client, error taxonomy, wire types and the Auth, Posts
//!   and User endpoint helpers.
//! - [`state`]: session context plus post and profile editors.
//! - [`pages`]: feed, profile and login/signup view models.
//! - [`util`]: image selection rules and date rendering.

pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod storage;
pub mod util;

pub use config::{ClientConfig, ConfigError};
pub use net::error::ApiError;
pub use net::http::ApiClient;
pub use state::session::Session;
pub use storage::TokenStore;

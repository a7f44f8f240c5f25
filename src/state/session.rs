//! Session context: who is logged in, if anyone.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views hold a `&mut Session` and drive it through an explicit lifecycle:
//!
//! ```text
//! Uninitialized -> Loading -> { Authenticated(user), Anonymous }
//! Anonymous --login/signup ok--> Authenticated
//! any --logout--> Anonymous
//! ```
//!
//! A stored token only means "possibly authenticated"; [`Session::init`]
//! validates it with a profile fetch and drops it if the fetch fails.
//! Forced logout on a 401 elsewhere is a view decision, not made here.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::error::ApiError;
use crate::net::http::ApiClient;
use crate::net::types::User;
use crate::net::{auth, user};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Loading,
    Authenticated(User),
    Anonymous,
}

#[derive(Debug)]
pub struct Session {
    client: ApiClient,
    phase: SessionPhase,
}

impl Session {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client, phase: SessionPhase::Uninitialized }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.phase {
            SessionPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated(_))
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Uninitialized | SessionPhase::Loading)
    }

    /// Resolve the startup state from the stored token.
    ///
    /// No token: anonymous without any request. Token: profile fetch; any
    /// failure clears the token.
    pub async fn init(&mut self) {
        self.phase = SessionPhase::Loading;
        if !self.client.tokens().is_present() {
            self.phase = SessionPhase::Anonymous;
            return;
        }

        match user::get_profile(&self.client).await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "session restored");
                self.phase = SessionPhase::Authenticated(user);
            }
            Err(error) => {
                tracing::info!(%error, status = ?error.status(), "stored token rejected; starting anonymous");
                self.client.tokens().clear();
                self.phase = SessionPhase::Anonymous;
            }
        }
    }

    /// # Errors
    ///
    /// Returns the login failure; the phase is left unchanged.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ApiError> {
        let response = auth::login(&self.client, email, password).await?;
        self.phase = SessionPhase::Authenticated(response.user.clone());
        Ok(response.user)
    }

    /// # Errors
    ///
    /// Returns the signup failure; the phase is left unchanged.
    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let response = auth::signup(&self.client, username, email, password).await?;
        self.phase = SessionPhase::Authenticated(response.user.clone());
        Ok(response.user)
    }

    /// Drop the token and the user. Local only, cannot fail.
    pub fn logout(&mut self) {
        auth::logout(&self.client);
        self.phase = SessionPhase::Anonymous;
    }

    /// Re-fetch the current user. Never changes the authenticated/anonymous
    /// phase; only the held user record is replaced.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. A 401 here does not log out.
    pub async fn refresh_profile(&mut self) -> Result<User, ApiError> {
        let user = user::get_profile(&self.client).await?;
        self.update_user(user.clone());
        Ok(user)
    }

    /// Replace the held user with a record returned by an update call.
    /// Ignored when nobody is logged in.
    pub fn update_user(&mut self, user: User) {
        if self.is_authenticated() {
            self.phase = SessionPhase::Authenticated(user);
        }
    }
}

//! Login and signup forms.
//!
//! Both forms trim their inputs, check them locally, and only then hand the
//! credentials to the session. A busy form ignores further submits.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::state::profile_editor::MIN_PASSWORD_LEN;
use crate::state::session::Session;

pub const FIELDS_REQUIRED_MESSAGE: &str = "Please fill in all fields";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "Password must be at least 6 characters";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match";

#[derive(Clone, Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// # Errors
    ///
    /// Returns the message to show when a field is missing or malformed.
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(FIELDS_REQUIRED_MESSAGE);
        }
        if !email.contains('@') {
            return Err(INVALID_EMAIL_MESSAGE);
        }
        Ok(())
    }

    /// Log in through `session`. Returns `true` when the session became
    /// authenticated; otherwise the error slot holds the reason.
    pub async fn submit(&mut self, session: &mut Session) -> bool {
        if self.submitting {
            return false;
        }
        if let Err(message) = self.validate() {
            self.error = Some(message.to_owned());
            return false;
        }
        self.submitting = true;
        self.error = None;
        let result = session.login(self.email.trim(), &self.password).await;
        self.submitting = false;
        match result {
            Ok(_) => {
                self.password.clear();
                true
            }
            Err(error) => {
                self.error = Some(error.message().to_owned());
                false
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    error: Option<String>,
    submitting: bool,
}

impl SignupForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// # Errors
    ///
    /// Returns the message to show for the first failing rule.
    pub fn validate(&self) -> Result<(), &'static str> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(FIELDS_REQUIRED_MESSAGE);
        }
        if !email.contains('@') {
            return Err(INVALID_EMAIL_MESSAGE);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(PASSWORD_TOO_SHORT_MESSAGE);
        }
        if self.password != self.confirm_password {
            return Err(PASSWORD_MISMATCH_MESSAGE);
        }
        Ok(())
    }

    /// Create the account through `session`. Returns `true` when the session
    /// became authenticated.
    pub async fn submit(&mut self, session: &mut Session) -> bool {
        if self.submitting {
            return false;
        }
        if let Err(message) = self.validate() {
            self.error = Some(message.to_owned());
            return false;
        }
        self.submitting = true;
        self.error = None;
        let result = session.signup(self.username.trim(), self.email.trim(), &self.password).await;
        self.submitting = false;
        match result {
            Ok(_) => {
                self.password.clear();
                self.confirm_password.clear();
                true
            }
            Err(error) => {
                self.error = Some(error.message().to_owned());
                false
            }
        }
    }
}

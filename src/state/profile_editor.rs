//! Profile form state: account fields, password change and avatar.
//!
//! Field edits and the password change go out together as one partial
//! update containing only what differs from the last-known-good user. The
//! avatar has its own upload/remove actions.

#[cfg(test)]
#[path = "profile_editor_test.rs"]
mod profile_editor_test;

use super::post_editor::{NO_CHANGES_MESSAGE, fail, select_into};
use crate::net::error::ApiError;
use crate::net::http::ApiClient;
use crate::net::types::{ProfileUpdate, User};
use crate::net::user::{self, CURRENT_PASSWORD_REQUIRED_MESSAGE, PICTURE_REQUIRED_MESSAGE};
use crate::util::image::{ImageFile, ImagePreview, ImageSlot};

pub const USERNAME_EMAIL_REQUIRED_MESSAGE: &str = "Username and email are required";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "New password must be at least 6 characters";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "New passwords do not match";
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug)]
pub struct ProfileEditor {
    original: User,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    avatar: ImageSlot,
    error: Option<String>,
    submitting: bool,
}

impl ProfileEditor {
    #[must_use]
    pub fn new(user: &User) -> Self {
        Self {
            original: user.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone().unwrap_or_default(),
            current_password: String::new(),
            new_password: String::new(),
            confirm_password: String::new(),
            avatar: ImageSlot::with_remote(user.profile_picture_url.as_deref()),
            error: None,
            submitting: false,
        }
    }

    #[must_use]
    pub fn original(&self) -> &User {
        &self.original
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn avatar_preview(&self) -> Option<&ImagePreview> {
        self.avatar.preview()
    }

    pub fn select_avatar(&mut self, file: ImageFile) -> bool {
        select_into(&mut self.avatar, &mut self.error, file)
    }

    pub fn clear_avatar(&mut self) {
        self.avatar.clear(self.original.profile_picture_url.as_deref());
    }

    fn wants_password_change(&self) -> bool {
        !(self.current_password.is_empty() && self.new_password.is_empty() && self.confirm_password.is_empty())
    }

    /// Diff the draft against the last-known-good user.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message for invalid input or no changes.
    pub fn changes(&self) -> Result<ProfileUpdate, &'static str> {
        let username = self.username.trim();
        let email = self.email.trim();
        let bio = self.bio.trim();
        if username.is_empty() || email.is_empty() {
            return Err(USERNAME_EMAIL_REQUIRED_MESSAGE);
        }
        if !email.contains('@') {
            return Err(INVALID_EMAIL_MESSAGE);
        }

        let mut update = ProfileUpdate {
            username: (username != self.original.username).then(|| username.to_owned()),
            email: (email != self.original.email).then(|| email.to_owned()),
            bio: (bio != self.original.bio.as_deref().unwrap_or_default()).then(|| bio.to_owned()),
            ..ProfileUpdate::default()
        };

        if self.wants_password_change() {
            if self.current_password.is_empty() {
                return Err(CURRENT_PASSWORD_REQUIRED_MESSAGE);
            }
            if self.new_password.chars().count() < MIN_PASSWORD_LEN {
                return Err(PASSWORD_TOO_SHORT_MESSAGE);
            }
            if self.new_password != self.confirm_password {
                return Err(PASSWORD_MISMATCH_MESSAGE);
            }
            update.current_password = Some(self.current_password.clone());
            update.new_password = Some(self.new_password.clone());
        }

        if update.is_empty() {
            return Err(NO_CHANGES_MESSAGE);
        }
        Ok(update)
    }

    /// Send changed fields. On success the form is rebased onto the returned
    /// user and the password fields are cleared.
    ///
    /// # Errors
    ///
    /// Returns a validation error (no request made) or the request error.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<User, ApiError> {
        let update = match self.changes() {
            Ok(update) => update,
            Err(message) => return Err(fail(&mut self.error, ApiError::validation(message))),
        };
        let user = self.run(user::update_profile(client, &update)).await?;
        *self = Self::new(&user);
        Ok(user)
    }

    /// Upload the selected avatar. Unsaved field drafts are kept.
    ///
    /// # Errors
    ///
    /// Returns a validation error if no image is selected, otherwise the
    /// request error.
    pub async fn upload_avatar(&mut self, client: &ApiClient) -> Result<User, ApiError> {
        let Some(file) = self.avatar.pending().cloned() else {
            return Err(fail(&mut self.error, ApiError::validation(PICTURE_REQUIRED_MESSAGE)));
        };
        let user = self.run(user::upload_profile_picture(client, file)).await?;
        self.rebase_avatar(&user);
        Ok(user)
    }

    /// Remove the stored avatar. Unsaved field drafts are kept.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn remove_avatar(&mut self, client: &ApiClient) -> Result<User, ApiError> {
        let user = self.run(user::remove_profile_picture(client)).await?;
        self.rebase_avatar(&user);
        Ok(user)
    }

    /// Adopt `user` as the last-known-good record and show its avatar,
    /// leaving the draft fields untouched.
    pub fn rebase_avatar(&mut self, user: &User) {
        self.original = user.clone();
        self.avatar = ImageSlot::with_remote(user.profile_picture_url.as_deref());
    }

    async fn run(&mut self, call: impl Future<Output = Result<User, ApiError>>) -> Result<User, ApiError> {
        self.submitting = true;
        self.error = None;
        let result = call.await;
        self.submitting = false;
        result.map_err(|error| fail(&mut self.error, error))
    }
}

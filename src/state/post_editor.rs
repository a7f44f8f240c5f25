//! Post composer (create) and editor (update) form state.
//!
//! DESIGN
//! ======
//! Both forms keep draft text, an [`ImageSlot`], an error slot and a
//! submitting flag. The editor diffs its draft against the last record the
//! server returned and sends only what changed; an unchanged draft never
//! reaches the network.

#[cfg(test)]
#[path = "post_editor_test.rs"]
mod post_editor_test;

use crate::net::error::ApiError;
use crate::net::http::ApiClient;
use crate::net::posts::{self, PostUpdate, TITLE_CONTENT_REQUIRED_MESSAGE};
use crate::net::types::Post;
use crate::util::image::{ImageFile, ImagePreview, ImageSlot};

pub const NO_CHANGES_MESSAGE: &str = "No changes to save";

// =============================================================================
// COMPOSER
// =============================================================================

#[derive(Clone, Debug, Default)]
pub struct PostComposer {
    pub title: String,
    pub content: String,
    image: ImageSlot,
    error: Option<String>,
    submitting: bool,
}

impl PostComposer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` and sets the error slot if the file is rejected.
    pub fn select_image(&mut self, file: ImageFile) -> bool {
        select_into(&mut self.image, &mut self.error, file)
    }

    pub fn clear_image(&mut self) {
        self.image.clear(None);
    }

    #[must_use]
    pub fn preview(&self) -> Option<&ImagePreview> {
        self.image.preview()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Create the post. Resets the form on success.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank fields (no request is made) or
    /// the request error. Either way the message lands in the error slot.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Post, ApiError> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(fail(&mut self.error, ApiError::validation(TITLE_CONTENT_REQUIRED_MESSAGE)));
        }

        self.submitting = true;
        self.error = None;
        let result = posts::create(client, &self.title, &self.content, self.image.pending().cloned()).await;
        self.submitting = false;

        match result {
            Ok(post) => {
                *self = Self::default();
                Ok(post)
            }
            Err(error) => Err(fail(&mut self.error, error)),
        }
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// Edit-mode state for one existing post.
#[derive(Clone, Debug)]
pub struct PostEditor {
    post_id: i64,
    original_title: String,
    original_content: String,
    original_image: Option<String>,
    pub title: String,
    pub content: String,
    image: ImageSlot,
    error: Option<String>,
    submitting: bool,
}

impl PostEditor {
    #[must_use]
    pub fn new(post: &Post) -> Self {
        Self {
            post_id: post.id,
            original_title: post.title.clone(),
            original_content: post.content.clone(),
            original_image: post.image_url.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            image: ImageSlot::with_remote(post.image_url.as_deref()),
            error: None,
            submitting: false,
        }
    }

    #[must_use]
    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    pub fn select_image(&mut self, file: ImageFile) -> bool {
        select_into(&mut self.image, &mut self.error, file)
    }

    /// Drop a newly selected image, going back to the stored one.
    pub fn clear_image(&mut self) {
        self.image.clear(self.original_image.as_deref());
    }

    #[must_use]
    pub fn preview(&self) -> Option<&ImagePreview> {
        self.image.preview()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Diff the draft against the last-known-good record.
    ///
    /// # Errors
    ///
    /// Returns the user-facing message when the draft is blank or unchanged.
    pub fn changes(&self) -> Result<PostUpdate, &'static str> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(TITLE_CONTENT_REQUIRED_MESSAGE);
        }

        let update = PostUpdate {
            title: (title != self.original_title).then(|| title.to_owned()),
            content: (content != self.original_content).then(|| content.to_owned()),
            image: self.image.pending().cloned(),
        };
        if update.is_empty() {
            return Err(NO_CHANGES_MESSAGE);
        }
        Ok(update)
    }

    /// Send the changed fields. On success the editor is rebased onto the
    /// returned record; the owner is expected to leave edit mode and patch
    /// its list with the returned post.
    ///
    /// # Errors
    ///
    /// Returns a validation error (no request made) or the request error.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Post, ApiError> {
        let update = match self.changes() {
            Ok(update) => update,
            Err(message) => return Err(fail(&mut self.error, ApiError::validation(message))),
        };

        self.submitting = true;
        self.error = None;
        let result = posts::update(client, self.post_id, update).await;
        self.submitting = false;

        match result {
            Ok(post) => {
                *self = Self::new(&post);
                Ok(post)
            }
            Err(error) => Err(fail(&mut self.error, error)),
        }
    }
}

pub(crate) fn select_into(slot: &mut ImageSlot, error: &mut Option<String>, file: ImageFile) -> bool {
    match slot.select(file) {
        Ok(()) => {
            *error = None;
            true
        }
        Err(message) => {
            *error = Some(message.to_owned());
            false
        }
    }
}

pub(crate) fn fail(slot: &mut Option<String>, error: ApiError) -> ApiError {
    *slot = Some(error.message().to_owned());
    error
}

//! Profile screen: the user's account, stats and own posts.
//!
//! Profile, stats and user-posts endpoints may be missing on older
//! backends. A 404 from any of them degrades to a local fallback and logs a
//! warning naming the endpoint so the gap stays visible.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use super::{PageOutcome, next_page, previous_page, settle_error, target_page};
use crate::net::error::ApiError;
use crate::net::posts::{self, DEFAULT_PAGE_SIZE};
use crate::net::types::{Pagination, Post, PostsPage, User, UserStats};
use crate::net::user;
use crate::state::profile_editor::ProfileEditor;
use crate::state::session::Session;
use crate::util::image::ImageFile;

#[derive(Clone, Debug)]
pub struct ProfilePage {
    pub user: Option<User>,
    pub stats: UserStats,
    pub posts: Vec<Post>,
    pub pagination: Option<Pagination>,
    pub limit: u32,
    loading: bool,
    error: Option<String>,
    editor: Option<ProfileEditor>,
}

impl Default for ProfilePage {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// Map a 404 to `fallback`, logging which endpoint was missing.
fn degrade_not_found<T>(result: Result<T, ApiError>, endpoint: &str, fallback: impl FnOnce() -> T) -> Result<T, ApiError> {
    match result {
        Err(error) if error.is_not_found() => {
            tracing::warn!(%endpoint, "endpoint returned 404; using fallback");
            Ok(fallback())
        }
        other => other,
    }
}

impl ProfilePage {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            user: None,
            stats: UserStats::default(),
            posts: Vec::new(),
            pagination: None,
            limit: limit.max(1),
            loading: false,
            error: None,
            editor: None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.pagination.map_or(1, |p| p.current_page)
    }

    /// Load profile, stats and the first page of posts. Anonymous sessions
    /// are sent to login without any request.
    pub async fn load(&mut self, session: &mut Session) -> PageOutcome {
        let Some(session_user) = session.user().cloned() else {
            return PageOutcome::RedirectToLogin;
        };
        self.loading = true;
        let result = self.fetch_all(session, session_user).await;
        self.loading = false;
        match result {
            Ok(()) => {
                self.error = None;
                PageOutcome::Updated
            }
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }

    async fn fetch_all(&mut self, session: &mut Session, session_user: User) -> Result<(), ApiError> {
        let client = session.client().clone();
        let profile = degrade_not_found(user::get_profile(&client).await, "/api/user/profile", || session_user)?;
        let stats = degrade_not_found(user::get_user_stats(&client).await, "/api/user/stats", UserStats::default)?;
        let listing = degrade_not_found(
            user::get_user_posts(&client, 1, self.limit).await,
            "/api/user/posts",
            PostsPage::empty,
        )?;

        session.update_user(profile.clone());
        self.user = Some(profile);
        self.stats = stats;
        self.posts = listing.posts;
        self.pagination = Some(listing.pagination);
        Ok(())
    }

    /// Fetch one page of the user's posts.
    pub async fn load_posts(&mut self, session: &mut Session, page: u32) -> PageOutcome {
        self.loading = true;
        let result = user::get_user_posts(session.client(), page, self.limit).await;
        self.loading = false;
        match degrade_not_found(result, "/api/user/posts", PostsPage::empty) {
            Ok(listing) => {
                self.posts = listing.posts;
                self.pagination = Some(listing.pagination);
                self.error = None;
                PageOutcome::Updated
            }
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }

    /// Fetch the post stats alone.
    pub async fn load_stats(&mut self, session: &mut Session) -> PageOutcome {
        self.loading = true;
        let result = user::get_user_stats(session.client()).await;
        self.loading = false;
        match degrade_not_found(result, "/api/user/stats", UserStats::default) {
            Ok(stats) => {
                self.stats = stats;
                self.error = None;
                PageOutcome::Updated
            }
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }

    pub async fn go_to_page(&mut self, session: &mut Session, page: u32) -> PageOutcome {
        match target_page(self.pagination.as_ref(), page) {
            Some(page) => self.load_posts(session, page).await,
            None => PageOutcome::Ignored,
        }
    }

    pub async fn next(&mut self, session: &mut Session) -> PageOutcome {
        match next_page(self.pagination.as_ref()) {
            Some(page) => self.load_posts(session, page).await,
            None => PageOutcome::Ignored,
        }
    }

    pub async fn previous(&mut self, session: &mut Session) -> PageOutcome {
        match previous_page(self.pagination.as_ref()) {
            Some(page) => self.load_posts(session, page).await,
            None => PageOutcome::Ignored,
        }
    }

    /// Open the profile editor on the loaded user.
    pub fn begin_edit(&mut self) -> PageOutcome {
        match &self.user {
            Some(user) => {
                self.editor = Some(ProfileEditor::new(user));
                PageOutcome::Updated
            }
            None => PageOutcome::Ignored,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    #[must_use]
    pub fn editor(&self) -> Option<&ProfileEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut ProfileEditor> {
        self.editor.as_mut()
    }

    /// Save the editor's changes. Success closes the editor and pushes the
    /// new user into the session.
    pub async fn submit_edit(&mut self, session: &mut Session) -> PageOutcome {
        let Some(editor) = self.editor.as_mut() else {
            return PageOutcome::Ignored;
        };
        let result = editor.submit(session.client()).await;
        match result {
            Ok(updated) => {
                self.editor = None;
                self.apply_user(session, updated);
                PageOutcome::Updated
            }
            Err(error) => self.settle_editor_error(session, &error),
        }
    }

    /// Select and immediately upload a new avatar.
    ///
    /// An editor opened only for the upload closes again on success; an
    /// editor the user already had open stays open with its drafts.
    pub async fn upload_avatar(&mut self, session: &mut Session, file: ImageFile) -> PageOutcome {
        let opened_here = self.editor.is_none();
        if opened_here && self.begin_edit() == PageOutcome::Ignored {
            return PageOutcome::Ignored;
        }
        let Some(editor) = self.editor.as_mut() else {
            return PageOutcome::Ignored;
        };
        if !editor.select_avatar(file) {
            return PageOutcome::Failed;
        }
        match editor.upload_avatar(session.client()).await {
            Ok(updated) => {
                if opened_here {
                    self.editor = None;
                }
                self.apply_user(session, updated);
                PageOutcome::Updated
            }
            Err(error) => self.settle_editor_error(session, &error),
        }
    }

    /// Drop the avatar. An open editor keeps its drafts.
    pub async fn remove_avatar(&mut self, session: &mut Session) -> PageOutcome {
        match user::remove_profile_picture(session.client()).await {
            Ok(updated) => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.rebase_avatar(&updated);
                }
                self.apply_user(session, updated);
                PageOutcome::Updated
            }
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }

    /// Delete one of the listed posts and adjust the counters.
    pub async fn delete_post(&mut self, session: &mut Session, post_id: i64) -> PageOutcome {
        match posts::delete(session.client(), post_id).await {
            Ok(_) => {
                self.posts.retain(|post| post.id != post_id);
                if let Some(pagination) = self.pagination.as_mut() {
                    pagination.total_posts = pagination.total_posts.saturating_sub(1);
                }
                self.stats.total_posts = self.stats.total_posts.saturating_sub(1);
                self.error = None;
                PageOutcome::Updated
            }
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }

    fn apply_user(&mut self, session: &mut Session, updated: User) {
        session.update_user(updated.clone());
        self.user = Some(updated);
        self.error = None;
    }

    fn settle_editor_error(&mut self, session: &mut Session, error: &ApiError) -> PageOutcome {
        if error.is_validation() {
            return PageOutcome::Failed;
        }
        let outcome = settle_error(session, &mut self.error, error);
        if outcome == PageOutcome::RedirectToLogin {
            self.editor = None;
        }
        outcome
    }
}

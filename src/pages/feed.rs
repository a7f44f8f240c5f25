//! Public feed: paginated post list with create, edit and delete.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use super::{PageOutcome, next_page, previous_page, settle_error, target_page};
use crate::net::posts::{self, DEFAULT_PAGE_SIZE};
use crate::net::types::{Pagination, Post};
use crate::state::post_editor::{PostComposer, PostEditor};
use crate::state::session::Session;

#[derive(Clone, Debug)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub pagination: Option<Pagination>,
    pub limit: u32,
    pub composer: PostComposer,
    loading: bool,
    error: Option<String>,
    editor: Option<PostEditor>,
}

impl Default for FeedPage {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl FeedPage {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            posts: Vec::new(),
            pagination: None,
            limit: limit.max(1),
            composer: PostComposer::new(),
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

    /// Fetch `page` unconditionally, replacing the list on success.
    pub async fn load_page(&mut self, session: &mut Session, page: u32) -> PageOutcome {
        self.loading = true;
        let result = posts::list(session.client(), page, self.limit).await;
        self.loading = false;
        match result {
            Ok(listing) => {
                self.posts = listing.posts;
                self.pagination = Some(listing.pagination);
                self.error = None;
                PageOutcome::Updated
            }
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }

    pub async fn reload(&mut self, session: &mut Session) -> PageOutcome {
        let page = self.current_page();
        self.load_page(session, page).await
    }

    /// Navigate to `page`; out-of-range or current pages are ignored.
    pub async fn go_to_page(&mut self, session: &mut Session, page: u32) -> PageOutcome {
        match target_page(self.pagination.as_ref(), page) {
            Some(page) => self.load_page(session, page).await,
            None => PageOutcome::Ignored,
        }
    }

    pub async fn next(&mut self, session: &mut Session) -> PageOutcome {
        match next_page(self.pagination.as_ref()) {
            Some(page) => self.load_page(session, page).await,
            None => PageOutcome::Ignored,
        }
    }

    pub async fn previous(&mut self, session: &mut Session) -> PageOutcome {
        match previous_page(self.pagination.as_ref()) {
            Some(page) => self.load_page(session, page).await,
            None => PageOutcome::Ignored,
        }
    }

    /// Whether the logged-in user authored `post`.
    #[must_use]
    pub fn can_edit(session: &Session, post: &Post) -> bool {
        session
            .user()
            .is_some_and(|user| user.username == post.author_name || post.user_id == Some(user.id))
    }

    /// Submit the composer; on success the first page is re-fetched so the
    /// new post shows in server order.
    pub async fn create_post(&mut self, session: &mut Session) -> PageOutcome {
        match self.composer.submit(session.client()).await {
            Ok(post) => {
                tracing::debug!(post_id = post.id, "refreshing feed after create");
                self.load_page(session, 1).await
            }
            Err(error) if error.is_validation() => PageOutcome::Failed,
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }

    /// Enter edit mode for one of the user's own posts.
    pub fn begin_edit(&mut self, session: &Session, post_id: i64) -> PageOutcome {
        let Some(post) = self.posts.iter().find(|post| post.id == post_id) else {
            return PageOutcome::Ignored;
        };
        if !Self::can_edit(session, post) {
            return PageOutcome::Ignored;
        }
        self.editor = Some(PostEditor::new(post));
        PageOutcome::Updated
    }

    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    #[must_use]
    pub fn editor(&self) -> Option<&PostEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut PostEditor> {
        self.editor.as_mut()
    }

    /// Submit the open editor. Success leaves edit mode and patches the list
    /// with the server's record; a local validation failure stays in the
    /// editor's error slot.
    pub async fn submit_edit(&mut self, session: &mut Session) -> PageOutcome {
        let Some(editor) = self.editor.as_mut() else {
            return PageOutcome::Ignored;
        };
        match editor.submit(session.client()).await {
            Ok(post) => {
                self.editor = None;
                self.apply_updated(post);
                PageOutcome::Updated
            }
            Err(error) if error.is_validation() => PageOutcome::Failed,
            Err(error) => {
                let outcome = settle_error(session, &mut self.error, &error);
                if outcome == PageOutcome::RedirectToLogin {
                    self.editor = None;
                }
                outcome
            }
        }
    }

    /// Replace the matching post in place.
    pub fn apply_updated(&mut self, post: Post) {
        if let Some(slot) = self.posts.iter_mut().find(|existing| existing.id == post.id) {
            *slot = post;
        }
    }

    pub async fn delete_post(&mut self, session: &mut Session, post_id: i64) -> PageOutcome {
        match posts::delete(session.client(), post_id).await {
            Ok(_) => {
                self.posts.retain(|post| post.id != post_id);
                if let Some(pagination) = self.pagination.as_mut() {
                    pagination.total_posts = pagination.total_posts.saturating_sub(1);
                }
                if self.editor.as_ref().is_some_and(|editor| editor.post_id() == post_id) {
                    self.editor = None;
                }
                self.error = None;
                PageOutcome::Updated
            }
            Err(error) => settle_error(session, &mut self.error, &error),
        }
    }
}

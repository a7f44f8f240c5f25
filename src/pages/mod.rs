//! View models for the feed, profile and login/signup screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages own their list/form state and borrow the [`Session`] per call.
//! A 401 on an explicit fetch is the one place a page changes the session:
//! it forces a logout and asks the front end to show the login screen.

pub mod feed;
pub mod login;
pub mod profile;

use crate::net::error::ApiError;
use crate::net::types::Pagination;
use crate::state::session::Session;

/// What a page action did, for the front end to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageOutcome {
    /// State changed; re-render.
    Updated,
    /// The action was a no-op (out-of-range page, nothing to edit).
    Ignored,
    /// The action failed; the page's error slot holds the message.
    Failed,
    /// The session was dropped; navigate to login.
    RedirectToLogin,
}

/// Record `error` in `slot` and apply the forced-logout policy.
pub(crate) fn settle_error(session: &mut Session, slot: &mut Option<String>, error: &ApiError) -> PageOutcome {
    *slot = Some(error.message().to_owned());
    if error.is_unauthorized() {
        tracing::info!("request unauthorized; forcing logout");
        session.logout();
        return PageOutcome::RedirectToLogin;
    }
    PageOutcome::Failed
}

/// Page to fetch for a navigation request, or `None` when `page` is out of
/// `1..=total_pages` or already showing. Without a cursor any page from 1
/// up is allowed.
#[must_use]
pub fn target_page(pagination: Option<&Pagination>, page: u32) -> Option<u32> {
    if page == 0 {
        return None;
    }
    let Some(pagination) = pagination else {
        return Some(page);
    };
    if page > pagination.total_pages.max(1) || page == pagination.current_page {
        return None;
    }
    Some(page)
}

/// Next page per the server's cursor flags.
#[must_use]
pub fn next_page(pagination: Option<&Pagination>) -> Option<u32> {
    pagination.filter(|p| p.has_next_page).and_then(|p| p.current_page.checked_add(1))
}

/// Previous page per the server's cursor flags.
#[must_use]
pub fn previous_page(pagination: Option<&Pagination>) -> Option<u32> {
    pagination
        .filter(|p| p.has_previous_page && p.current_page > 1)
        .map(|p| p.current_page - 1)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

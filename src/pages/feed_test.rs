use super::*;
use crate::net::http::{Method, RequestBody};
use crate::net::mock::{MockTransport, client_with, page_json, post_json, user_json};
use crate::state::session::SessionPhase;
use serde_json::json;
use std::sync::Arc;

async fn session_as_ada(mock: &Arc<MockTransport>) -> Session {
    mock.push_json(200, user_json(1, "ada"));
    let mut session = Session::new(client_with(mock, Some("tok")));
    session.init().await;
    session
}

async fn feed_on_page(mock: &Arc<MockTransport>, session: &mut Session, page: u32, total: u32) -> FeedPage {
    mock.push_json(200, page_json(vec![post_json(1, "Mine", "ada"), post_json(2, "Theirs", "bob")], page, total));
    let mut feed = FeedPage::new(10);
    assert_eq!(feed.load_page(session, page).await, PageOutcome::Updated);
    feed
}

#[tokio::test]
async fn load_page_fills_posts_and_cursor() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let feed = feed_on_page(&mock, &mut session, 2, 5).await;
    assert_eq!(feed.posts.len(), 2);
    assert_eq!(feed.current_page(), 2);
    assert!(!feed.is_loading());
    assert!(mock.last_request().url.ends_with("/api/posts?page=2&limit=10"));
}

#[tokio::test]
async fn page_six_of_five_is_a_no_op_and_page_one_loads() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let mut feed = feed_on_page(&mock, &mut session, 2, 5).await;
    let before = mock.request_count();

    assert_eq!(feed.go_to_page(&mut session, 6).await, PageOutcome::Ignored);
    assert_eq!(mock.request_count(), before);

    mock.push_json(200, page_json(vec![post_json(3, "First", "bob")], 1, 5));
    assert_eq!(feed.go_to_page(&mut session, 1).await, PageOutcome::Updated);
    assert_eq!(feed.current_page(), 1);
    assert_eq!(feed.posts[0].title, "First");
}

#[tokio::test]
async fn next_and_previous_respect_flags() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let mut feed = feed_on_page(&mock, &mut session, 1, 1).await;
    assert_eq!(feed.next(&mut session).await, PageOutcome::Ignored);
    assert_eq!(feed.previous(&mut session).await, PageOutcome::Ignored);
}

#[tokio::test]
async fn unauthorized_fetch_forces_logout() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    mock.push_json(401, json!({ "error": "Token expired" }));

    let mut feed = FeedPage::default();
    assert_eq!(feed.load_page(&mut session, 1).await, PageOutcome::RedirectToLogin);
    assert_eq!(session.phase(), &SessionPhase::Anonymous);
    assert_eq!(feed.error(), Some("Token expired"));
}

#[tokio::test]
async fn connectivity_failure_keeps_session() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    mock.push_unreachable();

    let mut feed = FeedPage::default();
    assert_eq!(feed.load_page(&mut session, 1).await, PageOutcome::Failed);
    assert!(session.is_authenticated());
    assert!(feed.error().unwrap().contains("Cannot connect"));
}

#[tokio::test]
async fn only_own_posts_can_be_edited() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let mut feed = feed_on_page(&mock, &mut session, 1, 1).await;

    assert_eq!(feed.begin_edit(&session, 2), PageOutcome::Ignored);
    assert_eq!(feed.begin_edit(&session, 99), PageOutcome::Ignored);
    assert_eq!(feed.begin_edit(&session, 1), PageOutcome::Updated);
    assert_eq!(feed.editor().unwrap().post_id(), 1);
    feed.cancel_edit();
    assert!(feed.editor().is_none());
}

#[tokio::test]
async fn submit_edit_patches_list_and_exits_edit_mode() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let mut feed = feed_on_page(&mock, &mut session, 1, 1).await;

    feed.begin_edit(&session, 1);
    feed.editor_mut().unwrap().title = "Mine, revised".into();
    mock.push_json(200, json!({ "post": post_json(1, "Mine, revised", "ada") }));

    assert_eq!(feed.submit_edit(&mut session).await, PageOutcome::Updated);
    assert!(feed.editor().is_none());
    assert_eq!(feed.posts[0].title, "Mine, revised");
    assert_eq!(mock.last_request().method, Method::Put);
    assert_eq!(mock.last_request().body, RequestBody::Json(json!({ "title": "Mine, revised" })));
}

#[tokio::test]
async fn submit_edit_without_changes_stays_in_edit_mode() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let mut feed = feed_on_page(&mock, &mut session, 1, 1).await;
    let before = mock.request_count();

    feed.begin_edit(&session, 1);
    assert_eq!(feed.submit_edit(&mut session).await, PageOutcome::Failed);
    assert_eq!(feed.editor().unwrap().error(), Some("No changes to save"));
    assert_eq!(mock.request_count(), before);
}

#[tokio::test]
async fn delete_removes_post_locally() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let mut feed = feed_on_page(&mock, &mut session, 1, 1).await;
    mock.push_json(200, json!({ "message": "Post deleted successfully" }));

    assert_eq!(feed.delete_post(&mut session, 1).await, PageOutcome::Updated);
    assert_eq!(feed.posts.len(), 1);
    assert_eq!(feed.pagination.unwrap().total_posts, 9);
}

#[tokio::test]
async fn create_post_refreshes_first_page() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let mut feed = FeedPage::default();
    feed.composer.title = "T".into();
    feed.composer.content = "C".into();

    mock.push_json(201, json!({ "post": post_json(10, "T", "ada") }));
    mock.push_json(200, page_json(vec![post_json(10, "T", "ada")], 1, 1));

    assert_eq!(feed.create_post(&mut session).await, PageOutcome::Updated);
    assert_eq!(feed.posts[0].id, 10);
    assert!(mock.last_request().url.ends_with("/api/posts?page=1&limit=10"));
}

#[tokio::test]
async fn create_post_validation_stays_local() {
    let mock = MockTransport::new();
    let mut session = session_as_ada(&mock).await;
    let before = mock.request_count();
    let mut feed = FeedPage::default();
    feed.composer.content = "x".into();

    assert_eq!(feed.create_post(&mut session).await, PageOutcome::Failed);
    assert_eq!(feed.composer.error(), Some("Title and content are required"));
    assert_eq!(mock.request_count(), before);
}

//! Recording transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::http::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use crate::storage::TokenStore;

pub(crate) const BASE_URL: &str = "http://api.test";

/// Replays queued responses in order and records every request it sees.
/// An unexpected request (empty queue) fails like an unreachable server.
#[derive(Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_json(&self, status: u16, body: Value) -> &Self {
        self.push_raw(status, &body.to_string())
    }

    pub(crate) fn push_raw(&self, status: u16, body: &str) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            status_text: reason(status).to_owned(),
            body: body.to_owned(),
        }));
        self
    }

    pub(crate) fn push_unreachable(&self) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError("error sending request: connection refused".to_owned())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no mock response queued".to_owned())))
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Client over `mock`, with `token` pre-stored when given.
pub(crate) fn client_with(mock: &Arc<MockTransport>, token: Option<&str>) -> ApiClient {
    let tokens = TokenStore::in_memory();
    if let Some(token) = token {
        tokens.set(token);
    }
    ApiClient::new(BASE_URL, tokens, mock.clone())
}

pub(crate) fn user_json(id: i64, username: &str) -> Value {
    serde_json::json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "bio": null,
        "profile_picture_url": null,
        "created_at": "2024-03-04T10:00:00.000Z",
        "post_count": 2
    })
}

pub(crate) fn post_json(id: i64, title: &str, author: &str) -> Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "content": format!("{title} body"),
        "image_url": null,
        "author_name": author,
        "created_at": "2024-03-05T09:00:00.000Z"
    })
}

pub(crate) fn page_json(posts: Vec<Value>, current: u32, total_pages: u32) -> Value {
    serde_json::json!({
        "posts": posts,
        "pagination": {
            "currentPage": current,
            "totalPages": total_pages,
            "totalPosts": total_pages * 10,
            "hasNextPage": current < total_pages,
            "hasPreviousPage": current > 1
        }
    })
}

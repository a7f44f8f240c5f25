//! Posts endpoints.
//!
//! Create and update send multipart when an image is attached and JSON
//! otherwise. All argument checks happen before the request is built.

#[cfg(test)]
#[path = "posts_test.rs"]
mod posts_test;

use serde_json::{Map, Value};

use super::error::ApiError;
use super::http::{ApiClient, Method, MultipartForm, RequestBody};
use super::types::{MessageResponse, Post, PostEnvelope, PostsPage};
use crate::util::image::ImageFile;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const TITLE_CONTENT_REQUIRED_MESSAGE: &str = "Title and content are required";
pub const TITLE_CONTENT_EMPTY_MESSAGE: &str = "Title and content cannot be empty";
pub const UPDATE_EMPTY_MESSAGE: &str = "At least one field must be provided to update";
pub const POST_ID_REQUIRED_MESSAGE: &str = "Post ID is required";
pub const PAGE_RANGE_MESSAGE: &str = "Page and limit must be at least 1";

/// Partial post update. Only `Some` fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<ImageFile>,
}

impl PostUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.image.is_none()
    }
}

pub(crate) fn check_page(page: u32, limit: u32) -> Result<(), ApiError> {
    if page == 0 || limit == 0 {
        return Err(ApiError::validation(PAGE_RANGE_MESSAGE));
    }
    Ok(())
}

fn check_id(id: i64) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(POST_ID_REQUIRED_MESSAGE));
    }
    Ok(())
}

/// Encode title/content/image as multipart when an image is present,
/// otherwise as a JSON object of the present fields.
fn encode_post_body(title: Option<&str>, content: Option<&str>, image: Option<ImageFile>) -> RequestBody {
    if let Some(image) = image {
        let mut form = MultipartForm::new();
        if let Some(title) = title {
            form = form.text("title", title);
        }
        if let Some(content) = content {
            form = form.text("content", content);
        }
        return RequestBody::Multipart(form.file("image", image));
    }

    let mut body = Map::new();
    if let Some(title) = title {
        body.insert("title".to_owned(), Value::String(title.to_owned()));
    }
    if let Some(content) = content {
        body.insert("content".to_owned(), Value::String(content.to_owned()));
    }
    RequestBody::Json(Value::Object(body))
}

/// Fetch one page of the public feed via `GET /api/posts`.
///
/// # Errors
///
/// Returns a validation error for a zero page or limit, otherwise any
/// request error.
pub async fn list(client: &ApiClient, page: u32, limit: u32) -> Result<PostsPage, ApiError> {
    check_page(page, limit)?;
    let path = format!("/api/posts?page={page}&limit={limit}");
    client.request_as(Method::Get, &path, RequestBody::Empty).await
}

/// Fetch a single post via `GET /api/posts/:id`.
///
/// # Errors
///
/// Returns a validation error for a non-positive id, otherwise any request
/// error.
pub async fn get_by_id(client: &ApiClient, id: i64) -> Result<Post, ApiError> {
    check_id(id)?;
    client.request_as(Method::Get, &format!("/api/posts/{id}"), RequestBody::Empty).await
}

/// Create a post via `POST /api/posts`.
///
/// # Errors
///
/// Returns a validation error when title or content is blank, otherwise any
/// request error.
pub async fn create(client: &ApiClient, title: &str, content: &str, image: Option<ImageFile>) -> Result<Post, ApiError> {
    let (title, content) = (title.trim(), content.trim());
    if title.is_empty() || content.is_empty() {
        return Err(ApiError::validation(TITLE_CONTENT_REQUIRED_MESSAGE));
    }
    let body = encode_post_body(Some(title), Some(content), image);
    let envelope: PostEnvelope = client.request_as(Method::Post, "/api/posts", body).await?;
    tracing::info!(post_id = envelope.post.id, "post created");
    Ok(envelope.post)
}

/// Update a post via `PUT /api/posts/:id`.
///
/// # Errors
///
/// Returns a validation error for a non-positive id, an empty update, or a
/// blank title/content, otherwise any request error.
pub async fn update(client: &ApiClient, id: i64, update: PostUpdate) -> Result<Post, ApiError> {
    check_id(id)?;
    if update.is_empty() {
        return Err(ApiError::validation(UPDATE_EMPTY_MESSAGE));
    }
    let title = update.title.as_deref().map(str::trim);
    let content = update.content.as_deref().map(str::trim);
    if title.is_some_and(str::is_empty) || content.is_some_and(str::is_empty) {
        return Err(ApiError::validation(TITLE_CONTENT_EMPTY_MESSAGE));
    }
    let body = encode_post_body(title, content, update.image);
    let envelope: PostEnvelope = client.request_as(Method::Put, &format!("/api/posts/{id}"), body).await?;
    tracing::info!(post_id = id, "post updated");
    Ok(envelope.post)
}

/// Delete a post via `DELETE /api/posts/:id`.
///
/// # Errors
///
/// Returns a validation error for a non-positive id, otherwise any request
/// error.
pub async fn delete(client: &ApiClient, id: i64) -> Result<MessageResponse, ApiError> {
    check_id(id)?;
    let response = client
        .request_as(Method::Delete, &format!("/api/posts/{id}"), RequestBody::Empty)
        .await?;
    tracing::info!(post_id = id, "post deleted");
    Ok(response)
}

//! Current-user endpoints: profile, avatar, own posts and stats.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use super::error::ApiError;
use super::http::{ApiClient, Method, MultipartForm, RequestBody};
use super::posts::check_page;
use super::types::{PostsPage, ProfileUpdate, User, UserEnvelope, UserStats};
use crate::util::image::ImageFile;

pub const PROFILE_UPDATE_EMPTY_MESSAGE: &str = "No changes to save";
pub const CURRENT_PASSWORD_REQUIRED_MESSAGE: &str = "Current password is required to set a new password";
pub const NEW_PASSWORD_REQUIRED_MESSAGE: &str = "New password is required";
pub const PICTURE_REQUIRED_MESSAGE: &str = "Please select an image to upload";

/// Fetch the authenticated user via `GET /api/user/profile`.
///
/// # Errors
///
/// Returns any request error; a 401 means the stored token is not valid.
pub async fn get_profile(client: &ApiClient) -> Result<User, ApiError> {
    client.request_as(Method::Get, "/api/user/profile", RequestBody::Empty).await
}

/// Update profile fields or change the password via `PUT /api/user/profile`.
///
/// # Errors
///
/// Returns a validation error for an empty update or an incomplete password
/// change, otherwise any request error.
pub async fn update_profile(client: &ApiClient, update: &ProfileUpdate) -> Result<User, ApiError> {
    if update.is_empty() {
        return Err(ApiError::validation(PROFILE_UPDATE_EMPTY_MESSAGE));
    }
    match (&update.current_password, &update.new_password) {
        (None, Some(_)) => return Err(ApiError::validation(CURRENT_PASSWORD_REQUIRED_MESSAGE)),
        (Some(_), None) => return Err(ApiError::validation(NEW_PASSWORD_REQUIRED_MESSAGE)),
        _ => {}
    }
    let body = serde_json::to_value(update).map_err(|e| ApiError::validation(e.to_string()))?;
    let envelope: UserEnvelope = client.request_as(Method::Put, "/api/user/profile", RequestBody::Json(body)).await?;
    tracing::info!(user_id = envelope.user.id, "profile updated");
    Ok(envelope.user)
}

/// Upload a new avatar via multipart `POST /api/user/profile-picture`.
///
/// # Errors
///
/// Returns a validation error for an empty file, otherwise any request error.
pub async fn upload_profile_picture(client: &ApiClient, file: ImageFile) -> Result<User, ApiError> {
    if file.bytes.is_empty() {
        return Err(ApiError::validation(PICTURE_REQUIRED_MESSAGE));
    }
    let form = MultipartForm::new().file("profile_picture", file);
    let envelope: UserEnvelope = client
        .request_as(Method::Post, "/api/user/profile-picture", RequestBody::Multipart(form))
        .await?;
    Ok(envelope.user)
}

/// Remove the avatar via `DELETE /api/user/profile-picture`.
///
/// # Errors
///
/// Returns any request error.
pub async fn remove_profile_picture(client: &ApiClient) -> Result<User, ApiError> {
    let envelope: UserEnvelope = client.request_as(Method::Delete, "/api/user/profile-picture", RequestBody::Empty).await?;
    Ok(envelope.user)
}

/// Fetch the current user's own posts via `GET /api/user/posts`.
///
/// # Errors
///
/// Returns a validation error for a zero page or limit, otherwise any
/// request error.
pub async fn get_user_posts(client: &ApiClient, page: u32, limit: u32) -> Result<PostsPage, ApiError> {
    check_page(page, limit)?;
    let path = format!("/api/user/posts?page={page}&limit={limit}");
    client.request_as(Method::Get, &path, RequestBody::Empty).await
}

/// Fetch aggregate stats via `GET /api/user/stats`.
///
/// # Errors
///
/// Returns any request error.
pub async fn get_user_stats(client: &ApiClient) -> Result<UserStats, ApiError> {
    client.request_as(Method::Get, "/api/user/stats", RequestBody::Empty).await
}

//! Auth endpoints. Successful signup/login stores the returned token before
//! handing the response back; logout is purely local.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::error::ApiError;
use super::http::{ApiClient, Method, RequestBody};
use super::types::AuthResponse;
use serde_json::json;

pub const SIGNUP_REQUIRED_MESSAGE: &str = "Username, email, and password are required";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Email and password are required";

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Register via `POST /api/auth/signup`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for blank fields without contacting the
/// server, otherwise any request error.
pub async fn signup(client: &ApiClient, username: &str, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    if blank(username) || blank(email) || password.is_empty() {
        return Err(ApiError::validation(SIGNUP_REQUIRED_MESSAGE));
    }
    let body = json!({ "username": username.trim(), "email": email.trim(), "password": password });
    let response: AuthResponse = client.request_as(Method::Post, "/api/auth/signup", RequestBody::Json(body)).await?;
    client.tokens().set(&response.token);
    tracing::info!(user_id = response.user.id, "signed up");
    Ok(response)
}

/// Authenticate via `POST /api/auth/login`.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] for blank fields without contacting the
/// server, otherwise any request error.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    if blank(email) || password.is_empty() {
        return Err(ApiError::validation(LOGIN_REQUIRED_MESSAGE));
    }
    let body = json!({ "email": email.trim(), "password": password });
    let response: AuthResponse = client.request_as(Method::Post, "/api/auth/login", RequestBody::Json(body)).await?;
    client.tokens().set(&response.token);
    tracing::info!(user_id = response.user.id, "logged in");
    Ok(response)
}

/// Forget the stored token. Never touches the network.
pub fn logout(client: &ApiClient) {
    client.tokens().clear();
    tracing::info!("logged out");
}

use super::*;
use crate::net::error::{CONNECTIVITY_MESSAGE, MALFORMED_MESSAGE};
use crate::net::mock::{BASE_URL, MockTransport, client_with};
use serde_json::json;

fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
    HttpResponse { status, status_text: status_text.to_owned(), body: body.to_owned() }
}

// =============================================================================
// build_request
// =============================================================================

#[test]
fn bearer_header_is_exact_when_token_present() {
    let mock = MockTransport::new();
    let client = client_with(&mock, Some("abc.def"));
    let request = client.build_request(Method::Get, "/api/posts", RequestBody::Empty);
    assert_eq!(request.header("authorization"), Some("Bearer abc.def"));
    assert_eq!(request.url, format!("{BASE_URL}/api/posts"));
}

#[test]
fn bearer_header_omitted_without_token() {
    let mock = MockTransport::new();
    let client = client_with(&mock, None);
    let request = client.build_request(Method::Get, "/api/posts", RequestBody::Empty);
    assert_eq!(request.header(AUTHORIZATION), None);
}

#[test]
fn json_body_sets_content_type() {
    let mock = MockTransport::new();
    let client = client_with(&mock, None);
    let request = client.build_request(Method::Post, "/api/posts", RequestBody::Json(json!({ "a": 1 })));
    assert_eq!(request.header(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
}

#[test]
fn multipart_body_leaves_content_type_to_transport() {
    let mock = MockTransport::new();
    let client = client_with(&mock, Some("t"));
    let form = MultipartForm::new().text("title", "T");
    let request = client.build_request(Method::Post, "/api/posts", RequestBody::Multipart(form));
    assert_eq!(request.header(CONTENT_TYPE), None);
    assert_eq!(request.header(AUTHORIZATION), Some("Bearer t"));
}

#[test]
fn empty_body_has_no_content_type() {
    let mock = MockTransport::new();
    let client = client_with(&mock, None);
    let request = client.build_request(Method::Delete, "/api/posts/1", RequestBody::Empty);
    assert!(request.headers.is_empty());
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let mock = MockTransport::new();
    let client = ApiClient::new("http://api.test/", TokenStore::in_memory(), mock.clone());
    assert_eq!(client.base_url(), "http://api.test");
    let request = client.build_request(Method::Get, "/health", RequestBody::Empty);
    assert_eq!(request.url, "http://api.test/health");
}

// =============================================================================
// normalize_response
// =============================================================================

#[test]
fn success_parses_json() {
    let value = normalize_response(response(200, "OK", r#"{"ok":true}"#)).unwrap();
    assert_eq!(value, json!({ "ok": true }));
}

#[test]
fn success_with_empty_body_is_null() {
    let value = normalize_response(response(204, "No Content", "")).unwrap();
    assert_eq!(value, Value::Null);
}

#[test]
fn success_with_html_is_malformed() {
    let err = normalize_response(response(200, "OK", "<html>proxy</html>")).unwrap_err();
    assert!(matches!(&err, ApiError::Malformed { message, .. } if message == MALFORMED_MESSAGE));
}

#[test]
fn error_prefers_error_field() {
    let err = normalize_response(response(400, "Bad Request", r#"{"error":"Email taken","message":"other"}"#))
        .unwrap_err();
    assert_eq!(err.message(), "Email taken");
    assert_eq!(err.status(), Some(400));
}

#[test]
fn error_falls_back_to_message_field() {
    let err = normalize_response(response(403, "Forbidden", r#"{"message":"Not your post"}"#)).unwrap_err();
    assert_eq!(err.message(), "Not your post");
}

#[test]
fn error_without_json_uses_status_text() {
    let err = normalize_response(response(502, "Bad Gateway", "upstream down")).unwrap_err();
    assert_eq!(err.message(), "request failed: 502 Bad Gateway");
    assert!(matches!(err, ApiError::Http { body: None, .. }));
}

#[test]
fn error_json_without_known_field_keeps_body() {
    let err = normalize_response(response(500, "Internal Server Error", r#"{"detail":"boom"}"#)).unwrap_err();
    assert_eq!(err.message(), "request failed: 500 Internal Server Error");
    assert!(matches!(err, ApiError::Http { body: Some(ref b), .. } if b["detail"] == "boom"));
}

#[test]
fn error_with_empty_status_text_has_no_trailing_space() {
    let err = normalize_response(response(599, "", "")).unwrap_err();
    assert_eq!(err.message(), "request failed: 599");
}

// =============================================================================
// request
// =============================================================================

#[tokio::test]
async fn request_maps_transport_failure_to_connectivity() {
    let mock = MockTransport::new();
    mock.push_unreachable();
    let client = client_with(&mock, None);
    let err = client.request(Method::Get, "/api/posts", RequestBody::Empty).await.unwrap_err();
    assert!(matches!(err, ApiError::Connectivity { .. }));
    assert_eq!(err.message(), CONNECTIVITY_MESSAGE);
}

#[tokio::test]
async fn request_is_single_attempt() {
    let mock = MockTransport::new();
    mock.push_json(500, json!({ "error": "boom" }));
    mock.push_json(200, json!({ "ok": true }));
    let client = client_with(&mock, None);
    let err = client.request(Method::Get, "/api/posts", RequestBody::Empty).await.unwrap_err();
    assert_eq!(err.message(), "boom");
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn request_as_reports_shape_mismatch_as_malformed() {
    let mock = MockTransport::new();
    mock.push_json(200, json!({ "unexpected": true }));
    let client = client_with(&mock, None);
    let err = client
        .request_as::<crate::net::types::User>(Method::Get, "/api/user/profile", RequestBody::Empty)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Malformed { .. }));
}

#[tokio::test]
async fn health_hits_health_endpoint() {
    let mock = MockTransport::new();
    mock.push_json(200, json!({ "status": "ok" }));
    let client = client_with(&mock, None);
    let body = client.health().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(mock.last_request().url, format!("{BASE_URL}/health"));
    assert_eq!(mock.last_request().method, Method::Get);
}

#[test]
fn multipart_form_lookup_helpers() {
    let file = ImageFile::new("a.png", "image/png", vec![1, 2]);
    let form = MultipartForm::new().text("title", "T").file("image", file.clone());
    assert_eq!(form.text_value("title"), Some("T"));
    assert_eq!(form.text_value("content"), None);
    assert_eq!(form.file_part("image"), Some(&file));
    assert_eq!(form.parts().len(), 2);
}

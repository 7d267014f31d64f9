use reqwest::Response;
use serde_json::Value;

/// It checks the status and the JSON content type, and returns the body.
pub async fn assert_json(response: Response, status: u16) -> Value {
    assert_eq!(response.status(), status);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json",
        "the response should be JSON"
    );

    response.json::<Value>().await.unwrap()
}

pub async fn assert_ok(response: Response) -> Value {
    assert_json(response, 200).await
}

/// Every error response has a human readable `error`.
async fn assert_error(response: Response, status: u16) -> Value {
    let body = assert_json(response, status).await;

    assert!(body["error"].is_string(), "the error body should have an `error` field: {body}");

    body
}

pub async fn assert_bad_request(response: Response) -> Value {
    assert_error(response, 400).await
}

pub async fn assert_unauthorized(response: Response) {
    assert_error(response, 401).await;
}

pub async fn assert_forbidden(response: Response) {
    assert_error(response, 403).await;
}

pub async fn assert_not_found(response: Response) {
    assert_error(response, 404).await;
}

pub async fn assert_internal_server_error(response: Response, error: &str) {
    let body = assert_error(response, 500).await;

    assert_eq!(body["error"], error);
    assert!(body["details"].is_string(), "internal errors should carry the failure in `details`");
}

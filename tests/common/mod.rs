use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use series_service::datasource::memory::MemorySeriesStore;
use series_service::state::AppState;

pub fn build_test_app() -> Router {
    series_service::router(AppState::new(MemorySeriesStore::new()))
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned())),
        None => builder.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let body = body.map(Value::to_string);
    let response = send(app, method, uri, body.as_deref()).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

//! # Preview Service Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`; no socket
//! is opened and no remote image is referenced.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use cardsmith::qr::style_of;
use cardsmith::server::{AppState, ServerConfig, router};

fn app() -> Router {
    router(Arc::new(AppState::new(ServerConfig::default()).unwrap()))
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(uri: &str, body: String) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, bytes.to_vec())
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, _, bytes) = post(uri, body.to_string()).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::String(String::from_utf8_lossy(&bytes).into()));
    (status, value)
}

#[tokio::test]
async fn test_catalogs() {
    let (status, fields) = get("/api/fields").await;
    assert_eq!(status, StatusCode::OK);
    let first_name = fields
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["key"] == "firstName")
        .unwrap();
    assert_eq!(first_name["label"], "First name");

    let (_, elements) = get("/api/elements").await;
    let types: Vec<_> = elements.as_array().unwrap().iter().map(|e| e["type"].clone()).collect();
    assert_eq!(types, vec!["text", "textarea", "picture", "social", "icon", "qrcode"]);

    let (_, styles) = get("/api/qr-styles").await;
    assert!(styles.as_array().unwrap().iter().any(|s| s["token"] == "dots"));
}

#[tokio::test]
async fn test_resolve_endpoint() {
    let profile = json!({
        "addresses": [{
            "type": "work_1",
            "tambon": "ศรีภูมิ",
            "district": "เมืองเชียงใหม่",
            "province": "เชียงใหม่"
        }]
    });
    let (status, body) = post_json(
        "/api/resolve",
        json!({"field": "workAddress1", "profile": profile, "useAddressPrefix": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "ศรีภูมิ เมืองเชียงใหม่ เชียงใหม่");

    let (_, body) = post_json("/api/resolve", json!({"field": "workAddress2", "profile": profile})).await;
    assert_eq!(body["value"], "");
}

#[tokio::test]
async fn test_qr_style_endpoint_falls_back() {
    let (status, body) = post_json("/api/qr-style", json!({"style": "bogus", "color": "#112233"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::to_value(style_of("standard", Some("#112233"))).unwrap());
}

#[tokio::test]
async fn test_render_endpoint() {
    let request = json!({
        "template": {"elements": [{"text": "Hi", "x": 5, "y": 6, "width": 100, "height": 20}]},
        "profile": {},
        "mode": "edit"
    });
    let (status, body) = post_json("/api/render", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["visual"]["kind"], "text");
    assert_eq!(body[0]["visual"]["text"], "Hi");
    assert_eq!((body[0]["left"].clone(), body[0]["top"].clone()), (json!(5), json!(6)));
}

#[tokio::test]
async fn test_preview_endpoint_returns_png() {
    let request = json!({
        "template": {"elements": [{"icon": "mail", "x": 10, "y": 10, "width": 32, "height": 32}]},
        "dpi": 96
    });
    let (status, content_type, bytes) = post("/api/preview", request.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (340, 208));
}

#[tokio::test]
async fn test_preview_rejects_bad_dpi() {
    let (status, _) = post_json("/api/preview", json!({"template": {}, "dpi": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preview_rejects_oversized_paper() {
    let request = json!({
        "template": {"paper": {"size": "Custom", "width": 100000, "height": 50}},
        "dpi": 300
    });
    let (status, body) = post_json("/api/preview", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.as_str().unwrap().contains("limit"), "{}", body);
}

#[tokio::test]
async fn test_preview_skips_oversized_element() {
    let request = json!({
        "template": {"elements": [{"text": "big", "x": 0, "y": 0, "width": 4294967295u64, "height": 4294967295u64}]},
        "dpi": 96
    });
    let (status, content_type, bytes) = post("/api/preview", request.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    let img = image::load_from_memory(&bytes).unwrap();
    assert_eq!((img.width(), img.height()), (340, 208));
}

#[tokio::test]
async fn test_edit_endpoint() {
    let element = json!({"type": "icon", "id": "icon-1", "iconName": "phone"});

    let (status, body) = post_json("/api/edit", json!({"element": element, "key": "iconName", "value": "mail"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["iconName"], "mail");
    assert_eq!(body["id"], "icon-1");

    let (status, _) = post_json("/api/edit", json!({"element": element, "key": "qrStyle", "value": "dots"})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, _, _) = post("/api/render", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

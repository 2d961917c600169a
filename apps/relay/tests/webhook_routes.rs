mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use support::{VERIFY_TOKEN, body_string, call, get, offline_router, post_json};

#[tokio::test]
async fn verification_returns_challenge() {
    let uri = format!(
        "/webhook?hub.mode=subscribe&hub.challenge=1234&hub.verify_token={VERIFY_TOKEN}"
    );
    let resp = call(offline_router(), get(&uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "1234");
}

#[tokio::test]
async fn verification_with_wrong_token_is_forbidden() {
    let resp = call(
        offline_router(),
        get("/webhook?hub.mode=subscribe&hub.challenge=1234&hub.verify_token=wrong"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn verification_with_wrong_mode_is_forbidden() {
    let uri = format!(
        "/webhook?hub.mode=unsubscribe&hub.challenge=1234&hub.verify_token={VERIFY_TOKEN}"
    );
    let resp = call(offline_router(), get(&uri)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn event_post_is_acknowledged() {
    let body = r#"{
        "object": "tiktok",
        "entry": [{"id": "e1", "time": 1700000000, "messaging": [
            {"sender": {"id": "u1"}, "recipient": {"id": "b1"},
             "message": {"mid": "m1", "type": "coupon_card", "coupon_card": {"coupon_id": "c1"}}}
        ]}]
    }"#;
    let resp = call(offline_router(), post_json("/webhook", body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn event_post_without_messages_is_acknowledged() {
    let resp = call(offline_router(), post_json("/webhook", "{}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn malformed_event_is_rejected() {
    let resp = call(offline_router(), post_json("/webhook", "{not json")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn array_event_bodies_are_rejected() {
    for body in ["[]", r#"["obj", []]"#, r#"{"entry": [[]]}"#] {
        let resp = call(offline_router(), post_json("/webhook", body)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
    }
}

#[tokio::test]
async fn repeated_verification_keys_use_first_value() {
    let uri = format!(
        "/webhook?hub.mode=subscribe&hub.mode=subscribe&hub.challenge=1234\
         &hub.verify_token={VERIFY_TOKEN}&hub.verify_token=wrong"
    );
    let resp = call(offline_router(), get(&uri)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, "1234");

    let uri = format!(
        "/webhook?hub.mode=subscribe&hub.challenge=1234\
         &hub.verify_token=wrong&hub.verify_token={VERIFY_TOKEN}"
    );
    let resp = call(offline_router(), get(&uri)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let req = Request::builder()
        .method("PUT")
        .uri("/webhook")
        .body(Body::empty())
        .unwrap();
    let resp = call(offline_router(), req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn webhook_route_has_no_cors_headers() {
    let resp = call(
        offline_router(),
        get("/webhook?hub.mode=subscribe&hub.verify_token=wrong"),
    )
    .await;
    assert!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
    assert!(resp.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn health_check_is_no_content() {
    let resp = call(offline_router(), get("/healthz")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

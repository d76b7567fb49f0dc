use super::*;
use axum::{
    body::{self, Body},
    http::{Method, Request},
};
use game_core::GameSettings;
use serde_json::{json, Value};
use shared::domain::GuessRange;
use tower::ServiceExt;

fn test_app(settings: GameSettings) -> Router {
    build_router(Arc::new(AppState::new(SessionStore::new(settings))))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    payload: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match payload {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

async fn new_session(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: SessionCreated = serde_json::from_value(body).expect("session");
    created.session_id.to_string()
}

async fn reveal_secret(app: &Router, id: &str) -> i64 {
    let uri = format!("/sessions/{id}/game/reveal");
    let (status, body) = send(app, Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "number_revealed");
    body["payload"]["secret"].as_i64().expect("secret")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app(GameSettings::default());
    let (status, body) = send(&app, Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));
}

#[tokio::test]
async fn circles_accumulate_per_session() {
    let app = test_app(GameSettings::default());
    let id = new_session(&app).await;
    let other = new_session(&app).await;

    for expected in 1..=3 {
        let uri = format!("/sessions/{id}/circles");
        let (status, body) = send(&app, Method::POST, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "circle_spawned");
        assert_eq!(body["payload"]["total"], expected);
    }

    let (status, body) = send(&app, Method::GET, &format!("/sessions/{id}/circles"), None).await;
    assert_eq!(status, StatusCode::OK);
    let overlays: Vec<CircleOverlay> = serde_json::from_value(body).expect("overlays");
    assert_eq!(overlays.len(), 3);
    for overlay in overlays {
        assert!(overlay.left_pct <= 90 && overlay.top_pct <= 90);
        assert!((20..=100).contains(&overlay.diameter_px));
    }

    let (_, body) = send(&app, Method::GET, &format!("/sessions/{other}/circles"), None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn guessing_round_records_a_score() {
    let app = test_app(GameSettings::default());
    let id = new_session(&app).await;
    let secret = reveal_secret(&app, &id).await;
    let wrong = if secret < 100 { 100 } else { 1 };

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/sessions/{id}/game/guess"),
        Some(json!({ "value": wrong })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["attempt_count"], 1);
    assert_eq!(body["payload"]["celebrate"], false);

    let (_, body) = send(
        &app,
        Method::POST,
        &format!("/sessions/{id}/game/guess"),
        Some(json!({ "value": secret })),
    )
    .await;
    assert_eq!(body["payload"]["feedback"], json!({ "kind": "won", "attempts": 2 }));
    assert_eq!(body["payload"]["celebrate"], true);

    let (status, body) = send(&app, Method::GET, &format!("/sessions/{id}/game"), None).await;
    assert_eq!(status, StatusCode::OK);
    let view: GameView = serde_json::from_value(body).expect("view");
    assert_eq!(view.best_score, Some(2));
    assert_eq!(view.leaderboard.len(), 1);
    assert_eq!(view.attempt_history, vec![wrong, secret]);
    assert_eq!(view.closeness_pct, 100);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/sessions/{id}/game/leaderboard"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, &format!("/sessions/{id}/game"), None).await;
    let view: GameView = serde_json::from_value(body).expect("view");
    assert!(view.leaderboard.is_empty());
    assert_eq!(view.best_score, None);
}

#[tokio::test]
async fn attempt_limit_is_enforced_over_http() {
    let app = test_app(GameSettings::default());
    let id = new_session(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/game/settings"),
        Some(json!({ "max_attempts": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["max_attempts"], 1);
    assert_eq!(body["payload"]["hints_enabled"], true);

    let secret = reveal_secret(&app, &id).await;
    let wrong = if secret > 1 { 1 } else { 2 };
    let guess_uri = format!("/sessions/{id}/game/guess");
    let (status, _) = send(&app, Method::POST, &guess_uri, Some(json!({ "value": wrong }))).await;
    assert_eq!(status, StatusCode::OK);

    let payload = json!({ "value": secret });
    let (status, body) = send(&app, Method::POST, &guess_uri, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "attempt_limit");

    let (status, body) = send(&app, Method::POST, &format!("/sessions/{id}/game/hint"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "attempt_limit");

    let (_, body) = send(&app, Method::GET, &format!("/sessions/{id}/game"), None).await;
    assert_eq!(body["attempt_count"], 1);
}

#[tokio::test]
async fn configuration_errors_are_advisory() {
    let app = test_app(GameSettings::default());
    let id = new_session(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/game/range"),
        Some(json!({ "min": 10, "max": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "configuration");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/game/settings"),
        Some(json!({ "max_attempts": 50, "hints_enabled": false })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "configuration");

    let (_, body) = send(&app, Method::GET, &format!("/sessions/{id}/game"), None).await;
    let view: GameView = serde_json::from_value(body).expect("view");
    assert_eq!(view.range, GuessRange::default());
    assert_eq!(view.max_attempts, 0);
    assert!(view.hints_enabled);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/sessions/{id}/game/guess"),
        Some(json!({ "value": 1000 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn range_change_and_hints_through_request_endpoint() {
    let settings = GameSettings::new(GuessRange { min: 1, max: 100 }, 0, false).expect("settings");
    let app = test_app(settings);
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/requests");

    let hint = json!({ "type": "request_hint" });
    let (status, body) = send(&app, Method::POST, &uri, Some(hint)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "hints_disabled");

    let (status, _) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "type": "set_hints_enabled", "payload": { "enabled": true } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let hint = json!({ "type": "request_hint" });
    let (status, body) = send(&app, Method::POST, &uri, Some(hint)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "hint_given");
    assert_eq!(body["payload"]["hint"]["tier"], "parity");
    assert_eq!(body["payload"]["attempt_count"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "type": "configure_range", "payload": { "min": 5, "max": 8 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["new_round"], true);

    let (_, body) = send(&app, Method::GET, &format!("/sessions/{id}/game"), None).await;
    assert_eq!(body["attempt_count"], 0);
    assert_eq!(body["hints_used"], 0);
    assert_eq!(body["range"], json!({ "min": 5, "max": 8 }));

    let secret = reveal_secret(&app, &id).await;
    assert!((5..=8).contains(&secret));
}

#[tokio::test]
async fn sessions_are_created_lazily_and_ended() {
    let app = test_app(GameSettings::default());
    let id = Uuid::new_v4();

    let (status, body) = send(&app, Method::GET, &format!("/sessions/{id}/game"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attempt_count"], 0);

    let (status, _) = send(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

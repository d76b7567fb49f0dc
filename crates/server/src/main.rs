use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use game_core::{GameError, SessionStore};
use serde::Deserialize;
use shared::{
    domain::SessionId,
    error::{ApiError, ErrorCode},
    protocol::{CircleOverlay, ClientRequest, GameView, ServerEvent, SessionCreated},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

const MAX_BODY_BYTES: usize = 16 * 1024;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[derive(Debug, Deserialize)]
struct GuessRequest {
    value: i64,
}

#[derive(Debug, Deserialize)]
struct RangeRequest {
    min: i64,
    max: i64,
}

#[derive(Debug, Deserialize)]
struct SettingsRequest {
    max_attempts: Option<u32>,
    hints_enabled: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings()?;
    let game_settings = settings.game_settings()?;
    let state = AppState::new(SessionStore::new(game_settings));
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, range = %game_settings.range(), "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/sessions", post(create_session))
        .route("/sessions/:session_id", delete(end_session))
        .route("/sessions/:session_id/requests", post(apply_request))
        .route(
            "/sessions/:session_id/circles",
            get(list_circles).post(spawn_circle),
        )
        .route("/sessions/:session_id/game", get(game_view))
        .route("/sessions/:session_id/game/guess", post(guess))
        .route("/sessions/:session_id/game/hint", post(request_hint))
        .route("/sessions/:session_id/game/new", post(new_game))
        .route("/sessions/:session_id/game/reveal", post(reveal))
        .route("/sessions/:session_id/game/range", put(configure_range))
        .route("/sessions/:session_id/game/settings", put(update_settings))
        .route(
            "/sessions/:session_id/game/leaderboard",
            delete(reset_leaderboard),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.lock().await.create();
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    if state.sessions.lock().await.end(SessionId(session_id)) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new(ErrorCode::NotFound, "session not found")),
        ))
    }
}

async fn apply_request(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ClientRequest>,
) -> ApiResult<ServerEvent> {
    dispatch(&state, session_id, request).await
}

async fn list_circles(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Json<Vec<CircleOverlay>> {
    let mut sessions = state.sessions.lock().await;
    Json(sessions.get_or_create(SessionId(session_id)).circles().overlays())
}

async fn spawn_circle(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<ServerEvent> {
    dispatch(&state, session_id, ClientRequest::SpawnCircle).await
}

async fn game_view(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Json<GameView> {
    let mut sessions = state.sessions.lock().await;
    Json(sessions.get_or_create(SessionId(session_id)).game().view())
}

async fn guess(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<GuessRequest>,
) -> ApiResult<ServerEvent> {
    dispatch(&state, session_id, ClientRequest::Guess { value: req.value }).await
}

async fn request_hint(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<ServerEvent> {
    dispatch(&state, session_id, ClientRequest::RequestHint).await
}

async fn new_game(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<ServerEvent> {
    dispatch(&state, session_id, ClientRequest::NewGame).await
}

async fn reveal(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<ServerEvent> {
    dispatch(&state, session_id, ClientRequest::Reveal).await
}

async fn configure_range(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<RangeRequest>,
) -> ApiResult<ServerEvent> {
    let request = ClientRequest::ConfigureRange {
        min: req.min,
        max: req.max,
    };
    dispatch(&state, session_id, request).await
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SettingsRequest>,
) -> ApiResult<ServerEvent> {
    let mut sessions = state.sessions.lock().await;
    sessions
        .get_or_create(SessionId(session_id))
        .update_settings(req.max_attempts, req.hints_enabled)
        .map(Json)
        .map_err(rejected)
}

async fn reset_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<ServerEvent> {
    dispatch(&state, session_id, ClientRequest::ResetLeaderboard).await
}

async fn dispatch(
    state: &AppState,
    session_id: Uuid,
    request: ClientRequest,
) -> ApiResult<ServerEvent> {
    let mut sessions = state.sessions.lock().await;
    sessions
        .get_or_create(SessionId(session_id))
        .apply(request)
        .map(Json)
        .map_err(rejected)
}

fn rejected(err: GameError) -> (StatusCode, Json<ApiError>) {
    warn!(%err, "request rejected");
    (StatusCode::BAD_REQUEST, Json(err.into()))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

use super::state::AppState;
use crate::audio::AudioMode;
use crate::sensor::SensorRate;
use crate::session::{SessionOptions, SessionResult, SessionState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    /// Caller-supplied game label
    pub game_id: String,

    /// Streaming target URL; omit to record to a local file
    pub stream_url: Option<String>,

    /// Gyroscope sampling rate (default: game)
    pub sensor_rate: Option<SensorRate>,

    /// Base audio mode (default: mixed)
    pub audio_mode: Option<AudioMode>,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub status: String,
    pub result: SessionResult,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: SessionState,
    pub session_id: Option<String>,
    pub reading_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AudioModeRequest {
    pub mode: AudioMode,
}

#[derive(Debug, Deserialize)]
pub struct MuteRequest {
    pub muted: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /sessions/start
/// Start a capture session (implicitly stopping any session in progress)
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> impl IntoResponse {
    info!("Starting session for game: {}", req.game_id);

    let mut options = SessionOptions::new(req.game_id);
    options.stream_url = req.stream_url;
    if let Some(rate) = req.sensor_rate {
        options.sensor_rate = rate;
    }
    if let Some(mode) = req.audio_mode {
        options.audio_mode = mode;
    }

    match state.orchestrator.start_session(options).await {
        Ok(session_id) => (
            StatusCode::OK,
            Json(StartSessionResponse {
                session_id,
                status: "active".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to start session: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to start session: {:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// POST /sessions/stop
/// Stop the session in progress and return its result
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    if !state.orchestrator.is_active() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "No session in progress".to_string(),
            }),
        )
            .into_response();
    }

    let result = state.orchestrator.stop_session().await;
    info!("Session stopped: {}", result.session_id);

    (
        StatusCode::OK,
        Json(StopSessionResponse {
            status: "stopped".to_string(),
            result,
        }),
    )
        .into_response()
}

/// POST /sessions/pause
pub async fn pause_session(State(state): State<AppState>) -> impl IntoResponse {
    if !state.orchestrator.is_active() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "No session in progress".to_string(),
            }),
        )
            .into_response();
    }

    state.orchestrator.pause_session().await;
    (StatusCode::OK, Json(serde_json::json!({ "status": "paused" }))).into_response()
}

/// POST /sessions/resume
pub async fn resume_session(State(state): State<AppState>) -> impl IntoResponse {
    if !state.orchestrator.is_paused() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Session is not paused".to_string(),
            }),
        )
            .into_response();
    }

    state.orchestrator.resume_session().await;
    (StatusCode::OK, Json(serde_json::json!({ "status": "active" }))).into_response()
}

/// GET /sessions/status
pub async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let reading_count = state.orchestrator.buffered_readings().await.len();

    let status = StatusResponse {
        state: if state.orchestrator.is_paused() {
            SessionState::Paused
        } else if state.orchestrator.is_active() {
            SessionState::Active
        } else {
            SessionState::Idle
        },
        session_id: state.orchestrator.current_session_id(),
        reading_count,
    };

    (StatusCode::OK, Json(status)).into_response()
}

/// POST /sessions/audio/mode
pub async fn set_audio_mode(
    State(state): State<AppState>,
    Json(req): Json<AudioModeRequest>,
) -> impl IntoResponse {
    state.orchestrator.set_audio_mode(req.mode).await;
    (StatusCode::OK, Json(serde_json::json!({ "mode": req.mode }))).into_response()
}

/// POST /sessions/audio/mic-muted
pub async fn set_microphone_muted(
    State(state): State<AppState>,
    Json(req): Json<MuteRequest>,
) -> impl IntoResponse {
    state.orchestrator.set_microphone_muted(req.muted).await;
    (StatusCode::OK, Json(serde_json::json!({ "muted": req.muted }))).into_response()
}

/// POST /sessions/audio/device-muted
pub async fn set_device_audio_muted(
    State(state): State<AppState>,
    Json(req): Json<MuteRequest>,
) -> impl IntoResponse {
    state.orchestrator.set_device_audio_muted(req.muted).await;
    (StatusCode::OK, Json(serde_json::json!({ "muted": req.muted }))).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

//! HTTP API for external control (host application)
//!
//! This module provides a REST API for driving the session orchestrator:
//! - POST /sessions/start - Start a capture session
//! - POST /sessions/stop - Stop it and return the session result
//! - POST /sessions/pause, /sessions/resume - Transport pause/resume
//! - POST /sessions/audio/{mode,mic-muted,device-muted} - Audio routing
//! - GET /sessions/status - Query orchestrator state
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

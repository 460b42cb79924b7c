//! Capture session coordination
//!
//! This module provides the `SessionOrchestrator` that coordinates:
//! - Gyroscope sampling and reading buffering
//! - The screen/audio capture engine (local recording or live streaming)
//! - Idle/active classification on a fixed evaluation period
//! - Audio routing (base mode + mute flags → engine source)
//! - Pause/resume with paused-time-adjusted duration accounting
//! - Typed lifecycle events to the host application

mod config;
mod idle;
mod orchestrator;
mod types;

pub use config::{OrchestratorConfig, SessionOptions};
pub use idle::{IdleDetector, IdleTransition};
pub use orchestrator::{EngineCallbacks, SessionOrchestrator};
pub use types::{Reading, SessionResult, SessionState, Status};

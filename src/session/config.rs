use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::audio::{AudioCapabilities, AudioMode};
use crate::engine::{AudioConfig, VideoConfig};
use crate::sensor::SensorRate;

/// Orchestrator-wide configuration, fixed at construction
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Σ|axes| above this counts as movement (rad/s)
    pub idle_threshold: f32,

    /// How long without movement before the session is classified idle
    pub idle_timeout: Duration,

    /// How often the idle classification is re-evaluated
    pub idle_check_period: Duration,

    /// Where local recordings are written
    pub output_dir: PathBuf,

    /// Video encoder settings handed to the engine
    pub video: VideoConfig,

    /// Audio encoder settings handed to the engine
    pub audio: AudioConfig,

    /// What this platform tier can capture
    pub capabilities: AudioCapabilities,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            idle_threshold: 0.05,
            idle_timeout: Duration::from_millis(500),
            idle_check_period: Duration::from_millis(200),
            output_dir: PathBuf::from("recordings"),
            video: VideoConfig::default(),
            audio: AudioConfig::default(),
            capabilities: AudioCapabilities::default(),
        }
    }
}

/// Per-session options supplied by the caller at start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Caller-supplied label, e.g. "ball_tilt_game"
    pub game_id: String,

    /// Streaming target; absent means record to a local file
    pub stream_url: Option<String>,

    /// Gyroscope sampling rate
    pub sensor_rate: SensorRate,

    /// Requested base audio mode (may degrade per platform capabilities)
    pub audio_mode: AudioMode,
}

impl SessionOptions {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            stream_url: None,
            sensor_rate: SensorRate::Game,
            audio_mode: AudioMode::Mixed,
        }
    }
}

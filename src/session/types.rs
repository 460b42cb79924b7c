use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Orchestrator lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Active,
    Paused,
}

/// Lock-free status snapshot published by the orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub state: SessionState,
    pub session_id: Option<String>,
}

impl Default for Status {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            session_id: None,
        }
    }
}

/// One buffered gyroscope reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    /// Angular rate around the x axis (rad/s)
    pub x: f32,
    /// Angular rate around the y axis (rad/s)
    pub y: f32,
    /// Angular rate around the z axis (rad/s)
    pub z: f32,

    /// Monotonic sensor timestamp in nanoseconds
    pub sensor_timestamp_ns: i64,

    /// Wall-clock arrival time
    pub arrived_at: DateTime<Utc>,

    /// Idle classification at the moment of arrival, before this reading
    /// was applied to the detector
    pub is_idle: bool,
}

/// Immutable snapshot returned by `stop_session`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    pub session_id: String,
    pub game_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Wall-clock elapsed time minus the sum of all paused intervals
    pub active_duration_ms: u64,

    pub reading_count: usize,
    pub readings: Vec<Reading>,

    /// Present only in local-recording mode
    pub record_path: Option<PathBuf>,
}

impl Default for SessionResult {
    fn default() -> Self {
        Self {
            session_id: String::new(),
            game_id: String::new(),
            start_time: DateTime::<Utc>::UNIX_EPOCH,
            end_time: DateTime::<Utc>::UNIX_EPOCH,
            active_duration_ms: 0,
            reading_count: 0,
            readings: Vec::new(),
            record_path: None,
        }
    }
}

//! Session events delivered to the host application
//!
//! The orchestrator reports everything outward through a single typed stream:
//! lifecycle edges, per-reading data, idle/active transitions, and transport
//! trouble. Delivery is fire-and-forget: sinks must not block (they are called
//! from the orchestrator task) and nothing is retained for absent consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SessionStarted {
        session_id: String,
        game_id: String,
        start_time: DateTime<Utc>,
    },
    SessionStopped {
        session_id: String,
    },
    StreamingStarted {
        session_id: String,
    },
    StreamingPaused {
        session_id: String,
    },
    StreamingResumed {
        session_id: String,
    },
    StreamingStopped {
        session_id: String,
    },
    StreamingError {
        session_id: String,
        reason: String,
    },
    /// Non-fatal audio degradation (configuration failure or capability
    /// fallback); the session keeps running
    AudioWarning {
        session_id: String,
        reason: String,
    },
    GyroReading {
        session_id: String,
        x: f32,
        y: f32,
        z: f32,
        sensor_timestamp_ns: i64,
        is_idle: bool,
    },
    GyroIdle {
        session_id: String,
        timestamp: DateTime<Utc>,
    },
    GyroActive {
        session_id: String,
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::SessionStarted { session_id, .. }
            | SessionEvent::SessionStopped { session_id }
            | SessionEvent::StreamingStarted { session_id }
            | SessionEvent::StreamingPaused { session_id }
            | SessionEvent::StreamingResumed { session_id }
            | SessionEvent::StreamingStopped { session_id }
            | SessionEvent::StreamingError { session_id, .. }
            | SessionEvent::AudioWarning { session_id, .. }
            | SessionEvent::GyroReading { session_id, .. }
            | SessionEvent::GyroIdle { session_id, .. }
            | SessionEvent::GyroActive { session_id, .. } => session_id,
        }
    }
}

/// Event consumer boundary
///
/// `deliver` is called inline from the orchestrator task and must return
/// immediately; implementations that do real I/O should hand the event to
/// their own task.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: SessionEvent);
}

/// Sink backed by an unbounded channel, for in-process consumers
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, event: SessionEvent) {
        // receiver gone means nobody is listening; events are droppable
        let _ = self.tx.send(event);
    }
}

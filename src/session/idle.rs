// Idle/active classification from time-since-last-movement
//
// Pure state machine: the orchestrator feeds it samples as they arrive and
// ticks on a fixed period. Transitions are edge-triggered: one event per
// state change, never repeated while the state holds.

use std::time::Duration;
use tokio::time::Instant;

/// Edge transition produced by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTransition {
    BecameActive,
    BecameIdle,
}

pub struct IdleDetector {
    /// Σ|axes| above this counts as movement (rad/s)
    threshold: f32,
    /// How long without movement before flipping to idle
    timeout: Duration,
    is_idle: bool,
    last_movement: Instant,
}

impl IdleDetector {
    /// Starts in the active state with the clock at `now`
    pub fn new(threshold: f32, timeout: Duration, now: Instant) -> Self {
        Self {
            threshold,
            timeout,
            is_idle: false,
            last_movement: now,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.is_idle
    }

    /// Apply one sample. Returns `BecameActive` exactly at the idle→active
    /// edge; active readings while already active produce nothing.
    pub fn on_sample(&mut self, magnitude: f32, now: Instant) -> Option<IdleTransition> {
        if magnitude <= self.threshold {
            return None;
        }
        self.last_movement = now;
        if self.is_idle {
            self.is_idle = false;
            return Some(IdleTransition::BecameActive);
        }
        None
    }

    /// Periodic re-evaluation. Returns `BecameIdle` exactly at the
    /// active→idle edge once the timeout has elapsed without movement.
    pub fn on_tick(&mut self, now: Instant) -> Option<IdleTransition> {
        if self.is_idle {
            return None;
        }
        if now.duration_since(self.last_movement) > self.timeout {
            self.is_idle = true;
            return Some(IdleTransition::BecameIdle);
        }
        None
    }
}

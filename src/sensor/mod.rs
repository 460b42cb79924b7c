//! Gyroscope provider boundary
//!
//! The raw sensor driver lives outside this crate. It is consumed through the
//! `SensorProvider` trait: the orchestrator hands it a callback and the driver
//! pushes timestamped readings on its own delivery thread until stopped.

mod sim;

pub use sim::SimulatedSensor;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One raw gyroscope sample as delivered by the driver
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GyroSample {
    /// Angular rate around the x axis (rad/s)
    pub x: f32,
    /// Angular rate around the y axis (rad/s)
    pub y: f32,
    /// Angular rate around the z axis (rad/s)
    pub z: f32,
    /// Monotonic sensor timestamp in nanoseconds
    pub timestamp_ns: i64,
}

impl GyroSample {
    /// Sum of absolute angular rates, used for idle classification
    pub fn magnitude(&self) -> f32 {
        self.x.abs() + self.y.abs() + self.z.abs()
    }
}

/// Sampling rate presets, plus an explicit frequency escape hatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorRate {
    /// As fast as the hardware delivers (~200 Hz)
    Fastest,
    /// Smoothness/battery balance for games (~100 Hz)
    Game,
    /// UI-grade updates (~60 Hz)
    Ui,
    /// Coarse background sampling (~20 Hz)
    Normal,
    /// Explicit frequency in Hz
    Hz(u32),
}

impl SensorRate {
    pub fn hz(&self) -> u32 {
        match self {
            SensorRate::Fastest => 200,
            SensorRate::Game => 100,
            SensorRate::Ui => 60,
            SensorRate::Normal => 20,
            SensorRate::Hz(hz) => *hz,
        }
    }
}

/// Callback invoked for every delivered sample. Must not block: providers fire
/// it from their own delivery thread or task.
pub type SampleCallback = Arc<dyn Fn(GyroSample) + Send + Sync>;

/// Gyroscope driver boundary
///
/// `start` registers the callback and begins delivery at the requested rate;
/// calling it while running restarts delivery with the new callback. `stop`
/// is idempotent.
pub trait SensorProvider: Send {
    fn start(&mut self, rate: SensorRate, on_sample: SampleCallback) -> Result<()>;

    fn stop(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_sums_absolute_axes() {
        let sample = GyroSample {
            x: 0.02,
            y: -0.01,
            z: 0.03,
            timestamp_ns: 0,
        };
        assert!((sample.magnitude() - 0.06).abs() < 1e-6);
    }

    #[test]
    fn rate_presets_map_to_frequencies() {
        assert_eq!(SensorRate::Game.hz(), 100);
        assert_eq!(SensorRate::Normal.hz(), 20);
        assert_eq!(SensorRate::Hz(250).hz(), 250);
    }
}

use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::audio::AudioCapabilities;
use crate::engine::{AudioConfig, VideoConfig};
use crate::session::OrchestratorConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub capture: CaptureConfig,
    pub idle: IdleConfig,
    pub simulation: SimulationConfig,
    pub nats: Option<NatsConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    pub output_dir: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub bitrate: u32,
    pub audio_sample_rate: u32,
    pub audio_stereo: bool,
    pub audio_bitrate: u32,
    /// Whether this platform can capture device-internal audio
    pub device_audio: bool,
}

#[derive(Debug, Deserialize)]
pub struct IdleConfig {
    pub threshold: f32,
    pub timeout_ms: u64,
    pub check_period_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct SimulationConfig {
    pub burst_ms: u64,
    pub lull_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct NatsConfig {
    pub url: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Orchestrator configuration derived from the file settings
    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            idle_threshold: self.idle.threshold,
            idle_timeout: Duration::from_millis(self.idle.timeout_ms),
            idle_check_period: Duration::from_millis(self.idle.check_period_ms),
            output_dir: PathBuf::from(&self.capture.output_dir),
            video: VideoConfig {
                width: self.capture.width,
                height: self.capture.height,
                fps: self.capture.fps,
                bitrate: self.capture.bitrate,
                rotation: 0,
            },
            audio: AudioConfig {
                sample_rate: self.capture.audio_sample_rate,
                stereo: self.capture.audio_stereo,
                bitrate: self.capture.audio_bitrate,
            },
            capabilities: AudioCapabilities {
                device_audio: self.capture.device_audio,
            },
        }
    }
}

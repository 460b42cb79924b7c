//! Capture/transport engine boundary
//!
//! The encode-and-deliver subsystem (screen grab, H.264/AAC encode, RTMP or
//! local MP4 mux) lives outside this crate. It is consumed through the
//! `CaptureEngine` trait. Lifecycle calls are expected to return quickly:
//! connection establishment and delivery happen on the engine's own threads
//! and are reported back asynchronously as `EngineEvent`s.

mod null;

pub use null::NullEngine;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::audio::AudioMode;

/// Video encoder configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VideoConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Target bitrate in bits per second
    pub bitrate: u32,
    /// Display rotation in degrees
    pub rotation: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 30,
            bitrate: 2_500_000,
            rotation: 0,
        }
    }
}

/// Audio encoder configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub stereo: bool,
    /// Target bitrate in bits per second
    pub bitrate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            stereo: true,
            bitrate: 128_000,
        }
    }
}

/// Video input fed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSource {
    Screen,
    Camera,
}

/// Asynchronous status callbacks from the engine's connection machinery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ConnectionStarted(String),
    ConnectionSuccess,
    ConnectionFailed(String),
    Disconnected,
    AuthError,
    AuthSuccess,
}

/// Capture/transport engine contract
///
/// `prepare_*` validate and configure the encoders and fail synchronously on
/// unsupported configurations. Everything else is fire-and-forget from the
/// caller's perspective: failures surface as `EngineEvent`s, not as blocked
/// calls. The audio source can be swapped mid-flight without touching video.
#[async_trait::async_trait]
pub trait CaptureEngine: Send {
    async fn prepare_video(&mut self, config: VideoConfig) -> Result<()>;

    async fn prepare_audio(&mut self, config: AudioConfig) -> Result<()>;

    async fn change_video_source(&mut self, source: VideoSource) -> Result<()>;

    async fn change_audio_source(&mut self, source: AudioMode) -> Result<()>;

    async fn start_stream(&mut self, url: &str) -> Result<()>;

    async fn start_record(&mut self, path: &Path) -> Result<()>;

    async fn pause_record(&mut self) -> Result<()>;

    async fn resume_record(&mut self) -> Result<()>;

    async fn stop_stream(&mut self) -> Result<()>;

    async fn stop_record(&mut self) -> Result<()>;

    /// Release encoders and any held OS resources
    async fn release(&mut self) -> Result<()>;
}

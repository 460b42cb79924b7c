use anyhow::{bail, Result};
use std::path::Path;
use tracing::{debug, info};

use super::{AudioConfig, CaptureEngine, VideoConfig, VideoSource};
use crate::audio::AudioMode;

/// Engine that validates configuration and logs every operation without
/// encoding anything. Used by the dry-run binary and by tests.
#[derive(Debug, Default)]
pub struct NullEngine {
    video_ready: bool,
    audio_ready: bool,
}

impl NullEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CaptureEngine for NullEngine {
    async fn prepare_video(&mut self, config: VideoConfig) -> Result<()> {
        if config.width == 0 || config.height == 0 || config.fps == 0 {
            bail!(
                "unsupported video configuration: {}x{} @ {} fps",
                config.width,
                config.height,
                config.fps
            );
        }
        debug!(
            "null engine: video prepared ({}x{} @ {} fps, {} bps)",
            config.width, config.height, config.fps, config.bitrate
        );
        self.video_ready = true;
        Ok(())
    }

    async fn prepare_audio(&mut self, config: AudioConfig) -> Result<()> {
        if config.sample_rate == 0 {
            bail!("unsupported audio sample rate: 0");
        }
        debug!(
            "null engine: audio prepared ({} Hz, stereo={}, {} bps)",
            config.sample_rate, config.stereo, config.bitrate
        );
        self.audio_ready = true;
        Ok(())
    }

    async fn change_video_source(&mut self, source: VideoSource) -> Result<()> {
        debug!("null engine: video source -> {:?}", source);
        Ok(())
    }

    async fn change_audio_source(&mut self, source: AudioMode) -> Result<()> {
        debug!("null engine: audio source -> {:?}", source);
        Ok(())
    }

    async fn start_stream(&mut self, url: &str) -> Result<()> {
        if !self.video_ready {
            bail!("start_stream called before prepare_video");
        }
        info!(
            "null engine: streaming to {} (audio: {})",
            url, self.audio_ready
        );
        Ok(())
    }

    async fn start_record(&mut self, path: &Path) -> Result<()> {
        if !self.video_ready {
            bail!("start_record called before prepare_video");
        }
        info!(
            "null engine: recording to {} (audio: {})",
            path.display(),
            self.audio_ready
        );
        Ok(())
    }

    async fn pause_record(&mut self) -> Result<()> {
        debug!("null engine: paused");
        Ok(())
    }

    async fn resume_record(&mut self) -> Result<()> {
        debug!("null engine: resumed");
        Ok(())
    }

    async fn stop_stream(&mut self) -> Result<()> {
        info!("null engine: stream stopped");
        Ok(())
    }

    async fn stop_record(&mut self) -> Result<()> {
        info!("null engine: recording stopped");
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        debug!("null engine: released");
        self.video_ready = false;
        self.audio_ready = false;
        Ok(())
    }
}

#![allow(dead_code)]

// Shared harness for orchestrator integration tests: a hand-driven sensor,
// an engine that records every call, and an event channel.

use anyhow::{bail, Result};
use gyrostream::{
    AudioConfig, AudioMode, CaptureEngine, ChannelSink, GyroSample, OrchestratorConfig,
    SampleCallback, SensorProvider, SensorRate, SessionEvent, SessionOrchestrator, VideoConfig,
    VideoSource,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Test-side handle for pushing samples through the registered callback
#[derive(Clone, Default)]
pub struct SensorHandle {
    callback: Arc<Mutex<Option<SampleCallback>>>,
}

impl SensorHandle {
    pub fn push(&self, x: f32, y: f32, z: f32, timestamp_ns: i64) {
        let cb = self.callback.lock().unwrap().clone();
        if let Some(cb) = cb {
            cb(GyroSample {
                x,
                y,
                z,
                timestamp_ns,
            });
        }
    }

    /// Push a sample well above any idle threshold
    pub fn push_movement(&self, timestamp_ns: i64) {
        self.push(0.3, 0.1, -0.2, timestamp_ns);
    }

    /// Push a sample well below any idle threshold
    pub fn push_still(&self, timestamp_ns: i64) {
        self.push(0.001, 0.0, 0.0, timestamp_ns);
    }

    pub fn is_running(&self) -> bool {
        self.callback.lock().unwrap().is_some()
    }
}

/// Sensor provider driven manually by the test
pub struct TestSensor {
    handle: SensorHandle,
}

impl TestSensor {
    pub fn new() -> (Self, SensorHandle) {
        let handle = SensorHandle::default();
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl SensorProvider for TestSensor {
    fn start(&mut self, _rate: SensorRate, on_sample: SampleCallback) -> Result<()> {
        *self.handle.callback.lock().unwrap() = Some(on_sample);
        Ok(())
    }

    fn stop(&mut self) {
        self.handle.callback.lock().unwrap().take();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    PrepareVideo,
    PrepareAudio,
    VideoSource(VideoSource),
    AudioSource(AudioMode),
    StartStream(String),
    StartRecord(PathBuf),
    Pause,
    Resume,
    StopStream,
    StopRecord,
    Release,
}

/// Engine that records every call and can be told to reject configuration
#[derive(Clone, Default)]
pub struct CountingEngine {
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
    pub fail_video: bool,
    pub fail_audio: bool,
}

impl CountingEngine {
    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl CaptureEngine for CountingEngine {
    async fn prepare_video(&mut self, _config: VideoConfig) -> Result<()> {
        if self.fail_video {
            bail!("video encoder rejected the configuration");
        }
        self.record(EngineCall::PrepareVideo);
        Ok(())
    }

    async fn prepare_audio(&mut self, _config: AudioConfig) -> Result<()> {
        if self.fail_audio {
            bail!("audio encoder rejected the configuration");
        }
        self.record(EngineCall::PrepareAudio);
        Ok(())
    }

    async fn change_video_source(&mut self, source: VideoSource) -> Result<()> {
        self.record(EngineCall::VideoSource(source));
        Ok(())
    }

    async fn change_audio_source(&mut self, source: AudioMode) -> Result<()> {
        self.record(EngineCall::AudioSource(source));
        Ok(())
    }

    async fn start_stream(&mut self, url: &str) -> Result<()> {
        self.record(EngineCall::StartStream(url.to_string()));
        Ok(())
    }

    async fn start_record(&mut self, path: &Path) -> Result<()> {
        self.record(EngineCall::StartRecord(path.to_path_buf()));
        Ok(())
    }

    async fn pause_record(&mut self) -> Result<()> {
        self.record(EngineCall::Pause);
        Ok(())
    }

    async fn resume_record(&mut self) -> Result<()> {
        self.record(EngineCall::Resume);
        Ok(())
    }

    async fn stop_stream(&mut self) -> Result<()> {
        self.record(EngineCall::StopStream);
        Ok(())
    }

    async fn stop_record(&mut self) -> Result<()> {
        self.record(EngineCall::StopRecord);
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        self.record(EngineCall::Release);
        Ok(())
    }
}

pub struct Harness {
    pub orchestrator: SessionOrchestrator,
    pub sensor: SensorHandle,
    pub calls: Arc<Mutex<Vec<EngineCall>>>,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl Harness {
    /// Drain everything delivered to the sink so far
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn engine_calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn audio_switches(&self) -> Vec<AudioMode> {
        self.engine_calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::AudioSource(mode) => Some(mode),
                _ => None,
            })
            .collect()
    }
}

pub fn harness() -> Harness {
    harness_with(OrchestratorConfig::default(), CountingEngine::default())
}

pub fn harness_with(config: OrchestratorConfig, engine: CountingEngine) -> Harness {
    let (test_sensor, sensor) = TestSensor::new();
    let calls = engine.calls.clone();
    let (sink, events) = ChannelSink::new();
    let orchestrator =
        SessionOrchestrator::new(config, Box::new(test_sensor), Box::new(engine), sink);

    Harness {
        orchestrator,
        sensor,
        calls,
        events,
    }
}

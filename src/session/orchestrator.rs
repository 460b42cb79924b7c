use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::{OrchestratorConfig, SessionOptions};
use super::idle::{IdleDetector, IdleTransition};
use super::types::{Reading, SessionResult, SessionState, Status};
use crate::audio::{supported_mode, AudioMode, AudioRouting};
use crate::engine::{CaptureEngine, EngineEvent, VideoSource};
use crate::events::{EventSink, SessionEvent};
use crate::sensor::{GyroSample, SampleCallback, SensorProvider, SensorRate};

/// Mailbox messages for the session actor. Producers (handle methods, the
/// sensor callback, the idle ticker, engine callbacks) only ever enqueue;
/// the actor task is the single writer of all session state.
enum Command {
    Start {
        options: SessionOptions,
        reply: oneshot::Sender<Result<String>>,
    },
    Pause {
        reply: oneshot::Sender<()>,
    },
    Resume {
        reply: oneshot::Sender<()>,
    },
    Stop {
        reply: oneshot::Sender<SessionResult>,
    },
    Sample {
        sample: GyroSample,
        /// Session generation the producing sensor belongs to; stale samples
        /// queued across an implicit restart are dropped
        epoch: u64,
    },
    IdleTick,
    SetAudioMode {
        mode: AudioMode,
        reply: oneshot::Sender<()>,
    },
    SetMicMuted {
        muted: bool,
        reply: oneshot::Sender<()>,
    },
    SetDeviceMuted {
        muted: bool,
        reply: oneshot::Sender<()>,
    },
    Readings {
        reply: oneshot::Sender<Vec<Reading>>,
    },
    Engine(EngineEvent),
}

/// Handle to the session actor
///
/// Cheap to clone; all methods are safe to call concurrently. Mutating calls
/// are applied in a single well-defined order by the actor task.
#[derive(Clone)]
pub struct SessionOrchestrator {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<Status>,
}

impl SessionOrchestrator {
    /// Spawn the session actor owning the given sensor, engine, and sink.
    pub fn new(
        config: OrchestratorConfig,
        sensor: Box<dyn SensorProvider>,
        engine: Box<dyn CaptureEngine>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(Status::default());

        let actor = SessionActor {
            rx,
            commands: commands.clone(),
            config,
            sensor,
            engine,
            sink,
            status: status_tx,
            session: None,
            epoch: 0,
        };
        tokio::spawn(actor.run());

        Self {
            commands,
            status: status_rx,
        }
    }

    /// Start a capture session, implicitly stopping any session in progress.
    ///
    /// Fails (with nothing left running) if the engine rejects the video
    /// configuration or the capture output cannot be started; audio failures
    /// degrade the session to video-only instead.
    pub async fn start_session(&self, options: SessionOptions) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Start { options, reply })
            .map_err(|_| anyhow!("orchestrator task is gone"))?;
        rx.await.context("orchestrator task dropped the reply")?
    }

    /// Pause the capture output. Sensor sampling continues. No-op unless the
    /// session is active.
    pub async fn pause_session(&self) {
        self.roundtrip(|reply| Command::Pause { reply }).await;
    }

    /// Resume a paused capture output. No-op unless the session is paused.
    pub async fn resume_session(&self) {
        self.roundtrip(|reply| Command::Resume { reply }).await;
    }

    /// Stop the session and return its result. Idempotent: with no session
    /// in progress this returns a zeroed result and emits nothing.
    pub async fn stop_session(&self) -> SessionResult {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(Command::Stop { reply }).is_err() {
            warn!("stop requested but orchestrator task is gone");
            return SessionResult::default();
        }
        rx.await.unwrap_or_default()
    }

    /// Switch the base audio mode, clearing both mute flags.
    pub async fn set_audio_mode(&self, mode: AudioMode) {
        self.roundtrip(|reply| Command::SetAudioMode { mode, reply })
            .await;
    }

    /// Mute or unmute the microphone leg. Idempotent.
    pub async fn set_microphone_muted(&self, muted: bool) {
        self.roundtrip(|reply| Command::SetMicMuted { muted, reply })
            .await;
    }

    /// Mute or unmute the device-audio leg. Idempotent.
    pub async fn set_device_audio_muted(&self, muted: bool) {
        self.roundtrip(|reply| Command::SetDeviceMuted { muted, reply })
            .await;
    }

    pub fn is_active(&self) -> bool {
        self.status.borrow().state != SessionState::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.status.borrow().state == SessionState::Paused
    }

    pub fn current_session_id(&self) -> Option<String> {
        self.status.borrow().session_id.clone()
    }

    /// Snapshot of the readings buffered so far (empty with no session)
    pub async fn buffered_readings(&self) -> Vec<Reading> {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(Command::Readings { reply }).is_err() {
            return Vec::new();
        }
        rx.await.unwrap_or_default()
    }

    /// Adapter the host wires into the engine's status callbacks
    pub fn engine_callbacks(&self) -> EngineCallbacks {
        EngineCallbacks {
            commands: self.commands.clone(),
        }
    }

    async fn roundtrip(&self, make: impl FnOnce(oneshot::Sender<()>) -> Command) {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(make(reply)).is_ok() {
            let _ = rx.await;
        }
    }
}

/// Enqueues engine connection callbacks into the actor mailbox. Cloneable,
/// callable from any engine thread, never blocks.
#[derive(Clone)]
pub struct EngineCallbacks {
    commands: mpsc::UnboundedSender<Command>,
}

impl EngineCallbacks {
    pub fn on_connection_started(&self, url: &str) {
        self.send(EngineEvent::ConnectionStarted(url.to_string()));
    }

    pub fn on_connection_success(&self) {
        self.send(EngineEvent::ConnectionSuccess);
    }

    pub fn on_connection_failed(&self, reason: &str) {
        self.send(EngineEvent::ConnectionFailed(reason.to_string()));
    }

    pub fn on_disconnect(&self) {
        self.send(EngineEvent::Disconnected);
    }

    pub fn on_auth_error(&self) {
        self.send(EngineEvent::AuthError);
    }

    pub fn on_auth_success(&self) {
        self.send(EngineEvent::AuthSuccess);
    }

    fn send(&self, event: EngineEvent) {
        let _ = self.commands.send(Command::Engine(event));
    }
}

/// State held for one live session
struct ActiveSession {
    id: String,
    game_id: String,
    start_time: DateTime<Utc>,
    started: Instant,
    stream_url: Option<String>,
    record_path: Option<PathBuf>,
    readings: Vec<Reading>,
    idle: IdleDetector,
    routing: AudioRouting,
    /// False after a non-fatal audio setup failure: routing state still
    /// tracks intent but no engine switches are issued
    audio_enabled: bool,
    pause_started: Option<Instant>,
    total_paused: Duration,
    ticker: JoinHandle<()>,
}

/// The single-writer actor owning all session state
struct SessionActor {
    rx: mpsc::UnboundedReceiver<Command>,
    /// Cloned into the sensor callback and the idle ticker
    commands: mpsc::UnboundedSender<Command>,
    config: OrchestratorConfig,
    sensor: Box<dyn SensorProvider>,
    engine: Box<dyn CaptureEngine>,
    sink: Arc<dyn EventSink>,
    status: watch::Sender<Status>,
    session: Option<ActiveSession>,
    /// Bumped on every start; samples carry the epoch they were produced under
    epoch: u64,
}

impl SessionActor {
    async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                Command::Start { options, reply } => {
                    let _ = reply.send(self.start(options).await);
                }
                Command::Pause { reply } => {
                    self.pause().await;
                    let _ = reply.send(());
                }
                Command::Resume { reply } => {
                    self.resume().await;
                    let _ = reply.send(());
                }
                Command::Stop { reply } => {
                    let _ = reply.send(self.stop().await);
                }
                Command::Sample { sample, epoch } => self.on_sample(sample, epoch),
                Command::IdleTick => self.on_idle_tick(),
                Command::SetAudioMode { mode, reply } => {
                    self.set_audio_mode(mode).await;
                    let _ = reply.send(());
                }
                Command::SetMicMuted { muted, reply } => {
                    self.set_mic_muted(muted).await;
                    let _ = reply.send(());
                }
                Command::SetDeviceMuted { muted, reply } => {
                    self.set_device_muted(muted).await;
                    let _ = reply.send(());
                }
                Command::Readings { reply } => {
                    let snapshot = self
                        .session
                        .as_ref()
                        .map(|s| s.readings.clone())
                        .unwrap_or_default();
                    let _ = reply.send(snapshot);
                }
                Command::Engine(event) => self.on_engine_event(event),
            }
        }
        debug!("orchestrator handle dropped, actor exiting");
    }

    async fn start(&mut self, options: SessionOptions) -> Result<String> {
        if self.session.is_some() {
            info!("session in progress, stopping it before starting a new one");
            let _ = self.stop().await;
        }

        let id = format!("session-{}", Uuid::new_v4());
        self.epoch += 1;

        // video is mandatory: a rejected configuration aborts the start
        self.engine
            .prepare_video(self.config.video)
            .await
            .context("video encoder configuration rejected")?;
        self.engine
            .change_video_source(VideoSource::Screen)
            .await
            .context("video source configuration rejected")?;

        let (base_mode, fell_back) = supported_mode(options.audio_mode, &self.config.capabilities);
        let routing = AudioRouting::new(base_mode);
        let mut warnings = Vec::new();
        if fell_back {
            warnings.push(format!(
                "audio mode {:?} unsupported on this platform, using {:?}",
                options.audio_mode, base_mode
            ));
        }

        // audio is best-effort: failures degrade the session to video-only
        let mut audio_enabled = match self.engine.prepare_audio(self.config.audio).await {
            Ok(()) => true,
            Err(e) => {
                warn!("audio configuration failed, continuing video-only: {e:#}");
                warnings.push(format!("audio configuration failed: {e}"));
                false
            }
        };
        if audio_enabled && routing.effective() != AudioMode::None {
            if let Err(e) = self.engine.change_audio_source(routing.effective()).await {
                warn!("audio source setup failed, continuing video-only: {e:#}");
                warnings.push(format!("audio source setup failed: {e}"));
                audio_enabled = false;
            }
        }

        if let Err(e) = self.start_sensor(options.sensor_rate) {
            self.unwind_engine().await;
            return Err(e).context("sensor start failed");
        }

        let mut record_path = None;
        let output = match &options.stream_url {
            Some(url) => self.engine.start_stream(url).await,
            None => {
                let path = self.config.output_dir.join(format!("{id}.mp4"));
                let res = self.engine.start_record(&path).await;
                record_path = Some(path);
                res
            }
        };
        if let Err(e) = output {
            self.sensor.stop();
            self.unwind_engine().await;
            return Err(e).context("capture output start failed");
        }

        let ticker = spawn_idle_ticker(self.commands.clone(), self.config.idle_check_period);
        let now = Instant::now();
        let start_time = Utc::now();

        self.session = Some(ActiveSession {
            id: id.clone(),
            game_id: options.game_id.clone(),
            start_time,
            started: now,
            stream_url: options.stream_url.clone(),
            record_path,
            readings: Vec::new(),
            idle: IdleDetector::new(self.config.idle_threshold, self.config.idle_timeout, now),
            routing,
            audio_enabled,
            pause_started: None,
            total_paused: Duration::ZERO,
            ticker,
        });
        self.publish_status();

        self.emit(SessionEvent::SessionStarted {
            session_id: id.clone(),
            game_id: options.game_id.clone(),
            start_time,
        });
        for reason in warnings {
            self.emit(SessionEvent::AudioWarning {
                session_id: id.clone(),
                reason,
            });
        }
        self.emit(SessionEvent::StreamingStarted {
            session_id: id.clone(),
        });

        info!(
            "session started: {} (game: {}, target: {})",
            id,
            options.game_id,
            options.stream_url.as_deref().unwrap_or("local recording")
        );
        Ok(id)
    }

    async fn stop(&mut self) -> SessionResult {
        let Some(mut s) = self.session.take() else {
            debug!("stop requested with no session in progress");
            return SessionResult::default();
        };

        self.sensor.stop();
        s.ticker.abort();

        // teardown is best-effort: the caller is never blocked on it
        if s.stream_url.is_some() {
            if let Err(e) = self.engine.stop_stream().await {
                warn!("stream teardown failed: {e:#}");
            }
        } else if let Err(e) = self.engine.stop_record().await {
            warn!("recording teardown failed: {e:#}");
        }
        if let Err(e) = self.engine.release().await {
            warn!("engine release failed: {e:#}");
        }

        let now = Instant::now();
        if let Some(pause_started) = s.pause_started.take() {
            s.total_paused += now.duration_since(pause_started);
        }
        let active = now.duration_since(s.started).saturating_sub(s.total_paused);

        let result = SessionResult {
            session_id: s.id.clone(),
            game_id: s.game_id,
            start_time: s.start_time,
            end_time: Utc::now(),
            active_duration_ms: active.as_millis() as u64,
            reading_count: s.readings.len(),
            readings: s.readings,
            record_path: s.record_path,
        };

        self.publish_status();
        self.emit(SessionEvent::SessionStopped {
            session_id: s.id.clone(),
        });
        self.emit(SessionEvent::StreamingStopped { session_id: s.id });

        info!(
            "session stopped: {} ({} readings, {} ms active)",
            result.session_id, result.reading_count, result.active_duration_ms
        );
        result
    }

    async fn pause(&mut self) {
        let id = match self.session.as_mut() {
            Some(s) if s.pause_started.is_none() => {
                s.pause_started = Some(Instant::now());
                s.id.clone()
            }
            _ => return,
        };

        if let Err(e) = self.engine.pause_record().await {
            warn!("engine pause failed: {e:#}");
        }
        self.publish_status();
        self.emit(SessionEvent::StreamingPaused { session_id: id });
    }

    async fn resume(&mut self) {
        let id = match self.session.as_mut() {
            Some(s) => match s.pause_started.take() {
                Some(pause_started) => {
                    s.total_paused += Instant::now().duration_since(pause_started);
                    s.id.clone()
                }
                None => return,
            },
            None => return,
        };

        if let Err(e) = self.engine.resume_record().await {
            warn!("engine resume failed: {e:#}");
        }
        self.publish_status();
        self.emit(SessionEvent::StreamingResumed { session_id: id });
    }

    fn on_sample(&mut self, sample: GyroSample, epoch: u64) {
        if epoch != self.epoch {
            return;
        }
        let Some(s) = self.session.as_mut() else {
            return;
        };

        let now = Instant::now();
        // classification at arrival, before this sample moves the detector
        let was_idle = s.idle.is_idle();

        s.readings.push(Reading {
            x: sample.x,
            y: sample.y,
            z: sample.z,
            sensor_timestamp_ns: sample.timestamp_ns,
            arrived_at: Utc::now(),
            is_idle: was_idle,
        });
        let transition = s.idle.on_sample(sample.magnitude(), now);
        let id = s.id.clone();

        self.emit(SessionEvent::GyroReading {
            session_id: id.clone(),
            x: sample.x,
            y: sample.y,
            z: sample.z,
            sensor_timestamp_ns: sample.timestamp_ns,
            is_idle: was_idle,
        });
        if transition == Some(IdleTransition::BecameActive) {
            debug!("movement resumed");
            self.emit(SessionEvent::GyroActive {
                session_id: id,
                timestamp: Utc::now(),
            });
        }
    }

    fn on_idle_tick(&mut self) {
        let Some(s) = self.session.as_mut() else {
            return;
        };

        let transition = s.idle.on_tick(Instant::now());
        let id = s.id.clone();

        if transition == Some(IdleTransition::BecameIdle) {
            debug!("no movement past timeout, session idle");
            self.emit(SessionEvent::GyroIdle {
                session_id: id,
                timestamp: Utc::now(),
            });
        }
    }

    async fn set_audio_mode(&mut self, requested: AudioMode) {
        let (mode, fell_back) = supported_mode(requested, &self.config.capabilities);
        let (id, changed, audio_enabled) = match self.session.as_mut() {
            Some(s) => (s.id.clone(), s.routing.set_mode(mode), s.audio_enabled),
            None => {
                warn!("audio mode change ignored: no session in progress");
                return;
            }
        };

        if fell_back {
            self.emit(SessionEvent::AudioWarning {
                session_id: id.clone(),
                reason: format!("audio mode {requested:?} unsupported on this platform, using {mode:?}"),
            });
        }
        if let Some(effective) = changed {
            self.switch_audio_source(&id, effective, audio_enabled).await;
        }
    }

    async fn set_mic_muted(&mut self, muted: bool) {
        let (id, changed, audio_enabled) = match self.session.as_mut() {
            Some(s) => (s.id.clone(), s.routing.set_mic_muted(muted), s.audio_enabled),
            None => {
                warn!("microphone mute ignored: no session in progress");
                return;
            }
        };

        if let Some(effective) = changed {
            self.switch_audio_source(&id, effective, audio_enabled).await;
        }
    }

    async fn set_device_muted(&mut self, muted: bool) {
        let (id, changed, audio_enabled) = match self.session.as_mut() {
            Some(s) => (
                s.id.clone(),
                s.routing.set_device_muted(muted),
                s.audio_enabled,
            ),
            None => {
                warn!("device audio mute ignored: no session in progress");
                return;
            }
        };

        if let Some(effective) = changed {
            self.switch_audio_source(&id, effective, audio_enabled).await;
        }
    }

    async fn switch_audio_source(&mut self, session_id: &str, effective: AudioMode, audio_enabled: bool) {
        if !audio_enabled {
            debug!("audio disabled for this session, skipping source switch");
            return;
        }
        info!("switching audio source to {:?}", effective);
        if let Err(e) = self.engine.change_audio_source(effective).await {
            warn!("audio source switch failed: {e:#}");
            self.emit(SessionEvent::StreamingError {
                session_id: session_id.to_string(),
                reason: format!("audio source switch failed: {e}"),
            });
        }
    }

    fn on_engine_event(&mut self, event: EngineEvent) {
        let Some(s) = self.session.as_ref() else {
            debug!("dropping engine callback with no session in progress: {event:?}");
            return;
        };
        let id = s.id.clone();

        // transport trouble never tears the session down; the caller decides
        match event {
            EngineEvent::ConnectionStarted(url) => debug!("connecting to {url}"),
            EngineEvent::ConnectionSuccess => info!("stream connection established"),
            EngineEvent::AuthSuccess => debug!("stream authentication accepted"),
            EngineEvent::ConnectionFailed(reason) => {
                warn!("stream connection failed: {reason}");
                self.emit(SessionEvent::StreamingError {
                    session_id: id,
                    reason: format!("connection failed: {reason}"),
                });
            }
            EngineEvent::AuthError => {
                warn!("stream authentication rejected");
                self.emit(SessionEvent::StreamingError {
                    session_id: id,
                    reason: "authentication failed".to_string(),
                });
            }
            EngineEvent::Disconnected => {
                warn!("stream disconnected");
                self.emit(SessionEvent::StreamingError {
                    session_id: id,
                    reason: "disconnected".to_string(),
                });
            }
        }
    }

    fn start_sensor(&mut self, rate: SensorRate) -> Result<()> {
        let commands = self.commands.clone();
        let epoch = self.epoch;
        let callback: SampleCallback = Arc::new(move |sample| {
            let _ = commands.send(Command::Sample { sample, epoch });
        });
        self.sensor.start(rate, callback)
    }

    async fn unwind_engine(&mut self) {
        if let Err(e) = self.engine.release().await {
            warn!("engine release failed during unwind: {e:#}");
        }
    }

    fn publish_status(&self) {
        let status = match &self.session {
            None => Status {
                state: SessionState::Idle,
                session_id: None,
            },
            Some(s) if s.pause_started.is_some() => Status {
                state: SessionState::Paused,
                session_id: Some(s.id.clone()),
            },
            Some(s) => Status {
                state: SessionState::Active,
                session_id: Some(s.id.clone()),
            },
        };
        let _ = self.status.send(status);
    }

    fn emit(&self, event: SessionEvent) {
        self.sink.deliver(event);
    }
}

fn spawn_idle_ticker(
    commands: mpsc::UnboundedSender<Command>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if commands.send(Command::IdleTick).is_err() {
                break;
            }
        }
    })
}

pub mod audio;
pub mod config;
pub mod engine;
pub mod events;
pub mod http;
pub mod nats;
pub mod sensor;
pub mod session;

pub use audio::{AudioCapabilities, AudioMode, AudioRouting};
pub use config::Config;
pub use engine::{AudioConfig, CaptureEngine, EngineEvent, NullEngine, VideoConfig, VideoSource};
pub use events::{ChannelSink, EventSink, SessionEvent};
pub use http::{create_router, AppState};
pub use nats::NatsEventSink;
pub use sensor::{GyroSample, SampleCallback, SensorProvider, SensorRate, SimulatedSensor};
pub use session::{
    EngineCallbacks, OrchestratorConfig, Reading, SessionOptions, SessionOrchestrator,
    SessionResult, SessionState,
};

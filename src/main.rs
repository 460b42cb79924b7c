use anyhow::Result;
use clap::Parser;
use gyrostream::{
    create_router, AppState, ChannelSink, Config, EventSink, NatsEventSink, NullEngine,
    SessionEvent, SessionOrchestrator, SimulatedSensor,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Capture session orchestrator service
///
/// Runs the orchestrator against the simulated gyroscope and the null
/// capture engine, exposing the HTTP control API. Real sensor and engine
/// implementations are wired in by the embedding host.
#[derive(Parser)]
#[command(name = "gyrostream")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/gyrostream")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Recordings directory: {}", cfg.capture.output_dir);

    let sink: Arc<dyn EventSink> = match &cfg.nats {
        Some(nats) => {
            info!("Delivering session events to NATS");
            Arc::new(NatsEventSink::connect(&nats.url).await?)
        }
        None => {
            info!("No NATS configured, logging session events");
            let (sink, rx) = ChannelSink::new();
            tokio::spawn(log_events(rx));
            sink
        }
    };

    let sensor = Box::new(SimulatedSensor::new(
        Duration::from_millis(cfg.simulation.burst_ms),
        Duration::from_millis(cfg.simulation.lull_ms),
    ));
    let engine = Box::new(NullEngine::new());
    let orchestrator = SessionOrchestrator::new(cfg.orchestrator(), sensor, engine, sink);

    let app = create_router(AppState::new(orchestrator));
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn log_events(mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = rx.recv().await {
        // readings are too chatty for the log at game sampling rates
        if matches!(event, SessionEvent::GyroReading { .. }) {
            continue;
        }
        match serde_json::to_string(&event) {
            Ok(json) => info!("session event: {}", json),
            Err(e) => tracing::warn!("failed to serialize session event: {}", e),
        }
    }
}

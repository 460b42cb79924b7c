use anyhow::{Context, Result};
use async_nats::Client;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::events::{EventSink, SessionEvent};

/// Event sink that publishes to NATS
///
/// `deliver` only enqueues; a background task serializes and publishes.
/// Publish failures are logged and the event dropped, matching the
/// fire-and-forget delivery contract.
pub struct NatsEventSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl NatsEventSink {
    /// Connect to the NATS server and spawn the publisher task
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(publish_loop(client, rx));

        Ok(Self { tx })
    }
}

impl EventSink for NatsEventSink {
    fn deliver(&self, event: SessionEvent) {
        // publisher task gone means shutdown; events are droppable
        let _ = self.tx.send(event);
    }
}

async fn publish_loop(client: Client, mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = rx.recv().await {
        let subject = format!("capture.events.{}", event.session_id());

        let payload = match serde_json::to_vec(&event) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to serialize session event: {}", e);
                continue;
            }
        };

        if let Err(e) = client.publish(subject, payload.into()).await {
            error!("Failed to publish session event: {}", e);
        }
    }
}

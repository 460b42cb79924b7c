//! NATS delivery for session events
//!
//! Publishes every `SessionEvent` as JSON to `capture.events.<session-id>`,
//! decoupled from the orchestrator through an unbounded channel so event
//! emission never waits on the broker.

mod sink;

pub use sink::NatsEventSink;

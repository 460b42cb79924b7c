// Integration tests for audio routing driven through the orchestrator:
// every effective-mode change must reach the engine exactly once.

mod common;

use common::{harness, harness_with, CountingEngine};
use gyrostream::{AudioCapabilities, AudioMode, OrchestratorConfig, SessionEvent, SessionOptions};

#[tokio::test(start_paused = true)]
async fn start_applies_the_requested_audio_source() {
    let mut h = harness();

    h.orchestrator
        .start_session(SessionOptions::new("audio_start"))
        .await
        .unwrap();

    assert_eq!(h.audio_switches(), vec![AudioMode::Mixed]);
    let _ = h.drain_events();
}

#[tokio::test(start_paused = true)]
async fn mute_toggle_issues_exactly_one_switch() {
    let mut h = harness();

    h.orchestrator
        .start_session(SessionOptions::new("mute_once"))
        .await
        .unwrap();

    h.orchestrator.set_microphone_muted(true).await;
    // second identical call: no state change, no engine call
    h.orchestrator.set_microphone_muted(true).await;

    assert_eq!(
        h.audio_switches(),
        vec![AudioMode::Mixed, AudioMode::DeviceOnly]
    );
    let _ = h.drain_events();
}

#[tokio::test(start_paused = true)]
async fn mute_sequence_walks_the_derivation_table() {
    let mut h = harness();

    h.orchestrator
        .start_session(SessionOptions::new("mute_walk"))
        .await
        .unwrap();

    h.orchestrator.set_microphone_muted(true).await;
    h.orchestrator.set_device_audio_muted(true).await;
    h.orchestrator.set_microphone_muted(false).await;

    assert_eq!(
        h.audio_switches(),
        vec![
            AudioMode::Mixed,
            AudioMode::DeviceOnly,
            AudioMode::None,
            AudioMode::DeviceOnly,
        ]
    );
    let _ = h.drain_events();
}

#[tokio::test(start_paused = true)]
async fn mode_change_clears_mutes_and_switches_once() {
    let mut h = harness();

    h.orchestrator
        .start_session(SessionOptions::new("mode_reset"))
        .await
        .unwrap();

    h.orchestrator.set_microphone_muted(true).await;
    h.orchestrator.set_audio_mode(AudioMode::Mixed).await;

    assert_eq!(
        h.audio_switches(),
        vec![AudioMode::Mixed, AudioMode::DeviceOnly, AudioMode::Mixed]
    );
    let _ = h.drain_events();
}

#[tokio::test(start_paused = true)]
async fn unaffected_leg_mute_issues_no_switch() {
    let mut h = harness();

    let mut options = SessionOptions::new("device_only");
    options.audio_mode = AudioMode::DeviceOnly;
    h.orchestrator.start_session(options).await.unwrap();

    // mic mute cannot change a device-only mix
    h.orchestrator.set_microphone_muted(true).await;

    assert_eq!(h.audio_switches(), vec![AudioMode::DeviceOnly]);
    let _ = h.drain_events();
}

#[tokio::test(start_paused = true)]
async fn capability_fallback_degrades_and_warns() {
    let config = OrchestratorConfig {
        capabilities: AudioCapabilities {
            device_audio: false,
        },
        ..OrchestratorConfig::default()
    };
    let mut h = harness_with(config, CountingEngine::default());

    h.orchestrator
        .start_session(SessionOptions::new("no_device_audio"))
        .await
        .unwrap();

    // mixed degraded to mic-only at start
    assert_eq!(h.audio_switches(), vec![AudioMode::MicOnly]);
    let events = h.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::AudioWarning { .. })));

    // a device-only request degrades too; effective mode is unchanged, so
    // the engine sees nothing new
    h.orchestrator.set_audio_mode(AudioMode::DeviceOnly).await;
    assert_eq!(h.audio_switches(), vec![AudioMode::MicOnly]);
    let events = h.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::AudioWarning { .. })));
}

#[tokio::test(start_paused = true)]
async fn routing_calls_without_a_session_are_ignored() {
    let mut h = harness();

    h.orchestrator.set_microphone_muted(true).await;
    h.orchestrator.set_audio_mode(AudioMode::MicOnly).await;

    assert!(h.engine_calls().is_empty());
    assert!(h.drain_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn routing_resets_between_sessions() {
    let mut h = harness();

    h.orchestrator
        .start_session(SessionOptions::new("first"))
        .await
        .unwrap();
    h.orchestrator.set_microphone_muted(true).await;
    h.orchestrator.stop_session().await;

    // the next session starts from its requested base mode, mutes cleared
    h.orchestrator
        .start_session(SessionOptions::new("second"))
        .await
        .unwrap();

    assert_eq!(
        h.audio_switches(),
        vec![AudioMode::Mixed, AudioMode::DeviceOnly, AudioMode::Mixed]
    );
    let _ = h.drain_events();
}

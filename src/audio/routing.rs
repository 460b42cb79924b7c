// Audio routing state machine
//
// Tracks the caller-facing audio intent (base mode plus two independent mute
// flags) and derives the effective source to apply to the capture engine.
// The effective mode is a pure function of the three fields; mutations report
// whether the effective mode changed so the caller issues at most one engine
// source switch per change.

use serde::{Deserialize, Serialize};

/// Audio source applied to the capture engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMode {
    /// Microphone only
    MicOnly,
    /// Device-internal audio only (game/app sound)
    DeviceOnly,
    /// Microphone and device audio mixed
    Mixed,
    /// No audio track
    None,
}

/// Platform audio capture capabilities
///
/// Combined device+mic capture needs OS support that not every platform tier
/// has; requests beyond the tier degrade one level instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct AudioCapabilities {
    /// Whether device-internal audio can be captured at all
    pub device_audio: bool,
}

impl Default for AudioCapabilities {
    fn default() -> Self {
        Self { device_audio: true }
    }
}

/// Degrade a requested mode to what the platform supports.
///
/// Returns the mode to use and whether a fallback happened.
pub fn supported_mode(requested: AudioMode, caps: &AudioCapabilities) -> (AudioMode, bool) {
    if caps.device_audio {
        return (requested, false);
    }
    match requested {
        AudioMode::Mixed | AudioMode::DeviceOnly => (AudioMode::MicOnly, true),
        other => (other, false),
    }
}

/// Base mode plus mute flags, with the effective-mode derivation
#[derive(Debug, Clone)]
pub struct AudioRouting {
    base: AudioMode,
    mic_muted: bool,
    device_muted: bool,
}

impl AudioRouting {
    pub fn new(base: AudioMode) -> Self {
        Self {
            base,
            mic_muted: false,
            device_muted: false,
        }
    }

    pub fn base(&self) -> AudioMode {
        self.base
    }

    pub fn mic_muted(&self) -> bool {
        self.mic_muted
    }

    pub fn device_muted(&self) -> bool {
        self.device_muted
    }

    /// The source actually applied to the engine
    pub fn effective(&self) -> AudioMode {
        match self.base {
            AudioMode::Mixed => match (self.mic_muted, self.device_muted) {
                (false, false) => AudioMode::Mixed,
                (true, false) => AudioMode::DeviceOnly,
                (false, true) => AudioMode::MicOnly,
                (true, true) => AudioMode::None,
            },
            AudioMode::MicOnly => {
                if self.mic_muted {
                    AudioMode::None
                } else {
                    AudioMode::MicOnly
                }
            }
            AudioMode::DeviceOnly => {
                if self.device_muted {
                    AudioMode::None
                } else {
                    AudioMode::DeviceOnly
                }
            }
            AudioMode::None => AudioMode::None,
        }
    }

    /// Switch the base mode, clearing both mute flags.
    ///
    /// Returns the new effective mode if it differs from the previous one.
    pub fn set_mode(&mut self, mode: AudioMode) -> Option<AudioMode> {
        let before = self.effective();
        self.base = mode;
        self.mic_muted = false;
        self.device_muted = false;
        let after = self.effective();
        (after != before).then_some(after)
    }

    /// Mute or unmute the microphone leg.
    ///
    /// Setting the current value is a no-op. Returns the new effective mode
    /// if it changed.
    pub fn set_mic_muted(&mut self, muted: bool) -> Option<AudioMode> {
        if self.mic_muted == muted {
            return None;
        }
        let before = self.effective();
        self.mic_muted = muted;
        let after = self.effective();
        (after != before).then_some(after)
    }

    /// Mute or unmute the device-audio leg. Same contract as `set_mic_muted`.
    pub fn set_device_muted(&mut self, muted: bool) -> Option<AudioMode> {
        if self.device_muted == muted {
            return None;
        }
        let before = self.effective();
        self.device_muted = muted;
        let after = self.effective();
        (after != before).then_some(after)
    }
}

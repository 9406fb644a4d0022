//! Debounce filter, mode selection and per-tick input glue

use portable_atomic::{AtomicBool, Ordering};

use crate::hal::{Duration, Feedback, Instant, StatusFlags};
use crate::types::DecoderConfig;

/// Accepted key transition produced by the debounce filter
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum KeyEdge {
    Pressed,
    Released,
}

/// Settle-window debounce filter for the raw key sample.
///
/// A raw value is committed only after it has held unchanged for the whole
/// window, so the accepted state never changes more than once per window.
/// A filter cannot fail; noise only delays recognition of a real edge.
pub struct Debouncer {
    window: Duration,
    last_raw: bool,
    last_change: Instant,
    accepted: bool,
}

impl Debouncer {
    pub fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            last_raw: false,
            last_change: now,
            accepted: false,
        }
    }

    /// Feed one raw sample; returns the edge if a new value is accepted
    pub fn update(&mut self, raw: bool, now: Instant) -> Option<KeyEdge> {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change = now;
        }

        if raw != self.accepted && now.duration_since(self.last_change) >= self.window {
            self.accepted = raw;
            Some(if raw { KeyEdge::Pressed } else { KeyEdge::Released })
        } else {
            None
        }
    }

    /// Currently accepted key level
    pub fn state(&self) -> bool {
        self.accepted
    }
}

/// Session mode selection: boot-time default plus the live host flags.
///
/// The key sampled held at power-on selects raw passthrough for the
/// session default; afterwards the host-reported flag wins whenever it is
/// readable and the default applies only when the read fails.
#[derive(Copy, Clone, Debug)]
pub struct SessionMode {
    decode_default: bool,
}

impl SessionMode {
    /// `raw_at_boot` is the one-shot key sample taken at power-on
    pub const fn new(raw_at_boot: bool) -> Self {
        Self {
            decode_default: !raw_at_boot,
        }
    }

    /// Resolve the decode flag against the external status source
    pub fn decode_enabled<F: StatusFlags>(&self, flags: &mut F) -> bool {
        flags.decode_enabled().unwrap_or(self.decode_default)
    }

    /// Resolve the sound flag; silent when the source is unreadable
    pub fn sound_enabled<F: StatusFlags>(&self, flags: &mut F) -> bool {
        flags.sound_enabled().unwrap_or(false)
    }

    pub const fn decode_default(&self) -> bool {
        self.decode_default
    }
}

impl Default for SessionMode {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Mode flags shared with the typist task.
///
/// Written by the decoder pipeline on every accepted edge, read from the
/// transport side when rendering actions. Safe in interrupt contexts.
pub struct SharedFlags {
    decode: AtomicBool,
    sound: AtomicBool,
}

impl SharedFlags {
    pub const fn new() -> Self {
        Self {
            decode: AtomicBool::new(true),
            sound: AtomicBool::new(false),
        }
    }

    pub fn set_decode(&self, enabled: bool) {
        self.decode.store(enabled, Ordering::Relaxed);
    }

    pub fn decode(&self) -> bool {
        self.decode.load(Ordering::Relaxed)
    }

    pub fn set_sound(&self, enabled: bool) {
        self.sound.store(enabled, Ordering::Relaxed);
    }

    pub fn sound(&self) -> bool {
        self.sound.load(Ordering::Relaxed)
    }
}

impl Default for SharedFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tick input pipeline: debounce the raw sample, re-read the mode
/// flags on every accepted edge and fire the feedback outputs.
pub struct KeyController {
    debouncer: Debouncer,
    mode: SessionMode,
    decode_enabled: bool,
    sound_enabled: bool,
}

impl KeyController {
    pub fn new(config: DecoderConfig, mode: SessionMode, now: Instant) -> Self {
        Self {
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms), now),
            mode,
            decode_enabled: mode.decode_default(),
            sound_enabled: false,
        }
    }

    /// Process one raw sample. On an accepted transition the mode flags
    /// are refreshed and the indicator/tone outputs updated; the tone is
    /// gated by the sound flag, the indicator always follows the key.
    pub fn poll<F: StatusFlags, B: Feedback>(
        &mut self,
        raw: bool,
        now: Instant,
        flags: &mut F,
        feedback: &mut B,
    ) -> Option<KeyEdge> {
        let edge = self.debouncer.update(raw, now)?;

        self.decode_enabled = self.mode.decode_enabled(flags);
        self.sound_enabled = self.mode.sound_enabled(flags);

        let pressed = edge == KeyEdge::Pressed;
        feedback.set_indicator(pressed).ok();
        if self.sound_enabled {
            feedback.set_tone(pressed).ok();
        } else if !pressed {
            // Key-up always silences, even if sound was just disabled
            feedback.set_tone(false).ok();
        }

        Some(edge)
    }

    /// Debounced key level
    pub fn key_down(&self) -> bool {
        self.debouncer.state()
    }

    pub fn decode_enabled(&self) -> bool {
        self.decode_enabled
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }
}

/// One-shot boot check: a key held at power-on selects raw passthrough
/// for the session and blocks until it is released.
#[cfg(feature = "embassy-time")]
pub async fn boot_mode_check<K: crate::hal::KeyPin>(key: &mut K) -> SessionMode {
    use embassy_time::Timer;

    let raw_at_boot = key.is_pressed().unwrap_or(false);
    if raw_at_boot {
        // No debounce needed for a one-shot check; just poll until release
        while key.is_pressed().unwrap_or(false) {
            Timer::after(Duration::from_millis(10)).await;
        }
    }
    SessionMode::new(raw_at_boot)
}

//! Key-event state machine for the straight-key decoder

use heapless::spsc::Producer;

use crate::hal::Instant;
use crate::morse;
use crate::types::{Action, DecoderConfig, DecoderState, SymbolBuffer};

/// Timing-driven decoder FSM.
///
/// Consumes the debounced key level once per tick, classifies completed
/// presses into dots and dashes, and emits output actions into the
/// keystroke queue. Emission is fire-and-forget: a full queue drops the
/// action but never stalls a state transition.
pub struct MorseFsm {
    state: DecoderState,
    config: DecoderConfig,
    buffer: SymbolBuffer,
}

impl MorseFsm {
    /// Create new FSM with given configuration
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            state: DecoderState::Idling,
            config,
            buffer: SymbolBuffer::new(),
        }
    }

    /// Get current FSM state
    pub fn current_state(&self) -> DecoderState {
        self.state
    }

    /// Symbols accumulated for the character in progress
    pub fn pending_symbols(&self) -> &SymbolBuffer {
        &self.buffer
    }

    /// Advance the machine by one tick.
    ///
    /// `key_down` is the debounced key level, `decode_enabled` the current
    /// mode flag, `now` the monotonic clock read for this tick. Returns the
    /// number of actions enqueued.
    pub fn update<const N: usize>(
        &mut self,
        key_down: bool,
        decode_enabled: bool,
        now: Instant,
        queue: &mut Producer<'_, Action, N>,
    ) -> usize {
        match self.state {
            DecoderState::Idling => self.handle_idling(key_down, now),

            DecoderState::KeyDown(pressed_at) => {
                self.handle_key_down(pressed_at, key_down, decode_enabled, now, queue)
            }

            DecoderState::LongDown => self.handle_long_down(key_down),

            DecoderState::Release(released_at) => {
                self.handle_release(released_at, key_down, decode_enabled, now, queue)
            }
        }
    }

    /// Idling: wait for the first press of a character
    fn handle_idling(&mut self, key_down: bool, now: Instant) -> usize {
        if key_down {
            self.state = DecoderState::KeyDown(now);
        }
        0
    }

    /// KeyDown: classify on release, or detect the backspace gesture
    fn handle_key_down<const N: usize>(
        &mut self,
        pressed_at: Instant,
        key_down: bool,
        decode_enabled: bool,
        now: Instant,
        queue: &mut Producer<'_, Action, N>,
    ) -> usize {
        if !key_down {
            let held = now.duration_since(pressed_at);
            let symbol = self.config.classify(held);
            self.state = DecoderState::Release(now);

            if decode_enabled {
                self.buffer.push(symbol);
                0
            } else {
                // Raw passthrough: symbols go out immediately, nothing buffered
                enqueue(queue, Action::Raw(symbol))
            }
        } else if now.duration_since(pressed_at) >= self.config.word_gap() {
            // Over-long press is the error-correction gesture: one backspace,
            // pending symbols discarded, then wait for release
            self.buffer.clear();
            self.state = DecoderState::LongDown;
            enqueue(queue, Action::Backspace)
        } else {
            0
        }
    }

    /// LongDown: ignore all timing until the key is released
    fn handle_long_down(&mut self, key_down: bool) -> usize {
        if !key_down {
            self.state = DecoderState::Idling;
        }
        0
    }

    /// Release: re-press continues the character, silence ends it
    fn handle_release<const N: usize>(
        &mut self,
        released_at: Instant,
        key_down: bool,
        decode_enabled: bool,
        now: Instant,
        queue: &mut Producer<'_, Action, N>,
    ) -> usize {
        if key_down {
            self.state = DecoderState::KeyDown(now);
            return 0;
        }

        let gap = now.duration_since(released_at);
        let mut sent = 0;

        if gap >= self.config.char_gap() && !self.buffer.is_empty() {
            if decode_enabled {
                // Unmapped sequences are dropped without output
                if let Some(ch) = morse::lookup(self.buffer.as_slice()) {
                    sent += enqueue(queue, Action::Character(ch));
                }
            } else {
                // Decode flag flipped off mid-character: flush as a space
                // rather than decoding a half-typed sequence
                sent += enqueue(queue, Action::Space);
            }
            self.buffer.clear();
        }

        if gap >= self.config.word_gap() {
            sent += enqueue(queue, Action::Space);
            self.state = DecoderState::Idling;
        }

        sent
    }

    /// Reset FSM to initial state
    pub fn reset(&mut self) {
        self.state = DecoderState::Idling;
        self.buffer.clear();
    }

    /// Get current configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Update configuration; derived thresholds scale with the new unit
    pub fn set_config(&mut self, config: DecoderConfig) {
        self.config = config;
    }
}

fn enqueue<const N: usize>(queue: &mut Producer<'_, Action, N>, action: Action) -> usize {
    queue.enqueue(action).is_ok() as usize
}

/// Async task running the full per-tick pipeline: sample, debounce,
/// re-read mode flags on accepted edges, drive the FSM.
#[cfg(feature = "embassy-time")]
pub async fn decoder_task<K, F, B, const N: usize>(
    mut key: K,
    mut flags: F,
    mut feedback: B,
    shared: &crate::controller::SharedFlags,
    mut queue: Producer<'_, Action, N>,
    config: DecoderConfig,
    mode: crate::controller::SessionMode,
) -> !
where
    K: crate::hal::KeyPin,
    F: crate::hal::StatusFlags,
    B: crate::hal::Feedback,
{
    use embassy_time::Timer;

    use crate::controller::KeyController;

    let mut controller = KeyController::new(config, mode, Instant::now());
    let mut fsm = MorseFsm::new(config);
    let tick_interval = config.unit / 8;

    loop {
        let now = Instant::now();
        let raw = key.is_pressed().unwrap_or(false);

        if controller.poll(raw, now, &mut flags, &mut feedback).is_some() {
            shared.set_decode(controller.decode_enabled());
            shared.set_sound(controller.sound_enabled());
        }

        let _sent = fsm.update(controller.key_down(), controller.decode_enabled(), now, &mut queue);

        #[cfg(feature = "defmt")]
        defmt::trace!("FSM state: {:?}", defmt::Debug2Format(&fsm.current_state()));

        Timer::after(tick_interval).await;
    }
}

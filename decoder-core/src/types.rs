//! Core data types for the straight-key decoder

use crate::hal::{Duration, Instant};

/// Morse signal elements produced by a completed key-down interval
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "std", derive(Hash))]
pub enum Symbol {
    /// Dit (short press)
    Dot,
    /// Dah (long press)
    Dash,
}

impl Symbol {
    /// Nominal duration of this symbol in units when sending
    pub const fn duration_units(&self) -> u32 {
        match self {
            Symbol::Dot => 1,
            Symbol::Dash => 3,
        }
    }

    /// ASCII rendering used for raw passthrough and logs
    pub const fn as_char(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

/// Output actions forwarded to the keyboard transport
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// A decoded character, always uppercase
    Character(char),
    /// A single dot/dash in raw passthrough mode
    Raw(Symbol),
    /// Word separator; the transport renders it as one space when decoding
    /// and as the triple-space separator in raw mode
    Space,
    /// Error-correction gesture from an over-long press
    Backspace,
}

/// FSM states for the decoder
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DecoderState {
    /// Key up, no character in progress
    Idling,
    /// Key held since the recorded instant
    KeyDown(Instant),
    /// Press exceeded the word gap while still held; waiting for release
    LongDown,
    /// Key released at the recorded instant, gap timers running
    Release(Instant),
}

impl DecoderState {
    /// Returns true if the key is currently accepted as held
    pub const fn is_key_held(&self) -> bool {
        match self {
            DecoderState::KeyDown(_) | DecoderState::LongDown => true,
            DecoderState::Idling | DecoderState::Release(_) => false,
        }
    }
}

/// Maximum symbols buffered per character; extra presses are dropped
pub const SYMBOL_CAPACITY: usize = 6;

/// Bounded accumulator for the character currently being keyed
#[derive(Clone, Debug, Default)]
pub struct SymbolBuffer {
    symbols: heapless::Vec<Symbol, SYMBOL_CAPACITY>,
}

impl SymbolBuffer {
    pub const fn new() -> Self {
        Self {
            symbols: heapless::Vec::new(),
        }
    }

    /// Append a symbol; silently dropped at capacity
    pub fn push(&mut self, symbol: Symbol) {
        let _ = self.symbols.push(symbol);
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }
}

/// Decoder configuration parameters
#[derive(Copy, Clone, Debug)]
pub struct DecoderConfig {
    /// Basic timing unit (nominal Dit duration)
    pub unit: Duration,
    /// Debounce settle window in milliseconds
    pub debounce_ms: u64,
    /// Queue size for the action buffer
    pub queue_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            unit: Duration::from_millis(100), // 12 WPM
            debounce_ms: 50,
            queue_size: 64,
        }
    }
}

impl DecoderConfig {
    /// Create a new configuration with validation
    pub fn new(wpm: u32, debounce_ms: u64, queue_size: usize) -> Result<Self, &'static str> {
        if wpm == 0 || wpm > 100 {
            return Err("WPM must be between 1 and 100");
        }
        if debounce_ms > 100 {
            return Err("Debounce must be <= 100ms");
        }
        if queue_size < 8 || queue_size > 1024 {
            return Err("Queue size must be between 8 and 1024");
        }

        // Calculate unit time from WPM (PARIS standard: 50 units per word)
        let unit = Duration::from_millis((1200 / wpm) as u64);

        Ok(Self {
            unit,
            debounce_ms,
            queue_size,
        })
    }

    /// Get Words Per Minute from current unit timing
    pub fn wpm(&self) -> u32 {
        (1200 / self.unit.as_millis() as u32).max(1)
    }

    /// Longest key-down interval still classified as a Dot (1.5 units).
    /// Derived on demand so it tracks runtime changes to `unit`.
    pub fn dit_threshold(&self) -> Duration {
        self.unit * 3 / 2
    }

    /// Silence after which the pending character is complete (3 units)
    pub fn char_gap(&self) -> Duration {
        self.unit * 3
    }

    /// Silence after which a word break is emitted (7 units); also the
    /// held-key duration that triggers the backspace gesture
    pub fn word_gap(&self) -> Duration {
        self.unit * 7
    }

    /// Classify a completed key-down interval
    pub fn classify(&self, held: Duration) -> Symbol {
        if held <= self.dit_threshold() {
            Symbol::Dot
        } else {
            Symbol::Dash
        }
    }
}

//! Hardware Abstraction Layer for the decoder's external collaborators

// Re-export time types based on feature
#[cfg(feature = "embassy-time")]
pub use embassy_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
pub use self::mock_time::{Duration, Instant};

#[cfg(not(feature = "embassy-time"))]
mod mock_time {
    /// Mock instant type for compilation without embassy-time
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Instant(u64);

    impl Instant {
        pub fn now() -> Self {
            Self(0) // Placeholder implementation
        }

        pub fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub fn duration_since(&self, other: Instant) -> Duration {
            Duration::from_millis(self.0.saturating_sub(other.0))
        }

        pub fn as_millis(&self) -> u64 {
            self.0
        }
    }

    /// Mock duration type
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    pub struct Duration(u64);

    impl Duration {
        pub fn from_millis(ms: u64) -> Self {
            Self(ms)
        }

        pub fn as_millis(&self) -> u64 {
            self.0
        }
    }

    impl core::ops::Div<u32> for Duration {
        type Output = Duration;

        fn div(self, rhs: u32) -> Duration {
            Duration(self.0 / rhs as u64)
        }
    }

    impl core::ops::Mul<u32> for Duration {
        type Output = Duration;

        fn mul(self, rhs: u32) -> Duration {
            Duration(self.0 * rhs as u64)
        }
    }
}

use embedded_hal::digital::{InputPin, OutputPin};

use crate::types::Symbol;

/// Error types for HAL operations
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// GPIO operation failed
    GpioError,
    /// Host status source unavailable
    StatusUnavailable,
    /// Keystroke transport rejected the event
    TransportError,
    /// Invalid configuration
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::StatusUnavailable => write!(f, "Host status source unavailable"),
            HalError::TransportError => write!(f, "Keystroke transport rejected the event"),
            HalError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Trait for the straight-key input line
pub trait KeyPin {
    type Error: From<HalError>;

    /// Sample the raw key level, true when pressed
    fn is_pressed(&mut self) -> Result<bool, Self::Error>;
}

/// Trait for the host-reported mode flags, polled rather than pushed
pub trait StatusFlags {
    type Error: From<HalError>;

    /// Character decoding vs. raw dot/dash passthrough
    fn decode_enabled(&mut self) -> Result<bool, Self::Error>;

    /// Audible feedback on key-down
    fn sound_enabled(&mut self) -> Result<bool, Self::Error>;
}

/// Trait for the feedback outputs fired on accepted key transitions
pub trait Feedback {
    type Error: From<HalError>;

    /// Indicator LED follows the accepted key level
    fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Sidetone output, gated by the sound flag
    fn set_tone(&mut self, on: bool) -> Result<(), Self::Error>;
}

/// Trait for the host keyboard transport.
///
/// Each call corresponds to one user-visible keystroke, except
/// `emit_space` which the transport renders as a single space when
/// decoding and as the triple-space word separator in raw mode.
pub trait KeystrokeSink {
    type Error: From<HalError>;

    fn emit_character(&mut self, ch: char) -> Result<(), Self::Error>;

    fn emit_raw_symbol(&mut self, symbol: Symbol) -> Result<(), Self::Error>;

    fn emit_space(&mut self) -> Result<(), Self::Error>;

    fn emit_backspace(&mut self) -> Result<(), Self::Error>;
}

/// Generic key input over an embedded-hal pin
pub struct EmbeddedHalKey<P> {
    pin: P,
    active_low: bool,
}

impl<P> EmbeddedHalKey<P>
where
    P: InputPin,
{
    /// `active_low` matches a key wired to ground with a pull-up
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }
}

impl<P> KeyPin for EmbeddedHalKey<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_pressed(&mut self) -> Result<bool, Self::Error> {
        let level = self.pin.is_high().map_err(|_| HalError::GpioError)?;
        Ok(level != self.active_low)
    }
}

/// Generic feedback outputs over embedded-hal pins
pub struct EmbeddedHalFeedback<L, T> {
    indicator: L,
    tone: T,
}

impl<L, T> EmbeddedHalFeedback<L, T>
where
    L: OutputPin,
    T: OutputPin,
{
    pub fn new(indicator: L, tone: T) -> Self {
        Self { indicator, tone }
    }
}

impl<L, T> Feedback for EmbeddedHalFeedback<L, T>
where
    L: OutputPin,
    T: OutputPin,
{
    type Error = HalError;

    fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.indicator.set_high().map_err(|_| HalError::GpioError)
        } else {
            self.indicator.set_low().map_err(|_| HalError::GpioError)
        }
    }

    fn set_tone(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.tone.set_high().map_err(|_| HalError::GpioError)
        } else {
            self.tone.set_low().map_err(|_| HalError::GpioError)
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock implementations for testing

    use core::cell::RefCell;

    use super::*;
    use crate::types::Action;

    /// Mock key line with a settable level
    #[derive(Default)]
    pub struct MockKey {
        pressed: RefCell<bool>,
    }

    impl MockKey {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_pressed(&self, pressed: bool) {
            *self.pressed.borrow_mut() = pressed;
        }
    }

    impl KeyPin for MockKey {
        type Error = HalError;

        fn is_pressed(&mut self) -> Result<bool, Self::Error> {
            Ok(*self.pressed.borrow())
        }
    }

    /// Mock status source; `None` models an unreadable host flag
    #[derive(Default)]
    pub struct MockStatusFlags {
        decode: RefCell<Option<bool>>,
        sound: RefCell<Option<bool>>,
    }

    impl MockStatusFlags {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_decode(&mut self, state: Option<bool>) {
            *self.decode.borrow_mut() = state;
        }

        pub fn set_sound(&mut self, state: Option<bool>) {
            *self.sound.borrow_mut() = state;
        }
    }

    impl StatusFlags for MockStatusFlags {
        type Error = HalError;

        fn decode_enabled(&mut self) -> Result<bool, Self::Error> {
            self.decode.borrow().ok_or(HalError::StatusUnavailable)
        }

        fn sound_enabled(&mut self) -> Result<bool, Self::Error> {
            self.sound.borrow().ok_or(HalError::StatusUnavailable)
        }
    }

    /// Mock indicator/tone outputs
    #[derive(Default)]
    pub struct MockFeedback {
        indicator: RefCell<bool>,
        tone: RefCell<bool>,
    }

    impl MockFeedback {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn indicator(&self) -> bool {
            *self.indicator.borrow()
        }

        pub fn tone(&self) -> bool {
            *self.tone.borrow()
        }
    }

    impl Feedback for MockFeedback {
        type Error = HalError;

        fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error> {
            *self.indicator.borrow_mut() = on;
            Ok(())
        }

        fn set_tone(&mut self, on: bool) -> Result<(), Self::Error> {
            *self.tone.borrow_mut() = on;
            Ok(())
        }
    }

    /// Mock keyboard transport recording every emitted action
    #[derive(Default)]
    pub struct MockSink {
        actions: RefCell<heapless::Vec<Action, 64>>,
    }

    impl MockSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn actions(&self) -> heapless::Vec<Action, 64> {
            self.actions.borrow().clone()
        }

        pub fn clear(&self) {
            self.actions.borrow_mut().clear();
        }

        /// Render the captured stream for assertions; backspace as '<'
        pub fn as_text(&self) -> heapless::String<128> {
            let mut out = heapless::String::new();
            for action in self.actions.borrow().iter() {
                let ch = match action {
                    Action::Character(c) => *c,
                    Action::Raw(symbol) => symbol.as_char(),
                    Action::Space => ' ',
                    Action::Backspace => '<',
                };
                out.push(ch).ok();
            }
            out
        }

        fn record(&self, action: Action) {
            self.actions.borrow_mut().push(action).ok();
        }
    }

    impl KeystrokeSink for MockSink {
        type Error = HalError;

        fn emit_character(&mut self, ch: char) -> Result<(), Self::Error> {
            self.record(Action::Character(ch));
            Ok(())
        }

        fn emit_raw_symbol(&mut self, symbol: Symbol) -> Result<(), Self::Error> {
            self.record(Action::Raw(symbol));
            Ok(())
        }

        fn emit_space(&mut self) -> Result<(), Self::Error> {
            self.record(Action::Space);
            Ok(())
        }

        fn emit_backspace(&mut self) -> Result<(), Self::Error> {
            self.record(Action::Backspace);
            Ok(())
        }
    }
}

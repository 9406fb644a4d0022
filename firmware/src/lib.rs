#![no_std]

//! Firmware library exposing mock hardware and tasks for the decoder

pub use embassy_executor::Spawner;
pub use embassy_time::Duration;
pub use heapless::spsc::Queue;
pub use static_cell::StaticCell;

pub use decoder_core::*;

pub use crate::mock_hardware::*;
pub use crate::tasks::*;

// Mock hardware module
pub mod mock_hardware {
    use decoder_core::controller::SharedFlags;
    use decoder_core::hal::{Feedback, HalError, KeyPin, KeystrokeSink, StatusFlags};
    use decoder_core::types::Symbol;

    /// Mock straight-key line; real GPIO sampling replaces this
    #[derive(Debug, Default)]
    pub struct MockKeyLine {
        pressed: bool,
    }

    impl MockKeyLine {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set key level for testing
        pub fn set_pressed(&mut self, pressed: bool) {
            self.pressed = pressed;
        }
    }

    impl KeyPin for MockKeyLine {
        type Error = HalError;

        fn is_pressed(&mut self) -> Result<bool, Self::Error> {
            Ok(self.pressed)
        }
    }

    /// Mock host lock-indicator source.
    ///
    /// On real hardware these come from the keyboard status report:
    /// one indicator selects decoding, the other (inverted) enables the
    /// sidetone.
    #[derive(Debug)]
    pub struct MockHostFlags {
        pub decode: Option<bool>,
        pub sound: Option<bool>,
    }

    impl MockHostFlags {
        pub fn new() -> Self {
            Self {
                decode: Some(true),
                sound: Some(false),
            }
        }
    }

    impl StatusFlags for MockHostFlags {
        type Error = HalError;

        fn decode_enabled(&mut self) -> Result<bool, Self::Error> {
            self.decode.ok_or(HalError::StatusUnavailable)
        }

        fn sound_enabled(&mut self) -> Result<bool, Self::Error> {
            self.sound.ok_or(HalError::StatusUnavailable)
        }
    }

    /// Mock indicator LED and buzzer pins
    #[derive(Debug, Default)]
    pub struct MockFeedbackPins {
        indicator: bool,
        tone: bool,
    }

    impl MockFeedbackPins {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn indicator(&self) -> bool {
            self.indicator
        }

        pub fn tone(&self) -> bool {
            self.tone
        }
    }

    impl Feedback for MockFeedbackPins {
        type Error = HalError;

        fn set_indicator(&mut self, on: bool) -> Result<(), Self::Error> {
            #[cfg(feature = "defmt")]
            if on != self.indicator {
                defmt::debug!("LED: {}", if on { "on" } else { "off" });
            }
            self.indicator = on;
            Ok(())
        }

        fn set_tone(&mut self, on: bool) -> Result<(), Self::Error> {
            #[cfg(feature = "defmt")]
            if on != self.tone {
                defmt::debug!("tone: {}", if on { "on" } else { "off" });
            }
            self.tone = on;
            Ok(())
        }
    }

    /// Mock keyboard transport; real USB HID emission replaces this.
    ///
    /// Renders the word separator per the current mode: one space while
    /// decoding, three in raw passthrough.
    pub struct MockKeyboard {
        shared: &'static SharedFlags,
        sent: usize,
    }

    impl MockKeyboard {
        pub fn new(shared: &'static SharedFlags) -> Self {
            Self { shared, sent: 0 }
        }

        /// Keystrokes delivered so far
        pub fn sent(&self) -> usize {
            self.sent
        }

        fn type_char(&mut self, _ch: char) {
            self.sent += 1;
            #[cfg(feature = "defmt")]
            defmt::info!("key: {}", _ch);
        }
    }

    impl KeystrokeSink for MockKeyboard {
        type Error = HalError;

        fn emit_character(&mut self, ch: char) -> Result<(), Self::Error> {
            self.type_char(ch);
            Ok(())
        }

        fn emit_raw_symbol(&mut self, symbol: Symbol) -> Result<(), Self::Error> {
            self.type_char(symbol.as_char());
            Ok(())
        }

        fn emit_space(&mut self) -> Result<(), Self::Error> {
            let count = if self.shared.decode() { 1 } else { 3 };
            for _ in 0..count {
                self.type_char(' ');
            }
            Ok(())
        }

        fn emit_backspace(&mut self) -> Result<(), Self::Error> {
            self.sent += 1;
            #[cfg(feature = "defmt")]
            defmt::info!("key: <backspace>");
            Ok(())
        }
    }
}

// Embassy tasks module
pub mod tasks {
    use heapless::spsc::{Consumer, Producer};

    use super::*;
    use decoder_core::controller::{SessionMode, SharedFlags};
    use decoder_core::hal::KeystrokeSink;

    /// Decoder pipeline task wrapper
    #[embassy_executor::task]
    pub async fn decoder_task_wrapper(
        key: MockKeyLine,
        flags: MockHostFlags,
        feedback: MockFeedbackPins,
        shared: &'static SharedFlags,
        producer: Producer<'static, Action, 64>,
        config: DecoderConfig,
        mode: SessionMode,
    ) {
        #[cfg(feature = "defmt")]
        defmt::info!("decoder task started");
        decoder_core::fsm::decoder_task::<_, _, _, 64>(
            key, flags, feedback, shared, producer, config, mode,
        )
        .await;
    }

    /// Typist task: drains decoded actions into the keyboard transport
    #[embassy_executor::task]
    pub async fn typist_task(
        mut consumer: Consumer<'static, Action, 64>,
        shared: &'static SharedFlags,
        poll_interval: Duration,
    ) {
        #[cfg(feature = "defmt")]
        defmt::info!("typist task started");

        let mut keyboard = MockKeyboard::new(shared);

        loop {
            while let Some(action) = consumer.dequeue() {
                let result = match action {
                    Action::Character(ch) => keyboard.emit_character(ch),
                    Action::Raw(symbol) => keyboard.emit_raw_symbol(symbol),
                    Action::Space => keyboard.emit_space(),
                    Action::Backspace => keyboard.emit_backspace(),
                };
                // Transport errors drop the keystroke; the stream goes on
                result.ok();
            }
            embassy_time::Timer::after(poll_interval).await;
        }
    }
}

// Time driver for embassy
mod time_driver;

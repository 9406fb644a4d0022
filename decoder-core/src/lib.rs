#![cfg_attr(not(feature = "std"), no_std)]

//! # Decoder Core
//!
//! Straight-key Morse decoder logic for embedded systems.
//! Classifies key-down intervals into dots and dashes, groups them into
//! characters and words by elapsed-time thresholds, and maps completed
//! sequences to keystrokes via the international Morse table.

pub mod types;
pub mod morse;
pub mod fsm;
pub mod controller;
pub mod hal;

#[cfg(feature = "test-utils")]
pub mod test_utils;


pub use types::*;
pub use morse::lookup;
pub use fsm::*;
pub use controller::*;
pub use hal::{*, Instant, Duration};

/// Decoder library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration for hand-keyed input around 12 WPM
pub fn default_config() -> DecoderConfig {
    DecoderConfig {
        unit: Duration::from_millis(100), // 12 WPM
        debounce_ms: 50,
        queue_size: 64,
    }
}

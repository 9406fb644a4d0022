//! Debounce filter behavior and embedded-hal pin adapter tests

#[cfg(test)]
mod tests {
    use decoder_core::controller::{Debouncer, KeyEdge};
    use decoder_core::hal::{Duration, EmbeddedHalKey, Instant, KeyPin};
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use proptest::prelude::*;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn bounce_during_settle_restarts_the_window() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50), at(0));

        // Contact bounce while closing the key
        assert_eq!(debouncer.update(true, at(100)), None);
        assert_eq!(debouncer.update(false, at(110)), None);
        assert_eq!(debouncer.update(true, at(120)), None);

        // 50ms after the last change the press is accepted
        assert_eq!(debouncer.update(true, at(160)), None);
        assert_eq!(debouncer.update(true, at(170)), Some(KeyEdge::Pressed));
    }

    #[test]
    fn accepted_state_survives_a_glitch() {
        let mut debouncer = Debouncer::new(Duration::from_millis(50), at(0));
        debouncer.update(true, at(0));
        assert_eq!(debouncer.update(true, at(50)), Some(KeyEdge::Pressed));

        // A brief drop-out does not release the key
        assert_eq!(debouncer.update(false, at(60)), None);
        assert_eq!(debouncer.update(true, at(70)), None);
        assert_eq!(debouncer.update(true, at(200)), None);
        assert!(debouncer.state());
    }

    proptest! {
        /// The accepted state never changes more than once per window,
        /// no matter how noisy the raw samples are
        #[test]
        fn at_most_one_edge_per_window(samples in proptest::collection::vec(any::<bool>(), 1..200)) {
            let window_ms = 50u64;
            let mut debouncer = Debouncer::new(Duration::from_millis(window_ms), at(0));

            let mut last_edge_ms: Option<u64> = None;
            for (i, raw) in samples.iter().enumerate() {
                let t = (i as u64 + 1) * 5; // one sample every 5ms
                if debouncer.update(*raw, at(t)).is_some() {
                    if let Some(prev) = last_edge_ms {
                        prop_assert!(t - prev >= window_ms);
                    }
                    last_edge_ms = Some(t);
                }
            }
        }
    }

    #[test]
    fn embedded_hal_key_respects_polarity() {
        // Active-low key: pulled up, grounded when pressed
        let expectations = [
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ];
        let pin = PinMock::new(&expectations);
        let mut key = EmbeddedHalKey::new(pin.clone(), true);

        assert!(!key.is_pressed().unwrap());
        assert!(key.is_pressed().unwrap());

        let mut pin = pin;
        pin.done();
    }

    #[test]
    fn embedded_hal_key_active_high() {
        let expectations = [
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ];
        let pin = PinMock::new(&expectations);
        let mut key = EmbeddedHalKey::new(pin.clone(), false);

        assert!(key.is_pressed().unwrap());
        assert!(!key.is_pressed().unwrap());

        let mut pin = pin;
        pin.done();
    }
}

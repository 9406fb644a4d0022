//! End-to-end decoder scenarios driven through scripted key timelines

#[cfg(test)]
mod tests {
    use decoder_core::controller::{boot_mode_check, SessionMode};
    use decoder_core::fsm::MorseFsm;
    use decoder_core::hal::mock::MockStatusFlags;
    use decoder_core::hal::{HalError, KeyPin};
    use decoder_core::test_utils::key_script::KeyScript;
    use decoder_core::test_utils::scenario::{run, to_text};
    use decoder_core::types::{Action, DecoderState, Symbol};

    use crate::test_config;

    const TICK_MS: u64 = 10;

    #[test]
    fn scenario_two_dots_decode_to_i() {
        // 100ms down, 150ms up, 100ms down, 400ms up with unit = 100ms
        let script = KeyScript::new().press(0, 100).press(250, 100);
        let mut fsm = MorseFsm::new(test_config(100));

        let actions = run(&mut fsm, &script, true, TICK_MS, 400);
        assert_eq!(actions, vec![Action::Character('I')]);
    }

    #[test]
    fn scenario_long_hold_is_one_backspace() {
        // Held 800ms with unit = 100ms: word gap (700ms) fires while down
        let script = KeyScript::new().press(0, 800);
        let mut fsm = MorseFsm::new(test_config(100));

        let actions = run(&mut fsm, &script, true, TICK_MS, 300);
        assert_eq!(actions, vec![Action::Backspace]);
        assert_eq!(fsm.current_state(), DecoderState::Idling);
    }

    #[test]
    fn scenario_raw_passthrough() {
        // unit = 60ms: a 120ms press is past the 90ms dit threshold
        let script = KeyScript::new().press(0, 120);
        let mut fsm = MorseFsm::new(test_config(60));

        let actions = run(&mut fsm, &script, false, TICK_MS, 800);
        assert_eq!(actions, vec![Action::Raw(Symbol::Dash), Action::Space]);
    }

    #[test]
    fn raw_symbol_emitted_on_release_not_at_gap() {
        let script = KeyScript::new().press(0, 120);
        let mut fsm = MorseFsm::new(test_config(60));

        // Stop right after the release: the symbol must already be out
        let actions = run(&mut fsm, &script, false, TICK_MS, 20);
        assert_eq!(actions, vec![Action::Raw(Symbol::Dash)]);
    }

    #[test]
    fn word_gap_appends_space_after_character() {
        let script = KeyScript::new().press(0, 100);
        let mut fsm = MorseFsm::new(test_config(100));

        let actions = run(&mut fsm, &script, true, TICK_MS, 900);
        assert_eq!(actions, vec![Action::Character('E'), Action::Space]);
    }

    #[test]
    fn hello_decodes_from_scripted_morse() {
        let script = KeyScript::from_morse(".... . .-.. .-.. ---", 100);
        let mut fsm = MorseFsm::new(test_config(100));

        let actions = run(&mut fsm, &script, true, TICK_MS, 800);
        assert_eq!(to_text(&actions), "HELLO ");
    }

    #[test]
    fn overflowing_character_is_truncated_then_dropped() {
        // Eight dots: two are dropped at capacity, six dots decode to nothing
        let script = KeyScript::from_morse("........", 100);
        let mut fsm = MorseFsm::new(test_config(100));

        let actions = run(&mut fsm, &script, true, TICK_MS, 400);
        assert!(actions.is_empty());
        assert!(fsm.pending_symbols().is_empty());
    }

    #[test]
    fn session_default_applies_only_when_flag_unreadable() {
        let mut flags = MockStatusFlags::new();

        // Raw-mode boot: unreadable flag falls back to raw
        let raw_session = SessionMode::new(true);
        assert!(!raw_session.decode_enabled(&mut flags));

        // A readable host flag wins over the boot default
        flags.set_decode(Some(true));
        assert!(raw_session.decode_enabled(&mut flags));
        flags.set_decode(Some(false));
        assert!(!raw_session.decode_enabled(&mut flags));
    }

    /// Key that reports pressed for a fixed number of samples
    struct CountdownKey {
        polls_until_release: u32,
    }

    impl KeyPin for CountdownKey {
        type Error = HalError;

        fn is_pressed(&mut self) -> Result<bool, Self::Error> {
            if self.polls_until_release > 0 {
                self.polls_until_release -= 1;
                Ok(true)
            } else {
                Ok(false)
            }
        }
    }

    #[tokio::test]
    async fn boot_with_released_key_selects_decode_mode() {
        let mut key = CountdownKey {
            polls_until_release: 0,
        };
        let mode = boot_mode_check(&mut key).await;
        assert!(mode.decode_default());
    }

    #[tokio::test]
    async fn boot_with_held_key_selects_raw_and_waits_for_release() {
        let driver = embassy_time::MockDriver::get();

        let check = async {
            let mut key = CountdownKey {
                polls_until_release: 4,
            };
            boot_mode_check(&mut key).await
        };
        let advance = async {
            for _ in 0..200 {
                driver.advance(embassy_time::Duration::from_millis(10));
                tokio::task::yield_now().await;
            }
        };

        let (mode, _) = tokio::join!(check, advance);
        assert!(!mode.decode_default());
    }
}

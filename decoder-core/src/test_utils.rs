//! Test utilities for decoder core functionality

#[cfg(all(feature = "test-utils", feature = "std", feature = "embassy-time"))]
pub mod virtual_time {
    //! Virtual clock for deterministic testing

    use std::sync::{Arc, Mutex};

    use embassy_time::{Duration, Instant};

    /// Shared virtual clock; time only moves when a test advances it
    #[derive(Clone, Default)]
    pub struct VirtualClock {
        now_ms: Arc<Mutex<u64>>,
    }

    impl VirtualClock {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now(&self) -> Instant {
            Instant::from_millis(*self.now_ms.lock().unwrap())
        }

        pub fn advance(&self, duration: Duration) {
            *self.now_ms.lock().unwrap() += duration.as_millis();
        }

        pub fn advance_millis(&self, ms: u64) {
            *self.now_ms.lock().unwrap() += ms;
        }
    }
}

#[cfg(all(feature = "test-utils", feature = "std", feature = "embassy-time"))]
pub mod key_script {
    //! Scripted straight-key timelines for simulation

    use crate::types::Symbol;

    /// A raw key level change at an absolute time
    #[derive(Debug, Clone, Copy)]
    pub struct KeyEvent {
        pub at_ms: u64,
        pub down: bool,
    }

    /// Ordered press/release timeline for one test scenario
    #[derive(Debug, Clone, Default)]
    pub struct KeyScript {
        events: Vec<KeyEvent>,
    }

    impl KeyScript {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a press starting at `at_ms` held for `hold_ms`
        pub fn press(mut self, at_ms: u64, hold_ms: u64) -> Self {
            self.events.push(KeyEvent { at_ms, down: true });
            self.events.push(KeyEvent {
                at_ms: at_ms + hold_ms,
                down: false,
            });
            self.events.sort_by_key(|e| e.at_ms);
            self
        }

        /// Key a morse string ("-.-.") with standard element spacing
        pub fn from_morse(code: &str, unit_ms: u64) -> Self {
            let mut script = Self::new();
            let mut t = 0;
            for ch in code.chars() {
                match ch {
                    '.' => {
                        script = script.press(t, unit_ms);
                        t += 2 * unit_ms;
                    }
                    '-' => {
                        script = script.press(t, 3 * unit_ms);
                        t += 4 * unit_ms;
                    }
                    // Character boundary: stretch the trailing element gap
                    // comfortably past the 3-unit threshold
                    ' ' => t += 3 * unit_ms,
                    _ => {}
                }
            }
            script
        }

        /// Raw key level at time `t_ms`
        pub fn level_at(&self, t_ms: u64) -> bool {
            self.events
                .iter()
                .take_while(|e| e.at_ms <= t_ms)
                .last()
                .map(|e| e.down)
                .unwrap_or(false)
        }

        /// Time of the final level change
        pub fn end_ms(&self) -> u64 {
            self.events.last().map(|e| e.at_ms).unwrap_or(0)
        }
    }

    /// Parse a morse string into symbols, ignoring anything else
    pub fn symbols(code: &str) -> Vec<Symbol> {
        code.chars()
            .filter_map(|ch| match ch {
                '.' => Some(Symbol::Dot),
                '-' => Some(Symbol::Dash),
                _ => None,
            })
            .collect()
    }
}

#[cfg(all(feature = "test-utils", feature = "std", feature = "embassy-time"))]
pub mod scenario {
    //! Drive a decoder FSM through a scripted timeline

    use embassy_time::Instant;
    use heapless::spsc::Queue;

    use super::key_script::KeyScript;
    use crate::fsm::MorseFsm;
    use crate::types::Action;

    /// Tick the FSM through the whole script plus `settle_ms` of silence,
    /// returning every action emitted in order.
    pub fn run(
        fsm: &mut MorseFsm,
        script: &KeyScript,
        decode_enabled: bool,
        tick_ms: u64,
        settle_ms: u64,
    ) -> Vec<Action> {
        let mut queue: Queue<Action, 64> = Queue::new();
        let (mut producer, mut consumer) = queue.split();
        let mut actions = Vec::new();

        let end = script.end_ms() + settle_ms;
        let mut t = 0;
        while t <= end {
            fsm.update(
                script.level_at(t),
                decode_enabled,
                Instant::from_millis(t),
                &mut producer,
            );
            while let Some(action) = consumer.dequeue() {
                actions.push(action);
            }
            t += tick_ms;
        }

        actions
    }

    /// Render an action stream for assertions; backspace as '<'
    pub fn to_text(actions: &[Action]) -> String {
        actions
            .iter()
            .map(|action| match action {
                Action::Character(c) => *c,
                Action::Raw(symbol) => symbol.as_char(),
                Action::Space => ' ',
                Action::Backspace => '<',
            })
            .collect()
    }
}

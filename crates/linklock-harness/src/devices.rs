//! Simulated operator-facing devices.

use std::{collections::VecDeque, time::Duration};

use linklock_app::{Keypad, TextDisplay};
use linklock_core::Clock;

use crate::env::SimClock;

/// Keypad that replays a script at an operator-plausible pace.
///
/// Symbols are released no faster than `spacing` apart in virtual time, so
/// the verifier's debounce window sees realistic gaps instead of eating the
/// script. The default spacing of 250 ms clears the standard 200 ms
/// debounce.
pub struct ScriptedKeypad {
    script: VecDeque<u8>,
    spacing: Duration,
    clock: SimClock,
    last_released: Option<Duration>,
}

impl ScriptedKeypad {
    /// A keypad that will type each code in `codes`, in order.
    pub fn typing(codes: &[&[u8]], clock: &SimClock) -> Self {
        Self {
            script: codes.iter().flat_map(|code| code.iter().copied()).collect(),
            spacing: Duration::from_millis(250),
            clock: clock.clone(),
            last_released: None,
        }
    }

    /// Override the pace between key presses.
    pub fn with_spacing(mut self, spacing: Duration) -> Self {
        self.spacing = spacing;
        self
    }

    /// Symbols not yet delivered.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Keypad for ScriptedKeypad {
    fn poll(&mut self) -> Option<u8> {
        let now = self.clock.now();
        if let Some(last) = self.last_released {
            if now - last < self.spacing {
                return None;
            }
        }

        let symbol = self.script.pop_front()?;
        self.last_released = Some(now);
        Some(symbol)
    }
}

/// Display that records every screen it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    screens: Vec<(String, String)>,
}

impl RecordingDisplay {
    /// Fresh display with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(line1, line2)` pair shown, in order.
    pub fn screens(&self) -> &[(String, String)] {
        &self.screens
    }

    /// Whether any screen's label line equals `label`.
    pub fn saw(&self, label: &str) -> bool {
        self.screens.iter().any(|(line1, _)| line1 == label)
    }

    /// Body lines of every screen whose label starts with `prefix`.
    pub fn bodies_under(&self, prefix: &str) -> Vec<&str> {
        self.screens
            .iter()
            .filter(|(line1, _)| line1.starts_with(prefix))
            .map(|(_, line2)| line2.as_str())
            .collect()
    }
}

impl TextDisplay for RecordingDisplay {
    fn show(&mut self, line1: &str, line2: &str) {
        self.screens.push((line1.to_string(), line2.to_string()));
    }
}

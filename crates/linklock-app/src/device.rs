//! Hardware-agnostic input and display traits.
//!
//! Decouples the drivers from the physical keypad and character display,
//! enabling deterministic simulation testing. The electrical scanning and
//! rendering behind these traits is host code, outside this crate.

/// Columns available on the character display.
///
/// Lines handed to [`TextDisplay::show`] are at most this long.
pub const DISPLAY_COLS: usize = 16;

/// Matrix keypad input source.
pub trait Keypad {
    /// The symbol pressed since the last poll, if any.
    ///
    /// At most one discrete symbol per poll; `None` when the pad is idle.
    /// Debouncing is the caller's concern (see `AccessVerifier`), not the
    /// scanner's.
    fn poll(&mut self) -> Option<u8>;
}

/// Two-line character display sink.
pub trait TextDisplay {
    /// Replace the display contents with a label line and a body line.
    ///
    /// Implementations truncate lines longer than [`DISPLAY_COLS`]; callers
    /// are expected to pre-segment text they care about.
    fn show(&mut self, line1: &str, line2: &str);
}

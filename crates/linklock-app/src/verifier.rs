//! Receiver-side access-code gate.
//!
//! A frame has already been received in full; its payload stays sealed until
//! the operator re-types the 8-symbol access code printed on the sender's
//! display. This module is the pure state machine for that entry flow:
//! symbols and instants in, events out. Keypad scanning and display echo
//! live in the driver.

use std::time::Duration;

use linklock_proto::AccessKey;
use zeroize::Zeroize;

/// Entry progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierState {
    /// Collecting symbols; fewer than 8 accepted so far.
    AwaitingEntry,
    /// Entered code matched; decryption may proceed.
    Complete,
}

/// What a single offered symbol did to the entry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifierEvent {
    /// Symbol stored. The caller echoes a masked indicator at `position`.
    SymbolAccepted {
        /// Zero-based column of the symbol just stored.
        position: usize,
    },
    /// Symbol dropped: debounce window still open, or entry already
    /// complete.
    SymbolIgnored,
    /// Eighth symbol matched the expected code; state is now
    /// [`VerifierState::Complete`].
    Verified,
    /// Eighth symbol completed a non-matching code. The entry buffer has
    /// been cleared; the caller re-prompts and the operator starts over.
    /// The received frame is untouched.
    Rejected,
}

/// Debounced 8-symbol entry gate.
///
/// Generic over the clock's instant type so it runs identically under the
/// production clock and the harness's virtual one.
///
/// # Invariants
///
/// - A symbol is accepted only if the debounce interval has elapsed since
///   the last accepted symbol (double-registration from one physical press
///   is a hardware reality).
/// - A rejected entry leaves the buffer empty and the state
///   [`VerifierState::AwaitingEntry`]; nothing short of 8 fresh symbols
///   reaches the next comparison.
pub struct AccessVerifier<I> {
    expected: AccessKey,
    entered: [u8; AccessKey::SIZE],
    count: usize,
    last_accepted: Option<I>,
    debounce: Duration,
    state: VerifierState,
}

impl<I> AccessVerifier<I>
where
    I: Copy + Ord + std::ops::Sub<Output = Duration>,
{
    /// Create a gate expecting the access key carried by the received frame.
    pub fn new(expected: AccessKey, debounce: Duration) -> Self {
        Self {
            expected,
            entered: [0u8; AccessKey::SIZE],
            count: 0,
            last_accepted: None,
            debounce,
            state: VerifierState::AwaitingEntry,
        }
    }

    /// Current state.
    pub fn state(&self) -> VerifierState {
        self.state
    }

    /// Number of symbols currently held.
    pub fn entered_len(&self) -> usize {
        self.count
    }

    /// Offer one keypad symbol observed at `now`.
    pub fn offer(&mut self, symbol: u8, now: I) -> VerifierEvent {
        if self.state == VerifierState::Complete {
            return VerifierEvent::SymbolIgnored;
        }

        if let Some(last) = self.last_accepted {
            if now >= last && now - last < self.debounce {
                return VerifierEvent::SymbolIgnored;
            }
        }
        self.last_accepted = Some(now);

        let position = self.count;
        self.entered[position] = symbol;
        self.count += 1;

        if self.count < AccessKey::SIZE {
            return VerifierEvent::SymbolAccepted { position };
        }

        if self.entered == *self.expected.as_bytes() {
            self.state = VerifierState::Complete;
            self.clear_entry();
            tracing::info!("access code verified");
            VerifierEvent::Verified
        } else {
            self.clear_entry();
            tracing::warn!("access code mismatch, entry reset");
            VerifierEvent::Rejected
        }
    }

    /// Wipe the candidate buffer and restart entry from position zero.
    fn clear_entry(&mut self) {
        self.entered.zeroize();
        self.count = 0;
    }
}

impl<I> Drop for AccessVerifier<I> {
    fn drop(&mut self) {
        self.entered.zeroize();
    }
}

//! Linklock Application Layer
//!
//! The device-facing half of the pipeline: pure state machines for keypad
//! entry (the access-code gate and the paragraph/line selection flow) and
//! the blocking drivers that run one message cycle end to end on each
//! endpoint.
//!
//! # Responsibilities
//!
//! - [`AccessVerifier`]: collects a debounced 8-symbol candidate code and
//!   gates decryption on a byte-for-byte match against the received frame.
//! - [`Document`] / [`SelectionInput`] / [`Selection`]: resolve the
//!   operator's paragraph/line range into the plaintext buffer.
//! - [`send_message`] / [`receive_message`]: the sender pipeline and the
//!   receiver loop, driving the codec, cipher, keypad, and display through
//!   the narrow traits in [`keypad`](Keypad) and [`display`](TextDisplay).
//!
//! State machines here are I/O-free and synchronous (they consume symbols
//! and instants and return events), so they are fully testable without
//! hardware, in the same way the protocol core is testable without a UART.

mod device;
mod receiver;
mod selection;
mod sender;
mod verifier;

pub use device::{DISPLAY_COLS, Keypad, TextDisplay};
pub use receiver::{ReceiverConfig, present_plaintext, receive_message};
pub use selection::{
    Anchor, Document, EntryPhase, Selection, SelectionError, SelectionEvent, SelectionInput,
    TextPosition,
};
pub use sender::{send_message, tick_seeded_rng};
pub use verifier::{AccessVerifier, VerifierEvent, VerifierState};

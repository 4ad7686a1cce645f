//! Linklock Wire Format
//!
//! Pure data types for the Linklock serial transfer protocol. This crate
//! defines WHAT travels over the link; the timed byte-level I/O that puts it
//! there lives in `linklock-core`.
//!
//! # Wire Layout
//!
//! One message occupies exactly one delimited frame (all integers
//! little-endian, the byte order of the reference hardware):
//!
//! ```text
//! [0xAA] [access_key: 8 bytes] [timestamp: u32] [payload_len: u32]
//!        [payload: payload_len bytes] [0x55]
//! ```
//!
//! # Invariants
//!
//! - `0 < payload_len <= Frame::MAX_PAYLOAD` (10 KiB, the receiver's memory
//!   bound)
//! - `payload_len` is a multiple of the 16-byte cipher block (the sender pads
//!   before encrypting)
//! - The access key is exactly 8 bytes and contains no NUL sentinel
//!
//! All invariants are enforced at construction ([`Frame::new`]) and re-checked
//! on decode before any payload allocation.
//!
//! # Security
//!
//! The access key and timestamp travel in the clear. Disclosure on the
//! receiving end is gated by a human re-entering the same code, not by any
//! cryptographic property of the frame; see the `linklock-app` verifier.

mod access_key;
mod errors;
mod frame;

pub use access_key::{ACCESS_CHARSET, AccessKey};
pub use errors::{ProtocolError, Result};
pub use frame::Frame;

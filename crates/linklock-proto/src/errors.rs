//! Error types for wire format parsing and validation.
//!
//! Every variant here is a format error in the sense of the protocol's error
//! taxonomy: the offending bytes are discarded and the receiver goes back to
//! waiting for the next start marker. Nothing is fatal.

use thiserror::Error;

/// Result alias for wire format operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors from frame construction, encoding, and decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Buffer ends before the fixed-size frame prefix or declared payload.
    #[error("frame truncated: needed {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required to finish the current field
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// First byte of the buffer is not the start marker.
    #[error("invalid start marker: {actual:#04x}, expected {:#04x}", crate::Frame::START_MARKER)]
    InvalidStartMarker {
        /// Byte found where the start marker was expected
        actual: u8,
    },

    /// Trailing delimiter byte is not the end marker.
    #[error("invalid end marker: {actual:#04x}, expected {:#04x}", crate::Frame::END_MARKER)]
    InvalidEndMarker {
        /// Byte found where the end marker was expected
        actual: u8,
    },

    /// Declared payload length is zero or exceeds the receiver's bound.
    ///
    /// Checked before any payload buffer is allocated.
    #[error("payload length {size} out of range (1..={max})")]
    LengthOutOfRange {
        /// Declared payload length
        size: u32,
        /// Maximum accepted payload length
        max: u32,
    },

    /// Declared payload length is not a multiple of the cipher block size.
    ///
    /// A compliant sender always zero-pads to the block boundary, so a
    /// misaligned length means the stream is corrupt or foreign.
    #[error("payload length {size} not a multiple of {}", crate::Frame::BLOCK_SIZE)]
    MisalignedLength {
        /// Declared payload length
        size: u32,
    },

    /// Access key bytes violate the key invariant (wrong length or NUL).
    #[error("invalid access key: {reason}")]
    InvalidAccessKey {
        /// Which invariant was violated
        reason: &'static str,
    },
}

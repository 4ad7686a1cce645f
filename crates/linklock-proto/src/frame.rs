//! Frame type: one complete delimited message on the wire.

use bytes::{BufMut, Bytes};

use crate::{
    AccessKey,
    errors::{ProtocolError, Result},
};

/// One complete message as exchanged over the serial link.
///
/// Layout on the wire (little-endian integers):
/// `[0xAA] [access_key: 8] [timestamp: u32] [payload_len: u32] [payload] [0x55]`
///
/// Holds ciphertext bytes; encryption and decryption happen outside this
/// crate. A `Frame` that exists is structurally valid: the constructor and
/// the decoder enforce the length invariants, so consumers never re-check.
///
/// # Invariants
///
/// - `0 < payload.len() <= MAX_PAYLOAD`
/// - `payload.len()` is a multiple of [`Frame::BLOCK_SIZE`]
///
/// # Security
///
/// Structural validity only. The access key and timestamp are cleartext and
/// authenticate nothing; an eavesdropper on the link can read both. The
/// design gates disclosure behind a human re-entering the key on the
/// receiver, not behind any property of this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Cleartext access code, also the key-derivation input.
    pub access_key: AccessKey,
    /// Sender tick count at encryption time. Key-derivation salt only; no
    /// freshness or replay guarantee.
    pub timestamp: u32,
    /// Ciphertext, zero-padded by the sender to the block boundary.
    pub payload: Bytes,
}

impl Frame {
    /// Delimiter preceding every frame.
    pub const START_MARKER: u8 = 0xAA;

    /// Delimiter terminating every frame.
    pub const END_MARKER: u8 = 0x55;

    /// Maximum accepted payload length (receiver memory bound).
    pub const MAX_PAYLOAD: u32 = 10_240;

    /// Cipher block size the payload length must align to.
    pub const BLOCK_SIZE: usize = 16;

    /// Bytes preceding the payload: marker, key, timestamp, length.
    pub const PREFIX_SIZE: usize = 1 + AccessKey::SIZE + 4 + 4;

    /// Total framing overhead around the payload (prefix plus end marker).
    pub const WIRE_OVERHEAD: usize = Self::PREFIX_SIZE + 1;

    /// Create a frame, validating the payload length invariants.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::LengthOutOfRange` if the payload is empty or longer
    ///   than [`Frame::MAX_PAYLOAD`]
    /// - `ProtocolError::MisalignedLength` if the payload length is not a
    ///   multiple of [`Frame::BLOCK_SIZE`]
    pub fn new(access_key: AccessKey, timestamp: u32, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();
        Self::validate_len(payload.len() as u32, Self::MAX_PAYLOAD)?;
        Ok(Self { access_key, timestamp, payload })
    }

    /// Check a declared payload length against the frame invariants.
    ///
    /// Called before any payload buffer is allocated on the receive path, so
    /// a hostile length can never trigger a large allocation.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::LengthOutOfRange`, `ProtocolError::MisalignedLength`
    pub fn validate_len(len: u32, max: u32) -> Result<()> {
        if len == 0 || len > max {
            return Err(ProtocolError::LengthOutOfRange { size: len, max });
        }
        if len as usize % Self::BLOCK_SIZE != 0 {
            return Err(ProtocolError::MisalignedLength { size: len });
        }
        Ok(())
    }

    /// Encoded size of this frame on the wire.
    pub fn encoded_len(&self) -> usize {
        Self::WIRE_OVERHEAD + self.payload.len()
    }

    /// Encode into a buffer.
    ///
    /// Infallible: the length invariants were enforced at construction.
    pub fn encode(&self, dst: &mut impl BufMut) {
        debug_assert!(self.payload.len() as u32 <= Self::MAX_PAYLOAD);
        debug_assert_eq!(self.payload.len() % Self::BLOCK_SIZE, 0);

        dst.put_u8(Self::START_MARKER);
        dst.put_slice(self.access_key.as_bytes());
        dst.put_slice(&self.timestamp.to_le_bytes());
        dst.put_slice(&(self.payload.len() as u32).to_le_bytes());
        dst.put_slice(&self.payload);
        dst.put_u8(Self::END_MARKER);
    }

    /// Encode into a fresh byte vector.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(self.encoded_len());
        self.encode(&mut wire);
        wire
    }

    /// Decode a frame from a complete wire buffer.
    ///
    /// Validation runs cheapest-first: markers and declared length are
    /// checked before the payload is copied, and an out-of-range length
    /// fails without touching the payload region at all. Trailing bytes
    /// after the end marker are ignored.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Truncated` if the buffer ends early
    /// - `ProtocolError::InvalidStartMarker` / `InvalidEndMarker` on bad
    ///   delimiters
    /// - `ProtocolError::LengthOutOfRange` / `MisalignedLength` on a bad
    ///   declared length
    /// - `ProtocolError::InvalidAccessKey` if the key field violates the key
    ///   invariant
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::PREFIX_SIZE {
            return Err(ProtocolError::Truncated {
                expected: Self::PREFIX_SIZE,
                actual: bytes.len(),
            });
        }

        if bytes[0] != Self::START_MARKER {
            return Err(ProtocolError::InvalidStartMarker { actual: bytes[0] });
        }

        let access_key = AccessKey::try_from(&bytes[1..1 + AccessKey::SIZE])?;

        let mut word = [0u8; 4];
        word.copy_from_slice(&bytes[9..13]);
        let timestamp = u32::from_le_bytes(word);
        word.copy_from_slice(&bytes[13..17]);
        let payload_len = u32::from_le_bytes(word);

        Self::validate_len(payload_len, Self::MAX_PAYLOAD)?;

        let total = Self::WIRE_OVERHEAD + payload_len as usize;
        if bytes.len() < total {
            return Err(ProtocolError::Truncated { expected: total, actual: bytes.len() });
        }

        let end = bytes[total - 1];
        if end != Self::END_MARKER {
            return Err(ProtocolError::InvalidEndMarker { actual: end });
        }

        let payload =
            Bytes::copy_from_slice(&bytes[Self::PREFIX_SIZE..Self::PREFIX_SIZE + payload_len as usize]);

        debug_assert_eq!(payload.len(), payload_len as usize);

        Ok(Self { access_key, timestamp, payload })
    }
}

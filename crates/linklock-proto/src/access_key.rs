//! The 8-character human-enterable access code.

use std::fmt;

use crate::errors::{ProtocolError, Result};

/// Symbols an access key may be generated from.
///
/// The reduced deployment charset: every symbol is typeable on the receiver's
/// 4x4 matrix keypad, and visually unambiguous on a character display.
pub const ACCESS_CHARSET: &[u8] = b"123456AB";

/// Fixed-length access code accompanying every message.
///
/// Travels in the clear inside the frame and is re-entered by hand on the
/// receiver before the payload is decrypted. Doubles as key-derivation input
/// (see `linklock-crypto`).
///
/// # Invariants
///
/// - Always exactly [`AccessKey::SIZE`] bytes
/// - Contains no NUL byte (the wire format and displays treat the key as a
///   sentinel-free byte run)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessKey([u8; Self::SIZE]);

impl AccessKey {
    /// Length of every access key in bytes.
    pub const SIZE: usize = 8;

    /// Construct from raw bytes, enforcing the key invariants.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::InvalidAccessKey` if any byte is NUL
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Result<Self> {
        if bytes.contains(&0) {
            return Err(ProtocolError::InvalidAccessKey { reason: "contains NUL byte" });
        }
        Ok(Self(bytes))
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl TryFrom<&[u8]> for AccessKey {
    type Error = ProtocolError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: [u8; Self::SIZE] = bytes
            .try_into()
            .map_err(|_| ProtocolError::InvalidAccessKey { reason: "must be exactly 8 bytes" })?;
        Self::from_bytes(array)
    }
}

impl AsRef<[u8]> for AccessKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Renders the key the way the sender shows it to the operator.
///
/// Non-printable bytes (possible on keys parsed from a foreign wire) appear
/// as `?` rather than corrupting the display.
impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            let c = if byte.is_ascii_graphic() { byte as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

//! Symmetric key derivation from the cleartext frame fields.

use linklock_proto::AccessKey;
use zeroize::Zeroize;

/// Derived key length in bytes.
pub const KEY_SIZE: usize = 16;

/// Whitening constant folded into every derived byte.
const WHITEN: u8 = 0x5A;

/// Session-scoped symmetric key.
///
/// Derived on the sender at encryption time and re-derived on the receiver
/// from the frame's cleartext access key and timestamp. Never transmitted.
/// Held only for the duration of one transform and zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey([u8; KEY_SIZE]);

impl DerivedKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

// No Debug derive: key bytes must not leak into logs or panic messages.
impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Derive the 16-byte symmetric key from an access key and timestamp.
///
/// For each output index `i`:
/// `key[i] = access_key[i % 8] ^ ((timestamp >> (i % 32)) & 0xFF) ^ 0x5A`
///
/// Deterministic and pure: identical inputs always yield identical output.
/// This is required, not incidental; the receiver must reconstruct the
/// sender's key from transmitted fields without ever seeing sender state.
pub fn derive_key(access_key: &AccessKey, timestamp: u32) -> DerivedKey {
    let code = access_key.as_bytes();
    let mut key = [0u8; KEY_SIZE];

    for (i, byte) in key.iter_mut().enumerate() {
        *byte = code[i % AccessKey::SIZE] ^ ((timestamp >> (i as u32 % 32)) & 0xFF) as u8 ^ WHITEN;
    }

    DerivedKey(key)
}

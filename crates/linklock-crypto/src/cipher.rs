//! Self-inverse keystream transform.
//!
//! One function serves both directions: the transform is an involution, so
//! applying it twice with the same key reproduces the input. The receiver
//! calls exactly the code the sender called.

use zeroize::Zeroize;

use crate::derive::{DerivedKey, KEY_SIZE};

/// Cipher block size; payloads are zero-padded to this boundary.
pub const BLOCK_SIZE: usize = 16;

/// Transform `data` in place under `key`.
///
/// The keystream starts as a copy of the key. At every block boundary
/// (absolute offset `i > 0` with `i % 16 == 0`) each keystream byte `j` is
/// re-mixed as `keystream[j] ^ key[j] ^ (i & 0xFF)`, folding the low byte of
/// the block counter into the state; each data byte is then XORed with
/// `keystream[i % 16]`.
///
/// The working keystream is zeroized before returning.
///
/// # Security
///
/// Deterministic and unauthenticated; a weak reversible transform, not a
/// vetted primitive. See the crate docs.
pub fn keystream_transform(data: &mut [u8], key: &DerivedKey) {
    let key = key.as_bytes();
    let mut keystream = *key;

    for (i, byte) in data.iter_mut().enumerate() {
        if i > 0 && i % KEY_SIZE == 0 {
            for (j, state) in keystream.iter_mut().enumerate() {
                *state ^= key[j] ^ (i & 0xFF) as u8;
            }
        }
        *byte ^= keystream[i % KEY_SIZE];
    }

    keystream.zeroize();
}

/// Zero-pad a plaintext up to the next [`BLOCK_SIZE`] boundary.
///
/// An already-aligned, non-empty buffer is returned unchanged; an empty
/// buffer pads to one full block so that every message occupies at least
/// one block on the wire.
pub fn pad_to_block(mut data: Vec<u8>) -> Vec<u8> {
    let padded = data.len().div_ceil(BLOCK_SIZE).max(1) * BLOCK_SIZE;
    data.resize(padded, 0);
    data
}

//! Linklock Cryptographic Primitives
//!
//! Key generation, derivation, and the keystream cipher for the Linklock
//! transfer pipeline. Pure functions with deterministic outputs; callers
//! provide randomness, which keeps every operation reproducible in tests.
//!
//! # Key Lifecycle
//!
//! Each message gets a fresh access code and a fresh derived key. Nothing
//! survives the message cycle: the derived key is zeroized as soon as its
//! single encrypt or decrypt completes.
//!
//! ```text
//! Access Key (8 chars, travels cleartext) ──┐
//!                                           ├─ derive_key ─> DerivedKey (16 B, never transmitted)
//! Tick Timestamp (u32, travels cleartext) ──┘                     │
//!                                                       keystream_transform
//!                                                                │
//!                                                    ciphertext <─> plaintext
//! ```
//!
//! The receiver reconstructs the identical `DerivedKey` from the frame's
//! cleartext fields; derivation is deterministic by contract.
//!
//! # Security
//!
//! This is NOT vetted cryptography:
//!
//! - The keystream cipher is a reversible XOR transform with block-counter
//!   diffusion. It is unauthenticated and its confidentiality is weak.
//! - Both derivation inputs travel in the clear; an eavesdropper who reads
//!   the frame can derive the key. Disclosure is gated by a human
//!   re-entering the access code, not by the cipher.
//! - The production sender seeds generation from a coarse tick counter
//!   (weak entropy). Any [`rand::Rng`] can be substituted without changing
//!   the contract.
//!
//! The transform semantics match fielded units byte for byte; "fixing" them
//! would break interoperability with every deployed peer.

mod cipher;
mod derive;
mod keygen;

pub use cipher::{BLOCK_SIZE, keystream_transform, pad_to_block};
pub use derive::{DerivedKey, KEY_SIZE, derive_key};
pub use keygen::generate_access_key;

//! Per-message session: key material with a one-cycle lifetime.
//!
//! The deployed firmware kept key material, frame buffers, and state-machine
//! position in process-wide globals. Here each message cycle owns an explicit
//! session value instead: the sender originates one per outbound message,
//! the receiver reconstructs one from the frame's cleartext fields, and both
//! are consumed by their single cipher operation. Dropping the session
//! zeroizes the derived key.

use linklock_crypto::{DerivedKey, derive_key, generate_access_key, keystream_transform, pad_to_block};
use linklock_proto::{AccessKey, Frame};
use rand::Rng;
use tracing::debug;

use crate::{clock::Clock, errors::Result};

/// Key material scoped to exactly one message cycle.
///
/// The derived key is computed once at construction and surrendered with the
/// session's single [`seal`](Self::seal) or [`open`](Self::open) call. There
/// is deliberately no way to run two cipher operations under one session.
pub struct MessageSession {
    access_key: AccessKey,
    timestamp: u32,
    key: DerivedKey,
}

impl MessageSession {
    /// Start an outbound session: fresh access key, current tick timestamp.
    ///
    /// The caller owns the RNG; the production sender seeds one from the
    /// clock's tick counter per message (the deployed weak-entropy
    /// behavior, documented in `linklock-crypto`).
    pub fn originate(rng: &mut impl Rng, clock: &impl Clock) -> Self {
        let access_key = generate_access_key(rng);
        let timestamp = clock.ticks();
        debug!(timestamp, "originated outbound session");

        Self { access_key, timestamp, key: derive_key(&access_key, timestamp) }
    }

    /// Reconstruct the sender's session from a received frame.
    ///
    /// Derivation is deterministic over the frame's cleartext access key and
    /// timestamp, so this yields exactly the key the sender encrypted with.
    pub fn from_frame(frame: &Frame) -> Self {
        debug!(timestamp = frame.timestamp, "reconstructed session from frame");

        Self {
            access_key: frame.access_key,
            timestamp: frame.timestamp,
            key: derive_key(&frame.access_key, frame.timestamp),
        }
    }

    /// The cleartext access code for this session.
    ///
    /// The sender shows it to the operator after transmission; the receiver
    /// compares keypad entry against it.
    pub fn access_key(&self) -> AccessKey {
        self.access_key
    }

    /// Tick timestamp this session derives from.
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Pad, encrypt, and frame a plaintext, consuming the session.
    ///
    /// # Errors
    ///
    /// - `LinkError::Format` if the padded plaintext exceeds the frame's
    ///   payload bound
    pub fn seal(self, plaintext: Vec<u8>) -> Result<Frame> {
        let mut payload = pad_to_block(plaintext);
        keystream_transform(&mut payload, &self.key);

        Ok(Frame::new(self.access_key, self.timestamp, payload)?)
    }

    /// Decrypt a received frame's payload, consuming the session.
    ///
    /// The frame must be the one this session was reconstructed from;
    /// trailing zero padding is preserved (plaintext length is not encoded
    /// on the wire).
    pub fn open(self, frame: &Frame) -> Vec<u8> {
        debug_assert_eq!(frame.access_key, self.access_key);

        let mut plaintext = frame.payload.to_vec();
        keystream_transform(&mut plaintext, &self.key);
        plaintext
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    struct FixedClock {
        ticks: u32,
    }

    impl Clock for FixedClock {
        type Instant = Duration;

        fn now(&self) -> Duration {
            Duration::from_millis(u64::from(self.ticks))
        }

        fn ticks(&self) -> u32 {
            self.ticks
        }

        fn sleep(&self, _duration: Duration) {}
    }

    #[test]
    fn originate_captures_clock_ticks() {
        let session =
            MessageSession::originate(&mut ChaCha8Rng::seed_from_u64(1), &FixedClock { ticks: 777 });
        assert_eq!(session.timestamp(), 777);
    }

    #[test]
    fn seal_pads_to_block_boundary() {
        let session =
            MessageSession::originate(&mut ChaCha8Rng::seed_from_u64(2), &FixedClock { ticks: 1 });
        let frame = session.seal(b"HI\n".to_vec()).unwrap();
        assert_eq!(frame.payload.len(), 16);
    }

    #[test]
    fn receiver_session_opens_what_sender_sealed() {
        let sender =
            MessageSession::originate(&mut ChaCha8Rng::seed_from_u64(3), &FixedClock { ticks: 1000 });
        let frame = sender.seal(b"attack at dawn".to_vec()).unwrap();

        let receiver = MessageSession::from_frame(&frame);
        let plaintext = receiver.open(&frame);

        assert_eq!(&plaintext[..14], b"attack at dawn");
        assert!(plaintext[14..].iter().all(|&b| b == 0));
    }

    #[test]
    fn ciphertext_differs_from_plaintext() {
        let session =
            MessageSession::originate(&mut ChaCha8Rng::seed_from_u64(4), &FixedClock { ticks: 9 });
        let frame = session.seal(vec![0x41u8; 32]).unwrap();
        assert_ne!(&frame.payload[..], &[0x41u8; 32][..]);
    }

    #[test]
    fn oversize_plaintext_is_rejected() {
        let session =
            MessageSession::originate(&mut ChaCha8Rng::seed_from_u64(5), &FixedClock { ticks: 9 });
        let result = session.seal(vec![0u8; Frame::MAX_PAYLOAD as usize + 1]);
        assert!(result.is_err());
    }
}

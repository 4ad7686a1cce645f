//! Sender pipeline: plaintext in, framed ciphertext out.

use linklock_core::{Clock, FrameCodec, MessageSession, Result, SerialLink};
use linklock_proto::AccessKey;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

/// RNG seeded from the clock's tick counter, fresh per call.
///
/// This reproduces the deployed sender's entropy source, a coarse
/// milliseconds-since-boot counter. Two messages originated on the same
/// tick draw the same access key; fielded units share the weakness.
/// Substituting a strong RNG in [`send_message`] changes nothing else.
pub fn tick_seeded_rng(clock: &impl Clock) -> StdRng {
    StdRng::seed_from_u64(u64::from(clock.ticks()))
}

/// Encrypt and transmit one plaintext, returning the access key.
///
/// Runs the whole outbound cycle: originate a session (fresh access key,
/// current tick timestamp), pad and encrypt the plaintext, frame it, and
/// pace it out over the link. The returned access key is what the host
/// shows the operator (`Key: XXXXXXXX`); it must reach the receiving human
/// out of band, since the wire carries it in the clear.
///
/// Key material lives only inside this call; the session is consumed by the
/// encryption and its derived key zeroized before the frame is transmitted.
///
/// # Errors
///
/// - `LinkError::Format` if the padded plaintext exceeds the payload bound
/// - `LinkError::Transport` if the link rejects a write
pub fn send_message(
    plaintext: Vec<u8>,
    link: &mut impl SerialLink,
    clock: &impl Clock,
    rng: &mut impl Rng,
    codec: &FrameCodec,
) -> Result<AccessKey> {
    let session = MessageSession::originate(rng, clock);
    let access_key = session.access_key();

    let frame = session.seal(plaintext)?;
    codec.send(&frame, link, clock)?;

    info!(payload_len = frame.payload.len(), "message transmitted");
    Ok(access_key)
}

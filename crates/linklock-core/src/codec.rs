//! Timed frame transfer over a serial link.
//!
//! The sender side paces bytes out so a slow receiver is never overrun; the
//! receiver side reads field by field, each under its own budget, and
//! validates before it allocates. Both halves are fire-and-forget: there is
//! no acknowledgement in the protocol.

use std::time::Duration;

use linklock_proto::{AccessKey, Frame, ProtocolError};
use tracing::{debug, trace};

use crate::{
    clock::Clock,
    errors::{LinkError, Result},
    link::{SerialLink, TransportError},
};

/// Tuning knobs for the wire pacing and timeout behavior.
///
/// Deployments differ in chunking (16-byte and 32-byte variants exist in the
/// field) and in how aggressively they pace, so none of this is hard-coded
/// in the codec itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Payload bytes per write on send and per read on receive.
    pub chunk_size: usize,
    /// Pause after each payload chunk on send.
    pub inter_chunk_delay: Duration,
    /// Pause after each access-key byte on send (key bytes go out one at a
    /// time; slow receivers latch them individually).
    pub inter_byte_delay: Duration,
    /// Receive budget for each fixed-size field and each payload chunk.
    pub field_timeout: Duration,
    /// Budget for a single-byte poll while hunting the start marker.
    pub poll_interval: Duration,
    /// Largest payload this endpoint will accept.
    pub max_payload: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_size: 32,
            inter_chunk_delay: Duration::from_millis(10),
            inter_byte_delay: Duration::from_millis(5),
            field_timeout: Duration::from_millis(1000),
            poll_interval: Duration::from_millis(100),
            max_payload: Frame::MAX_PAYLOAD,
        }
    }
}

/// Frame transmitter/receiver over a [`SerialLink`].
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    config: CodecConfig,
}

impl FrameCodec {
    /// Create a codec with the given pacing configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Transmit one frame.
    ///
    /// Writes marker, access key (byte at a time, paced), timestamp, length,
    /// chunked payload, and end marker. No acknowledgement is awaited.
    ///
    /// # Errors
    ///
    /// - `LinkError::Transport` if the channel rejects a write
    pub fn send(
        &self,
        frame: &Frame,
        link: &mut impl SerialLink,
        clock: &impl Clock,
    ) -> Result<()> {
        debug!(payload_len = frame.payload.len(), "sending frame");

        link.write(&[Frame::START_MARKER])?;

        for &byte in frame.access_key.as_bytes() {
            link.write(&[byte])?;
            clock.sleep(self.config.inter_byte_delay);
        }

        link.write(&frame.timestamp.to_le_bytes())?;
        link.write(&(frame.payload.len() as u32).to_le_bytes())?;

        for chunk in frame.payload.chunks(self.config.chunk_size) {
            link.write(chunk)?;
            clock.sleep(self.config.inter_chunk_delay);
        }

        link.write(&[Frame::END_MARKER])?;

        debug!("frame sent");
        Ok(())
    }

    /// Receive one frame, waiting up to `timeout` for it to begin.
    ///
    /// Stray buffered bytes are discarded first; then single bytes are
    /// polled until the start marker appears or the overall timeout lapses.
    /// Once a frame has begun, each field gets its own
    /// [`CodecConfig::field_timeout`] window, so a sender that stalls
    /// mid-frame fails fast rather than consuming the rest of the overall
    /// budget. The declared payload length is validated before the payload
    /// buffer is allocated.
    ///
    /// # Errors
    ///
    /// - `LinkError::Timeout` if the marker or any field does not arrive in
    ///   its window (partial payload buffers are released)
    /// - `LinkError::Format` on a bad length or end marker (received bytes
    ///   are discarded)
    /// - `LinkError::Allocation` if the payload buffer cannot be obtained
    /// - `LinkError::Transport` on channel failure
    pub fn receive(
        &self,
        link: &mut impl SerialLink,
        clock: &impl Clock,
        timeout: Duration,
    ) -> Result<Frame> {
        link.discard_input();

        self.hunt_start_marker(link, clock, timeout)?;

        let mut key_bytes = [0u8; AccessKey::SIZE];
        self.read_field(link, &mut key_bytes, "access key")?;
        let access_key = AccessKey::try_from(key_bytes.as_slice())?;

        let mut word = [0u8; 4];
        self.read_field(link, &mut word, "timestamp")?;
        let timestamp = u32::from_le_bytes(word);

        self.read_field(link, &mut word, "payload length")?;
        let payload_len = u32::from_le_bytes(word);

        // Validate before allocating: a hostile length must never reserve
        // memory or consume payload reads.
        Frame::validate_len(payload_len, self.config.max_payload)?;

        trace!(timestamp, payload_len, "frame prefix received");

        let payload = self.read_payload(link, payload_len as usize)?;

        let mut end = [0u8; 1];
        self.read_field(link, &mut end, "end marker")?;
        if end[0] != Frame::END_MARKER {
            // Drop the assembled payload; the stream is not trustworthy.
            return Err(ProtocolError::InvalidEndMarker { actual: end[0] }.into());
        }

        let frame = Frame::new(access_key, timestamp, payload)?;
        debug!(payload_len = frame.payload.len(), "frame received");
        Ok(frame)
    }

    /// Poll single bytes until the start marker appears.
    ///
    /// Non-marker bytes are line noise or the tail of an aborted frame and
    /// are skipped; a quiet poll window just loops until the overall
    /// deadline.
    fn hunt_start_marker(
        &self,
        link: &mut impl SerialLink,
        clock: &impl Clock,
        timeout: Duration,
    ) -> Result<()> {
        let started = clock.now();
        let mut byte = [0u8; 1];

        loop {
            let elapsed = clock.now() - started;
            if elapsed >= timeout {
                return Err(LinkError::Timeout { field: "start marker", elapsed });
            }

            match link.read_exact(&mut byte, self.config.poll_interval) {
                Ok(()) if byte[0] == Frame::START_MARKER => return Ok(()),
                Ok(()) => trace!(byte = byte[0], "skipping stray byte"),
                Err(TransportError::TimedOut) => {},
                Err(err @ TransportError::Failed { .. }) => return Err(err.into()),
            }
        }
    }

    /// Read one fixed-size field under the field timeout.
    fn read_field(
        &self,
        link: &mut impl SerialLink,
        buf: &mut [u8],
        field: &'static str,
    ) -> Result<()> {
        link.read_exact(buf, self.config.field_timeout).map_err(|err| match err {
            TransportError::TimedOut => {
                LinkError::Timeout { field, elapsed: self.config.field_timeout }
            },
            TransportError::Failed { detail } => LinkError::Transport { detail },
        })
    }

    /// Accumulate exactly `len` payload bytes in chunk-size steps.
    ///
    /// The buffer is reserved up front (the length is already validated) and
    /// implicitly released on any error return.
    fn read_payload(&self, link: &mut impl SerialLink, len: usize) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        payload.try_reserve_exact(len).map_err(|_| LinkError::Allocation { size: len })?;
        payload.resize(len, 0);

        let mut received = 0;
        while received < len {
            let step = self.config.chunk_size.min(len - received);
            self.read_field(link, &mut payload[received..received + step], "payload")?;
            received += step;
            trace!(received, total = len, "payload chunk received");
        }

        Ok(payload)
    }
}

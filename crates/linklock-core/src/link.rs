//! Serial link abstraction.
//!
//! The one interface the protocol has to the physical byte channel. Kept
//! deliberately narrow (blocking exact reads with a budget, fire-and-forget
//! writes) so a UART, a TCP socket, or an in-memory test channel are all
//! equally valid backends.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by a [`SerialLink`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The requested bytes did not arrive within the read budget.
    #[error("read timed out")]
    TimedOut,

    /// The underlying channel failed (device gone, peer closed, I/O error).
    #[error("transport failure: {detail}")]
    Failed {
        /// Backend-specific description
        detail: String,
    },
}

/// Blocking duplex (or simplex) byte channel.
///
/// Implementations spin or block internally up to the given budget; they do
/// not buffer partial reads across calls. A timed-out `read_exact` leaves
/// any bytes it consumed discarded, matching the behavior of a UART receive
/// with a hardware timeout.
pub trait SerialLink {
    /// Write all of `bytes` to the channel.
    ///
    /// # Errors
    ///
    /// - `TransportError::Failed` if the channel rejects the write
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Fill `buf` exactly, waiting at most `timeout`.
    ///
    /// # Errors
    ///
    /// - `TransportError::TimedOut` if fewer than `buf.len()` bytes arrived
    ///   in time
    /// - `TransportError::Failed` on channel failure
    fn read_exact(&mut self, buf: &mut [u8], timeout: Duration) -> Result<(), TransportError>;

    /// Discard any bytes already buffered on the receive side.
    ///
    /// Called once before hunting for a start marker so a stale partial
    /// frame from a previous failed cycle cannot alias as a new one.
    fn discard_input(&mut self);
}

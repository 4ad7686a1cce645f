//! Error types for timed frame transfer.

use std::time::Duration;

use linklock_proto::ProtocolError;
use thiserror::Error;

use crate::link::TransportError;

/// Result alias for codec and session operations.
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors from moving frames over the serial link.
///
/// Nothing here is fatal: every variant returns control to the caller's
/// wait-for-next-message loop with all partial state already released.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// A field (or the start marker) did not arrive within its window.
    ///
    /// Recoverable: the caller retries the whole message cycle.
    #[error("timed out waiting for {field} after {elapsed:?}")]
    Timeout {
        /// Which wire field was being awaited
        field: &'static str,
        /// How long the receiver waited
        elapsed: Duration,
    },

    /// The stream violated the wire format (bad marker, bad length).
    ///
    /// Recoverable: the received bytes are discarded.
    #[error("format error: {0}")]
    Format(#[from] ProtocolError),

    /// The payload buffer could not be obtained.
    ///
    /// Recoverable: the message is dropped without reading its payload.
    #[error("could not allocate {size}-byte payload buffer")]
    Allocation {
        /// Requested buffer size
        size: usize,
    },

    /// The underlying byte channel failed outright.
    #[error("transport error: {detail}")]
    Transport {
        /// Backend-specific description
        detail: String,
    },
}

impl LinkError {
    /// True when the failure was a timeout, i.e. the link was merely quiet.
    ///
    /// Host loops use this to distinguish "keep waiting" from "the stream
    /// carried garbage": a timeout while hunting for the start marker is
    /// the idle state of a receiver, not a fault worth reporting.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<TransportError> for LinkError {
    fn from(err: TransportError) -> Self {
        match err {
            // A bare transport timeout has no field context; the codec maps
            // these itself. This conversion covers write-side failures.
            TransportError::TimedOut => {
                Self::Timeout { field: "transport", elapsed: Duration::ZERO }
            },
            TransportError::Failed { detail } => Self::Transport { detail },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timeouts_are_quiet() {
        assert!(
            LinkError::Timeout { field: "start marker", elapsed: Duration::from_secs(5) }
                .is_timeout()
        );

        assert!(!LinkError::Allocation { size: 10_240 }.is_timeout());
        assert!(!LinkError::Transport { detail: "device unplugged".into() }.is_timeout());
        assert!(
            !LinkError::Format(ProtocolError::InvalidEndMarker { actual: 0x00 }).is_timeout()
        );
    }

    #[test]
    fn format_errors_wrap_protocol_errors() {
        let err: LinkError = ProtocolError::MisalignedLength { size: 17 }.into();
        assert!(matches!(err, LinkError::Format(_)));
    }
}

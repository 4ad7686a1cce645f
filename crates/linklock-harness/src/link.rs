//! In-memory serial link.

use std::{cell::RefCell, collections::VecDeque, rc::Rc, time::Duration};

use linklock_core::{Clock, SerialLink, TransportError};

use crate::env::SimClock;

type ByteQueue = Rc<RefCell<VecDeque<u8>>>;

/// One endpoint of a simulated duplex serial link.
///
/// Writes land in the peer's inbox instantly and losslessly; reads drain
/// this endpoint's inbox. An underfilled read behaves like a UART receive
/// timeout: it fails and charges its full budget to the virtual clock, so
/// receiver timeout paths are exercised in virtual time.
pub struct SimLink {
    inbox: ByteQueue,
    outbox: ByteQueue,
    clock: SimClock,
}

impl SimLink {
    /// Create a connected pair of endpoints sharing `clock`.
    pub fn pair(clock: &SimClock) -> (Self, Self) {
        let a_to_b: ByteQueue = Rc::default();
        let b_to_a: ByteQueue = Rc::default();

        let a = Self { inbox: Rc::clone(&b_to_a), outbox: Rc::clone(&a_to_b), clock: clock.clone() };
        let b = Self { inbox: a_to_b, outbox: b_to_a, clock: clock.clone() };
        (a, b)
    }

    /// Mutate the bytes this endpoint has already written but the peer has
    /// not yet read.
    ///
    /// This is the fault-injection hook: corrupt a marker, truncate a
    /// payload, or prepend line noise before the peer's receive runs.
    pub fn tamper(&self, mutate: impl FnOnce(&mut VecDeque<u8>)) {
        mutate(&mut self.outbox.borrow_mut());
    }

    /// Bytes queued toward the peer.
    pub fn pending(&self) -> usize {
        self.outbox.borrow().len()
    }
}

impl SerialLink for SimLink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.outbox.borrow_mut().extend(bytes);
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8], timeout: Duration) -> Result<(), TransportError> {
        let mut inbox = self.inbox.borrow_mut();
        if inbox.len() < buf.len() {
            drop(inbox);
            self.clock.sleep(timeout);
            return Err(TransportError::TimedOut);
        }

        for slot in buf.iter_mut() {
            *slot = inbox.pop_front().ok_or(TransportError::TimedOut)?;
        }
        Ok(())
    }

    fn discard_input(&mut self) {
        // Deliberately a no-op. In this single-threaded simulation a test's
        // transmission always completes before the receive cycle begins, so
        // the receiver's opening flush would destroy the frame under test.
        // Stale-byte scenarios are expressed by writing noise bytes ahead of
        // the frame instead; the marker hunt skips them.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_flow_between_endpoints() {
        let clock = SimClock::new();
        let (mut tx, mut rx) = SimLink::pair(&clock);

        tx.write(&[1, 2, 3]).unwrap();
        assert_eq!(tx.pending(), 3);

        let mut buf = [0u8; 3];
        rx.read_exact(&mut buf, Duration::from_millis(100)).unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn underfilled_read_times_out_and_charges_the_clock() {
        let clock = SimClock::new();
        let (_tx, mut rx) = SimLink::pair(&clock);

        let mut buf = [0u8; 4];
        let result = rx.read_exact(&mut buf, Duration::from_millis(100));

        assert_eq!(result, Err(TransportError::TimedOut));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn pending_bytes_survive_the_opening_flush() {
        let clock = SimClock::new();
        let (mut tx, mut rx) = SimLink::pair(&clock);

        tx.write(&[9, 9]).unwrap();
        rx.discard_input();

        let mut buf = [0u8; 2];
        rx.read_exact(&mut buf, Duration::from_millis(10)).unwrap();
        assert_eq!(buf, [9, 9]);
    }

    #[test]
    fn tamper_reaches_unread_bytes() {
        let clock = SimClock::new();
        let (mut tx, mut rx) = SimLink::pair(&clock);

        tx.write(&[0xAA, 0xBB]).unwrap();
        tx.tamper(|queue| {
            if let Some(byte) = queue.back_mut() {
                *byte = 0x00;
            }
        });

        let mut buf = [0u8; 2];
        rx.read_exact(&mut buf, Duration::from_millis(10)).unwrap();
        assert_eq!(buf, [0xAA, 0x00]);
    }
}

//! Receiver driver: one full inbound message cycle.
//!
//! Receives a frame, gates it behind keypad entry of the access code, then
//! decrypts and presents the plaintext line by line. Every blocking step is
//! budgeted; any failure resets all partial state and returns the caller to
//! its wait-for-next-message loop.

use std::time::Duration;

use linklock_core::{Clock, FrameCodec, LinkError, MessageSession, Result, SerialLink};
use tracing::{debug, info};

use crate::{
    device::{DISPLAY_COLS, Keypad, TextDisplay},
    verifier::{AccessVerifier, VerifierEvent},
};

/// Pacing for the entry loop and the plaintext presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    /// Pause between keypad polls while collecting the access code.
    pub entry_poll: Duration,
    /// Quiescent interval required between accepted keypad symbols.
    pub debounce: Duration,
    /// Budget for the operator to produce a matching code before the cycle
    /// is abandoned (the frame is discarded with it).
    pub entry_timeout: Duration,
    /// How long each plaintext line stays on the display.
    pub line_dwell: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            entry_poll: Duration::from_millis(10),
            debounce: Duration::from_millis(200),
            entry_timeout: Duration::from_secs(60),
            line_dwell: Duration::from_secs(2),
        }
    }
}

/// Receive, verify, decrypt, and present one message.
///
/// Blocks up to `timeout` for a frame to begin arriving, then runs the
/// keypad gate: accepted symbols echo as masked indicators, a mismatched
/// code shows `Invalid Key!` and restarts entry from scratch (the received
/// frame is retained), and a matching code releases the payload for
/// decryption. The decrypted text is presented as numbered display lines
/// and also returned, padding included.
///
/// # Errors
///
/// - `LinkError::Timeout` if no frame arrives, a field stalls mid-frame, or
///   the operator exhausts the entry budget
/// - `LinkError::Format` / `LinkError::Allocation` / `LinkError::Transport`
///   as surfaced by the codec
pub fn receive_message(
    link: &mut impl SerialLink,
    clock: &impl Clock,
    keypad: &mut impl Keypad,
    display: &mut impl TextDisplay,
    codec: &FrameCodec,
    config: &ReceiverConfig,
    timeout: Duration,
) -> Result<Vec<u8>> {
    let frame = codec.receive(link, clock, timeout)?;
    debug!(payload_len = frame.payload.len(), "frame received, awaiting access code");

    collect_access_code(&frame, clock, keypad, display, config)?;

    let session = MessageSession::from_frame(&frame);
    let plaintext = session.open(&frame);
    info!(len = plaintext.len(), "message decrypted");

    present_plaintext(&plaintext, display, clock, config);
    Ok(plaintext)
}

/// Run the keypad gate until the operator enters the frame's access code.
fn collect_access_code(
    frame: &linklock_proto::Frame,
    clock: &impl Clock,
    keypad: &mut impl Keypad,
    display: &mut impl TextDisplay,
    config: &ReceiverConfig,
) -> Result<()> {
    display.show("Enter Access Key:", "");

    let mut verifier = AccessVerifier::new(frame.access_key, config.debounce);
    let started = clock.now();

    loop {
        let elapsed = clock.now() - started;
        if elapsed >= config.entry_timeout {
            return Err(LinkError::Timeout { field: "access code entry", elapsed });
        }

        if let Some(symbol) = keypad.poll() {
            match verifier.offer(symbol, clock.now()) {
                VerifierEvent::SymbolAccepted { position } => {
                    display.show("Enter Access Key:", &"*".repeat(position + 1));
                },
                VerifierEvent::Verified => {
                    display.show("Access Granted!", "");
                    return Ok(());
                },
                VerifierEvent::Rejected => {
                    display.show("Invalid Key!", "");
                    clock.sleep(config.line_dwell);
                    display.show("Enter Access Key:", "");
                },
                VerifierEvent::SymbolIgnored => {},
            }
        }

        clock.sleep(config.entry_poll);
    }
}

/// Present decrypted text as numbered, display-width lines.
///
/// Logical lines split on `\n`; lines wider than the display wrap into
/// continuation segments. Trailing zero padding from the cipher block is
/// not shown. Ends with an `End of Message` card.
pub fn present_plaintext(
    plaintext: &[u8],
    display: &mut impl TextDisplay,
    clock: &impl Clock,
    config: &ReceiverConfig,
) {
    let text = trim_padding(plaintext);

    let mut line_number = 0;
    for logical in String::from_utf8_lossy(text).split('\n') {
        if logical.is_empty() {
            continue;
        }

        let chars: Vec<char> = logical.chars().collect();
        for segment in chars.chunks(DISPLAY_COLS) {
            line_number += 1;
            let body: String = segment.iter().collect();
            display.show(&format!("Line {line_number}:"), &body);
            clock.sleep(config.line_dwell);
        }
    }

    display.show("End of Message", "");
}

/// Strip the cipher's trailing zero padding for presentation.
///
/// The wire does not carry the unpadded length, so the zeros are genuinely
/// indistinguishable from content; NUL never occurs in selectable text,
/// which is what makes this safe.
fn trim_padding(plaintext: &[u8]) -> &[u8] {
    let end = plaintext.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &plaintext[..end]
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque, rc::Rc};

    use linklock_core::{CodecConfig, TransportError};
    use linklock_proto::{AccessKey, Frame};

    use super::*;

    #[derive(Clone, Default)]
    struct TestClock {
        elapsed: Rc<RefCell<Duration>>,
    }

    impl Clock for TestClock {
        type Instant = Duration;

        fn now(&self) -> Duration {
            *self.elapsed.borrow()
        }

        fn ticks(&self) -> u32 {
            self.now().as_millis() as u32
        }

        fn sleep(&self, duration: Duration) {
            *self.elapsed.borrow_mut() += duration;
        }
    }

    struct TestLink {
        rx: VecDeque<u8>,
        clock: TestClock,
    }

    impl SerialLink for TestLink {
        fn write(&mut self, bytes: &[u8]) -> std::result::Result<(), TransportError> {
            self.rx.extend(bytes);
            Ok(())
        }

        fn read_exact(
            &mut self,
            buf: &mut [u8],
            timeout: Duration,
        ) -> std::result::Result<(), TransportError> {
            if self.rx.len() < buf.len() {
                self.clock.sleep(timeout);
                return Err(TransportError::TimedOut);
            }
            for slot in buf.iter_mut() {
                *slot = self.rx.pop_front().ok_or(TransportError::TimedOut)?;
            }
            Ok(())
        }

        fn discard_input(&mut self) {}
    }

    /// Scripted operator: yields one symbol every `interval` polls, leaving
    /// realistic quiet polls in between so the debounce window can elapse.
    #[derive(Default)]
    struct ScriptKeypad {
        symbols: VecDeque<u8>,
        interval: usize,
        countdown: usize,
    }

    impl ScriptKeypad {
        /// One symbol per 25 polls: 250 ms of virtual time at the default
        /// 10 ms poll, comfortably past the 200 ms debounce.
        fn typing(codes: &[&[u8]]) -> Self {
            Self {
                symbols: codes.iter().flat_map(|c| c.iter().copied()).collect(),
                interval: 25,
                countdown: 0,
            }
        }
    }

    impl Keypad for ScriptKeypad {
        fn poll(&mut self) -> Option<u8> {
            if self.countdown > 0 {
                self.countdown -= 1;
                return None;
            }
            self.countdown = self.interval;
            self.symbols.pop_front()
        }
    }

    #[derive(Default)]
    struct ScreenLog {
        lines: Vec<(String, String)>,
    }

    impl TextDisplay for ScreenLog {
        fn show(&mut self, line1: &str, line2: &str) {
            self.lines.push((line1.to_string(), line2.to_string()));
        }
    }

    fn sealed_frame(plaintext: &[u8]) -> Frame {
        use linklock_crypto::{derive_key, keystream_transform, pad_to_block};

        let key = AccessKey::from_bytes(*b"A1B2C3D4").unwrap();
        let derived = derive_key(&key, 1000);
        let mut payload = pad_to_block(plaintext.to_vec());
        keystream_transform(&mut payload, &derived);
        Frame::new(key, 1000, payload).unwrap()
    }

    fn run(
        frame: &Frame,
        keypad: &mut ScriptKeypad,
        config: &ReceiverConfig,
    ) -> (Result<Vec<u8>>, ScreenLog) {
        let clock = TestClock::default();
        let mut link = TestLink { rx: frame.to_wire_bytes().into_iter().collect(), clock: clock.clone() };
        let mut screen = ScreenLog::default();

        let result = receive_message(
            &mut link,
            &clock,
            keypad,
            &mut screen,
            &FrameCodec::new(CodecConfig::default()),
            config,
            Duration::from_secs(5),
        );
        (result, screen)
    }

    #[test]
    fn correct_code_releases_the_plaintext() {
        let frame = sealed_frame(b"HI\n");
        let mut keypad = ScriptKeypad::typing(&[b"A1B2C3D4"]);

        let (result, screen) = run(&frame, &mut keypad, &ReceiverConfig::default());
        let plaintext = result.unwrap();

        assert_eq!(&plaintext[..3], b"HI\n");
        assert_eq!(plaintext.len(), 16);
        assert!(plaintext[3..].iter().all(|&b| b == 0));

        assert!(screen.lines.iter().any(|(l1, _)| l1 == "Access Granted!"));
        assert!(screen.lines.iter().any(|(l1, l2)| l1 == "Line 1:" && l2 == "HI"));
        assert!(screen.lines.iter().any(|(l1, _)| l1 == "End of Message"));
    }

    #[test]
    fn wrong_code_reprompts_then_correct_code_succeeds() {
        let frame = sealed_frame(b"HI\n");
        let mut keypad = ScriptKeypad::typing(&[b"11111111", b"A1B2C3D4"]);

        let (result, screen) = run(&frame, &mut keypad, &ReceiverConfig::default());
        assert!(result.is_ok());

        assert!(screen.lines.iter().any(|(l1, _)| l1 == "Invalid Key!"));
        assert!(screen.lines.iter().any(|(l1, _)| l1 == "Access Granted!"));
    }

    #[test]
    fn masked_echo_grows_with_entry() {
        let frame = sealed_frame(b"HI\n");
        let mut keypad = ScriptKeypad::typing(&[b"A1B2C3D4"]);

        let (_, screen) = run(&frame, &mut keypad, &ReceiverConfig::default());

        let masks: Vec<&str> = screen
            .lines
            .iter()
            .filter(|(l1, l2)| l1 == "Enter Access Key:" && !l2.is_empty())
            .map(|(_, l2)| l2.as_str())
            .collect();
        assert_eq!(masks, ["*", "**", "***", "****", "*****", "******", "*******"]);
    }

    #[test]
    fn entry_budget_exhaustion_abandons_the_cycle() {
        let frame = sealed_frame(b"HI\n");
        let mut keypad = ScriptKeypad::default();

        let config =
            ReceiverConfig { entry_timeout: Duration::from_millis(100), ..ReceiverConfig::default() };
        let (result, _) = run(&frame, &mut keypad, &config);

        assert!(matches!(
            result,
            Err(LinkError::Timeout { field: "access code entry", .. })
        ));
    }

    #[test]
    fn long_lines_wrap_at_display_width() {
        let frame = sealed_frame(b"this line is wider than the display\n");
        let mut keypad = ScriptKeypad::typing(&[b"A1B2C3D4"]);

        let (result, screen) = run(&frame, &mut keypad, &ReceiverConfig::default());
        assert!(result.is_ok());

        let bodies: Vec<&str> = screen
            .lines
            .iter()
            .filter(|(l1, _)| l1.starts_with("Line "))
            .map(|(_, l2)| l2.as_str())
            .collect();
        assert_eq!(bodies, ["this line is wid", "er than the disp", "lay"]);
        assert!(bodies.iter().all(|b| b.chars().count() <= DISPLAY_COLS));
    }

    #[test]
    fn quiet_link_times_out_without_touching_the_keypad() {
        let clock = TestClock::default();
        let mut link = TestLink { rx: VecDeque::new(), clock: clock.clone() };
        let mut keypad = ScriptKeypad::typing(&[b"A1B2C3D4"]);
        let mut screen = ScreenLog::default();

        let result = receive_message(
            &mut link,
            &clock,
            &mut keypad,
            &mut screen,
            &FrameCodec::default(),
            &ReceiverConfig::default(),
            Duration::from_millis(500),
        );

        assert!(matches!(result, Err(LinkError::Timeout { field: "start marker", .. })));
        assert!(screen.lines.is_empty(), "no prompt before a frame exists");
    }
}

//! Property-based tests for the access-code gate.

use std::time::Duration;

use linklock_app::{AccessVerifier, VerifierEvent, VerifierState};
use linklock_proto::{ACCESS_CHARSET, AccessKey};
use proptest::prelude::*;

const DEBOUNCE: Duration = Duration::from_millis(200);

fn arbitrary_access_key() -> impl Strategy<Value = AccessKey> {
    prop::collection::vec(prop::sample::select(ACCESS_CHARSET.to_vec()), AccessKey::SIZE)
        .prop_map(|symbols| {
            let mut bytes = [0u8; AccessKey::SIZE];
            bytes.copy_from_slice(&symbols);
            AccessKey::from_bytes(bytes).expect("charset symbols are never NUL")
        })
}

/// Any printable candidate entry of 8 symbols.
fn arbitrary_entry() -> impl Strategy<Value = [u8; 8]> {
    prop::collection::vec(0x21u8..=0x7E, 8).prop_map(|v| {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&v);
        bytes
    })
}

/// Feed 8 symbols spaced past the debounce window, returning the final event.
fn enter(verifier: &mut AccessVerifier<Duration>, entry: &[u8; 8], start: Duration) -> VerifierEvent {
    let mut last = VerifierEvent::SymbolIgnored;
    for (i, &symbol) in entry.iter().enumerate() {
        last = verifier.offer(symbol, start + DEBOUNCE * 2 * (i as u32 + 1));
    }
    last
}

#[test]
fn prop_only_the_exact_code_verifies() {
    proptest!(|(expected in arbitrary_access_key(), entry in arbitrary_entry())| {
        let mut verifier = AccessVerifier::new(expected, DEBOUNCE);
        let outcome = enter(&mut verifier, &entry, Duration::ZERO);

        if entry == *expected.as_bytes() {
            prop_assert_eq!(outcome, VerifierEvent::Verified);
            prop_assert_eq!(verifier.state(), VerifierState::Complete);
        } else {
            prop_assert_eq!(outcome, VerifierEvent::Rejected);
            prop_assert_eq!(verifier.state(), VerifierState::AwaitingEntry);
            prop_assert_eq!(verifier.entered_len(), 0);
        }
    });
}

#[test]
fn prop_any_rejection_still_allows_the_true_code() {
    proptest!(|(expected in arbitrary_access_key(), wrong in arbitrary_entry())| {
        prop_assume!(wrong != *expected.as_bytes());

        let mut verifier = AccessVerifier::new(expected, DEBOUNCE);
        prop_assert_eq!(enter(&mut verifier, &wrong, Duration::ZERO), VerifierEvent::Rejected);

        // PROPERTY: a mismatch never wedges the gate
        let outcome = enter(&mut verifier, expected.as_bytes(), Duration::from_secs(120));
        prop_assert_eq!(outcome, VerifierEvent::Verified);
    });
}

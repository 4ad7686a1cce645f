//! Access-key generation.

use linklock_proto::{ACCESS_CHARSET, AccessKey};
use rand::Rng;

/// Draw a fresh 8-symbol access key uniformly from the charset.
///
/// Always succeeds. Callers own the RNG: the production sender seeds one
/// from its tick counter per message, matching the weak entropy of fielded
/// units, while tests pass a seeded generator. A cryptographically strong
/// RNG can be substituted without changing this contract.
pub fn generate_access_key(rng: &mut impl Rng) -> AccessKey {
    let mut symbols = [0u8; AccessKey::SIZE];
    for symbol in &mut symbols {
        *symbol = ACCESS_CHARSET[rng.gen_range(0..ACCESS_CHARSET.len())];
    }

    let Ok(key) = AccessKey::from_bytes(symbols) else {
        unreachable!("charset contains no NUL");
    };
    key
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn generated_symbols_come_from_charset() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let key = generate_access_key(&mut rng);
            for &symbol in key.as_bytes() {
                assert!(ACCESS_CHARSET.contains(&symbol));
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_key() {
        let first = generate_access_key(&mut ChaCha8Rng::seed_from_u64(42));
        let second = generate_access_key(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_diverge() {
        // Not a strict guarantee, but a collision across 8 uniform symbols
        // from adjacent seeds would indicate a broken draw.
        let first = generate_access_key(&mut ChaCha8Rng::seed_from_u64(1));
        let second = generate_access_key(&mut ChaCha8Rng::seed_from_u64(2));
        assert_ne!(first, second);
    }

    #[test]
    fn every_charset_symbol_is_reachable() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.extend(generate_access_key(&mut rng).as_bytes().iter().copied());
        }
        for &symbol in ACCESS_CHARSET {
            assert!(seen.contains(&symbol), "symbol {} never drawn", symbol as char);
        }
    }
}

//! Random secret generation.
//!
//! Every character is drawn from the operating system CSPRNG.  Each
//! enabled character class appears at least once in the output; the
//! remaining positions are filled uniformly from the union alphabet and
//! the whole buffer is shuffled with the same RNG.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{Rng, TryRngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{PassVaultError, Result};

/// Shortest secret the generator will produce.
pub const MIN_LENGTH: usize = 8;

/// Length used when the caller does not ask for one.
pub const DEFAULT_LENGTH: usize = 16;

/// Longest secret the generator will produce.
pub const MAX_LENGTH: usize = 4096;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Which character classes a generated secret may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterClasses {
    /// `a`–`z`
    pub lowercase: bool,
    /// `A`–`Z`
    pub uppercase: bool,
    /// `0`–`9`
    pub digits: bool,
    /// ASCII punctuation
    pub symbols: bool,
}

impl Default for CharacterClasses {
    fn default() -> Self {
        Self {
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

impl CharacterClasses {
    /// No classes enabled; combine with struct update syntax.
    pub const NONE: Self = Self {
        lowercase: false,
        uppercase: false,
        digits: false,
        symbols: false,
    };

    fn enabled(&self) -> Vec<&'static [u8]> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter_map(|(on, set)| on.then_some(set))
        .collect()
    }
}

/// Generate a random secret of `length` characters.
pub fn generate(length: usize, classes: &CharacterClasses) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
        return Err(PassVaultError::InvalidLength {
            min: MIN_LENGTH,
            max: MAX_LENGTH,
            got: length,
        });
    }

    let sets = classes.enabled();
    if sets.is_empty() {
        return Err(PassVaultError::EmptyAlphabet);
    }

    let alphabet: Vec<u8> = sets.concat();
    let mut rng = OsRng.unwrap_err();

    let mut buf: Vec<u8> = Vec::with_capacity(length);
    for set in &sets {
        buf.push(set[rng.random_range(0..set.len())]);
    }
    while buf.len() < length {
        buf.push(alphabet[rng.random_range(0..alphabet.len())]);
    }
    buf.shuffle(&mut rng);

    // Every byte came from an ASCII table.
    let secret = String::from_utf8(buf).map_err(|e| {
        let mut bad = e.into_bytes();
        bad.zeroize();
        PassVaultError::RandomSource("generated non-ASCII output".into())
    })?;

    Ok(Zeroizing::new(secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rejects_short_length() {
        let err = generate(7, &CharacterClasses::default()).err().unwrap();
        assert!(matches!(err, PassVaultError::InvalidLength { min: 8, got: 7, .. }));
        assert!(generate(MIN_LENGTH, &CharacterClasses::default()).is_ok());
    }

    #[test]
    fn rejects_oversized_length_without_allocating() {
        for length in [MAX_LENGTH + 1, usize::MAX] {
            let err = generate(length, &CharacterClasses::default()).err().unwrap();
            assert!(matches!(err, PassVaultError::InvalidLength { got, .. } if got == length));
        }
        assert_eq!(
            generate(MAX_LENGTH, &CharacterClasses::default()).unwrap().len(),
            MAX_LENGTH
        );
    }

    #[test]
    fn rejects_empty_alphabet() {
        let err = generate(16, &CharacterClasses::NONE).err().unwrap();
        assert!(matches!(err, PassVaultError::EmptyAlphabet));
    }

    #[test]
    fn digits_only_uses_digits() {
        let classes = CharacterClasses {
            digits: true,
            ..CharacterClasses::NONE
        };
        for _ in 0..100 {
            let s = generate(16, &classes).unwrap();
            assert_eq!(s.len(), 16);
            assert!(s.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn digits_only_never_repeats_over_many_trials() {
        let classes = CharacterClasses {
            digits: true,
            ..CharacterClasses::NONE
        };
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let s = generate(16, &classes).unwrap();
            assert!(seen.insert(s.to_string()), "generator repeated a secret");
        }
    }

    #[test]
    fn every_enabled_class_is_present() {
        for _ in 0..200 {
            let s = generate(MIN_LENGTH, &CharacterClasses::default()).unwrap();
            assert!(s.bytes().any(|b| b.is_ascii_lowercase()));
            assert!(s.bytes().any(|b| b.is_ascii_uppercase()));
            assert!(s.bytes().any(|b| b.is_ascii_digit()));
            assert!(s.bytes().any(|b| b.is_ascii_punctuation()));
        }
    }

    #[test]
    fn disabled_classes_never_appear() {
        let classes = CharacterClasses {
            lowercase: true,
            symbols: true,
            ..CharacterClasses::NONE
        };
        let s = generate(64, &classes).unwrap();
        assert!(s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_punctuation()));
    }
}

//! Temporary password generation.
//!
//! Generated credentials always contain at least one character from each of
//! the four [`CharacterClass`]es and have the length the generator was built
//! with. The character order is shuffled so the mandatory characters do not
//! sit at predictable positions.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_core::credential::CredentialGenerator;
//!
//! let generator = CredentialGenerator::default();
//! let credential = generator.generate();
//! assert_eq!(credential.len(), 8);
//! ```

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*";

/// Error type for credential generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error(
        "password length {requested} is too short; at least {} characters are required",
        CredentialGenerator::MIN_LENGTH
    )]
    InvalidLength { requested: usize },
}

/// The character classes every credential must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Lowercase,
        CharacterClass::Uppercase,
        CharacterClass::Digit,
        CharacterClass::Symbol,
    ];

    /// The alphabet characters of this class are drawn from.
    pub const fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Lowercase => LOWERCASE,
            Self::Uppercase => UPPERCASE,
            Self::Digit => DIGITS,
            Self::Symbol => SYMBOLS,
        }
    }

    /// Classify a character, returning `None` for characters outside every alphabet.
    pub fn of(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| c.is_ascii() && class.alphabet().contains(&(c as u8)))
    }
}

/// A generated plaintext password.
///
/// The value is redacted from `Debug` output so it cannot leak into logs.
/// Use [`Credential::as_str`] to display or transmit it.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the value contains a character from every [`CharacterClass`].
    pub fn covers_all_classes(&self) -> bool {
        CharacterClass::ALL
            .into_iter()
            .all(|class| self.0.chars().any(|c| CharacterClass::of(c) == Some(class)))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<redacted>)")
    }
}

impl AsRef<str> for Credential {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Random password generator with a fixed output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialGenerator {
    length: usize,
}

impl CredentialGenerator {
    /// One slot per mandatory character class.
    pub const MIN_LENGTH: usize = CharacterClass::ALL.len();
    pub const DEFAULT_LENGTH: usize = 8;

    /// Create a generator producing passwords of `length` characters.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidLength`] when `length` is below
    /// [`Self::MIN_LENGTH`].
    pub fn new(length: usize) -> Result<Self, CredentialError> {
        if length < Self::MIN_LENGTH {
            return Err(CredentialError::InvalidLength { requested: length });
        }
        Ok(Self { length })
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Generate a credential using the thread-local CSPRNG.
    pub fn generate(&self) -> Credential {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generate a credential from the given random source.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Credential {
        let mut chars: Vec<u8> = Vec::with_capacity(self.length);

        for class in CharacterClass::ALL {
            chars.push(pick(class.alphabet(), rng));
        }

        let union: Vec<u8> = CharacterClass::ALL
            .into_iter()
            .flat_map(|class| class.alphabet().iter().copied())
            .collect();
        for _ in Self::MIN_LENGTH..self.length {
            chars.push(pick(&union, rng));
        }

        chars.shuffle(rng);

        Credential(chars.into_iter().map(char::from).collect())
    }
}

impl Default for CredentialGenerator {
    fn default() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH,
        }
    }
}

fn pick<R: Rng + ?Sized>(alphabet: &[u8], rng: &mut R) -> u8 {
    alphabet[rng.gen_range(0..alphabet.len())]
}

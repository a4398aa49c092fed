//! Allocation settings.
//!
//! # Environment Variables
//!
//! - `ROLLBOOK_SEQUENCE_WIDTH`: Zero-padding width of identifier sequences (default: 4)
//! - `ROLLBOOK_PASSWORD_LENGTH`: Length of generated passwords (default: 8)
//!
//! The password length is not range-checked here; the credential generator
//! rejects values that are too short when it is built.

use crate::parse_or;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Digits the sequence is padded to. Larger sequences widen the identifier.
    pub sequence_width: usize,
    pub password_length: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            sequence_width: 4,
            password_length: 8,
        }
    }
}

impl AllocatorConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            sequence_width: parse_or(lookup("ROLLBOOK_SEQUENCE_WIDTH"), defaults.sequence_width)
                .max(1),
            password_length: parse_or(lookup("ROLLBOOK_PASSWORD_LENGTH"), defaults.password_length),
        }
    }
}

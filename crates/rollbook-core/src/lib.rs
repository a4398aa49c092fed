//! # Rollbook Core
//!
//! Foundational pieces shared across the Rollbook workspace:
//!
//! - [`credential`]: Temporary password generation with character-class coverage
//! - [`serde`]: Custom serde deserialization helpers for form input
//!
//! # Example
//!
//! ```ignore
//! use rollbook_core::{CredentialGenerator, CredentialError};
//!
//! let generator = CredentialGenerator::new(12)?;
//! let password = generator.generate();
//! assert!(password.covers_all_classes());
//!
//! assert!(matches!(
//!     CredentialGenerator::new(3),
//!     Err(CredentialError::InvalidLength { .. })
//! ));
//! ```

pub mod credential;
pub mod serde;

// Re-export commonly used types at crate root
pub use credential::{CharacterClass, Credential, CredentialError, CredentialGenerator};

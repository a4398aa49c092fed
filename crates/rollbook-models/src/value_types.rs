//! Strongly-typed value types with validation for contact details.
//!
//! These newtypes guarantee the wrapped value passed validation, so code that
//! holds an [`Email`] or [`PhoneNumber`] never needs to re-check it.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_models::value_types::{Email, PhoneNumber};
//!
//! let email = Email::new("parent@example.com")?;
//! assert_eq!(email.as_str(), "parent@example.com");
//!
//! assert!(PhoneNumber::new("98765").is_err());
//! ```

use std::fmt;
use validator::ValidateEmail;

/// Error type for value type parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueTypeError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),
}

// ============================================================================
// Email
// ============================================================================

/// A validated email address.
///
/// Validation follows the `validator` crate's email rules.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Create a new Email from a string, validating it.
    pub fn new(email: impl Into<String>) -> Result<Self, ValueTypeError> {
        let email = email.into();
        Self::validate(&email)?;
        Ok(Self(email))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(email: &str) -> Result<(), ValueTypeError> {
        if email.is_empty() {
            return Err(ValueTypeError::InvalidEmail("email cannot be empty".into()));
        }

        if !email.validate_email() {
            return Err(ValueTypeError::InvalidEmail(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Email({})", self.0)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// PhoneNumber
// ============================================================================

/// A validated ten-digit phone number.
///
/// Only plain digits are accepted; no country code, spaces or separators.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits in a valid phone number.
    pub const DIGITS: usize = 10;

    /// Create a new PhoneNumber from a string, validating it.
    pub fn new(phone: impl Into<String>) -> Result<Self, ValueTypeError> {
        let phone = phone.into();
        Self::validate(&phone)?;
        Ok(Self(phone))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(phone: &str) -> Result<(), ValueTypeError> {
        if phone.is_empty() {
            return Err(ValueTypeError::InvalidPhoneNumber(
                "phone number cannot be empty".into(),
            ));
        }

        if !phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValueTypeError::InvalidPhoneNumber(format!(
                "'{}' must contain only digits",
                phone
            )));
        }

        if phone.len() != Self::DIGITS {
            return Err(ValueTypeError::InvalidPhoneNumber(format!(
                "phone number must have exactly {} digits, got {}",
                Self::DIGITS,
                phone.len()
            )));
        }

        Ok(())
    }
}

impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneNumber({})", self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

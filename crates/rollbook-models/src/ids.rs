//! Human-readable user identifiers and the namespaces they live in.
//!
//! An identifier has the shape `{SCHOOL_CODE}-{ROLE_CODE}-{SEQUENCE}`, for
//! example `NPS-S-0007`. Sequences are independent per [`Namespace`], that is
//! per `(school, role)` pair.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_models::ids::{Identifier, Namespace, SchoolCode};
//! use rollbook_models::roles::Role;
//!
//! let namespace = Namespace::new(SchoolCode::new("nps")?, Role::Student);
//! assert_eq!(namespace.prefix(), "NPS-S-");
//!
//! let id: Identifier = "NPS-S-0007".parse()?;
//! assert_eq!(id.sequence(), 7);
//! assert_eq!(id.namespace(), &namespace);
//! ```

use crate::roles::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Bound;
use std::str::FromStr;

// ============================================================================
// SchoolCode
// ============================================================================

/// Error type for school code parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchoolCodeError {
    #[error("school code is required")]
    Empty,
    #[error("school code '{0}' must contain only letters and digits")]
    InvalidCharacters(String),
}

/// An uppercase alphanumeric school namespace such as `NPS`.
///
/// Input is trimmed and uppercased on construction, so `"nps"` and `"NPS"`
/// name the same school.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SchoolCode(String);

impl SchoolCode {
    pub fn new(code: impl AsRef<str>) -> Result<Self, SchoolCodeError> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(SchoolCodeError::Empty);
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SchoolCodeError::InvalidCharacters(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SchoolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchoolCode({})", self.0)
    }
}

impl fmt::Display for SchoolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SchoolCode {
    type Err = SchoolCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SchoolCode {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SchoolCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Namespace
// ============================================================================

/// A `(school, role)` pair within which identifier sequences are independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub school_code: SchoolCode,
    pub role: Role,
}

impl Namespace {
    pub fn new(school_code: SchoolCode, role: Role) -> Self {
        Self { school_code, role }
    }

    /// The identifier prefix for this namespace, e.g. `NPS-S-`.
    pub fn prefix(&self) -> String {
        format!("{}-{}-", self.school_code, self.role.code())
    }

    /// Build the identifier with the given sequence number in this namespace.
    pub fn identifier(&self, sequence: u64, width: usize) -> Identifier {
        Identifier::new(self.clone(), sequence, width)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.school_code, self.role.code())
    }
}

// ============================================================================
// Identifier
// ============================================================================

/// Error type for identifier parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("'{0}' is not of the form SCHOOL-R-0000")]
    Malformed(String),
    #[error(transparent)]
    SchoolCode(#[from] SchoolCodeError),
    #[error("unknown role code '{0}'")]
    UnknownRoleCode(String),
    #[error("sequence in '{0}' must be a positive number")]
    InvalidSequence(String),
}

/// A human-readable user identifier, `{SCHOOL}-{ROLE}-{SEQUENCE}`.
///
/// The sequence is rendered zero-padded to `width` digits; numbers that need
/// more digits simply widen the string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    namespace: Namespace,
    sequence: u64,
    width: usize,
}

impl Identifier {
    /// Width used when none is configured.
    pub const DEFAULT_WIDTH: usize = 4;

    pub fn new(namespace: Namespace, sequence: u64, width: usize) -> Self {
        Self {
            namespace,
            sequence,
            width: width.max(1),
        }
    }

    #[inline]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn role(&self) -> Role {
        self.namespace.role
    }

    #[inline]
    pub fn school_code(&self) -> &SchoolCode {
        &self.namespace.school_code
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            self.namespace.prefix(),
            self.sequence,
            width = self.width
        )
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parts: Vec<&str> = s.split('-').collect();
        let [school, role_code, digits] = parts.as_slice() else {
            return Err(IdentifierError::Malformed(s.to_string()));
        };

        let school_code = SchoolCode::new(school)?;

        let mut code_chars = role_code.chars();
        let role = match (code_chars.next(), code_chars.next()) {
            (Some(c), None) => Role::from_code(c),
            _ => None,
        }
        .ok_or_else(|| IdentifierError::UnknownRoleCode(role_code.to_string()))?;

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdentifierError::InvalidSequence(s.to_string()));
        }
        let sequence: u64 = digits
            .parse()
            .map_err(|_| IdentifierError::InvalidSequence(s.to_string()))?;
        if sequence == 0 {
            return Err(IdentifierError::InvalidSequence(s.to_string()));
        }

        Ok(Self::new(
            Namespace::new(school_code, role),
            sequence,
            digits.len(),
        ))
    }
}

impl TryFrom<&str> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> String {
        id.to_string()
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// DirectorySnapshot
// ============================================================================

/// A point-in-time set of identifiers known to the user directory.
///
/// Entries are kept as raw strings: a snapshot may mix namespaces and may
/// contain values that are not well-formed identifiers at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectorySnapshot {
    ids: BTreeSet<String>,
}

impl DirectorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Entries starting with `prefix`, in lexical order.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.ids
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |id| id.starts_with(prefix))
            .map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for DirectorySnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DirectorySnapshot {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

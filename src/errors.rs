//! Error types for identifier allocation and directory access.
//!
//! Validation problems are not errors here: the validation helper returns
//! them as a list of messages so a form can show all of them at once.

use rollbook_models::{RoleError, SchoolCodeError};

/// Failure to reach or use the user directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("directory rejected the request credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("directory returned HTTP {0}")]
    Status(u16),

    #[error("directory returned an unusable response: {0}")]
    Malformed(String),

    #[error("directory returned {identifier}, which is outside namespace {namespace}")]
    OutsideNamespace {
        identifier: String,
        namespace: String,
    },

    #[error("identifier {0} is already registered")]
    Conflict(String),

    #[error("directory has no sequence numbers left in namespace {0}")]
    Exhausted(String),
}

/// Error type for allocation operations.
///
/// Callers treat any of these as fatal to the current allocation attempt and
/// re-prompt; none of them comes with a substitute identifier.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error(transparent)]
    InvalidRole(#[from] RoleError),

    #[error(transparent)]
    InvalidSchoolCode(#[from] SchoolCodeError),

    #[error("no sequence numbers left in namespace {0}")]
    SequenceExhausted(String),

    #[error("user directory unavailable: {0}")]
    DirectoryUnavailable(#[from] DirectoryError),
}

//! Sequential identifier allocation.
//!
//! Two ways to obtain the next identifier for a `(school, role)` namespace:
//!
//! - [`SequentialIdAllocator::allocate_locally`] computes it from a
//!   [`DirectorySnapshot`]. It is a pure function and only promises that the
//!   result is absent from that snapshot. Another administrator working from
//!   an older snapshot can be handed the same identifier, so the result is a
//!   pre-fill suggestion.
//! - [`SequentialIdAllocator::allocate_from_directory`] asks the directory
//!   service for the authoritative next identifier. If the directory cannot
//!   answer, the caller gets [`AllocationError::DirectoryUnavailable`] and no
//!   identifier at all.
//!
//! Either way the identifier stays provisional until the user creation API
//! accepts it.
//!
//! # Sequence rules
//!
//! The next sequence is one more than the highest sequence found under the
//! namespace prefix. Gaps are never filled: with `0001` and `0003` present the
//! next identifier is `0004`. Numbers freed by deletions are not reused.
//!
//! # Example
//!
//! ```ignore
//! use rollbook::allocator::SequentialIdAllocator;
//! use rollbook_models::DirectorySnapshot;
//!
//! let existing: DirectorySnapshot = ["NPS-S-0001", "NPS-S-0002"].into_iter().collect();
//! let id = SequentialIdAllocator::default().allocate("student", "nps", &existing)?;
//! assert_eq!(id.to_string(), "NPS-S-0003");
//! ```

use crate::directory::DirectoryService;
use crate::errors::AllocationError;
use rollbook_config::AllocatorConfig;
use rollbook_models::{DirectorySnapshot, Identifier, Namespace, Role, SchoolCode};
use tracing::{debug, instrument, warn};

/// Parse role and school text into a [`Namespace`].
///
/// # Errors
///
/// Returns [`AllocationError::InvalidRole`] for an empty or unknown role and
/// [`AllocationError::InvalidSchoolCode`] for an empty or non-alphanumeric
/// school code.
pub fn namespace(role: &str, school_code: &str) -> Result<Namespace, AllocationError> {
    let role: Role = role.parse()?;
    let school_code = SchoolCode::new(school_code)?;
    Ok(Namespace::new(school_code, role))
}

/// Computes the lowest unused identifier above the highest known sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialIdAllocator {
    width: usize,
}

impl Default for SequentialIdAllocator {
    fn default() -> Self {
        Self {
            width: Identifier::DEFAULT_WIDTH,
        }
    }
}

impl SequentialIdAllocator {
    /// Allocator padding sequences to `width` digits (at least one).
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }

    pub fn from_config(config: &AllocatorConfig) -> Self {
        Self::new(config.sequence_width)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Allocate from raw role and school text against `existing`.
    pub fn allocate(
        &self,
        role: &str,
        school_code: &str,
        existing: &DirectorySnapshot,
    ) -> Result<Identifier, AllocationError> {
        self.allocate_locally(&namespace(role, school_code)?, existing)
    }

    /// The next identifier in `namespace` that is absent from `existing`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::SequenceExhausted`] if the sequence would
    /// overflow `u64`.
    #[instrument(skip(self, existing), fields(namespace = %namespace, snapshot_size = existing.len()))]
    pub fn allocate_locally(
        &self,
        namespace: &Namespace,
        existing: &DirectorySnapshot,
    ) -> Result<Identifier, AllocationError> {
        let prefix = namespace.prefix();
        let exhausted = || AllocationError::SequenceExhausted(namespace.to_string());

        let max_sequence = existing
            .with_prefix(&prefix)
            .filter_map(|id| parse_sequence(&id[prefix.len()..]))
            .max()
            .unwrap_or(0);

        let mut candidate = max_sequence.checked_add(1).ok_or_else(exhausted)?;
        loop {
            let identifier = namespace.identifier(candidate, self.width);
            if !existing.contains(&identifier.to_string()) {
                debug!(identifier = %identifier, max_sequence, "Proposed identifier");
                return Ok(identifier);
            }
            candidate = candidate.checked_add(1).ok_or_else(exhausted)?;
        }
    }

    /// Ask `directory` for the authoritative next identifier in `namespace`.
    ///
    /// No local value is substituted when the directory fails.
    #[instrument(skip(self, directory), fields(namespace = %namespace))]
    pub async fn allocate_from_directory<D: DirectoryService>(
        &self,
        directory: &D,
        namespace: &Namespace,
    ) -> Result<Identifier, AllocationError> {
        directory.next_identifier(namespace).await.map_err(|e| {
            warn!(error = %e, "Directory could not provide next identifier");
            AllocationError::DirectoryUnavailable(e)
        })
    }

    /// Fetch the namespace's snapshot from `directory` and allocate locally.
    ///
    /// Suitable for pre-filling a form; the result is as provisional as
    /// [`Self::allocate_locally`].
    #[instrument(skip(self, directory), fields(namespace = %namespace))]
    pub async fn prefill_from_directory<D: DirectoryService>(
        &self,
        directory: &D,
        namespace: &Namespace,
    ) -> Result<Identifier, AllocationError> {
        let snapshot = directory.snapshot(namespace).await.map_err(|e| {
            warn!(error = %e, "Directory could not provide a snapshot");
            AllocationError::DirectoryUnavailable(e)
        })?;
        self.allocate_locally(namespace, &snapshot)
    }
}

/// Sequence number of an identifier suffix; `None` for non-numeric or zero suffixes.
fn parse_sequence(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok().filter(|&n| n > 0)
}

//! In-process user directory.
//!
//! Holds the registered identifiers behind a mutex, so [`InMemoryDirectory::reserve`]
//! performs the check-and-reserve step atomically. That is the guarantee a
//! local snapshot cannot give: two callers reserving concurrently always get
//! different identifiers.

use super::DirectoryService;
use crate::allocator::SequentialIdAllocator;
use crate::errors::{AllocationError, DirectoryError};
use rollbook_models::{DirectorySnapshot, Identifier, Namespace};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

/// A cloneable, shared in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    ids: Arc<Mutex<BTreeSet<String>>>,
    allocator: SequentialIdAllocator,
}

impl InMemoryDirectory {
    pub fn new(allocator: SequentialIdAllocator) -> Self {
        Self {
            ids: Arc::default(),
            allocator,
        }
    }

    /// Seed the directory with existing identifiers.
    pub fn with_ids<I, S>(allocator: SequentialIdAllocator, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: Arc::new(Mutex::new(ids.into_iter().map(Into::into).collect())),
            allocator,
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        // The set stays consistent even if a holder panicked.
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an identifier created elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Conflict`] if it is already registered.
    pub fn register(&self, id: &Identifier) -> Result<(), DirectoryError> {
        let id = id.to_string();
        if !self.lock().insert(id.clone()) {
            return Err(DirectoryError::Conflict(id));
        }
        Ok(())
    }

    /// Allocate the next identifier in `namespace` and register it in one step.
    #[instrument(skip(self), fields(namespace = %namespace))]
    pub fn reserve(&self, namespace: &Namespace) -> Result<Identifier, AllocationError> {
        let mut ids = self.lock();
        let snapshot: DirectorySnapshot = ids.iter().map(String::as_str).collect();
        let identifier = self.allocator.allocate_locally(namespace, &snapshot)?;
        ids.insert(identifier.to_string());

        debug!(identifier = %identifier, "Reserved identifier");
        Ok(identifier)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn snapshot_of(&self, namespace: &Namespace) -> DirectorySnapshot {
        let prefix = namespace.prefix();
        self.lock()
            .iter()
            .filter(|id| id.starts_with(&prefix))
            .map(String::as_str)
            .collect()
    }
}

impl DirectoryService for InMemoryDirectory {
    async fn next_identifier(&self, namespace: &Namespace) -> Result<Identifier, DirectoryError> {
        let snapshot = self.snapshot_of(namespace);
        self.allocator
            .allocate_locally(namespace, &snapshot)
            .map_err(|e| match e {
                AllocationError::SequenceExhausted(ns) => DirectoryError::Exhausted(ns),
                other => DirectoryError::Malformed(other.to_string()),
            })
    }

    async fn snapshot(&self, namespace: &Namespace) -> Result<DirectorySnapshot, DirectoryError> {
        Ok(self.snapshot_of(namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_models::{Role, SchoolCode};
    use std::thread;

    fn namespace(role: Role) -> Namespace {
        Namespace::new(SchoolCode::new("NPS").unwrap(), role)
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let directory = InMemoryDirectory::default();
        let id = namespace(Role::Student).identifier(1, 4);

        assert!(directory.register(&id).is_ok());
        assert!(matches!(
            directory.register(&id),
            Err(DirectoryError::Conflict(existing)) if existing == "NPS-S-0001"
        ));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_reserve_advances_sequence() {
        let directory = InMemoryDirectory::with_ids(
            SequentialIdAllocator::default(),
            ["NPS-S-0001", "NPS-T-0009"],
        );

        let first = directory.reserve(&namespace(Role::Student)).unwrap();
        let second = directory.reserve(&namespace(Role::Student)).unwrap();
        let teacher = directory.reserve(&namespace(Role::Teacher)).unwrap();

        assert_eq!(first.to_string(), "NPS-S-0002");
        assert_eq!(second.to_string(), "NPS-S-0003");
        assert_eq!(teacher.to_string(), "NPS-T-0010");
    }

    #[test]
    fn test_concurrent_reservations_are_unique() {
        let directory = InMemoryDirectory::default();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let directory = directory.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|_| directory.reserve(&namespace(Role::Admin)).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|id| id.to_string())
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();

        assert_eq!(total, 200);
        assert_eq!(all.len(), 200);
        assert_eq!(all.last().map(String::as_str), Some("NPS-A-0200"));
    }

    #[tokio::test]
    async fn test_exhausted_namespace_is_reported_as_exhausted() {
        let full = format!("NPS-S-{}", u64::MAX);
        let directory =
            InMemoryDirectory::with_ids(SequentialIdAllocator::default(), [full.as_str()]);

        let result = directory.next_identifier(&namespace(Role::Student)).await;
        assert!(matches!(result, Err(DirectoryError::Exhausted(ns)) if ns == "NPS-S"));
    }

    #[test]
    fn test_snapshot_is_scoped_to_namespace() {
        let directory = InMemoryDirectory::with_ids(
            SequentialIdAllocator::default(),
            ["NPS-S-0001", "NPS-T-0001", "DPS-S-0001"],
        );
        let snapshot = directory.snapshot_of(&namespace(Role::Student));
        assert_eq!(snapshot.iter().collect::<Vec<_>>(), vec!["NPS-S-0001"]);
    }
}

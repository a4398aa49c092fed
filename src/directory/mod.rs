//! The user directory service.
//!
//! The directory is the authority on which identifiers exist. It can either
//! hand out the next identifier for a namespace itself, or return every
//! identifier it knows in that namespace so the caller can compute a
//! candidate locally.
//!
//! - [`http`]: Client for a directory reachable over HTTP
//! - [`memory`]: In-process directory for offline use and tests

pub mod http;
pub mod memory;

use crate::errors::DirectoryError;
use rollbook_models::{DirectorySnapshot, Identifier, Namespace};
use std::future::Future;

pub use http::HttpDirectory;
pub use memory::InMemoryDirectory;

/// Source of truth for existing user identifiers.
pub trait DirectoryService: Send + Sync {
    /// The authoritative next identifier for `namespace`.
    fn next_identifier(
        &self,
        namespace: &Namespace,
    ) -> impl Future<Output = Result<Identifier, DirectoryError>> + Send;

    /// Every identifier currently registered in `namespace`.
    fn snapshot(
        &self,
        namespace: &Namespace,
    ) -> impl Future<Output = Result<DirectorySnapshot, DirectoryError>> + Send;
}

//! # Rollbook
//!
//! Identifier and credential allocation for a school administration
//! front-end. When an administrator creates a student, teacher or admin, this
//! crate proposes the user ID, generates a temporary password and validates
//! the new-user form.
//!
//! ## Overview
//!
//! - **Identifiers**: `{SCHOOL}-{ROLE}-{SEQUENCE}`, e.g. `NPS-S-0007`, unique
//!   per `(school, role)` namespace
//! - **Credentials**: random passwords with at least one lowercase letter,
//!   uppercase letter, digit and symbol
//! - **Validation**: every form problem reported at once, in field order
//! - **Directory**: the external user directory is the authority on which
//!   identifiers exist
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── rollbook-core/     # Credential generation, serde helpers
//! ├── rollbook-config/   # Environment-driven configuration
//! ├── rollbook-models/   # Roles, identifiers, snapshots, form types
//! └── rollbook-cli/      # Administrative command line
//! src/
//! ├── allocator.rs       # Local and directory-backed ID allocation
//! ├── directory/         # Directory service trait, HTTP and in-memory
//! ├── errors.rs          # Allocation and directory errors
//! ├── logging.rs         # tracing-subscriber setup
//! └── validator.rs       # New-user form validation
//! ```
//!
//! ## Guarantees
//!
//! Local allocation only guarantees the identifier is absent from the
//! snapshot it was computed from. Every identifier, local or fetched, is
//! provisional until the user creation API accepts it, and the API's
//! assigned ID and password win over local proposals (see
//! [`rollbook_models::FinalCredentials`]).
//!
//! ## Environment Variables
//!
//! ```bash
//! ROLLBOOK_SEQUENCE_WIDTH=4
//! ROLLBOOK_PASSWORD_LENGTH=8
//! DIRECTORY_URL=http://localhost:5000/api
//! DIRECTORY_TIMEOUT_SECONDS=10
//! DIRECTORY_API_TOKEN=...
//! DIRECTORY_NEXT_ID_PATH=/users/next-id
//! DIRECTORY_IDS_PATH=/users/ids
//! LOG_LEVEL=info
//! LOG_DIR=storage/logs
//! ```

pub mod allocator;
pub mod directory;
pub mod errors;
pub mod logging;
pub mod validator;

// Re-export workspace crates for convenience
pub use rollbook_config;
pub use rollbook_core;
pub use rollbook_models;

pub use allocator::SequentialIdAllocator;
pub use directory::{DirectoryService, HttpDirectory, InMemoryDirectory};
pub use errors::{AllocationError, DirectoryError};
pub use validator::validate;

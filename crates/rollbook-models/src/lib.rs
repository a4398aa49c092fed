//! # Rollbook Models
//!
//! Domain models for identifier and credential allocation.
//!
//! # Modules
//!
//! - [`ids`]: School codes, namespaces, identifiers and directory snapshots
//! - [`roles`]: The student/teacher/admin role enum
//! - [`users`]: New-user form, creation result and final credentials
//! - [`value_types`]: Validated email and phone number newtypes
//!
//! # Example
//!
//! ```ignore
//! use rollbook_models::{DirectorySnapshot, Namespace, Role, SchoolCode};
//!
//! let namespace = Namespace::new(SchoolCode::new("nps")?, "student".parse::<Role>()?);
//! let snapshot: DirectorySnapshot = ["NPS-S-0001", "NPS-S-0002"].into_iter().collect();
//! assert_eq!(snapshot.with_prefix(&namespace.prefix()).count(), 2);
//! ```

pub mod ids;
pub mod roles;
pub mod users;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use ids::{
    DirectorySnapshot, Identifier, IdentifierError, Namespace, SchoolCode, SchoolCodeError,
};
pub use roles::{Role, RoleError};
pub use users::{CreatedUser, FinalCredentials, Gender, UserForm};
pub use value_types::{Email, PhoneNumber, ValueTypeError};

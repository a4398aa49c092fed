//! # Rollbook Config
//!
//! Configuration types for Rollbook, loaded from environment variables.
//!
//! - [`allocator`]: Identifier width and generated password length
//! - [`directory`]: User directory service endpoint, timeout and token
//!
//! # Example
//!
//! ```ignore
//! use rollbook_config::{AllocatorConfig, DirectoryConfig};
//!
//! dotenvy::dotenv().ok();
//! let allocator = AllocatorConfig::from_env();
//! let directory = DirectoryConfig::from_env();
//! ```

pub mod allocator;
pub mod directory;

// Re-export commonly used types at crate root
pub use allocator::AllocatorConfig;
pub use directory::DirectoryConfig;

/// Parse an optional variable, falling back to `default` when it is unset or unparsable.
pub(crate) fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

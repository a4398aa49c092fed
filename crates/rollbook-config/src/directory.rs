//! User directory service connection settings.
//!
//! # Environment Variables
//!
//! - `DIRECTORY_URL`: Base URL of the directory API (default: `http://localhost:5000/api`)
//! - `DIRECTORY_TIMEOUT_SECONDS`: Per-request timeout (default: 10, minimum: 1)
//! - `DIRECTORY_API_TOKEN`: Bearer token sent with each request (optional)
//! - `DIRECTORY_NEXT_ID_PATH`: Next-identifier endpoint, relative to the base
//!   URL (default: `/users/next-id`)
//! - `DIRECTORY_IDS_PATH`: Identifier listing endpoint, relative to the base
//!   URL (default: `/users/ids`)

use crate::parse_or;
use std::time::Duration;

#[derive(Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub api_token: Option<String>,
    pub next_id_path: String,
    pub ids_path: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            timeout: Duration::from_secs(10),
            api_token: None,
            next_id_path: "/users/next-id".to_string(),
            ids_path: "/users/ids".to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Shortest timeout accepted from the environment.
    pub const MIN_TIMEOUT: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let base_url = lookup("DIRECTORY_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            timeout: Duration::from_secs(parse_or(
                lookup("DIRECTORY_TIMEOUT_SECONDS"),
                defaults.timeout.as_secs(),
            ))
            .max(Self::MIN_TIMEOUT),
            api_token: lookup("DIRECTORY_API_TOKEN")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            next_id_path: endpoint_path(lookup("DIRECTORY_NEXT_ID_PATH"))
                .unwrap_or(defaults.next_id_path),
            ids_path: endpoint_path(lookup("DIRECTORY_IDS_PATH")).unwrap_or(defaults.ids_path),
        }
    }

    /// Config pointing at `base_url` with default timeout and no token.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

/// Trimmed path with exactly one leading `/`; `None` when blank.
fn endpoint_path(value: Option<String>) -> Option<String> {
    let path = value?;
    let path = path.trim().trim_start_matches('/');
    (!path.is_empty()).then(|| format!("/{}", path))
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("next_id_path", &self.next_id_path)
            .field("ids_path", &self.ids_path)
            .finish()
    }
}

//! HTTP client for the user directory service.
//!
//! Two read-only endpoints are used, both relative to the configured base URL
//! and both taking `schoolCode` and `role` query parameters. With the default
//! paths:
//!
//! - `GET /users/next-id` answering `{"userId": "NPS-S-0007"}`
//! - `GET /users/ids` answering `{"userIds": ["NPS-S-0001", ...]}`
//!
//! No retries are attempted. Every failure is reported as a [`DirectoryError`]
//! and never replaced with a guessed value.

use super::DirectoryService;
use crate::errors::DirectoryError;
use reqwest::{Client, Response, StatusCode};
use rollbook_config::DirectoryConfig;
use rollbook_models::{DirectorySnapshot, Identifier, Namespace};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NextIdResponse {
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserIdsResponse {
    user_ids: Vec<String>,
}

/// Directory reached over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    next_id_path: String,
    ids_path: String,
}

impl HttpDirectory {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            next_id_path: config.next_id_path.clone(),
            ids_path: config.ids_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        namespace: &Namespace,
    ) -> Result<T, DirectoryError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(&[
            ("schoolCode", namespace.school_code.as_str()),
            ("role", namespace.role.as_str()),
        ]);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Directory request failed");
            DirectoryError::Transport(e)
        })?;

        decode(check_status(response)?).await
    }
}

fn check_status(response: Response) -> Result<Response, DirectoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!(status = status.as_u16(), url = %response.url(), "Directory returned an error status");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(DirectoryError::Unauthorized(status.as_u16()))
        }
        _ => Err(DirectoryError::Status(status.as_u16())),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DirectoryError> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Err(DirectoryError::Malformed("empty response body".into()));
    }
    serde_json::from_str(&body).map_err(|e| DirectoryError::Malformed(e.to_string()))
}

impl DirectoryService for HttpDirectory {
    #[instrument(skip(self), fields(namespace = %namespace))]
    async fn next_identifier(&self, namespace: &Namespace) -> Result<Identifier, DirectoryError> {
        let body: NextIdResponse = self.get(&self.next_id_path, namespace).await?;

        let raw = body
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| DirectoryError::Malformed("missing userId".into()))?;

        let identifier: Identifier = raw
            .parse()
            .map_err(|e| DirectoryError::Malformed(format!("userId '{}': {}", raw, e)))?;

        if identifier.namespace() != namespace {
            return Err(DirectoryError::OutsideNamespace {
                identifier: identifier.to_string(),
                namespace: namespace.to_string(),
            });
        }

        debug!(identifier = %identifier, "Directory assigned next identifier");
        Ok(identifier)
    }

    #[instrument(skip(self), fields(namespace = %namespace))]
    async fn snapshot(&self, namespace: &Namespace) -> Result<DirectorySnapshot, DirectoryError> {
        let body: UserIdsResponse = self.get(&self.ids_path, namespace).await?;
        let snapshot: DirectorySnapshot = body.user_ids.into_iter().collect();

        debug!(size = snapshot.len(), "Fetched directory snapshot");
        Ok(snapshot)
    }
}

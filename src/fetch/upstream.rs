//! Upstream query API abstraction.
//!
//! The fetcher talks to "an API that accepts a query and returns a body"
//! rather than to reqwest directly, so tests can substitute counting or
//! failing fakes. Production uses [`OverpassApi`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::OVERPASS_API;
use crate::error_handling::FetchError;

/// A named upstream that executes structured queries.
#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Rate-limiter name for this upstream.
    fn name(&self) -> &'static str;

    /// Executes a query and returns the raw response body.
    async fn execute(&self, query: &str) -> Result<String, FetchError>;
}

/// The public Overpass interpreter.
pub struct OverpassApi {
    client: Arc<reqwest::Client>,
    endpoint: String,
}

impl OverpassApi {
    pub fn new(client: Arc<reqwest::Client>, endpoint: String) -> Self {
        OverpassApi { client, endpoint }
    }
}

#[async_trait]
impl QueryApi for OverpassApi {
    fn name(&self) -> &'static str {
        OVERPASS_API
    }

    async fn execute(&self, query: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(query.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::StatusError(status));
        }

        Ok(response.text().await?)
    }
}

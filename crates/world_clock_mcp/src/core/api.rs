use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::core::error::{WorldClockError, WorldClockResult};

/// Base URL of the World Time API
pub const BASE_URL: &str = "http://worldtimeapi.org/api";

/// Default timeout applied to each API request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Remote query surface of the World Time API.
///
/// One implementation speaks HTTP; tests substitute canned payloads.
#[async_trait]
pub trait TimeApi: Send + Sync {
    /// Issue a single GET against `{BASE_URL}/{endpoint}` and return the
    /// parsed JSON body. Any status other than 200 is a failure.
    async fn request(&self, endpoint: &str, timeout: Duration) -> WorldClockResult<Value>;
}

/// HTTP client for the World Time API
pub struct WorldTimeApi {
    client: Client,
}

impl WorldTimeApi {
    pub fn new() -> WorldClockResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| WorldClockError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    async fn fetch_json(&self, url: &str, timeout: Duration) -> WorldClockResult<Value> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| WorldClockError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(WorldClockError::ApiStatus {
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| WorldClockError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl TimeApi for WorldTimeApi {
    async fn request(&self, endpoint: &str, timeout: Duration) -> WorldClockResult<Value> {
        let url = format!("{BASE_URL}/{endpoint}");
        self.fetch_json(&url, timeout).await.inspect_err(|e| {
            tracing::error!("Error fetching from {}: {}", url, e);
        })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Canned [`TimeApi`] for handler tests; records every endpoint requested.
    pub(crate) struct MockApi {
        responses: HashMap<String, Value>,
        failures: HashMap<String, u16>,
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        pub(crate) fn new() -> Self {
            Self {
                responses: HashMap::new(),
                failures: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_response(mut self, endpoint: &str, payload: Value) -> Self {
            self.responses.insert(endpoint.to_string(), payload);
            self
        }

        pub(crate) fn with_failure(mut self, endpoint: &str, status: u16) -> Self {
            self.failures.insert(endpoint.to_string(), status);
            self
        }

        /// Endpoints requested so far, in call order.
        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TimeApi for MockApi {
        async fn request(&self, endpoint: &str, _timeout: Duration) -> WorldClockResult<Value> {
            self.calls.lock().unwrap().push(endpoint.to_string());

            if let Some(status) = self.failures.get(endpoint) {
                return Err(WorldClockError::ApiStatus { status: *status });
            }
            self.responses
                .get(endpoint)
                .cloned()
                .ok_or_else(|| WorldClockError::ApiStatus { status: 404 })
        }
    }
}

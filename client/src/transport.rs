//! HTTP transport against the configured backend.
//!
//! # Design
//! Thin wrapper around `reqwest::Client` with JSON in/out and single-attempt
//! semantics: a non-2xx status becomes an `ApiError::Request` with no retry.
//! Replica metadata is recorded from the response headers before the status
//! is evaluated, so the tracker reflects which replica served even a failing
//! request. Getting that ordering right is the point of this module; do not
//! move the `record_from` call below the status check.

use std::sync::Arc;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ApiError;
use crate::replica::ReplicaTracker;

pub struct Transport {
    http: Client,
    base_url: String,
    replicas: Arc<ReplicaTracker>,
}

impl Transport {
    pub fn new(config: &Config, replicas: Arc<ReplicaTracker>) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url().to_string(),
            replicas,
        }
    }

    /// The tracker this transport feeds.
    pub fn replicas(&self) -> &Arc<ReplicaTracker> {
        &self.replicas
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(Method::DELETE, path, None::<&()>).await
    }

    async fn execute<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            // `json` also sets Content-Type: application/json.
            request = request.json(body);
        }

        debug!(%method, path, "issuing request");
        let response = request.send().await.map_err(|source| ApiError::Http {
            endpoint: path.to_string(),
            source,
        })?;

        // Record metadata before looking at the status: a failing response
        // still tells us which replica served it.
        self.replicas.record_from(response.headers());

        let status = response.status();
        if !status.is_success() {
            warn!(path, %status, "request failed");
            return Err(ApiError::Request {
                endpoint: path.to_string(),
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            });
        }

        response.json().await.map_err(|source| ApiError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

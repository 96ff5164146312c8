//! REST client for the workflow engine.
//!
//! Implements the engine's HTTP API for resolving codes and nodes and for
//! submitting calculations. The three calls the adapter makes are all
//! synchronous from its point of view; any queueing or retry behaviour after
//! submission belongs to the engine.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::calculation::YamboCalculation;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::node::{Code, Pk, ProcessNode};

/// Default engine API endpoint for a local deployment.
pub const DEFAULT_URL: &str = "http://localhost:8023/api/v1";

/// REST API client for the workflow engine.
///
/// Authenticates via an optional static Bearer token; unauthenticated access
/// is common for engines bound to localhost.
pub struct RestEngine {
    /// HTTP client with timeouts configured.
    client: Client,
    /// API base URL (without trailing slash).
    base_url: String,
    /// Bearer token for authentication, if the deployment requires one.
    token: Option<String>,
}

impl std::fmt::Debug for RestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestEngine")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RestEngine {
    /// Create a client for the given base URL.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(EngineError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Perform a GET request, returning the deserialized JSON body.
    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> EngineResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("GET {}", url);

        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        self.handle_response(req.send().await?).await
    }

    /// Perform a POST request with a JSON body, returning the deserialized
    /// JSON body.
    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> EngineResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("POST {}", url);

        let mut req = self.client.post(&url).json(body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        self.handle_response(req.send().await?).await
    }

    /// Handle HTTP response: deserialize JSON or map the status to an error.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> EngineResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.json().await?;
            Ok(body)
        } else {
            let message = response.text().await.unwrap_or_default();
            match status {
                StatusCode::UNPROCESSABLE_ENTITY => Err(EngineError::Submission(message)),
                _ => Err(EngineError::Api {
                    status: status.as_u16(),
                    message,
                }),
            }
        }
    }
}

#[async_trait]
impl Engine for RestEngine {
    #[instrument(skip(self))]
    async fn load_code(&self, label: &str) -> EngineResult<Code> {
        debug!("Resolving code '{}'", label);
        match self.get(&format!("codes/{label}")).await {
            Err(EngineError::Api { status: 404, .. }) => {
                Err(EngineError::CodeNotFound(label.to_string()))
            }
            other => other,
        }
    }

    #[instrument(skip(self))]
    async fn load_node(&self, pk: Pk) -> EngineResult<ProcessNode> {
        debug!("Loading node pk={}", pk);
        match self.get(&format!("nodes/{pk}")).await {
            Err(EngineError::Api { status: 404, .. }) => Err(EngineError::NodeNotFound(pk)),
            other => other,
        }
    }

    #[instrument(skip(self, calc))]
    async fn submit(&self, calc: &YamboCalculation) -> EngineResult<Pk> {
        debug!("Submitting YamboCalculation");
        let req = SubmitRequest {
            process_class: "YamboCalculation",
            inputs: calc,
        };
        let resp: SubmitResponse = self.post("processes", &req).await?;
        Ok(resp.pk)
    }
}

/// Request body for `POST /processes`.
#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    /// Process class to instantiate on the engine side.
    process_class: &'static str,
    /// Fully populated calculation inputs.
    inputs: &'a YamboCalculation,
}

/// Response from `POST /processes`.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    /// Pk of the newly created process node.
    pk: Pk,
}

// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` API.

use std::time::Duration;

use roost_core::GatewayError;
use roost_models::ModelId;
use tracing::{debug, warn};

use crate::chat::GeminiChat;
use crate::types::{Content, GenerateRequest, GenerateResponse};

/// Base URL for the Gemini API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// HTTP client for Gemini API communication.
///
/// The API key travels as a `key` query parameter. One retry is performed
/// on 5xx responses.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client with the given per-request timeout.
    pub fn new(api_key: String, request_timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GatewayError::Platform {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            api_key,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL. For tests against a mock server.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Starts a chat session bound to `model` with empty history.
    pub fn start_chat(&self, model: &ModelId) -> GeminiChat {
        GeminiChat::new(self.clone(), model.native().to_string())
    }

    /// Posts the full history to `generateContent` and returns the parsed
    /// response. Errors are mapped into the gateway taxonomy.
    pub(crate) async fn generate(
        &self,
        model_native: &str,
        contents: &[Content],
    ) -> Result<GenerateResponse, GatewayError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, model_native
        );
        let request = GenerateRequest { contents };

        let mut last_unavailable = None;
        for attempt in 0..=1u32 {
            if attempt > 0 {
                warn!(attempt, "retrying gemini request after server error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = match self
                .client
                .post(&url)
                .query(&[("key", self.api_key.as_str())])
                .json(&request)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) if e.is_timeout() => {
                    return Err(GatewayError::ProviderUnavailable("request timed out".into()));
                }
                Err(e) => {
                    return Err(GatewayError::ProviderUnavailable(format!(
                        "connection failed: {e}"
                    )));
                }
            };

            let status = response.status();
            debug!(status = %status, attempt, model = model_native, "gemini response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| {
                    GatewayError::ProviderUnavailable(format!("failed to read body: {e}"))
                })?;
                return serde_json::from_str(&body).map_err(|e| {
                    GatewayError::Transient(format!("malformed gemini response: {e}"))
                });
            }

            let body = response.text().await.unwrap_or_default();
            let err = GatewayError::from_provider_status(status.as_u16(), &body);
            if status.is_server_error() && attempt == 0 {
                last_unavailable = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(last_unavailable
            .unwrap_or_else(|| GatewayError::ProviderUnavailable("retries exhausted".into())))
    }
}

// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions API.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use roost_core::GatewayError;
use roost_models::ModelId;
use tracing::{debug, warn};

use crate::chat::OpenRouterChat;
use crate::types::{ChatMessage, CompletionRequest, CompletionResponse};

/// Base URL for the OpenRouter API.
const API_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// HTTP client for OpenRouter API communication.
///
/// Carries the bearer token plus the optional `HTTP-Referer` and `X-Title`
/// attribution headers as default headers. One retry on 5xx responses.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    /// Creates a new OpenRouter API client.
    pub fn new(
        api_key: &str,
        referer: Option<&str>,
        title: Option<&str>,
        request_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                GatewayError::InternalConfig(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(referer) = referer {
            headers.insert(
                "HTTP-Referer",
                HeaderValue::from_str(referer).map_err(|e| {
                    GatewayError::InternalConfig(format!("invalid referer header value: {e}"))
                })?,
            );
        }
        if let Some(title) = title {
            headers.insert(
                "X-Title",
                HeaderValue::from_str(title).map_err(|e| {
                    GatewayError::InternalConfig(format!("invalid title header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| GatewayError::Platform {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL. For tests against a mock server.
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Starts a chat session bound to `model` with empty history.
    pub fn start_chat(&self, model: &ModelId) -> OpenRouterChat {
        OpenRouterChat::new(self.clone(), model.native().to_string())
    }

    /// Posts one completion request. Errors are mapped into the taxonomy.
    pub(crate) async fn complete(
        &self,
        model_native: &str,
        messages: &[ChatMessage],
    ) -> Result<CompletionResponse, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = CompletionRequest {
            model: model_native,
            messages,
            max_tokens: None,
        };

        let mut last_unavailable = None;
        for attempt in 0..=1u32 {
            if attempt > 0 {
                warn!(attempt, "retrying openrouter request after server error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = match self.client.post(&url).json(&request).send().await {
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
            debug!(status = %status, attempt, model = model_native, "openrouter response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| {
                    GatewayError::ProviderUnavailable(format!("failed to read body: {e}"))
                })?;
                return serde_json::from_str(&body).map_err(|e| {
                    GatewayError::Transient(format!("malformed openrouter response: {e}"))
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

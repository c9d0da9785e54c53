//! Async task API client.

use crate::ApiKeyCache;
use crate::conversion;
use crate::dto::SubmitResponse;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use vermeer_core::{AiModel, GenerationRequest, TaskHandle, TaskSnapshot};
use vermeer_error::{ApiError, ApiErrorKind, ApiResult};
use vermeer_interface::{GenerationClient, ModelCatalog};
use vermeer_settings::ApiConfig;

/// Client for the Novita async task API.
///
/// Every call is a single request with no retry. The bearer token comes from
/// an [`ApiKeyCache`]; without a key the header is omitted.
#[derive(Debug, Clone)]
pub struct NovitaClient {
    client: Client,
    base_url: String,
    api_key: ApiKeyCache,
}

impl NovitaClient {
    /// Creates a client from the API configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all, fields(base_url = %config.base_url))]
    pub fn new(config: &ApiConfig, api_key: ApiKeyCache) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                ApiError::new(ApiErrorKind::Network(format!(
                    "Failed to initialize HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Creates a client against a custom base URL with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_base_url(base_url: impl Into<String>, api_key: ApiKeyCache) -> ApiResult<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::new(&config, api_key)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.api_key.get() {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Sends a request and returns the JSON body of a 2xx response.
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Value> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            ApiError::new(ApiErrorKind::Network(format!("Request failed: {}", e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::new(ApiErrorKind::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            }));
        }

        let bytes = response.bytes().await.map_err(|e| {
            ApiError::new(ApiErrorKind::Network(format!(
                "Failed to read response body: {}",
                e
            )))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::new(ApiErrorKind::Malformed(format!(
                "Response is not valid JSON: {}",
                e
            )))
        })
    }
}

/// Best human-readable message for an error response.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("reason"))
            .or_else(|| v.get("error").and_then(|e| e.get("message").or(Some(e))))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.chars().take(200).collect())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("HTTP error")
                .to_string()
        })
}

#[async_trait]
impl GenerationClient for NovitaClient {
    #[instrument(skip(self, request), fields(modality = %request.modality()))]
    async fn submit(&self, request: &GenerationRequest) -> ApiResult<TaskHandle> {
        let body = conversion::to_request_body(request)?;
        let url = self.url(conversion::endpoint(*request.modality()));
        debug!(url = %url, "Submitting generation task");

        let payload = self.send(self.client.post(&url).json(&body)).await?;
        let response: SubmitResponse = serde_json::from_value(payload).map_err(|e| {
            ApiError::new(ApiErrorKind::Malformed(format!(
                "Failed to parse submission response: {}",
                e
            )))
        })?;

        let handle = conversion::to_task_handle(&response)?;
        info!(task_id = %handle.task_id(), "Task submitted");
        Ok(handle)
    }

    #[instrument(skip(self))]
    async fn fetch_status(&self, task_id: &str) -> ApiResult<TaskSnapshot> {
        if task_id.trim().is_empty() {
            return Err(ApiError::new(ApiErrorKind::InvalidRequest(
                "task id must not be empty".to_string(),
            )));
        }

        let url = self.url(&conversion::status_endpoint(task_id));
        let payload = self.send(self.client.get(&url)).await?;
        let snapshot = conversion::to_snapshot(task_id, payload)?;

        debug!(status = %snapshot.status, progress = ?snapshot.progress, "Fetched task status");
        Ok(snapshot)
    }

    fn provider_name(&self) -> &'static str {
        "novita"
    }
}

#[async_trait]
impl ModelCatalog for NovitaClient {
    #[instrument(skip(self))]
    async fn list_models(&self) -> Vec<AiModel> {
        let fetched = match self.send(self.client.get(self.url("v4/models"))).await {
            Ok(payload) => conversion::to_models(payload),
            Err(e) => Err(e),
        };

        match fetched {
            Ok(models) if !models.is_empty() => {
                debug!(count = models.len(), "Fetched model catalog");
                models
            }
            Ok(_) => {
                warn!("Provider returned an empty model list, using built-in catalog");
                AiModel::fallback_catalog()
            }
            Err(e) => {
                warn!(error = %e, "Model catalog unavailable, using built-in catalog");
                AiModel::fallback_catalog()
            }
        }
    }

    #[instrument(skip(self))]
    async fn verify_credentials(&self) -> ApiResult<bool> {
        match self.send(self.client.get(self.url("v4/user"))).await {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.kind.status(), Some(401) | Some(403)) => {
                debug!(status = ?e.kind.status(), "Credentials rejected");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_message() {
        let msg = error_message(
            StatusCode::UNAUTHORIZED,
            r#"{"code": 401, "message": "invalid api key"}"#,
        );
        assert_eq!(msg, "invalid api key");
    }

    #[test]
    fn test_error_message_nested_and_fallbacks() {
        let nested = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"message": "width out of range"}}"#,
        );
        assert_eq!(nested, "width out of range");

        let text = error_message(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(text, "upstream down");

        let empty = error_message(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(empty, "Service Unavailable");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            NovitaClient::with_base_url("http://localhost:9/", ApiKeyCache::default()).unwrap();
        assert_eq!(client.url("v4/user"), "http://localhost:9/v4/user");
    }
}

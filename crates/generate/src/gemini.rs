use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::config::{API_KEY_ENV, ProxyConfig};
use crate::error::ProxyError;
use crate::proxy::{ContentGenerator, ContentPart, UpstreamRequest};

/// Root of the Generative Language REST API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct GenerateContentBody {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// One user turn: the prompt text, then the image inline as base64.
fn request_body(request: &UpstreamRequest) -> GenerateContentBody {
    GenerateContentBody {
        contents: vec![Content {
            parts: vec![
                Part {
                    text: Some(request.prompt.clone()),
                    inline_data: None,
                },
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: request.mime_type.to_string(),
                        data: STANDARD.encode(&request.image),
                    }),
                },
            ],
        }],
    }
}

/// Parts of the first candidate, in order. Parts with neither text nor image
/// data are skipped.
fn into_parts(response: GenerateContentResponse) -> Result<Vec<ContentPart>, ProxyError> {
    let Some(content) = response.candidates.into_iter().next().and_then(|c| c.content) else {
        return Ok(Vec::new());
    };
    let mut parts = Vec::with_capacity(content.parts.len());
    for part in content.parts {
        if let Some(text) = part.text.filter(|t| !t.is_empty()) {
            parts.push(ContentPart::Text(text));
        } else if let Some(inline) = part.inline_data.filter(|d| !d.data.is_empty()) {
            let bytes = STANDARD
                .decode(inline.data.as_bytes())
                .map_err(|e| ProxyError::Upstream(format!("invalid image data: {e}")))?;
            parts.push(ContentPart::Image(bytes));
        }
    }
    Ok(parts)
}

/// Message of a non-success answer, taken from the API's error body when it
/// has one.
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) => format!("HTTP {status}: {}", e.error.message),
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {status}: {}", body.trim()),
    }
}

/// [`ContentGenerator`] backed by the `generateContent` REST endpoint.
///
/// Runs on `reqwest`'s async client, so it must be polled inside a tokio
/// runtime.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProxyError::Upstream(format!("http client init failed: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Build from the proxy settings. Fails when no key is configured.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let key = config
            .api_key
            .clone()
            .ok_or(ProxyError::MissingConfig(API_KEY_ENV))?;
        Self::new(key)
    }

    /// Swap in a preconfigured client (proxy settings, timeouts).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ContentGenerator for GeminiGenerator {
    async fn generate(&self, request: UpstreamRequest) -> Result<Vec<ContentPart>, ProxyError> {
        let url = self.endpoint(&request.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(&request))
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(format!("request error: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProxyError::Upstream(format!("response read failed: {e}")))?;
        if !status.is_success() {
            return Err(ProxyError::Upstream(error_message(status.as_u16(), &body)));
        }
        tracing::debug!(%status, bytes = body.len(), "upstream answered");

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ProxyError::Upstream(format!("invalid response: {e}")))?;
        into_parts(parsed)
    }
}

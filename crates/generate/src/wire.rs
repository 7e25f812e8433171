use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: Some(image_path.into()),
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResults {
    pub text_parts: Vec<String>,
    /// Public paths of the saved images, e.g. `/generated-1700000000000-0.png`.
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<GenerateResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<GenerateResults, ProxyError>> for GenerateResponse {
    fn from(result: Result<GenerateResults, ProxyError>) -> Self {
        match result {
            Ok(results) => Self {
                success: true,
                results: Some(results),
                error: None,
            },
            Err(e) => Self {
                success: false,
                results: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyStatus {
    pub api_key: bool,
    pub public_path: String,
    pub model: String,
}

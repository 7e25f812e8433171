use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable holding the upstream API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Prompt sent when the request carries none.
pub const DEFAULT_PROMPT: &str =
    "Create a picture of my cat eating a nano-banana in a fancy restaurant under the Gemini constellation";

/// Proxy settings. The API key is never printed by `Debug`.
#[derive(Clone)]
pub struct ProxyConfig {
    pub api_key: Option<String>,
    pub public_dir: PathBuf,
    pub model: String,
    pub default_prompt: String,
}

impl ProxyConfig {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_key: None,
            public_dir: public_dir.into(),
            model: DEFAULT_MODEL.to_string(),
            default_prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Reads the key from [`API_KEY_ENV`]. An empty value counts as unset.
    pub fn from_env(public_dir: impl Into<PathBuf>) -> Self {
        let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self::new(public_dir).with_api_key(key)
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("public_dir", &self.public_dir)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_key() {
        let c = ProxyConfig::new("public").with_api_key(Some("sk-secret".into()));
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn defaults() {
        let c = ProxyConfig::new("public");
        assert_eq!(c.model, DEFAULT_MODEL);
        assert!(!c.has_api_key());
        assert_eq!(c.public_dir(), Path::new("public"));
    }
}

use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::Instrument;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::wire::{GenerateRequest, GenerateResponse, GenerateResults, ProxyStatus};

/// Payload handed to the upstream service: one prompt and one inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub model: String,
    pub prompt: String,
    pub mime_type: &'static str,
    pub image: Vec<u8>,
}

/// One part of the upstream answer. Image bytes arrive already decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image(Vec<u8>),
}

/// The outside AI service.
pub trait ContentGenerator {
    fn generate(
        &self,
        request: UpstreamRequest,
    ) -> impl Future<Output = Result<Vec<ContentPart>, ProxyError>>;
}

/// Stand-in used when no upstream client is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUpstream;

impl ContentGenerator for NoUpstream {
    async fn generate(&self, _request: UpstreamRequest) -> Result<Vec<ContentPart>, ProxyError> {
        Err(ProxyError::MissingConfig("upstream client"))
    }
}

/// `image/jpeg` for `.jpg`/`.jpeg`, `image/png` for everything else.
pub fn mime_for(path: &str) -> &'static str {
    if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else {
        "image/png"
    }
}

pub struct ContentProxy<G> {
    config: ProxyConfig,
    generator: G,
}

impl<G: ContentGenerator> ContentProxy<G> {
    pub fn new(config: ProxyConfig, generator: G) -> Self {
        Self { config, generator }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn status(&self) -> ProxyStatus {
        ProxyStatus {
            api_key: self.config.has_api_key(),
            public_path: self.config.public_dir().display().to_string(),
            model: self.config.model.clone(),
        }
    }

    /// Runs the request and folds any failure into the response body.
    pub async fn handle(&self, request: GenerateRequest) -> GenerateResponse {
        let result = self.generate(request).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, status = e.status_code(), "generate request failed");
        }
        GenerateResponse::from(result)
    }

    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResults, ProxyError> {
        if !self.config.has_api_key() {
            return Err(ProxyError::MissingConfig(crate::config::API_KEY_ENV));
        }
        let image_path = request
            .image_path
            .filter(|p| !p.is_empty())
            .ok_or(ProxyError::MissingImagePath)?;

        let full = self
            .resolve(&image_path)
            .ok_or_else(|| ProxyError::ImageNotFound(image_path.clone()))?;
        let image = std::fs::read(&full).map_err(|source| ProxyError::ReadFailed {
            path: image_path.clone(),
            source,
        })?;

        let upstream = UpstreamRequest {
            model: self.config.model.clone(),
            prompt: request
                .prompt
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| self.config.default_prompt.clone()),
            mime_type: mime_for(&image_path),
            image,
        };
        tracing::info!(
            image = %image_path,
            mime = upstream.mime_type,
            bytes = upstream.image.len(),
            model = %upstream.model,
            "sending generate request"
        );

        let span = tracing::info_span!("upstream", model = %self.config.model);
        let parts = self.generator.generate(upstream).instrument(span).await?;
        self.collect(parts)
    }

    /// Path of an existing file under the public dir. Anything that would
    /// escape the directory is treated as missing.
    fn resolve(&self, image_path: &str) -> Option<PathBuf> {
        let relative = Path::new(image_path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        let full = self.config.public_dir().join(relative);
        full.is_file().then_some(full)
    }

    fn collect(&self, parts: Vec<ContentPart>) -> Result<GenerateResults, ProxyError> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let mut results = GenerateResults::default();
        for part in parts {
            match part {
                ContentPart::Text(text) => results.text_parts.push(text),
                ContentPart::Image(bytes) => {
                    let file = format!("generated-{stamp}-{}.png", results.images.len());
                    std::fs::write(self.config.public_dir().join(&file), &bytes)
                        .map_err(|source| ProxyError::WriteFailed { source })?;
                    tracing::info!(file = %file, bytes = bytes.len(), "saved generated image");
                    results.images.push(format!("/{file}"));
                }
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records what it was sent and answers with fixed parts.
    #[derive(Default)]
    struct Fake {
        seen: RefCell<Option<UpstreamRequest>>,
        fail: bool,
    }

    impl ContentGenerator for Fake {
        async fn generate(&self, request: UpstreamRequest) -> Result<Vec<ContentPart>, ProxyError> {
            *self.seen.borrow_mut() = Some(request);
            if self.fail {
                return Err(ProxyError::Upstream("quota exceeded".into()));
            }
            Ok(vec![
                ContentPart::Text("here you go".into()),
                ContentPart::Image(vec![1, 2, 3]),
                ContentPart::Image(vec![4, 5]),
            ])
        }
    }

    fn setup(fail: bool) -> (tempfile::TempDir, ContentProxy<Fake>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cat.jpg"), b"jpeg bytes").unwrap();
        let config = ProxyConfig::new(dir.path()).with_api_key(Some("key".into()));
        let fake = Fake {
            fail,
            ..Fake::default()
        };
        (dir, ContentProxy::new(config, fake))
    }

    #[test]
    fn success_collects_text_and_saves_images() {
        let (dir, proxy) = setup(false);
        let results = pollster::block_on(proxy.generate(GenerateRequest::new("/cat.jpg"))).unwrap();

        assert_eq!(results.text_parts, vec!["here you go".to_string()]);
        assert_eq!(results.images.len(), 2);
        for (i, path) in results.images.iter().enumerate() {
            assert!(path.starts_with("/generated-"));
            assert!(path.ends_with(&format!("-{i}.png")));
            assert!(dir.path().join(path.trim_start_matches('/')).is_file());
        }

        let seen = proxy.generator.seen.borrow().clone().unwrap();
        assert_eq!(seen.mime_type, "image/jpeg");
        assert_eq!(seen.image, b"jpeg bytes");
        assert_eq!(seen.prompt, crate::config::DEFAULT_PROMPT);
        assert_eq!(seen.model, crate::config::DEFAULT_MODEL);
    }

    #[test]
    fn custom_prompt_is_forwarded() {
        let (_dir, proxy) = setup(false);
        pollster::block_on(proxy.generate(GenerateRequest::new("cat.jpg").with_prompt("a hat"))).unwrap();
        assert_eq!(proxy.generator.seen.borrow().as_ref().unwrap().prompt, "a hat");
    }

    #[test]
    fn missing_key_is_reported_first() {
        let (dir, _) = setup(false);
        let proxy = ContentProxy::new(ProxyConfig::new(dir.path()), Fake::default());
        let err = pollster::block_on(proxy.generate(GenerateRequest::default())).unwrap_err();
        assert!(matches!(err, ProxyError::MissingConfig(_)));
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "GEMINI_API_KEY not configured");
    }

    #[test]
    fn missing_image_path() {
        let (_dir, proxy) = setup(false);
        let err = pollster::block_on(proxy.generate(GenerateRequest::default())).unwrap_err();
        assert!(matches!(err, ProxyError::MissingImagePath));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn unknown_or_escaping_paths_are_not_found() {
        let (_dir, proxy) = setup(false);
        for p in ["dog.png", "../cat.jpg", "/../../etc/passwd"] {
            let err = pollster::block_on(proxy.generate(GenerateRequest::new(p))).unwrap_err();
            assert!(matches!(err, ProxyError::ImageNotFound(_)), "{p}");
            assert_eq!(err.status_code(), 404);
        }
        assert!(proxy.generator.seen.borrow().is_none());
    }

    #[test]
    fn upstream_failure_becomes_error_response() {
        let (_dir, proxy) = setup(true);
        let resp = pollster::block_on(proxy.handle(GenerateRequest::new("cat.jpg")));
        assert!(!resp.success);
        assert!(resp.results.is_none());
        assert_eq!(resp.error.as_deref(), Some("Failed to generate content: quota exceeded"));
    }

    #[test]
    fn no_upstream_reports_configuration() {
        let (dir, _) = setup(false);
        let config = ProxyConfig::new(dir.path()).with_api_key(Some("key".into()));
        let proxy = ContentProxy::new(config, NoUpstream);
        let resp = pollster::block_on(proxy.handle(GenerateRequest::new("cat.jpg")));
        assert_eq!(resp.error.as_deref(), Some("upstream client not configured"));
    }

    #[test]
    fn mime_detection() {
        assert_eq!(mime_for("a.jpg"), "image/jpeg");
        assert_eq!(mime_for("a.jpeg"), "image/jpeg");
        assert_eq!(mime_for("a.png"), "image/png");
        assert_eq!(mime_for("a.webp"), "image/png");
    }

    #[test]
    fn status_reports_key_and_model() {
        let (dir, proxy) = setup(false);
        let s = proxy.status();
        assert!(s.api_key);
        assert_eq!(s.public_path, dir.path().display().to_string());
        assert_eq!(s.model, crate::config::DEFAULT_MODEL);
    }
}

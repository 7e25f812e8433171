/// Failures surfaced to the caller of the proxy, one message per mode.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("{0} not configured")]
    MissingConfig(&'static str),
    #[error("Image path is required")]
    MissingImagePath,
    #[error("Image file not found: {0}")]
    ImageNotFound(String),
    #[error("Failed to read image file: {path}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to save generated image: {source}")]
    WriteFailed {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to generate content: {0}")]
    Upstream(String),
}

impl ProxyError {
    /// HTTP status a web front end should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingConfig(_) | ProxyError::WriteFailed { .. } => 500,
            ProxyError::MissingImagePath | ProxyError::ReadFailed { .. } => 400,
            ProxyError::ImageNotFound(_) => 404,
            ProxyError::Upstream(_) => 502,
        }
    }
}

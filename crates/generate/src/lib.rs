//! Forwards an image and a prompt to an outside generative service and
//! stores the images it returns.
//!
//! The service sits behind [`ContentGenerator`]. [`GeminiGenerator`] talks
//! to the `generateContent` REST endpoint; tests and hosts can plug in
//! their own.

mod config;
mod error;
mod gemini;
mod proxy;
mod wire;

pub use config::{API_KEY_ENV, DEFAULT_MODEL, DEFAULT_PROMPT, ProxyConfig};
pub use error::ProxyError;
pub use gemini::{GEMINI_API_BASE, GeminiGenerator};
pub use proxy::{ContentGenerator, ContentPart, ContentProxy, NoUpstream, UpstreamRequest, mime_for};
pub use wire::{GenerateRequest, GenerateResponse, GenerateResults, ProxyStatus};

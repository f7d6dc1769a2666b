//! Article content: generation, fallbacks and publishing
//!
//! - [`ContentGenerator`] wraps the AI text service; [`GeminiGenerator`]
//!   (feature `client`) is the HTTP adapter and [`MockContentGenerator`]
//!   the test double
//! - [`placeholder`] builds the deterministic markdown used whenever
//!   generation is unavailable
//! - [`ArticlePublisher`] persists an article, stamps ticker coverage and
//!   invalidates downstream caches through a [`CacheInvalidator`]
//!
//! # Feature Flags
//!
//! - `client` - Enable the Gemini generator and the HTTP revalidate webhook

pub mod error;
pub mod generator;
#[cfg(feature = "client")]
pub mod gemini;
pub mod invalidate;
pub mod placeholder;
pub mod prompts;
pub mod publisher;
pub mod request;

pub use error::{ContentError, Result};
pub use generator::{ContentGenerator, MockContentGenerator};
#[cfg(feature = "client")]
pub use gemini::GeminiGenerator;
#[cfg(feature = "client")]
pub use invalidate::HttpRevalidator;
pub use invalidate::{invalidation_paths, CacheInvalidator, NoopInvalidator, RecordingInvalidator};
pub use publisher::ArticlePublisher;
pub use request::{GeneratedContent, GenerationRequest, MacroTopic};

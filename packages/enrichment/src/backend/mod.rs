//! Concrete generation backends. Feature-gated so the core pipeline
//! stays dependency-light for tests and alternative providers.

pub mod gemini;

pub use gemini::GeminiBackend;

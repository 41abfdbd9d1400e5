//! Generative text providers for stockdash
//!
//! This crate provides a provider-agnostic way to send a text prompt to a
//! hosted language model and read back its text answer. It includes:
//!
//! - Message and completion request/response types
//! - The [`LLMProvider`] trait implemented by every backend
//! - Concrete providers (behind feature flags): Google Gemini and
//!   OpenAI-compatible chat completion endpoints

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, FinishReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "gemini", feature = "openai"))]
pub mod providers;

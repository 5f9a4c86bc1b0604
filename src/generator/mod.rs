//! Generative text capability
//!
//! The narrative critique only needs `generate(prompt) -> text`.
//! Gemini is the production backend; `MockGenerator` keeps the
//! pipeline testable without network access.

use crate::error::AnalysisError;
use crate::Result;
use async_trait::async_trait;
use std::sync::Mutex;

pub mod gemini;
pub use gemini::GeminiClient;

/// Trait for text generation backends
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a single prompt and return the raw response text
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Canned generator for development & testing
pub struct MockGenerator {
    response: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.response
            .clone()
            .map_err(AnalysisError::ServiceError)
    }
}

//! Forecast and comparison orchestration
//!
//! Each orchestrator computes indicators locally, renders a prompt, asks
//! the text generator for a JSON object and merges the computed figures
//! into whatever the model returned.

pub mod comparison;
pub mod forecast;
pub mod json;
pub mod result;

pub use comparison::{ComparisonOrchestrator, validate_pair};
pub use forecast::ForecastOrchestrator;
pub use json::extract_json_object;
pub use result::{ComparedStocks, ComparisonResult, ForecastResult, StockDetail};

use crate::config::InsightConfig;
use crate::error::Result;
use crate::prompts::ANALYST_SYSTEM;
use serde_json::{Map, Value};
use std::sync::Arc;
use stockdash_llm::{CompletionRequest, FinishReason, LLMProvider, Message};
use tracing::{debug, warn};

/// Text generator bound to a model and output limits
#[derive(Clone)]
pub struct TextGeneration {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
    temperature: Option<f32>,
}

impl TextGeneration {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &InsightConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Send one prompt and return the raw text answer
    pub async fn generate(&self, prompt: String) -> Result<String> {
        let mut request = CompletionRequest::builder(&self.model)
            .system(ANALYST_SYSTEM)
            .add_message(Message::user(prompt))
            .max_tokens(self.max_tokens);
        if let Some(temperature) = self.temperature {
            request = request.temperature(temperature);
        }

        let response = self.provider.complete(request.build()).await?;

        if response.finish_reason == FinishReason::MaxTokens {
            warn!(
                provider = self.provider.name(),
                model = %self.model,
                "Generation stopped at the token limit, output may be truncated"
            );
        }
        if let Some(usage) = response.usage {
            debug!(tokens = usage.total(), "Generation finished");
        }

        Ok(response.text)
    }

    /// Send one prompt and extract the JSON object from the answer
    pub async fn generate_object(
        &self,
        prompt: String,
        stage: &'static str,
    ) -> Result<Map<String, Value>> {
        let text = self.generate(prompt).await?;
        extract_json_object(&text, stage)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use stockdash_llm::{
        CompletionRequest, CompletionResponse, FinishReason, LLMError, LLMProvider,
    };

    /// Generator that answers every request with a fixed reply
    pub struct ScriptedGenerator {
        reply: Result<String, String>,
        pub prompts: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedGenerator {
        pub fn replying(text: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub fn failing(message: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        pub fn last_prompt(&self) -> String {
            let prompts = self.prompts.lock().unwrap();
            prompts
                .last()
                .and_then(|r| r.messages.last())
                .map(|m| m.text.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedGenerator {
        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> stockdash_llm::Result<CompletionResponse> {
            self.prompts.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(CompletionResponse {
                    text: text.clone(),
                    finish_reason: FinishReason::Stop,
                    usage: None,
                }),
                Err(message) => Err(LLMError::RequestFailed(message.clone())),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }
}

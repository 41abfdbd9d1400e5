//! Configuration for forecast and comparison operations

use crate::engine::{TiePolicy, WindowPolicy};
use crate::error::{DashError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use stockdash_llm::LLMProvider;
use stockdash_llm::providers::{GeminiConfig, GeminiProvider, OpenAIConfig, OpenAIProvider};

/// Text generation backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini (default)
    #[default]
    Gemini,
    /// OpenAI or any OpenAI-compatible endpoint
    OpenAI,
}

impl ProviderKind {
    /// Environment variable holding the API key for this provider
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAI),
            other => Err(DashError::Configuration(format!(
                "Unknown LLM provider '{other}', expected 'gemini' or 'openai'"
            ))),
        }
    }
}

/// Configuration for insight generation
#[derive(Clone)]
pub struct InsightConfig {
    /// Text generation backend
    pub provider: ProviderKind,

    /// Model identifier passed to the provider
    pub model: String,

    /// API key; without it forecasts and comparisons are refused
    pub api_key: Option<String>,

    /// Override for the provider base URL
    pub api_base: Option<String>,

    /// Output token budget per generation
    pub max_tokens: usize,

    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,

    /// Transport timeout for generation calls
    pub request_timeout: Duration,

    /// Calendar days of history fed to the forecast
    pub forecast_lookback_days: i64,

    /// Calendar days of history for charts and comparisons
    pub history_lookback_days: i64,

    /// Forecast horizon used when the caller gives none
    pub default_forecast_period: u32,

    /// Largest accepted forecast horizon
    pub max_forecast_period: u32,

    /// How exact ties are reported in comparison winners
    pub tie_policy: TiePolicy,

    /// How short series are averaged in fixed windows
    pub window_policy: WindowPolicy,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            api_base: None,
            max_tokens: 4096,
            temperature: None,
            request_timeout: Duration::from_secs(120),
            forecast_lookback_days: 30,
            history_lookback_days: 365,
            default_forecast_period: 7,
            max_forecast_period: 90,
            tie_policy: TiePolicy::default(),
            window_policy: WindowPolicy::default(),
        }
    }
}

impl fmt::Debug for InsightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base", &self.api_base)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .field("forecast_lookback_days", &self.forecast_lookback_days)
            .field("history_lookback_days", &self.history_lookback_days)
            .field("default_forecast_period", &self.default_forecast_period)
            .field("max_forecast_period", &self.max_forecast_period)
            .field("tie_policy", &self.tie_policy)
            .field("window_policy", &self.window_policy)
            .finish()
    }
}

impl InsightConfig {
    /// Create a new configuration builder
    pub fn builder() -> InsightConfigBuilder {
        InsightConfigBuilder::default()
    }

    /// Overlay settings from the environment
    ///
    /// Reads `LLM_PROVIDER`, `LLM_MODEL`, `LLM_API_BASE`, the provider's
    /// API key variable, `STOCKDASH_TIE_POLICY` and `STOCKDASH_WINDOW_POLICY`.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(provider) = env_var("LLM_PROVIDER") {
            self.provider = provider.parse()?;
            if self.provider == ProviderKind::OpenAI && self.model.starts_with("gemini") {
                self.model = "gpt-4o-mini".to_string();
            }
        }
        if let Some(model) = env_var("LLM_MODEL") {
            self.model = model;
        }
        if let Some(base) = env_var("LLM_API_BASE") {
            self.api_base = Some(base);
        }
        if let Some(key) = env_var(self.provider.api_key_var()) {
            self.api_key = Some(key);
        }
        if let Some(policy) = env_var("STOCKDASH_TIE_POLICY") {
            self.tie_policy = policy.parse()?;
        }
        if let Some(policy) = env_var("STOCKDASH_WINDOW_POLICY") {
            self.window_policy = policy.parse()?;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(DashError::Configuration("model must not be empty".to_string()));
        }

        if self.max_tokens == 0 {
            return Err(DashError::Configuration(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.forecast_lookback_days <= 0 || self.history_lookback_days <= 0 {
            return Err(DashError::Configuration(
                "lookback windows must be positive".to_string(),
            ));
        }

        if self.max_forecast_period == 0
            || self.default_forecast_period == 0
            || self.default_forecast_period > self.max_forecast_period
        {
            return Err(DashError::Configuration(format!(
                "default forecast period {} must be within 1..={}",
                self.default_forecast_period, self.max_forecast_period
            )));
        }

        Ok(())
    }

    /// Build the configured text generator
    ///
    /// Returns `Ok(None)` when no API key is configured; requests that need
    /// generation then fail with a configuration error.
    pub fn text_generator(&self) -> Result<Option<Arc<dyn LLMProvider>>> {
        let Some(api_key) = self.api_key.clone() else {
            return Ok(None);
        };
        let timeout = self.request_timeout.as_secs();

        let provider: Arc<dyn LLMProvider> = match self.provider {
            ProviderKind::Gemini => {
                let mut config = GeminiConfig::new(api_key).with_timeout(timeout);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base.clone());
                }
                Arc::new(GeminiProvider::with_config(config)?)
            }
            ProviderKind::OpenAI => {
                let mut config = OpenAIConfig::new(api_key).with_timeout(timeout);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base.clone());
                }
                Arc::new(OpenAIProvider::with_config(config)?)
            }
        };

        Ok(Some(provider))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Builder for InsightConfig
#[derive(Debug, Default)]
pub struct InsightConfigBuilder {
    provider: Option<ProviderKind>,
    model: Option<String>,
    api_key: Option<String>,
    api_base: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    request_timeout: Option<Duration>,
    forecast_lookback_days: Option<i64>,
    history_lookback_days: Option<i64>,
    default_forecast_period: Option<u32>,
    max_forecast_period: Option<u32>,
    tie_policy: Option<TiePolicy>,
    window_policy: Option<WindowPolicy>,
}

impl InsightConfigBuilder {
    /// Set the text generation backend
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the provider base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the output token budget
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the generation timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the forecast lookback window in days
    pub fn forecast_lookback_days(mut self, days: i64) -> Self {
        self.forecast_lookback_days = Some(days);
        self
    }

    /// Set the history lookback window in days
    pub fn history_lookback_days(mut self, days: i64) -> Self {
        self.history_lookback_days = Some(days);
        self
    }

    /// Set the default forecast horizon
    pub fn default_forecast_period(mut self, days: u32) -> Self {
        self.default_forecast_period = Some(days);
        self
    }

    /// Set the largest accepted forecast horizon
    pub fn max_forecast_period(mut self, days: u32) -> Self {
        self.max_forecast_period = Some(days);
        self
    }

    /// Set the tie policy for comparison winners
    pub fn tie_policy(mut self, policy: TiePolicy) -> Self {
        self.tie_policy = Some(policy);
        self
    }

    /// Set the short-window averaging policy
    pub fn window_policy(mut self, policy: WindowPolicy) -> Self {
        self.window_policy = Some(policy);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<InsightConfig> {
        let defaults = InsightConfig::default();

        let config = InsightConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            model: self.model.unwrap_or(defaults.model),
            api_key: self.api_key,
            api_base: self.api_base,
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.or(defaults.temperature),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            forecast_lookback_days: self
                .forecast_lookback_days
                .unwrap_or(defaults.forecast_lookback_days),
            history_lookback_days: self
                .history_lookback_days
                .unwrap_or(defaults.history_lookback_days),
            default_forecast_period: self
                .default_forecast_period
                .unwrap_or(defaults.default_forecast_period),
            max_forecast_period: self
                .max_forecast_period
                .unwrap_or(defaults.max_forecast_period),
            tie_policy: self.tie_policy.unwrap_or(defaults.tie_policy),
            window_policy: self.window_policy.unwrap_or(defaults.window_policy),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InsightConfig::default();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.default_forecast_period, 7);
        assert_eq!(config.forecast_lookback_days, 30);
        assert_eq!(config.tie_policy, TiePolicy::SecondWins);
        assert_eq!(config.window_policy, WindowPolicy::ActualCount);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = InsightConfig::builder()
            .provider(ProviderKind::OpenAI)
            .model("gpt-4o-mini")
            .max_forecast_period(30)
            .tie_policy(TiePolicy::ReportTie)
            .build()
            .unwrap();

        assert_eq!(config.provider, ProviderKind::OpenAI);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_forecast_period, 30);
        assert_eq!(config.tie_policy, TiePolicy::ReportTie);
    }

    #[test]
    fn test_validation_default_period_out_of_range() {
        let result = InsightConfig::builder()
            .default_forecast_period(40)
            .max_forecast_period(30)
            .build();
        assert!(matches!(result, Err(DashError::Configuration(_))));
    }

    #[test]
    fn test_validation_empty_model() {
        let config = InsightConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" openai ".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert!("claude".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_text_generator_requires_key() {
        let config = InsightConfig::default();
        assert!(config.text_generator().unwrap().is_none());

        let config = InsightConfig::builder().api_key("test-key").build().unwrap();
        let generator = config.text_generator().unwrap().unwrap();
        assert_eq!(generator.name(), "gemini");

        let config = InsightConfig::builder()
            .provider(ProviderKind::OpenAI)
            .model("gpt-4o-mini")
            .api_key("test-key")
            .api_base("http://localhost:1234/v1")
            .build()
            .unwrap();
        assert_eq!(config.text_generator().unwrap().unwrap().name(), "openai");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = InsightConfig::builder().api_key("super-secret").build().unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}

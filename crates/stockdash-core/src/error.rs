//! Error types for stockdash operations

use thiserror::Error;

/// Stock insight errors
///
/// Indicator and comparison math never produces an error; only I/O,
/// parsing and caller input can fail.
#[derive(Debug, Error)]
pub enum DashError {
    /// The market-data source returned no points for the symbol
    #[error("No historical data found for {symbol}")]
    NoData { symbol: String },

    /// The text generator answered without a parseable JSON object
    #[error("Failed to parse AI response during {stage}")]
    UpstreamParse {
        /// Which orchestration step was parsing (`forecast`, `comparison`)
        stage: &'static str,
        /// Full model output, kept for diagnosis
        raw: String,
    },

    /// Caller supplied missing or contradictory input
    #[error("{0}")]
    InvalidInput(String),

    /// No text generator is configured, or configuration is inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Market-data provider failure
    #[error("Market data error for {symbol}: {reason}")]
    MarketData { symbol: String, reason: String },

    /// Text generation call failed
    #[error("Text generation failed: {0}")]
    Generation(#[from] stockdash_llm::LLMError),

    /// Company directory failure
    #[error("Company directory error: {0}")]
    Directory(#[from] sqlx::Error),

    /// Prompt template failed to render
    #[error("Prompt template error: {0}")]
    Template(#[from] minijinja::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for stockdash operations
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Raw model output for parse failures
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::UpstreamParse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashError::NoData {
            symbol: "AAPL".to_string(),
        };
        assert_eq!(err.to_string(), "No historical data found for AAPL");

        let err = DashError::InvalidInput("Cannot compare the same stock".to_string());
        assert_eq!(err.to_string(), "Cannot compare the same stock");
    }

    #[test]
    fn test_raw_response() {
        let err = DashError::UpstreamParse {
            stage: "forecast",
            raw: "I cannot help with that".to_string(),
        };
        assert_eq!(err.raw_response(), Some("I cannot help with that"));
        assert_eq!(err.to_string(), "Failed to parse AI response during forecast");

        let err = DashError::Configuration("missing key".to_string());
        assert!(err.raw_response().is_none());
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: DashError = stockdash_llm::LLMError::AuthenticationFailed.into();
        assert!(matches!(err, DashError::Generation(_)));
        assert!(err.to_string().contains("authentication failed"));
    }
}

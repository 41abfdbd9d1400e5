//! Forecast and comparison payloads
//!
//! The model-produced object is kept open and merged with locally computed
//! fields. Computed fields always replace model keys of the same name.

use crate::engine::{ComparisonMetrics, CrossComparisonWinners, IndicatorSnapshot};
use crate::models::CompanyProfile;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

pub const FORECAST_DISCLAIMER: &str =
    "This forecast is for educational purposes only and should not be considered financial advice.";

pub const COMPARISON_DISCLAIMER: &str = "This comparison is for educational purposes only and should not be considered financial advice.";

const FORECAST_KEYS: [&str; 6] = [
    "symbol",
    "period",
    "currentPrice",
    "technicalIndicators",
    "generatedAt",
    "disclaimer",
];

const COMPARISON_KEYS: [&str; 4] = ["stocks", "comparisonMetrics", "generatedAt", "disclaimer"];

fn without_keys(mut object: Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    for key in keys {
        object.remove(*key);
    }
    object
}

/// Model forecast merged with the indicators it was based on
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    #[serde(flatten)]
    pub model_output: Map<String, Value>,
    pub symbol: String,
    pub period: u32,
    pub current_price: f64,
    pub technical_indicators: IndicatorSnapshot,
    pub generated_at: DateTime<Utc>,
    pub disclaimer: &'static str,
}

impl ForecastResult {
    pub fn new(
        model_output: Map<String, Value>,
        symbol: impl Into<String>,
        period: u32,
        indicators: IndicatorSnapshot,
    ) -> Self {
        Self {
            model_output: without_keys(model_output, &FORECAST_KEYS),
            symbol: symbol.into(),
            period,
            current_price: indicators.current_price,
            technical_indicators: indicators,
            generated_at: Utc::now(),
            disclaimer: FORECAST_DISCLAIMER,
        }
    }

    /// Number of `chartData` entries the model produced, if any
    pub fn chart_points(&self) -> Option<usize> {
        self.model_output
            .get("chartData")
            .and_then(Value::as_array)
            .map(Vec::len)
    }
}

/// Computed figures for one side of a comparison
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub indicators: IndicatorSnapshot,
    pub year_return: f64,
    pub max_drawdown: f64,
}

impl StockDetail {
    pub fn new(
        symbol: impl Into<String>,
        profile: CompanyProfile,
        indicators: IndicatorSnapshot,
        metrics: ComparisonMetrics,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: profile.name,
            sector: profile.sector,
            indicators,
            year_return: metrics.year_return,
            max_drawdown: metrics.max_drawdown,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparedStocks {
    pub stock1: StockDetail,
    pub stock2: StockDetail,
}

/// Model comparison merged with both stocks' figures and the winners
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    #[serde(flatten)]
    pub model_output: Map<String, Value>,
    pub stocks: ComparedStocks,
    pub comparison_metrics: CrossComparisonWinners,
    pub generated_at: DateTime<Utc>,
    pub disclaimer: &'static str,
}

impl ComparisonResult {
    pub fn new(
        model_output: Map<String, Value>,
        stocks: ComparedStocks,
        winners: CrossComparisonWinners,
    ) -> Self {
        Self {
            model_output: without_keys(model_output, &COMPARISON_KEYS),
            stocks,
            comparison_metrics: winners,
            generated_at: Utc::now(),
            disclaimer: COMPARISON_DISCLAIMER,
        }
    }
}

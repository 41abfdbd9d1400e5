//! Prompt templates for forecasts and comparisons
//!
//! Templates are MiniJinja sources rendered from serializable context
//! structs:
//! - `system`: the analyst system instruction and the template sources
//! - [`ForecastPrompt`] and [`ComparisonPrompt`]: render contexts

mod system;

pub use system::{ANALYST_SYSTEM, COMPARISON_TEMPLATE, FORECAST_TEMPLATE};

use crate::engine::{ComparisonMetrics, IndicatorSnapshot};
use crate::error::Result;
use crate::models::{CompanyProfile, TimeSeriesPoint};
use minijinja::Environment;
use serde::Serialize;

/// Number of trailing closes quoted in the forecast prompt
pub const RECENT_PRICE_POINTS: usize = 10;

/// One quoted close
#[derive(Debug, Clone, Serialize)]
pub struct QuotedClose {
    pub date: String,
    pub close: String,
}

impl From<&TimeSeriesPoint> for QuotedClose {
    fn from(point: &TimeSeriesPoint) -> Self {
        Self {
            date: point.date.format("%a %b %d %Y").to_string(),
            close: format!("{:.2}", point.close),
        }
    }
}

/// Render context for the forecast prompt
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPrompt<'a> {
    pub symbol: &'a str,
    pub period: u32,
    pub indicators: &'a IndicatorSnapshot,
    pub recent: Vec<QuotedClose>,
}

impl<'a> ForecastPrompt<'a> {
    pub fn new(
        symbol: &'a str,
        period: u32,
        indicators: &'a IndicatorSnapshot,
        series: &[TimeSeriesPoint],
    ) -> Self {
        let start = series.len().saturating_sub(RECENT_PRICE_POINTS);
        Self {
            symbol,
            period,
            indicators,
            recent: series[start..].iter().map(QuotedClose::from).collect(),
        }
    }

    pub fn render(&self) -> Result<String> {
        render(FORECAST_TEMPLATE, self)
    }
}

/// Per-stock block of the comparison prompt
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockBrief<'a> {
    pub symbol: &'a str,
    pub name: &'a str,
    pub sector: &'a str,
    pub indicators: &'a IndicatorSnapshot,
    pub year_return: String,
    pub max_drawdown: String,
}

impl<'a> StockBrief<'a> {
    pub fn new(
        symbol: &'a str,
        profile: &'a CompanyProfile,
        indicators: &'a IndicatorSnapshot,
        metrics: &ComparisonMetrics,
    ) -> Self {
        Self {
            symbol,
            name: &profile.name,
            sector: &profile.sector,
            indicators,
            year_return: format!("{:.2}", metrics.year_return),
            max_drawdown: format!("{:.2}", metrics.max_drawdown),
        }
    }
}

/// Render context for the comparison prompt
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonPrompt<'a> {
    pub stocks: [StockBrief<'a>; 2],
}

impl<'a> ComparisonPrompt<'a> {
    pub fn new(first: StockBrief<'a>, second: StockBrief<'a>) -> Self {
        Self {
            stocks: [first, second],
        }
    }

    pub fn render(&self) -> Result<String> {
        render(COMPARISON_TEMPLATE, self)
    }
}

fn render<S: Serialize>(template: &str, context: &S) -> Result<String> {
    let env = Environment::new();
    let value = minijinja::Value::from_serialize(context);
    Ok(env.render_str(template, value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_indicators;
    use crate::models::fixtures::series_from_closes;

    #[test]
    fn test_forecast_prompt_embeds_data() {
        let closes: Vec<f64> = (0..15_i32).map(|i| 100.0 + f64::from(i)).collect();
        let series = series_from_closes(&closes);
        let indicators = compute_indicators(&series);

        let prompt = ForecastPrompt::new("AAPL", 14, &indicators, &series)
            .render()
            .unwrap();

        assert!(prompt.contains("forecast for AAPL"));
        assert!(prompt.contains("Generate exactly 14 days"));
        assert!(prompt.contains("RSI: 100"));
        assert!(prompt.contains("Support Level: $"));
        assert!(prompt.contains("\"chartData\""));
        // only the last ten closes are quoted
        assert!(prompt.contains("$114.00"));
        assert!(prompt.contains("$105.00"));
        assert!(!prompt.contains("$104.00"));
    }

    #[test]
    fn test_forecast_prompt_short_series() {
        let series = series_from_closes(&[10.0, 11.0]);
        let indicators = compute_indicators(&series);
        let prompt = ForecastPrompt::new("X", 7, &indicators, &series);
        assert_eq!(prompt.recent.len(), 2);
        assert_eq!(prompt.recent[0].date, "Tue Jan 02 2024");
        assert_eq!(prompt.recent[1].close, "11.00");
    }

    #[test]
    fn test_comparison_prompt_embeds_both_stocks() {
        let series = series_from_closes(&[10.0, 12.0, 11.0]);
        let indicators = compute_indicators(&series);
        let metrics = ComparisonMetrics {
            year_return: 12.346,
            max_drawdown: 8.0,
        };
        let apple = CompanyProfile {
            name: "Apple Inc.".to_string(),
            sector: "Technology".to_string(),
        };
        let unknown = CompanyProfile::unknown("ZZZZ");

        let prompt = ComparisonPrompt::new(
            StockBrief::new("AAPL", &apple, &indicators, &metrics),
            StockBrief::new("ZZZZ", &unknown, &indicators, &metrics),
        )
        .render()
        .unwrap();

        assert!(prompt.contains("STOCK 1: AAPL (Apple Inc.)"));
        assert!(prompt.contains("STOCK 2: ZZZZ (ZZZZ)"));
        assert!(prompt.contains("Sector: Unknown"));
        assert!(prompt.contains("1-Year Return: 12.35%"));
        assert!(prompt.contains("Max Drawdown: 8.00%"));
        assert!(prompt.contains("\"higherGrowth\""));
    }
}

//! Two-stock comparison orchestration

use super::TextGeneration;
use super::result::{ComparedStocks, ComparisonResult, StockDetail};
use crate::directory::{CompanyDirectory, profile_for};
use crate::engine::{
    Contender, IndicatorOptions, TiePolicy, compare_metrics, compute_indicators_with,
    select_winners,
};
use crate::error::{DashError, Result};
use crate::models::{TimeSeriesPoint, normalize_symbol};
use crate::prompts::{ComparisonPrompt, StockBrief};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const STAGE: &str = "comparison";

/// Normalize and check a pair of symbols
///
/// Both must be present and must differ after trimming and upper-casing.
pub fn validate_pair(symbol1: &str, symbol2: &str) -> Result<(String, String)> {
    let first = normalize_symbol(symbol1);
    let second = normalize_symbol(symbol2);

    if first.is_empty() || second.is_empty() {
        return Err(DashError::InvalidInput(
            "Both stock1 and stock2 symbols are required".to_string(),
        ));
    }
    if first == second {
        return Err(DashError::InvalidInput(
            "Cannot compare the same stock".to_string(),
        ));
    }

    Ok((first, second))
}

/// Builds model comparisons of two stocks
#[derive(Clone)]
pub struct ComparisonOrchestrator {
    generation: TextGeneration,
    directory: Arc<dyn CompanyDirectory>,
    options: IndicatorOptions,
    tie_policy: TiePolicy,
}

impl ComparisonOrchestrator {
    pub fn new(
        generation: TextGeneration,
        directory: Arc<dyn CompanyDirectory>,
        options: IndicatorOptions,
        tie_policy: TiePolicy,
    ) -> Self {
        Self {
            generation,
            directory,
            options,
            tie_policy,
        }
    }

    /// Compare two symbols from their daily series
    #[instrument(skip(self, series1, series2), fields(points1 = series1.len(), points2 = series2.len()))]
    pub async fn build_comparison(
        &self,
        symbol1: &str,
        symbol2: &str,
        series1: &[TimeSeriesPoint],
        series2: &[TimeSeriesPoint],
    ) -> Result<ComparisonResult> {
        let (first, second) = validate_pair(symbol1, symbol2)?;

        for (symbol, series) in [(&first, series1), (&second, series2)] {
            if series.is_empty() {
                warn!(symbol = %symbol, stage = STAGE, "No historical data");
                return Err(DashError::NoData {
                    symbol: symbol.clone(),
                });
            }
        }

        let indicators1 = compute_indicators_with(series1, &self.options);
        let indicators2 = compute_indicators_with(series2, &self.options);
        let metrics1 = compare_metrics(series1);
        let metrics2 = compare_metrics(series2);

        let profile1 = profile_for(self.directory.as_ref(), &first).await?;
        let profile2 = profile_for(self.directory.as_ref(), &second).await?;

        let prompt = ComparisonPrompt::new(
            StockBrief::new(&first, &profile1, &indicators1, &metrics1),
            StockBrief::new(&second, &profile2, &indicators2, &metrics2),
        )
        .render()?;

        let model_output = self
            .generation
            .generate_object(prompt, STAGE)
            .await
            .inspect_err(|e| {
                error!(%first, %second, stage = STAGE, error = %e, "Comparison generation failed");
            })?;

        let winners = select_winners(
            &Contender {
                symbol: &first,
                indicators: &indicators1,
                metrics: &metrics1,
            },
            &Contender {
                symbol: &second,
                indicators: &indicators2,
                metrics: &metrics2,
            },
            self.tie_policy,
        );

        let stocks = ComparedStocks {
            stock1: StockDetail::new(&first, profile1, indicators1, metrics1),
            stock2: StockDetail::new(&second, profile2, indicators2, metrics2),
        };

        info!(%first, %second, "Comparison generated");
        Ok(ComparisonResult::new(model_output, stocks, winners))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::ScriptedGenerator;
    use crate::config::InsightConfig;
    use crate::directory::{MockCompanyDirectory, StaticCompanyDirectory};
    use crate::engine::comparison::TIE_LABEL;
    use crate::models::Company;
    use crate::models::fixtures::series_from_closes;
    use serde_json::json;

    const REPLY: &str = r#"Analysis follows.
{
  "analysis": {
    "performanceAnalysis": "AAPL outperformed",
    "riskAssessment": "MSFT is steadier",
    "recommendation": "Split 60/40",
    "marketOutlook": "Positive"
  },
  "summary": "Both are solid",
  "winner": "AAPL",
  "reason": "Stronger momentum",
  "metrics": {"betterPerformer": "AAPL", "lowerRisk": "MSFT", "higherGrowth": "AAPL"}
}"#;

    fn directory() -> Arc<dyn CompanyDirectory> {
        Arc::new(StaticCompanyDirectory::new(vec![Company::new(
            "AAPL",
            "Apple Inc.",
            Some("Technology"),
        )]))
    }

    fn orchestrator(
        generator: Arc<ScriptedGenerator>,
        directory: Arc<dyn CompanyDirectory>,
        tie_policy: TiePolicy,
    ) -> ComparisonOrchestrator {
        ComparisonOrchestrator::new(
            TextGeneration::new(generator, &InsightConfig::default()),
            directory,
            IndicatorOptions::default(),
            tie_policy,
        )
    }

    /// A full year rising 20% against one rising 10% with larger swings
    fn two_years() -> (Vec<TimeSeriesPoint>, Vec<TimeSeriesPoint>) {
        let steady: Vec<f64> = (0..252_i32).map(|i| 100.0 + f64::from(i) * 20.0 / 251.0).collect();
        let choppy: Vec<f64> = (0..252_i32)
            .map(|i| {
                let swing = if i % 2 == 0 { 6.0 } else { -6.0 };
                100.0 + f64::from(i) * 10.0 / 251.0 + if i == 251 { 0.0 } else { swing }
            })
            .collect();
        (series_from_closes(&steady), series_from_closes(&choppy))
    }

    #[test]
    fn test_validate_pair() {
        assert_eq!(
            validate_pair(" aapl", "msft ").unwrap(),
            ("AAPL".to_string(), "MSFT".to_string())
        );
        assert!(matches!(validate_pair("", "MSFT"), Err(DashError::InvalidInput(_))));
        assert!(matches!(validate_pair("AAPL", "  "), Err(DashError::InvalidInput(_))));
        assert!(matches!(validate_pair("AAPL", "aapl"), Err(DashError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_build_comparison() {
        let generator = ScriptedGenerator::replying(REPLY);
        let (steady, choppy) = two_years();

        let result = orchestrator(generator.clone(), directory(), TiePolicy::SecondWins)
            .build_comparison("aapl", "MSFT", &steady, &choppy)
            .await
            .unwrap();

        assert_eq!(result.stocks.stock1.symbol, "AAPL");
        assert_eq!(result.stocks.stock1.name, "Apple Inc.");
        assert_eq!(result.stocks.stock1.sector, "Technology");
        assert_eq!(result.stocks.stock2.name, "MSFT");
        assert_eq!(result.stocks.stock2.sector, "Unknown");
        assert!((result.stocks.stock1.year_return - 20.0).abs() < 1e-9);
        assert_eq!(result.stocks.stock1.max_drawdown, 0.0);
        assert!(result.stocks.stock2.max_drawdown > 0.0);

        assert_eq!(result.comparison_metrics.performance_winner, "AAPL");
        assert_eq!(result.comparison_metrics.risk_winner, "AAPL");
        assert_eq!(result.model_output["winner"], "AAPL");

        let prompt = generator.last_prompt();
        assert!(prompt.contains("STOCK 1: AAPL (Apple Inc.)"));
        assert!(prompt.contains("STOCK 2: MSFT (MSFT)"));
    }

    #[tokio::test]
    async fn test_identical_symbols_rejected_before_generation() {
        let generator = ScriptedGenerator::replying(REPLY);
        let series = series_from_closes(&[1.0, 2.0]);

        let err = orchestrator(generator.clone(), directory(), TiePolicy::SecondWins)
            .build_comparison("AAPL", " aapl ", &series, &series)
            .await
            .unwrap_err();

        assert!(matches!(err, DashError::InvalidInput(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_series_names_symbol() {
        let generator = ScriptedGenerator::replying(REPLY);
        let series = series_from_closes(&[1.0, 2.0]);

        let err = orchestrator(generator.clone(), directory(), TiePolicy::SecondWins)
            .build_comparison("AAPL", "MSFT", &series, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, DashError::NoData { ref symbol } if symbol == "MSFT"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_prose_reply_is_upstream_parse() {
        let reply = "Both stocks look interesting, hard to say.";
        let generator = ScriptedGenerator::replying(reply);
        let series = series_from_closes(&[1.0, 2.0]);

        let err = orchestrator(generator, directory(), TiePolicy::SecondWins)
            .build_comparison("AAPL", "MSFT", &series, &series)
            .await
            .unwrap_err();

        assert_eq!(err.raw_response(), Some(reply));
    }

    #[tokio::test]
    async fn test_identical_data_ties() {
        let series = series_from_closes(&[10.0, 11.0, 10.5, 12.0]);

        let legacy = orchestrator(
            ScriptedGenerator::replying(REPLY),
            directory(),
            TiePolicy::SecondWins,
        )
        .build_comparison("AAPL", "MSFT", &series, &series)
        .await
        .unwrap();
        assert_eq!(legacy.comparison_metrics.performance_winner, "MSFT");
        assert_eq!(legacy.comparison_metrics.momentum_winner, "MSFT");

        let reported = orchestrator(
            ScriptedGenerator::replying(REPLY),
            directory(),
            TiePolicy::ReportTie,
        )
        .build_comparison("AAPL", "MSFT", &series, &series)
        .await
        .unwrap();
        assert_eq!(reported.comparison_metrics.risk_winner, TIE_LABEL);
        assert_eq!(reported.comparison_metrics.volume_winner, TIE_LABEL);
    }

    #[tokio::test]
    async fn test_directory_failure_propagates() {
        let mut directory = MockCompanyDirectory::new();
        directory
            .expect_find()
            .returning(|_| Err(sqlx::Error::PoolTimedOut.into()));

        let generator = ScriptedGenerator::replying(REPLY);
        let series = series_from_closes(&[1.0, 2.0]);

        let err = orchestrator(generator.clone(), Arc::new(directory), TiePolicy::SecondWins)
            .build_comparison("AAPL", "MSFT", &series, &series)
            .await
            .unwrap_err();

        assert!(matches!(err, DashError::Directory(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_reply_fixture_is_json() {
        let start = REPLY.find('{').unwrap();
        let value: serde_json::Value = serde_json::from_str(&REPLY[start..]).unwrap();
        assert_eq!(value["metrics"], json!({"betterPerformer": "AAPL", "lowerRisk": "MSFT", "higherGrowth": "AAPL"}));
    }
}

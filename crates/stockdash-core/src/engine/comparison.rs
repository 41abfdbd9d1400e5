//! Return, drawdown and head-to-head winner selection

use super::indicators::IndicatorSnapshot;
use crate::error::DashError;
use crate::models::TimeSeriesPoint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Minimum number of points treated as a full trading year
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Label used for a reported tie
pub const TIE_LABEL: &str = "tie";

/// Percent change from first to last close over a full trading year
///
/// Returns exactly 0 when the series has fewer than
/// [`TRADING_DAYS_PER_YEAR`] points or starts at a zero close.
pub fn year_return(series: &[TimeSeriesPoint]) -> f64 {
    if series.len() < TRADING_DAYS_PER_YEAR {
        return 0.0;
    }
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if first.close != 0.0 => {
            (last.close - first.close) / first.close * 100.0
        }
        _ => 0.0,
    }
}

/// Largest peak-to-trough decline in percent, never negative
pub fn max_drawdown(series: &[TimeSeriesPoint]) -> f64 {
    let Some(first) = series.first() else {
        return 0.0;
    };

    let mut peak = first.close;
    let mut worst = 0.0_f64;

    for point in series {
        if point.close > peak {
            peak = point.close;
        }
        if peak > 0.0 {
            worst = worst.max((peak - point.close) / peak * 100.0);
        }
    }

    worst
}

/// Per-symbol return and risk figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonMetrics {
    pub year_return: f64,
    pub max_drawdown: f64,
}

/// Compute [`ComparisonMetrics`] for one series
pub fn compare_metrics(series: &[TimeSeriesPoint]) -> ComparisonMetrics {
    ComparisonMetrics {
        year_return: year_return(series),
        max_drawdown: max_drawdown(series),
    }
}

/// Result of one pairwise comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    First,
    Second,
    Tie,
}

impl Outcome {
    /// First wins when its value is strictly higher
    pub fn higher(first: f64, second: f64) -> Self {
        match first.partial_cmp(&second) {
            Some(Ordering::Greater) => Self::First,
            Some(Ordering::Less) => Self::Second,
            Some(Ordering::Equal) | None => Self::Tie,
        }
    }

    /// First wins when its value is strictly lower
    pub fn lower(first: f64, second: f64) -> Self {
        Self::higher(second, first)
    }

    /// Map the outcome to a symbol, or to [`TIE_LABEL`]
    pub fn resolve(self, first: &str, second: &str, policy: TiePolicy) -> String {
        match (self, policy) {
            (Self::First, _) => first.to_string(),
            (Self::Second, _) | (Self::Tie, TiePolicy::SecondWins) => second.to_string(),
            (Self::Tie, TiePolicy::ReportTie) => TIE_LABEL.to_string(),
        }
    }
}

/// How an exact tie is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TiePolicy {
    /// The second symbol takes ties
    #[default]
    SecondWins,
    /// Ties are reported as `"tie"`
    ReportTie,
}

impl FromStr for TiePolicy {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "second-wins" | "second" => Ok(Self::SecondWins),
            "report-tie" | "tie" => Ok(Self::ReportTie),
            other => Err(DashError::Configuration(format!(
                "Unknown tie policy '{other}', expected 'second-wins' or 'report-tie'"
            ))),
        }
    }
}

/// One side of a head-to-head comparison
#[derive(Debug, Clone, Copy)]
pub struct Contender<'a> {
    pub symbol: &'a str,
    pub indicators: &'a IndicatorSnapshot,
    pub metrics: &'a ComparisonMetrics,
}

/// Raw outcomes of the four head-to-head checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcomes {
    /// Higher year return
    pub performance: Outcome,
    /// Lower volatility
    pub risk: Outcome,
    /// Higher RSI
    pub momentum: Outcome,
    /// Higher volume trend
    pub volume: Outcome,
}

impl Outcomes {
    pub fn between(first: &Contender<'_>, second: &Contender<'_>) -> Self {
        Self {
            performance: Outcome::higher(first.metrics.year_return, second.metrics.year_return),
            risk: Outcome::lower(first.indicators.volatility, second.indicators.volatility),
            momentum: Outcome::higher(first.indicators.rsi, second.indicators.rsi),
            volume: Outcome::higher(
                first.indicators.volume_trend,
                second.indicators.volume_trend,
            ),
        }
    }
}

/// Winning symbol per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossComparisonWinners {
    pub performance_winner: String,
    pub risk_winner: String,
    pub momentum_winner: String,
    pub volume_winner: String,
}

/// Pick the winner of each category
pub fn select_winners(
    first: &Contender<'_>,
    second: &Contender<'_>,
    policy: TiePolicy,
) -> CrossComparisonWinners {
    let outcomes = Outcomes::between(first, second);
    let resolve = |outcome: Outcome| outcome.resolve(first.symbol, second.symbol, policy);

    CrossComparisonWinners {
        performance_winner: resolve(outcomes.performance),
        risk_winner: resolve(outcomes.risk),
        momentum_winner: resolve(outcomes.momentum),
        volume_winner: resolve(outcomes.volume),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::series_from_closes;

    #[test]
    fn test_year_return_requires_full_year() {
        let closes: Vec<f64> = (0..251_i32).map(|i| 100.0 + f64::from(i)).collect();
        assert_eq!(year_return(&series_from_closes(&closes)), 0.0);
        assert_eq!(year_return(&[]), 0.0);
    }

    #[test]
    fn test_year_return_full_year() {
        let mut closes = vec![100.0; 252];
        closes[251] = 125.0;
        assert_eq!(year_return(&series_from_closes(&closes)), 25.0);

        closes[0] = 0.0;
        assert_eq!(year_return(&series_from_closes(&closes)), 0.0);
    }

    #[test]
    fn test_max_drawdown() {
        let series = series_from_closes(&[100.0, 120.0, 90.0, 110.0, 60.0, 130.0]);
        assert_eq!(max_drawdown(&series), 50.0);
    }

    #[test]
    fn test_max_drawdown_increasing_is_zero() {
        let closes: Vec<f64> = (1..=50_i32).map(f64::from).collect();
        assert_eq!(max_drawdown(&series_from_closes(&closes)), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_max_drawdown_zero_peak_skipped() {
        let series = series_from_closes(&[0.0, 0.0, 10.0, 5.0]);
        assert_eq!(max_drawdown(&series), 50.0);
    }

    #[test]
    fn test_flat_year() {
        let metrics = compare_metrics(&series_from_closes(&[100.0; 252]));
        assert_eq!(metrics.year_return, 0.0);
        assert_eq!(metrics.max_drawdown, 0.0);
    }

    #[test]
    fn test_outcome_comparisons() {
        assert_eq!(Outcome::higher(2.0, 1.0), Outcome::First);
        assert_eq!(Outcome::higher(1.0, 2.0), Outcome::Second);
        assert_eq!(Outcome::higher(1.0, 1.0), Outcome::Tie);
        assert_eq!(Outcome::lower(1.0, 2.0), Outcome::First);
    }

    fn snapshot(volatility: f64, rsi: f64, volume_trend: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            volatility,
            rsi,
            volume_trend,
            ..Default::default()
        }
    }

    #[test]
    fn test_select_winners() {
        let a_ind = snapshot(5.0, 40.0, 10.0);
        let a_met = ComparisonMetrics {
            year_return: 20.0,
            max_drawdown: 8.0,
        };
        let b_ind = snapshot(8.0, 60.0, -5.0);
        let b_met = ComparisonMetrics {
            year_return: 10.0,
            max_drawdown: 12.0,
        };

        let a = Contender {
            symbol: "AAA",
            indicators: &a_ind,
            metrics: &a_met,
        };
        let b = Contender {
            symbol: "BBB",
            indicators: &b_ind,
            metrics: &b_met,
        };

        let winners = select_winners(&a, &b, TiePolicy::SecondWins);
        assert_eq!(winners.performance_winner, "AAA");
        assert_eq!(winners.risk_winner, "AAA");
        assert_eq!(winners.momentum_winner, "BBB");
        assert_eq!(winners.volume_winner, "AAA");
    }

    #[test]
    fn test_tie_policies() {
        let ind = snapshot(5.0, 50.0, 0.0);
        let met = ComparisonMetrics::default();
        let a = Contender {
            symbol: "AAA",
            indicators: &ind,
            metrics: &met,
        };
        let b = Contender {
            symbol: "BBB",
            ..a
        };

        let legacy = select_winners(&a, &b, TiePolicy::SecondWins);
        assert_eq!(legacy.performance_winner, "BBB");
        assert_eq!(legacy.risk_winner, "BBB");
        assert_eq!(legacy.momentum_winner, "BBB");
        assert_eq!(legacy.volume_winner, "BBB");

        let reported = select_winners(&a, &b, TiePolicy::ReportTie);
        assert_eq!(reported.performance_winner, TIE_LABEL);
        assert_eq!(reported.volume_winner, TIE_LABEL);
    }

    #[test]
    fn test_winners_serialize_camel_case() {
        let winners = CrossComparisonWinners {
            performance_winner: "A".to_string(),
            risk_winner: "A".to_string(),
            momentum_winner: "B".to_string(),
            volume_winner: "B".to_string(),
        };
        let value = serde_json::to_value(&winners).unwrap();
        assert_eq!(value["performanceWinner"], "A");
        assert_eq!(value["volumeWinner"], "B");
    }

    #[test]
    fn test_tie_policy_parsing() {
        assert_eq!("report-tie".parse::<TiePolicy>().unwrap(), TiePolicy::ReportTie);
        assert_eq!("SECOND-WINS".parse::<TiePolicy>().unwrap(), TiePolicy::SecondWins);
        assert!("first-wins".parse::<TiePolicy>().is_err());
    }
}

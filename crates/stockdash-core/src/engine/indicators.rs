//! Technical indicator snapshot

use super::round2;
use crate::error::DashError;
use crate::models::TimeSeriesPoint;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const SHORT_SMA_WINDOW: usize = 7;
const LONG_SMA_WINDOW: usize = 20;
const RECENT_VOLUME_WINDOW: usize = 5;
const MOMENTUM_WINDOW: usize = 10;
const RANGE_WINDOW: usize = 20;

/// RSI when the series has no up or down moves
pub const RSI_NEUTRAL: f64 = 50.0;

/// How fixed-window averages treat a series shorter than the window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowPolicy {
    /// Divide by the number of points actually available
    #[default]
    ActualCount,
    /// Always divide by the window length, so short series average low
    LiteralDivisor,
}

impl FromStr for WindowPolicy {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "actual-count" | "actual" => Ok(Self::ActualCount),
            "literal-divisor" | "literal" => Ok(Self::LiteralDivisor),
            other => Err(DashError::Configuration(format!(
                "Unknown window policy '{other}', expected 'actual-count' or 'literal-divisor'"
            ))),
        }
    }
}

/// Options for [`compute_indicators_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorOptions {
    pub window_policy: WindowPolicy,
}

/// Derived statistics for one price series
///
/// Every field except `current_price`, `support` and `resistance` is
/// rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    /// Mean of the last 7 closes
    pub sma7: f64,
    /// Mean of the last 20 closes
    pub sma20: f64,
    /// Relative strength over the whole series
    pub rsi: f64,
    /// Population standard deviation of all closes
    pub volatility: f64,
    /// Percent difference of recent (5 point) volume against overall mean volume
    pub volume_trend: f64,
    /// Percent change across the last 10 closes
    pub price_change: f64,
    /// Last close
    pub current_price: f64,
    /// Lowest of the last 20 closes
    pub support: f64,
    /// Highest of the last 20 closes
    pub resistance: f64,
}

/// Compute indicators with the default options
pub fn compute_indicators(series: &[TimeSeriesPoint]) -> IndicatorSnapshot {
    compute_indicators_with(series, &IndicatorOptions::default())
}

/// Compute indicators for an ascending daily series
///
/// An empty series yields an all-zero snapshot; callers reject empty
/// series before getting here.
pub fn compute_indicators_with(
    series: &[TimeSeriesPoint],
    options: &IndicatorOptions,
) -> IndicatorSnapshot {
    let Some(last) = series.last() else {
        return IndicatorSnapshot::default();
    };

    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let volumes: Vec<f64> = series.iter().map(|p| p.volume as f64).collect();
    let policy = options.window_policy;

    let avg_volume = mean(&volumes);
    let recent_volume = tail_mean(&volumes, RECENT_VOLUME_WINDOW, policy);
    let volume_trend = if avg_volume == 0.0 {
        0.0
    } else {
        (recent_volume - avg_volume) / avg_volume * 100.0
    };

    let range = tail(&closes, RANGE_WINDOW);

    IndicatorSnapshot {
        sma7: round2(tail_mean(&closes, SHORT_SMA_WINDOW, policy)),
        sma20: round2(tail_mean(&closes, LONG_SMA_WINDOW, policy)),
        rsi: round2(relative_strength(&closes)),
        volatility: round2(population_std_dev(&closes)),
        volume_trend: round2(volume_trend),
        price_change: round2(percent_change(tail(&closes, MOMENTUM_WINDOW))),
        current_price: last.close,
        support: range.iter().copied().fold(f64::INFINITY, f64::min),
        resistance: range.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

fn tail(values: &[f64], window: usize) -> &[f64] {
    &values[values.len().saturating_sub(window)..]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn tail_mean(values: &[f64], window: usize, policy: WindowPolicy) -> f64 {
    let tail = tail(values, window);
    match policy {
        WindowPolicy::ActualCount => mean(tail),
        WindowPolicy::LiteralDivisor => tail.iter().sum::<f64>() / window as f64,
    }
}

/// RSI over every day-over-day move
///
/// Unchanged days count as neither gain nor loss. No moves at all gives
/// [`RSI_NEUTRAL`], only gains gives 100 and only losses gives 0.
fn relative_strength(closes: &[f64]) -> f64 {
    let mut gains = Vec::new();
    let mut losses = Vec::new();

    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        if delta > 0.0 {
            gains.push(delta);
        } else if delta < 0.0 {
            losses.push(-delta);
        }
    }

    match (gains.is_empty(), losses.is_empty()) {
        (true, true) => RSI_NEUTRAL,
        (false, true) => 100.0,
        (true, false) => 0.0,
        (false, false) => {
            let rs = mean(&gains) / mean(&losses);
            100.0 - 100.0 / (1.0 + rs)
        }
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let variance = mean(&values.iter().map(|v| (v - avg).powi(2)).collect::<Vec<_>>());
    variance.sqrt()
}

fn percent_change(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if first != 0.0 => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

//! Indicator and comparison math
//!
//! Pure, synchronous functions over a daily price series. Nothing here
//! performs I/O or returns an error; degenerate input yields documented
//! sentinel values instead of NaN or infinity.

pub mod comparison;
pub mod indicators;

pub use comparison::{
    ComparisonMetrics, Contender, CrossComparisonWinners, Outcome, Outcomes, TRADING_DAYS_PER_YEAR,
    TiePolicy, compare_metrics, max_drawdown, select_winners, year_return,
};
pub use indicators::{
    IndicatorOptions, IndicatorSnapshot, WindowPolicy, compute_indicators,
    compute_indicators_with,
};

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

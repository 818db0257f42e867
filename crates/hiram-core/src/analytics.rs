//! Series-level analytics for chart overlays.

use serde::{Deserialize, Serialize};
use ta::indicators::RelativeStrengthIndex;
use ta::Next;
use time::Date;

use crate::{SeriesPoint, ValidationError};

/// Default RSI lookback in trading days.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Value of a rolling statistic at the last day of its window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityPoint {
    pub date: Date,
    pub value: f64,
}

/// Compounded return of each close relative to the first one.
///
/// The first value is always `0.0`. A zero close contributes no change
/// to the following step.
pub fn cumulative_returns(series: &[SeriesPoint]) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    let mut compound = 1.0_f64;
    let mut previous: Option<f64> = None;

    for point in series {
        if let Some(prev) = previous {
            if prev > 0.0 {
                compound *= point.close / prev;
            }
        }
        out.push(compound - 1.0);
        previous = Some(point.close);
    }

    out
}

/// Rolling sample standard deviation of closes scaled by `sqrt(window)`.
///
/// The first value is emitted at the `window`-th point.
pub fn rolling_volatility(
    series: &[SeriesPoint],
    window: usize,
) -> Result<Vec<VolatilityPoint>, ValidationError> {
    if window < 2 {
        return Err(ValidationError::InvalidVolatilityWindow { window });
    }

    let scale = (window as f64).sqrt();
    let out = series
        .windows(window)
        .map(|slice| {
            let n = slice.len() as f64;
            let mean = slice.iter().map(|p| p.close).sum::<f64>() / n;
            let variance = slice
                .iter()
                .map(|p| (p.close - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0);
            VolatilityPoint {
                // `windows` never yields an empty slice.
                date: slice[slice.len() - 1].date,
                value: variance.sqrt() * scale,
            }
        })
        .collect();

    Ok(out)
}

/// RSI of the closes, `None` when fewer than `period` points exist.
pub fn series_rsi(series: &[SeriesPoint], period: usize) -> Option<f64> {
    if period == 0 || series.len() < period {
        return None;
    }

    let mut indicator = RelativeStrengthIndex::new(period).ok()?;
    let mut last = None;
    for point in series {
        last = Some(indicator.next(point.close));
    }
    last
}

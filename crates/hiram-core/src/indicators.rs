//! Discrete labels derived from snapshot metrics.
//!
//! Classifiers are total: missing inputs never fail. They read the metrics
//! computed over the full history, so the displayed horizon has no effect.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::StockMetrics;

const HIGH_VOLATILITY: f64 = 40.0;
const HIGH_BETA: f64 = 1.5;
const MEDIUM_VOLATILITY: f64 = 20.0;
const MEDIUM_BETA: f64 = 1.2;

const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

/// Relation of the 50-day to the 200-day moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrendSignal {
    BullishCross,
    BearishCross,
    Unknown,
}

impl TrendSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BullishCross => "bullish-cross",
            Self::BearishCross => "bearish-cross",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// RSI band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MomentumStatus {
    Overbought,
    Oversold,
    Neutral,
}

impl MomentumStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overbought => "overbought",
            Self::Oversold => "oversold",
            Self::Neutral => "neutral",
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),+) => {
        $(
            impl Display for $ty {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

impl_display_via_as_str!(TrendSignal, RiskTier, MomentumStatus);

/// All labels for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signals {
    pub trend: TrendSignal,
    pub risk: RiskTier,
    pub momentum: MomentumStatus,
}

pub fn trend_signal(moving_average_50: Option<f64>, moving_average_200: Option<f64>) -> TrendSignal {
    match (moving_average_50, moving_average_200) {
        (Some(short), Some(long)) if short.is_finite() && long.is_finite() => {
            if short > long {
                TrendSignal::BullishCross
            } else {
                TrendSignal::BearishCross
            }
        }
        _ => TrendSignal::Unknown,
    }
}

/// A missing input counts as below every threshold.
pub fn risk_tier(historical_volatility: Option<f64>, beta: Option<f64>) -> RiskTier {
    let above = |value: Option<f64>, threshold: f64| value.is_some_and(|v| v > threshold);

    if above(historical_volatility, HIGH_VOLATILITY) || above(beta, HIGH_BETA) {
        RiskTier::High
    } else if above(historical_volatility, MEDIUM_VOLATILITY) || above(beta, MEDIUM_BETA) {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

pub fn momentum_status(rsi: Option<f64>) -> MomentumStatus {
    match rsi {
        Some(value) if value > RSI_OVERBOUGHT => MomentumStatus::Overbought,
        Some(value) if value < RSI_OVERSOLD => MomentumStatus::Oversold,
        _ => MomentumStatus::Neutral,
    }
}

pub fn classify(metrics: &StockMetrics) -> Signals {
    Signals {
        trend: trend_signal(metrics.moving_average_50, metrics.moving_average_200),
        risk: risk_tier(metrics.historical_volatility, metrics.beta),
        momentum: momentum_status(metrics.rsi),
    }
}

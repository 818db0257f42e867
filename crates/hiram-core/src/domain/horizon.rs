use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Trailing window applied to the displayed price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeHorizon {
    #[serde(rename = "5y")]
    FiveYears,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1m")]
    OneMonth,
}

impl TimeHorizon {
    pub const ALL: [Self; 4] = [
        Self::FiveYears,
        Self::OneYear,
        Self::SixMonths,
        Self::OneMonth,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FiveYears => "5y",
            Self::OneYear => "1y",
            Self::SixMonths => "6m",
            Self::OneMonth => "1m",
        }
    }

    /// Length of the horizon in calendar months.
    pub const fn months(self) -> u32 {
        match self {
            Self::FiveYears => 60,
            Self::OneYear => 12,
            Self::SixMonths => 6,
            Self::OneMonth => 1,
        }
    }
}

impl Display for TimeHorizon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeHorizon {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "5y" => Ok(Self::FiveYears),
            "1y" => Ok(Self::OneYear),
            "6m" => Ok(Self::SixMonths),
            "1m" => Ok(Self::OneMonth),
            other => Err(ValidationError::InvalidHorizon {
                value: other.to_owned(),
            }),
        }
    }
}

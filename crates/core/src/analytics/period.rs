//! Look-back periods applied to stored series before analysis.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use voldesk_market_data::Bar;

use crate::errors::{Error, ValidationError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    /// 365 days before the reference date
    OneYear,
    /// 5 × 365 days before the reference date
    FiveYears,
    #[default]
    Full,
}

impl Period {
    /// First date kept, or `None` when the whole series is kept.
    pub fn start(self, reference: NaiveDate) -> Option<NaiveDate> {
        let days = match self {
            Period::OneYear => 365,
            Period::FiveYears => 5 * 365,
            Period::Full => return None,
        };
        Some(
            reference
                .checked_sub_days(Days::new(days))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    pub fn contains(self, date: NaiveDate, reference: NaiveDate) -> bool {
        self.start(reference).map_or(true, |start| date >= start)
    }

    /// Bars on or after the period start.
    pub fn filter_bars(self, bars: &[Bar], reference: NaiveDate) -> Vec<Bar> {
        bars.iter()
            .filter(|b| self.contains(b.date, reference))
            .cloned()
            .collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::Full => "full",
        };
        f.write_str(label)
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1y" | "1" | "one-year" => Ok(Period::OneYear),
            "5y" | "5" | "five-years" => Ok(Period::FiveYears),
            "full" | "all" | "max" => Ok(Period::Full),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown period '{}', expected 1y, 5y or full",
                other
            )))),
        }
    }
}

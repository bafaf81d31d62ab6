//! Period tokens and the date ranges they resolve to.
//!
//! A token is either one of the fixed lookbacks (`1w`, `1m`, `3m`, `6m`, `1y`,
//! `3y`) or a plain non-negative integer meaning "that many days".

use crate::error::CoreError;
use chrono::{Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Fixed lookback windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::OneWeek,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::ThreeYears,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Period::OneWeek => "1w",
            Period::OneMonth => "1m",
            Period::ThreeMonths => "3m",
            Period::SixMonths => "6m",
            Period::OneYear => "1y",
            Period::ThreeYears => "3y",
        }
    }

    /// Lookback length in calendar days.
    pub fn days(self) -> i64 {
        match self {
            Period::OneWeek => 7,
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
            Period::ThreeYears => 365 * 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::OneWeek => "1 week",
            Period::OneMonth => "1 month",
            Period::ThreeMonths => "3 months",
            Period::SixMonths => "6 months",
            Period::OneYear => "1 year",
            Period::ThreeYears => "3 years",
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.token() == s)
            .ok_or_else(|| CoreError::InvalidPeriod {
                token: s.to_string(),
            })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A resolved `[start, end)` window plus its display label.
///
/// `end` is the resolution day. Providers widen the request through the end
/// of that day so a session already under way is included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl DateRange {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Resolve a period token relative to `today`.
pub fn resolve(token: &str, today: NaiveDate) -> Result<DateRange, CoreError> {
    let invalid = || CoreError::InvalidPeriod {
        token: token.to_string(),
    };

    if let Ok(period) = token.parse::<Period>() {
        return Ok(DateRange {
            start: today - Duration::days(period.days()),
            end: today,
            label: period.label().to_string(),
        });
    }

    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let days: u32 = token.parse().map_err(|_| invalid())?;
    let start = today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or_else(invalid)?;

    let label = if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    };

    Ok(DateRange {
        start,
        end: today,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    #[test]
    fn fixed_tokens_resolve_to_documented_offsets() {
        let expected = [
            ("1w", 7, "1 week"),
            ("1m", 30, "1 month"),
            ("3m", 90, "3 months"),
            ("6m", 180, "6 months"),
            ("1y", 365, "1 year"),
            ("3y", 1095, "3 years"),
        ];
        for (token, days, label) in expected {
            let range = resolve(token, today()).unwrap();
            assert_eq!(range.end, today());
            assert_eq!(range.days(), days, "offset for {token}");
            assert_eq!(range.label, label);
        }
    }

    #[test]
    fn integer_token_counts_days() {
        let range = resolve("45", today()).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 5, 14).unwrap());
        assert_eq!(range.label, "45 days");

        let zero = resolve("0", today()).unwrap();
        assert_eq!(zero.start, zero.end);

        assert_eq!(resolve("1", today()).unwrap().label, "1 day");
    }

    #[test]
    fn junk_tokens_are_rejected() {
        for token in ["", "abc", "-5", "+5", " 5", "1d", "2.5", "1W"] {
            let err = resolve(token, today()).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidPeriod { .. }),
                "{token:?} should be invalid"
            );
        }
    }

    #[test]
    fn period_round_trips_through_token() {
        for p in Period::ALL {
            assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
        }
    }
}

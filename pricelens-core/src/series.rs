//! Daily series with derived metrics.
//!
//! `transform` turns provider bars into a [`Series`]:
//! 1. project each bar to (date, close, volume), dropping rows whose close is
//!    not a positive finite number
//! 2. stable sort ascending by date; on a repeated date the later row wins
//! 3. percent and point change against the previous close (absent on the first row)
//! 4. volume rescaled to millions
//! 5. trading / calendar / non-trading day counts
//!
//! All derived values are rounded to two decimals, half away from zero.

use crate::data::RawBar;
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day after transform. Volume is in millions of shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: f64,
    pub percent_change: Option<f64>,
    pub point_change: Option<f64>,
}

/// Transformed series for one (symbol, period) request. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    records: Vec<DailyRecord>,
    calendar_days: i64,
}

impl Series {
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn first(&self) -> &DailyRecord {
        &self.records[0]
    }

    pub fn last(&self) -> &DailyRecord {
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Days with a record.
    pub fn trading_days(&self) -> usize {
        self.records.len()
    }

    /// Days from the first to the last record, inclusive.
    pub fn calendar_days(&self) -> i64 {
        self.calendar_days
    }

    pub fn non_trading_days(&self) -> i64 {
        self.calendar_days - self.records.len() as i64
    }

    /// Unrounded percent change from the first to the last close.
    pub fn total_percent_change(&self) -> f64 {
        let first = self.first().close;
        (self.last().close - first) / first * 100.0
    }

    pub fn total_point_change(&self) -> f64 {
        self.last().close - self.first().close
    }

    /// Mean of the rescaled volume column, in millions.
    pub fn average_volume(&self) -> f64 {
        self.records.iter().map(|r| r.volume).sum::<f64>() / self.records.len() as f64
    }

    /// The last `n` records (fewer if the series is shorter).
    pub fn tail(&self, n: usize) -> &[DailyRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }

    /// BLAKE3 over every (date, close, volume) triple, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for r in &self.records {
            hasher.update(r.date.to_string().as_bytes());
            hasher.update(&r.close.to_le_bytes());
            hasher.update(&r.volume.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Round to two decimals, half away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// A close that can anchor a percent change.
pub fn is_valid_close(close: f64) -> bool {
    close.is_finite() && close > 0.0
}

pub fn transform(raw: Vec<RawBar>) -> Result<Series, CoreError> {
    let mut rows: Vec<(NaiveDate, f64, f64)> = raw
        .into_iter()
        .filter(|b| is_valid_close(b.close))
        .map(|b| (b.date, b.close, b.volume as f64))
        .collect();
    if rows.is_empty() {
        return Err(CoreError::EmptySeries);
    }

    rows.sort_by_key(|&(date, _, _)| date);
    // Yahoo repeats the live session under the last bar's date.
    rows.dedup_by(|later, kept| {
        if later.0 == kept.0 {
            *kept = *later;
            true
        } else {
            false
        }
    });

    let records: Vec<DailyRecord> = rows
        .iter()
        .enumerate()
        .map(|(i, &(date, close, volume))| {
            let prev = i.checked_sub(1).map(|j| rows[j].1);
            DailyRecord {
                date,
                close,
                volume: round2(volume / 1_000_000.0),
                percent_change: prev.map(|p| round2((close - p) / p * 100.0)),
                point_change: prev.map(|p| round2(close - p)),
            }
        })
        .collect();

    let calendar_days = (records[records.len() - 1].date - records[0].date).num_days() + 1;

    Ok(Series {
        records,
        calendar_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: NaiveDate, close: f64, volume: u64) -> RawBar {
        RawBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume,
            adj_close: close,
        }
    }

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    #[test]
    fn two_row_scenario() {
        let series = transform(vec![
            bar(d(1, 2), 100.0, 2_000_000),
            bar(d(1, 3), 110.0, 1_000_000),
        ])
        .unwrap();

        let r = series.records();
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].close, 100.0);
        assert_eq!(r[0].volume, 2.0);
        assert_eq!(r[0].percent_change, None);
        assert_eq!(r[0].point_change, None);
        assert_eq!(r[1].close, 110.0);
        assert_eq!(r[1].volume, 1.0);
        assert_eq!(r[1].percent_change, Some(10.0));
        assert_eq!(r[1].point_change, Some(10.0));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(transform(vec![]), Err(CoreError::EmptySeries)));
    }

    #[test]
    fn unsorted_input_is_sorted_before_diffing() {
        let series = transform(vec![
            bar(d(1, 4), 90.0, 1_000_000),
            bar(d(1, 2), 100.0, 1_000_000),
            bar(d(1, 3), 120.0, 1_000_000),
        ])
        .unwrap();

        let dates: Vec<_> = series.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(1, 2), d(1, 3), d(1, 4)]);
        assert_eq!(series.records()[1].percent_change, Some(20.0));
        assert_eq!(series.records()[2].percent_change, Some(-25.0));
        assert_eq!(series.records()[2].point_change, Some(-30.0));
    }

    #[test]
    fn repeated_date_keeps_the_later_row() {
        let series = transform(vec![
            bar(d(6, 27), 99.0, 1_000_000),
            bar(d(6, 28), 100.0, 1_000_000),
            bar(d(6, 28), 101.0, 3_000_000),
        ])
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.last().date, d(6, 28));
        assert_eq!(series.last().close, 101.0);
        assert_eq!(series.last().volume, 3.0);
        assert_eq!(series.last().point_change, Some(2.0));
        assert_eq!(series.calendar_days(), 2);
        assert_eq!(series.non_trading_days(), 0);
    }

    #[test]
    fn same_day_pair_collapses_to_one_record() {
        let series = transform(vec![bar(d(6, 28), 100.0, 0), bar(d(6, 28), 101.0, 0)]).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().close, 101.0);
        assert_eq!(series.non_trading_days(), 0);
    }

    #[test]
    fn unusable_closes_are_dropped() {
        let series = transform(vec![
            bar(d(6, 26), f64::NAN, 1_000_000),
            bar(d(6, 27), 0.0, 1_000_000),
            bar(d(6, 28), 1.0, 1_000_000),
            bar(d(7, 1), -4.0, 1_000_000),
            bar(d(7, 2), f64::INFINITY, 1_000_000),
            bar(d(7, 3), 1.1, 1_000_000),
        ])
        .unwrap();

        let dates: Vec<_> = series.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d(6, 28), d(7, 3)]);
        assert_eq!(series.first().percent_change, None);
        assert_eq!(series.last().percent_change, Some(10.0));
        assert!(series
            .records()
            .iter()
            .filter_map(|r| r.percent_change)
            .all(f64::is_finite));
    }

    #[test]
    fn only_unusable_closes_is_empty() {
        let err = transform(vec![bar(d(6, 27), 0.0, 1), bar(d(6, 28), f64::NAN, 1)]).unwrap_err();
        assert!(matches!(err, CoreError::EmptySeries));
    }

    #[test]
    fn day_accounting_over_a_weekend() {
        // Fri, Mon, Tue: 5 calendar days, 3 trading days.
        let series = transform(vec![
            bar(d(6, 7), 10.0, 0),
            bar(d(6, 10), 11.0, 0),
            bar(d(6, 11), 12.0, 0),
        ])
        .unwrap();
        assert_eq!(series.trading_days(), 3);
        assert_eq!(series.calendar_days(), 5);
        assert_eq!(series.non_trading_days(), 2);
    }

    #[test]
    fn single_row_series() {
        let series = transform(vec![bar(d(3, 1), 50.0, 1_234_567)]).unwrap();
        assert_eq!(series.calendar_days(), 1);
        assert_eq!(series.non_trading_days(), 0);
        assert_eq!(series.first().volume, 1.23);
        assert_eq!(series.total_percent_change(), 0.0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(2.375), 2.38);
        assert_eq!(round2(-2.375), -2.38);
    }

    #[test]
    fn summary_statistics() {
        let series = transform(vec![
            bar(d(1, 2), 100.0, 2_000_000),
            bar(d(1, 3), 105.0, 4_000_000),
            bar(d(1, 4), 110.0, 3_000_000),
        ])
        .unwrap();
        assert!((series.total_percent_change() - 10.0).abs() < 1e-9);
        assert!((series.total_point_change() - 10.0).abs() < 1e-9);
        assert!((series.average_volume() - 3.0).abs() < 1e-9);
        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(10).len(), 3);
        assert_eq!(series.tail(1)[0].date, d(1, 4));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = transform(vec![bar(d(1, 2), 100.0, 1)]).unwrap();
        let b = transform(vec![bar(d(1, 2), 100.0, 1)]).unwrap();
        let c = transform(vec![bar(d(1, 2), 101.0, 1)]).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}

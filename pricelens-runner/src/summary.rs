//! Per-symbol run summary and its log rendering.

use chrono::NaiveDate;
use pricelens_core::data::DataSource;
use pricelens_core::{DailyRecord, Series, WrittenFiles};
use std::path::PathBuf;

/// Rows shown in the recent-days table.
pub const RECENT_ROWS: usize = 5;

/// Everything a completed `run_one` produced for one symbol.
#[derive(Debug, Clone)]
pub struct Summary {
    pub symbol: String,
    pub display_name: String,
    pub source: DataSource,
    pub period: String,
    pub period_label: String,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub first_close: f64,
    pub last_close: f64,
    pub total_percent_change: f64,
    pub total_point_change: f64,
    /// Millions of shares.
    pub average_volume: f64,
    pub trading_days: usize,
    pub non_trading_days: i64,
    pub series_hash: String,
    pub files: WrittenFiles,
    pub chart: PathBuf,
    pub recent: Vec<DailyRecord>,
}

impl Summary {
    #[allow(clippy::too_many_arguments)]
    pub fn from_series(
        series: &Series,
        symbol: &str,
        display_name: &str,
        source: DataSource,
        period: &str,
        period_label: &str,
        files: WrittenFiles,
        chart: PathBuf,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
            source,
            period: period.to_string(),
            period_label: period_label.to_string(),
            first_date: series.first().date,
            last_date: series.last().date,
            first_close: series.first().close,
            last_close: series.last().close,
            total_percent_change: series.total_percent_change(),
            total_point_change: series.total_point_change(),
            average_volume: series.average_volume(),
            trading_days: series.trading_days(),
            non_trading_days: series.non_trading_days(),
            series_hash: series.fingerprint(),
            files,
            chart,
            recent: series.tail(RECENT_ROWS).to_vec(),
        }
    }

    /// The statistics block, one log line per entry.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "=== Summary ===".to_string(),
            format!("Name: {}", self.display_name),
            format!("Source: {}", self.source),
            format!("Range: {} to {}", self.first_date, self.last_date),
            format!("Start price: {}", grouped(self.first_close)),
            format!("Last price: {}", grouped(self.last_close)),
            format!(
                "Total change: {}% ({} points)",
                grouped(self.total_percent_change),
                signed_grouped(self.total_point_change)
            ),
            format!("Average volume: {} M shares", grouped(self.average_volume)),
            format!(
                "Trading days: {}, non-trading days: {}",
                self.trading_days, self.non_trading_days
            ),
            format!("Series hash: {}", self.series_hash),
            format!("=== Last {} trading days ===", RECENT_ROWS),
            "Date\t\tClose\t\tChange(%)\tPoints\t\tVolume(M)".to_string(),
            "-".repeat(80),
        ];
        lines.extend(self.recent.iter().map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                r.date,
                grouped(r.close),
                signed_or_blank(r.percent_change, "%"),
                signed_or_blank(r.point_change, ""),
                grouped(r.volume)
            )
        }));
        lines
    }
}

/// Two decimals with comma thousands separators: `1234567.891` -> `1,234,567.89`.
fn grouped(x: f64) -> String {
    let fixed = format!("{:.2}", x.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut out = String::with_capacity(fixed.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    let sign = if x < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        "-"
    } else {
        ""
    };
    format!("{sign}{out}.{frac}")
}

fn signed_grouped(x: f64) -> String {
    let body = grouped(x);
    if body.starts_with('-') {
        body
    } else {
        format!("+{body}")
    }
}

fn signed_or_blank(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{}{unit}", signed_grouped(v)))
        .unwrap_or_else(|| "-".to_string())
}

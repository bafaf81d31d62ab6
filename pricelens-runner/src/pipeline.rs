//! Per-symbol pipeline: resolve → normalize → fetch → transform → write → render.
//!
//! A failing stage stops that symbol; nothing downstream runs. Batches run
//! symbols one after another in input order and never stop early.

use crate::summary::Summary;
use chrono::NaiveDate;
use pricelens_core::data::{fetch_series, DataProvider};
use pricelens_core::{
    resolve, transform, ChartRenderer, CoreError, LogSink, MarketConvention, OutputLayout,
    SeriesWriter,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolve,
    Fetch,
    Transform,
    Write,
    Render,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Resolve => "resolve",
            Stage::Fetch => "fetch",
            Stage::Transform => "transform",
            Stage::Write => "write",
            Stage::Render => "render",
        })
    }
}

#[derive(Debug, Error)]
#[error("{symbol}: {stage} failed: {source}")]
pub struct PipelineError {
    pub symbol: String,
    pub stage: Stage,
    #[source]
    pub source: CoreError,
}

/// Outcomes of a batch, in input order.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<(String, Result<Summary, PipelineError>)>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PipelineError> {
        self.outcomes.iter().filter_map(|(_, r)| r.as_ref().err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }
}

pub struct Pipeline {
    provider: Box<dyn DataProvider>,
    writer: SeriesWriter,
    renderer: ChartRenderer,
    convention: MarketConvention,
    log: Arc<dyn LogSink>,
    today: Option<NaiveDate>,
}

impl Pipeline {
    pub fn new(provider: Box<dyn DataProvider>, layout: OutputLayout, log: Arc<dyn LogSink>) -> Self {
        Self {
            provider,
            writer: SeriesWriter::new(layout.clone(), log.clone()),
            renderer: ChartRenderer::new(layout, log.clone()),
            convention: MarketConvention::default(),
            log,
            today: None,
        }
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_convention(mut self, convention: MarketConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn with_chart_size(mut self, width: u32, height: u32) -> Self {
        self.renderer = self.renderer.with_size(width, height);
        self
    }

    pub fn run_one(&self, symbol: &str, period: &str) -> Result<Summary, PipelineError> {
        let fail = |stage: Stage| {
            move |source: CoreError| PipelineError {
                symbol: symbol.to_string(),
                stage,
                source,
            }
        };

        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let range = resolve(period, today).map_err(fail(Stage::Resolve))?;
        let ticker = self.convention.normalize(symbol);

        let fetched = fetch_series(self.provider.as_ref(), &ticker, &range, self.log.as_ref())
            .map_err(fail(Stage::Fetch))?;
        let source = fetched.result.source;
        let series = transform(fetched.result.bars).map_err(fail(Stage::Transform))?;

        self.log
            .info(&format!("Trading days: {}", series.trading_days()));
        self.log.info(&format!(
            "Non-trading days (weekends and holidays): {}",
            series.non_trading_days()
        ));

        let files = self
            .writer
            .write(&series, &ticker, period)
            .map_err(fail(Stage::Write))?;
        let chart = self
            .renderer
            .render(&series, &ticker, period, &fetched.display_name, &range.label)
            .map_err(fail(Stage::Render))?;

        let summary = Summary::from_series(
            &series,
            &ticker,
            &fetched.display_name,
            source,
            period,
            &range.label,
            files,
            chart,
        );
        for line in summary.report_lines() {
            self.log.info(&line);
        }
        Ok(summary)
    }

    /// Run every symbol with the same period. Failures are logged and kept
    /// in the report; the batch always runs to the end.
    pub fn run_many(&self, symbols: &[String], period: &str) -> BatchReport {
        self.log
            .info(&format!("Processing {} symbols...", symbols.len()));

        let outcomes = symbols
            .iter()
            .map(|symbol| {
                self.log.info(&format!("Processing symbol: {symbol}"));
                let result = self.run_one(symbol, period);
                if let Err(e) = &result {
                    self.log.error(&e.to_string());
                }
                (symbol.clone(), result)
            })
            .collect();

        let report = BatchReport { outcomes };
        self.log.info(&format!(
            "All symbols processed: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        ));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names() {
        let names: Vec<String> = [
            Stage::Resolve,
            Stage::Fetch,
            Stage::Transform,
            Stage::Write,
            Stage::Render,
        ]
        .iter()
        .map(Stage::to_string)
        .collect();
        assert_eq!(names, ["resolve", "fetch", "transform", "write", "render"]);
    }

    #[test]
    fn error_message_names_symbol_and_stage() {
        let err = PipelineError {
            symbol: "9999".into(),
            stage: Stage::Transform,
            source: CoreError::EmptySeries,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("9999: transform failed: "));
        assert!(std::error::Error::source(&err).is_some());
    }
}

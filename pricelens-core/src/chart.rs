//! Two-panel PNG chart: close price line on top, volume bars below.
//!
//! Both panels share a segmented index axis (one segment per record), so the
//! tick under a price point is the same tick under its volume bar. The
//! bitmap backend only lives inside [`ChartRenderer::render`]; it is dropped
//! on every return path and the image is renamed into place after a
//! successful flush.

use crate::error::CoreError;
use crate::layout::{staging_path, OutputLayout};
use crate::log::LogSink;
use crate::series::{DailyRecord, Series};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, FontTransform};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Register the embedded font once per process.
fn ensure_font() -> Result<(), String> {
    FONT_REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| "embedded chart font is not a valid TrueType file".to_string())
        })
        .clone()
}

pub struct ChartRenderer {
    layout: OutputLayout,
    log: Arc<dyn LogSink>,
    size: (u32, u32),
}

impl ChartRenderer {
    pub fn new(layout: OutputLayout, log: Arc<dyn LogSink>) -> Self {
        Self {
            layout,
            log,
            size: (1200, 800),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn render(
        &self,
        series: &Series,
        symbol: &str,
        period: &str,
        display_name: &str,
        period_label: &str,
    ) -> Result<PathBuf, CoreError> {
        let path = self.layout.chart_path(symbol, period);
        let staged = staging_path(&path);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| CoreError::render_failed(&path, e))?;
        }
        ensure_font().map_err(|e| CoreError::render_failed(&path, e))?;

        let title = format!("{display_name} - last {period_label}");
        if let Err(reason) = draw(&staged, self.size, series.records(), &title) {
            let _ = fs::remove_file(&staged);
            return Err(CoreError::render_failed(&path, reason));
        }

        fs::rename(&staged, &path).map_err(|e| {
            let _ = fs::remove_file(&staged);
            CoreError::render_failed(&path, e)
        })?;

        self.log.info(&format!("Chart saved to {}", path.display()));
        Ok(path)
    }
}

fn draw(
    path: &Path,
    size: (u32, u32),
    records: &[DailyRecord],
    title: &str,
) -> Result<(), String> {
    let n = records.len();
    let labels: Vec<String> = records
        .iter()
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .collect();
    let label_for = |v: &SegmentValue<usize>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    let tick_font = || {
        (FONT_FAMILY, 11)
            .into_font()
            .transform(FontTransform::Rotate90)
    };

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;
    let (upper, lower) = root.split_vertically((size.1 * 2 / 3) as i32);

    // Price panel
    let (lo, hi) = padded_range(records.iter().map(|r| r.close));
    let mut price = ChartBuilder::on(&upper)
        .caption(title, (FONT_FAMILY, 24))
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d((0..n).into_segmented(), lo..hi)
        .map_err(draw_err)?;

    price
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&label_for)
        .x_label_style(tick_font())
        .y_desc("Close")
        .label_style((FONT_FAMILY, 12))
        .draw()
        .map_err(draw_err)?;

    price
        .draw_series(
            LineSeries::new(
                records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| (SegmentValue::CenterOf(i), r.close)),
                &BLUE,
            )
            .point_size(3),
        )
        .map_err(draw_err)?
        .label("Close")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    price
        .configure_series_labels()
        .label_font((FONT_FAMILY, 12))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    // Volume panel
    let peak = records.iter().map(|r| r.volume).fold(0.0_f64, f64::max);
    let top = if peak > 0.0 { peak * 1.1 } else { 1.0 };
    let mut volume = ChartBuilder::on(&lower)
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(70)
        .build_cartesian_2d((0..n).into_segmented(), 0.0..top)
        .map_err(draw_err)?;

    volume
        .configure_mesh()
        .x_labels(n)
        .x_label_formatter(&label_for)
        .x_label_style(tick_font())
        .x_desc("Date")
        .y_desc("Volume (M)")
        .label_style((FONT_FAMILY, 12))
        .draw()
        .map_err(draw_err)?;

    volume
        .draw_series(
            Histogram::vertical(&volume)
                .style(GREEN.mix(0.6).filled())
                .margin(2)
                .data(
                    records
                        .iter()
                        .enumerate()
                        .map(|(i, r)| (SegmentValue::Exact(i), r.volume)),
                ),
        )
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Value range with 5% headroom; flat series get a fixed band.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min {
        (max - min) * 0.05
    } else {
        (max.abs() * 0.01).max(1.0)
    };
    (min - pad, max + pad)
}

fn draw_err<E: std::fmt::Display>(e: E) -> String {
    e.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_brackets_values() {
        let (lo, hi) = padded_range([10.0, 20.0, 15.0].into_iter());
        assert!(lo < 10.0 && lo > 9.0);
        assert!(hi > 20.0 && hi < 21.0);
    }

    #[test]
    fn flat_series_gets_a_band() {
        let (lo, hi) = padded_range([50.0, 50.0].into_iter());
        assert!(lo < 50.0);
        assert!(hi > 50.0);
    }

    #[test]
    fn embedded_font_registers() {
        assert!(ensure_font().is_ok());
        assert!(ensure_font().is_ok());
    }
}

//! Console + daily file logging behind the core [`LogSink`] port.
//!
//! Each [`TracingLog`] owns its own `tracing` dispatcher, so several sinks
//! can coexist in one process (tests do this) and nothing is installed
//! globally. Lines look like `2024-06-28 09:15:02 - INFO - message`.

use chrono::NaiveDate;
use pricelens_core::LogSink;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{filter::LevelFilter, Layer, Registry};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `stock_YYYYMMDD.log` for the given day.
pub fn daily_log_name(date: NaiveDate) -> String {
    format!("stock_{}.log", date.format("%Y%m%d"))
}

/// `timestamp - LEVEL - message`.
struct LineFormat {
    timer: ChronoLocal,
}

impl LineFormat {
    fn new() -> Self {
        Self {
            timer: ChronoLocal::new(TIMESTAMP_FORMAT.to_string()),
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        write!(writer, " - {} - ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

pub struct TracingLog {
    dispatch: Dispatch,
    log_file: PathBuf,
}

impl TracingLog {
    /// Create `log_dir` if needed and open today's log file for appending.
    pub fn new(log_dir: &Path) -> io::Result<Self> {
        let today = chrono::Local::now().date_naive();
        Self::for_date(log_dir, today, true)
    }

    /// File-only sink for a fixed date.
    pub fn file_only(log_dir: &Path, date: NaiveDate) -> io::Result<Self> {
        Self::for_date(log_dir, date, false)
    }

    fn for_date(log_dir: &Path, date: NaiveDate, console: bool) -> io::Result<Self> {
        fs::create_dir_all(log_dir)?;
        let log_file = log_dir.join(daily_log_name(date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;

        let file_layer = tracing_subscriber::fmt::layer()
            .event_format(LineFormat::new())
            .with_ansi(false)
            .with_writer(Mutex::new(file));
        let console_layer = console.then(|| {
            tracing_subscriber::fmt::layer()
                .event_format(LineFormat::new())
                .with_writer(io::stdout)
        });

        let subscriber = Registry::default()
            .with(file_layer.with_filter(LevelFilter::INFO))
            .with(console_layer.with_filter(LevelFilter::INFO));

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            log_file,
        })
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    fn emit(&self, level: Level, message: &str) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            if level == Level::ERROR {
                tracing::error!("{message}");
            } else {
                tracing::info!("{message}");
            }
        });
    }
}

impl LogSink for TracingLog {
    fn info(&self, message: &str) {
        self.emit(Level::INFO, message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::ERROR, message);
    }
}

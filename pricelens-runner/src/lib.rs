//! PriceLens Runner: batch config, pipeline orchestration, logging sink.
//!
//! This crate builds on `pricelens-core` to provide:
//! - `BatchConfig` loading (JSON or TOML)
//! - The per-symbol `Pipeline` and its batch mode
//! - Run summaries and their log rendering
//! - `TracingLog`, a console + daily file sink for the core logging port

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod summary;

pub use config::{BatchConfig, ConfigError, DEFAULT_PERIOD};
pub use logging::{daily_log_name, TracingLog};
pub use pipeline::{BatchReport, Pipeline, PipelineError, Stage};
pub use summary::Summary;

//! Error kinds surfaced by the pipeline stages.
//!
//! Each stage reports exactly one kind. Provider-level detail lives in
//! [`DataError`](crate::data::DataError) and is folded into `FetchFailed`
//! at the fetch boundary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid period '{token}' (expected 1w, 1m, 3m, 6m, 1y, 3y or a number of days)")]
    InvalidPeriod { token: String },

    #[error("failed to fetch '{symbol}': {reason}")]
    FetchFailed { symbol: String, reason: String },

    #[error("empty series: no rows to transform")]
    EmptySeries,

    #[error("failed to write {}: {reason}", path.display())]
    WriteFailed { path: PathBuf, reason: String },

    #[error("failed to render chart {}: {reason}", path.display())]
    RenderFailed { path: PathBuf, reason: String },
}

impl CoreError {
    pub(crate) fn write_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CoreError::WriteFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn render_failed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CoreError::RenderFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

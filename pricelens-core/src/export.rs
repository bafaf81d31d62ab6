//! Series export (CSV/JSON).
//!
//! Both files are staged next to their targets and renamed into place only
//! once both are fully written, so a CSV and JSON pair on disk always
//! describe the same series.

use crate::error::CoreError;
use crate::layout::{staging_path, OutputLayout};
use crate::log::LogSink;
use crate::series::{DailyRecord, Series};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Paths of a committed CSV/JSON pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub csv: PathBuf,
    pub json: PathBuf,
}

pub struct SeriesWriter {
    layout: OutputLayout,
    log: Arc<dyn LogSink>,
}

impl SeriesWriter {
    pub fn new(layout: OutputLayout, log: Arc<dyn LogSink>) -> Self {
        Self { layout, log }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub fn write(
        &self,
        series: &Series,
        symbol: &str,
        period: &str,
    ) -> Result<WrittenFiles, CoreError> {
        let csv = self.layout.csv_path(symbol, period);
        let json = self.layout.json_path(symbol, period);
        let csv_tmp = staging_path(&csv);
        let json_tmp = staging_path(&json);

        let staged = write_csv(&csv_tmp, series.records())
            .and_then(|()| write_json(&json_tmp, series.records()));
        if let Err(e) = staged {
            discard(&[&csv_tmp, &json_tmp]);
            return Err(e);
        }

        if let Err(e) = commit(&csv_tmp, &csv) {
            discard(&[&csv_tmp, &json_tmp]);
            return Err(e);
        }
        if let Err(e) = commit(&json_tmp, &json) {
            // The CSV is already in place; take it back out so it cannot
            // pair with a stale JSON from an earlier run.
            discard(&[&json_tmp, &csv]);
            return Err(e);
        }

        self.log.info(&format!(
            "Series saved to {} and {}",
            csv.display(),
            json.display()
        ));

        Ok(WrittenFiles { csv, json })
    }
}

pub fn write_csv(path: &Path, records: &[DailyRecord]) -> Result<(), CoreError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|e| CoreError::write_failed(path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| CoreError::write_failed(path, e))?;
    }
    writer.flush().map_err(|e| CoreError::write_failed(path, e))?;
    Ok(())
}

pub fn write_json(path: &Path, records: &[DailyRecord]) -> Result<(), CoreError> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(records).map_err(|e| CoreError::write_failed(path, e))?;
    fs::write(path, json).map_err(|e| CoreError::write_failed(path, e))
}

/// Read a CSV written by [`write_csv`].
pub fn read_csv(path: &Path) -> std::io::Result<Vec<DailyRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader.deserialize().collect::<Result<Vec<DailyRecord>, _>>()?;
    Ok(records)
}

/// Read a JSON array written by [`write_json`].
pub fn read_json(path: &Path) -> std::io::Result<Vec<DailyRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn ensure_parent(path: &Path) -> Result<(), CoreError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| CoreError::write_failed(dir, e))
        }
        _ => Ok(()),
    }
}

fn commit(staged: &Path, target: &Path) -> Result<(), CoreError> {
    fs::rename(staged, target).map_err(|e| CoreError::write_failed(target, e))
}

fn discard(paths: &[&Path]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

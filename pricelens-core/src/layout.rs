//! Deterministic output paths.
//!
//! Layout under the data root:
//! - `csv/{stem}_data_{period}.csv`
//! - `json/{stem}_data_{period}.json`
//! - `charts/{stem}_chart_{period}.png`
//!
//! `{stem}` is the symbol with the market suffix stripped.

use crate::symbol::canonical_file_stem;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn csv_dir(&self) -> PathBuf {
        self.root.join("csv")
    }

    pub fn json_dir(&self) -> PathBuf {
        self.root.join("json")
    }

    pub fn chart_dir(&self) -> PathBuf {
        self.root.join("charts")
    }

    pub fn csv_path(&self, symbol: &str, period: &str) -> PathBuf {
        self.csv_dir()
            .join(format!("{}_data_{period}.csv", canonical_file_stem(symbol)))
    }

    pub fn json_path(&self, symbol: &str, period: &str) -> PathBuf {
        self.json_dir()
            .join(format!("{}_data_{period}.json", canonical_file_stem(symbol)))
    }

    pub fn chart_path(&self, symbol: &str, period: &str) -> PathBuf {
        self.chart_dir()
            .join(format!("{}_chart_{period}.png", canonical_file_stem(symbol)))
    }

    /// Create the three output directories, returning them in order.
    pub fn create_dirs(&self) -> std::io::Result<Vec<PathBuf>> {
        let dirs = vec![self.csv_dir(), self.json_dir(), self.chart_dir()];
        for dir in &dirs {
            fs::create_dir_all(dir)?;
        }
        Ok(dirs)
    }
}

/// Sibling path used while a file is being written: `name.tmp.ext`.
///
/// The real extension stays last so encoders that sniff it still work.
pub fn staging_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}.tmp.{}", ext.to_string_lossy()),
        None => format!("{stem}.tmp"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_strip_market_suffix() {
        let layout = OutputLayout::new("data");
        assert_eq!(
            layout.csv_path("2330.TW", "1m"),
            PathBuf::from("data/csv/2330_data_1m.csv")
        );
        assert_eq!(
            layout.json_path("2330", "3y"),
            PathBuf::from("data/json/2330_data_3y.json")
        );
        assert_eq!(
            layout.chart_path("^TWII", "45"),
            PathBuf::from("data/charts/^TWII_chart_45.png")
        );
    }

    #[test]
    fn staging_keeps_extension_last() {
        assert_eq!(
            staging_path(Path::new("out/charts/2330_chart_1m.png")),
            PathBuf::from("out/charts/2330_chart_1m.tmp.png")
        );
        assert_eq!(
            staging_path(Path::new("out/raw")),
            PathBuf::from("out/raw.tmp")
        );
    }

    #[test]
    fn create_dirs_builds_all_three() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(tmp.path().join("data"));
        let dirs = layout.create_dirs().unwrap();
        assert_eq!(dirs.len(), 3);
        assert!(dirs.iter().all(|d| d.is_dir()));
    }
}

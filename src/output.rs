//! Writing rendered reports to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use archscribe_core::export::{export_file_name, render, ExportFormat};
use archscribe_core::AnalysisReport;
use tracing::info;

/// A file written by [`write_exports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenExport {
    pub format: ExportFormat,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Today's date the way it appears in the "Generated on" line.
pub fn generated_on_today() -> String {
    chrono::Local::now().format("%B %d, %Y").to_string()
}

/// Render `report` once per format into `dir` (created if missing). Repeated formats
/// are written once.
pub fn write_exports(
    report: &AnalysisReport,
    formats: &[ExportFormat],
    dir: &Path,
    generated_on: &str,
) -> Result<Vec<WrittenExport>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written: Vec<WrittenExport> = Vec::new();
    for &format in formats {
        if written.iter().any(|w| w.format == format) {
            continue;
        }
        let bytes = render(report, format, generated_on)?;
        let path = dir.join(export_file_name(report.location.name(), format));
        fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = ?path, %format, bytes = bytes.len(), "Wrote export");
        written.push(WrittenExport {
            format,
            path,
            bytes: bytes.len() as u64,
        });
    }
    Ok(written)
}

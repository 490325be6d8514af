//! Document export.
//!
//! An [`AnalysisReport`] is first laid out as a format-neutral outline of [`Block`]s,
//! then rendered by one of the format modules. The outline order is: title,
//! repository details, statistics, overview, architecture (with diagram), modules,
//! data flow (with diagram), design patterns. Empty sections are left out.

pub mod docx;
pub mod markdown;
pub mod pdf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisReport;
use crate::error::AnalyzerError;
use crate::parser::{modules_table, ModuleRow};

/// One element of the document outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Heading(String),
    Subheading(String),
    Paragraph(String),
    /// Mermaid diagram source.
    Diagram(String),
    /// Two-column key/value table with a header row.
    Table {
        header: (String, String),
        rows: Vec<(String, String)>,
    },
    Modules(Vec<ModuleRow>),
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Pdf,
    Json,
    Docx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Docx => "docx",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            "docx" | "word" => Ok(ExportFormat::Docx),
            other => Err(AnalyzerError::Export(format!("unsupported export format: {other}"))),
        }
    }
}

/// Render `report` in `format`.
pub fn render(
    report: &AnalysisReport,
    format: ExportFormat,
    generated_on: &str,
) -> Result<Vec<u8>, AnalyzerError> {
    match format {
        ExportFormat::Markdown => {
            Ok(markdown::render_markdown(&build_outline(report, generated_on)).into_bytes())
        }
        ExportFormat::Pdf => pdf::render_pdf(&build_outline(report, generated_on), &report.repository.full_name),
        ExportFormat::Json => serde_json::to_vec_pretty(&report.result)
            .map_err(|e| AnalyzerError::Export(format!("JSON serialisation failed: {e}"))),
        ExportFormat::Docx => docx::render_docx(&build_outline(report, generated_on)),
    }
}

/// Lay out a report as a list of blocks.
pub fn build_outline(report: &AnalysisReport, generated_on: &str) -> Vec<Block> {
    let repo = &report.repository;
    let stats = &report.result.key_statistics;
    let sections = &report.result.sections;

    let mut blocks = vec![
        Block::Title("Architecture Documentation".to_string()),
        Block::Subheading(format!("Repository: {}", repo.full_name)),
        Block::Paragraph(format!("Description: {}", repo.description)),
        Block::Paragraph(format!("Language: {}", repo.language)),
        Block::Paragraph(format!("Generated on: {generated_on}")),
        Block::Heading("Repository Statistics".to_string()),
        Block::Table {
            header: ("Metric".to_string(), "Value".to_string()),
            rows: [
                ("Total Files", stats.total_files.to_string()),
                ("Code Files", stats.code_files.to_string()),
                ("Analyzed Files", stats.analyzed_files.to_string()),
                ("Skipped Files", stats.skipped_files.to_string()),
                ("Main Language", stats.main_language.clone()),
                ("Modules Count", stats.modules_count.to_string()),
                ("Stars", repo.stars.to_string()),
                ("Forks", repo.forks.to_string()),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        },
    ];

    if !sections.overview.is_empty() {
        blocks.push(Block::Heading("Overview".to_string()));
        blocks.push(Block::Paragraph(sections.overview.clone()));
    }

    if !sections.architecture.is_empty() {
        blocks.push(Block::Heading("High-Level Architecture".to_string()));
        blocks.push(Block::Paragraph(sections.architecture.clone()));
        if !sections.architecture_diagram.is_empty() {
            blocks.push(Block::Subheading("Architecture Diagram".to_string()));
            blocks.push(Block::Diagram(sections.architecture_diagram.clone()));
        }
    }

    if !sections.modules.is_empty() {
        blocks.push(Block::Heading("Module Breakdown".to_string()));
        blocks.push(Block::Paragraph(sections.modules.clone()));
        let rows = modules_table(&sections.modules);
        if !rows.is_empty() {
            blocks.push(Block::Modules(rows));
        }
    }

    if !sections.data_flow.is_empty() {
        blocks.push(Block::Heading("Data Flow Analysis".to_string()));
        blocks.push(Block::Paragraph(sections.data_flow.clone()));
        if !sections.data_flow_diagram.is_empty() {
            blocks.push(Block::Subheading("Data Flow Diagram".to_string()));
            blocks.push(Block::Diagram(sections.data_flow_diagram.clone()));
        }
    }

    if !sections.design_patterns.is_empty() {
        blocks.push(Block::Heading("Design Patterns".to_string()));
        blocks.push(Block::Paragraph(sections.design_patterns.clone()));
    }

    blocks
}

/// Replace characters that are invalid in file names, trim spaces and dots.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| if "<>:\"/\\|?*".contains(c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == ' ' || c == '.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<repo>_architecture.<ext>`, sanitised.
pub fn export_file_name(repo_name: &str, format: ExportFormat) -> String {
    format!("{}_architecture.{}", sanitize_filename(repo_name), format.extension())
}

/// Human-readable byte size, e.g. `1.0 KB`.
pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0 B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = size_bytes;
    let mut unit = 0;
    while size >= 1024 && unit < UNITS.len() - 1 {
        size /= 1024;
        unit += 1;
    }
    format!("{size}.0 {}", UNITS[unit])
}

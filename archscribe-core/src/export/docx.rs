//! Word (DOCX) rendering with `docx-rs`.

use std::io::Cursor;

use docx_rs::{
    BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType, Table, TableCell, TableRow,
};
use tracing::debug;

use super::Block;
use crate::error::AnalyzerError;

const TITLE_STYLE: &str = "Title";
const HEADING_STYLE: &str = "Heading1";
const SUBHEADING_STYLE: &str = "Heading2";
const CODE_FONT: &str = "Courier New";

fn styles() -> [Style; 3] {
    [
        Style::new(TITLE_STYLE, StyleType::Paragraph)
            .name("Title")
            .size(48)
            .bold(),
        Style::new(HEADING_STYLE, StyleType::Paragraph)
            .name("Heading 1")
            .size(32)
            .bold(),
        Style::new(SUBHEADING_STYLE, StyleType::Paragraph)
            .name("Heading 2")
            .size(26)
            .bold(),
    ]
}

/// One run holding `text`, with line breaks where the text has newlines.
fn text_run(text: &str) -> Run {
    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    run
}

fn styled(text: &str, style: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text)).style(style)
}

fn code(text: &str) -> Paragraph {
    Paragraph::new().add_run(
        text_run(text)
            .fonts(RunFonts::new().ascii(CODE_FONT).hi_ansi(CODE_FONT))
            .size(18),
    )
}

fn cell(text: &str, bold: bool) -> TableCell {
    let run = if bold { text_run(text).bold() } else { text_run(text) };
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}

fn table(header: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table_rows = vec![TableRow::new(header.iter().map(|h| cell(h, true)).collect())];
    table_rows.extend(
        rows.iter()
            .map(|row| TableRow::new(row.iter().map(|v| cell(v, false)).collect())),
    );
    Table::new(table_rows)
}

/// Render an outline to DOCX bytes.
pub fn render_docx(blocks: &[Block]) -> Result<Vec<u8>, AnalyzerError> {
    let mut doc = Docx::new();
    for style in styles() {
        doc = doc.add_style(style);
    }

    for block in blocks {
        doc = match block {
            Block::Title(text) => doc.add_paragraph(styled(text, TITLE_STYLE)),
            Block::Heading(text) => doc.add_paragraph(styled(text, HEADING_STYLE)),
            Block::Subheading(text) => doc.add_paragraph(styled(text, SUBHEADING_STYLE)),
            Block::Paragraph(text) => doc.add_paragraph(Paragraph::new().add_run(text_run(text))),
            Block::Diagram(source) => doc
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Mermaid Diagram Code:")))
                .add_paragraph(code(source)),
            Block::Table { header, rows } => doc.add_table(table(
                &[header.0.as_str(), header.1.as_str()],
                rows.iter().map(|(k, v)| vec![k.clone(), v.clone()]).collect(),
            )),
            Block::Modules(rows) => doc.add_table(table(
                &["Module", "Purpose", "Files", "Dependencies"],
                rows.iter()
                    .map(|r| {
                        vec![
                            r.name.clone(),
                            r.purpose.clone(),
                            r.files.clone(),
                            r.dependencies.clone(),
                        ]
                    })
                    .collect(),
            )),
        };
    }

    let mut buffer = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buffer)
        .map_err(|e| AnalyzerError::Export(format!("DOCX packaging failed: {e}")))?;
    let bytes = buffer.into_inner();
    debug!(bytes = bytes.len(), "Packed DOCX document");
    Ok(bytes)
}

//! PDF rendering with `printpdf` builtin fonts.
//!
//! Builtin fonts need no font files on disk. Text is wrapped on an estimated
//! average glyph width and flowed onto as many A4 pages as needed.

use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem};
use tracing::{debug, warn};

use super::Block;
use crate::error::AnalyzerError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const PT_PER_MM: f32 = 2.834_646;

#[derive(Clone, Copy)]
struct TextStyle {
    font: BuiltinFont,
    size: f32,
    /// Average glyph width as a fraction of the font size.
    glyph_width: f32,
    space_before: f32,
}

const TITLE: TextStyle = TextStyle { font: BuiltinFont::HelveticaBold, size: 24.0, glyph_width: 0.55, space_before: 0.0 };
const HEADING: TextStyle = TextStyle { font: BuiltinFont::HelveticaBold, size: 18.0, glyph_width: 0.55, space_before: 14.0 };
const SUBHEADING: TextStyle = TextStyle { font: BuiltinFont::HelveticaBold, size: 14.0, glyph_width: 0.55, space_before: 8.0 };
const BODY: TextStyle = TextStyle { font: BuiltinFont::Helvetica, size: 11.0, glyph_width: 0.5, space_before: 4.0 };
const CODE: TextStyle = TextStyle { font: BuiltinFont::Courier, size: 10.0, glyph_width: 0.6, space_before: 4.0 };

struct PageWriter {
    pages: Vec<PdfPage>,
    ops: Vec<Op>,
    /// Distance from the bottom of the page, in points.
    cursor: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            ops: Vec::new(),
            cursor: top(),
        }
    }

    fn break_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
        self.cursor = top();
    }

    fn space(&mut self, points: f32) {
        self.cursor -= points;
    }

    fn write(&mut self, text: &str, style: TextStyle, indent_mm: f32) {
        self.space(style.space_before);
        let width = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM - indent_mm) * PT_PER_MM;
        let max_chars = ((width / (style.size * style.glyph_width)) as usize).max(10);
        let line_height = style.size * 1.3;

        for raw_line in text.lines() {
            for line in wrap(raw_line, max_chars) {
                if self.cursor - line_height < MARGIN_MM * PT_PER_MM {
                    self.break_page();
                }
                self.cursor -= line_height;
                self.ops.push(Op::StartTextSection);
                self.ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt((MARGIN_MM + indent_mm) * PT_PER_MM),
                        y: Pt(self.cursor),
                    },
                });
                self.ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(style.size),
                    font: style.font,
                });
                self.ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(to_win_ansi(&line))],
                    font: style.font,
                });
                self.ops.push(Op::EndTextSection);
            }
        }
    }

    fn finish(mut self) -> Vec<PdfPage> {
        if !self.ops.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        self.pages
    }
}

fn top() -> f32 {
    (PAGE_HEIGHT_MM - MARGIN_MM) * PT_PER_MM
}

/// Builtin fonts only cover a Latin-1 style repertoire; anything else becomes `?`.
fn to_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if (c as u32) < 0x20 => ' ',
            c if (c as u32) <= 0xFF => c,
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(line: &str, max_chars: usize) -> Vec<String> {
    if line.trim().is_empty() {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render an outline to PDF bytes.
pub fn render_pdf(blocks: &[Block], title: &str) -> Result<Vec<u8>, AnalyzerError> {
    let mut writer = PageWriter::new();

    for block in blocks {
        match block {
            Block::Title(text) => {
                writer.write(text, TITLE, 0.0);
                writer.space(16.0);
            }
            Block::Heading(text) => writer.write(text, HEADING, 0.0),
            Block::Subheading(text) => writer.write(text, SUBHEADING, 0.0),
            Block::Paragraph(text) => writer.write(text, BODY, 0.0),
            Block::Diagram(source) => {
                writer.write("Mermaid Diagram Code:", BODY, 0.0);
                writer.write(source, CODE, 7.0);
            }
            Block::Table { header, rows } => {
                let width = rows
                    .iter()
                    .map(|(k, _)| k.chars().count())
                    .chain(std::iter::once(header.0.chars().count()))
                    .max()
                    .unwrap_or(0);
                let mut table = format!("{:<width$}  {}\n", header.0, header.1);
                table.push_str(&format!("{}\n", "-".repeat(width + 2 + header.1.chars().count().max(5))));
                for (key, value) in rows {
                    table.push_str(&format!("{key:<width$}  {value}\n"));
                }
                writer.write(&table, CODE, 0.0);
            }
            Block::Modules(rows) => {
                for row in rows {
                    let mut entry = format!("{}: {}", row.name, row.purpose);
                    if !row.files.is_empty() {
                        entry.push_str(&format!("\n  Files: {}", row.files));
                    }
                    if !row.dependencies.is_empty() {
                        entry.push_str(&format!("\n  Dependencies: {}", row.dependencies));
                    }
                    writer.write(&entry, BODY, 4.0);
                }
            }
        }
    }

    let pages = writer.finish();
    debug!(pages = pages.len(), "Laid out PDF pages");

    let mut doc = PdfDocument::new(title);
    let mut warnings = Vec::new();
    let bytes = doc.with_pages(pages).save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "PDF writer reported warnings");
    }
    if bytes.is_empty() {
        return Err(AnalyzerError::Export("PDF writer produced no output".to_string()));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::build_outline;
    use crate::export::tests::sample_report;

    #[test]
    fn wrap_respects_width_and_splits_long_words() {
        let lines = wrap("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
        let lines = wrap("abcdefghijklmnop", 10);
        assert_eq!(lines, vec!["abcdefghij", "klmnop"]);
        assert_eq!(wrap("   ", 10), vec![String::new()]);
    }

    #[test]
    fn non_latin_characters_are_replaced() {
        assert_eq!(to_win_ansi("café → ok"), "café ? ok");
        assert_eq!(to_win_ansi("\u{201C}q\u{201D}"), "\"q\"");
    }

    #[test]
    fn renders_pdf_with_magic_header() {
        let blocks = build_outline(&sample_report(), "January 01, 2026");
        let bytes = render_pdf(&blocks, "acme/widgets").unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn long_documents_flow_onto_more_pages() {
        let long = "word ".repeat(20_000);
        let mut writer = PageWriter::new();
        writer.write(&long, BODY, 0.0);
        assert!(writer.finish().len() > 1);
    }
}

use super::Block;

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Render an outline as Markdown. Diagrams become ` ```mermaid ` fences.
pub fn render_markdown(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Title(text) => out.push_str(&format!("# {text}\n\n")),
            Block::Heading(text) => out.push_str(&format!("## {text}\n\n")),
            Block::Subheading(text) => out.push_str(&format!("### {text}\n\n")),
            Block::Paragraph(text) => out.push_str(&format!("{text}\n\n")),
            Block::Diagram(source) => out.push_str(&format!("```mermaid\n{source}\n```\n\n")),
            Block::Table { header, rows } => {
                out.push_str(&format!(
                    "| {} | {} |\n| --- | --- |\n",
                    escape_cell(&header.0),
                    escape_cell(&header.1)
                ));
                for (key, value) in rows {
                    out.push_str(&format!("| {} | {} |\n", escape_cell(key), escape_cell(value)));
                }
                out.push('\n');
            }
            Block::Modules(rows) => {
                out.push_str("| Module | Purpose | Key Files | Dependencies |\n");
                out.push_str("| --- | --- | --- | --- |\n");
                for row in rows {
                    out.push_str(&format!(
                        "| {} | {} | {} | {} |\n",
                        escape_cell(&row.name),
                        escape_cell(&row.purpose),
                        escape_cell(&row.files),
                        escape_cell(&row.dependencies)
                    ));
                }
                out.push('\n');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::build_outline;
    use crate::export::tests::sample_report;

    #[test]
    fn renders_headings_tables_and_diagrams() {
        let md = render_markdown(&build_outline(&sample_report(), "January 01, 2026"));
        assert!(md.starts_with("# Architecture Documentation\n\n"));
        assert!(md.contains("### Repository: acme/widgets\n"));
        assert!(md.contains("| Metric | Value |\n| --- | --- |\n| Total Files | 12 |\n"));
        assert!(md.contains("## High-Level Architecture\n\nLayered.\n\n### Architecture Diagram\n\n```mermaid\ngraph TD\n  A-->B\n```\n"));
        assert!(md.contains("| api | HTTP layer |  |  |\n"));
        assert!(!md.contains("## Data Flow Analysis"));
    }

    #[test]
    fn table_cells_are_escaped() {
        let md = render_markdown(&[Block::Table {
            header: ("a".into(), "b".into()),
            rows: vec![("x|y".into(), "line\nbreak".into())],
        }]);
        assert!(md.contains("| x\\|y | line break |"));
    }
}

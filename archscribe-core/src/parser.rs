//! Parses the structured analysis reply into named sections.
//!
//! Extraction is table-driven: each field has a header, and either ends at the next
//! field's header (prose sections) or at the close of the first fenced
//! ` ```mermaid ` block after its header (diagram sections). Matching is
//! case-insensitive and spans lines. A reply that matches none of the headers is
//! kept whole as the overview.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The seven numbered headers of the reply template, in order.
pub const SECTION_HEADERS: [&str; 7] = [
    "### 1. OVERVIEW",
    "### 2. ARCHITECTURE",
    "### 3. MODULES",
    "### 4. DATA_FLOW",
    "### 5. DESIGN_PATTERNS",
    "### 6. MERMAID_ARCHITECTURE_DIAGRAM",
    "### 7. MERMAID_DATA_FLOW_DIAGRAM",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Overview,
    Architecture,
    Modules,
    DataFlow,
    DesignPatterns,
    ArchitectureDiagram,
    DataFlowDiagram,
}

enum SectionEnd {
    /// Up to the given header, or the end of the text.
    NextHeader(&'static str),
    /// Up to the closing fence of the first ` ```mermaid ` block.
    Fence,
}

struct SectionRule {
    section: Section,
    header: &'static str,
    end: SectionEnd,
}

const SECTION_RULES: [SectionRule; 7] = [
    SectionRule {
        section: Section::Overview,
        header: SECTION_HEADERS[0],
        end: SectionEnd::NextHeader(SECTION_HEADERS[1]),
    },
    SectionRule {
        section: Section::Architecture,
        header: SECTION_HEADERS[1],
        end: SectionEnd::NextHeader(SECTION_HEADERS[2]),
    },
    SectionRule {
        section: Section::Modules,
        header: SECTION_HEADERS[2],
        end: SectionEnd::NextHeader(SECTION_HEADERS[3]),
    },
    SectionRule {
        section: Section::DataFlow,
        header: SECTION_HEADERS[3],
        end: SectionEnd::NextHeader(SECTION_HEADERS[4]),
    },
    SectionRule {
        section: Section::DesignPatterns,
        header: SECTION_HEADERS[4],
        end: SectionEnd::NextHeader(SECTION_HEADERS[5]),
    },
    SectionRule {
        section: Section::ArchitectureDiagram,
        header: SECTION_HEADERS[5],
        end: SectionEnd::Fence,
    },
    SectionRule {
        section: Section::DataFlowDiagram,
        header: SECTION_HEADERS[6],
        end: SectionEnd::Fence,
    },
];

impl SectionRule {
    fn pattern(&self) -> String {
        let header = regex::escape(self.header);
        match self.end {
            SectionEnd::NextHeader(next) => {
                format!(r"(?is){header}\s*\n(.*?)(?:{}|\z)", regex::escape(next))
            }
            SectionEnd::Fence => format!(r"(?is){header}\s*\n```mermaid\s*\n(.*?)\n```"),
        }
    }
}

fn compiled_rules() -> &'static [(Section, Regex)] {
    static RULES: OnceLock<Vec<(Section, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        SECTION_RULES
            .iter()
            .map(|rule| (rule.section, Regex::new(&rule.pattern()).unwrap()))
            .collect()
    })
}

/// The seven named fields of a parsed reply. Fields that were not found are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub overview: String,
    pub architecture: String,
    pub modules: String,
    pub data_flow: String,
    pub design_patterns: String,
    pub architecture_diagram: String,
    pub data_flow_diagram: String,
}

impl AnalysisSections {
    pub fn get(&self, section: Section) -> &str {
        match section {
            Section::Overview => &self.overview,
            Section::Architecture => &self.architecture,
            Section::Modules => &self.modules,
            Section::DataFlow => &self.data_flow,
            Section::DesignPatterns => &self.design_patterns,
            Section::ArchitectureDiagram => &self.architecture_diagram,
            Section::DataFlowDiagram => &self.data_flow_diagram,
        }
    }

    fn slot(&mut self, section: Section) -> &mut String {
        match section {
            Section::Overview => &mut self.overview,
            Section::Architecture => &mut self.architecture,
            Section::Modules => &mut self.modules,
            Section::DataFlow => &mut self.data_flow,
            Section::DesignPatterns => &mut self.design_patterns,
            Section::ArchitectureDiagram => &mut self.architecture_diagram,
            Section::DataFlowDiagram => &mut self.data_flow_diagram,
        }
    }

    pub fn is_empty(&self) -> bool {
        SECTION_RULES.iter().all(|rule| self.get(rule.section).is_empty())
    }
}

/// Parse a reply. Pure: the same text always yields the same sections.
pub fn parse_analysis_response(text: &str) -> AnalysisSections {
    let mut sections = AnalysisSections::default();

    for (section, regex) in compiled_rules() {
        if let Some(body) = regex.captures(text).and_then(|c| c.get(1)) {
            *sections.slot(*section) = body.as_str().trim().to_string();
        }
    }

    if sections.is_empty() {
        tracing::warn!(
            reply_len = text.len(),
            "Reply did not follow the section template, using it as the overview"
        );
        sections.overview = text.to_string();
    }
    sections
}

/// One row of the module breakdown table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRow {
    pub name: String,
    pub purpose: String,
    pub files: String,
    pub dependencies: String,
}

/// Turn a bulleted modules section into table rows.
///
/// A `- ` or `* ` bullet starts a row; text after its first `:` is the purpose. The
/// next two non-empty lines fill `files` and then `dependencies`; further lines are
/// ignored.
pub fn modules_table(modules_text: &str) -> Vec<ModuleRow> {
    let mut rows = Vec::new();
    let mut current: Option<ModuleRow> = None;

    for line in modules_text.lines().map(str::trim) {
        if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            if let Some(row) = current.take() {
                rows.push(row);
            }
            let (name, purpose) = match item.split_once(':') {
                Some((name, purpose)) => (name.trim(), purpose.trim()),
                None => (item.trim(), ""),
            };
            current = Some(ModuleRow {
                name: name.to_string(),
                purpose: purpose.to_string(),
                ..ModuleRow::default()
            });
        } else if let Some(row) = current.as_mut() {
            if line.is_empty() {
                continue;
            }
            if row.files.is_empty() {
                row.files = line.to_string();
            } else if row.dependencies.is_empty() {
                row.dependencies = line.to_string();
            }
        }
    }
    rows.extend(current);
    rows
}

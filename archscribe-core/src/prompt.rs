//! Assembles the analysis prompt from a [`CrawlResult`].
//!
//! The output is a pure function of its inputs. The seven numbered headers in the
//! output template are matched verbatim by [`crate::parser`].

use serde::{Deserialize, Serialize};

use crate::crawler::{CrawlResult, FetchedFile};
use crate::parser::SECTION_HEADERS;
use crate::rules::CrawlRules;

pub const MAX_PROMPT_FILES: usize = 25;
pub const MAX_FILE_CHARS: usize = 15_000;
pub const MAX_LISTED_DIRECTORIES: usize = 20;
pub const TRUNCATION_MARKER: &str = "...\n[File truncated for analysis]";

/// Switches for the analysis requirements block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub include_diagrams: bool,
    pub include_patterns: bool,
    pub include_dependencies: bool,
    pub include_data_flow: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_diagrams: true,
            include_patterns: true,
            include_dependencies: true,
            include_data_flow: true,
        }
    }
}

const SECTION_INSTRUCTIONS: [&str; 7] = [
    "Provide a high-level summary of the project's purpose, main functionality, and architectural approach.",
    "Describe the high-level architecture, how major components interact, and the overall system design.",
    "Create a detailed breakdown of major modules/components:\n- Module name\n- Purpose/responsibility\n- Key files\n- Dependencies",
    "Explain how data flows through the system from user input to final output.",
    "Identify and explain the key design patterns used in the codebase.",
    "Provide a Mermaid diagram showing the main architectural components and their relationships.",
    "Provide a Mermaid diagram showing data flow through the system.",
];

/// Fetched files in prompt order: priority names first, then ascending size.
/// Ties keep path order.
pub fn select_prompt_files<'a>(crawl: &'a CrawlResult, rules: &CrawlRules) -> Vec<&'a FetchedFile> {
    let mut files: Vec<&FetchedFile> = crawl.fetched.values().collect();
    files.sort_by_key(|f| (!rules.is_priority_path(&f.path), f.size));
    files.truncate(MAX_PROMPT_FILES);
    files
}

/// First [`MAX_FILE_CHARS`] characters of `content`, followed by
/// [`TRUNCATION_MARKER`] if anything was cut.
pub fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(MAX_FILE_CHARS) {
        Some((cut, _)) => format!("{}{}", &content[..cut], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}

fn structure_summary(crawl: &CrawlResult) -> String {
    let stats = &crawl.statistics;
    let directories: Vec<&str> = crawl
        .directories
        .iter()
        .take(MAX_LISTED_DIRECTORIES)
        .map(String::as_str)
        .collect();
    format!(
        "## Repository Structure:\n\
         - Total files: {}\n\
         - Code files: {}\n\
         - Analyzed files: {}\n\
         - Skipped files: {}\n\
         - Main directories: {}\n\n",
        stats.total_files,
        stats.code_files,
        stats.analyzed_files,
        stats.skipped_files,
        directories.join(", ")
    )
}

fn key_files_section(files: &[&FetchedFile]) -> String {
    let mut out = String::from("## Key Files Content:\n");
    for file in files {
        let lang = file.extension.trim_start_matches('.');
        out.push_str(&format!(
            "\n### {}:\n```{}\n{}\n```\n",
            file.path,
            lang,
            truncate_content(&file.content)
        ));
    }
    out
}

fn requirements(options: &AnalysisOptions) -> Vec<&'static str> {
    let mut reqs = Vec::new();
    if options.include_diagrams {
        reqs.push("- Generate Mermaid diagrams showing component relationships");
    }
    if options.include_patterns {
        reqs.push("- Identify and explain design patterns used");
    }
    if options.include_dependencies {
        reqs.push("- Analyze module dependencies and relationships");
    }
    if options.include_data_flow {
        reqs.push("- Describe data flow from input to output");
    }
    reqs
}

fn output_template() -> String {
    SECTION_HEADERS
        .iter()
        .zip(SECTION_INSTRUCTIONS.iter())
        .map(|(header, instruction)| format!("{header}\n{instruction}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full prompt text for one crawl.
pub fn build_analysis_prompt(
    crawl: &CrawlResult,
    options: &AnalysisOptions,
    rules: &CrawlRules,
) -> String {
    let files = select_prompt_files(crawl, rules);
    tracing::debug!(
        selected = files.len(),
        fetched = crawl.fetched.len(),
        "Selected files for prompt"
    );

    format!(
        "You are a senior software architect analyzing a complete codebase. Based on the repository structure and key files provided below, create comprehensive architecture documentation.\n\n\
         {summary}\n\n\
         {key_files}\n\n\
         ## Analysis Requirements:\n\
         {requirements}\n\n\
         ## Required Output Format:\n\
         Please provide your analysis in the following structured format:\n\n\
         {template}\n\
         Please be thorough and developer-friendly in your analysis. Focus on actionable insights that would help new developers understand and contribute to the codebase.\n",
        summary = structure_summary(crawl),
        key_files = key_files_section(&files),
        requirements = requirements(options).join("\n"),
        template = output_template(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::RepositoryMetadata;
    use crate::crawler::CrawlStatistics;
    use indexmap::IndexMap;

    fn crawl_with(files: Vec<(&str, &str, u64)>) -> CrawlResult {
        let mut fetched = IndexMap::new();
        for (path, content, size) in files {
            fetched.insert(
                path.to_string(),
                FetchedFile {
                    path: path.to_string(),
                    content: content.to_string(),
                    size,
                    extension: crate::rules::extension_of(path),
                },
            );
        }
        CrawlResult {
            repository: RepositoryMetadata {
                full_name: "acme/widgets".into(),
                description: String::new(),
                language: "Python".into(),
                stars: 0,
                forks: 0,
            },
            files: Vec::new(),
            directories: vec!["src".into()],
            fetched,
            statistics: CrawlStatistics {
                total_files: 3,
                code_files: 2,
                analyzed_files: 2,
                skipped_files: 1,
                languages: IndexMap::new(),
            },
        }
    }

    #[test]
    fn priority_files_sort_first_then_by_size() {
        let crawl = crawl_with(vec![
            ("src/big.py", "x", 900),
            ("src/small.py", "x", 10),
            ("README.md", "x", 500),
            ("pkg/Cargo.toml", "x", 700),
        ]);
        let rules = CrawlRules::default();
        let order: Vec<&str> = select_prompt_files(&crawl, &rules)
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        assert_eq!(order, vec!["README.md", "pkg/Cargo.toml", "src/small.py", "src/big.py"]);
    }

    #[test]
    fn at_most_25_files_are_selected() {
        let paths: Vec<String> = (0..40).map(|i| format!("src/m{i:02}.py")).collect();
        let crawl = crawl_with(
            paths
                .iter()
                .enumerate()
                .map(|(i, p)| (p.as_str(), "pass", 100 + i as u64))
                .collect(),
        );
        let rules = CrawlRules::default();
        let selected = select_prompt_files(&crawl, &rules);
        assert_eq!(selected.len(), MAX_PROMPT_FILES);
        assert_eq!(selected[0].path, "src/m00.py");
        assert_eq!(selected[24].path, "src/m24.py");

        let prompt = build_analysis_prompt(&crawl, &AnalysisOptions::default(), &rules);
        assert!(prompt.contains("### src/m24.py:"));
        assert!(!prompt.contains("### src/m25.py:"));
    }

    #[test]
    fn long_content_is_cut_at_exact_char_count() {
        let content = "é".repeat(MAX_FILE_CHARS + 10);
        let cut = truncate_content(&content);
        assert!(cut.ends_with(TRUNCATION_MARKER));
        let kept = cut.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(kept.chars().count(), MAX_FILE_CHARS);

        let exact = "a".repeat(MAX_FILE_CHARS);
        assert_eq!(truncate_content(&exact), exact);
    }

    #[test]
    fn oversized_file_section_holds_exact_cut_then_closing_fence() {
        let content = "a".repeat(MAX_FILE_CHARS + 500);
        let crawl = crawl_with(vec![("src/big.py", &content, 90_000)]);
        let prompt = build_analysis_prompt(&crawl, &AnalysisOptions::default(), &CrawlRules::default());

        let expected = format!(
            "### src/big.py:\n```py\n{}{}\n```\n",
            "a".repeat(MAX_FILE_CHARS),
            TRUNCATION_MARKER
        );
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"a".repeat(MAX_FILE_CHARS + 1)));
    }

    #[test]
    fn prompt_contains_summary_requirements_and_template() {
        let crawl = crawl_with(vec![("src/app.py", "print('hi')", 11)]);
        let options = AnalysisOptions {
            include_diagrams: false,
            include_patterns: true,
            include_dependencies: false,
            include_data_flow: true,
        };
        let prompt = build_analysis_prompt(&crawl, &options, &CrawlRules::default());

        assert!(prompt.contains("- Total files: 3\n"));
        assert!(prompt.contains("- Skipped files: 1\n"));
        assert!(prompt.contains("- Main directories: src\n"));
        assert!(prompt.contains("### src/app.py:\n```py\nprint('hi')\n```\n"));
        assert!(prompt.contains("- Identify and explain design patterns used"));
        assert!(prompt.contains("- Describe data flow from input to output"));
        assert!(!prompt.contains("- Generate Mermaid diagrams"));
        assert!(!prompt.contains("- Analyze module dependencies"));

        let mut last = 0;
        for header in SECTION_HEADERS {
            let pos = prompt.find(header).expect("header present");
            assert!(pos >= last, "{header} out of order");
            last = pos;
        }
    }

    #[test]
    fn prompt_is_deterministic() {
        let crawl = crawl_with(vec![("a.py", "1", 1), ("b.py", "2", 1)]);
        let rules = CrawlRules::default();
        let options = AnalysisOptions::default();
        assert_eq!(
            build_analysis_prompt(&crawl, &options, &rules),
            build_analysis_prompt(&crawl, &options, &rules)
        );
    }

    #[test]
    fn directory_list_is_capped() {
        let mut crawl = crawl_with(vec![]);
        crawl.directories = (0..30).map(|i| format!("d{i}")).collect();
        let prompt = build_analysis_prompt(&crawl, &AnalysisOptions::default(), &CrawlRules::default());
        assert!(prompt.contains("d19\n"));
        assert!(!prompt.contains("d20"));
    }
}

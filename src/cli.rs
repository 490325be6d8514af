//! CLI glue for archscribe: command parsing, wiring of the HTTP clients and printing
//! of results.
//!
//! All domain logic (crawling, prompt assembly, reply parsing, rendering) lives in the
//! [`archscribe_core`] crate. This module only resolves configuration, builds the
//! clients and hands over to the core.
//!
//! ## Subcommands
//! - `analyze`: full pipeline, writes the exports and prints a summary
//! - `crawl`: crawl only and print statistics; needs no analysis key
//! - `prompt`: crawl and print the assembled prompt to stdout
//!
//! [`run`] is the async entrypoint used by `main` and by the integration tests.

use std::path::PathBuf;

use anyhow::Result;
use archscribe_core::analysis::main_language;
use archscribe_core::crawler::{CrawlResult, Crawler};
use archscribe_core::export::{format_file_size, ExportFormat};
use archscribe_core::gemini::GeminiClient;
use archscribe_core::github::GitHubClient;
use archscribe_core::prompt::build_analysis_prompt;
use archscribe_core::{AnalysisReport, Analyzer, RepositoryLocation};
use clap::{Parser, Subcommand};

use crate::load_config::{load_optional_config, AppConfig, Secrets};
use crate::output::{generated_on_today, write_exports, WrittenExport};

/// CLI for archscribe: architecture documentation for GitHub repositories.
#[derive(Parser)]
#[clap(
    name = "archscribe",
    version,
    about = "Crawl a GitHub repository and generate architecture documentation with an LLM"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a repository and write the documentation exports
    Analyze {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Do not ask for Mermaid diagrams
        #[clap(long)]
        no_diagrams: bool,
        /// Do not ask for design patterns
        #[clap(long)]
        no_patterns: bool,
        /// Do not ask for module dependencies
        #[clap(long)]
        no_dependencies: bool,
        /// Do not ask for data flow
        #[clap(long)]
        no_data_flow: bool,
        /// Directory the exports are written to
        #[clap(long)]
        output_dir: Option<PathBuf>,
        /// Export formats (markdown, pdf, json, docx); repeat or comma-separate
        #[clap(long = "format", value_delimiter = ',')]
        formats: Vec<ExportFormat>,
    },
    /// Crawl a repository and print statistics
    Crawl {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Crawl a repository and print the analysis prompt
    Prompt {
        /// Repository URL, e.g. https://github.com/owner/repo
        url: String,
        /// Path to the YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emitted first so tests can observe that tracing is live.
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Analyze {
            url,
            config,
            no_diagrams,
            no_patterns,
            no_dependencies,
            no_data_flow,
            output_dir,
            formats,
        } => {
            let location = RepositoryLocation::parse(&url)?;
            let mut config = load_optional_config(config.as_deref())?;
            let options = &mut config.options;
            options.include_diagrams &= !no_diagrams;
            options.include_patterns &= !no_patterns;
            options.include_dependencies &= !no_dependencies;
            options.include_data_flow &= !no_data_flow;
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if !formats.is_empty() {
                config.output.formats = formats;
            }
            analyze(&location, &config).await
        }
        Commands::Crawl { url, config } => {
            let location = RepositoryLocation::parse(&url)?;
            let config = load_optional_config(config.as_deref())?;
            let crawl = crawl(&location, &config).await?;
            println!("{}", crawl_summary(&crawl));
            Ok(())
        }
        Commands::Prompt { url, config } => {
            let location = RepositoryLocation::parse(&url)?;
            let config = load_optional_config(config.as_deref())?;
            let crawl = crawl(&location, &config).await?;
            let prompt = build_analysis_prompt(&crawl, &config.options, &config.crawl_rules());
            println!("{prompt}");
            Ok(())
        }
    }
}

fn github_client(config: &AppConfig, secrets: &Secrets) -> Result<GitHubClient> {
    GitHubClient::new(
        &config.github.api_url,
        secrets.github_token.as_deref(),
        config.github_timeout(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to build GitHub client: {e}"))
}

async fn crawl(location: &RepositoryLocation, config: &AppConfig) -> Result<CrawlResult> {
    let secrets = Secrets::from_env();
    let github = github_client(config, &secrets)?;
    let rules = config.crawl_rules();
    tracing::info!(command = "crawl", repository = %location, "Starting crawl");
    Ok(Crawler::new(&github, &rules).crawl(location).await?)
}

async fn analyze(location: &RepositoryLocation, config: &AppConfig) -> Result<()> {
    let secrets = Secrets::from_env();
    let api_key = secrets.require_gemini_api_key()?;
    let github = github_client(config, &secrets)?;
    let gemini = GeminiClient::new(api_key.to_string(), config.gemini_settings())
        .map_err(|e| anyhow::anyhow!("Failed to build analysis client: {e}"))?;
    let rules = config.crawl_rules();

    tracing::info!(command = "analyze", repository = %location, "Starting analysis");
    let report = Analyzer::new(&github, &gemini, &rules)
        .analyze(location.url(), &config.options)
        .await?;

    let written = write_exports(
        &report,
        &config.output.formats,
        &config.output.dir,
        &generated_on_today(),
    )?;
    println!("{}", analysis_summary(&report, &written));
    Ok(())
}

fn crawl_summary(crawl: &CrawlResult) -> String {
    let stats = &crawl.statistics;
    let mut out = format!(
        "Repository: {}\n\
         Total files: {}\n\
         Code files: {}\n\
         Analyzed files: {}\n\
         Skipped files: {}\n\
         Main language: {}\n\
         Directories: {}\n",
        crawl.repository.full_name,
        stats.total_files,
        stats.code_files,
        stats.analyzed_files,
        stats.skipped_files,
        main_language(&stats.languages),
        crawl.directories.len(),
    );
    if !stats.languages.is_empty() {
        out.push_str("Extensions:\n");
        for (ext, count) in &stats.languages {
            out.push_str(&format!("  {ext}: {count}\n"));
        }
    }
    out
}

fn analysis_summary(report: &AnalysisReport, written: &[WrittenExport]) -> String {
    let stats = &report.result.key_statistics;
    let mut out = format!(
        "Analysis of {} complete\n\
         Files: {} total, {} code, {} analyzed, {} skipped\n\
         Main language: {}\n",
        report.repository.full_name,
        stats.total_files,
        stats.code_files,
        stats.analyzed_files,
        stats.skipped_files,
        stats.main_language,
    );
    for export in written {
        out.push_str(&format!(
            "Wrote {} ({})\n",
            export.path.display(),
            format_file_size(export.bytes)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use archscribe_core::contract::RepositoryMetadata;
    use archscribe_core::crawler::CrawlStatistics;
    use indexmap::IndexMap;

    #[test]
    fn crawl_summary_lists_counts_and_extensions() {
        let mut languages = IndexMap::new();
        languages.insert(".py".to_string(), 2);
        languages.insert(".md".to_string(), 1);
        let crawl = CrawlResult {
            repository: RepositoryMetadata {
                full_name: "acme/widgets".into(),
                description: String::new(),
                language: "Python".into(),
                stars: 0,
                forks: 0,
            },
            files: Vec::new(),
            directories: vec!["src".into()],
            fetched: IndexMap::new(),
            statistics: CrawlStatistics {
                total_files: 4,
                code_files: 3,
                analyzed_files: 3,
                skipped_files: 1,
                languages,
            },
        };

        let summary = crawl_summary(&crawl);
        assert!(summary.starts_with("Repository: acme/widgets\n"));
        assert!(summary.contains("Main language: PY\n"));
        assert!(summary.contains("Extensions:\n  .py: 2\n  .md: 1\n"));
    }

    #[test]
    fn cli_parses_repeated_and_comma_separated_formats() {
        let cli = Cli::try_parse_from([
            "archscribe",
            "analyze",
            "https://github.com/acme/widgets",
            "--format",
            "pdf,json",
            "--format",
            "md",
            "--no-patterns",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                formats,
                no_patterns,
                no_diagrams,
                ..
            } => {
                assert_eq!(
                    formats,
                    vec![ExportFormat::Pdf, ExportFormat::Json, ExportFormat::Markdown]
                );
                assert!(no_patterns);
                assert!(!no_diagrams);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let result = Cli::try_parse_from([
            "archscribe",
            "analyze",
            "https://github.com/acme/widgets",
            "--format",
            "odt",
        ]);
        assert!(result.is_err());
    }
}

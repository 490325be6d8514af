//! High-level pipeline: location → crawl → prompt → analysis call → parsed result.
//!
//! # Major Types
//! - [`Analyzer`]: holds the collaborators and rules for a run
//! - [`AnalysisReport`]: everything exporters need (location, metadata, result)
//!
//! # Error Handling
//! Fails fast on an invalid location, a missing repository or a failed analysis
//! call. Everything else is absorbed by the crawler.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::contract::{AnalysisClient, RepositoryHost, RepositoryMetadata};
use crate::crawler::{CrawlResult, Crawler};
use crate::error::AnalyzerError;
use crate::location::RepositoryLocation;
use crate::parser::{parse_analysis_response, AnalysisSections};
use crate::prompt::{build_analysis_prompt, AnalysisOptions};
use crate::rules::CrawlRules;

/// Summary counters shown next to the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStatistics {
    pub total_files: usize,
    pub code_files: usize,
    pub analyzed_files: usize,
    pub skipped_files: usize,
    pub main_language: String,
    pub modules_count: usize,
}

impl KeyStatistics {
    pub fn from_crawl(crawl: &CrawlResult) -> Self {
        let stats = &crawl.statistics;
        Self {
            total_files: stats.total_files,
            code_files: stats.code_files,
            analyzed_files: stats.analyzed_files,
            skipped_files: stats.skipped_files,
            main_language: main_language(&stats.languages),
            modules_count: crawl.directories.len(),
        }
    }
}

/// Most frequent extension, without its dot and uppercased; "Unknown" when empty.
/// Ties go to the extension seen first during the crawl.
pub fn main_language(languages: &IndexMap<String, usize>) -> String {
    let mut best: Option<(&String, usize)> = None;
    for (ext, &count) in languages {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((ext, count));
        }
    }
    match best {
        Some((ext, _)) => ext.replace('.', "").to_uppercase(),
        None => "Unknown".to_string(),
    }
}

/// Parsed sections plus the derived statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub sections: AnalysisSections,
    pub key_statistics: KeyStatistics,
}

/// Result of a full run, as consumed by the exporters.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub location: RepositoryLocation,
    pub repository: RepositoryMetadata,
    pub result: AnalysisResult,
}

pub struct Analyzer<'a, H: RepositoryHost + ?Sized, A: AnalysisClient + ?Sized> {
    host: &'a H,
    client: &'a A,
    rules: &'a CrawlRules,
}

impl<'a, H, A> Analyzer<'a, H, A>
where
    H: RepositoryHost + ?Sized,
    A: AnalysisClient + ?Sized,
{
    pub fn new(host: &'a H, client: &'a A, rules: &'a CrawlRules) -> Self {
        Self { host, client, rules }
    }

    /// Parse `url` and crawl the repository behind it.
    pub async fn crawl(&self, url: &str) -> Result<(RepositoryLocation, CrawlResult), AnalyzerError> {
        let location = RepositoryLocation::parse(url)?;
        let crawl = Crawler::new(self.host, self.rules).crawl(&location).await?;
        Ok((location, crawl))
    }

    /// Run the whole pipeline for `url`.
    pub async fn analyze(
        &self,
        url: &str,
        options: &AnalysisOptions,
    ) -> Result<AnalysisReport, AnalyzerError> {
        info!(url, ?options, "Starting repository analysis");
        let (location, crawl) = self.crawl(url).await?;

        let prompt = build_analysis_prompt(&crawl, options, self.rules);
        info!(repository = %location, prompt_chars = prompt.len(), "Sending analysis request");

        let reply = self.client.generate(&prompt).await.map_err(|e| {
            error!(repository = %location, error = %e, "Analysis call failed");
            AnalyzerError::AnalysisCallFailed(e.to_string())
        })?;

        let sections = parse_analysis_response(&reply);
        let key_statistics = KeyStatistics::from_crawl(&crawl);
        info!(
            repository = %location,
            main_language = %key_statistics.main_language,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            location,
            repository: crawl.repository,
            result: AnalysisResult {
                sections,
                key_statistics,
            },
        })
    }
}

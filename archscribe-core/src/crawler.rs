//! Breadth-first repository crawler.
//!
//! Walks the repository tree through [`RepositoryHost::list_contents`], one call at a
//! time, pruning skip-eligible subtrees and downloading the content of fetch-eligible
//! files. Listing and fetch failures are logged and absorbed; only the initial
//! metadata lookup can fail the crawl.

use std::collections::{HashSet, VecDeque};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::contract::{EntryKind, RepositoryHost, RepositoryMetadata, TreeEntry};
use crate::error::AnalyzerError;
use crate::location::RepositoryLocation;
use crate::rules::{extension_of, file_type_label, CrawlRules};

/// A non-skipped file seen during the crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub size: u64,
    /// Type label inferred from the extension ("Other" when unknown).
    pub file_type: String,
}

/// A file whose raw content was downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedFile {
    pub path: String,
    pub content: String,
    pub size: u64,
    /// Lowercased, dot-prefixed extension (may be empty).
    pub extension: String,
}

/// Counters accumulated during a crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    pub total_files: usize,
    pub code_files: usize,
    pub analyzed_files: usize,
    pub skipped_files: usize,
    /// Occurrences per code extension, in first-seen order.
    pub languages: IndexMap<String, usize>,
}

/// Everything the crawler hands over to the prompt assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub repository: RepositoryMetadata,
    pub files: Vec<FileRecord>,
    pub directories: Vec<String>,
    /// Keyed by path, in crawl order.
    pub fetched: IndexMap<String, FetchedFile>,
    pub statistics: CrawlStatistics,
}

pub struct Crawler<'a, H: RepositoryHost + ?Sized> {
    host: &'a H,
    rules: &'a CrawlRules,
}

impl<'a, H: RepositoryHost + ?Sized> Crawler<'a, H> {
    pub fn new(host: &'a H, rules: &'a CrawlRules) -> Self {
        Self { host, rules }
    }

    /// Crawl the repository at `location`.
    ///
    /// Fails with [`AnalyzerError::RepositoryNotFound`] if the metadata lookup does
    /// not succeed; in that case no listing call is issued.
    pub async fn crawl(&self, location: &RepositoryLocation) -> Result<CrawlResult, AnalyzerError> {
        let repository = match self.host.repository_metadata(location).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::error!(repository = %location, error = %e, "Repository metadata lookup failed");
                return Err(AnalyzerError::RepositoryNotFound(location.full_name()));
            }
        };
        info!(repository = %location, "Starting repository crawl");

        let mut result = CrawlResult {
            repository,
            files: Vec::new(),
            directories: Vec::new(),
            fetched: IndexMap::new(),
            statistics: CrawlStatistics::default(),
        };

        let mut queue: VecDeque<String> = VecDeque::from([String::new()]);
        let mut processed: HashSet<String> = HashSet::new();
        let mut discovered: HashSet<String> = HashSet::new();

        while let Some(current) = queue.pop_front() {
            if !processed.insert(current.clone()) {
                debug!(path = %current, "Path already listed, skipping");
                continue;
            }

            if !current.is_empty() && self.rules.should_skip(&current) {
                debug!(path = %current, "Skipping path");
                result.statistics.skipped_files += 1;
                continue;
            }

            let entries = match self.host.list_contents(location, &current).await {
                Ok(entries) => entries,
                Err(e) => {
                    let err = AnalyzerError::ListingUnavailable {
                        path: current.clone(),
                        reason: e.to_string(),
                    };
                    warn!(error = %err, "Treating listing as empty");
                    Vec::new()
                }
            };

            for entry in entries {
                if self.rules.should_skip(&entry.path) {
                    debug!(path = %entry.path, kind = ?entry.kind, "Skipping entry");
                    result.statistics.skipped_files += 1;
                    continue;
                }

                match entry.kind {
                    EntryKind::Dir => {
                        if discovered.insert(entry.path.clone()) {
                            result.directories.push(entry.path.clone());
                        }
                        queue.push_back(entry.path);
                    }
                    EntryKind::File => self.visit_file(entry, &mut result).await,
                    EntryKind::Other => {
                        debug!(path = %entry.path, "Ignoring entry that is neither file nor directory");
                    }
                }
            }
        }

        info!(
            repository = %location,
            total_files = result.statistics.total_files,
            code_files = result.statistics.code_files,
            analyzed_files = result.statistics.analyzed_files,
            skipped_files = result.statistics.skipped_files,
            directories = result.directories.len(),
            "Repository crawl complete"
        );
        Ok(result)
    }

    async fn visit_file(&self, entry: TreeEntry, result: &mut CrawlResult) {
        let ext = extension_of(&entry.name);

        result.files.push(FileRecord {
            path: entry.path.clone(),
            name: entry.name.clone(),
            size: entry.size,
            file_type: file_type_label(&entry.name).to_string(),
        });
        result.statistics.total_files += 1;

        if self.rules.is_code_extension(&ext) {
            result.statistics.code_files += 1;
            *result.statistics.languages.entry(ext.clone()).or_insert(0) += 1;
        }

        if !self.rules.should_fetch(&entry.name, &ext, entry.size) {
            debug!(path = %entry.path, size = entry.size, "File not eligible for fetching");
            return;
        }

        let fetched = match entry.download_url.as_deref() {
            Some(url) => self.host.fetch_raw(url).await,
            None => Err("no download locator".into()),
        };

        match fetched {
            Ok(content) => {
                debug!(path = %entry.path, bytes = content.len(), "Fetched file content");
                result.fetched.insert(
                    entry.path.clone(),
                    FetchedFile {
                        path: entry.path,
                        content,
                        size: entry.size,
                        extension: ext,
                    },
                );
                result.statistics.analyzed_files += 1;
            }
            Err(e) => {
                let err = AnalyzerError::FetchUnavailable {
                    path: entry.path,
                    reason: e.to_string(),
                };
                warn!(error = %err, "Leaving file content out of the analysis");
            }
        }
    }
}

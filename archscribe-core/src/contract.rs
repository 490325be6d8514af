//! # contract: seams to the remote collaborators
//!
//! The crawler and the analysis pipeline talk to the outside world only through the
//! two traits defined here:
//!
//! - [`RepositoryHost`]: repository metadata, directory listings and raw file content
//!   (implemented by [`crate::github::GitHubClient`]).
//! - [`AnalysisClient`]: the opaque text-in/text-out analysis call
//!   (implemented by [`crate::gemini::GeminiClient`]).
//!
//! Both are annotated for `mockall`, so tests (and downstream crates with the
//! `test-export-mocks` feature) get `MockRepositoryHost` and `MockAnalysisClient`.
//! Clients are passed in explicitly at construction time; there is no global client state.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::location::RepositoryLocation;

/// Kind of an entry in a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
    /// Symlinks, submodules and anything else the crawler does not follow.
    #[serde(other)]
    Other,
}

/// A single item returned by the listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Entry name (e.g. `app.py`).
    pub name: String,
    /// Slash-separated path relative to the repository root (e.g. `src/app.py`).
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes; 0 for directories.
    #[serde(default)]
    pub size: u64,
    /// Direct download locator for files.
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Repository descriptor returned by the metadata call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub full_name: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub forks: u64,
}

/// Remote repository host (GitHub REST API or a test double).
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Look up the repository descriptor. Any error means "not found or not accessible".
    async fn repository_metadata(
        &self,
        location: &RepositoryLocation,
    ) -> Result<RepositoryMetadata, HostError>;

    /// List the immediate children of `path` ("" is the root).
    async fn list_contents(
        &self,
        location: &RepositoryLocation,
        path: &str,
    ) -> Result<Vec<TreeEntry>, HostError>;

    /// Download raw text content from a direct download locator.
    async fn fetch_raw(&self, download_url: &str) -> Result<String, HostError>;
}

/// The opaque analysis call: prompt in, reply text out.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, HostError>;
}

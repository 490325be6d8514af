//! Repository identifiers extracted from GitHub URLs.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::AnalyzerError;

fn location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:https?://)?github\.com/([A-Za-z0-9._-]+)/([A-Za-z0-9._-]+?)(?:\.git)?/?$")
            .unwrap()
    })
}

/// Owner and repository name of a GitHub repository. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryLocation {
    owner: String,
    name: String,
    url: String,
}

impl RepositoryLocation {
    /// Parses `https://github.com/<owner>/<repo>` (optionally with `.git` or a trailing
    /// slash, optionally without scheme).
    pub fn parse(url: &str) -> Result<Self, AnalyzerError> {
        let trimmed = url.trim();
        let captures = location_pattern()
            .captures(trimmed)
            .ok_or_else(|| AnalyzerError::InvalidLocation(url.to_string()))?;

        let owner = captures[1].to_string();
        let name = captures[2].to_string();
        // The lazy name group leaves `.git` behind when nothing precedes it.
        let bare_suffix = name.strip_suffix(".git") == Some("");
        if owner.chars().all(|c| c == '.') || name.chars().all(|c| c == '.') || bare_suffix {
            return Err(AnalyzerError::InvalidLocation(url.to_string()));
        }

        tracing::debug!(%owner, %name, "Parsed repository location");
        Ok(Self {
            owner,
            name,
            url: trimmed.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

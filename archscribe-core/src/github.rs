//! GitHub REST implementation of [`RepositoryHost`].
//!
//! - `GET /repos/{owner}/{repo}` for metadata
//! - `GET /repos/{owner}/{repo}/contents/{path}` for listings
//! - `GET <download_url>` for raw content
//!
//! The base URL is configurable so the client can be pointed at a mock server or a
//! GitHub Enterprise instance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::contract::{RepositoryHost, RepositoryMetadata, TreeEntry};
use crate::error::HostError;
use crate::location::RepositoryLocation;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = "archscribe";

/// Raw repository descriptor; every field may be missing or null.
#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    full_name: Option<String>,
    description: Option<String>,
    language: Option<String>,
    stargazers_count: Option<u64>,
    forks_count: Option<u64>,
}

/// The contents endpoint returns an array for directories and an object for files.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsPayload {
    Many(Vec<TreeEntry>),
    One(TreeEntry),
}

pub struct GitHubClient {
    client: Client,
    api_url: String,
}

impl GitHubClient {
    /// Build a client against `api_url` (e.g. [`DEFAULT_API_URL`]). The token is optional
    /// and only raises rate limits / grants access to private repositories.
    pub fn new(api_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, HostError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("token {token}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        info!(
            api_url,
            authenticated = token.is_some_and(|t| !t.is_empty()),
            "Initialised GitHub client"
        );
        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, HostError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("GitHub returned {status} for {url}").into());
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    async fn repository_metadata(
        &self,
        location: &RepositoryLocation,
    ) -> Result<RepositoryMetadata, HostError> {
        let url = format!("{}/repos/{}/{}", self.api_url, location.owner(), location.name());
        debug!(%url, "Fetching repository metadata");
        let body = self.get_text(&url).await?;
        let payload: RepositoryPayload = serde_json::from_str(&body)?;

        Ok(RepositoryMetadata {
            full_name: payload.full_name.unwrap_or_else(|| location.full_name()),
            description: payload.description.unwrap_or_default(),
            language: payload.language.unwrap_or_else(|| "Unknown".to_string()),
            stars: payload.stargazers_count.unwrap_or(0),
            forks: payload.forks_count.unwrap_or(0),
        })
    }

    async fn list_contents(
        &self,
        location: &RepositoryLocation,
        path: &str,
    ) -> Result<Vec<TreeEntry>, HostError> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            location.owner(),
            location.name(),
            path
        );
        debug!(%url, "Listing repository contents");
        let body = self.get_text(&url).await?;
        let entries = match serde_json::from_str::<ContentsPayload>(&body)? {
            ContentsPayload::Many(entries) => entries,
            ContentsPayload::One(entry) => vec![entry],
        };
        Ok(entries)
    }

    async fn fetch_raw(&self, download_url: &str) -> Result<String, HostError> {
        debug!(url = %download_url, "Downloading raw file content");
        self.get_text(download_url).await
    }
}

//! `load_config` module: loads an optional static YAML config and the secrets from the
//! environment, and turns both into the settings the core crate expects.
//!
//! This module is the only place where user-supplied YAML is parsed and mapped to
//! strongly-typed structs.
//!
//! # Responsibilities
//! - Parse the YAML configuration file into [`AppConfig`]; every section and key is
//!   optional and falls back to the built-in defaults
//! - Read `GEMINI_API_KEY` and `GITHUB_TOKEN` from the environment into [`Secrets`]
//!   (the config file never holds secrets)
//! - Build [`CrawlRules`] and [`GeminiSettings`] from the parsed sections
//!
//! # Accepted schema
//! ```yaml
//! github:
//!   api_url: https://api.github.com
//!   timeout_secs: 30
//! analysis:
//!   api_url: https://generativelanguage.googleapis.com/v1beta/models
//!   model: gemini-2.5-pro
//!   temperature: 0.3
//!   max_output_tokens: 8192
//!   timeout_secs: 300
//! crawl:
//!   skip_tokens: [test, node_modules]   # replaces the default list
//!   extra_code_extensions: [ex, exs]
//!   fetch_size_threshold: 100000
//! options:
//!   include_diagrams: true
//!   include_patterns: true
//!   include_dependencies: true
//!   include_data_flow: true
//! output:
//!   dir: ./exports
//!   formats: [markdown, pdf, json, docx]
//! ```
//!
//! # Errors
//! All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use archscribe_core::export::ExportFormat;
use archscribe_core::gemini::{self, GeminiSettings};
use archscribe_core::{github, AnalysisOptions, CrawlRules};
use serde::Deserialize;
use tracing::{error, info};

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub github: GitHubSection,
    pub analysis: AnalysisSection,
    pub crawl: CrawlSection,
    pub options: AnalysisOptions,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GitHubSection {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for GitHubSection {
    fn default() -> Self {
        Self {
            api_url: github::DEFAULT_API_URL.to_string(),
            timeout_secs: github::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            api_url: gemini::DEFAULT_API_URL.to_string(),
            model: gemini::DEFAULT_MODEL.to_string(),
            temperature: gemini::DEFAULT_TEMPERATURE,
            max_output_tokens: gemini::DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: gemini::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrawlSection {
    /// Replaces the default skip tokens when present.
    pub skip_tokens: Option<Vec<String>>,
    pub extra_code_extensions: Vec<String>,
    pub fetch_size_threshold: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: PathBuf,
    pub formats: Vec<ExportFormat>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("exports"),
            formats: vec![ExportFormat::Markdown, ExportFormat::Pdf],
        }
    }
}

impl AppConfig {
    pub fn crawl_rules(&self) -> CrawlRules {
        let mut rules = CrawlRules::default()
            .with_extra_code_extensions(&self.crawl.extra_code_extensions);
        if let Some(tokens) = &self.crawl.skip_tokens {
            rules = rules.with_skip_tokens(tokens);
        }
        if let Some(threshold) = self.crawl.fetch_size_threshold {
            rules = rules.with_fetch_size_threshold(threshold);
        }
        rules
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            api_url: self.analysis.api_url.clone(),
            model: self.analysis.model.clone(),
            temperature: self.analysis.temperature,
            max_output_tokens: self.analysis.max_output_tokens,
            timeout: Duration::from_secs(self.analysis.timeout_secs),
        }
    }

    pub fn github_timeout(&self) -> Duration {
        Duration::from_secs(self.github.timeout_secs)
    }
}

/// Secrets injected from the environment. Empty values count as unset.
#[derive(Clone, Default)]
pub struct Secrets {
    pub gemini_api_key: Option<String>,
    pub github_token: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        let read = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        let secrets = Self {
            gemini_api_key: read(GEMINI_API_KEY_VAR),
            github_token: read(GITHUB_TOKEN_VAR),
        };
        info!(
            gemini_api_key_set = secrets.gemini_api_key.is_some(),
            github_token_set = secrets.github_token.is_some(),
            "Read secrets from environment"
        );
        secrets
    }

    pub fn require_gemini_api_key(&self) -> Result<&str> {
        self.gemini_api_key.as_deref().ok_or_else(|| {
            error!(var = GEMINI_API_KEY_VAR, "Analysis API key is not set");
            anyhow::anyhow!(
                "{GEMINI_API_KEY_VAR} is not set; export it or add it to a .env file"
            )
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Loads a static YAML config file (no secrets).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    // An empty file is a valid, all-defaults config.
    if config_content.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    let config: AppConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    Ok(config)
}

/// [`load_config`] when a path is given, the defaults otherwise.
pub fn load_optional_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            info!("No config file given, using defaults");
            Ok(AppConfig::default())
        }
    }
}

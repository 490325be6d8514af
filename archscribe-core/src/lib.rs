#![doc = "archscribe-core: core logic library for archscribe."]

//! This crate contains the domain logic for generating architecture documentation
//! from a GitHub repository:
//!
//! - [`crawler`]: breadth-first walk of the repository tree with skip/fetch rules
//! - [`prompt`]: deterministic prompt assembly from the crawl result
//! - [`parser`]: extraction of the seven reply sections
//! - [`analysis`]: the end-to-end pipeline and derived statistics
//! - [`export`]: Markdown, PDF, JSON and DOCX rendering
//!
//! Remote collaborators sit behind the traits in [`contract`]; [`github`] and
//! [`gemini`] provide the HTTP implementations.

pub mod analysis;
pub mod contract;
pub mod crawler;
pub mod error;
pub mod export;
pub mod gemini;
pub mod github;
pub mod location;
pub mod parser;
pub mod prompt;
pub mod rules;

pub use analysis::{AnalysisReport, AnalysisResult, Analyzer, KeyStatistics};
pub use error::AnalyzerError;
pub use location::RepositoryLocation;
pub use prompt::AnalysisOptions;
pub use rules::CrawlRules;

//! Skip, priority and fetch heuristics used while crawling a repository.

use std::collections::BTreeSet;
use std::path::Path;

/// Extensions counted as code (and always worth fetching).
pub const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".cpp", ".c", ".h", ".cs", ".php", ".rb",
    ".go", ".rs", ".swift", ".kt", ".scala", ".html", ".css", ".scss", ".sass", ".less",
    ".vue", ".svelte", ".json", ".xml", ".yaml", ".yml", ".toml", ".ini", ".cfg", ".md",
    ".txt", ".dockerfile", ".makefile", ".gradle", ".properties",
];

/// Well-known file names promoted to the front of the prompt (compared lowercased).
pub const PRIORITY_FILES: &[&str] = &[
    "package.json", "requirements.txt", "cargo.toml", "pom.xml", "build.gradle", "gemfile",
    "composer.json", "setup.py", "readme.md", "architecture.md", "design.md",
    "contributing.md", "dockerfile", "makefile", "changelog.md", "license",
];

/// Substrings that disqualify a path (and, for directories, its whole subtree).
pub const SKIP_TOKENS: &[&str] = &[
    "test", "tests", "__tests__", "spec", "specs", "__pycache__", "node_modules", ".git",
    ".github", "dist", "build", "target", "coverage", ".coverage", ".pytest_cache", ".tox",
    "venv", "env", ".env", "logs", "tmp", "temp", ".DS_Store", ".vscode", ".idea", "vendor",
    "public/assets", "static/assets", "assets/images",
];

/// Binary and media extensions that are never analysed.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".pdf", ".zip", ".tar", ".gz", ".exe",
    ".dmg", ".app", ".deb", ".rpm", ".msi",
];

/// Files below this size are fetched even when they are neither code nor priority files.
pub const FETCH_SIZE_THRESHOLD: u64 = 100_000;

const FILE_TYPE_LABELS: &[(&str, &str)] = &[
    (".py", "Python"),
    (".js", "JavaScript"),
    (".ts", "TypeScript"),
    (".jsx", "React JSX"),
    (".tsx", "React TSX"),
    (".java", "Java"),
    (".cpp", "C++"),
    (".c", "C"),
    (".h", "Header"),
    (".cs", "C#"),
    (".php", "PHP"),
    (".rb", "Ruby"),
    (".go", "Go"),
    (".rs", "Rust"),
    (".swift", "Swift"),
    (".kt", "Kotlin"),
    (".html", "HTML"),
    (".css", "CSS"),
    (".scss", "SCSS"),
    (".json", "JSON"),
    (".md", "Markdown"),
    (".yaml", "YAML"),
    (".yml", "YAML"),
    (".dockerfile", "Docker"),
    (".makefile", "Makefile"),
];

/// Lowercased, dot-prefixed extension of a file name; empty for dotfiles
/// (`.gitignore`) and names without an extension (`Dockerfile`).
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// Human-readable type label for a file name, "Other" when unknown.
pub fn file_type_label(name: &str) -> &'static str {
    let ext = extension_of(name);
    FILE_TYPE_LABELS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, label)| *label)
        .unwrap_or("Other")
}

/// The full set of crawl heuristics. Built from the defaults above, optionally
/// adjusted from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRules {
    skip_tokens: Vec<String>,
    media_extensions: BTreeSet<String>,
    code_extensions: BTreeSet<String>,
    priority_files: BTreeSet<String>,
    fetch_size_threshold: u64,
}

impl Default for CrawlRules {
    fn default() -> Self {
        Self {
            skip_tokens: SKIP_TOKENS.iter().map(|t| t.to_lowercase()).collect(),
            media_extensions: MEDIA_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            code_extensions: CODE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            priority_files: PRIORITY_FILES.iter().map(|f| f.to_string()).collect(),
            fetch_size_threshold: FETCH_SIZE_THRESHOLD,
        }
    }
}

impl CrawlRules {
    /// Replace the skip tokens. Tokens are lowercased since they are matched
    /// against the lowercased path.
    pub fn with_skip_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skip_tokens = tokens
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Add code extensions on top of the defaults (with or without the leading dot).
    pub fn with_extra_code_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = ext.as_ref().trim().to_lowercase();
            if ext.is_empty() {
                continue;
            }
            let ext = if ext.starts_with('.') { ext } else { format!(".{ext}") };
            self.code_extensions.insert(ext);
        }
        self
    }

    pub fn with_fetch_size_threshold(mut self, bytes: u64) -> Self {
        self.fetch_size_threshold = bytes;
        self
    }

    pub fn skip_tokens(&self) -> &[String] {
        &self.skip_tokens
    }

    pub fn fetch_size_threshold(&self) -> u64 {
        self.fetch_size_threshold
    }

    /// A path is skipped if any skip token occurs anywhere in its lowercased form, or
    /// if it ends in a media/binary extension. A single match anywhere skips the
    /// whole subtree.
    pub fn should_skip(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        if self.skip_tokens.iter().any(|t| lower.contains(t.as_str())) {
            return true;
        }
        self.media_extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    pub fn is_code_extension(&self, ext: &str) -> bool {
        self.code_extensions.contains(ext)
    }

    pub fn is_priority_name(&self, name: &str) -> bool {
        self.priority_files.contains(&name.to_lowercase())
    }

    /// Priority check on the last segment of a slash-separated path.
    pub fn is_priority_path(&self, path: &str) -> bool {
        let name = path.rsplit('/').next().unwrap_or(path);
        self.is_priority_name(name)
    }

    /// Fetch if the name is a priority name, the extension is code, or the file is
    /// smaller than the size threshold.
    pub fn should_fetch(&self, name: &str, ext: &str, size: u64) -> bool {
        self.is_priority_name(name)
            || self.is_code_extension(ext)
            || size < self.fetch_size_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_follows_last_dot_and_ignores_dotfiles() {
        assert_eq!(extension_of("app.PY"), ".py");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of(".gitignore"), "");
        assert_eq!(extension_of("Dockerfile"), "");
    }

    #[test]
    fn file_type_labels_default_to_other() {
        assert_eq!(file_type_label("main.rs"), "Rust");
        assert_eq!(file_type_label("App.TSX"), "React TSX");
        assert_eq!(file_type_label("config.yml"), "YAML");
        assert_eq!(file_type_label("notes.adoc"), "Other");
        assert_eq!(file_type_label("Makefile"), "Other");
    }

    #[test]
    fn skip_matches_substrings_anywhere_in_path() {
        let rules = CrawlRules::default();
        assert!(rules.should_skip("test"));
        assert!(rules.should_skip("src/contest/main.py"));
        assert!(rules.should_skip("Node_Modules/left-pad/index.js"));
        assert!(rules.should_skip("docs/logo.PNG"));
        assert!(rules.should_skip("web/public/assets/app.js"));
        assert!(!rules.should_skip("src/app.py"));
        assert!(!rules.should_skip("README.md"));
    }

    #[test]
    fn uppercase_tokens_are_matched_against_lowercased_paths() {
        let rules = CrawlRules::default();
        assert!(rules.should_skip("mac/.ds_store"));
        let rules = CrawlRules::default().with_skip_tokens(["Generated"]);
        assert!(rules.should_skip("src/generated/api.rs"));
        assert!(!rules.should_skip("src/test_utils.rs"));
    }

    #[test]
    fn fetch_eligibility() {
        let rules = CrawlRules::default();
        assert!(rules.should_fetch("README.md", ".md", 5_000_000));
        assert!(rules.should_fetch("LICENSE", "", 5_000_000));
        assert!(rules.should_fetch("huge.py", ".py", 5_000_000));
        assert!(rules.should_fetch("data.csv", ".csv", 99_999));
        assert!(!rules.should_fetch("data.csv", ".csv", 100_000));
    }

    #[test]
    fn extra_code_extensions_and_threshold() {
        let rules = CrawlRules::default()
            .with_extra_code_extensions(["ex", ".EXS", ""])
            .with_fetch_size_threshold(10);
        assert!(rules.is_code_extension(".ex"));
        assert!(rules.is_code_extension(".exs"));
        assert!(!rules.should_fetch("data.csv", ".csv", 10));
        assert!(rules.should_fetch("data.csv", ".csv", 9));
    }

    #[test]
    fn priority_path_uses_last_segment() {
        let rules = CrawlRules::default();
        assert!(rules.is_priority_path("crates/core/Cargo.toml"));
        assert!(rules.is_priority_path("README.md"));
        assert!(!rules.is_priority_path("readme.md/notes.txt"));
    }
}

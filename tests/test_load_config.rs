use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

use archscribe::load_config::{load_config, load_optional_config, Secrets};
use archscribe_core::export::ExportFormat;
use archscribe_core::AnalysisOptions;

fn config_file(yaml: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), yaml).unwrap();
    config_file
}

#[test]
fn full_config_is_mapped_onto_core_settings() {
    let config_file = config_file(
        r#"
github:
  api_url: https://github.example.com/api/v3
  timeout_secs: 10
analysis:
  model: gemini-2.5-flash
  temperature: 0.1
  max_output_tokens: 2048
  timeout_secs: 60
crawl:
  skip_tokens: [generated]
  extra_code_extensions: [ex, .exs]
  fetch_size_threshold: 5000
options:
  include_diagrams: false
output:
  dir: ./tmp/docs
  formats: [json, pdf, docx]
"#,
    );

    let config = load_config(config_file.path()).expect("Config should load");

    assert_eq!(config.github.api_url, "https://github.example.com/api/v3");
    assert_eq!(config.github_timeout(), Duration::from_secs(10));

    let settings = config.gemini_settings();
    assert_eq!(settings.model, "gemini-2.5-flash");
    assert_eq!(settings.max_output_tokens, 2048);
    assert_eq!(settings.timeout, Duration::from_secs(60));
    assert_eq!(
        settings.api_url,
        "https://generativelanguage.googleapis.com/v1beta/models",
        "unset keys keep their defaults"
    );

    let rules = config.crawl_rules();
    assert!(rules.should_skip("src/generated/api.rs"));
    assert!(!rules.should_skip("tests/app.py"), "skip tokens are replaced, not extended");
    assert!(rules.is_code_extension(".ex"));
    assert!(rules.is_code_extension(".exs"));
    assert_eq!(rules.fetch_size_threshold(), 5000);

    assert_eq!(
        config.options,
        AnalysisOptions {
            include_diagrams: false,
            ..AnalysisOptions::default()
        }
    );
    assert_eq!(config.output.dir, PathBuf::from("./tmp/docs"));
    assert_eq!(
        config.output.formats,
        vec![ExportFormat::Json, ExportFormat::Pdf, ExportFormat::Docx]
    );
}

#[test]
fn empty_or_missing_config_uses_defaults() {
    let empty = config_file("");
    let config = load_config(empty.path()).expect("Empty config should load");
    assert_eq!(config, load_optional_config(None).unwrap());
    assert_eq!(config.github.timeout_secs, 30);
    assert_eq!(config.output.formats, vec![ExportFormat::Markdown, ExportFormat::Pdf]);
    assert_eq!(config.crawl_rules().fetch_size_threshold(), 100_000);
}

#[test]
fn invalid_yaml_is_reported_as_parse_error() {
    let config_file = config_file("not-yaml: [:::");
    let err = load_config(config_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
fn unknown_export_format_is_rejected() {
    let config_file = config_file("output:\n  formats: [odt]\n");
    assert!(load_config(config_file.path()).is_err());
}

#[test]
fn missing_file_is_reported() {
    let err = load_config("/definitely/not/here.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
#[serial]
fn secrets_come_from_environment() {
    env::set_var("GEMINI_API_KEY", "gemini-secret");
    env::set_var("GITHUB_TOKEN", "   ");

    let secrets = Secrets::from_env();
    assert_eq!(secrets.require_gemini_api_key().unwrap(), "gemini-secret");
    assert!(secrets.github_token.is_none(), "blank token counts as unset");
    assert!(!format!("{secrets:?}").contains("gemini-secret"));

    env::remove_var("GEMINI_API_KEY");
    env::remove_var("GITHUB_TOKEN");
}

#[test]
#[serial]
fn missing_analysis_key_is_an_error() {
    env::remove_var("GEMINI_API_KEY");
    let err = Secrets::from_env().require_gemini_api_key().unwrap_err();
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

use archscribe::output::write_exports;
use archscribe_core::analysis::{AnalysisReport, AnalysisResult, KeyStatistics};
use archscribe_core::contract::RepositoryMetadata;
use archscribe_core::export::ExportFormat;
use archscribe_core::parser::AnalysisSections;
use archscribe_core::RepositoryLocation;

fn report() -> AnalysisReport {
    AnalysisReport {
        location: RepositoryLocation::parse("https://github.com/acme/widgets").unwrap(),
        repository: RepositoryMetadata {
            full_name: "acme/widgets".into(),
            description: "Widgets as a service".into(),
            language: "Python".into(),
            stars: 5,
            forks: 1,
        },
        result: AnalysisResult {
            sections: AnalysisSections {
                overview: "A widget service.".into(),
                architecture: "Layered.".into(),
                modules: "- api: HTTP layer".into(),
                architecture_diagram: "graph TD\n  A-->B".into(),
                ..AnalysisSections::default()
            },
            key_statistics: KeyStatistics {
                total_files: 3,
                code_files: 2,
                analyzed_files: 2,
                skipped_files: 1,
                main_language: "PY".into(),
                modules_count: 1,
            },
        },
    }
}

#[test]
fn writes_one_file_per_format_with_magic_headers() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/exports");
    let formats = [
        ExportFormat::Pdf,
        ExportFormat::Markdown,
        ExportFormat::Json,
        ExportFormat::Pdf,
        ExportFormat::Docx,
    ];

    let written = write_exports(&report(), &formats, &out, "January 01, 2026").unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|w| w.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "widgets_architecture.pdf",
            "widgets_architecture.md",
            "widgets_architecture.json",
            "widgets_architecture.docx"
        ]
    );

    let pdf = std::fs::read(&written[0].path).unwrap();
    assert_eq!(&pdf[0..4], b"%PDF");
    assert_eq!(written[0].bytes, pdf.len() as u64);

    let markdown = std::fs::read_to_string(&written[1].path).unwrap();
    assert!(markdown.contains("Generated on: January 01, 2026"));
    assert!(markdown.contains("```mermaid\ngraph TD\n  A-->B\n```"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written[2].path).unwrap()).unwrap();
    assert_eq!(json["overview"], "A widget service.");
    assert_eq!(json["key_statistics"]["skipped_files"], 1);

    let docx = std::fs::read(&written[3].path).unwrap();
    assert_eq!(&docx[0..2], b"PK");
}

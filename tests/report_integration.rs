//! Report rendering end to end: renderer, chart binding, plain-text output.

use std::io::Write;

use agentic_credit::config::Config;
use agentic_credit::report::{renderer_for, ChartRegistry, ReportError};

#[tokio::test]
async fn test_template_report_for_company() {
    let config = Config::default();
    let mut doc = renderer_for(&config).render("Nimbus Compute").await.unwrap();

    assert_eq!(doc.title, "Nimbus Compute Credit Assessment – May 2025");
    assert_eq!(
        doc.section_ids(),
        vec![
            "executive-summary",
            "business-profile",
            "financial-analysis",
            "debt-structure",
            "industry",
            "risks",
        ]
    );

    let bound = ChartRegistry::default().initialize(&mut doc);
    assert_eq!(bound, doc.chart_placeholders().len());
    assert!(doc.charts.contains_key("customer-chart"));

    let text = doc.to_plain_text();
    assert!(text.starts_with("Nimbus Compute Credit Assessment"));
    assert!(!text.contains("{{company}}"));
    assert!(!text.contains("**"));
}

#[tokio::test]
async fn test_markdown_report_gets_static_charts() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "# Analysis\n\n## Revenue Growth\n\nStrong growth.\n\n## Risks\n\n- Leverage\n"
    )
    .unwrap();

    let mut config = Config::default();
    config.report.analysis_path = Some(file.path().to_path_buf());

    let mut doc = renderer_for(&config).render("Acme").await.unwrap();
    assert_eq!(doc.section_ids(), vec!["revenue-growth", "risks"]);
    assert_eq!(doc.chart_placeholders(), vec!["revenue-chart"]);

    ChartRegistry::default().initialize(&mut doc);
    assert!(doc.to_plain_text().contains("Revenue"));
}

#[tokio::test]
async fn test_missing_analysis_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.report.analysis_path = Some(dir.path().join("absent.md"));

    let err = renderer_for(&config).render("Acme").await.unwrap_err();
    assert!(matches!(err, ReportError::Read { .. }));
}

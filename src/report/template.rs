//! Handlebars rendering of the embedded credit report template.

use async_trait::async_trait;
use handlebars::Handlebars;
use serde_json::json;

use super::markdown::parse_markdown;
use super::{ReportDocument, ReportError, ReportRenderer};

const REPORT_TEMPLATE: &str = include_str!("../../templates/credit_report.md.hbs");

const TEMPLATE_NAME: &str = "credit_report";

/// Renders the built-in report with the company name interpolated
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
    report_date: String,
}

impl TemplateRenderer {
    pub fn new(report_date: impl Into<String>) -> Self {
        let mut handlebars = Handlebars::new();
        // Markdown output, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(false);
        Self {
            handlebars,
            report_date: report_date.into(),
        }
    }

    /// Render the template source to markdown
    pub fn render_markdown(&self, company: &str) -> Result<String, ReportError> {
        let context = json!({
            "company": company,
            "report_date": self.report_date,
        });
        self.handlebars
            .render_template(REPORT_TEMPLATE, &context)
            .map_err(|e| ReportError::Template(format!("{TEMPLATE_NAME}: {e}")))
    }
}

#[async_trait]
impl ReportRenderer for TemplateRenderer {
    async fn render(&self, company: &str) -> Result<ReportDocument, ReportError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(ReportError::EmptyCompany);
        }

        let markdown = self.render_markdown(company)?;
        let mut doc = parse_markdown(&markdown);
        if doc.sections.is_empty() {
            return Err(ReportError::NoSections);
        }
        doc.company = company.to_string();
        doc.reset_collapsed();

        tracing::info!(company, sections = doc.sections.len(), "Report template rendered");
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_company_interpolated_into_title() {
        let doc = TemplateRenderer::new("May 2025").render("Acme Corp").await.unwrap();
        assert_eq!(doc.title, "Acme Corp Credit Assessment – May 2025");
        assert_eq!(doc.company, "Acme Corp");
    }

    #[tokio::test]
    async fn test_template_sections() {
        let doc = TemplateRenderer::new("May 2025").render("Acme").await.unwrap();
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
        assert_eq!(doc.sections[0].title, "Executive Summary and Credit Conclusion");
        assert!(doc.sections[0].open);
        assert!(doc.sections[1..].iter().all(|s| !s.open));
    }

    #[tokio::test]
    async fn test_template_chart_placeholders() {
        let doc = TemplateRenderer::new("May 2025").render("Acme").await.unwrap();
        assert_eq!(
            doc.chart_placeholders(),
            vec!["revenue-chart", "customer-chart", "margins-chart", "debt-chart"]
        );
    }

    #[test]
    fn test_markup_in_company_is_not_escaped() {
        let markdown = TemplateRenderer::new("May 2025")
            .render_markdown("AT&T")
            .unwrap();
        assert!(markdown.contains("**AT&T**"));
        assert!(!markdown.contains("{{company}}"));
    }

    #[tokio::test]
    async fn test_empty_company_rejected() {
        let err = TemplateRenderer::new("May 2025").render("   ").await.unwrap_err();
        assert!(matches!(err, ReportError::EmptyCompany));
    }
}

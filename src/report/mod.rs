//! Credit report documents and the renderers that produce them.
//!
//! A renderer turns a company name into a [`ReportDocument`]: an ordered list
//! of sections with stable ids (the targets of the report sidebar) holding
//! display blocks. Charts appear as [`Block::Chart`] placeholders that the
//! [`charts::ChartRegistry`] binds to datasets after the report is mounted.

pub mod charts;
mod markdown;
mod template;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use charts::{ChartKind, ChartRegistry, ChartSpec};
pub use markdown::{parse_markdown, MarkdownFileRenderer};
pub use template::TemplateRenderer;

use crate::config::Config;

/// One display unit inside a section
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(u8, String),
    Paragraph(String),
    Bullet(String),
    TableRow(Vec<String>),
    Chart(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub id: String,
    pub title: String,
    pub blocks: Vec<Block>,
    /// Expanded in the report view
    pub open: bool,
}

impl ReportSection {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            blocks: Vec::new(),
            open: false,
        }
    }

    pub fn chart_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Chart(id) => Some(id.as_str()),
            _ => None,
        })
    }
}

/// A display-ready credit report
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportDocument {
    pub title: String,
    pub company: String,
    /// Blocks before the first section
    pub preamble: Vec<Block>,
    pub sections: Vec<ReportSection>,
    /// Datasets bound to chart placeholders, keyed by chart id
    pub charts: BTreeMap<String, ChartSpec>,
}

impl ReportDocument {
    pub fn section(&self, id: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut ReportSection> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }

    /// Every chart placeholder id, in document order
    pub fn chart_placeholders(&self) -> Vec<&str> {
        self.sections.iter().flat_map(|s| s.chart_ids()).collect()
    }

    /// Open the first section and collapse the rest
    pub fn reset_collapsed(&mut self) {
        for (i, section) in self.sections.iter_mut().enumerate() {
            section.open = i == 0;
        }
    }

    /// Toggle a section open or closed; returns the new state
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let section = self.section_mut(id)?;
        section.open = !section.open;
        Some(section.open)
    }

    /// Render as plain text for headless output
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&"=".repeat(self.title.chars().count()));
        out.push_str("\n\n");

        for block in &self.preamble {
            self.push_block(&mut out, block);
        }
        for section in &self.sections {
            out.push_str(&section.title);
            out.push('\n');
            out.push_str(&"-".repeat(section.title.chars().count()));
            out.push_str("\n\n");
            for block in &section.blocks {
                self.push_block(&mut out, block);
            }
        }
        out
    }

    fn push_block(&self, out: &mut String, block: &Block) {
        match block {
            Block::Heading(_, text) => {
                out.push_str(&strip_emphasis(text));
                out.push_str("\n\n");
            }
            Block::Paragraph(text) => {
                out.push_str(&strip_emphasis(text));
                out.push_str("\n\n");
            }
            Block::Bullet(text) => {
                out.push_str("  * ");
                out.push_str(&strip_emphasis(text));
                out.push('\n');
            }
            Block::TableRow(cells) => {
                out.push_str(&cells.join(" | "));
                out.push('\n');
            }
            Block::Chart(id) => match self.charts.get(id) {
                Some(chart) => {
                    out.push_str(&format!("[{}]\n", chart.title));
                    for (label, value) in &chart.series {
                        out.push_str(&format!("  {label}: {value}{}\n", chart.unit));
                    }
                    out.push('\n');
                }
                None => out.push_str(&format!("[chart {id} unavailable]\n\n")),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("company name is empty")]
    EmptyCompany,

    #[error("failed to read analysis file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render report template: {0}")]
    Template(String),

    #[error("report has no sections")]
    NoSections,
}

/// Produces a report document for a company
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, company: &str) -> Result<ReportDocument, ReportError>;
}

/// Pick the renderer for this configuration: the markdown file when one is
/// configured, otherwise the embedded template.
pub fn renderer_for(config: &Config) -> Arc<dyn ReportRenderer> {
    match &config.report.analysis_path {
        Some(path) => Arc::new(MarkdownFileRenderer::new(path.clone())),
        None => Arc::new(TemplateRenderer::new(config.report.report_date.clone())),
    }
}

/// Lowercase, alphanumerics kept, everything else collapsed into single dashes
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Drop `**` emphasis markers
pub fn strip_emphasis(text: &str) -> String {
    text.replace("**", "")
}

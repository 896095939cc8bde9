//! Markdown analysis files and the small markdown subset reports are written in.
//!
//! Supported: `#` title, `##` sections (optionally `{#id}`), `###`/`####`
//! headings, `-` bullets, `|` table rows, `<!-- chart:ID -->` placeholders and
//! plain paragraphs. Anything else is treated as paragraph text.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{slugify, strip_emphasis, Block, ReportDocument, ReportError, ReportRenderer, ReportSection};

/// Charts attached after headings with these titles when the file has no
/// placeholder for them
const STATIC_CHARTS: &[(&str, &str)] = &[
    ("Customer Mix", "customer-chart"),
    ("Revenue Growth", "revenue-chart"),
    ("Debt Structure", "debt-chart"),
];

/// Parse report markdown into a document
pub fn parse_markdown(text: &str) -> ReportDocument {
    let mut parser = Parser::default();
    for line in text.lines() {
        parser.line(line.trim());
    }
    parser.finish()
}

#[derive(Default)]
struct Parser {
    doc: ReportDocument,
    paragraph: Vec<String>,
}

impl Parser {
    fn line(&mut self, line: &str) {
        if line.is_empty() {
            self.flush();
        } else if let Some(id) = chart_marker(line) {
            self.flush();
            self.push(Block::Chart(id.to_string()));
        } else if let Some(title) = line.strip_prefix("# ") {
            self.flush();
            if self.doc.title.is_empty() {
                self.doc.title = title.trim().to_string();
            } else {
                self.push(Block::Heading(1, title.trim().to_string()));
            }
        } else if let Some(heading) = line.strip_prefix("## ") {
            self.flush();
            let index = self.doc.sections.len();
            let (title, id) = split_anchor(heading.trim());
            let id = match id {
                Some(id) => id.to_string(),
                None => {
                    let slug = slugify(title);
                    if slug.is_empty() {
                        format!("section-{index}")
                    } else {
                        slug
                    }
                }
            };
            self.doc.sections.push(ReportSection::new(id, title));
        } else if let Some((level, text)) = subheading(line) {
            self.flush();
            self.push(Block::Heading(level, text.to_string()));
        } else if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            self.flush();
            self.push(Block::Bullet(item.trim().to_string()));
        } else if line.starts_with('|') {
            self.flush();
            if !is_table_separator(line) {
                let cells = line
                    .trim_matches('|')
                    .split('|')
                    .map(|c| c.trim().to_string())
                    .collect();
                self.push(Block::TableRow(cells));
            }
        } else {
            self.paragraph.push(line.to_string());
        }
    }

    fn flush(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join(" ");
            self.paragraph.clear();
            self.push(Block::Paragraph(text));
        }
    }

    fn push(&mut self, block: Block) {
        match self.doc.sections.last_mut() {
            Some(section) => section.blocks.push(block),
            None => self.doc.preamble.push(block),
        }
    }

    fn finish(mut self) -> ReportDocument {
        self.flush();
        self.doc
    }
}

fn chart_marker(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("<!--")?.strip_suffix("-->")?.trim();
    let id = inner.strip_prefix("chart:")?.trim();
    (!id.is_empty()).then_some(id)
}

/// `Title {#id}` -> ("Title", Some("id"))
fn split_anchor(heading: &str) -> (&str, Option<&str>) {
    if let Some(start) = heading.rfind("{#") {
        if let Some(id) = heading[start + 2..].strip_suffix('}') {
            if !id.is_empty() {
                return (heading[..start].trim_end(), Some(id));
            }
        }
    }
    (heading, None)
}

fn subheading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if !(3..=6).contains(&hashes) {
        return None;
    }
    let text = line[hashes..].strip_prefix(' ')?;
    Some((hashes as u8, text.trim()))
}

fn is_table_separator(line: &str) -> bool {
    line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// Attach the static charts after headings that match their titles
/// (case-insensitive), unless the document already places them.
pub(crate) fn insert_static_charts(doc: &mut ReportDocument) {
    for (title, chart_id) in STATIC_CHARTS {
        if doc.chart_placeholders().contains(chart_id) {
            continue;
        }

        let placed = doc.sections.iter_mut().any(|section| {
            if section.title.trim().eq_ignore_ascii_case(title) {
                section.blocks.insert(0, Block::Chart(chart_id.to_string()));
                return true;
            }
            let position = section.blocks.iter().position(|b| {
                matches!(b, Block::Heading(_, text) if strip_emphasis(text).trim().eq_ignore_ascii_case(title))
            });
            match position {
                Some(i) => {
                    section.blocks.insert(i + 1, Block::Chart(chart_id.to_string()));
                    true
                }
                None => false,
            }
        });

        if placed {
            tracing::debug!(chart = chart_id, heading = title, "Added static chart");
        }
    }
}

/// Loads the report from a markdown analysis file
pub struct MarkdownFileRenderer {
    path: PathBuf,
}

impl MarkdownFileRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportRenderer for MarkdownFileRenderer {
    async fn render(&self, company: &str) -> Result<ReportDocument, ReportError> {
        let company = company.trim();
        if company.is_empty() {
            return Err(ReportError::EmptyCompany);
        }

        tracing::info!(path = %self.path.display(), "Loading markdown analysis");
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ReportError::Read {
                path: self.path.clone(),
                source,
            })?;

        let mut doc = parse_markdown(&text);
        if doc.sections.is_empty() {
            return Err(ReportError::NoSections);
        }
        insert_static_charts(&mut doc);

        doc.company = company.to_string();
        if doc.title.is_empty() {
            doc.title = format!("{company} Credit Assessment");
        }
        doc.reset_collapsed();

        tracing::info!(sections = doc.sections.len(), "Sidebar built");
        Ok(doc)
    }
}

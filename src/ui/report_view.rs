//! Scrollable credit report with a section sidebar.
//!
//! The report is laid out into pre-wrapped lines for the current width, so a
//! section's top offset is simply the index of its header line. Those offsets
//! feed the [`Scrollspy`] that highlights the sidebar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as WidgetBlock, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::report::{Block, ChartKind, ChartSpec, ReportDocument, ReportSection};
use crate::scrollspy::{scroll_toward, Scrollspy};

const SIDEBAR_WIDTH: u16 = 34;

pub enum ReportState {
    Empty,
    Loading,
    Ready(ReportDocument),
    Failed(String),
}

pub struct ReportView {
    pub state: ReportState,
    lines: Vec<Line<'static>>,
    laid_out_width: Option<usize>,
    scroll: usize,
    target: Option<usize>,
    viewport: usize,
    spy: Scrollspy,
}

impl ReportView {
    pub fn new(lookahead: usize, margin: usize) -> Self {
        Self {
            state: ReportState::Empty,
            lines: Vec::new(),
            laid_out_width: None,
            scroll: 0,
            target: None,
            viewport: 0,
            spy: Scrollspy::new(lookahead, margin),
        }
    }

    pub fn set_loading(&mut self) {
        self.state = ReportState::Loading;
        self.reset();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = ReportState::Failed(message.into());
        self.reset();
    }

    /// Mount a rendered report at the top
    pub fn mount(&mut self, doc: ReportDocument) {
        self.state = ReportState::Ready(doc);
        self.reset();
    }

    fn reset(&mut self) {
        self.lines.clear();
        self.laid_out_width = None;
        self.scroll = 0;
        self.target = None;
        self.spy.set_layout(Vec::<(String, Option<usize>)>::new());
    }

    pub fn document(&self) -> Option<&ReportDocument> {
        match &self.state {
            ReportState::Ready(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn document_mut(&mut self) -> Option<&mut ReportDocument> {
        match &mut self.state {
            ReportState::Ready(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, ReportState::Failed(_))
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn spy(&self) -> &Scrollspy {
        &self.spy
    }

    pub fn section_count(&self) -> usize {
        self.document().map(|d| d.sections.len()).unwrap_or(0)
    }

    /// Lay the report out for `width` columns unless already done
    pub fn ensure_layout(&mut self, width: usize) {
        if self.laid_out_width == Some(width) {
            return;
        }
        let Some(doc) = self.document() else {
            return;
        };

        let (lines, tops) = layout_document(doc, width);
        let ids: Vec<String> = doc.sections.iter().map(|s| s.id.clone()).collect();
        self.lines = lines;
        self.laid_out_width = Some(width);
        self.spy.set_layout(ids.into_iter().zip(tops));
        self.scroll = self.scroll.min(self.max_scroll());
        self.spy.on_scroll(self.scroll);
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport.max(1))
    }

    fn set_scroll(&mut self, scroll: usize) {
        self.scroll = scroll.min(self.max_scroll());
        self.spy.on_scroll(self.scroll);
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.target = None;
        let next = self.scroll.saturating_add_signed(delta);
        self.set_scroll(next);
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport.saturating_sub(2).max(1) as isize);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-(self.viewport.saturating_sub(2).max(1) as isize));
    }

    pub fn scroll_to_top(&mut self) {
        self.target = None;
        self.set_scroll(0);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.target = None;
        self.set_scroll(usize::MAX);
    }

    /// Jump to the section after the highlighted one
    pub fn next_section(&mut self) {
        let next = match self.spy.active() {
            Some(i) if i + 1 < self.spy.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.activate(next);
    }

    pub fn previous_section(&mut self) {
        let previous = self.spy.active().map(|i| i.saturating_sub(1)).unwrap_or(0);
        self.activate(previous);
    }

    fn activate(&mut self, index: usize) {
        if let Some(target) = self.spy.activate(index) {
            self.target = Some(target.min(self.max_scroll()));
        }
    }

    /// Anchor navigation by section id
    pub fn activate_id(&mut self, id: &str) {
        if let Some(target) = self.spy.activate_id(id) {
            self.target = Some(target.min(self.max_scroll()));
        }
    }

    /// Jump to the `index`th sidebar entry, counting from zero
    pub fn select_section(&mut self, index: usize) {
        let Some(id) = self.spy.ids().nth(index).map(str::to_string) else {
            tracing::debug!(index, "No report section at this position");
            return;
        };
        self.activate_id(&id);
    }

    /// Expand or collapse the highlighted section
    pub fn toggle_active_section(&mut self) -> Option<bool> {
        let id = self.spy.active_id()?.to_string();
        let open = self.document_mut()?.toggle(&id)?;
        tracing::debug!(section = %id, open, "Toggled report section");
        self.laid_out_width = None;
        Some(open)
    }

    /// Advance a running smooth scroll; returns true while moving
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let next = scroll_toward(self.scroll, target);
        self.scroll = next.min(self.max_scroll());
        if self.scroll == target || next != self.scroll {
            self.target = None;
            self.spy.on_scroll(self.scroll);
        }
        self.target.is_some()
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);

        match &self.state {
            ReportState::Ready(_) => {}
            ReportState::Empty => {
                render_notice(
                    frame,
                    area,
                    " Credit Assessment Report ",
                    vec![Line::from(Span::styled(
                        "No report yet. Generate an assessment first.",
                        Style::default().fg(Color::Gray),
                    ))],
                    Color::Gray,
                );
                return;
            }
            ReportState::Loading => {
                render_notice(
                    frame,
                    area,
                    " Credit Assessment Report ",
                    vec![Line::from(Span::styled(
                        "Formatting and rendering report...",
                        Style::default().fg(Color::Cyan),
                    ))],
                    Color::Cyan,
                );
                return;
            }
            ReportState::Failed(message) => {
                let lines = vec![
                    Line::from(Span::styled(
                        "Error Loading Content",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(message.clone()),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Press r to try again",
                        Style::default().fg(Color::Yellow),
                    )),
                ];
                render_notice(frame, area, " Error ", lines, Color::Red);
                return;
            }
        }

        let content = chunks[1];
        self.viewport = content.height.saturating_sub(2) as usize;
        self.ensure_layout(content.width.saturating_sub(2) as usize);

        self.render_sidebar(frame, chunks[0]);

        let title = self
            .document()
            .map(|d| d.title.clone())
            .unwrap_or_default();
        let end = (self.scroll + self.viewport).min(self.lines.len());
        let visible: Vec<Line> = self.lines[self.scroll.min(end)..end].to_vec();
        let body = Paragraph::new(visible).block(
            WidgetBlock::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );
        frame.render_widget(body, content);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let Some(doc) = self.document() else {
            return;
        };
        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = doc
            .sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let marker = if section.open { "▾" } else { "▸" };
                let label = shorten(&section.title, width.saturating_sub(2));
                let style = if self.spy.is_active(i) {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(format!("{} {}", marker, label), style)))
            })
            .collect();

        let list = List::new(items).block(
            WidgetBlock::default()
                .title(" Sections ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );
        frame.render_widget(list, area);
    }
}

fn render_notice(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, color: Color) {
    let notice = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            WidgetBlock::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(notice, area);
}

fn shorten(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", head)
}

/// Lay out a document into lines, returning each section's header line index
pub fn layout_document(doc: &ReportDocument, width: usize) -> (Vec<Line<'static>>, Vec<Option<usize>>) {
    let width = width.max(20);
    let mut lines = Vec::new();

    for line in wrap_styled(&doc.title, width, "", "", title_style()) {
        lines.push(line);
    }
    lines.push(Line::from(""));
    layout_blocks(&doc.preamble, doc, width, &mut lines);

    let mut tops = Vec::with_capacity(doc.sections.len());
    for section in &doc.sections {
        tops.push(Some(lines.len()));
        layout_section(section, doc, width, &mut lines);
    }
    (lines, tops)
}

fn title_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD)
}

fn layout_section(section: &ReportSection, doc: &ReportDocument, width: usize, lines: &mut Vec<Line<'static>>) {
    let marker = if section.open { "▾ " } else { "▸ " };
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    lines.push(Line::from(vec![
        Span::styled(marker, header_style),
        Span::styled(section.title.clone(), header_style),
    ]));

    if section.open {
        lines.push(Line::from(""));
        layout_blocks(&section.blocks, doc, width, lines);
    } else {
        lines.push(Line::from(Span::styled(
            "  (collapsed, press Space to expand)",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }
}

fn layout_blocks(blocks: &[Block], doc: &ReportDocument, width: usize, lines: &mut Vec<Line<'static>>) {
    let mut i = 0;
    while i < blocks.len() {
        match &blocks[i] {
            Block::Heading(level, text) => {
                let color = if *level <= 3 { Color::Yellow } else { Color::Magenta };
                let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
                lines.extend(wrap_styled(text, width, "", "", style));
                lines.push(Line::from(""));
            }
            Block::Paragraph(text) => {
                lines.extend(wrap_styled(text, width, "", "", Style::default()));
                lines.push(Line::from(""));
            }
            Block::Bullet(text) => {
                lines.extend(wrap_styled(text, width, "  • ", "    ", Style::default()));
                let next_is_bullet = matches!(blocks.get(i + 1), Some(Block::Bullet(_)));
                if !next_is_bullet {
                    lines.push(Line::from(""));
                }
            }
            Block::TableRow(_) => {
                let start = i;
                while matches!(blocks.get(i + 1), Some(Block::TableRow(_))) {
                    i += 1;
                }
                let rows: Vec<&Vec<String>> = blocks[start..=i]
                    .iter()
                    .filter_map(|b| match b {
                        Block::TableRow(cells) => Some(cells),
                        _ => None,
                    })
                    .collect();
                lines.extend(layout_table(&rows));
                lines.push(Line::from(""));
            }
            Block::Chart(id) => {
                match doc.charts.get(id) {
                    Some(chart) => lines.extend(layout_chart(chart, width)),
                    None => lines.push(Line::from(Span::styled(
                        format!("[chart unavailable: {}]", id),
                        Style::default().fg(Color::DarkGray),
                    ))),
                }
                lines.push(Line::from(""));
            }
        }
        i += 1;
    }
}

fn layout_table(rows: &[&Vec<String>]) -> Vec<Line<'static>> {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            rows.iter()
                .filter_map(|r| r.get(c))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i == 0 {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(c, w)| format!("{:<w$}", row.get(c).map(String::as_str).unwrap_or(""), w = *w))
                .collect();
            Line::from(Span::styled(format!("  {}", cells.join(" │ ")), style))
        })
        .collect()
}

/// Horizontal bars; pie charts show each share of the total
pub fn layout_chart(chart: &ChartSpec, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("  {}", chart.title),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];

    let label_width = chart
        .series
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0);
    let bar_room = width.saturating_sub(label_width + 18).max(5);

    let (scale, total) = match chart.kind {
        ChartKind::Bar => (chart.max_magnitude(), chart.total()),
        ChartKind::Pie => (chart.total(), chart.total()),
    };

    for (label, value) in &chart.series {
        let fraction = if scale > 0.0 { value.abs() / scale } else { 0.0 };
        let len = ((fraction * bar_room as f64).round() as usize).max(1);
        let color = if *value < 0.0 { Color::Red } else { Color::Green };
        let figure = match chart.kind {
            ChartKind::Bar => format!(" {}{}", format_value(*value), chart.unit),
            ChartKind::Pie if total > 0.0 => format!(" {:.1}%", value / total * 100.0),
            ChartKind::Pie => " -".to_string(),
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<w$} ", label, w = label_width)),
            Span::styled("█".repeat(len), Style::default().fg(color)),
            Span::styled(figure, Style::default().fg(Color::Gray)),
        ]));
    }
    lines
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Split `text` at `**` markers into (segment, bold) runs
fn emphasis_runs(text: &str) -> Vec<(String, bool)> {
    text.split("**")
        .enumerate()
        .filter(|(_, s)| !s.is_empty())
        .map(|(i, s)| (s.to_string(), i % 2 == 1))
        .collect()
}

/// Greedy word wrap that keeps `**bold**` runs styled across line breaks
fn wrap_styled(text: &str, width: usize, first_prefix: &str, rest_prefix: &str, base: Style) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = vec![Span::raw(first_prefix.to_string())];
    let mut used = first_prefix.chars().count();
    let mut line_has_words = false;

    for (run, bold) in emphasis_runs(text) {
        let style = if bold { base.add_modifier(Modifier::BOLD) } else { base };
        let starts_with_space = run.starts_with(char::is_whitespace);
        for (n, word) in run.split_whitespace().enumerate() {
            let word_len = word.chars().count();
            let needs_space = line_has_words && (n > 0 || starts_with_space);
            let extra = if needs_space { 1 } else { 0 };

            if line_has_words && used + extra + word_len > width {
                lines.push(Line::from(std::mem::take(&mut spans)));
                spans.push(Span::raw(rest_prefix.to_string()));
                used = rest_prefix.chars().count();
                line_has_words = false;
            } else if needs_space {
                spans.push(Span::styled(" ", style));
                used += 1;
            }

            spans.push(Span::styled(word.to_string(), style));
            used += word_len;
            line_has_words = true;
        }
        if run.ends_with(char::is_whitespace) && line_has_words {
            spans.push(Span::styled(" ", base));
            used += 1;
        }
    }

    if line_has_words || lines.is_empty() {
        lines.push(Line::from(spans));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ChartRegistry, ReportSection};
    use ratatui::{backend::TestBackend, Terminal};

    fn doc() -> ReportDocument {
        let mut sections = Vec::new();
        for (id, title) in [("a", "Alpha"), ("b", "Beta"), ("c", "Gamma")] {
            let mut section = ReportSection::new(id, title);
            section.blocks = (0..10)
                .map(|i| Block::Paragraph(format!("paragraph {i} of {title}")))
                .collect();
            sections.push(section);
        }
        let mut doc = ReportDocument {
            title: "Acme Credit Assessment".into(),
            company: "Acme".into(),
            sections,
            ..ReportDocument::default()
        };
        doc.reset_collapsed();
        doc
    }

    fn text(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_wrap_keeps_words_whole() {
        let lines = text(&wrap_styled("one two three four", 9, "", "", Style::default()));
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_bullet_prefixes() {
        let lines = text(&wrap_styled("alpha beta gamma", 12, "  • ", "    ", Style::default()));
        assert_eq!(lines, vec!["  • alpha", "    beta", "    gamma"]);
    }

    #[test]
    fn test_wrap_strips_emphasis_markers() {
        let lines = wrap_styled("**Rating:** B+ overall", 80, "", "", Style::default());
        assert_eq!(lines[0].to_string(), "Rating: B+ overall");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_layout_tops_follow_collapsed_sections() {
        let (lines, tops) = layout_document(&doc(), 80);
        // title, blank, then the open first section
        assert_eq!(tops[0], Some(2));
        // header, blank, ten paragraphs each followed by a blank
        assert_eq!(tops[1], Some(2 + 2 + 20));
        // collapsed sections take three lines
        assert_eq!(tops[2], Some(24 + 3));
        assert_eq!(lines.len(), 27 + 3);
    }

    #[test]
    fn test_scrolling_moves_highlight() {
        let mut view = ReportView::new(3, 1);
        view.mount(doc());
        view.viewport = 5;
        view.ensure_layout(80);

        assert_eq!(view.spy().active_id(), Some("a"));
        view.scroll_by(21);
        assert_eq!(view.spy().active_id(), Some("b"));
    }

    #[test]
    fn test_next_section_smooth_scrolls_to_target() {
        let mut view = ReportView::new(3, 1);
        view.mount(doc());
        view.viewport = 5;
        view.ensure_layout(80);

        view.next_section();
        let mut guard = 0;
        while view.tick() {
            guard += 1;
            assert!(guard < 100);
        }
        assert_eq!(view.scroll(), 23);
        assert_eq!(view.spy().active_id(), Some("b"));
    }

    #[test]
    fn test_toggle_collapses_active_section() {
        let mut view = ReportView::new(3, 1);
        view.mount(doc());
        view.viewport = 10;
        view.ensure_layout(80);

        assert_eq!(view.toggle_active_section(), Some(false));
        view.ensure_layout(80);
        assert_eq!(view.lines.len(), 2 + 3 * 3);
    }

    #[test]
    fn test_chart_lines() {
        let registry = ChartRegistry::default();
        let chart = registry.get("customer-chart").unwrap();
        let lines = text(&layout_chart(chart, 60));
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Microsoft"));
        assert!(lines[1].ends_with("62.0%"));
    }

    #[test]
    fn test_failed_state_renders_retry_hint() {
        let mut view = ReportView::new(3, 1);
        view.fail("failed to read analysis file missing.md");

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Error Loading Content"));
        assert!(content.contains("Press r to try again"));
    }
}

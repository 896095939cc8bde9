use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::sequencer::{LogEntry, SinkError, SinkEvent, StepKind};

/// Scrolling log of agent status lines
pub struct LogPanel {
    pub entries: Vec<LogEntry>,
    pub state: ListState,
    pub title: String,
    /// Keep the newest line in view
    pub follow: bool,
    /// Line the sequencer is currently typing into
    typing: Option<usize>,
}

impl LogPanel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            state: ListState::default(),
            title: title.into(),
            follow: true,
            typing: None,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.state = ListState::default();
        self.follow = true;
        self.typing = None;
    }

    pub fn last_text(&self) -> Option<&str> {
        self.entries.last().map(|e| e.text.as_str())
    }

    /// Text of the line the sequencer last appended
    pub fn typing_text(&self) -> Option<&str> {
        self.typing
            .and_then(|i| self.entries.get(i))
            .map(|e| e.text.as_str())
    }

    /// Apply one event from a sequencer's sink. Typed characters go to the
    /// line the sink last appended, even if other lines were pushed since.
    pub fn apply(&mut self, event: SinkEvent) -> Result<(), SinkError> {
        match event {
            SinkEvent::Append(entry) => {
                self.push(entry);
                self.typing = Some(self.entries.len() - 1);
            }
            SinkEvent::TypeChar(c) => match self.typing.and_then(|i| self.entries.get_mut(i)) {
                Some(entry) => entry.text.push(c),
                None => return Err(SinkError::Unavailable),
            },
            SinkEvent::ScrollToLatest => self.follow = true,
        }
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, running: bool) {
        let last = self.entries.len().saturating_sub(1);
        let typing = self.typing;
        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let style = if e.is_error() {
                    Style::default().fg(Color::Red)
                } else {
                    match e.kind {
                        StepKind::Complete => Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                        StepKind::Error => Style::default().fg(Color::Red),
                        StepKind::Progress => Style::default().fg(Color::White),
                    }
                };

                let mut spans = vec![
                    Span::styled(
                        e.timestamp.format("[%H:%M:%S] ").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(e.text.clone(), style),
                ];
                if running && Some(i) == typing {
                    spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        if self.follow && !self.entries.is_empty() {
            self.state.select(Some(last));
        }

        let border_style = if running {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let list = List::new(items).block(
            Block::default()
                .title(format!(" {} ", self.title))
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

/// Cut a status message to 30 characters, marking the cut with "..."
pub fn truncate_status(message: &str) -> String {
    const MAX: usize = 30;
    if message.chars().count() > MAX {
        let head: String = message.chars().take(MAX).collect();
        format!("{}...", head)
    } else {
        message.to_string()
    }
}

/// Debug bar: last status, section and link counts, active step
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    pub message: String,
    pub sections: usize,
    pub links: usize,
    pub active_step: String,
}

impl StatusBar {
    pub fn set_message(&mut self, message: &str) {
        self.message = truncate_status(message);
    }

    pub fn line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        Line::from(vec![
            Span::styled(" DEBUG ", Style::default().fg(Color::Black).bg(Color::Yellow)),
            Span::styled(format!("  Status: {}", self.message), Style::default().fg(Color::Gray)),
            Span::styled(format!("  │  Sections: {}", self.sections), dim),
            Span::styled(format!("  │  Links: {}", self.links), dim),
            Span::styled(format!("  │  Active: {}", self.active_step), dim),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let bar = Paragraph::new(self.line()).block(Block::default().borders(Borders::TOP));
        frame.render_widget(bar, area);
    }
}

pub struct HeaderBar<'a> {
    pub version: &'static str,
    pub company: Option<&'a str>,
    pub hint: String,
}

impl<'a> HeaderBar<'a> {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(
                " Agentic Credit",
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" v{}", self.version),
                Style::default().fg(Color::Gray),
            ),
        ];

        if let Some(company) = self.company {
            spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(
                company.to_string(),
                Style::default().fg(Color::White),
            ));
        }

        spans.push(Span::styled("  │  ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            self.hint.clone(),
            Style::default().fg(Color::DarkGray),
        ));

        let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }
}

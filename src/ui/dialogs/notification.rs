use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    fn color(&self) -> Color {
        match self {
            NotificationKind::Info => Color::Cyan,
            NotificationKind::Warning => Color::Yellow,
            NotificationKind::Error => Color::Red,
        }
    }
}

/// Blocking alert; swallows input until dismissed
pub struct NotificationDialog {
    pub visible: bool,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl Default for NotificationDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            title: String::new(),
            message: String::new(),
            kind: NotificationKind::Info,
        }
    }

    pub fn show(&mut self, kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) {
        self.kind = kind;
        self.title = title.into();
        self.message = message.into();
        self.visible = true;
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(50, 25, frame.area());
        frame.render_widget(Clear, area);

        let color = self.kind.color();
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.message.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter or Esc to continue",
                Style::default().fg(Color::Gray),
            )),
        ];

        let dialog = Paragraph::new(text)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(dialog, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_show_and_dismiss() {
        let mut dialog = NotificationDialog::new();
        dialog.show(
            NotificationKind::Warning,
            "Missing company",
            "Please enter a company name",
        );
        assert!(dialog.visible);
        assert_eq!(dialog.kind, NotificationKind::Warning);

        dialog.dismiss();
        assert!(!dialog.visible);
    }

    #[test]
    fn test_render_shows_message() {
        let mut dialog = NotificationDialog::new();
        dialog.show(NotificationKind::Error, "Oops", "Something broke");

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| dialog.render(f)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let content: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Something broke"));
        assert!(content.contains("Oops"));
    }
}

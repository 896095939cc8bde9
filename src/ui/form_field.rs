//! Reusable form field widgets for the workflow steps

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

/// A form field widget
pub enum FormField {
    /// Single-line text input; `cursor_pos` counts characters
    TextInput {
        value: String,
        cursor_pos: usize,
        placeholder: String,
        max_length: Option<usize>,
    },
    /// Multi-line text input using tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        placeholder: String,
    },
}

impl FormField {
    pub fn text_input(placeholder: &str, max_length: Option<usize>) -> Self {
        FormField::TextInput {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.to_string(),
            max_length,
        }
    }

    pub fn text_area(placeholder: &str) -> Self {
        FormField::TextArea {
            textarea: Box::new(TextArea::default()),
            placeholder: placeholder.to_string(),
        }
    }

    /// Get the current value as a string
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { value, .. } => value.clone(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
        }
    }

    /// Set the value from a string
    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput {
                value, cursor_pos, ..
            } => {
                *value = new_value.to_string();
                *cursor_pos = value.chars().count();
            }
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
        }
    }

    /// Whether the field holds anything besides whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            FormField::TextInput { value, .. } => value.trim().is_empty(),
            FormField::TextArea { textarea, .. } => {
                textarea.lines().iter().all(|l| l.trim().is_empty())
            }
        }
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                max_length,
                ..
            } => {
                let len = value.chars().count();
                match key.code {
                    KeyCode::Char(c) => {
                        if max_length.map(|m| len < m).unwrap_or(true) {
                            value.insert(byte_index(value, *cursor_pos), c);
                            *cursor_pos += 1;
                        }
                        true
                    }
                    KeyCode::Backspace => {
                        if *cursor_pos > 0 {
                            *cursor_pos -= 1;
                            value.remove(byte_index(value, *cursor_pos));
                        }
                        true
                    }
                    KeyCode::Delete => {
                        if *cursor_pos < len {
                            value.remove(byte_index(value, *cursor_pos));
                        }
                        true
                    }
                    KeyCode::Left => {
                        *cursor_pos = cursor_pos.saturating_sub(1);
                        true
                    }
                    KeyCode::Right => {
                        if *cursor_pos < len {
                            *cursor_pos += 1;
                        }
                        true
                    }
                    KeyCode::Home => {
                        *cursor_pos = 0;
                        true
                    }
                    KeyCode::End => {
                        *cursor_pos = len;
                        true
                    }
                    _ => false,
                }
            }
            // TextArea handles its own key events
            FormField::TextArea { textarea, .. } => textarea.input(key),
        }
    }

    /// Render the field
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, title: &str) {
        let border_color = if focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        match self {
            FormField::TextInput {
                value,
                cursor_pos,
                placeholder,
                max_length,
            } => {
                let content = if value.is_empty() && !focused {
                    Line::from(Span::styled(
                        placeholder.as_str(),
                        Style::default().fg(Color::DarkGray),
                    ))
                } else {
                    let mut text = value.clone();
                    if focused {
                        text.insert(byte_index(&text, *cursor_pos), '|');
                    }
                    let suffix = max_length
                        .map(|m| format!(" ({}/{})", value.chars().count(), m))
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(text),
                        Span::styled(suffix, Style::default().fg(Color::DarkGray)),
                    ])
                };

                let para = Paragraph::new(content).block(block).style(Style::default().fg(
                    if focused {
                        Color::White
                    } else {
                        Color::Gray
                    },
                ));
                frame.render_widget(para, area);
            }
            FormField::TextArea {
                textarea,
                placeholder,
            } => {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                textarea.set_block(block);
                textarea.set_placeholder_text(placeholder.clone());
                textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));

                frame.render_widget(&**textarea, area);
            }
        }
    }
}

/// Byte offset of the `char_pos`-th character, or the end of the string
fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

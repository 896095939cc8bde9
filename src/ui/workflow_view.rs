//! The workflow screen: step sidebar plus the content of the visible step.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::form_field::FormField;
use super::keybindings::{hint_line, ShortcutContext};
use super::panels::LogPanel;
use crate::sequencer::scripts::GENERATE_DESCRIPTION;
use crate::session::RunStatus;
use crate::workflow::{NavHost, NavLink, SectionHost, ViewError, WorkflowStep};

const SIDEBAR_WIDTH: u16 = 28;

/// Run state of the two agent actions, for button labels
#[derive(Debug, Clone, Copy, Default)]
pub struct StepStatus {
    pub build: RunStatus,
    pub assessment: RunStatus,
}

pub struct WorkflowScreen {
    sections: Vec<(WorkflowStep, bool)>,
    nav: Vec<(NavLink, bool)>,
    pub requirements: FormField,
    pub company: FormField,
    pub generate_description: String,
    pub build_log: LogPanel,
    pub assessment_log: LogPanel,
}

impl Default for WorkflowScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowScreen {
    pub fn new() -> Self {
        Self::with_steps(WorkflowStep::all())
    }

    /// Screen with only `steps` mounted
    pub fn with_steps(steps: &[WorkflowStep]) -> Self {
        Self {
            sections: steps.iter().map(|s| (*s, false)).collect(),
            nav: steps.iter().map(|s| (NavLink::for_step(*s), false)).collect(),
            requirements: FormField::text_area("Describe the credit analysis agent you need..."),
            company: FormField::text_input("Company name", Some(60)),
            generate_description: GENERATE_DESCRIPTION.to_string(),
            build_log: LogPanel::new("Agent Build Log"),
            assessment_log: LogPanel::new("Assessment Log"),
        }
    }

    /// The step currently shown, if any
    pub fn visible_step(&self) -> Option<WorkflowStep> {
        self.sections.iter().find(|(_, v)| *v).map(|(s, _)| *s)
    }

    pub fn visible_count(&self) -> usize {
        self.sections.iter().filter(|(_, v)| *v).count()
    }

    pub fn active_links(&self) -> Vec<&NavLink> {
        self.nav.iter().filter(|(_, a)| *a).map(|(l, _)| l).collect()
    }

    pub fn link_count(&self) -> usize {
        self.nav.len()
    }

    /// Split the screen into sidebar and content areas
    pub fn layout(area: Rect) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        (chunks[0], chunks[1])
    }

    pub fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .nav
            .iter()
            .enumerate()
            .map(|(i, (link, active))| {
                let style = if *active {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(Span::styled(
                    format!(" {}. {} ", i + 1, link.step.nav_label()),
                    style,
                )))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(" Workflow ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        );
        frame.render_widget(list, area);
    }

    /// Render the content of a non-report step
    pub fn render_step(&mut self, frame: &mut Frame, area: Rect, status: StepStatus) {
        let Some(step) = self.visible_step() else {
            return;
        };

        match step {
            WorkflowStep::Requirements => self.render_requirements(frame, area),
            WorkflowStep::Build => self.render_build(frame, area, status.build),
            WorkflowStep::Generate => self.render_generate(frame, area, status.assessment),
            WorkflowStep::Results => {}
        }
    }

    fn step_chunks(area: Rect, body: Constraint) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                body,
                Constraint::Length(1),
            ])
            .split(area)
    }

    fn render_heading(frame: &mut Frame, area: Rect, step: WorkflowStep) {
        let title = Paragraph::new(Line::from(Span::styled(
            step.title(),
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, area);
    }

    fn render_hint(frame: &mut Frame, area: Rect, context: ShortcutContext) {
        let hint = Paragraph::new(Span::styled(
            hint_line(context),
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(hint, area);
    }

    fn render_requirements(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Self::step_chunks(area, Constraint::Min(5));
        Self::render_heading(frame, chunks[0], WorkflowStep::Requirements);

        let description = Paragraph::new(
            "Describe the credit assessment capabilities you need. \
             The agent will build a solution tailored to these requirements.",
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(description, chunks[1]);

        self.requirements
            .render(frame, chunks[2], true, "Requirements");
        Self::render_hint(frame, chunks[3], ShortcutContext::Requirements);
    }

    fn render_build(&mut self, frame: &mut Frame, area: Rect, status: RunStatus) {
        let chunks = Self::step_chunks(area, Constraint::Min(5));
        Self::render_heading(frame, chunks[0], WorkflowStep::Build);

        let inner = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1)])
            .split(chunks[1]);
        frame.render_widget(
            Paragraph::new(
                "The agent will assemble an analysis system from your requirements.",
            )
            .wrap(Wrap { trim: true }),
            inner[0],
        );
        frame.render_widget(
            button(
                match status {
                    RunStatus::Idle => "Start Build",
                    RunStatus::Running => "Building...",
                    RunStatus::Complete => "Rebuild",
                },
                status != RunStatus::Running,
            ),
            inner[1],
        );

        self.build_log
            .render(frame, chunks[2], status == RunStatus::Running);
        Self::render_hint(frame, chunks[3], ShortcutContext::Build);
    }

    fn render_generate(&mut self, frame: &mut Frame, area: Rect, status: RunStatus) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(area);
        Self::render_heading(frame, chunks[0], WorkflowStep::Generate);

        frame.render_widget(
            Paragraph::new(self.generate_description.as_str()).wrap(Wrap { trim: true }),
            chunks[1],
        );
        self.company
            .render(frame, chunks[2], status != RunStatus::Running, "Company");
        frame.render_widget(
            button(
                if status == RunStatus::Running {
                    "Generating..."
                } else {
                    "Generate Assessment"
                },
                status != RunStatus::Running,
            ),
            chunks[3],
        );

        self.assessment_log
            .render(frame, chunks[4], status == RunStatus::Running);
        Self::render_hint(frame, chunks[5], ShortcutContext::Generate);
    }
}

/// A button-like label; disabled buttons are dimmed
fn button(label: &str, enabled: bool) -> Paragraph<'static> {
    let style = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).bg(Color::Black)
    };
    Paragraph::new(Span::styled(format!("  {}  ", label), style))
}

/// Splash shown before the workflow starts
pub fn render_title_slide(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Agentic AI Credit Analysis",
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("From requirements to a full credit assessment report,"),
        Line::from("built and run by an AI agent."),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to start the demo",
            Style::default().fg(Color::Gray),
        )),
    ];

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(9),
            Constraint::Min(0),
        ])
        .split(area);

    let slide = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(slide, vertical[1]);
}

impl SectionHost for WorkflowScreen {
    fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(|(s, _)| s.id().to_string()).collect()
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<(), ViewError> {
        match self.sections.iter_mut().find(|(s, _)| s.id() == id) {
            Some((_, v)) => {
                *v = visible;
                Ok(())
            }
            None => Err(ViewError::SectionNotFound(id.to_string())),
        }
    }
}

impl NavHost for WorkflowScreen {
    fn nav_links(&self) -> Vec<NavLink> {
        self.nav.iter().map(|(l, _)| l.clone()).collect()
    }

    fn set_active(&mut self, link_id: &str, active: bool) -> Result<(), ViewError> {
        match self.nav.iter_mut().find(|(l, _)| l.id == link_id) {
            Some((_, a)) => {
                *a = active;
                Ok(())
            }
            None => Err(ViewError::LinkNotFound(link_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::ViewSwitcher;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(screen: &mut WorkflowScreen, status: StepStatus) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| {
                let (sidebar, content) = WorkflowScreen::layout(f.area());
                screen.render_sidebar(f, sidebar);
                screen.render_step(f, content, status);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_switcher_drives_screen() {
        let mut screen = WorkflowScreen::new();
        let mut switcher = ViewSwitcher::default();

        switcher.show_step(&mut screen, "generate");

        assert_eq!(screen.visible_step(), Some(WorkflowStep::Generate));
        assert_eq!(screen.visible_count(), 1);
        let active = screen.active_links();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "nav-generate");
    }

    #[test]
    fn test_nothing_visible_before_first_switch() {
        let screen = WorkflowScreen::new();
        assert_eq!(screen.visible_step(), None);
        assert!(screen.active_links().is_empty());
    }

    #[test]
    fn test_generate_button_disabled_while_running() {
        let mut screen = WorkflowScreen::new();
        ViewSwitcher::default().show(&mut screen, WorkflowStep::Generate);

        let running = StepStatus {
            assessment: RunStatus::Running,
            ..StepStatus::default()
        };
        assert!(screen_text(&mut screen, running).contains("Generating..."));
        assert!(!screen_text(&mut screen, StepStatus::default()).contains("Generating..."));
    }

    #[test]
    fn test_sidebar_lists_all_steps() {
        let mut screen = WorkflowScreen::new();
        ViewSwitcher::default().show(&mut screen, WorkflowStep::Build);

        let text = screen_text(&mut screen, StepStatus::default());
        for step in WorkflowStep::all() {
            assert!(text.contains(step.nav_label()), "missing {}", step.nav_label());
        }
        assert!(text.contains("Start Build"));
    }
}

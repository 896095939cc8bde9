use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Config;
use crate::report::{renderer_for, ChartRegistry, ReportDocument, ReportRenderer};
use crate::sequencer::scripts::{
    assessment_steps, build_steps, rendering_steps, BUILD_COMPLETE_DESCRIPTION,
};
use crate::sequencer::{ChannelSink, LogEntry, SequenceReport, SinkEvent, StepSequencer};
use crate::session::{RunStatus, SessionError, SessionState};
use crate::ui::keybindings::{hint_line, ShortcutContext};
use crate::ui::report_view::ReportView;
use crate::ui::terminal_guard::TerminalGuard;
use crate::ui::workflow_view::{render_title_slide, StepStatus, WorkflowScreen};
use crate::ui::{HeaderBar, HelpDialog, NotificationDialog, NotificationKind, StatusBar};
use crate::workflow::{ViewSwitcher, WorkflowStep, EXAMPLE_REQUIREMENTS};

/// Messages from background sequencer and renderer tasks to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    BuildLog(SinkEvent),
    AssessmentLog(SinkEvent),
    BuildFinished(SequenceReport),
    /// The post-build pause elapsed
    RevealGenerate,
    AssessmentFinished(SequenceReport),
    ReportReady(Result<ReportDocument, String>),
}

pub struct App {
    config: Config,
    switcher: ViewSwitcher,
    screen: WorkflowScreen,
    report_view: ReportView,
    charts: ChartRegistry,
    renderer: Arc<dyn ReportRenderer>,
    demo: SessionState,
    show_title: bool,
    build: SessionState,
    assessment: SessionState,
    /// Company of the most recent assessment, used for retries
    report_company: Option<String>,
    help_dialog: HelpDialog,
    notification: NotificationDialog,
    status_bar: StatusBar,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let renderer = renderer_for(&config);
        let report_view = ReportView::new(config.ui.scrollspy_lookahead, config.ui.scroll_margin);

        let mut app = Self {
            switcher: ViewSwitcher::default(),
            screen: WorkflowScreen::new(),
            report_view,
            charts: ChartRegistry::default(),
            renderer,
            demo: SessionState::new("demo"),
            show_title: config.ui.show_title_slide,
            build: SessionState::new("build"),
            assessment: SessionState::new("assessment"),
            report_company: None,
            help_dialog: HelpDialog::new(),
            notification: NotificationDialog::new(),
            status_bar: StatusBar::default(),
            tx,
            rx,
            should_quit: false,
            config,
        };

        app.switcher.initialize(&mut app.screen);
        app.log_status("Agent prompt instructions loaded");
        if !app.show_title {
            app.start_demo();
        }
        app
    }

    /// Prefill the company name on the Generate step
    pub fn prefill_company(&mut self, company: &str) {
        self.screen.company.set_value(company);
    }

    pub fn current_step(&self) -> Option<WorkflowStep> {
        self.switcher.current()
    }

    pub async fn run(&mut self) -> Result<()> {
        let guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(std::io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        while !self.should_quit {
            self.drain_events();
            self.report_view.tick();

            terminal.draw(|f| self.draw(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        guard.restore();
        terminal.show_cursor()?;
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let debug = self.config.ui.debug;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(if debug { 2 } else { 0 }),
            ])
            .split(frame.area());

        let company = self.report_company.clone();
        let hint = if self.show_title {
            "Enter Start · Ctrl+q Quit".to_string()
        } else {
            format!("F1 Help · {}", self.hint())
        };
        HeaderBar {
            version: env!("CARGO_PKG_VERSION"),
            company: company.as_deref(),
            hint,
        }
        .render(frame, chunks[0]);

        if self.show_title {
            render_title_slide(frame, chunks[1]);
        } else {
            let (sidebar, content) = WorkflowScreen::layout(chunks[1]);
            self.screen.render_sidebar(frame, sidebar);
            if self.screen.visible_step() == Some(WorkflowStep::Results) {
                self.report_view.render(frame, content);
            } else {
                let status = StepStatus {
                    build: self.build.status(),
                    assessment: self.assessment.status(),
                };
                self.screen.render_step(frame, content, status);
            }
        }

        if debug {
            self.refresh_status_counts();
            self.status_bar.render(frame, chunks[2]);
        }

        self.help_dialog.render(frame);
        self.notification.render(frame);
    }

    fn refresh_status_counts(&mut self) {
        self.status_bar.sections = self.report_view.section_count();
        self.status_bar.links = self.screen.link_count() + self.report_view.spy().len();
        self.status_bar.active_step = self
            .switcher
            .current()
            .map(|s| s.id().to_string())
            .unwrap_or_default();
    }

    /// Write a status line to the log panel, the debug bar and the session log
    fn log_status(&mut self, message: &str) {
        tracing::info!(status = message);
        self.status_bar.set_message(message);
        self.screen.build_log.push(LogEntry::info(message));
    }

    fn log_error(&mut self, message: &str) {
        tracing::error!(status = message);
        self.status_bar.set_message(message);
        self.screen.build_log.push(LogEntry::error(message));
    }

    /// Leave the title slide. Only the first start has an effect.
    fn start_demo(&mut self) {
        match self.demo.begin_once() {
            Ok(()) => {
                let _ = self.demo.finish();
                self.show_title = false;
                tracing::info!("Demo started");
            }
            Err(SessionError::AlreadyStarted(_)) => {
                tracing::debug!("Demo already started");
            }
            Err(e) => tracing::warn!(error = %e, "Could not start demo"),
        }
    }

    fn navigate(&mut self, step: WorkflowStep) {
        let shown = self.switcher.show_step(&mut self.screen, step.id());
        self.status_bar.active_step = shown.id().to_string();
    }

    fn context(&self) -> ShortcutContext {
        match self.switcher.current() {
            Some(WorkflowStep::Requirements) | None => ShortcutContext::Requirements,
            Some(WorkflowStep::Build) => ShortcutContext::Build,
            Some(WorkflowStep::Generate) => ShortcutContext::Generate,
            Some(WorkflowStep::Results) => ShortcutContext::Report,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        if self.notification.visible {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notification.dismiss();
            }
            return;
        }

        if self.help_dialog.visible {
            self.help_dialog.visible = false;
            return;
        }

        if key.code == KeyCode::F(1) {
            self.help_dialog.toggle();
            return;
        }

        if self.show_title {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.start_demo();
            }
            return;
        }

        match key.code {
            KeyCode::Tab => {
                let step = self.switcher.current().unwrap_or_default().next();
                self.navigate(step);
                return;
            }
            KeyCode::BackTab => {
                let step = self.switcher.current().unwrap_or_default().previous();
                self.navigate(step);
                return;
            }
            _ => {}
        }

        match self.context() {
            ShortcutContext::Requirements => self.handle_requirements_key(key, ctrl),
            ShortcutContext::Build => {
                if key.code == KeyCode::Enter {
                    self.start_build();
                }
            }
            ShortcutContext::Generate => {
                if key.code == KeyCode::Enter {
                    self.generate();
                } else if !self.assessment.is_running() {
                    self.screen.company.handle_key(key);
                }
            }
            ShortcutContext::Report => self.handle_report_key(key),
            ShortcutContext::Global => {}
        }
    }

    fn handle_requirements_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char('e') if ctrl => {
                self.screen.requirements.set_value(EXAMPLE_REQUIREMENTS);
                self.log_status("Example requirements loaded");
            }
            KeyCode::Char('n') if ctrl => {
                if self.screen.requirements.is_blank() {
                    tracing::warn!("Continuing without requirements");
                }
                self.navigate(WorkflowStep::Build);
                self.log_status("Navigated to build step");
            }
            _ => {
                self.screen.requirements.handle_key(key);
            }
        }
    }

    fn handle_report_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.report_view.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.report_view.scroll_by(-1),
            KeyCode::PageDown => self.report_view.page_down(),
            KeyCode::PageUp => self.report_view.page_up(),
            KeyCode::Char('g') | KeyCode::Home => self.report_view.scroll_to_top(),
            KeyCode::Char('G') | KeyCode::End => self.report_view.scroll_to_bottom(),
            KeyCode::Char(']') => self.report_view.next_section(),
            KeyCode::Char('[') => self.report_view.previous_section(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.report_view.toggle_active_section();
            }
            KeyCode::Char('r') => self.retry_report(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.report_view.select_section(index);
            }
            _ => {}
        }
    }

    /// Start the build sequence unless one is already running
    pub fn start_build(&mut self) {
        if let Err(e) = self.build.begin() {
            tracing::info!(error = %e, "Ignoring build request");
            return;
        }

        self.screen.build_log.clear();
        self.status_bar.set_message("Starting agentic build");

        let sequencer = StepSequencer::from_config(
            &self.config.sequencer,
            self.config.sequencer.build_typing_ms,
        );
        let pause = Duration::from_millis(self.config.sequencer.build_complete_pause_ms);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let sink = ChannelSink::new(tx.clone(), AppEvent::BuildLog);
            let steps = build_steps();
            let done = tx.clone();
            sequencer
                .run(&steps, Some(&sink), move |report| {
                    send_event(&done, AppEvent::BuildFinished(report.clone()));
                })
                .await;

            tokio::time::sleep(pause).await;
            send_event(&tx, AppEvent::RevealGenerate);
        });
    }

    /// Validate the company name and start the assessment sequence
    pub fn generate(&mut self) {
        let company = self.screen.company.value().trim().to_string();
        if company.is_empty() {
            self.notification.show(
                NotificationKind::Warning,
                "Company name required",
                "Please enter a company name",
            );
            tracing::warn!("Assessment requested without a company name");
            return;
        }

        if let Err(e) = self.assessment.begin() {
            tracing::info!(error = %e, "Ignoring assessment request");
            return;
        }

        self.screen.assessment_log.clear();
        self.report_company = Some(company.clone());
        self.status_bar.set_message(&format!("Assessing {company}"));

        let sequencer = StepSequencer::from_config(
            &self.config.sequencer,
            self.config.sequencer.assessment_typing_ms,
        );
        let mut steps = assessment_steps(&company);
        steps.extend(rendering_steps(self.config.sequencer.render_pause_ms));
        let renderer = Arc::clone(&self.renderer);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let sink = ChannelSink::new(tx.clone(), AppEvent::AssessmentLog);
            let done = tx.clone();
            sequencer
                .run(&steps, Some(&sink), move |report| {
                    send_event(&done, AppEvent::AssessmentFinished(report.clone()));
                })
                .await;

            let result = renderer.render(&company).await.map_err(|e| e.to_string());
            send_event(&tx, AppEvent::ReportReady(result));
        });
    }

    fn retry_report(&mut self) {
        if !self.report_view.is_failed() {
            return;
        }
        let Some(company) = self.report_company.clone() else {
            return;
        };

        self.report_view.set_loading();
        let renderer = Arc::clone(&self.renderer);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = renderer.render(&company).await.map_err(|e| e.to_string());
            send_event(&tx, AppEvent::ReportReady(result));
        });
    }

    /// Apply every pending background event
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::BuildLog(ev) => {
                let finished_line = matches!(ev, SinkEvent::ScrollToLatest);
                if let Err(e) = self.screen.build_log.apply(ev) {
                    tracing::debug!(error = %e, "Dropped build log event");
                }
                if finished_line {
                    let last = self.screen.build_log.typing_text().map(str::to_string);
                    if let Some(text) = last {
                        self.status_bar.set_message(&text);
                    }
                }
            }
            AppEvent::AssessmentLog(ev) => {
                if let Err(e) = self.screen.assessment_log.apply(ev) {
                    tracing::debug!(error = %e, "Dropped assessment log event");
                }
            }
            AppEvent::BuildFinished(report) => {
                if let Err(e) = self.build.finish() {
                    tracing::warn!(error = %e, "Build finished while not running");
                }
                tracing::info!(run_id = %report.run_id, steps = report.steps_run, "Build finished");
            }
            AppEvent::RevealGenerate => {
                self.screen.generate_description = BUILD_COMPLETE_DESCRIPTION.to_string();
                self.navigate(WorkflowStep::Generate);
            }
            AppEvent::AssessmentFinished(report) => {
                if let Err(e) = self.assessment.finish() {
                    tracing::warn!(error = %e, "Assessment finished while not running");
                }
                tracing::info!(run_id = %report.run_id, "Assessment finished");
                self.report_view.set_loading();
                self.navigate(WorkflowStep::Results);
            }
            AppEvent::ReportReady(Ok(mut doc)) => {
                let bound = self.charts.initialize(&mut doc);
                tracing::info!(sections = doc.sections.len(), charts = bound, "Report mounted");
                self.report_view.mount(doc);
                self.log_status("Report displayed");
                if self.switcher.current() != Some(WorkflowStep::Results) {
                    self.navigate(WorkflowStep::Results);
                }
            }
            AppEvent::ReportReady(Err(message)) => {
                self.log_error(&format!("Error loading report: {message}"));
                self.report_view.fail(message);
                if self.switcher.current() != Some(WorkflowStep::Results) {
                    self.navigate(WorkflowStep::Results);
                }
            }
        }
    }

    pub fn build_status(&self) -> RunStatus {
        self.build.status()
    }

    pub fn assessment_status(&self) -> RunStatus {
        self.assessment.status()
    }

    /// Key hint for the step currently shown
    pub fn hint(&self) -> String {
        hint_line(self.context())
    }
}

fn send_event(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.send(event) {
        tracing::debug!(error = %e, "UI event dropped, receiver closed");
    }
}

//! Main TUI application state machine.
//!
//! Handles:
//! - Startup splash
//! - Form input and blocking dialogs
//! - Prediction via the background task runner

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame, Terminal,
};

use crate::adapters::gbm::GbmPredictor;
use crate::adapters::hospitals::load_hospitals;
use crate::application::{Completion, FormSession, RunnerState, Submit, TaskRunner};
use crate::config::AppConfig;
use crate::ports::Predictor;
use crate::RiskError;

use super::styles::Theme;
use super::ui::{
    dialog::{render_dialog, Dialog},
    form::render_form,
    loading::render_busy_indicator,
    render_status_bar,
};

/// Main application state
pub struct App {
    config: AppConfig,

    /// Whether the app should quit
    should_quit: bool,

    session: FormSession,

    runner: TaskRunner,

    /// Open dialog; form input is blocked while set
    dialog: Option<Dialog>,

    /// Cached predictor description for the status bar and About dialog
    model_description: Option<String>,
}

impl App {
    /// Create the application, loading the hospital list and the model.
    ///
    /// A model that fails to load is logged and leaves the app running
    /// without a predictor; predict requests then report the failure.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let hospitals = load_hospitals(&config.hospitals_file);

        let predictor: Option<Arc<dyn Predictor>> =
            match GbmPredictor::load(&config.model_dir, &config.model_id) {
                Ok(predictor) => Some(Arc::new(predictor)),
                Err(e) => {
                    tracing::error!(
                        "Failed to load model '{}' from {:?}: {}",
                        config.model_id,
                        config.model_dir,
                        e
                    );
                    None
                }
            };

        Self::with_dependencies(config, predictor, hospitals)
    }

    /// Create the application with an injected predictor and hospital list.
    #[must_use]
    pub fn with_dependencies(
        config: AppConfig,
        predictor: Option<Arc<dyn Predictor>>,
        hospitals: Vec<String>,
    ) -> Self {
        let runner = TaskRunner::new(predictor, &config);
        let model_description = runner.predictor_description();

        Self {
            config,
            should_quit: false,
            session: FormSession::new(hospitals),
            runner,
            dialog: None,
            model_description,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.runner
            .begin_startup(Instant::now(), self.config.startup_delay);

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.poll_worker();
            self.runner.tick(Instant::now());

            terminal.draw(|f| self.draw(f))?;

            // Short poll keeps the indicator animating.
            if event::poll(Duration::from_millis(20))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key.code, key.modifiers);
                }
            }

            if self.should_quit {
                tracing::info!("Quit requested");
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, f: &mut Frame) {
        let area = f.area();
        f.render_widget(Block::default().style(Theme::base()), area);

        // The form only appears once the startup splash is over.
        if self.runner.state() == RunnerState::Starting {
            render_busy_indicator(f, area, self.runner.indicator());
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        render_form(f, chunks[0], &self.session, self.runner.is_busy());
        render_status_bar(f, chunks[1], self.model_description.as_deref());
        render_busy_indicator(f, area, self.runner.indicator());

        if let Some(dialog) = &self.dialog {
            render_dialog(f, area, dialog);
        }
    }

    /// Hand a finished prediction to the form or an error dialog.
    fn poll_worker(&mut self) {
        match self.runner.poll() {
            Some(Completion::Succeeded(result)) => self.session.apply_result(result),
            Some(Completion::Failed(e)) => self.show_error(&e),
            None => {}
        }
    }

    fn show_error(&mut self, error: &RiskError) {
        self.dialog = Some(Dialog::from_error(error));
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        // Global quit handling
        if key == KeyCode::Char('q') && ctrl {
            self.should_quit = true;
            return;
        }

        if self.runner.state() == RunnerState::Starting {
            return;
        }

        if self.dialog.is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc) {
                self.dialog = None;
            }
            return;
        }

        // The form is frozen while a prediction is in flight; repeated
        // predict requests reach the runner and are dropped there.
        if self.runner.is_busy() {
            if key == KeyCode::Enter {
                self.predict();
            }
            return;
        }

        match key {
            KeyCode::Enter => self.predict(),
            KeyCode::F(1) => {
                self.dialog = Some(Dialog::About {
                    model: self.model_description.clone(),
                });
            }
            KeyCode::Up | KeyCode::BackTab => self.session.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.session.next_field(),
            KeyCode::Left => self.session.cycle_choice(false),
            KeyCode::Right => self.session.cycle_choice(true),
            KeyCode::Backspace => self.session.delete_char(),
            KeyCode::Delete => self.session.clear_field(),
            KeyCode::Char('s') if ctrl => self.session.load_sample_data(),
            KeyCode::Char('r') if ctrl => self.session.clear(),
            KeyCode::Char(c) if !ctrl => self.session.input_char(c),
            _ => {}
        }
    }

    fn predict(&mut self) {
        let record = self.session.collect();
        match self.runner.request(record, Instant::now()) {
            Ok(Submit::Dispatched | Submit::Ignored) => {}
            Err(e) => self.show_error(&e),
        }
    }
}

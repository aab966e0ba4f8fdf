//! Main TUI application state.
//!
//! Handles input events and runs predictions synchronously; the pipeline is
//! a handful of arithmetic passes, so there is no background worker. Form
//! inputs persist between predictions and are wiped when the app quits.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::artifacts::{ArtifactClassifier, ArtifactRegressor, StandardScaler};
use crate::application::{ArtifactBundle, PredictionService};
use crate::config::Settings;

use super::ui::{
    form::{render_form, FormState},
    render_disclaimer, render_header,
    result::{render_result, ResultState},
};

type Service = PredictionService<ArtifactClassifier, StandardScaler, ArtifactRegressor>;

/// Main application state
pub struct App {
    should_quit: bool,
    service: Service,
    form: FormState,
    result: ResultState,
}

impl App {
    /// Load the model bundle described by `settings` and build the app.
    ///
    /// # Errors
    /// Returns error if the signing key is malformed or the model artifacts
    /// cannot be loaded; the app never starts without a complete bundle.
    pub fn new(settings: &Settings) -> Result<Self> {
        let policy = settings
            .artifact_policy()
            .context("Invalid model signing configuration")?;
        let bundle = ArtifactBundle::from_artifacts(&settings.model_path, &policy).with_context(|| {
            format!(
                "Failed to load model artifacts from {:?}. Set ONCOSURV_MODEL_PATH to a directory \
                 containing the classifier, scaler and regressor JSON files.",
                settings.model_path
            )
        })?;
        Ok(Self::with_service(PredictionService::new(Arc::new(bundle))))
    }

    /// Create application with an already-built service (composition root).
    #[must_use]
    pub fn with_service(service: Service) -> Self {
        Self {
            should_quit: false,
            service,
            form: FormState::default(),
            result: ResultState::default(),
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                    .split(rows[1]);

                render_header(f, rows[0]);
                render_form(f, columns[0], &self.form);
                render_result(f, columns[1], &self.result);
                render_disclaimer(f, rows[2]);
            })?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return;
        }

        match key {
            KeyCode::Esc => self.quit(),
            KeyCode::Up | KeyCode::BackTab => self.form.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.form.next_field(),
            KeyCode::Left => self.form.cycle_choice(-1),
            KeyCode::Right => self.form.cycle_choice(1),
            KeyCode::Char('s') | KeyCode::Char('S') => self.form.load_sample_data(),
            KeyCode::Char(c) => self.form.input_char(c),
            KeyCode::Backspace => self.form.delete_char(),
            KeyCode::Delete => self.form.clear_field(),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn quit(&mut self) {
        self.form.clear_sensitive();
        self.should_quit = true;
    }

    fn submit(&mut self) {
        let record = match self.form.to_record() {
            Ok(record) => record,
            Err(message) => {
                self.form.error_message = Some(message);
                return;
            }
        };

        self.result = match self.service.predict(&record) {
            Ok(result) => ResultState::Complete(result),
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                ResultState::Error(e.to_string())
            }
        };
    }
}

//! Main TUI application state and logic

use crate::interpreter::{define_binding, Interpreter};
use crate::parser::ast::Span;
use crate::repl::Command;
use crate::runtime::{display, Environment};
use crate::stepper::{Session, StepError};
use crate::ui::panes::{
    render_branch_pane, render_rendered_pane, render_source_pane, render_status_bar,
    BranchRenderData, BranchScrollState, RenderedScrollState, SourceRenderData,
    SourceScrollState, StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Rendered,
    Branch,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> rendered -> branch)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Rendered,
            FocusedPane::Rendered => FocusedPane::Branch,
            FocusedPane::Branch => FocusedPane::Source,
        }
    }
}

/// Keyboard routing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing after `:`
    Command(String),
}

/// The main application state
pub struct App {
    pub session: Session,
    pub interpreter: Interpreter,

    /// Bindings shared by every evaluation
    pub env: Environment,

    pub focused_pane: FocusedPane,
    pub input_mode: InputMode,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub rendered_scroll: RenderedScrollState,
    pub branch_scroll: BranchScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
    pub status_is_error: bool,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,
}

impl App {
    pub fn new(session: Session, interpreter: Interpreter, env: Environment) -> Self {
        App {
            session,
            interpreter,
            env,
            focused_pane: FocusedPane::Rendered,
            input_mode: InputMode::Normal,
            source_scroll: SourceScrollState::default(),
            rendered_scroll: RenderedScrollState::default(),
            branch_scroll: BranchScrollState::default(),
            should_quit: false,
            status_message: String::from("Ready!"),
            status_is_error: false,
            is_playing: false,
            last_play_time: Instant::now(),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_secs(1) {
                self.advance(1);
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Rendering (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        let is_finished = self.session.is_finished();
        let tree = self.session.tree();
        let marks: Vec<Span> = self
            .session
            .last_rendering()
            .map(|r| r.substitutions.iter().map(|s| s.original).collect())
            .unwrap_or_default();
        let failed: Vec<Span> = self
            .session
            .pending_retry()
            .map(|b| b.iter().map(|id| tree.node(id).span).collect())
            .unwrap_or_default();

        render_source_pane(
            frame,
            left_rows[0],
            SourceRenderData {
                source: tree.source(),
                marks: &marks,
                failed: &failed,
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_rendered_pane(
            frame,
            left_rows[1],
            self.session.last_rendering(),
            self.session.step(),
            self.focused_pane == FocusedPane::Rendered,
            &mut self.rendered_scroll,
        );

        render_branch_pane(
            frame,
            columns[1],
            BranchRenderData {
                tree,
                current: self.session.current_branch().zip(self.session.last_rendering()),
                retry: self.session.pending_retry(),
            },
            self.focused_pane == FocusedPane::Branch,
            &mut self.branch_scroll,
        );

        let command = match &self.input_mode {
            InputMode::Command(text) => Some(text.as_str()),
            InputMode::Normal => None,
        };
        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                step: self.session.step(),
                is_error: self.status_is_error,
                is_finished,
                is_playing: self.is_playing,
                command,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if let InputMode::Command(text) = &mut self.input_mode {
            match key.code {
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Enter => {
                    let line = std::mem::take(text);
                    self.input_mode = InputMode::Normal;
                    self.execute(&line);
                }
                KeyCode::Backspace => {
                    text.pop();
                }
                KeyCode::Char(c) => text.push(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys advance N branches at once
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).map_or(1, |d| d as usize);
                self.advance(n);
            }
            KeyCode::Right | KeyCode::Enter => {
                self.is_playing = false;
                self.advance(1);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.is_playing = false;
                self.restart();
            }
            KeyCode::Char(':') => {
                self.is_playing = false;
                self.input_mode = InputMode::Command(String::new());
            }
            KeyCode::Char(' ') => {
                self.is_playing = !self.is_playing;
                if self.is_playing {
                    self.last_play_time = Instant::now()
                        .checked_sub(Duration::from_secs(1))
                        .unwrap_or(Instant::now());
                    self.set_status("Playing...", false);
                } else {
                    self.set_status("Paused", false);
                }
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => {
                let offset = self.focused_scroll();
                *offset = offset.saturating_sub(1);
            }
            KeyCode::Down => {
                let offset = self.focused_scroll();
                *offset = offset.saturating_add(1);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll.offset,
            FocusedPane::Rendered => &mut self.rendered_scroll.offset,
            FocusedPane::Branch => &mut self.branch_scroll.offset,
        }
    }

    /// Run a line typed after `:`
    pub fn execute(&mut self, line: &str) {
        match Command::parse(line) {
            Ok(Command::Advance(count)) => self.advance(count),
            Ok(Command::Restart) => self.restart(),
            Ok(Command::Quit) => self.should_quit = true,
            Ok(Command::Set { name, source }) => {
                let result = define_binding(&mut self.interpreter, &mut self.env, &name, &source)
                    .and_then(|value| display(&value));
                match result {
                    Ok(shown) => self.set_status(&format!("{} = {}", name, shown), false),
                    Err(err) => self.set_status(&err.to_string(), true),
                }
            }
            Err(err) => self.set_status(&err.to_string(), true),
        }
    }

    /// Advance the session by `count` branches
    pub fn advance(&mut self, count: usize) {
        match self
            .session
            .advance(count, &mut self.interpreter, &mut self.env)
        {
            Ok(_) => {
                let message = format!("Rendered step {}", self.session.step() - 1);
                self.set_status(&message, false);
                self.rendered_scroll.offset = 0;
                self.branch_scroll.offset = 0;
            }
            Err(StepError::Finished) => {
                self.is_playing = false;
                self.set_status("Finished: every branch has been evaluated", false);
            }
            Err(err) => {
                self.is_playing = false;
                log::debug!("step failed: {}", err);
                self.set_status(&err.to_string(), true);
            }
        }
    }

    fn restart(&mut self) {
        self.session.restart();
        self.rendered_scroll.offset = 0;
        self.branch_scroll.offset = 0;
        self.set_status("Restarted", false);
    }

    fn set_status(&mut self, message: &str, is_error: bool) {
        self.status_message = message.to_string();
        self.status_is_error = is_error;
    }
}

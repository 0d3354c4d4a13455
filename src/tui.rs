//! TUI (Terminal User Interface) front end
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiInterface`: renders the board and turns key presses into `UserAction`s
//!
//! # State Machine
//! The UI follows these state transitions:
//! - `MarkingFeedback` → `ConfirmingFeedback` → (game loop merges) → `MarkingFeedback`
//! - `NoCandidates` is entered when every word has been filtered out; only
//!   undo, new game or quit leave it.
//!
//! Each letter of the suggested guess is marked G (confirmed in this slot),
//! Y (in the word, elsewhere) or X (neither). Confirming turns the marks into
//! the same `pattern,included` line the line-based CLI accepts.

use crate::constraints::{ConstraintError, Constraints};
use crate::game_state::{GameInterface, Recommendation, UserAction};
use crate::word::Word;
use crate::{WILDCARD, WORD_LENGTH};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const MAX_CANDIDATES_DISPLAY: usize = 10;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LetterState {
    Unmarked,
    Confirmed, // Green
    Included,  // Yellow
    Absent,    // Gray
}

impl LetterState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Unmarked => (Color::DarkGray, Color::White),
            Self::Confirmed => (Color::Green, Color::Black),
            Self::Included => (Color::Yellow, Color::Black),
            Self::Absent => (Color::Gray, Color::White),
        }
    }
}

#[derive(Debug, Clone)]
struct GuessRow {
    letters: [char; WORD_LENGTH],
    states: [LetterState; WORD_LENGTH],
}

impl GuessRow {
    fn from_guess(guess: &Word) -> Self {
        let mut letters = [' '; WORD_LENGTH];
        for (slot, letter) in letters.iter_mut().zip(guess.letters()) {
            *slot = char::from(letter);
        }
        Self {
            letters,
            states: [LetterState::Unmarked; WORD_LENGTH],
        }
    }

    fn clear_marks(&mut self) {
        self.states = [LetterState::Unmarked; WORD_LENGTH];
    }

    /// The `pattern,included` feedback line the marks describe.
    fn to_feedback_line(&self) -> String {
        let mut pattern = String::with_capacity(WORD_LENGTH);
        let mut included = String::new();
        for (&letter, &state) in self.letters.iter().zip(&self.states) {
            match state {
                LetterState::Confirmed => pattern.push(letter),
                LetterState::Included => {
                    pattern.push(WILDCARD);
                    included.push(letter);
                }
                LetterState::Absent | LetterState::Unmarked => pattern.push(WILDCARD),
            }
        }
        if included.is_empty() {
            pattern
        } else {
            format!("{pattern},{included}")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    MarkingFeedback { marking_index: usize },
    ConfirmingFeedback,
    NoCandidates,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    rows: &'a [GuessRow],
    current: Option<&'a GuessRow>,
    state: TuiState,
    candidates_display: &'a [Word],
    candidate_count: usize,
    recommendation: Option<&'a Recommendation>,
    constraints: &'a Constraints,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and session display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    rows: Vec<GuessRow>,
    current: Option<GuessRow>,
    submitted: Option<GuessRow>,
    state: TuiState,
    candidates_display: Vec<Word>,
    candidate_count: usize,
    recommendation: Option<Recommendation>,
    constraints: Constraints,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    /// # Errors
    /// Returns an error if the terminal cannot be switched to raw mode or the
    /// alternate screen.
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: raw mode, alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            rows: Vec::new(),
            current: None,
            submitted: None,
            state: TuiState::MarkingFeedback { marking_index: 0 },
            candidates_display: Vec::new(),
            candidate_count: 0,
            recommendation: None,
            constraints: Constraints::default(),
            message: String::new(),
            error_message: String::new(),
            status: "Ready".to_string(),
        })
    }

    /// Restores the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot leave raw mode or the
    /// alternate screen.
    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            rows: &self.rows,
            current: self.current.as_ref(),
            state: self.state,
            candidates_display: &self.candidates_display,
            candidate_count: self.candidate_count,
            recommendation: self.recommendation.as_ref(),
            constraints: &self.constraints,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Title
                Constraint::Length(14), // Board
                Constraint::Min(8),     // Info panel
                Constraint::Length(3),  // Status line
                Constraint::Length(3),  // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("WORDLE CONSTRAINT SOLVER")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default().title("Guesses").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let available_rows = (inner.height / ROW_SPACING) as usize;
        let rows: Vec<&GuessRow> = ctx.rows.iter().chain(ctx.current).collect();
        // Show the most recent rows when they don't all fit
        let skip_count = rows.len().saturating_sub(available_rows);

        for (display_index, row) in rows.iter().skip(skip_count).enumerate() {
            let is_current = ctx.current.is_some() && skip_count + display_index == rows.len() - 1;
            let marking = match ctx.state {
                TuiState::MarkingFeedback { marking_index } if is_current => Some(marking_index),
                _ => None,
            };
            Self::render_guess_row(f, row, display_index, inner, marking);
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_guess_row(
        f: &mut Frame,
        row: &GuessRow,
        row_index: usize,
        area: Rect,
        marking: Option<usize>,
    ) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  ")];
        for (letter, state) in row.letters.iter().zip(row.states) {
            let (bg_color, fg_color) = state.colors();
            spans.push(Span::styled(
                format!(" {} ", letter.to_ascii_uppercase()),
                Style::default().fg(fg_color).bg(bg_color),
            ));
            spans.push(Span::raw(" "));
        }

        if let Some(marking_index) = marking {
            spans.push(Span::raw(format!(
                " <- Marking letter {} (G/Y/X)",
                marking_index + 1
            )));
        }

        let paragraph = Paragraph::new(Line::from(spans));
        f.render_widget(
            paragraph,
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = Vec::new();

        if let Some(rec) = ctx.recommendation {
            lines.push(Line::from(vec![Span::styled(
                format!(
                    "Round {}: guess {} ({} tied, score {:.4})",
                    rec.round, rec.guess, rec.tied, rec.score
                ),
                SUCCESS_STYLE,
            )]));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![Span::styled(
            format!(
                "Known: {}   included: [{}]   excluded: [{}]",
                ctx.constraints.pattern,
                ctx.constraints.included,
                ctx.constraints.effective_excluded()
            ),
            HEADER_STYLE,
        )]));
        lines.push(Line::from(""));

        lines.push(Line::from(vec![Span::styled(
            format!("Possible candidates ({}):", ctx.candidate_count),
            INFO_STYLE,
        )]));
        for word in ctx.candidates_display {
            lines.push(Line::from(format!("  {word}")));
        }
        if ctx.candidate_count > ctx.candidates_display.len() {
            lines.push(Line::from(format!(
                "  ... and {} more",
                ctx.candidate_count - ctx.candidates_display.len()
            )));
        }
        lines.push(Line::from(""));

        if !ctx.message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.message, MESSAGE_STYLE)]));
        }
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
        let text = match state {
            TuiState::MarkingFeedback { .. } => {
                "G: in place | Y: elsewhere | X: absent | BACKSPACE: back | R: refilter | U: undo | N: new | ESC: quit"
            }
            TuiState::ConfirmingFeedback => "ENTER: Confirm feedback | BACKSPACE: Go back and edit",
            TuiState::NoCandidates => "U: Undo last round | N: New game | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => {
                // Only process Press events, ignore Release and Repeat to avoid double input
                if key.kind != event::KeyEventKind::Press || Self::has_modifier_keys(&key) {
                    debug_log!("handle_input() - Ignoring key event: {:?}", key);
                    return Ok(None);
                }
                debug_log!("handle_input() - Key {:?} in state {:?}", key.code, self.state);
                Ok(self.handle_key(key))
            }
            other => {
                debug_log!("handle_input() - Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        match (self.state, key.code) {
            (_, KeyCode::Esc) => Some(UserAction::Exit),
            (_, KeyCode::Char('u' | 'U')) => Some(UserAction::Undo),
            (_, KeyCode::Char('n' | 'N')) => Some(UserAction::NewGame),
            (TuiState::NoCandidates, _) => None,
            (TuiState::MarkingFeedback { .. }, KeyCode::Char('r' | 'R')) => {
                self.submitted = None;
                Some(UserAction::Feedback(String::new()))
            }
            (TuiState::MarkingFeedback { marking_index }, code) => {
                self.handle_marking_key(marking_index, code);
                None
            }
            (TuiState::ConfirmingFeedback, KeyCode::Enter) => {
                let row = self.current.clone()?;
                let line = row.to_feedback_line();
                info_log!("handle_key() - Submitting feedback '{}'", line);
                self.submitted = Some(row);
                self.status = "Merging feedback...".to_string();
                Some(UserAction::Feedback(line))
            }
            (TuiState::ConfirmingFeedback, KeyCode::Backspace) => {
                if let Some(row) = self.current.as_mut() {
                    row.states[WORD_LENGTH - 1] = LetterState::Unmarked;
                }
                self.state = TuiState::MarkingFeedback {
                    marking_index: WORD_LENGTH - 1,
                };
                None
            }
            (TuiState::ConfirmingFeedback, _) => None,
        }
    }

    fn handle_marking_key(&mut self, marking_index: usize, code: KeyCode) {
        self.error_message.clear();
        let Some(row) = self.current.as_mut() else {
            return;
        };

        let mark = match code {
            KeyCode::Char('g' | 'G') => LetterState::Confirmed,
            KeyCode::Char('y' | 'Y') => LetterState::Included,
            KeyCode::Char('x' | 'X') => LetterState::Absent,
            KeyCode::Backspace if marking_index > 0 => {
                row.states[marking_index - 1] = LetterState::Unmarked;
                self.state = TuiState::MarkingFeedback {
                    marking_index: marking_index - 1,
                };
                return;
            }
            KeyCode::Char(c) => {
                self.error_message = format!(
                    "Use G (in place), Y (elsewhere) or X (absent). ('{}' is not valid)",
                    c.to_ascii_uppercase()
                );
                return;
            }
            _ => return,
        };

        row.states[marking_index] = mark;
        self.state = if marking_index + 1 < WORD_LENGTH {
            TuiState::MarkingFeedback {
                marking_index: marking_index + 1,
            }
        } else {
            self.status = "Press ENTER to confirm feedback".to_string();
            TuiState::ConfirmingFeedback
        };
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(event::KeyModifiers::ALT)
            || key.modifiers.contains(event::KeyModifiers::CONTROL)
    }

    fn start_marking(&mut self) {
        if let Some(row) = self.current.as_mut() {
            row.clear_marks();
        }
        self.state = TuiState::MarkingFeedback { marking_index: 0 };
    }
}

impl GameInterface for TuiInterface {
    fn display_new_game_message(&mut self, word_count: usize) {
        self.rows.clear();
        self.current = None;
        self.submitted = None;
        self.recommendation = None;
        self.constraints = Constraints::default();
        self.error_message.clear();
        self.message = format!("New game started. Loaded {word_count} words.");
        self.status = "New game".to_string();
        self.draw_or_log();
    }

    fn display_candidates(&mut self, candidates: &[Word]) {
        self.candidate_count = candidates.len();
        self.candidates_display = candidates
            .iter()
            .take(MAX_CANDIDATES_DISPLAY)
            .cloned()
            .collect();
    }

    fn display_constraints(&mut self, constraints: &Constraints) {
        self.constraints = *constraints;
    }

    fn display_recommendation(&mut self, recommendation: &Recommendation) {
        if let Some(row) = self.submitted.take() {
            self.rows.push(row);
        }
        self.current = Some(GuessRow::from_guess(&recommendation.guess));
        self.recommendation = Some(recommendation.clone());
        self.start_marking();
        self.status = format!(
            "Play {} and mark each letter: G (in place), Y (elsewhere), X (absent)",
            recommendation.guess
        );
        self.draw_or_log();
    }

    fn display_single_candidate(&mut self, word: &Word) {
        self.message = format!("Only one candidate left: {word}");
    }

    fn display_no_candidates_message(&mut self) {
        if let Some(row) = self.submitted.take() {
            self.rows.push(row);
        }
        self.current = None;
        self.recommendation = None;
        self.candidate_count = 0;
        self.candidates_display.clear();
        self.state = TuiState::NoCandidates;
        self.message = "No candidates remain. Check your inputs.".to_string();
        self.status = "Error: No valid candidates found".to_string();
        self.draw_or_log();
    }

    fn display_rejection(&mut self, error: &ConstraintError) {
        self.submitted = None;
        self.start_marking();
        self.error_message = format!("Invalid feedback [{}]: {error}", error.kind());
        self.status = "Feedback rejected - mark the letters again".to_string();
        self.draw_or_log();
    }

    fn display_undo_message(&mut self, undone: bool) {
        if undone {
            self.rows.pop();
            self.message = "Undid the last round.".to_string();
        } else {
            self.error_message = "Nothing to undo.".to_string();
        }
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Exiting...".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                info_log!("read_action() - Draw failed, returning Exit");
                return Some(UserAction::Exit);
            }

            match self.handle_input() {
                Ok(Some(action)) => {
                    info_log!("read_action() - Action received: {:?}", action);
                    return Some(action);
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("read_action() - Input error {}, returning Exit", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Duration;
use sudovis_core::{Grid, Position, SolveMode, SolveOutcome};

/// The classic demo puzzle, loadable with `e`
pub const EXAMPLE_PUZZLE: &str =
    "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

/// Result of handling a key press
#[derive(Debug, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
    /// Kick off a solve of the current board
    Solve,
}

/// The main application state
pub struct App {
    /// Board being edited and solved
    pub board: Grid,
    /// Currently selected cell position
    pub cursor: Position,
    /// Pacing for the next solve
    pub mode: SolveMode,
    /// Per-trial delay override from the command line
    pub delay_override: Option<Duration>,
    /// Color theme
    pub theme: Theme,
    /// How the last solve ended
    pub last_outcome: Option<SolveOutcome>,
    /// Candidate trials the last solve went through
    pub last_trials: usize,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
}

impl App {
    /// Create a new app
    pub fn new(
        board: Grid,
        mode: SolveMode,
        delay_override: Option<Duration>,
        theme: Theme,
    ) -> Self {
        Self {
            board,
            cursor: Position::new(4, 4),
            mode,
            delay_override,
            theme,
            last_outcome: None,
            last_trials: 0,
            message: None,
            message_timer: 0,
        }
    }

    /// Pause per candidate trial for the next solve, `None` when the
    /// solve should run without animation. The command-line override
    /// only applies to the animated modes; Fast stays silent.
    pub fn step_delay(&self) -> Option<Duration> {
        let preset = self.mode.step_delay()?;
        Some(self.delay_override.unwrap_or(preset))
    }

    /// Update timers (called on every poll timeout)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Record how a solve ended and surface it to the user
    pub fn record_solve(&mut self, outcome: SolveOutcome, trials: usize) {
        self.last_outcome = Some(outcome);
        self.last_trials = trials;
        match outcome {
            SolveOutcome::Solved => {
                if trials > 0 {
                    self.show_message(&format!("Solved in {} trials", trials));
                } else {
                    self.show_message("Solved");
                }
            }
            SolveOutcome::Unsolvable => self.show_message("No solution, board unchanged"),
            SolveOutcome::Cancelled => self.show_message("Cancelled, progress kept"),
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Digit input marks the cell as a given
            KeyCode::Char(c @ '1'..='9') => {
                self.board.set_given(self.cursor, c as u8 - b'0');
            }

            // Clear the selected cell
            KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => {
                self.board.clear_cell(self.cursor);
            }

            // Load the example puzzle
            KeyCode::Char('e') => {
                self.board = Grid::from_string(EXAMPLE_PUZZLE).expect("example puzzle parses");
                self.last_outcome = None;
                self.last_trials = 0;
                self.show_message("Example loaded");
            }

            // Clear the whole board
            KeyCode::Char('x') => {
                self.board = Grid::new();
                self.last_outcome = None;
                self.last_trials = 0;
                self.show_message("Board cleared");
            }

            // Solve pacing
            KeyCode::Char('f') => self.set_mode(SolveMode::Fast),
            KeyCode::Char('n') => self.set_mode(SolveMode::Normal),
            KeyCode::Char('r') => self.set_mode(SolveMode::Relaxed),

            // Theme toggle
            KeyCode::Char('t') => {
                self.theme = if self.theme == Theme::dark() {
                    Theme::light()
                } else {
                    Theme::dark()
                };
            }

            KeyCode::Enter | KeyCode::Char('s') => return AppAction::Solve,

            _ => {}
        }
        AppAction::Continue
    }

    fn set_mode(&mut self, mode: SolveMode) {
        self.mode = mode;
        self.show_message(&format!("{} mode", mode));
    }

    fn move_cursor(&mut self, row_delta: i32, col_delta: i32) {
        let new_row = (self.cursor.row as i32 + row_delta).clamp(0, 8) as usize;
        let new_col = (self.cursor.col as i32 + col_delta).clamp(0, 8) as usize;
        self.cursor = Position::new(new_row, new_col);
    }
}

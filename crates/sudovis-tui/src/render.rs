use crate::app::App;
use crate::theme::Theme;
use crossterm::{
    cursor::MoveTo,
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;
use sudovis_core::{Grid, Position, SolveOutcome, StepKind, TraceStep};

// Grid dimensions: 37 chars wide x 19 tall, each cell 3 chars plus borders
const GRID_WIDTH: u16 = 37;
const GRID_HEIGHT: u16 = 19;

const THICK_RULE: &str = "+===+===+===+===+===+===+===+===+===+";
const THIN_RULE: &str = "+---+---+---+---+---+---+---+---+---+";

/// Render the editing screen
pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let (start_x, start_y) = layout(term_width, term_height);

    execute!(stdout, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    render_grid(stdout, &app.theme, &app.board, Some(app.cursor), None, start_x, start_y)?;
    render_info_panel(stdout, app, start_x + GRID_WIDTH + 3, start_y)?;
    render_controls(stdout, app, start_x, start_y + GRID_HEIGHT + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width, term_height)?;
    }

    Ok(())
}

/// Render one solver step: the snapshot board with the trial cell marked
pub fn render_step(
    stdout: &mut io::Stdout,
    app: &App,
    step: &TraceStep,
    trials: usize,
) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let (start_x, start_y) = layout(term_width, term_height);

    execute!(stdout, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    render_grid(stdout, &app.theme, &step.grid, None, Some(step), start_x, start_y)?;
    render_solving_panel(stdout, app, step, trials, start_x + GRID_WIDTH + 3, start_y)?;

    Ok(())
}

fn layout(term_width: u16, term_height: u16) -> (u16, u16) {
    // Center the grid horizontally, leave room for the info panel
    let total_width = GRID_WIDTH + 25;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > GRID_HEIGHT + 4 { 2 } else { 1 };
    (start_x, start_y)
}

fn render_grid(
    stdout: &mut io::Stdout,
    theme: &Theme,
    grid: &Grid,
    cursor: Option<Position>,
    trial: Option<&TraceStep>,
    x: u16,
    y: u16,
) -> io::Result<()> {
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.box_border),
        Print(THICK_RULE)
    )?;

    for row in 0..9 {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..9 {
            // Thick borders at 3x3 boundaries
            if col % 3 == 0 {
                execute!(
                    stdout,
                    SetBackgroundColor(theme.bg),
                    SetForegroundColor(theme.box_border),
                    Print("║")
                )?;
            } else {
                execute!(
                    stdout,
                    SetBackgroundColor(theme.bg),
                    SetForegroundColor(theme.border),
                    Print("│")
                )?;
            }

            render_cell(stdout, theme, grid, Position::new(row, col), cursor, trial)?;
        }
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.box_border),
            Print("║")
        )?;

        // Horizontal separator, thick between boxes and at the bottom
        let sep_y = cell_y + 1;
        execute!(stdout, MoveTo(x, sep_y))?;
        if (row + 1) % 3 == 0 {
            execute!(stdout, SetForegroundColor(theme.box_border), Print(THICK_RULE))?;
        } else {
            execute!(stdout, SetForegroundColor(theme.border), Print(THIN_RULE))?;
        }
    }

    Ok(())
}

fn render_cell(
    stdout: &mut io::Stdout,
    theme: &Theme,
    grid: &Grid,
    pos: Position,
    cursor: Option<Position>,
    trial: Option<&TraceStep>,
) -> io::Result<()> {
    let cell = grid.cell(pos);
    let is_cursor = cursor == Some(pos);
    // Highlight the cursor's row, column, and box
    let is_highlighted = cursor
        .map(|c| pos.row == c.row || pos.col == c.col || pos.box_index() == c.box_index())
        .unwrap_or(false);
    let is_trial = trial.map(|step| step.pos == pos).unwrap_or(false);
    let has_conflict = grid.has_conflict(pos);

    // Background color
    let bg = if is_trial {
        theme.trial_bg
    } else if is_cursor {
        theme.selected_bg
    } else if is_highlighted {
        theme.highlight_bg
    } else {
        theme.bg
    };

    // Foreground color
    let fg = if has_conflict {
        theme.error
    } else if is_trial || cell.is_given() {
        theme.given
    } else if cell.is_filled() {
        theme.filled
    } else {
        theme.empty
    };

    execute!(stdout, SetBackgroundColor(bg), SetForegroundColor(fg))?;

    // A Trying snapshot still has the cell empty; show the candidate
    // digit under test in its place.
    let shown = match trial {
        Some(step) if step.pos == pos && step.kind == StepKind::Trying => Some(step.digit),
        _ => cell.value(),
    };

    if let Some(value) = shown {
        execute!(stdout, Print(format!(" {} ", value)))?;
    } else {
        execute!(stdout, Print(" · "))?;
    }

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.box_border),
        Print("═══ SUDOVIS ═══")
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print("Mode:   "),
        SetForegroundColor(theme.key),
        Print(format!("{}", app.mode))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 3),
        SetForegroundColor(theme.info),
        Print(format!("Givens: {}", app.board.given_count()))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print(format!("Filled: {} / 81", app.board.filled_count()))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(theme.info),
        Print(format!("Cursor: {}", app.cursor))
    )?;

    if let Some(outcome) = app.last_outcome {
        let color = match outcome {
            SolveOutcome::Solved => theme.success,
            SolveOutcome::Unsolvable => theme.error,
            SolveOutcome::Cancelled => theme.key,
        };
        execute!(
            stdout,
            MoveTo(x, y + 7),
            SetForegroundColor(theme.info),
            Print("Last:   "),
            SetForegroundColor(color),
            Print(format!("{}", outcome))
        )?;
        if app.last_trials > 0 {
            execute!(
                stdout,
                MoveTo(x, y + 8),
                SetForegroundColor(theme.info),
                Print(format!("Trials: {}", app.last_trials))
            )?;
        }
    }

    Ok(())
}

fn render_solving_panel(
    stdout: &mut io::Stdout,
    app: &App,
    step: &TraceStep,
    trials: usize,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.box_border),
        Print("═══ SUDOVIS ═══")
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print("Solving ("),
        SetForegroundColor(theme.key),
        Print(format!("{}", app.mode)),
        SetForegroundColor(theme.info),
        Print(")")
    )?;

    let activity = match step.kind {
        StepKind::Trying => format!("Trying {} at {}", step.digit, step.pos),
        StepKind::Placed => format!("Placed {} at {}", step.digit, step.pos),
        StepKind::Undone => format!("Undid  {} at {}", step.digit, step.pos),
    };
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.fg),
        Print(activity)
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(theme.info),
        Print(format!("Trials: {}", trials))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 6),
        SetForegroundColor(theme.info),
        Print(format!("Filled: {} / 81", step.grid.filled_count()))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 8),
        SetForegroundColor(theme.key),
        Print("[esc] "),
        SetForegroundColor(theme.info),
        Print("cancel")
    )?;

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let rows: [&[(&str, &str)]; 2] = [
        &[
            ("arrows/hjkl", "move"),
            ("1-9", "place"),
            ("0", "clear cell"),
            ("e", "example"),
            ("x", "clear board"),
        ],
        &[
            ("f/n/r", "speed"),
            ("enter/s", "solve"),
            ("t", "theme"),
            ("q", "quit"),
        ],
    ];

    for (i, row) in rows.iter().enumerate() {
        execute!(stdout, MoveTo(x, y + i as u16), SetBackgroundColor(theme.bg))?;
        for (key, label) in row.iter() {
            execute!(
                stdout,
                SetForegroundColor(theme.key),
                Print(format!("[{}] ", key)),
                SetForegroundColor(theme.info),
                Print(format!("{}  ", label))
            )?;
        }
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let x = term_width.saturating_sub(msg.len() as u16) / 2;
    let y = term_height.saturating_sub(2);
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(app.theme.bg),
        SetForegroundColor(app.theme.key),
        Print(msg)
    )?;
    Ok(())
}

mod app;
mod render;
mod theme;

use app::{App, AppAction};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use serde::Serialize;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use sudovis_core::{Grid, SolveMode, SolveOutcome, Solver, StepAction, StepKind, TraceStep};
use theme::Theme;

/// Watch a backtracking solver work through a Sudoku board
#[derive(Parser, Debug)]
#[command(name = "sudovis", version, about)]
struct Args {
    /// Puzzle to preload: 81 cells, digits with `.` or `0` for empty
    #[arg(short, long)]
    puzzle: Option<String>,

    /// Solve pacing: fast, normal, or relaxed
    #[arg(short, long, default_value = "normal")]
    mode: SolveMode,

    /// Override the per-trial delay of the animated modes (milliseconds)
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Color theme
    #[arg(long, default_value = "dark", value_parser = ["dark", "light"])]
    theme: String,

    /// Solve the puzzle without the interactive UI and print the result
    #[arg(long, requires = "puzzle")]
    headless: bool,

    /// With --headless, emit the result as a JSON object
    #[arg(long, requires = "headless")]
    json: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if args.headless {
        return run_headless(&args);
    }

    let board = match args.puzzle.as_deref() {
        Some(puzzle) => match Grid::from_string(puzzle) {
            Ok(grid) => grid,
            Err(err) => {
                eprintln!("invalid puzzle: {}", err);
                std::process::exit(2);
            }
        },
        None => Grid::new(),
    };
    let theme = if args.theme == "light" {
        Theme::light()
    } else {
        Theme::dark()
    };
    let app = App::new(
        board,
        args.mode,
        args.delay_ms.map(Duration::from_millis),
        theme,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    // Run the app
    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, Show, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    loop {
        render::render(stdout, &app)?;
        stdout.flush()?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if is_ctrl_c(&key) {
                    break;
                }
                match app.handle_key(key) {
                    AppAction::Continue => {}
                    AppAction::Quit => break,
                    AppAction::Solve => run_solve(stdout, &mut app)?,
                }
            }
        } else {
            app.tick();
        }
    }

    Ok(())
}

/// Drive one solve of the app's board. Fast mode runs silently; the
/// animated modes feed every step through the renderer, which also
/// watches for the cancel keys. The board always ends up holding the
/// result: the solution, the restored input, or the partial state a
/// cancel left behind.
fn run_solve(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let solver = Solver::new();
    let mut working = app.board.clone();
    let mut trials = 0usize;

    let outcome = match app.step_delay() {
        None => {
            if solver.solve_in_place(&mut working) {
                SolveOutcome::Solved
            } else {
                SolveOutcome::Unsolvable
            }
        }
        Some(delay) => {
            let mut io_error: Option<io::Error> = None;
            let outcome = solver.solve_stepped(&mut working, &mut |step: &TraceStep| {
                if step.kind == StepKind::Trying {
                    trials += 1;
                }
                match observe_step(stdout, app, step, trials, delay) {
                    Ok(action) => action,
                    Err(err) => {
                        io_error = Some(err);
                        StepAction::Cancel
                    }
                }
            });
            if let Some(err) = io_error {
                return Err(err);
            }
            outcome
        }
    };

    app.board = working;
    app.record_solve(outcome, trials);
    Ok(())
}

/// Draw one search step, then hold for the per-trial delay while
/// watching for a cancel key. Only `Trying` steps pause, so the
/// animation stays at one beat per candidate digit.
fn observe_step(
    stdout: &mut io::Stdout,
    app: &App,
    step: &TraceStep,
    trials: usize,
    delay: Duration,
) -> io::Result<StepAction> {
    render::render_step(stdout, app, step, trials)?;
    stdout.flush()?;

    if step.kind != StepKind::Trying {
        return Ok(StepAction::Continue);
    }

    let deadline = Instant::now() + delay;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if event::poll(remaining)? {
            if let Event::Key(key) = event::read()? {
                if is_cancel_key(&key) {
                    return Ok(StepAction::Cancel);
                }
                // Other keys are swallowed while the solver runs
            }
        } else {
            // Poll timed out, the pause is over
            return Ok(StepAction::Continue);
        }
        if deadline.saturating_duration_since(Instant::now()).is_zero() {
            return Ok(StepAction::Continue);
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn is_cancel_key(key: &KeyEvent) -> bool {
    is_ctrl_c(key) || matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
}

// ==================== Headless mode ====================

#[derive(Serialize)]
struct SolveReport {
    outcome: SolveOutcome,
    trials: usize,
    grid: String,
}

fn run_headless(args: &Args) -> io::Result<()> {
    let puzzle = args.puzzle.as_deref().unwrap_or_default();
    let mut grid = match Grid::from_string(puzzle) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("invalid puzzle: {}", err);
            std::process::exit(2);
        }
    };

    let mut trials = 0usize;
    let outcome = Solver::new().solve_stepped(&mut grid, &mut |step: &TraceStep| {
        if step.kind == StepKind::Trying {
            trials += 1;
        }
        StepAction::Continue
    });

    if args.json {
        let report = SolveReport {
            outcome,
            trials,
            grid: grid.to_string_compact(),
        };
        println!("{}", serde_json::to_string(&report).unwrap_or_default());
    } else {
        match outcome {
            SolveOutcome::Solved => {
                println!("{}", grid);
                println!("solved in {} trials", trials);
            }
            SolveOutcome::Unsolvable => println!("no solution ({} trials)", trials),
            SolveOutcome::Cancelled => println!("cancelled after {} trials", trials),
        }
    }

    if outcome == SolveOutcome::Solved {
        Ok(())
    } else {
        std::process::exit(1)
    }
}

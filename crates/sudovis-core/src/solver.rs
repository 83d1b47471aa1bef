use crate::{Grid, Position};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Pacing preset for a solve request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveMode {
    /// Run to completion without reporting steps
    Fast,
    /// Animate with a short pause per candidate trial
    #[default]
    Normal,
    /// Animate slowly enough to follow each trial by eye
    Relaxed,
}

impl SolveMode {
    /// Pause per candidate trial for the animated modes, `None` for Fast
    pub fn step_delay(&self) -> Option<Duration> {
        match self {
            SolveMode::Fast => None,
            SolveMode::Normal => Some(Duration::from_millis(10)),
            SolveMode::Relaxed => Some(Duration::from_millis(50)),
        }
    }
}

impl std::fmt::Display for SolveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveMode::Fast => write!(f, "fast"),
            SolveMode::Normal => write!(f, "normal"),
            SolveMode::Relaxed => write!(f, "relaxed"),
        }
    }
}

/// Error returned when a solve mode name is not recognized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown solve mode {0:?} (expected fast, normal, or relaxed)")]
pub struct ParseModeError(String);

impl FromStr for SolveMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(SolveMode::Fast),
            "normal" => Ok(SolveMode::Normal),
            "relaxed" => Ok(SolveMode::Relaxed),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Phase of a single search step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepKind {
    /// A candidate digit is about to be tested at the cell
    Trying,
    /// The candidate passed the constraint check and was written
    Placed,
    /// The placement led nowhere and the cell was reset to empty
    Undone,
}

/// Snapshot handed to the observer at each step: the board as it stands
/// plus the cell and digit under consideration. The grid is an owned
/// copy, so holding on to it is safe while the search moves on.
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub grid: Grid,
    pub pos: Position,
    pub digit: u8,
    pub kind: StepKind,
}

/// Observer verdict after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Keep searching
    Continue,
    /// Abandon the solve at the next opportunity
    Cancel,
}

/// Receives every trace step of an observable solve.
///
/// The return value doubles as the cancellation token: once a sink
/// answers [`StepAction::Cancel`], the search unwinds without emitting
/// further steps. Any `FnMut(&TraceStep) -> StepAction` closure is a
/// sink.
pub trait StepSink {
    fn on_step(&mut self, step: &TraceStep) -> StepAction;
}

impl<F> StepSink for F
where
    F: FnMut(&TraceStep) -> StepAction,
{
    fn on_step(&mut self, step: &TraceStep) -> StepAction {
        self(step)
    }
}

/// How a solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// A complete assignment was found; the grid holds it
    Solved,
    /// The search space is exhausted; the grid is back to its input state
    Unsolvable,
    /// The observer cancelled; the grid holds the partial state reached
    Cancelled,
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveOutcome::Solved => write!(f, "solved"),
            SolveOutcome::Unsolvable => write!(f, "unsolvable"),
            SolveOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Backtracking search over the empty cells of a grid.
///
/// Candidates are tried in ascending order at the first empty cell in
/// row-major order, so a given board always yields the same solution.
/// Given cells are never written; a failed search rolls every
/// speculative placement back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver;

impl Solver {
    /// Create a new solver
    pub fn new() -> Self {
        Solver
    }

    /// Solve a copy of the grid, returning the completed board if one exists
    pub fn solve(&self, grid: &Grid) -> Option<Grid> {
        let mut working = grid.clone();
        if self.solve_in_place(&mut working) {
            Some(working)
        } else {
            None
        }
    }

    /// Solve the grid in place. On success it holds the completed board;
    /// on failure it is exactly as supplied.
    pub fn solve_in_place(&self, grid: &mut Grid) -> bool {
        let Some(pos) = grid.first_empty() else {
            return true;
        };

        for digit in 1..=9 {
            if grid.permits(pos, digit) {
                grid.set_cell_unchecked(pos, Some(digit));
                if self.solve_in_place(grid) {
                    return true;
                }
                grid.set_cell_unchecked(pos, None);
            }
        }

        false
    }

    /// Observable variant of [`Solver::solve_in_place`]: reports every
    /// candidate trial, placement, and rollback to the sink, and lets the
    /// sink cancel the search. Pacing is the sink's job; the search
    /// itself never sleeps.
    ///
    /// On cancellation the grid keeps whatever placements were committed
    /// so far. All of them passed the constraint check, so the partial
    /// board is conflict-free.
    pub fn solve_stepped(&self, grid: &mut Grid, sink: &mut dyn StepSink) -> SolveOutcome {
        let Some(pos) = grid.first_empty() else {
            return SolveOutcome::Solved;
        };

        for digit in 1..=9 {
            if report(sink, grid, pos, digit, StepKind::Trying) == StepAction::Cancel {
                return SolveOutcome::Cancelled;
            }
            if grid.permits(pos, digit) {
                grid.set_cell_unchecked(pos, Some(digit));
                if report(sink, grid, pos, digit, StepKind::Placed) == StepAction::Cancel {
                    return SolveOutcome::Cancelled;
                }

                match self.solve_stepped(grid, sink) {
                    SolveOutcome::Solved => return SolveOutcome::Solved,
                    SolveOutcome::Cancelled => return SolveOutcome::Cancelled,
                    SolveOutcome::Unsolvable => {}
                }

                grid.set_cell_unchecked(pos, None);
                if report(sink, grid, pos, digit, StepKind::Undone) == StepAction::Cancel {
                    return SolveOutcome::Cancelled;
                }
            }
        }

        SolveOutcome::Unsolvable
    }

    /// Convenience wrapper over [`Solver::solve_stepped`] that sleeps for
    /// `step_delay` after each `Trying` report, one pause per candidate
    /// digit. Placements and rollbacks are reported without a pause.
    pub fn solve_animated<F>(
        &self,
        grid: &mut Grid,
        step_delay: Duration,
        mut on_step: F,
    ) -> SolveOutcome
    where
        F: FnMut(&TraceStep) -> StepAction,
    {
        let mut sink = |step: &TraceStep| {
            let action = on_step(step);
            if action == StepAction::Continue && step.kind == StepKind::Trying {
                thread::sleep(step_delay);
            }
            action
        };
        self.solve_stepped(grid, &mut sink)
    }
}

fn report(
    sink: &mut dyn StepSink,
    grid: &Grid,
    pos: Position,
    digit: u8,
    kind: StepKind,
) -> StepAction {
    sink.on_step(&TraceStep {
        grid: grid.clone(),
        pos,
        digit,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const EXAMPLE_SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    #[test]
    fn test_solve_example() {
        let grid = Grid::from_string(EXAMPLE).unwrap();
        let solution = Solver::new().solve(&grid).unwrap();
        assert!(solution.is_solved());
        assert_eq!(solution.to_string_compact(), EXAMPLE_SOLUTION);
    }

    #[test]
    fn test_solve_is_deterministic_on_empty_grid() {
        let mut grid = Grid::new();
        assert!(Solver::new().solve_in_place(&mut grid));
        assert!(grid.is_solved());

        // Ascending candidates at the first empty cell make the first two
        // rows predictable: 1..9, then 456789123.
        for col in 0..9 {
            assert_eq!(grid.get(Position::new(0, col)), Some(col as u8 + 1));
        }
        for (col, expected) in [4, 5, 6, 7, 8, 9, 1, 2, 3].into_iter().enumerate() {
            assert_eq!(grid.get(Position::new(1, col)), Some(expected));
        }
    }

    #[test]
    fn test_solve_preserves_givens() {
        let grid = Grid::from_string(EXAMPLE).unwrap();
        let solution = Solver::new().solve(&grid).unwrap();

        assert_eq!(solution.given_count(), 30);
        for pos in Position::all() {
            if grid.cell(pos).is_given() {
                assert_eq!(solution.get(pos), grid.get(pos));
                assert!(solution.cell(pos).is_given());
            } else {
                assert!(!solution.cell(pos).is_given());
            }
        }
    }

    #[test]
    fn test_unsolvable_duplicate_givens_in_row() {
        // Two fixed 5s in row 0; column 2 pinned so the first empty cell
        // has no candidate at all and the search fails immediately.
        let mut grid = Grid::new();
        grid.set_given(Position::new(0, 0), 5);
        grid.set_given(Position::new(0, 1), 5);
        for (row, digit) in [1, 2, 3, 4, 6, 7, 8, 9].into_iter().enumerate() {
            grid.set_given(Position::new(row + 1, 2), digit);
        }
        let before = grid.clone();

        assert_eq!(Solver::new().solve(&grid), None);
        assert!(!Solver::new().solve_in_place(&mut grid));
        assert_eq!(grid, before, "failed solve must not disturb the board");
    }

    #[test]
    fn test_unsolvable_blocked_cell() {
        // Row 0 holds 1-8 and the 9 is blocked by the column below.
        let mut grid = Grid::new();
        for col in 0..8 {
            grid.set_given(Position::new(0, col), col as u8 + 1);
        }
        grid.set_given(Position::new(5, 8), 9);
        let before = grid.clone();

        let mut steps = 0;
        let mut sink = |_step: &TraceStep| {
            steps += 1;
            StepAction::Continue
        };
        let outcome = Solver::new().solve_stepped(&mut grid, &mut sink);
        assert_eq!(outcome, SolveOutcome::Unsolvable);
        assert_eq!(grid, before);
        assert_eq!(steps, 9, "nine rejected trials at the blocked cell");
    }

    #[test]
    fn test_stepped_matches_fast() {
        let mut stepped = Grid::from_string(EXAMPLE).unwrap();
        let fast = Solver::new().solve(&stepped).unwrap();

        let mut steps = 0;
        let mut sink = |_step: &TraceStep| {
            steps += 1;
            StepAction::Continue
        };
        let outcome = Solver::new().solve_stepped(&mut stepped, &mut sink);

        assert_eq!(outcome, SolveOutcome::Solved);
        assert_eq!(stepped, fast, "observation must not change the search");
        assert!(steps > 0);
    }

    #[test]
    fn test_first_steps_of_example() {
        let mut grid = Grid::from_string(EXAMPLE).unwrap();
        let mut seen: Vec<(Position, u8, StepKind)> = Vec::new();
        let mut sink = |step: &TraceStep| {
            seen.push((step.pos, step.digit, step.kind));
            if seen.len() == 4 {
                StepAction::Cancel
            } else {
                StepAction::Continue
            }
        };
        Solver::new().solve_stepped(&mut grid, &mut sink);

        // First empty cell is (0, 2); 1 fits there right away, then the
        // search moves to (0, 3) where 1 collides with the box.
        let cell = Position::new(0, 2);
        assert_eq!(seen[0], (cell, 1, StepKind::Trying));
        assert_eq!(seen[1], (cell, 1, StepKind::Placed));
        assert_eq!(seen[2], (Position::new(0, 3), 1, StepKind::Trying));
        assert_eq!(seen[3], (Position::new(0, 3), 2, StepKind::Trying));
    }

    #[test]
    fn test_trace_reports_rollbacks() {
        let mut grid = Grid::from_string(EXAMPLE).unwrap();
        let mut kinds: Vec<StepKind> = Vec::new();
        let mut sink = |step: &TraceStep| {
            kinds.push(step.kind);
            StepAction::Continue
        };
        let outcome = Solver::new().solve_stepped(&mut grid, &mut sink);

        assert_eq!(outcome, SolveOutcome::Solved);
        assert!(kinds.contains(&StepKind::Undone), "search never backtracked");
        let placed = kinds.iter().filter(|&&k| k == StepKind::Placed).count();
        let undone = kinds.iter().filter(|&&k| k == StepKind::Undone).count();
        assert_eq!(placed - undone, 51, "net placements fill the empty cells");
    }

    #[test]
    fn test_cancel_stops_the_search() {
        let mut grid = Grid::from_string(EXAMPLE).unwrap();
        let before = grid.clone();

        let mut steps = 0;
        let mut sink = |_step: &TraceStep| {
            steps += 1;
            if steps == 25 {
                StepAction::Cancel
            } else {
                StepAction::Continue
            }
        };
        let outcome = Solver::new().solve_stepped(&mut grid, &mut sink);

        assert_eq!(outcome, SolveOutcome::Cancelled);
        assert_eq!(steps, 25, "no steps may be reported after a cancel");
        assert!(!grid.is_complete());
        assert_ne!(grid, before, "committed placements survive a cancel");

        // Every committed placement passed the constraint check.
        for pos in Position::all() {
            assert!(!grid.has_conflict(pos));
        }
        for pos in Position::all() {
            if before.cell(pos).is_given() {
                assert_eq!(grid.get(pos), before.get(pos));
            }
        }
    }

    #[test]
    fn test_cancel_on_first_step() {
        let mut grid = Grid::from_string(EXAMPLE).unwrap();
        let before = grid.clone();
        let mut sink = |_step: &TraceStep| StepAction::Cancel;

        let outcome = Solver::new().solve_stepped(&mut grid, &mut sink);
        assert_eq!(outcome, SolveOutcome::Cancelled);
        assert_eq!(grid, before, "cancel before any placement changes nothing");
    }

    #[test]
    fn test_solved_grid_needs_no_steps() {
        let mut grid = Grid::from_string(EXAMPLE).unwrap();
        assert!(Solver::new().solve_in_place(&mut grid));

        let mut steps = 0;
        let mut sink = |_step: &TraceStep| {
            steps += 1;
            StepAction::Continue
        };
        let outcome = Solver::new().solve_stepped(&mut grid, &mut sink);
        assert_eq!(outcome, SolveOutcome::Solved);
        assert_eq!(steps, 0);
    }

    #[test]
    fn test_trace_snapshots_are_consistent() {
        let mut grid = Grid::from_string(EXAMPLE).unwrap();
        let mut checked = 0;
        let mut sink = |step: &TraceStep| {
            match step.kind {
                StepKind::Trying => assert_eq!(step.grid.get(step.pos), None),
                StepKind::Placed => assert_eq!(step.grid.get(step.pos), Some(step.digit)),
                StepKind::Undone => assert_eq!(step.grid.get(step.pos), None),
            }
            checked += 1;
            if checked == 500 {
                StepAction::Cancel
            } else {
                StepAction::Continue
            }
        };
        Solver::new().solve_stepped(&mut grid, &mut sink);
        assert!(checked > 0);
    }

    #[test]
    fn test_animated_matches_fast() {
        let mut grid = Grid::from_string(EXAMPLE).unwrap();
        let fast = Solver::new().solve(&grid).unwrap();

        let mut steps = 0;
        let outcome = Solver::new().solve_animated(&mut grid, Duration::ZERO, |_step| {
            steps += 1;
            StepAction::Continue
        });
        assert_eq!(outcome, SolveOutcome::Solved);
        assert_eq!(grid, fast, "pacing must not change the result");
        assert!(steps > 0);
    }

    #[test]
    fn test_mode_delays() {
        assert_eq!(SolveMode::Fast.step_delay(), None);
        assert_eq!(SolveMode::Normal.step_delay(), Some(Duration::from_millis(10)));
        assert_eq!(SolveMode::Relaxed.step_delay(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("fast".parse::<SolveMode>().unwrap(), SolveMode::Fast);
        assert_eq!("Normal".parse::<SolveMode>().unwrap(), SolveMode::Normal);
        assert_eq!("RELAXED".parse::<SolveMode>().unwrap(), SolveMode::Relaxed);
        assert!("warp".parse::<SolveMode>().is_err());
    }
}

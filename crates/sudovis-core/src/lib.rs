//! Sudoku board model with an observable backtracking solver.
//!
//! [`Grid`] holds the 9x9 board and tells caller-supplied givens apart
//! from solver placements. [`Solver`] runs a deterministic backtracking
//! search over it, either silently ([`Solver::solve`]) or step by step
//! through a [`StepSink`] that watches the search and may cancel it.
//!
//! See `examples/basic.rs` for a tour of the API.

mod grid;
mod solver;

pub use grid::{Cell, Grid, ParseGridError, Position, SIZE};
pub use solver::{
    ParseModeError, SolveMode, SolveOutcome, Solver, StepAction, StepKind, StepSink, TraceStep,
};

//! Basic example of using the solver

use sudovis_core::{Grid, SolveOutcome, Solver, StepAction, StepKind, TraceStep};

fn main() {
    // Parse a puzzle from its compact form
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let puzzle = match Grid::from_string(puzzle_string) {
        Ok(grid) => grid,
        Err(err) => {
            eprintln!("bad puzzle: {}", err);
            return;
        }
    };

    println!("Puzzle:");
    println!("{}", puzzle);
    println!("Given cells: {}", puzzle.given_count());
    println!("Empty cells: {}\n", puzzle.empty_count());

    // Solve it
    let solver = Solver::new();
    if let Some(solution) = solver.solve(&puzzle) {
        println!("Solution:");
        println!("{}", solution);
    } else {
        println!("No solution found");
    }

    // Watch the search work: count trials, placements, and rollbacks
    println!("\n--- Observing the search ---\n");
    let mut working = puzzle.clone();
    let mut trials = 0u32;
    let mut placed = 0u32;
    let mut undone = 0u32;
    let outcome = solver.solve_stepped(&mut working, &mut |step: &TraceStep| {
        match step.kind {
            StepKind::Trying => trials += 1,
            StepKind::Placed => placed += 1,
            StepKind::Undone => undone += 1,
        }
        StepAction::Continue
    });
    println!("Outcome: {}", outcome);
    println!("Candidate trials: {}", trials);
    println!("Placements: {} ({} rolled back)", placed, undone);

    // The sink can also stop the search early
    let mut working = puzzle;
    let mut budget = 100u32;
    let outcome = solver.solve_stepped(&mut working, &mut |_: &TraceStep| {
        budget -= 1;
        if budget == 0 {
            StepAction::Cancel
        } else {
            StepAction::Continue
        }
    });
    assert_eq!(outcome, SolveOutcome::Cancelled);
    println!("\nAfter a 100-step budget: {} cells filled", working.filled_count());
}

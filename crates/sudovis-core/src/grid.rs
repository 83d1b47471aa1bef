use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Side length of the board
pub const SIZE: usize = 9;

/// A (row, col) coordinate on the board, zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position
    pub fn new(row: usize, col: usize) -> Self {
        debug_assert!(row < SIZE && col < SIZE);
        Self { row, col }
    }

    /// Index of the 3x3 box containing this position (0-8, row-major)
    pub fn box_index(&self) -> usize {
        (self.row / 3) * 3 + self.col / 3
    }

    /// Top-left corner of the 3x3 box containing this position
    pub fn box_origin(&self) -> Position {
        Position::new(self.row - self.row % 3, self.col - self.col % 3)
    }

    /// All 81 positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row + 1, self.col + 1)
    }
}

/// One cell of the board: an optional digit 1-9 plus a marker for
/// caller-supplied givens. The solver only ever writes cells whose
/// given marker is unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    value: Option<u8>,
    given: bool,
}

impl Cell {
    /// The digit in this cell, if any
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Check if the cell holds a digit
    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// Check if the cell was supplied by the caller rather than the solver
    pub fn is_given(&self) -> bool {
        self.given
    }
}

/// Why an 81-cell puzzle string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseGridError {
    #[error("expected 81 cells, got {0}")]
    WrongLength(usize),
    #[error("invalid character {found:?} at cell {index}")]
    BadCharacter { index: usize, found: char },
}

/// The 9x9 Sudoku board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: [[Cell; SIZE]; SIZE],
}

impl Grid {
    /// Create an empty board with no givens
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the compact 81-character form: digits become givens, `.` or
    /// `0` is an empty cell. Whitespace is ignored so multi-line layouts
    /// parse too.
    pub fn from_string(s: &str) -> Result<Grid, ParseGridError> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != SIZE * SIZE {
            return Err(ParseGridError::WrongLength(chars.len()));
        }

        let mut grid = Grid::new();
        for (index, &ch) in chars.iter().enumerate() {
            let pos = Position::new(index / SIZE, index % SIZE);
            match ch {
                '.' | '0' => {}
                '1'..='9' => grid.set_given(pos, ch as u8 - b'0'),
                found => return Err(ParseGridError::BadCharacter { index, found }),
            }
        }
        Ok(grid)
    }

    /// Compact 81-character form, one character per cell with `.` for empty
    pub fn to_string_compact(&self) -> String {
        Position::all()
            .map(|pos| match self.get(pos) {
                Some(value) => (b'0' + value) as char,
                None => '.',
            })
            .collect()
    }

    /// Get the cell at a position
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row][pos.col]
    }

    /// Get the value at a position, if any
    pub fn get(&self, pos: Position) -> Option<u8> {
        self.cells[pos.row][pos.col].value
    }

    /// The board as a plain 9x9 value matrix, givens indistinguishable
    /// from solver-placed digits
    pub fn values(&self) -> [[Option<u8>; SIZE]; SIZE] {
        self.cells.map(|row| row.map(|cell| cell.value))
    }

    /// Apply raw text input to a cell. Accepts the empty string (clears the
    /// cell) or a single digit 1-9 (records a given); everything else is
    /// rejected and the board is left untouched. Returns whether the input
    /// was applied.
    pub fn set_cell(&mut self, pos: Position, input: &str) -> bool {
        if input.is_empty() {
            self.clear_cell(pos);
            return true;
        }
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => match ch.to_digit(10) {
                Some(digit @ 1..=9) => {
                    self.set_given(pos, digit as u8);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Record a caller-supplied digit: sets the value and the given marker
    pub fn set_given(&mut self, pos: Position, digit: u8) {
        debug_assert!((1..=9).contains(&digit));
        self.cells[pos.row][pos.col] = Cell {
            value: Some(digit),
            given: true,
        };
    }

    /// Empty a cell and drop its given marker
    pub fn clear_cell(&mut self, pos: Position) {
        self.cells[pos.row][pos.col] = Cell::default();
    }

    /// Write a value without touching the given marker. This is the
    /// solver's placement and rollback primitive; ownership of a cell
    /// never changes through it.
    pub fn set_cell_unchecked(&mut self, pos: Position, value: Option<u8>) {
        self.cells[pos.row][pos.col].value = value;
    }

    /// The first empty cell in row-major order, i.e. the next branch
    /// point of the search
    pub fn first_empty(&self) -> Option<Position> {
        Position::all().find(|&pos| self.cell(pos).is_empty())
    }

    /// The Sudoku constraint: true iff `digit` appears nowhere in the
    /// row, the column, or the 3x3 box of `pos`. Only existing values are
    /// compared, so callers place into empty cells after checking.
    #[allow(clippy::needless_range_loop)]
    pub fn permits(&self, pos: Position, digit: u8) -> bool {
        for i in 0..SIZE {
            if self.cells[pos.row][i].value == Some(digit) {
                return false;
            }
            if self.cells[i][pos.col].value == Some(digit) {
                return false;
            }
        }

        let origin = pos.box_origin();
        for row in origin.row..origin.row + 3 {
            for col in origin.col..origin.col + 3 {
                if self.cells[row][col].value == Some(digit) {
                    return false;
                }
            }
        }

        true
    }

    /// Check whether the value at `pos` collides with another cell in its
    /// row, column, or box. Used for highlighting; empty cells never
    /// conflict.
    #[allow(clippy::needless_range_loop)]
    pub fn has_conflict(&self, pos: Position) -> bool {
        let Some(value) = self.get(pos) else {
            return false;
        };

        for col in 0..SIZE {
            if col != pos.col && self.cells[pos.row][col].value == Some(value) {
                return true;
            }
        }
        for row in 0..SIZE {
            if row != pos.row && self.cells[row][pos.col].value == Some(value) {
                return true;
            }
        }

        let origin = pos.box_origin();
        for row in origin.row..origin.row + 3 {
            for col in origin.col..origin.col + 3 {
                if (row != pos.row || col != pos.col) && self.cells[row][col].value == Some(value) {
                    return true;
                }
            }
        }

        false
    }

    /// Number of caller-supplied givens on the board
    pub fn given_count(&self) -> usize {
        Position::all().filter(|&pos| self.cell(pos).is_given()).count()
    }

    /// Number of filled cells, givens included
    pub fn filled_count(&self) -> usize {
        Position::all().filter(|&pos| self.cell(pos).is_filled()).count()
    }

    /// Number of empty cells
    pub fn empty_count(&self) -> usize {
        SIZE * SIZE - self.filled_count()
    }

    /// Check if every cell holds a digit
    pub fn is_complete(&self) -> bool {
        self.first_empty().is_none()
    }

    /// Check if the board is complete and free of conflicts
    pub fn is_solved(&self) -> bool {
        self.is_complete() && Position::all().all(|pos| !self.has_conflict(pos))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIZE {
            if row % 3 == 0 {
                writeln!(f, "+-------+-------+-------+")?;
            }
            for col in 0..SIZE {
                if col % 3 == 0 {
                    write!(f, "| ")?;
                }
                match self.cells[row][col].value {
                    Some(value) => write!(f, "{} ", value)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        write!(f, "+-------+-------+-------+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

    #[test]
    fn test_empty_grid() {
        let grid = Grid::new();
        assert_eq!(grid.given_count(), 0);
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(grid.first_empty(), Some(Position::new(0, 0)));
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_parse_example() {
        let grid = Grid::from_string(EXAMPLE).unwrap();
        assert_eq!(grid.given_count(), 30);
        assert_eq!(grid.get(Position::new(0, 0)), Some(5));
        assert_eq!(grid.get(Position::new(1, 3)), Some(1));
        assert_eq!(grid.get(Position::new(8, 8)), Some(9));
        assert_eq!(grid.get(Position::new(0, 2)), None);
        assert!(grid.cell(Position::new(0, 0)).is_given());
        assert_eq!(grid.first_empty(), Some(Position::new(0, 2)));
    }

    #[test]
    fn test_parse_multiline_with_dots() {
        let grid = Grid::from_string(
            "53..7....
             6..195...
             .98....6.
             8...6...3
             4..8.3..1
             7...2...6
             .6....28.
             ...419..5
             ....8..79",
        )
        .unwrap();
        assert_eq!(grid.to_string_compact(), EXAMPLE.replace('0', "."));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(Grid::from_string(""), Err(ParseGridError::WrongLength(0)));
        assert_eq!(
            Grid::from_string(&"5".repeat(80)),
            Err(ParseGridError::WrongLength(80))
        );
        assert_eq!(
            Grid::from_string(&"5".repeat(82)),
            Err(ParseGridError::WrongLength(82))
        );
    }

    #[test]
    fn test_parse_bad_character() {
        let mut input = EXAMPLE.to_string();
        input.replace_range(40..41, "x");
        assert_eq!(
            Grid::from_string(&input),
            Err(ParseGridError::BadCharacter {
                index: 40,
                found: 'x'
            })
        );
    }

    #[test]
    fn test_set_cell_accepts_digits_and_empty() {
        let mut grid = Grid::new();
        let pos = Position::new(4, 4);

        assert!(grid.set_cell(pos, "7"));
        assert_eq!(grid.get(pos), Some(7));
        assert!(grid.cell(pos).is_given());

        assert!(grid.set_cell(pos, ""));
        assert_eq!(grid.get(pos), None);
        assert!(!grid.cell(pos).is_given());
    }

    #[test]
    fn test_set_cell_rejects_bad_input() {
        let mut grid = Grid::new();
        let pos = Position::new(0, 0);
        grid.set_given(pos, 3);

        for input in ["0", "a", "12", "07", " 5", "5 ", "-1", "ten"] {
            assert!(!grid.set_cell(pos, input), "accepted {input:?}");
            assert_eq!(grid.get(pos), Some(3), "board changed for {input:?}");
        }
    }

    #[test]
    fn test_set_cell_unchecked_keeps_given_marker() {
        let mut grid = Grid::new();
        let pos = Position::new(2, 5);
        grid.set_given(pos, 9);

        grid.set_cell_unchecked(pos, None);
        assert!(grid.cell(pos).is_given());
        assert!(grid.cell(pos).is_empty());

        grid.set_cell_unchecked(pos, Some(4));
        assert!(grid.cell(pos).is_given());
        assert_eq!(grid.get(pos), Some(4));
    }

    #[test]
    fn test_values_matrix() {
        let grid = Grid::from_string(EXAMPLE).unwrap();
        let values = grid.values();
        assert_eq!(values[0][0], Some(5));
        assert_eq!(values[0][2], None);
        assert_eq!(values[4][3], Some(8));

        let filled = values.iter().flatten().filter(|v| v.is_some()).count();
        assert_eq!(filled, grid.filled_count());
    }

    #[test]
    fn test_permits_row_column_box() {
        let mut grid = Grid::new();
        grid.set_given(Position::new(0, 0), 5);

        // Same row, same column, same box
        assert!(!grid.permits(Position::new(0, 8), 5));
        assert!(!grid.permits(Position::new(8, 0), 5));
        assert!(!grid.permits(Position::new(1, 1), 5));

        // Different digit, or out of reach of the 5
        assert!(grid.permits(Position::new(0, 8), 6));
        assert!(grid.permits(Position::new(1, 3), 5));
        assert!(grid.permits(Position::new(3, 1), 5));
    }

    #[test]
    fn test_permits_after_clear() {
        let mut grid = Grid::new();
        let pos = Position::new(4, 4);

        assert!(grid.permits(Position::new(4, 0), 8));
        grid.set_given(pos, 8);
        assert!(!grid.permits(Position::new(4, 0), 8));
        grid.clear_cell(pos);
        assert!(grid.permits(Position::new(4, 0), 8));
    }

    #[test]
    fn test_box_index_and_origin() {
        assert_eq!(Position::new(0, 0).box_index(), 0);
        assert_eq!(Position::new(4, 4).box_index(), 4);
        assert_eq!(Position::new(8, 8).box_index(), 8);
        assert_eq!(Position::new(2, 6).box_index(), 2);
        assert_eq!(Position::new(5, 1).box_index(), 3);
        assert_eq!(Position::new(7, 4).box_origin(), Position::new(6, 3));
    }

    #[test]
    fn test_has_conflict() {
        let mut grid = Grid::new();
        grid.set_given(Position::new(0, 0), 5);
        assert!(!grid.has_conflict(Position::new(0, 0)));

        grid.set_given(Position::new(0, 7), 5);
        assert!(grid.has_conflict(Position::new(0, 0)));
        assert!(grid.has_conflict(Position::new(0, 7)));
        assert!(!grid.has_conflict(Position::new(0, 3)));

        grid.clear_cell(Position::new(0, 7));
        grid.set_given(Position::new(2, 1), 5);
        assert!(grid.has_conflict(Position::new(0, 0)), "box conflict");
    }

    #[test]
    fn test_is_solved_rejects_conflicts() {
        // Complete board built from a row-shifted pattern, then broken
        let mut rows = String::new();
        for row in 0..9 {
            let shift = (row * 3 + row / 3) % 9;
            for col in 0..9 {
                rows.push(char::from(b'1' + ((col + shift) % 9) as u8));
            }
        }
        let mut grid = Grid::from_string(&rows).unwrap();
        assert!(grid.is_complete());
        assert!(grid.is_solved());

        grid.set_cell_unchecked(Position::new(0, 0), grid.get(Position::new(0, 1)));
        assert!(grid.is_complete());
        assert!(!grid.is_solved());
    }

    #[test]
    fn test_display_layout() {
        let grid = Grid::from_string(EXAMPLE).unwrap();
        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "+-------+-------+-------+");
        assert_eq!(lines[1], "| 5 3 . | . 7 . | . . . |");
        assert_eq!(lines[12], "+-------+-------+-------+");
    }
}

//! Core engine for generalized Sudoku-style grids.
//!
//! A board is an N×N table (N a perfect square) whose N rows, N columns, and
//! N non-overlapping √N×√N subgrids must each contain every value of a fixed
//! choice set exactly once. [`Grid`] holds one candidate board and answers
//! local and global queries about it: per-cell candidate values, elimination
//! of forced cells, completeness. [`Solver`] drives the backtracking search
//! on top of it, producing the first completion or every completion.
//!
//! The engine is pure computation over in-memory data; reading boards from
//! files and presenting results belongs to the caller.

mod solver;

pub use solver::Solver;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// A cell coordinate on a grid, row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Why a raw table was rejected at construction time.
///
/// A grid that fails any of these checks is invalid input, not merely
/// unsolvable; it never reaches the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// The table is empty, or a row has the wrong length.
    NotSquare { rows: usize, cols: usize },
    /// The side length has no exact integer square root.
    NoSubgridSize { size: usize },
    /// The choice set does not hold exactly one value per row.
    ChoiceCount { expected: usize, found: usize },
    /// The choice set contains the same value twice.
    DuplicateChoice { value: i32 },
    /// The empty marker is itself a member of the choice set.
    EmptyMarkerInChoices { value: i32 },
    /// A filled cell holds a value outside the choice set.
    UnknownValue { value: i32, at: Position },
    /// The same value appears twice in one row.
    DuplicateInRow { value: i32, row: usize },
    /// The same value appears twice in one column.
    DuplicateInColumn { value: i32, col: usize },
    /// The same value appears twice in one subgrid, identified by its
    /// top-left cell.
    DuplicateInSubgrid { value: i32, at: Position },
    /// A board literal contains a character that is not a digit or a hole.
    BadCharacter { ch: char },
    /// A board literal's length does not correspond to a valid side.
    BadLength { len: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSquare { rows, cols } => {
                write!(f, "table is not square: {rows} rows but a row of {cols} cells")
            }
            Self::NoSubgridSize { size } => {
                write!(f, "side length {size} is not a perfect square")
            }
            Self::ChoiceCount { expected, found } => {
                write!(f, "expected {expected} choices, got {found}")
            }
            Self::DuplicateChoice { value } => write!(f, "choice {value} appears twice"),
            Self::EmptyMarkerInChoices { value } => {
                write!(f, "empty marker {value} is also a choice")
            }
            Self::UnknownValue { value, at } => {
                write!(
                    f,
                    "cell ({}, {}) holds {value}, which is not a choice",
                    at.row, at.col
                )
            }
            Self::DuplicateInRow { value, row } => write!(f, "row {row} contains {value} twice"),
            Self::DuplicateInColumn { value, col } => {
                write!(f, "column {col} contains {value} twice")
            }
            Self::DuplicateInSubgrid { value, at } => {
                write!(
                    f,
                    "the subgrid at ({}, {}) contains {value} twice",
                    at.row, at.col
                )
            }
            Self::BadCharacter { ch } => write!(f, "'{ch}' is not a digit or a hole"),
            Self::BadLength { len } => {
                write!(f, "a board literal needs a square cell count with side 1..=9, got {len}")
            }
        }
    }
}

impl Error for GridError {}

/// No completion exists from the current state.
///
/// Raised when an elimination pass finds a cell with no remaining candidate,
/// or when branch selection runs out of viable cells. The search recovers
/// from it at every branch point; it only reaches the caller once every
/// branch at every level has been exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsolvable;

impl fmt::Display for Unsolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the grid has no solution")
    }
}

impl Error for Unsolvable {}

/// One candidate board: an N×N cell table plus its choice set and the raw
/// marker for an unfilled cell.
///
/// Construction validates shape and per-group distinctness and fails closed.
/// After that the board is only mutated by filling empty cells; the search
/// clones it once per hypothesis branch, so sibling branches never share
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Flat row-major cell table; `None` is an unfilled cell.
    cells: Vec<Option<i32>>,
    /// Cells per side.
    size: usize,
    /// Side of one subgrid.
    subgrid_size: usize,
    /// The valid cell values, in the order candidates are reported.
    choices: Vec<i32>,
    /// The raw-table marker for an unfilled cell.
    empty: i32,
}

fn exact_sqrt(n: usize) -> Option<usize> {
    let root = (n as f64).sqrt().round() as usize;
    (root * root == n).then_some(root)
}

impl Grid {
    /// Build a grid from a raw table.
    ///
    /// `table` must be square with a perfect-square side, `choices` must
    /// hold exactly one distinct value per row, and `empty` (the marker for
    /// an unfilled cell) must not itself be a choice. Every filled cell must
    /// hold a choice value, and no row, column, or subgrid may contain the
    /// same value twice.
    pub fn from_rows(table: &[Vec<i32>], choices: Vec<i32>, empty: i32) -> Result<Self, GridError> {
        let size = table.len();
        if size == 0 {
            return Err(GridError::NotSquare { rows: 0, cols: 0 });
        }
        for row in table {
            if row.len() != size {
                return Err(GridError::NotSquare { rows: size, cols: row.len() });
            }
        }
        let subgrid_size = exact_sqrt(size).ok_or(GridError::NoSubgridSize { size })?;
        if choices.len() != size {
            return Err(GridError::ChoiceCount { expected: size, found: choices.len() });
        }
        for (i, &choice) in choices.iter().enumerate() {
            if choices[..i].contains(&choice) {
                return Err(GridError::DuplicateChoice { value: choice });
            }
        }
        if choices.contains(&empty) {
            return Err(GridError::EmptyMarkerInChoices { value: empty });
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in table.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value == empty {
                    cells.push(None);
                } else if choices.contains(&value) {
                    cells.push(Some(value));
                } else {
                    return Err(GridError::UnknownValue {
                        value,
                        at: Position::new(row, col),
                    });
                }
            }
        }

        let grid = Self { cells, size, subgrid_size, choices, empty };
        grid.check_distinct()?;
        Ok(grid)
    }

    /// Parse a compact single-digit board literal such as
    /// `"530070000600195000098…"`, with `0` or `.` marking an empty cell and
    /// whitespace ignored.
    ///
    /// The cell count must be square with a side of at most 9, so digits
    /// suffice; the choice set defaults to `1..=N` and the empty marker to
    /// `0`.
    pub fn from_string(s: &str) -> Result<Self, GridError> {
        let mut values = Vec::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                '0' | '.' => values.push(0),
                '1'..='9' => values.push(ch as i32 - '0' as i32),
                ch if ch.is_whitespace() => {}
                ch => return Err(GridError::BadCharacter { ch }),
            }
        }
        let size = match exact_sqrt(values.len()) {
            Some(size) if (1..=9).contains(&size) => size,
            _ => return Err(GridError::BadLength { len: values.len() }),
        };
        let table: Vec<Vec<i32>> = values.chunks(size).map(<[i32]>::to_vec).collect();
        Self::from_rows(&table, (1..=size as i32).collect(), 0)
    }

    /// Distinctness of filled values within every row, column, and subgrid.
    fn check_distinct(&self) -> Result<(), GridError> {
        let mut seen: Vec<i32> = Vec::with_capacity(self.size);
        for row in 0..self.size {
            seen.clear();
            for value in (0..self.size).filter_map(|col| self.get(Position::new(row, col))) {
                if seen.contains(&value) {
                    return Err(GridError::DuplicateInRow { value, row });
                }
                seen.push(value);
            }
        }
        for col in 0..self.size {
            seen.clear();
            for value in (0..self.size).filter_map(|row| self.get(Position::new(row, col))) {
                if seen.contains(&value) {
                    return Err(GridError::DuplicateInColumn { value, col });
                }
                seen.push(value);
            }
        }
        for top in (0..self.size).step_by(self.subgrid_size) {
            for left in (0..self.size).step_by(self.subgrid_size) {
                seen.clear();
                for value in self.subgrid_values(Position::new(top, left)) {
                    if seen.contains(&value) {
                        return Err(GridError::DuplicateInSubgrid {
                            value,
                            at: Position::new(top, left),
                        });
                    }
                    seen.push(value);
                }
            }
        }
        Ok(())
    }

    /// Cells per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of one subgrid.
    pub fn subgrid_size(&self) -> usize {
        self.subgrid_size
    }

    /// The valid cell values, in candidate-reporting order.
    pub fn choices(&self) -> &[i32] {
        &self.choices
    }

    /// The raw-table marker for an unfilled cell.
    pub fn empty_marker(&self) -> i32 {
        self.empty
    }

    /// Get the value of a cell, or `None` if it is unfilled.
    pub fn get(&self, pos: Position) -> Option<i32> {
        self.cells[self.index(pos)]
    }

    /// Set the value of a cell.
    ///
    /// Distinctness is not re-checked here; the search only assigns values
    /// reported by [`candidates`](Self::candidates).
    pub fn set(&mut self, pos: Position, value: i32) {
        debug_assert!(self.choices.contains(&value));
        let index = self.index(pos);
        self.cells[index] = Some(value);
    }

    fn index(&self, pos: Position) -> usize {
        debug_assert!(pos.row < self.size && pos.col < self.size);
        pos.row * self.size + pos.col
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Number of unfilled cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// True when no cell is unfilled.
    ///
    /// Distinctness is not re-checked: construction validates it, and the
    /// elimination passes only ever fill values absent from the cell's row,
    /// column, and subgrid.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// The filled values of one row.
    pub fn row_values(&self, row: usize) -> Vec<i32> {
        (0..self.size)
            .filter_map(|col| self.get(Position::new(row, col)))
            .collect()
    }

    /// The filled values of one column.
    pub fn col_values(&self, col: usize) -> Vec<i32> {
        (0..self.size)
            .filter_map(|row| self.get(Position::new(row, col)))
            .collect()
    }

    /// The filled values of the subgrid containing `pos`.
    ///
    /// The subgrid origin is found by truncating both coordinates down to a
    /// multiple of the subgrid side.
    pub fn subgrid_values(&self, pos: Position) -> Vec<i32> {
        let top = pos.row - pos.row % self.subgrid_size;
        let left = pos.col - pos.col % self.subgrid_size;
        let mut values = Vec::with_capacity(self.size);
        for row in top..top + self.subgrid_size {
            for col in left..left + self.subgrid_size {
                if let Some(value) = self.get(Position::new(row, col)) {
                    values.push(value);
                }
            }
        }
        values
    }

    /// The values a cell may take.
    ///
    /// A filled cell yields its stored value alone. An empty cell yields the
    /// choice set minus every value already present in its row, column, and
    /// subgrid, in choice-set order.
    pub fn candidates(&self, pos: Position) -> Vec<i32> {
        if let Some(value) = self.get(pos) {
            return vec![value];
        }
        let mut used = self.row_values(pos.row);
        used.extend(self.col_values(pos.col));
        used.extend(self.subgrid_values(pos));
        self.choices
            .iter()
            .copied()
            .filter(|value| !used.contains(value))
            .collect()
    }

    /// Run one elimination pass: fill every empty cell that has exactly one
    /// candidate.
    ///
    /// The whole board is scanned even after a fill, so a single pass can
    /// settle several independent forced cells, and cells later in the scan
    /// see the values filled earlier in it. A cell with no candidate at all
    /// proves a contradiction and fails the pass.
    ///
    /// Returns whether any cell was filled.
    pub fn apply_naked_singles(&mut self) -> Result<bool, Unsolvable> {
        let mut changed = false;
        for col in 0..self.size {
            for row in 0..self.size {
                let pos = Position::new(row, col);
                if self.get(pos).is_some() {
                    continue;
                }
                let candidates = self.candidates(pos);
                match candidates.len() {
                    0 => return Err(Unsolvable),
                    1 => {
                        self.set(pos, candidates[0]);
                        changed = true;
                    }
                    _ => {}
                }
            }
        }
        Ok(changed)
    }

    /// Repeat elimination passes until a pass fills nothing.
    pub fn propagate(&mut self) -> Result<(), Unsolvable> {
        while self.apply_naked_singles()? {}
        Ok(())
    }

    /// Choose the empty cell with the fewest candidates for hypothesis
    /// splitting.
    ///
    /// The scan returns immediately on a cell with exactly two candidates,
    /// since propagation leaves no empty cell with fewer; otherwise the
    /// first minimal cell in scan order wins. Only call this on a board that is
    /// not [`complete`](Self::is_complete); a board with no viable empty
    /// cell reports [`Unsolvable`].
    pub fn select_branch_cell(&self) -> Result<Position, Unsolvable> {
        let mut best: Option<(usize, Position)> = None;
        for col in 0..self.size {
            for row in 0..self.size {
                let pos = Position::new(row, col);
                if self.get(pos).is_some() {
                    continue;
                }
                let count = self.candidates(pos).len();
                if count == 2 {
                    return Ok(pos);
                }
                if best.map_or(true, |(fewest, _)| count < fewest) {
                    best = Some((count, pos));
                }
            }
        }
        match best {
            Some((count, pos)) if count > 0 => Ok(pos),
            _ => Err(Unsolvable),
        }
    }

    /// Export the raw table, unfilled cells as the empty marker.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| self.get(Position::new(row, col)).unwrap_or(self.empty))
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .choices
            .iter()
            .chain(std::iter::once(&self.empty))
            .map(|value| value.to_string().len())
            .max()
            .unwrap_or(1);
        let band = "-".repeat(self.subgrid_size * (width + 1) - 1);
        let rule = vec![band; self.subgrid_size].join("-+-");
        for row in 0..self.size {
            if row > 0 && row % self.subgrid_size == 0 {
                writeln!(f, "{rule}")?;
            }
            for col in 0..self.size {
                if col > 0 {
                    if col % self.subgrid_size == 0 {
                        write!(f, " |")?;
                    }
                    write!(f, " ")?;
                }
                let value = self.get(Position::new(row, col)).unwrap_or(self.empty);
                write!(f, "{value:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

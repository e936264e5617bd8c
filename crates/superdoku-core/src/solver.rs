//! Backtracking search over [`Grid`] states.
//!
//! Propagation settles every forced cell first; when it stalls, the search
//! picks the cheapest hypothesis cell, clones the board once per candidate
//! value, and recurses. A contradicted branch is abandoned where it fails
//! while its siblings continue. One recursive routine serves both search
//! modes; the collector decides whether to stop at the first solution or
//! accumulate every one.

use crate::{Grid, Unsolvable};

/// Accumulates solved grids up to an optional limit.
struct Collector {
    solutions: Vec<Grid>,
    limit: Option<usize>,
}

impl Collector {
    fn new(limit: Option<usize>) -> Self {
        Self { solutions: Vec::new(), limit }
    }

    fn push(&mut self, grid: Grid) {
        self.solutions.push(grid);
    }

    fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.solutions.len() >= limit)
    }
}

/// Searches for completions of a [`Grid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver;

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Find the first completion of `grid`.
    ///
    /// Candidate values are tried in choice-set order at the cell chosen by
    /// [`Grid::select_branch_cell`], so repeated calls on the same input
    /// return the identical solution.
    pub fn solve_first(&self, grid: &Grid) -> Result<Grid, Unsolvable> {
        let mut out = Collector::new(Some(1));
        self.search(grid.clone(), &mut out);
        out.solutions.pop().ok_or(Unsolvable)
    }

    /// Enumerate every completion of `grid`; empty when there is none.
    ///
    /// Enumeration is unbounded on boards with many empty cells; callers
    /// wanting a bound should use [`count_solutions`](Self::count_solutions)
    /// or wrap the call in an external deadline.
    pub fn solve_all(&self, grid: &Grid) -> Vec<Grid> {
        let mut out = Collector::new(None);
        self.search(grid.clone(), &mut out);
        out.solutions
    }

    /// Count completions of `grid`, stopping once `limit` have been found.
    pub fn count_solutions(&self, grid: &Grid, limit: usize) -> usize {
        let mut out = Collector::new(Some(limit));
        self.search(grid.clone(), &mut out);
        out.solutions.len()
    }

    /// True when `grid` has exactly one completion.
    pub fn has_unique_solution(&self, grid: &Grid) -> bool {
        self.count_solutions(grid, 2) == 1
    }

    /// Depth-first search: propagate, then split on the cheapest hypothesis.
    ///
    /// Each candidate value gets its own clone of the board, so sibling
    /// branches never observe each other's assignments. A branch that proves
    /// a contradiction contributes no solutions and returns normally.
    fn search(&self, mut grid: Grid, out: &mut Collector) {
        if out.is_full() {
            return;
        }
        if grid.propagate().is_err() {
            return;
        }
        if grid.is_complete() {
            out.push(grid);
            return;
        }
        let pivot = match grid.select_branch_cell() {
            Ok(pos) => pos,
            Err(Unsolvable) => return,
        };
        for value in grid.candidates(pivot) {
            if out.is_full() {
                return;
            }
            let mut branch = grid.clone();
            branch.set(pivot, value);
            self.search(branch, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grid, Position};
    use std::collections::HashSet;

    const CLASSIC: &str =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    const CLASSIC_SOLVED: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";

    fn rows(cells: &[&[i32]]) -> Vec<Vec<i32>> {
        cells.iter().map(|row| row.to_vec()).collect()
    }

    fn assert_valid_completion(puzzle: &Grid, solution: &Grid) {
        assert!(solution.is_complete());
        for row in 0..puzzle.size() {
            for col in 0..puzzle.size() {
                let pos = Position::new(row, col);
                if let Some(value) = puzzle.get(pos) {
                    assert_eq!(solution.get(pos), Some(value), "clue changed at {pos:?}");
                }
            }
        }
        // Reconstructing from the raw table re-runs the distinctness check.
        Grid::from_rows(
            &solution.to_rows(),
            solution.choices().to_vec(),
            solution.empty_marker(),
        )
        .expect("solution violates a group constraint");
    }

    #[test]
    fn solves_the_classic_puzzle_exactly() {
        let puzzle = Grid::from_string(CLASSIC).unwrap();
        let solver = Solver::new();
        let solution = solver.solve_first(&puzzle).unwrap();
        assert_eq!(solution, Grid::from_string(CLASSIC_SOLVED).unwrap());
        assert_valid_completion(&puzzle, &solution);
    }

    #[test]
    fn enumerates_the_unique_classic_solution() {
        let puzzle = Grid::from_string(CLASSIC).unwrap();
        let solutions = Solver::new().solve_all(&puzzle);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0], Grid::from_string(CLASSIC_SOLVED).unwrap());
    }

    #[test]
    fn empty_four_by_four_has_288_completions() {
        let grid = Grid::from_rows(&vec![vec![0; 4]; 4], vec![1, 2, 3, 4], 0).unwrap();
        let solutions = Solver::new().solve_all(&grid);
        assert_eq!(solutions.len(), 288);
        let distinct: HashSet<Vec<Vec<i32>>> =
            solutions.iter().map(Grid::to_rows).collect();
        assert_eq!(distinct.len(), 288);
        for solution in &solutions {
            assert_valid_completion(&grid, solution);
        }
    }

    #[test]
    fn reports_a_propagation_contradiction_as_unsolvable() {
        // Columns force both (0, 0) and (0, 2) to the value 4.
        let table = rows(&[
            &[0, 0, 0, 0],
            &[1, 0, 2, 0],
            &[2, 0, 3, 0],
            &[3, 0, 1, 0],
        ]);
        let grid = Grid::from_rows(&table, vec![1, 2, 3, 4], 0).unwrap();
        let solver = Solver::new();
        assert_eq!(solver.solve_first(&grid), Err(Unsolvable));
        assert!(solver.solve_all(&grid).is_empty());
    }

    #[test]
    fn first_solution_is_deterministic() {
        let grid = Grid::from_rows(&vec![vec![0; 4]; 4], vec![1, 2, 3, 4], 0).unwrap();
        let solver = Solver::new();
        let first = solver.solve_first(&grid).unwrap();
        let again = solver.solve_first(&grid).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn a_complete_grid_solves_to_itself() {
        let grid = Grid::from_string("1234341221434321").unwrap();
        let solution = Solver::new().solve_first(&grid).unwrap();
        assert_eq!(solution, grid);
    }

    #[test]
    fn solves_a_single_cell_grid() {
        let grid = Grid::from_rows(&rows(&[&[0]]), vec![7], 0).unwrap();
        let solution = Solver::new().solve_first(&grid).unwrap();
        assert_eq!(solution.get(Position::new(0, 0)), Some(7));
    }

    #[test]
    fn solves_with_a_nonstandard_choice_set() {
        let table = rows(&[
            &[10, 20, 30, 40],
            &[30, 40, 10, 20],
            &[20, 10, 40, 0],
            &[0, 0, 0, 10],
        ]);
        let grid = Grid::from_rows(&table, vec![10, 20, 30, 40], 0).unwrap();
        let solution = Solver::new().solve_first(&grid).unwrap();
        let expected = rows(&[
            &[10, 20, 30, 40],
            &[30, 40, 10, 20],
            &[20, 10, 40, 30],
            &[40, 30, 20, 10],
        ]);
        assert_eq!(solution.to_rows(), expected);
    }

    #[test]
    fn count_solutions_stops_at_the_limit() {
        let grid = Grid::from_rows(&vec![vec![0; 4]; 4], vec![1, 2, 3, 4], 0).unwrap();
        let solver = Solver::new();
        assert_eq!(solver.count_solutions(&grid, 10), 10);
        assert_eq!(solver.count_solutions(&grid, 1000), 288);
        assert!(!solver.has_unique_solution(&grid));

        let puzzle = Grid::from_string(CLASSIC).unwrap();
        assert!(solver.has_unique_solution(&puzzle));
    }
}

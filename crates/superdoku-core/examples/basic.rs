//! Basic example of using the superdoku engine

use superdoku_core::{Grid, Solver};

fn main() {
    // Parse a 9x9 puzzle from a compact board literal
    let puzzle_string =
        "530070000600195000098000060800060003400803001700020006060000280000419005000080079";
    let puzzle = Grid::from_string(puzzle_string).unwrap();

    println!("Puzzle:");
    print!("{}", puzzle);
    println!("Filled cells: {}", puzzle.filled_count());
    println!("Empty cells: {}", puzzle.empty_count());

    // Solve it
    let solver = Solver::new();
    match solver.solve_first(&puzzle) {
        Ok(solution) => {
            println!("\nFirst solution:");
            print!("{}", solution);
        }
        Err(err) => println!("\n{}", err),
    }

    // Check uniqueness
    let solutions = solver.count_solutions(&puzzle, 2);
    println!("\nNumber of solutions (up to 2): {}", solutions);

    // A 4x4 board built from a raw table, with its own choice set
    let table = vec![
        vec![1, 0, 0, 0],
        vec![0, 0, 0, 2],
        vec![0, 3, 0, 0],
        vec![0, 0, 0, 0],
    ];
    let mini = Grid::from_rows(&table, vec![1, 2, 3, 4], 0).unwrap();
    println!("\n4x4 board has {} solutions", solver.solve_all(&mini).len());
}

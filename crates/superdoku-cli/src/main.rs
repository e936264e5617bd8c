//! Command-line front end: load a grid from a comma-separated table file,
//! solve it, and print the result.
//!
//! The engine itself does no I/O; everything here is glue between a table
//! file on disk and the terminal.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use superdoku_core::{Grid, Solver};

/// Solve generalized Sudoku grids read from comma-separated table files.
#[derive(Debug, Parser)]
#[command(name = "superdoku", version, about)]
struct Args {
    /// Path to the grid file: one row per line, cells separated by commas.
    path: PathBuf,

    /// Enumerate every solution instead of stopping at the first.
    ///
    /// This can take a very long time on boards with many empty cells.
    #[arg(long)]
    all: bool,

    /// Comma-separated list of the valid cell values (default 1..=N).
    #[arg(long)]
    choices: Option<String>,

    /// Marker for an empty cell.
    #[arg(long, default_value_t = 0)]
    empty: i32,

    /// Print solutions as JSON tables instead of formatted boards.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let table = parse_table(&text)?;
    let choices = match &args.choices {
        Some(list) => parse_values(list).context("bad --choices list")?,
        None => (1..=table.len() as i32).collect(),
    };
    let grid = Grid::from_rows(&table, choices, args.empty)
        .context("the file does not hold a valid grid")?;
    log::debug!(
        "loaded a {}x{} grid with {} empty cells",
        grid.size(),
        grid.size(),
        grid.empty_count()
    );
    print!("{grid}");

    let solver = Solver::new();
    if args.all {
        let solutions = solver.solve_all(&grid);
        match solutions.len() {
            0 => println!("\nThis grid has no solution"),
            1 => println!("\nThis grid has exactly 1 solution"),
            n => println!("\nThis grid has exactly {n} solutions"),
        }
        for solution in &solutions {
            println!();
            print_solution(solution, args.json)?;
        }
    } else {
        match solver.solve_first(&grid) {
            Ok(solution) => {
                println!("\nFirst solution:");
                print_solution(&solution, args.json)?;
            }
            Err(_) => println!("\nThis grid has no solution"),
        }
    }
    Ok(())
}

fn print_solution(grid: &Grid, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&grid.to_rows())?);
    } else {
        print!("{grid}");
    }
    Ok(())
}

/// Parse a comma-separated table, one row per non-blank line.
fn parse_table(text: &str) -> Result<Vec<Vec<i32>>> {
    let mut table = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row =
            parse_values(line).with_context(|| format!("bad row on line {}", lineno + 1))?;
        table.push(row);
    }
    if table.is_empty() {
        bail!("the file holds no rows");
    }
    Ok(table)
}

/// Parse a comma-separated list of integers.
fn parse_values(line: &str) -> Result<Vec<i32>> {
    line.split(',')
        .map(|cell| {
            let cell = cell.trim();
            cell.parse()
                .with_context(|| format!("'{cell}' is not an integer"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_table_with_blank_lines() {
        let table = parse_table("1,2,0,0\n\n0,0,3,0\n0,0,0,0\n4,0,0,0\n").unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table[0], vec![1, 2, 0, 0]);
        assert_eq!(table[3], vec![4, 0, 0, 0]);
    }

    #[test]
    fn parses_values_with_spaces_and_negatives() {
        assert_eq!(parse_values(" 1, -1 , 12 ").unwrap(), vec![1, -1, 12]);
    }

    #[test]
    fn rejects_non_integer_cells() {
        let err = parse_table("1,2\nx,4\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn rejects_an_empty_file() {
        assert!(parse_table("\n  \n").is_err());
    }
}

//! Writer for delimited table files.

use crate::error::Result;
use std::fs;
use std::path::Path;
use tabsolve_engine::engine::{CellRef, Grid};

/// Write a grid to a table file.
pub fn write_table(path: &Path, grid: &Grid, delimiter: char) -> Result<()> {
    let content = write_table_content(grid, delimiter);
    fs::write(path, content)?;
    Ok(())
}

/// Render a grid in table file format. Every cell is terminated by the
/// delimiter, so trailing empty columns survive a reload.
pub fn write_table_content(grid: &Grid, delimiter: char) -> String {
    let mut out = String::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if let Some(cell) = grid.get(&CellRef::new(row, col)) {
                out.push_str(&cell.to_input_string());
            }
            out.push(delimiter);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_table_content;
    use pretty_assertions::assert_eq;
    use tabsolve_engine::engine::{Cell, SolveStatus, solve};

    fn sample() -> Grid {
        let mut grid = Grid::new(2, 3).unwrap();
        grid.set(&CellRef::new(0, 0), Cell::new_number(1.5)).unwrap();
        grid.set(&CellRef::new(0, 1), Cell::new_text("total")).unwrap();
        grid.set(&CellRef::new(1, 2), Cell::new_expression("=A0*2")).unwrap();
        grid
    }

    #[test]
    fn test_write_keeps_shape() {
        assert_eq!(write_table_content(&sample(), '|'), "1.5|total||\n||=A0*2|\n");
    }

    #[test]
    fn test_write_custom_delimiter() {
        assert_eq!(write_table_content(&sample(), ';'), "1.5;total;;\n;;=A0*2;\n");
    }

    #[test]
    fn test_solved_table_reloads_as_numbers() {
        let mut grid = sample();
        solve(&mut grid);
        let content = write_table_content(&grid, '|');
        assert_eq!(content, "1.5|total||\n||3|\n");

        let reloaded = parse_table_content(&content, '|', '=').unwrap();
        assert_eq!(reloaded.grid, grid);
        assert_eq!(reloaded.expression_count, 0);
    }

    #[test]
    fn test_division_by_zero_reloads_as_number() {
        let mut grid = parse_table_content("0|=1/A0\n", '|', '=').unwrap().grid;
        solve(&mut grid);
        let content = write_table_content(&grid, '|');
        assert_eq!(content, "0|#INF!|\n");

        assert_eq!(parse_table_content(&content, '|', '=').unwrap().grid, grid);

        let extended = format!("{content}=B0+1|\n");
        let mut reloaded = parse_table_content(&extended, '|', '=').unwrap().grid;
        let report = solve(&mut reloaded);
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(
            reloaded.get(&CellRef::new(1, 0)).unwrap().as_number(),
            Some(f64::INFINITY)
        );
    }

    #[test]
    fn test_trailing_empty_column_survives_reload() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set(&CellRef::new(0, 0), Cell::new_number(7.0)).unwrap();
        let content = write_table_content(&grid, '|');
        assert_eq!(content, "7|||\n");
        assert_eq!(parse_table_content(&content, '|', '=').unwrap().grid, grid);
    }

    #[test]
    fn test_write_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("tabsolve_writer_{}.txt", std::process::id()));
        write_table(&path, &sample(), '|').unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(content, "1.5|total||\n||=A0*2|\n");
    }
}

use super::Document;
use crate::error::{Result, TabsolveError};
use tabsolve_engine::engine::{
    Cell, CellRef, CellType, SolveReport, format_number, solve_with_count,
};

impl Document {
    /// Replace a cell with parsed user input.
    pub fn set_cell(&mut self, cell_ref: &CellRef, input: &str) -> Result<()> {
        if let Some(bad) = input
            .chars()
            .find(|&c| c == self.config.delimiter || c == '\n' || c == '\r')
        {
            return Err(TabsolveError::InvalidInput(bad));
        }

        let cell = Cell::from_input(input, self.config.marker);
        let is_expression = cell.is_expression();
        let old = self.grid.set(cell_ref, cell)?;

        if old.is_expression() {
            self.expression_count -= 1;
        }
        if is_expression {
            self.expression_count += 1;
        }
        self.modified = true;
        log::debug!("set {} = {:?}", cell_ref, input.trim());
        Ok(())
    }

    /// Replace a cell addressed by name, e.g. `"B2"`.
    pub fn set_cell_by_name(&mut self, name: &str, input: &str) -> Result<()> {
        let cell_ref = CellRef::from_str(name.trim())
            .ok_or_else(|| TabsolveError::InvalidCellRef(name.to_string()))?;
        self.set_cell(&cell_ref, input)
    }

    /// Text shown for a cell. Cells outside the grid display as empty.
    pub fn get_cell_display(&self, cell_ref: &CellRef) -> String {
        let Some(cell) = self.grid.get(cell_ref) else {
            return String::new();
        };
        match &cell.contents {
            CellType::Empty => String::new(),
            CellType::Text(s) | CellType::Colour(s) => s.clone(),
            CellType::Number(n) => format_number(*n, self.config.decimal_places),
            CellType::Expression { text, .. } => text.clone(),
        }
    }

    /// Solve every formula in place.
    pub fn solve(&mut self) -> SolveReport {
        let report = solve_with_count(&mut self.grid, self.config.marker, self.expression_count);
        if report.evaluated > 0 {
            self.modified = true;
            self.expression_count = self.expression_count.saturating_sub(report.evaluated);
        }
        report
    }
}

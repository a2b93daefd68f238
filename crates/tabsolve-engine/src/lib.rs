//! tabsolve_engine - Table calculation kernel.

pub mod engine;

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn grid_with(rows: usize, cols: usize, cells: &[(&str, &str)]) -> Grid {
        let mut grid = Grid::new(rows, cols).unwrap();
        for (name, input) in cells {
            grid.set(&r(name), Cell::from_input(input, DEFAULT_MARKER))
                .unwrap();
        }
        grid
    }

    fn number(grid: &Grid, name: &str) -> Option<f64> {
        grid.get(&r(name)).and_then(Cell::as_number)
    }

    fn messages(report: &SolveReport) -> Vec<String> {
        report.diagnostics.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_no_formulas_is_nothing_to_solve() {
        let mut grid = grid_with(2, 2, &[("A0", "1"), ("B1", "text")]);
        let before = grid.clone();

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::NothingToSolve);
        assert!(report.diagnostics.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_simple_sum() {
        let mut grid = grid_with(3, 2, &[("B1", "3"), ("B2", "4"), ("A0", "=B1+B2")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(number(&grid, "A0"), Some(7.0));
        assert_eq!(report.evaluated, 1);
    }

    #[test]
    fn test_precedence_and_associativity() {
        let mut grid = grid_with(
            3,
            1,
            &[("A0", "=2^3*2"), ("A1", "=1-2-3"), ("A2", "=2+3*4-8/2")],
        );

        solve(&mut grid);
        assert_eq!(number(&grid, "A0"), Some(16.0));
        assert_eq!(number(&grid, "A1"), Some(-4.0));
        assert_eq!(number(&grid, "A2"), Some(10.0));
    }

    #[test]
    fn test_chained_formulas_resolve_in_dependency_order() {
        let mut grid = grid_with(
            4,
            1,
            &[("A0", "=A1*2"), ("A1", "=A2+A3"), ("A2", "1.5"), ("A3", "=-A2")],
        );

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(number(&grid, "A3"), Some(-1.5));
        assert_eq!(number(&grid, "A1"), Some(0.0));
        assert_eq!(number(&grid, "A0"), Some(0.0));
    }

    #[test]
    fn test_unary_minus_of_negative_reference() {
        let mut grid = grid_with(2, 1, &[("A0", "-3"), ("A1", "=5--A0")]);

        solve(&mut grid);
        assert_eq!(number(&grid, "A1"), Some(2.0));
    }

    #[test]
    fn test_cycle_aborts_without_mutation() {
        let mut grid = grid_with(2, 2, &[("A0", "=B0"), ("B0", "=A0"), ("A1", "=2*3")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::AbortedCycle);
        let Some(Diagnostic::Cycle(cycle)) = report.diagnostics.last() else {
            panic!("expected a cycle diagnostic, got {:?}", report.diagnostics);
        };
        assert!(cycle.contains(&r("A0")));
        assert!(cycle.contains(&r("B0")));
        assert!(grid.get(&r("A0")).unwrap().is_expression());
        assert!(grid.get(&r("A1")).unwrap().is_expression());
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut grid = grid_with(1, 1, &[("A0", "=A0+1")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::AbortedCycle);
        assert_eq!(
            messages(&report),
            vec!["[CYCLE CHECK] A dependency cycle was found: A0 -> A0"]
        );
    }

    #[test]
    fn test_empty_dependency_aborts_without_mutation() {
        let mut grid = grid_with(2, 2, &[("A0", "=B0+1"), ("A1", "=7")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::AbortedInvalidDependency);
        assert_eq!(
            messages(&report),
            vec!["[DEPCHK] Expressions depend on an empty cell: A0 -> ( B0 = '')"]
        );
        assert!(grid.get(&r("A1")).unwrap().is_expression());
    }

    #[test]
    fn test_text_dependency_aborts() {
        let mut grid = grid_with(1, 2, &[("A0", "=B0+1"), ("B0", "hello")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::AbortedInvalidDependency);
        let Some(Diagnostic::InvalidDependency(found)) = report.diagnostics.last() else {
            panic!("expected an invalid dependency");
        };
        assert_eq!(found.path, vec![r("A0"), r("B0")]);
        assert_eq!(found.offending, Offending::Text("hello".to_string()));
    }

    #[test]
    fn test_dependency_on_invalid_formula_aborts() {
        let mut grid = grid_with(1, 2, &[("A0", "=B0*2"), ("B0", "=A0+")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::AbortedInvalidDependency);
        assert_eq!(report.diagnostics.len(), 2);
        assert!(matches!(
            report.diagnostics[0],
            Diagnostic::Syntax(SyntaxError::DanglingOperator { .. })
        ));
    }

    #[test]
    fn test_syntax_errors_do_not_block_unrelated_cells() {
        let mut grid = grid_with(
            3,
            2,
            &[
                ("A0", "=A1+"),
                ("B0", "="),
                ("A1", "=+"),
                ("B1", "=2*5"),
                ("A2", "=B1+1"),
            ],
        );

        let mut analysed = grid.clone();
        let analysis = analyze_grid(&mut analysed, '=');
        let graph = build_graph(analysed.expression_count(), &analysis.formulas);
        assert!(graph.find(&r("A0")).is_none());
        assert!(graph.find(&r("B0")).is_none());
        assert!(graph.find(&r("A1")).is_none());
        assert_eq!(graph.len(), 2);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(
            messages(&report),
            vec![
                "[SYNTAX ERROR] Dangling operator in cell A0: \"=A1+\"",
                "[SYNTAX ERROR] Empty expression in cell B0.",
                "[SYNTAX ERROR] Empty expression in cell A1.",
            ]
        );
        assert_eq!(number(&grid, "B1"), Some(10.0));
        assert_eq!(number(&grid, "A2"), Some(11.0));
        assert_eq!(
            grid.get(&r("A0")).unwrap().validity(),
            Some(Validity::Invalid)
        );
    }

    #[test]
    fn test_all_formulas_invalid_is_nothing_to_solve() {
        let mut grid = grid_with(1, 2, &[("A0", "=Q0"), ("B0", "=A7")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::NothingToSolve);
        assert_eq!(
            messages(&report),
            vec![
                "[OOB ERROR] Cell Q0 used in expression in A0 but column Q doesn't exist in the table.",
                "[OOB ERROR] Cell A7 used in expression in B0 but row 7 doesn't exist in the table.",
            ]
        );
    }

    #[test]
    fn test_shared_dependency_evaluated_once() {
        let mut grid = grid_with(
            6,
            3,
            &[("A0", "=C5+1"), ("B0", "=C5*2"), ("C5", "=A5^2"), ("A5", "3")],
        );

        let expression_count = grid.expression_count();
        let analysis = analyze_grid(&mut grid, DEFAULT_MARKER);
        let graph = build_graph(expression_count, &analysis.formulas);
        let c5 = graph.find(&r("C5")).unwrap();
        let a0 = graph.find(&r("A0")).unwrap();
        let b0 = graph.find(&r("B0")).unwrap();
        assert_eq!(graph.dependencies(a0), &[c5]);
        assert_eq!(graph.dependencies(b0), &[c5]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(report.evaluated, 3);
        assert_eq!(number(&grid, "C5"), Some(9.0));
        assert_eq!(number(&grid, "A0"), Some(10.0));
        assert_eq!(number(&grid, "B0"), Some(18.0));
    }

    #[test]
    fn test_reference_prefix_does_not_match_longer_reference() {
        let mut grid = grid_with(11, 2, &[("B1", "2"), ("B10", "30"), ("A0", "=B1+B10")]);

        solve(&mut grid);
        assert_eq!(number(&grid, "A0"), Some(32.0));
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        let mut grid = grid_with(2, 1, &[("A0", "=1/A1"), ("A1", "0")]);

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(number(&grid, "A0"), Some(f64::INFINITY));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut grid = grid_with(3, 2, &[("B1", "3"), ("B2", "4"), ("A0", "=B1+B2"), ("A1", "=A0*A0")]);

        solve(&mut grid);
        let solved = grid.clone();
        assert_eq!(number(&solved, "A1"), Some(49.0));

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::NothingToSolve);
        assert_eq!(grid, solved);
    }

    #[test]
    fn test_custom_marker() {
        let mut grid = grid_with(1, 2, &[("A0", "4")]);
        grid.set(&r("B0"), Cell::from_input("@A0*2", '@')).unwrap();

        let report = solve_with_marker(&mut grid, '@');
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(number(&grid, "B0"), Some(8.0));
    }

    #[test]
    fn test_long_dependency_chain() {
        let mut grid = Grid::new(MAX_ROWS, 1).unwrap();
        for row in 0..MAX_ROWS - 1 {
            let input = format!("=A{}+1", row + 1);
            grid.set(&CellRef::new(row, 0), Cell::from_input(&input, DEFAULT_MARKER))
                .unwrap();
        }
        grid.set(&CellRef::new(MAX_ROWS - 1, 0), Cell::new_number(0.0))
            .unwrap();

        let report = solve(&mut grid);
        assert_eq!(report.status, SolveStatus::Solved);
        assert_eq!(number(&grid, "A0"), Some((MAX_ROWS - 1) as f64));
    }
}

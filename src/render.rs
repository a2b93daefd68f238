//! Terminal rendering of tables and solve results.

use std::collections::HashSet;
use std::fmt::Write as _;

use tabsolve_core::Document;
use tabsolve_engine::engine::{CellRef, CellType, Diagnostic, SolveReport, SolveStatus, Validity};

/// Padding added around the widest cell.
const EXTRA_CELL_SPACE: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Plain,
    Good,
    Bad,
    Flagged,
    Rgb(u8, u8, u8),
}

#[cfg(feature = "color")]
fn apply_tone(text: String, tone: Tone) -> String {
    use crossterm::style::{Color, Stylize, style};
    match tone {
        Tone::Plain => text,
        Tone::Good => style(text).green().to_string(),
        Tone::Bad => style(text).red().to_string(),
        Tone::Flagged => style(text).yellow().bold().to_string(),
        Tone::Rgb(r, g, b) => style(text).with(Color::Rgb { r, g, b }).to_string(),
    }
}

#[cfg(not(feature = "color"))]
fn apply_tone(text: String, _tone: Tone) -> String {
    text
}

fn paint(text: String, tone: Tone, color: bool) -> String {
    if color { apply_tone(text, tone) } else { text }
}

fn parse_hex_colour(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Cells named by cycle and invalid-dependency diagnostics.
fn flagged_cells(report: Option<&SolveReport>) -> HashSet<CellRef> {
    report
        .into_iter()
        .flat_map(|r| r.diagnostics.iter())
        .filter(|d| !matches!(d, Diagnostic::Syntax(_)))
        .flat_map(Diagnostic::cells)
        .collect()
}

/// Render the document as a boxed table with column letters and 0-based row
/// labels. `report` highlights the cells its diagnostics point at.
pub fn render_table(doc: &Document, report: Option<&SolveReport>, color: bool) -> String {
    let rows = doc.rows();
    let cols = doc.cols();
    let flagged = flagged_cells(report);

    let displays: Vec<Vec<String>> = (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| doc.get_cell_display(&CellRef::new(row, col)))
                .collect()
        })
        .collect();

    let width = displays
        .iter()
        .flatten()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .max(1)
        + EXTRA_CELL_SPACE;

    let mut out = String::new();

    out.push_str(" LE |");
    let left = (width - 1) / 2;
    let right = width - 1 - left;
    for col in 0..cols {
        let _ = write!(
            out,
            "{:left$}{}{:right$}|",
            "",
            CellRef::col_to_letter(col),
            ""
        );
    }
    out.push('\n');

    let rule = "-".repeat(cols * (width + 1) + 5);
    out.push_str(&rule);
    out.push('\n');

    for (row, line) in displays.iter().enumerate() {
        let _ = write!(out, "|{:>3}|", row);
        for (col, display) in line.iter().enumerate() {
            let cell_ref = CellRef::new(row, col);
            let padded = format!("{:>width$}", display);
            let tone = if flagged.contains(&cell_ref) {
                Tone::Flagged
            } else {
                cell_tone(doc, &cell_ref)
            };
            out.push_str(&paint(padded, tone, color));
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

fn cell_tone(doc: &Document, cell_ref: &CellRef) -> Tone {
    match doc.grid.get(cell_ref).map(|c| &c.contents) {
        Some(CellType::Expression {
            validity: Validity::Invalid,
            ..
        }) => Tone::Bad,
        Some(CellType::Colour(hex)) => match parse_hex_colour(hex) {
            Some((r, g, b)) => Tone::Rgb(r, g, b),
            None => Tone::Plain,
        },
        _ => Tone::Plain,
    }
}

fn kind_label(contents: Option<&CellType>) -> &'static str {
    match contents {
        None | Some(CellType::Empty) => "EMPTY",
        Some(CellType::Number(_)) => "NUM",
        Some(CellType::Text(_)) => "TEXT",
        Some(CellType::Colour(_)) => "COLOR",
        Some(CellType::Expression { validity, .. }) => match validity {
            Validity::Default => "EXPR",
            Validity::Valid => "EXPR+",
            Validity::Invalid => "EXPR-",
        },
    }
}

/// Render the kind of every cell; formulas show their validity as
/// `EXPR`, `EXPR+` or `EXPR-`.
pub fn render_kinds(doc: &Document) -> String {
    let rule = "-".repeat(doc.cols() * 6 + 1);
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    for row in 0..doc.rows() {
        out.push('|');
        for col in 0..doc.cols() {
            let contents = doc.grid.get(&CellRef::new(row, col)).map(|c| &c.contents);
            let _ = write!(out, "{:>5}|", kind_label(contents));
        }
        out.push('\n');
    }
    out.push_str(&rule);
    out.push('\n');
    out
}

pub fn status_line(status: SolveStatus, color: bool) -> String {
    let tone = if status.is_aborted() { Tone::Bad } else { Tone::Good };
    paint(status.to_string(), tone, color)
}

pub fn diagnostic_line(diagnostic: &Diagnostic, color: bool) -> String {
    paint(diagnostic.to_string(), Tone::Bad, color)
}

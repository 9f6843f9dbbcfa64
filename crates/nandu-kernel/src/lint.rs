//! Structural diagnostics for grids that parse but may not mean what their
//! author intended.
//!
//! Lint never fails: it reports. Evaluation of a grid with lint errors is
//! still defined (see [`crate::network`]), except for facing blind halves,
//! which evaluation rejects as cyclic.

use crate::error::Severity;
use crate::grid::{Cell, Grid};
use crate::network::paired_column;
use std::collections::HashSet;

/// Which structural rule a diagnostic comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LintRule {
    /// A block half whose paired column holds something else.
    UnpairedBlock,
    /// A cell that reads the row above while sitting in the top row.
    ReadsAboveTop,
    /// A sink label used by more than one cell.
    DuplicateSink,
    /// A source that no sink depends on.
    UnusedSource,
}

impl LintRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnpairedBlock => "unpaired_block",
            Self::ReadsAboveTop => "reads_above_top",
            Self::DuplicateSink => "duplicate_sink",
            Self::UnusedSource => "unused_source",
        }
    }
}

/// One finding, anchored at a cell.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub rule: LintRule,
    pub severity: Severity,
    pub column: usize,
    pub row: usize,
    pub description: String,
}

/// Run every rule over `grid`, in row-major order of the anchoring cell.
pub fn lint(grid: &Grid) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen_sinks: HashSet<&str> = HashSet::new();

    for (column, row, cell) in grid.positions() {
        if cell.is_block_half() {
            check_block_pairing(grid, column, row, cell, &mut diagnostics);
        }
        if row == 0 && matches!(cell, Cell::Sink(_) | Cell::Buffer | Cell::Nand | Cell::Inverter)
        {
            diagnostics.push(Diagnostic {
                rule: LintRule::ReadsAboveTop,
                severity: Severity::Warning,
                column,
                row,
                description: format!("`{}` in the top row has no input", cell.token()),
            });
        }
        if let Cell::Sink(label) = cell
            && !seen_sinks.insert(label.as_str())
        {
            diagnostics.push(Diagnostic {
                rule: LintRule::DuplicateSink,
                severity: Severity::Warning,
                column,
                row,
                description: format!("sink `{label}` is declared more than once"),
            });
        }
    }

    let used = sources_in_use(grid);
    for label in grid.sources() {
        if used.contains(label.as_str()) {
            continue;
        }
        let first = grid
            .positions()
            .find(|(_, _, cell)| matches!(cell, Cell::Source(l) if l == label));
        if let Some((column, row, _)) = first {
            diagnostics.push(Diagnostic {
                rule: LintRule::UnusedSource,
                severity: Severity::Info,
                column,
                row,
                description: format!("source `{label}` does not reach any sink"),
            });
        }
    }

    diagnostics.sort_by_key(|d| (d.row, d.column));
    diagnostics
}

/// Whether any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

fn check_block_pairing(
    grid: &Grid,
    column: usize,
    row: usize,
    cell: &Cell,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let paired = paired_column(grid, column as isize, row as isize);
    let partner = grid.get(paired, row as isize);
    let expected = cell.partner();
    if partner == expected.as_ref() {
        return;
    }

    // A mismatched pair of two block halves is reported once, from the left.
    if let Some(other) = partner
        && other.is_block_half()
        && (paired as usize) < column
        && paired_column(grid, paired, row as isize) == column as isize
    {
        return;
    }

    let description = match (cell, partner) {
        (Cell::Crossover, Some(Cell::Crossover)) => {
            "two blind `r` halves face each other; neither has a sensor".to_string()
        }
        (_, Some(other)) => format!(
            "`{}` is paired with `{}` in column {paired}",
            cell.token(),
            other.token()
        ),
        (_, None) => format!("`{}` has no partner column", cell.token()),
    };
    diagnostics.push(Diagnostic {
        rule: LintRule::UnpairedBlock,
        severity: Severity::Error,
        column,
        row,
        description,
    });
}

/// Labels of sources reachable backwards from some sink.
fn sources_in_use(grid: &Grid) -> HashSet<&str> {
    let mut used = HashSet::new();
    let mut visited: HashSet<(isize, isize)> = HashSet::new();
    let mut stack: Vec<(isize, isize)> = grid
        .sinks()
        .iter()
        .map(|s| (s.column as isize, s.row as isize - 1))
        .collect();

    while let Some((column, row)) = stack.pop() {
        if !visited.insert((column, row)) {
            continue;
        }
        let Some(cell) = grid.get(column, row) else {
            continue;
        };
        match cell {
            Cell::Empty => {}
            Cell::Source(label) => {
                used.insert(label.as_str());
            }
            Cell::Sink(_) | Cell::Buffer | Cell::Inverter => stack.push((column, row - 1)),
            Cell::Nand => {
                stack.push((column, row - 1));
                stack.push((paired_column(grid, column, row), row - 1));
            }
            Cell::Crossover => stack.push((paired_column(grid, column, row), row)),
        }
    }
    used
}

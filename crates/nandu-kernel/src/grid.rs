//! Grid model: the board of cells and its text description.
//!
//! A description is a header line with two integers followed by one line per
//! row of whitespace-separated tokens:
//!
//! ```text
//! 3 2
//! Q1 Q2
//! W  W
//! L1 X
//! ```
//!
//! Light travels downward: every cell reads the row above it. Two-cell
//! blocks (`B B`, `W W`, `R r`) sit side by side in one row and occupy the
//! two columns of a pairing group (see [`crate::network::paired_column`]).
//!
//! The header is read as `rows columns`. Descriptions written in the
//! `columns rows` order are also accepted when only that reading fits the
//! data; for square boards the two readings coincide.

use crate::digest::GridDigest;
use crate::error::NanduError;
use crate::network::paired_column;
use serde::Serialize;
use std::fmt;

/// One cell of the board, classified by its token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    /// `X`: no block. Contributes `false` and resets column pairing.
    Empty,
    /// `Q…`: a light source. The label is the whole token.
    Source(String),
    /// `L…`: a light sensor reading the cell above. The label is the whole token.
    Sink(String),
    /// `B`: half of a blue block; passes the cell above through.
    Buffer,
    /// `W`: half of a white block; NAND of both halves' upstream cells.
    Nand,
    /// `R`: the sensing half of a red block; inverts the cell above.
    Inverter,
    /// `r`: the blind half of a red block; repeats its partner's output.
    Crossover,
}

impl Cell {
    /// Classify a token, or `None` if it is outside the grammar.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "X" => Some(Cell::Empty),
            "B" => Some(Cell::Buffer),
            "W" => Some(Cell::Nand),
            "R" => Some(Cell::Inverter),
            "r" => Some(Cell::Crossover),
            _ if token.starts_with('Q') => Some(Cell::Source(token.to_string())),
            _ if token.starts_with('L') => Some(Cell::Sink(token.to_string())),
            _ => None,
        }
    }

    /// The token this cell is written as.
    pub fn token(&self) -> &str {
        match self {
            Cell::Empty => "X",
            Cell::Source(label) | Cell::Sink(label) => label,
            Cell::Buffer => "B",
            Cell::Nand => "W",
            Cell::Inverter => "R",
            Cell::Crossover => "r",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Whether this cell is one half of a two-column block.
    pub fn is_block_half(&self) -> bool {
        matches!(
            self,
            Cell::Buffer | Cell::Nand | Cell::Inverter | Cell::Crossover
        )
    }

    /// The cell a well-formed block expects in the paired column.
    pub fn partner(&self) -> Option<Cell> {
        match self {
            Cell::Buffer => Some(Cell::Buffer),
            Cell::Nand => Some(Cell::Nand),
            Cell::Inverter => Some(Cell::Crossover),
            Cell::Crossover => Some(Cell::Inverter),
            Cell::Empty | Cell::Source(_) | Cell::Sink(_) => None,
        }
    }
}

/// Where a declared sink sits on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SinkPosition {
    pub label: String,
    pub column: usize,
    pub row: usize,
}

/// A rectangular board of cells, row-major, row 0 at the top.
///
/// Immutable once built. Editor operations such as
/// [`Grid::with_inverter_flipped`] return a new grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    sources: Vec<String>,
    sinks: Vec<SinkPosition>,
}

impl Grid {
    /// Parse a grid description.
    ///
    /// Blank lines are ignored. Fails with [`NanduError::MalformedGrid`] when
    /// the header is missing or not two integers, when the number of rows or
    /// the token count of any row disagrees with the header, or when a token
    /// is outside the grammar.
    pub fn parse(text: &str) -> Result<Self, NanduError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| NanduError::malformed(1, "missing header line"))?;
        let (first, second) = parse_header(header_line, header)?;

        let data: Vec<(usize, Vec<&str>)> = lines
            .map(|(line, text)| (line, text.split_whitespace().collect()))
            .collect();

        let fits = |rows: usize, columns: usize| {
            data.len() == rows && data.iter().all(|(_, tokens)| tokens.len() == columns)
        };
        let (height, width) = if fits(first, second) {
            (first, second)
        } else if fits(second, first) {
            (second, first)
        } else {
            return Err(shape_error(header_line, first, second, &data));
        };

        let mut cells = Vec::with_capacity(width * height);
        for (line, tokens) in &data {
            for token in tokens {
                let cell = Cell::from_token(token).ok_or_else(|| {
                    NanduError::malformed(*line, format!("unknown token `{token}`"))
                })?;
                cells.push(cell);
            }
        }

        Ok(Self::assemble(width, height, cells))
    }

    /// Build a grid from rows of cells, as an editor holding a board would.
    ///
    /// Every row must have the length of the first, and a grid with rows
    /// must have at least one column.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, NanduError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height > 0 && width == 0 {
            return Err(NanduError::malformed(2, "row 0 has no cells"));
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(NanduError::malformed(
                    row + 2,
                    format!(
                        "row {row} has {} cells, expected {width}",
                        cells_in_row.len()
                    ),
                ));
            }
            cells.extend(cells_in_row);
        }
        Ok(Self::assemble(width, height, cells))
    }

    fn assemble(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        let mut sources: Vec<String> = Vec::new();
        let mut sinks: Vec<SinkPosition> = Vec::new();
        for (idx, cell) in cells.iter().enumerate() {
            match cell {
                Cell::Source(label) if !sources.contains(label) => {
                    sources.push(label.clone());
                }
                Cell::Sink(label) if !sinks.iter().any(|s| &s.label == label) => {
                    sinks.push(SinkPosition {
                        label: label.clone(),
                        column: idx % width,
                        row: idx / width,
                    });
                }
                _ => {}
            }
        }
        Self {
            width,
            height,
            cells,
            sources,
            sinks,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The cell at `(column, row)`, or `None` outside the board.
    pub fn cell(&self, column: usize, row: usize) -> Option<&Cell> {
        if column < self.width && row < self.height {
            Some(&self.cells[row * self.width + column])
        } else {
            None
        }
    }

    /// Signed lookup: negative coordinates are outside the board.
    pub fn get(&self, column: isize, row: isize) -> Option<&Cell> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        self.cell(column, row)
    }

    /// The cells of one row, left to right.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        (row < self.height).then(|| &self.cells[row * self.width..(row + 1) * self.width])
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        (0..self.height).filter_map(move |row| self.row(row))
    }

    /// Every cell with its coordinates, in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx % width, idx / width, cell))
    }

    /// Declared source labels, in order of first appearance (row-major).
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Declared sinks, in order of first appearance (row-major).
    ///
    /// A label that appears in several cells is declared once, at its first
    /// cell.
    pub fn sinks(&self) -> &[SinkPosition] {
        &self.sinks
    }

    /// Swap the sensing side of the red block containing `(column, row)`.
    ///
    /// The `R` half becomes `r` and vice versa. Flipping twice restores the
    /// original grid.
    pub fn with_inverter_flipped(&self, column: usize, row: usize) -> Result<Grid, NanduError> {
        let not_inverter = || NanduError::NotAnInverter { column, row };

        let cell = self.cell(column, row).ok_or_else(not_inverter)?;
        if !matches!(cell, Cell::Inverter | Cell::Crossover) {
            return Err(not_inverter());
        }
        let partner = usize::try_from(paired_column(self, column as isize, row as isize))
            .map_err(|_| not_inverter())?;
        let partner_cell = self.cell(partner, row).ok_or_else(not_inverter)?;
        if Some(partner_cell) != cell.partner().as_ref() {
            return Err(not_inverter());
        }

        let mut flipped = self.clone();
        flipped
            .cells
            .swap(row * self.width + column, row * self.width + partner);
        Ok(flipped)
    }

    /// Digest of the canonical rendering.
    pub fn digest(&self) -> GridDigest {
        GridDigest::from_text(&self.to_string())
    }
}

impl fmt::Display for Grid {
    /// Canonical description: `rows columns` header, single-space separators.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.height, self.width)?;
        for row in self.rows() {
            let tokens: Vec<&str> = row.iter().map(Cell::token).collect();
            writeln!(f, "{}", tokens.join(" "))?;
        }
        Ok(())
    }
}

fn parse_header(line: usize, header: &str) -> Result<(usize, usize), NanduError> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [first, second] = fields.as_slice() else {
        return Err(NanduError::malformed(
            line,
            format!("expected two integers in header, found `{header}`"),
        ));
    };
    Ok((header_field(line, first)?, header_field(line, second)?))
}

fn header_field(line: usize, field: &str) -> Result<usize, NanduError> {
    field.parse().map_err(|_| {
        NanduError::malformed(
            line,
            format!("header field `{field}` is not a non-negative integer"),
        )
    })
}

/// Describe why the data does not fit the header, reading it as `rows columns`.
fn shape_error(
    header_line: usize,
    rows: usize,
    columns: usize,
    data: &[(usize, Vec<&str>)],
) -> NanduError {
    if data.len() < rows {
        return NanduError::malformed(
            header_line,
            format!("declared {rows} rows, found {}", data.len()),
        );
    }
    if data.len() > rows {
        let (line, _) = &data[rows];
        return NanduError::malformed(*line, format!("unexpected row beyond the declared {rows}"));
    }
    match data.iter().find(|(_, tokens)| tokens.len() != columns) {
        Some((line, tokens)) => NanduError::malformed(
            *line,
            format!("expected {columns} tokens, found {}", tokens.len()),
        ),
        None => NanduError::malformed(header_line, "grid does not match its header"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAND_PAIR: &str = "3 2\nQ1 Q2\nW W\nL1 X\n";

    #[test]
    fn parse_classifies_tokens() {
        let grid = Grid::parse("2 4\nQ1 X B W\nR r L7 Qa\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.cell(0, 0), Some(&Cell::Source("Q1".to_string())));
        assert_eq!(grid.cell(1, 0), Some(&Cell::Empty));
        assert_eq!(grid.cell(2, 0), Some(&Cell::Buffer));
        assert_eq!(grid.cell(3, 0), Some(&Cell::Nand));
        assert_eq!(grid.cell(0, 1), Some(&Cell::Inverter));
        assert_eq!(grid.cell(1, 1), Some(&Cell::Crossover));
        assert_eq!(grid.cell(2, 1), Some(&Cell::Sink("L7".to_string())));
        assert_eq!(grid.cell(3, 1), Some(&Cell::Source("Qa".to_string())));
        assert_eq!(grid.cell(4, 1), None);
    }

    #[test]
    fn parse_tolerates_whitespace_runs_and_blank_lines() {
        let grid = Grid::parse("\n  3   2 \nQ1\t Q2\n\nW    W\nL1 X\n\n").unwrap();
        assert_eq!((grid.height(), grid.width()), (3, 2));
    }

    #[test]
    fn parse_accepts_columns_rows_header_when_only_that_fits() {
        // Five tokens per line, three lines: only `columns rows` fits.
        let grid = Grid::parse("5 3\nQ1 X X Q2 Q3\nB B X W W\nL1 X X L2 X\n").unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 5);
    }

    #[test]
    fn missing_data_row_is_malformed() {
        let err = Grid::parse("3 3\nQ1 X X\nL1 X X\n").unwrap_err();
        assert_eq!(
            err,
            NanduError::MalformedGrid {
                line: 1,
                message: "declared 3 rows, found 2".to_string()
            }
        );
    }

    #[test]
    fn short_row_is_malformed() {
        let err = Grid::parse("2 2\nQ1 X\nL1\n").unwrap_err();
        assert!(
            matches!(err, NanduError::MalformedGrid { line: 3, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn extra_row_is_malformed() {
        let err = Grid::parse("1 2\nQ1 X\nL1 X\n").unwrap_err();
        assert!(
            matches!(err, NanduError::MalformedGrid { line: 3, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn bad_header_is_malformed() {
        assert!(matches!(
            Grid::parse(""),
            Err(NanduError::MalformedGrid { line: 1, .. })
        ));
        assert!(matches!(
            Grid::parse("2\nQ1 X\nL1 X\n"),
            Err(NanduError::MalformedGrid { line: 1, .. })
        ));
        assert!(matches!(
            Grid::parse("two 2\nQ1 X\nL1 X\n"),
            Err(NanduError::MalformedGrid { line: 1, .. })
        ));
        assert!(matches!(
            Grid::parse("-2 2\nQ1 X\nL1 X\n"),
            Err(NanduError::MalformedGrid { line: 1, .. })
        ));
    }

    #[test]
    fn unknown_token_is_malformed() {
        let err = Grid::parse("2 2\nQ1 X\nL1 Z\n").unwrap_err();
        assert_eq!(
            err,
            NanduError::MalformedGrid {
                line: 3,
                message: "unknown token `Z`".to_string()
            }
        );
    }

    #[test]
    fn sources_and_sinks_follow_row_major_first_appearance() {
        let grid = Grid::parse("3 3\nQ2 Q1 Q2\nB B X\nL2 L1 L2\n").unwrap();
        assert_eq!(grid.sources(), &["Q2".to_string(), "Q1".to_string()]);
        let sinks: Vec<(&str, usize, usize)> = grid
            .sinks()
            .iter()
            .map(|s| (s.label.as_str(), s.column, s.row))
            .collect();
        assert_eq!(sinks, vec![("L2", 0, 2), ("L1", 1, 2)]);
    }

    #[test]
    fn display_renders_canonical_text() {
        let grid = Grid::parse("3   2\nQ1  Q2\nW W\nL1 X").unwrap();
        assert_eq!(grid.to_string(), NAND_PAIR);
        assert_eq!(Grid::parse(&grid.to_string()).unwrap(), grid);
    }

    #[test]
    fn from_rows_matches_parse() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Source("Q1".into()), Cell::Source("Q2".into())],
            vec![Cell::Nand, Cell::Nand],
            vec![Cell::Sink("L1".into()), Cell::Empty],
        ])
        .unwrap();
        assert_eq!(grid, Grid::parse(NAND_PAIR).unwrap());
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = Grid::from_rows(vec![vec![Cell::Empty, Cell::Empty], vec![Cell::Empty]])
            .unwrap_err();
        assert!(matches!(err, NanduError::MalformedGrid { line: 3, .. }));
    }

    #[test]
    fn from_rows_rejects_rows_without_cells() {
        let err = Grid::from_rows(vec![vec![], vec![]]).unwrap_err();
        assert!(matches!(err, NanduError::MalformedGrid { line: 2, .. }));

        let empty = Grid::from_rows(Vec::new()).unwrap();
        assert_eq!(empty.to_string(), "0 0\n");
        assert_eq!(Grid::parse(&empty.to_string()).unwrap(), empty);
    }

    #[test]
    fn rows_are_addressable_one_at_a_time() {
        let grid = Grid::parse(NAND_PAIR).unwrap();
        assert_eq!(grid.row(1), Some(&[Cell::Nand, Cell::Nand][..]));
        assert_eq!(grid.row(3), None);
        assert_eq!(grid.rows().count(), 3);
    }

    #[test]
    fn repeated_sink_in_one_row_is_declared_at_its_leftmost_cell() {
        let grid = Grid::parse("3 2\nQ1 Q2\nW W\nL1 L1\n").unwrap();
        assert_eq!(
            grid.sinks(),
            &[SinkPosition {
                label: "L1".to_string(),
                column: 0,
                row: 2,
            }]
        );
    }

    #[test]
    fn signed_lookup_rejects_negative_coordinates() {
        let grid = Grid::parse(NAND_PAIR).unwrap();
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(0, -1), None);
        assert_eq!(grid.get(1, 1), Some(&Cell::Nand));
    }

    #[test]
    fn flipping_inverter_swaps_halves_and_is_an_involution() {
        let grid = Grid::parse("3 2\nQ1 Q2\nR r\nL1 L2\n").unwrap();
        let flipped = grid.with_inverter_flipped(1, 1).unwrap();
        assert_eq!(flipped.cell(0, 1), Some(&Cell::Crossover));
        assert_eq!(flipped.cell(1, 1), Some(&Cell::Inverter));
        assert_eq!(flipped.with_inverter_flipped(0, 1).unwrap(), grid);
    }

    #[test]
    fn flipping_non_inverter_fails() {
        let grid = Grid::parse(NAND_PAIR).unwrap();
        assert_eq!(
            grid.with_inverter_flipped(0, 1),
            Err(NanduError::NotAnInverter { column: 0, row: 1 })
        );
        assert_eq!(
            grid.with_inverter_flipped(9, 9),
            Err(NanduError::NotAnInverter { column: 9, row: 9 })
        );

        let doubled = Grid::parse("3 2\nQ1 Q2\nR R\nL1 L2\n").unwrap();
        assert!(doubled.with_inverter_flipped(0, 1).is_err());
    }

    #[test]
    fn digest_ignores_formatting_differences() {
        let a = Grid::parse(NAND_PAIR).unwrap();
        let b = Grid::parse("3 2\n  Q1   Q2\nW\tW\n\nL1 X\n").unwrap();
        assert_eq!(a.digest(), b.digest());
        let c = Grid::parse("3 2\nQ1 Q2\nB B\nL1 X\n").unwrap();
        assert_ne!(a.digest(), c.digest());
    }
}

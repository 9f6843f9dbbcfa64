//! Network resolution over a grid.
//!
//! The network is never materialised: a cell's value is computed by walking
//! its read edges back up the board. Every edge either moves one row up or,
//! for the blind half of a red block, moves sideways to the sensing half,
//! whose own edge moves up. Resolution therefore terminates within about two
//! hops per row on any well-formed grid. Resolution runs on an explicit work
//! stack, so board height is bounded by memory rather than the thread stack.
//! A cell that ends up depending on itself is reported as
//! [`NanduError::CyclicNetwork`].
//!
//! Source states are passed explicitly. Nothing here mutates the grid or
//! holds state between calls, so independent assignments may be resolved
//! from different threads against one shared [`Grid`].

use crate::error::NanduError;
use crate::grid::{Cell, Grid};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Boolean state of every declared source, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStates {
    labels: Vec<String>,
    values: Vec<bool>,
}

impl SourceStates {
    /// All sources of `grid`, switched off.
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            labels: grid.sources().to_vec(),
            values: vec![false; grid.sources().len()],
        }
    }

    /// The assignment numbered `index`: source `j` is on iff bit `j` is set.
    pub fn from_index(grid: &Grid, index: u64) -> Self {
        let mut states = Self::for_grid(grid);
        states.load_index(index);
        states
    }

    /// Start from all-off and apply `(label, value)` pairs.
    pub fn from_pairs<'a>(
        grid: &Grid,
        pairs: impl IntoIterator<Item = (&'a str, bool)>,
    ) -> Result<Self, NanduError> {
        let mut states = Self::for_grid(grid);
        for (label, value) in pairs {
            states.set(label, value)?;
        }
        Ok(states)
    }

    /// Overwrite every value from the bits of `index`.
    pub fn load_index(&mut self, index: u64) {
        for (bit, value) in self.values.iter_mut().enumerate() {
            *value = (index >> bit) & 1 == 1;
        }
    }

    pub fn set(&mut self, label: &str, value: bool) -> Result<(), NanduError> {
        let slot = self.position(label)?;
        self.values[slot] = value;
        Ok(())
    }

    /// Flip one source and return its new state.
    pub fn toggle(&mut self, label: &str) -> Result<bool, NanduError> {
        let slot = self.position(label)?;
        self.values[slot] = !self.values[slot];
        Ok(self.values[slot])
    }

    pub fn get(&self, label: &str) -> Option<bool> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|slot| self.values[slot])
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    fn position(&self, label: &str) -> Result<usize, NanduError> {
        self.labels
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| NanduError::UnknownSource(label.to_string()))
    }
}

impl Serialize for SourceStates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.labels.len()))?;
        for (label, value) in self.iter() {
            map.serialize_entry(label, &value)?;
        }
        map.end()
    }
}

/// Sink values from one evaluation, in sink declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readings {
    entries: Vec<(String, bool)>,
}

impl Readings {
    pub fn get(&self, label: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(label, value)| (label.as_str(), *value))
    }

    pub fn values(&self) -> Vec<bool> {
        self.entries.iter().map(|(_, value)| *value).collect()
    }
}

impl Serialize for Readings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, value) in &self.entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// The other column of `column`'s pairing group in `row`.
///
/// Columns pair up left to right among non-empty cells; an `X` restarts the
/// count. Computed fresh on every call.
pub fn paired_column(grid: &Grid, column: isize, row: isize) -> isize {
    let mut odd = false;
    for x in 0..column.max(0) {
        match grid.get(x, row) {
            Some(Cell::Empty) | None => odd = false,
            Some(_) => odd = !odd,
        }
    }
    if odd { column - 1 } else { column + 1 }
}

/// Value of the cell at `(column, row)` under `states`.
///
/// Coordinates outside the board, including the row above the top, read as
/// `false`.
pub fn resolve(
    grid: &Grid,
    states: &SourceStates,
    column: isize,
    row: isize,
) -> Result<bool, NanduError> {
    let mut memo = vec![Slot::Unvisited; grid.width() * grid.height()];
    Resolver::new(grid, states, &mut memo).value(column, row)
}

/// Read every declared sink under `states`.
///
/// Fails with [`NanduError::UnknownSource`] if `states` was built for a
/// different grid.
pub fn evaluate(grid: &Grid, states: &SourceStates) -> Result<Readings, NanduError> {
    Evaluation::new(grid, states)?.readings()
}

/// One evaluation pass with a per-cell memo.
///
/// The memo is only valid for the assignment the pass was created with;
/// build a new pass when source states change.
pub struct Evaluation<'a> {
    grid: &'a Grid,
    states: &'a SourceStates,
    memo: Vec<Slot>,
}

impl<'a> Evaluation<'a> {
    pub fn new(grid: &'a Grid, states: &'a SourceStates) -> Result<Self, NanduError> {
        if let Some(stray) = states
            .labels()
            .iter()
            .find(|label| !grid.sources().contains(label))
        {
            return Err(NanduError::UnknownSource(stray.clone()));
        }
        Ok(Self {
            grid,
            states,
            memo: vec![Slot::Unvisited; grid.width() * grid.height()],
        })
    }

    pub fn resolve(&mut self, column: isize, row: isize) -> Result<bool, NanduError> {
        Resolver::new(self.grid, self.states, &mut self.memo).value(column, row)
    }

    pub fn readings(mut self) -> Result<Readings, NanduError> {
        let grid = self.grid;
        let mut entries = Vec::with_capacity(grid.sinks().len());
        for sink in grid.sinks() {
            let value = self.resolve(sink.column as isize, sink.row as isize - 1)?;
            entries.push((sink.label.clone(), value));
        }
        Ok(Readings { entries })
    }
}

/// Resolution state of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Unvisited,
    /// On the work stack, waiting for its inputs.
    Active,
    Done(bool),
}

enum Step {
    Ready(bool),
    Needs(isize, isize),
}

/// Depth-first resolution on an explicit work stack.
///
/// A cell stays [`Slot::Active`] while any of its inputs is pending, so
/// reaching an active cell again means the cell depends on itself.
struct Resolver<'a, 'm> {
    grid: &'a Grid,
    states: &'a SourceStates,
    memo: &'m mut [Slot],
}

impl<'a, 'm> Resolver<'a, 'm> {
    fn new(grid: &'a Grid, states: &'a SourceStates, memo: &'m mut [Slot]) -> Self {
        Self { grid, states, memo }
    }

    fn slot(&self, column: isize, row: isize) -> Option<usize> {
        self.grid.get(column, row)?;
        Some(row as usize * self.grid.width() + column as usize)
    }

    fn value(&mut self, column: isize, row: isize) -> Result<bool, NanduError> {
        let Some(slot) = self.slot(column, row) else {
            return Ok(false);
        };
        if let Slot::Done(known) = self.memo[slot] {
            return Ok(known);
        }

        let mut pending = vec![(column, row)];
        let result = self.drain(&mut pending);
        if result.is_err() {
            // Leave the memo reusable: only finished cells keep their mark.
            for (column, row) in pending {
                if let Some(slot) = self.slot(column, row)
                    && self.memo[slot] == Slot::Active
                {
                    self.memo[slot] = Slot::Unvisited;
                }
            }
        }
        result
    }

    /// Work `pending` down to empty and return the value of its first cell.
    fn drain(&mut self, pending: &mut Vec<(isize, isize)>) -> Result<bool, NanduError> {
        let mut last = false;
        while let Some(&(column, row)) = pending.last() {
            let slot = row as usize * self.grid.width() + column as usize;
            self.memo[slot] = Slot::Active;
            match self.step(column, row)? {
                Step::Ready(value) => {
                    self.memo[slot] = Slot::Done(value);
                    pending.pop();
                    last = value;
                }
                Step::Needs(column, row) => pending.push((column, row)),
            }
        }
        Ok(last)
    }

    /// Known value of an input cell, `None` if it still has to be resolved.
    fn input(&self, column: isize, row: isize) -> Result<Option<bool>, NanduError> {
        let Some(slot) = self.slot(column, row) else {
            return Ok(Some(false));
        };
        match self.memo[slot] {
            Slot::Done(value) => Ok(Some(value)),
            Slot::Unvisited => Ok(None),
            Slot::Active => Err(NanduError::CyclicNetwork {
                column: column as usize,
                row: row as usize,
            }),
        }
    }

    /// Compute the cell at `(column, row)`, which must be on the board, or
    /// name the first input that is not known yet.
    fn step(&self, column: isize, row: isize) -> Result<Step, NanduError> {
        let grid = self.grid;
        let Some(cell) = grid.get(column, row) else {
            return Ok(Step::Ready(false));
        };
        let above = |value: fn(bool) -> bool| -> Result<Step, NanduError> {
            Ok(match self.input(column, row - 1)? {
                Some(known) => Step::Ready(value(known)),
                None => Step::Needs(column, row - 1),
            })
        };

        match cell {
            Cell::Empty => Ok(Step::Ready(false)),
            Cell::Source(label) => self
                .states
                .get(label)
                .map(Step::Ready)
                .ok_or_else(|| NanduError::UnknownSource(label.clone())),
            Cell::Sink(_) | Cell::Buffer => above(|v| v),
            Cell::Inverter => above(|v| !v),
            Cell::Nand => {
                let paired = paired_column(grid, column, row);
                Ok(
                    match (self.input(column, row - 1)?, self.input(paired, row - 1)?) {
                        (Some(own), Some(other)) => Step::Ready(!(own && other)),
                        (None, _) => Step::Needs(column, row - 1),
                        (_, None) => Step::Needs(paired, row - 1),
                    },
                )
            }
            Cell::Crossover => {
                let paired = paired_column(grid, column, row);
                Ok(match self.input(paired, row)? {
                    Some(known) => Step::Ready(known),
                    None => Step::Needs(paired, row),
                })
            }
        }
    }
}

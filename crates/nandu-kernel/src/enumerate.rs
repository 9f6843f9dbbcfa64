//! Exhaustive enumeration of source assignments.
//!
//! Assignment `i` switches source `S[j]` on exactly when bit `j` of `i` is
//! set, with `S[0]` the first declared source. Rows are produced for
//! `i = 0 .. 2^N` in ascending order whether the range is walked on one
//! thread or split across several.

use crate::error::NanduError;
use crate::grid::Grid;
use crate::network::{Evaluation, SourceStates};
use serde::Serialize;
use std::ops::Range;
use std::thread;

/// Assignments are numbered by `u64`, so at most this many sources fit.
pub const MAX_INDEX_BITS: usize = 63;

/// Source limit applied unless the caller picks another one.
pub const DEFAULT_MAX_SOURCES: usize = 20;

/// One row of the truth table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthRow {
    pub index: u64,
    /// Source states, in source declaration order.
    pub assignment: Vec<bool>,
    /// Sink states, in sink declaration order.
    pub readings: Vec<bool>,
}

/// All assignments of a grid's sources with the resulting sink states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruthTable {
    sources: Vec<String>,
    sinks: Vec<String>,
    rows: Vec<TruthRow>,
}

impl TruthTable {
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn sinks(&self) -> &[String] {
        &self.sinks
    }

    pub fn rows(&self) -> &[TruthRow] {
        &self.rows
    }

    /// Column labels: sources, then sinks.
    pub fn header(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .chain(self.sinks.iter())
            .map(String::as_str)
    }
}

/// Knobs for an enumeration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerateOptions {
    /// Refuse grids with more sources than this. Defaults to
    /// [`DEFAULT_MAX_SOURCES`]; `None` leaves only the hard
    /// [`MAX_INDEX_BITS`] cap.
    pub max_sources: Option<usize>,
    /// Number of threads the index range is split across.
    pub workers: usize,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            max_sources: Some(DEFAULT_MAX_SOURCES),
            workers: 1,
        }
    }
}

/// Enumerate every assignment of `grid` on the calling thread.
pub fn enumerate_all(grid: &Grid) -> Result<TruthTable, NanduError> {
    Enumerator::new(grid).run()
}

pub struct Enumerator<'a> {
    grid: &'a Grid,
    options: EnumerateOptions,
}

impl<'a> Enumerator<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self::with_options(grid, EnumerateOptions::default())
    }

    pub fn with_options(grid: &'a Grid, options: EnumerateOptions) -> Self {
        Self { grid, options }
    }

    /// Number of assignments this grid has, after checking the source limit.
    pub fn assignment_count(&self) -> Result<u64, NanduError> {
        let count = self.grid.sources().len();
        let limit = self
            .options
            .max_sources
            .map_or(MAX_INDEX_BITS, |max| max.min(MAX_INDEX_BITS));
        if count > limit {
            return Err(NanduError::TooManySources { count, limit });
        }
        Ok(1u64 << count)
    }

    pub fn run(&self) -> Result<TruthTable, NanduError> {
        let total = self.assignment_count()?;
        let workers = (self.options.workers.max(1) as u64).min(total);
        log::debug!(
            "enumerating {total} assignments of {} sources on {workers} worker(s)",
            self.grid.sources().len()
        );

        let rows = if workers <= 1 {
            self.run_range(0..total)?
        } else {
            self.run_parallel(total, workers)?
        };

        Ok(TruthTable {
            sources: self.grid.sources().to_vec(),
            sinks: self.grid.sinks().iter().map(|s| s.label.clone()).collect(),
            rows,
        })
    }

    fn run_parallel(&self, total: u64, workers: u64) -> Result<Vec<TruthRow>, NanduError> {
        let chunk = total.div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let start = (worker * chunk).min(total);
                    let end = (start + chunk).min(total);
                    scope.spawn(move || self.run_range(start..end))
                })
                .collect();

            let mut rows = Vec::with_capacity(total as usize);
            for handle in handles {
                let chunk_rows = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
                rows.extend(chunk_rows);
            }
            Ok(rows)
        })
    }

    fn run_range(&self, range: Range<u64>) -> Result<Vec<TruthRow>, NanduError> {
        let mut rows = Vec::with_capacity((range.end - range.start) as usize);
        let mut states = SourceStates::for_grid(self.grid);
        let first = range.start;
        for index in range {
            states.load_index(index);
            let readings = Evaluation::new(self.grid, &states)?.readings()?;
            rows.push(TruthRow {
                index,
                assignment: states.values().to_vec(),
                readings: readings.values(),
            });
        }
        log::debug!("evaluated assignments {first}..{}", first + rows.len() as u64);
        Ok(rows)
    }
}

//! # Nandu Kernel
//!
//! Combinational evaluation of light-gate grids: a board of sources, sinks,
//! and two-cell NAND, buffer, and inverter blocks, wired purely by position.
//! Light enters at the sources and travels down the board; each sink reports
//! whether light reaches it.
//!
//! The kernel is pure. It takes a grid description and source states and
//! returns sink states; reading files and printing tables is left to callers.
//!
//! ## Architecture
//!
//! ```text
//! Grid                  ← Parsed board, row-major, immutable
//!     │
//! paired_column         ← Which column a cell shares its block with
//!     │
//! resolve / evaluate    ← Walk read edges upward under SourceStates
//!     │
//! Enumerator            ← All 2^N assignments, optionally across threads
//!     │
//! TruthTable            ← Rows of (assignment, readings), rendered Ein/Aus
//! ```

pub mod digest;
pub mod enumerate;
pub mod error;
pub mod grid;
pub mod lint;
pub mod network;
pub mod table;

pub use digest::GridDigest;
pub use enumerate::{
    DEFAULT_MAX_SOURCES, EnumerateOptions, Enumerator, TruthRow, TruthTable, enumerate_all,
};
pub use error::{NanduError, Severity};
pub use grid::{Cell, Grid, SinkPosition};
pub use lint::{Diagnostic, LintRule, has_errors, lint};
pub use network::{Evaluation, Readings, SourceStates, evaluate, paired_column, resolve};
pub use table::TableFormat;

//! Error types for Nandu kernel operations.

/// Errors arising from malformed grids or invalid evaluation requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NanduError {
    /// The grid description does not match its declared shape or token grammar.
    #[error("malformed grid (line {line}): {message}")]
    MalformedGrid { line: usize, message: String },

    /// An assignment names a source the grid never declares, or a grid source
    /// has no binding in the assignment it was evaluated with.
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// The value of the cell at `(column, row)` depends on itself.
    #[error("cyclic network: column {column}, row {row} depends on itself")]
    CyclicNetwork { column: usize, row: usize },

    /// The addressed cell is not one half of a red (inverter) block.
    #[error("no inverter block at column {column}, row {row}")]
    NotAnInverter { column: usize, row: usize },

    /// Enumeration was asked for more sources than the configured limit allows.
    #[error("too many sources: {count} exceeds the enumeration limit of {limit}")]
    TooManySources { count: usize, limit: usize },
}

impl NanduError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedGrid {
            line,
            message: message.into(),
        }
    }
}

/// Severity of a lint diagnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

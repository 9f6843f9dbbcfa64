//! Tab-separated truth-table text.
//!
//! The batch format: a header of source labels followed by sink labels, then
//! one line per assignment with each state written as `Ein` (on) or `Aus`
//! (off). Every line, the last included, ends in `\n`.

use crate::enumerate::TruthTable;

pub const ON: &str = "Ein";
pub const OFF: &str = "Aus";

/// The two literal tokens a boolean is written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFormat {
    pub on: String,
    pub off: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            on: ON.to_string(),
            off: OFF.to_string(),
        }
    }
}

impl TableFormat {
    pub fn token(&self, value: bool) -> &str {
        if value { &self.on } else { &self.off }
    }

    pub fn render(&self, table: &TruthTable) -> String {
        let mut out = String::new();
        let header: Vec<&str> = table.header().collect();
        out.push_str(&header.join("\t"));
        out.push('\n');
        for row in table.rows() {
            let tokens: Vec<&str> = row
                .assignment
                .iter()
                .chain(row.readings.iter())
                .map(|value| self.token(*value))
                .collect();
            out.push_str(&tokens.join("\t"));
            out.push('\n');
        }
        out
    }
}

impl TruthTable {
    /// Render with the default `Ein`/`Aus` tokens.
    pub fn render(&self) -> String {
        TableFormat::default().render(self)
    }
}

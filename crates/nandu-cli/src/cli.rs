use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nandu",
    about = "Nandu: evaluate light-gate grids and print their truth tables",
    version
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./nandu.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enumerate every source assignment and print the Ein/Aus truth table
    Table {
        /// Grid description file, or `-` for stdin
        #[arg(default_value = "-")]
        grid: String,

        /// Threads to split the assignment range across
        #[arg(long)]
        workers: Option<usize>,

        /// Refuse grids with more sources than this
        #[arg(long)]
        max_sources: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate one assignment and print every sink
    Eval {
        /// Grid description file, or `-` for stdin
        grid: String,

        /// Source to switch on (repeatable); all others are off
        #[arg(long = "on")]
        on: Vec<String>,

        /// Red block to flip before evaluating, as `column,row` (repeatable)
        #[arg(long = "flip")]
        flips: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarise a grid: shape, digest, sources, sinks, and blocks
    Inspect {
        /// Grid description file, or `-` for stdin
        grid: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report structural problems (unpaired blocks, unused sources, ...)
    Lint {
        /// Grid description file, or `-` for stdin
        grid: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

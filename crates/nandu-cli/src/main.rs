//! Nandu CLI: the `nandu` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Table {
            grid,
            workers,
            max_sources,
            json,
        } => commands::table::run(
            commands::table::Args {
                grid,
                workers,
                max_sources,
                json,
            },
            &config,
        ),

        Commands::Eval {
            grid,
            on,
            flips,
            json,
        } => commands::eval::run(
            commands::eval::Args {
                grid,
                on,
                flips,
                json,
            },
            &config,
        ),

        Commands::Inspect { grid, json } => commands::inspect::run(grid, json),

        Commands::Lint { grid, json } => commands::lint::run(grid, json),
    }
}

use crate::config::Config;
use crate::support::{load_grid_or_exit, print_json, write_stdout_or_exit};
use nandu_kernel::{EnumerateOptions, Enumerator};
use serde_json::json;

pub struct Args {
    pub grid: String,
    pub workers: Option<usize>,
    pub max_sources: Option<usize>,
    pub json: bool,
}

pub fn run(args: Args, config: &Config) {
    let grid = load_grid_or_exit(&args.grid);
    let options = EnumerateOptions {
        max_sources: Some(args.max_sources.unwrap_or(config.enumerate.max_sources)),
        workers: args.workers.unwrap_or(config.enumerate.workers),
    };

    // Nothing is printed until the whole table is built, so a failure never
    // leaves a partial table on stdout.
    let table = Enumerator::with_options(&grid, options)
        .run()
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });

    if args.json {
        print_json(&json!({
            "gridDigest": grid.digest(),
            "sources": table.sources(),
            "sinks": table.sinks(),
            "rows": table.rows(),
        }));
    } else {
        write_stdout_or_exit(&config.table.format().render(&table));
    }
}

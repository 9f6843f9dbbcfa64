use crate::config::Config;
use crate::support::{load_grid_or_exit, parse_cell_ref, print_json};
use nandu_kernel::{SourceStates, evaluate};
use serde_json::json;

pub struct Args {
    pub grid: String,
    pub on: Vec<String>,
    pub flips: Vec<String>,
    pub json: bool,
}

pub fn run(args: Args, config: &Config) {
    let mut grid = load_grid_or_exit(&args.grid);

    for flip in &args.flips {
        let (column, row) = parse_cell_ref(flip).unwrap_or_else(|e| {
            eprintln!("error: --flip: {e}");
            std::process::exit(1);
        });
        grid = grid.with_inverter_flipped(column, row).unwrap_or_else(|e| {
            eprintln!("error: --flip {flip}: {e}");
            std::process::exit(1);
        });
    }

    let states =
        SourceStates::from_pairs(&grid, args.on.iter().map(|label| (label.as_str(), true)))
            .unwrap_or_else(|e| {
                eprintln!("error: --on: {e}");
                std::process::exit(1);
            });
    let readings = evaluate(&grid, &states).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if args.json {
        print_json(&json!({
            "gridDigest": grid.digest(),
            "sources": states,
            "sinks": readings,
        }));
    } else {
        let format = config.table.format();
        for (label, value) in readings.iter() {
            println!("{label}\t{}", format.token(value));
        }
    }
}

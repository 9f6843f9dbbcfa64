use crate::support::{input_label, load_grid_or_exit, print_json, yes_no};
use nandu_kernel::{has_errors, lint};
use serde_json::json;

pub fn run(grid_arg: String, json_output: bool) {
    let grid = load_grid_or_exit(&grid_arg);
    let diagnostics = lint(&grid);
    let failed = has_errors(&diagnostics);

    if json_output {
        print_json(&json!({
            "source": input_label(&grid_arg),
            "gridDigest": grid.digest(),
            "clean": !failed,
            "diagnostics": diagnostics,
        }));
    } else {
        println!("nandu lint {}", input_label(&grid_arg));
        println!("  Clean: {}", yes_no(!failed));
        println!("  Diagnostics: {}", diagnostics.len());
        for d in &diagnostics {
            println!(
                "    - [{}] {} at ({}, {}): {}",
                d.severity,
                d.rule.as_str(),
                d.column,
                d.row,
                d.description
            );
        }
    }

    if failed {
        std::process::exit(1);
    }
}

use crate::support::{input_label, load_grid_or_exit, print_json};
use nandu_kernel::{Cell, Grid};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockCensus {
    buffer_cells: usize,
    nand_cells: usize,
    inverter_cells: usize,
    crossover_cells: usize,
    empty_cells: usize,
}

fn census(grid: &Grid) -> BlockCensus {
    let mut census = BlockCensus::default();
    for (_, _, cell) in grid.positions() {
        match cell {
            Cell::Buffer => census.buffer_cells += 1,
            Cell::Nand => census.nand_cells += 1,
            Cell::Inverter => census.inverter_cells += 1,
            Cell::Crossover => census.crossover_cells += 1,
            Cell::Empty => census.empty_cells += 1,
            Cell::Source(_) | Cell::Sink(_) => {}
        }
    }
    census
}

pub fn run(grid_arg: String, json_output: bool) {
    let grid = load_grid_or_exit(&grid_arg);
    let census = census(&grid);
    let sinks: Vec<&str> = grid.sinks().iter().map(|s| s.label.as_str()).collect();

    if json_output {
        print_json(&serde_json::json!({
            "source": input_label(&grid_arg),
            "rows": grid.height(),
            "columns": grid.width(),
            "gridDigest": grid.digest(),
            "sources": grid.sources(),
            "sinks": grid.sinks(),
            "census": census,
        }));
    } else {
        println!("nandu inspect {}", input_label(&grid_arg));
        println!("  Shape: {} rows x {} columns", grid.height(), grid.width());
        println!("  Digest: {}", grid.digest().short(16));
        println!(
            "  Sources ({}): {}",
            grid.sources().len(),
            grid.sources().join(" ")
        );
        println!("  Sinks ({}): {}", sinks.len(), sinks.join(" "));
        println!(
            "  Cells: {} B, {} W, {} R, {} r, {} X",
            census.buffer_cells,
            census.nand_cells,
            census.inverter_cells,
            census.crossover_cells,
            census.empty_cells
        );
    }
}

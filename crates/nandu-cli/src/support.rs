use crate::config::Config;
use nandu_kernel::Grid;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};

pub const STDIN_ARG: &str = "-";

pub fn load_config_or_exit(path: Option<&str>) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Read a grid description from a file, or from stdin for `-`.
pub fn load_grid_or_exit(grid_arg: &str) -> Grid {
    let text = read_input_or_exit(grid_arg);
    Grid::parse(&text).unwrap_or_else(|e| {
        eprintln!("error: {}: {e}", input_label(grid_arg));
        std::process::exit(1);
    })
}

fn read_input_or_exit(grid_arg: &str) -> String {
    let result = if grid_arg == STDIN_ARG {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(grid_arg)
    };
    result.unwrap_or_else(|e| {
        eprintln!("error: failed to read {}: {e}", input_label(grid_arg));
        std::process::exit(1);
    })
}

pub fn input_label(grid_arg: &str) -> &str {
    if grid_arg == STDIN_ARG {
        "<stdin>"
    } else {
        grid_arg
    }
}

/// Parse a `column,row` cell reference.
pub fn parse_cell_ref(text: &str) -> Result<(usize, usize), String> {
    let (column, row) = text
        .split_once(',')
        .ok_or_else(|| format!("expected `column,row`, got `{text}`"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|_| format!("invalid column in `{text}`"))?;
    let row = row
        .trim()
        .parse()
        .map_err(|_| format!("invalid row in `{text}`"))?;
    Ok((column, row))
}

fn render_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn print_json<T: Serialize>(value: &T) {
    let rendered = render_json(value).unwrap_or_else(|err| {
        eprintln!("error: failed to render json output: {err}");
        std::process::exit(1);
    });
    println!("{rendered}");
}

/// Write pre-rendered text to stdout in one go.
pub fn write_stdout_or_exit(text: &str) {
    let mut out = io::stdout().lock();
    if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
        eprintln!("error: failed to write output: {e}");
        std::process::exit(1);
    }
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}

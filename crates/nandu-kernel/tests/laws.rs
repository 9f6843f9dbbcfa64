//! Property-based tests for the evaluation laws.
//!
//! Random boards are built in layers: a row of sources, any number of rows of
//! well-formed two-cell blocks, and a row of sinks, one per column.

use nandu_kernel::{
    Cell, EnumerateOptions, Enumerator, Evaluation, Grid, SourceStates, enumerate_all, evaluate,
    resolve,
};
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn block() -> impl Strategy<Value = [&'static str; 2]> {
    prop_oneof![
        Just(["B", "B"]),
        Just(["W", "W"]),
        Just(["R", "r"]),
        Just(["r", "R"]),
    ]
}

fn build(blocks: usize, layers: &[Vec<[&str; 2]>]) -> Grid {
    let width = blocks * 2;
    let mut text = format!("{} {width}\n", layers.len() + 2);
    let sources: Vec<String> = (1..=width).map(|i| format!("Q{i}")).collect();
    text.push_str(&sources.join(" "));
    text.push('\n');
    for layer in layers {
        let tokens: Vec<&str> = layer.iter().flatten().copied().collect();
        text.push_str(&tokens.join(" "));
        text.push('\n');
    }
    let sinks: Vec<String> = (1..=width).map(|i| format!("L{i}")).collect();
    text.push_str(&sinks.join(" "));
    text.push('\n');
    Grid::parse(&text).expect("generated grid should parse")
}

fn layered_grid() -> impl Strategy<Value = Grid> {
    (1usize..=3, 0usize..=4).prop_flat_map(|(blocks, layers)| {
        prop::collection::vec(prop::collection::vec(block(), blocks), layers)
            .prop_map(move |rows| build(blocks, &rows))
    })
}

/// Single-column chain: `Q1` on top, `layers` copies of `block`, `L1` at the bottom.
fn chain(block: &str, layers: usize) -> Grid {
    let mut text = format!("{} 2\nQ1 X\n", layers + 2);
    for _ in 0..layers {
        text.push_str(block);
        text.push('\n');
    }
    text.push_str("L1 X\n");
    Grid::parse(&text).unwrap()
}

fn read_l1(grid: &Grid, q1: bool) -> bool {
    let states = SourceStates::from_pairs(grid, [("Q1", q1)]).unwrap();
    evaluate(grid, &states).unwrap().get("L1").unwrap()
}

// ============================================================================
// Enumeration
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn enumeration_covers_every_assignment_once(grid in layered_grid()) {
        let table = enumerate_all(&grid).unwrap();
        let n = grid.sources().len();
        prop_assert_eq!(table.rows().len(), 1usize << n);
        for (i, row) in table.rows().iter().enumerate() {
            prop_assert_eq!(row.index, i as u64);
            let expected: Vec<bool> = (0..n).map(|bit| (i >> bit) & 1 == 1).collect();
            prop_assert_eq!(&row.assignment, &expected);
            prop_assert_eq!(row.readings.len(), grid.sinks().len());
        }
    }

    #[test]
    fn parallel_enumeration_is_identical(grid in layered_grid(), workers in 2usize..8) {
        let sequential = enumerate_all(&grid).unwrap();
        let parallel = Enumerator::with_options(
            &grid,
            EnumerateOptions { max_sources: None, workers },
        )
        .run()
        .unwrap();
        prop_assert_eq!(parallel, sequential);
    }

    #[test]
    fn resolve_is_deterministic(grid in layered_grid(), index in any::<u64>()) {
        let states = SourceStates::from_index(&grid, index);
        for (column, row, _) in grid.positions() {
            let (column, row) = (column as isize, row as isize);
            let first = resolve(&grid, &states, column, row).unwrap();
            let second = resolve(&grid, &states, column, row).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn memoised_pass_matches_plain_resolution(grid in layered_grid(), index in any::<u64>()) {
        let states = SourceStates::from_index(&grid, index);
        let mut pass = Evaluation::new(&grid, &states).unwrap();
        for (column, row, _) in grid.positions() {
            let (column, row) = (column as isize, row as isize);
            prop_assert_eq!(
                pass.resolve(column, row).unwrap(),
                resolve(&grid, &states, column, row).unwrap()
            );
        }
    }

    // ========================================================================
    // Grid text and editor operations
    // ========================================================================

    #[test]
    fn rendering_round_trips(grid in layered_grid()) {
        let reparsed = Grid::parse(&grid.to_string()).unwrap();
        prop_assert_eq!(reparsed, grid);
    }

    #[test]
    fn flipping_an_inverter_twice_restores_the_grid(grid in layered_grid()) {
        let halves: Vec<(usize, usize)> = grid
            .positions()
            .filter(|(_, _, cell)| matches!(cell, Cell::Inverter | Cell::Crossover))
            .map(|(column, row, _)| (column, row))
            .collect();
        for (column, row) in halves {
            let once = grid.with_inverter_flipped(column, row).unwrap();
            prop_assert_ne!(&once, &grid);
            let twice = once.with_inverter_flipped(column, row).unwrap();
            prop_assert_eq!(&twice, &grid);
        }
    }

    // ========================================================================
    // Gate laws
    // ========================================================================

    #[test]
    fn buffers_pass_values_through(layers in 0usize..10, q1 in any::<bool>()) {
        prop_assert_eq!(read_l1(&chain("B B", layers), q1), q1);
    }

    #[test]
    fn inverters_negate_once_per_layer(layers in 0usize..10, q1 in any::<bool>()) {
        let expected = if layers % 2 == 0 { q1 } else { !q1 };
        prop_assert_eq!(read_l1(&chain("R r", layers), q1), expected);
    }

    #[test]
    fn double_inversion_is_identity(pairs in 1usize..5, q1 in any::<bool>()) {
        prop_assert_eq!(read_l1(&chain("R r", pairs * 2), q1), q1);
    }
}

#[test]
fn nand_completeness() {
    let grid = Grid::parse("3 2\nQ1 Q2\nW W\nL1 X\n").unwrap();
    let cases = [
        ((false, false), true),
        ((false, true), true),
        ((true, false), true),
        ((true, true), false),
    ];
    for ((q1, q2), expected) in cases {
        let states = SourceStates::from_pairs(&grid, [("Q1", q1), ("Q2", q2)]).unwrap();
        let readings = evaluate(&grid, &states).unwrap();
        assert_eq!(readings.get("L1"), Some(expected), "Q1={q1} Q2={q2}");
    }
}

#[test]
fn swapping_sources_and_sensor_side_is_symmetric() {
    let left = Grid::parse("3 2\nQ1 Q2\nR r\nL1 L2\n").unwrap();
    let right = Grid::parse("3 2\nQ2 Q1\nr R\nL1 L2\n").unwrap();
    for q1 in [false, true] {
        for q2 in [false, true] {
            let pairs = [("Q1", q1), ("Q2", q2)];
            let a = evaluate(&left, &SourceStates::from_pairs(&left, pairs).unwrap()).unwrap();
            let b = evaluate(&right, &SourceStates::from_pairs(&right, pairs).unwrap()).unwrap();
            assert_eq!(a, b, "Q1={q1} Q2={q2}");
        }
    }
}

#[test]
fn buffer_swap_changes_nothing_when_upstream_is_unchanged() {
    // A buffer layer between sources and sinks is invisible.
    let direct = Grid::parse("2 2\nQ1 Q2\nL1 L2\n").unwrap();
    let buffered = Grid::parse("3 2\nQ1 Q2\nB B\nL1 L2\n").unwrap();
    assert_eq!(
        enumerate_all(&direct).unwrap(),
        enumerate_all(&buffered).unwrap()
    );
}

use std::collections::BTreeSet;

use super::*;
use crate::cube::tests::{contains, cube};
use crate::primes::generate;

fn run(
    inputs: usize,
    outputs: usize,
    cubes: &[(&str, &str)],
    config: &MinimizeConfig,
) -> (CoveringGraph, Solution) {
    let layout = CubeLayout::new(inputs, outputs);
    let mut graph = CoveringGraph::new(layout);
    let ids = cubes
        .iter()
        .map(|(i, o)| graph.add_node(cube(&layout, i, o)))
        .collect();
    let primes = generate(&mut graph, ids, false).unwrap();
    let solution = solve(&mut graph, primes, config);
    (graph, solution)
}

fn render(graph: &CoveringGraph, ids: &[NodeId]) -> BTreeSet<String> {
    let layout = graph.layout();
    ids.iter()
        .map(|id| {
            let c = &graph[*id].cube;
            let inputs: String = (0..layout.inputs())
                .map(|v| match layout.input(c, v) {
                    Some(true) => '1',
                    Some(false) => '0',
                    None => '-',
                })
                .collect();
            let outputs: String = (0..layout.outputs())
                .map(|b| match layout.output(c, b) {
                    Some(true) => '1',
                    _ => '0',
                })
                .collect();
            format!("{} {}", inputs, outputs)
        })
        .collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const CYCLIC: [(&str, &str); 6] = [
    ("000", "1"),
    ("001", "1"),
    ("010", "1"),
    ("101", "1"),
    ("110", "1"),
    ("111", "1"),
];

#[test]
fn test_single_cube_solution() {
    let (graph, solution) = run(2, 1, &[("1-", "1"), ("0-", "1")], &MinimizeConfig::default());
    assert_eq!(render(&graph, &solution.retained), set(&["-- 1"]));
    assert_eq!(solution.essentials, solution.retained);
    assert_eq!(solution.stats.prime_implicants, 1);
    assert_eq!(solution.stats.essential_implicants, 1);
    assert_eq!(solution.stats.solution_size, 1);
    assert_eq!(solution.stats.input_literals, 0);
    assert_eq!(solution.stats.output_literals, 1);
    assert!(!solution.stats.heuristic);
}

#[test]
fn test_disjoint_cubes_both_essential() {
    let (graph, solution) = run(2, 1, &[("00", "1"), ("11", "1")], &MinimizeConfig::default());
    assert_eq!(render(&graph, &solution.retained), set(&["00 1", "11 1"]));
    assert_eq!(solution.stats.essential_implicants, 2);
    assert_eq!(solution.stats.input_literals, 4);
    assert_eq!(solution.stats.max_branching_depth, 0);
}

#[test]
fn test_overlapping_essentials() {
    let (graph, solution) = run(
        2,
        1,
        &[("00", "1"), ("01", "1"), ("11", "1")],
        &MinimizeConfig::default(),
    );
    assert_eq!(render(&graph, &solution.retained), set(&["0- 1", "-1 1"]));
    assert_eq!(solution.stats.essential_implicants, 2);
    for id in &solution.retained {
        let status = graph[*id].status();
        assert!(status.contains(Status::DECIDED_RETAINED | Status::PRIME_ESSENTIAL));
    }
}

#[test]
fn test_cyclic_cover_is_minimum() {
    let (graph, solution) = run(3, 1, &CYCLIC, &MinimizeConfig::default());
    assert_eq!(solution.stats.prime_implicants, 6);
    assert_eq!(solution.stats.essential_implicants, 0);
    assert!(solution.essentials.is_empty());
    assert_eq!(solution.stats.solution_size, 3);
    assert_eq!(solution.stats.max_branching_depth, 1);
    assert!(!solution.stats.heuristic);
    assert_eq!(
        render(&graph, &solution.retained),
        set(&["-01 1", "11- 1", "0-0 1"])
    );
}

#[test]
fn test_cyclic_cover_with_depth_limit() {
    let config = MinimizeConfig {
        branch_depth_limit: 0,
        ..MinimizeConfig::default()
    };
    let (graph, solution) = run(3, 1, &CYCLIC, &config);
    assert!(solution.stats.heuristic);
    assert_eq!(solution.stats.max_branching_depth, 0);
    assert!(solution.stats.solution_size >= 3);

    let layout = graph.layout();
    for minterm in [0b000, 0b100, 0b010, 0b101, 0b011, 0b111] {
        assert!(
            solution
                .retained
                .iter()
                .any(|id| contains(layout, &graph[*id].cube, minterm, 0)),
            "minterm {:03b} is not covered",
            minterm
        );
    }
}

#[test]
fn test_dont_care_is_used_but_not_printed() {
    let (graph, solution) = run(2, 1, &[("10", "1"), ("11", "d")], &MinimizeConfig::default());
    assert_eq!(render(&graph, &solution.retained), set(&["1- 1"]));
    assert_eq!(solution.stats.prime_implicants, 1);
    assert_eq!(solution.stats.essential_implicants, 1);

    let dont_care = graph
        .node_ids()
        .find(|id| graph[*id].status().contains(Status::DONT_CARE))
        .unwrap();
    assert!(graph[dont_care].status().contains(Status::DECIDED_RETAINED));
    assert!(!solution.retained.contains(&dont_care));
}

#[test]
fn test_outputs_made_sparse() {
    // f0 = a | b, f1 = a & b
    let (graph, solution) = run(
        2,
        2,
        &[("1-", "10"), ("-1", "10"), ("11", "01")],
        &MinimizeConfig::default(),
    );
    assert_eq!(
        render(&graph, &solution.retained),
        set(&["1- 10", "-1 10", "11 01"])
    );
    assert_eq!(solution.stats.output_literals, 3);
    assert_eq!(solution.stats.input_literals, 4);
}

#[test]
fn test_solving_is_repeatable() {
    let first = {
        let (graph, solution) = run(3, 1, &CYCLIC, &MinimizeConfig::default());
        render(&graph, &solution.retained)
    };
    let second = {
        let (graph, solution) = run(3, 1, &CYCLIC, &MinimizeConfig::default());
        render(&graph, &solution.retained)
    };
    assert_eq!(first, second);
}

#[test]
fn test_empty_function() {
    let (graph, solution) = run(2, 1, &[("00", "0")], &MinimizeConfig::default());
    assert!(graph.is_empty());
    assert!(solution.retained.is_empty());
    assert_eq!(solution.stats, MinimizeStats::default());
}

/// Solver over hand-built nodes, the first `retained` of them in the solution
fn solver_over(graph: &mut CoveringGraph, primes: Vec<NodeId>, retained: usize) -> Solver<'_> {
    let layout = *graph.layout();
    let count = primes.len();
    Solver {
        graph,
        layout,
        minimize_literals: false,
        depth_limit: MinimizeConfig::default().branch_depth_limit,
        primes,
        retained_end: retained,
        unretained_start: count,
        stack: Vec::new(),
        pass: 0,
        odd_pass: 1,
        undecided: 0,
        depth: 0,
        max_depth: 0,
        heuristic: false,
    }
}

#[test]
fn test_sparse_scan_crosses_covered_ancestor() {
    // `shared` reaches `other` only through `bridge`, a covered node whose own
    // uncovered part is empty. The walk must still go through it because the
    // bridge cube meets what is left of `shared`.
    let layout = CubeLayout::new(2, 2);
    let mut graph = CoveringGraph::new(layout);
    let shared = graph.add_node(cube(&layout, "11", "11"));
    let other = graph.add_node(cube(&layout, "-1", "01"));
    let bridge = graph.add_node(cube(&layout, "1-", "11"));
    graph.link(bridge, shared);
    graph.link(bridge, other);

    for id in [shared, other] {
        let node = &mut graph[id];
        node.status = Status::DECIDED_RETAINED;
        node.uncovered = CubeList::from_cube(&node.cube);
    }
    graph[bridge].status = Status::DECIDED_COVERED;
    graph[bridge].uncovered = CubeList::new(layout.words());

    let mut solver = solver_over(&mut graph, vec![shared, other, bridge], 2);
    solver.make_output_sparse();
    assert_eq!(solver.retained_end, 2);

    // The second output of `shared` is provided by `other`
    assert_eq!(render(&graph, &[shared]), set(&["11 10"]));
    assert_eq!(render(&graph, &[other]), set(&["-1 01"]));
}

#[test]
fn test_sparse_scan_skips_disjoint_ancestor() {
    let layout = CubeLayout::new(2, 2);
    let mut graph = CoveringGraph::new(layout);
    let shared = graph.add_node(cube(&layout, "11", "11"));
    let other = graph.add_node(cube(&layout, "-1", "01"));
    // Shares no output with `shared`, so nothing is subtracted through it
    let bridge = graph.add_node(cube(&layout, "1-", "00"));
    graph.link(bridge, shared);
    graph.link(bridge, other);

    for id in [shared, other] {
        let node = &mut graph[id];
        node.status = Status::DECIDED_RETAINED;
        node.uncovered = CubeList::from_cube(&node.cube);
    }
    graph[bridge].status = Status::DECIDED_COVERED;
    graph[bridge].uncovered = CubeList::new(layout.words());

    let mut solver = solver_over(&mut graph, vec![shared, other, bridge], 2);
    solver.make_output_sparse();
    assert_eq!(render(&graph, &[shared]), set(&["11 11"]));
}

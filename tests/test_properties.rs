//! Property tests for the cube algebra and for minimization as a whole
//!
//! Functions are small enough to be checked point by point: every pair of a
//! minterm and an output is one bit of a `u128`.

use mcboole_logic::cube::{CubeLayout, CubeList, Word};
use mcboole_logic::graph::{CoveringGraph, NodeId, Status};
use mcboole_logic::*;
use proptest::collection::vec;
use proptest::prelude::*;

type Cubes = Vec<(Vec<Option<bool>>, Vec<Option<bool>>)>;

fn literal() -> impl Strategy<Value = Option<bool>> {
    prop_oneof![Just(Some(false)), Just(Some(true)), Just(None)]
}

/// Output literal, `None` being don't care
fn output() -> impl Strategy<Value = Option<bool>> {
    prop_oneof![2 => Just(Some(true)), 1 => Just(Some(false)), 1 => Just(None)]
}

/// A few random cubes over `n` inputs and `m` outputs
fn cubes(n: usize, m: usize) -> impl Strategy<Value = Cubes> {
    vec((vec(literal(), n), vec(output(), m)), 0..8)
}

fn arb_cover() -> impl Strategy<Value = Cover> {
    (1..=5usize, 1..=3usize).prop_flat_map(|(n, m)| {
        cubes(n, m).prop_map(move |cubes| {
            let mut cover = Cover::new(n, m);
            for (i, o) in &cubes {
                cover.add_cube(i, o);
            }
            cover
        })
    })
}

fn matches(inputs: &[Option<bool>], minterm: u32) -> bool {
    inputs
        .iter()
        .enumerate()
        .all(|(v, value)| value.map_or(true, |value| (minterm >> v & 1 == 1) == value))
}

fn point(outputs: usize, minterm: u32, bit: usize) -> u128 {
    1 << (minterm as usize * outputs + bit)
}

/// Points set to `1` by `cover`, and points left don't care by it
fn function(cover: &Cover) -> (u128, u128) {
    let (mut on, mut dont_care) = (0, 0);
    for (inputs, outputs) in cover.cubes_iter() {
        for minterm in (0..1u32 << cover.num_inputs()).filter(|m| matches(&inputs, *m)) {
            for (bit, value) in outputs.iter().enumerate() {
                match value {
                    Some(true) => on |= point(cover.num_outputs(), minterm, bit),
                    None => dont_care |= point(cover.num_outputs(), minterm, bit),
                    Some(false) => {}
                }
            }
        }
    }
    (on, dont_care)
}

/// Points a single packed cube may set
fn cube_points(layout: &CubeLayout, cube: &[Word]) -> u128 {
    let inputs: Vec<_> = (0..layout.inputs()).map(|v| layout.input(cube, v)).collect();
    let mut points = 0;
    for minterm in (0..1u32 << layout.inputs()).filter(|m| matches(&inputs, *m)) {
        for bit in 0..layout.outputs() {
            if layout.output(cube, bit) != Some(false) {
                points |= point(layout.outputs(), minterm, bit);
            }
        }
    }
    points
}

/// Graph holding the prime implicants of `cover`, and the primes themselves
fn prime_implicants(cover: &Cover) -> (CoveringGraph, Vec<NodeId>) {
    let layout = CubeLayout::new(cover.num_inputs(), cover.num_outputs());
    let mut graph = CoveringGraph::new(layout);
    let ids = cover
        .cubes_iter()
        .map(|(i, o)| graph.add_node(layout.cube(&i, &o)))
        .collect();
    let primes = primes::generate(&mut graph, ids, false).unwrap();
    (graph, primes)
}

/// True iff `budget` of the `masks` are enough to contain `required`
fn fits(required: u128, masks: &[u128], budget: usize) -> bool {
    if required == 0 {
        return true;
    }
    if budget == 0 {
        return false;
    }
    // Some mask has to contain the lowest required point
    let lowest = required & required.wrapping_neg();
    masks
        .iter()
        .filter(|mask| *mask & lowest != 0)
        .any(|mask| fits(required & !mask, masks, budget - 1))
}

/// Point `(minterm, bit)` of a packed cube holds a `1` output
fn is_on(layout: &CubeLayout, cube: &[Word], minterm: u32, bit: usize) -> bool {
    layout.output(cube, bit) == Some(true)
        && (0..layout.inputs()).all(|v| {
            layout
                .input(cube, v)
                .map_or(true, |value| (minterm >> v & 1 == 1) == value)
        })
}

fn single_output_cubes() -> impl Strategy<Value = (usize, Vec<Option<bool>>, Vec<Option<bool>>)> {
    (1..=6usize).prop_flat_map(|n| (Just(n), vec(literal(), n), vec(literal(), n)))
}

/// Two cubes over the same inputs with two outputs each, any output literal
fn two_output_cubes() -> impl Strategy<Value = (usize, Cubes)> {
    (1..=5usize).prop_flat_map(|n| (Just(n), vec((vec(literal(), n), vec(output(), 2)), 2)))
}

proptest! {
    #[test]
    fn proptest_minimized_cover_implements_function(cover in arb_cover()) {
        let result = minimize(&cover, &MinimizeConfig::default()).unwrap();
        let (on, dont_care) = function(&cover);
        let (solution, solution_dont_care) = function(&result.cover);
        prop_assert_eq!(solution_dont_care, 0);
        // Don't care wins over a `1` given by another cube
        prop_assert_eq!(on & !dont_care & !solution, 0, "a required point is lost");
        prop_assert_eq!(solution & !(on | dont_care), 0, "an off point is set");

        let comparison = verify::compare(&cover, &result.cover).unwrap();
        prop_assert!(comparison.uncovered_in_b.is_empty());
        if on & dont_care == 0 {
            prop_assert!(comparison.is_equivalent());
        }
    }

    #[test]
    fn proptest_minimized_cover_is_minimum(cover in arb_cover()) {
        let result = minimize(&cover, &MinimizeConfig::default()).unwrap();
        prop_assume!(!result.stats.heuristic);

        let (graph, primes) = prime_implicants(&cover);
        let layout = *graph.layout();
        let masks: Vec<u128> = primes
            .iter()
            .filter(|id| !graph[**id].status().contains(Status::DONT_CARE))
            .map(|id| cube_points(&layout, graph[*id].cube()))
            .collect();
        let (on, dont_care) = function(&cover);
        let required = on & !dont_care;

        let size = result.stats.solution_size;
        prop_assert!(fits(required, &masks, size));
        if size > 0 {
            prop_assert!(!fits(required, &masks, size - 1), "a cover of {} primes exists", size - 1);
        }
    }

    #[test]
    fn proptest_generated_graph_is_consistent(cover in arb_cover()) {
        let (graph, primes) = prime_implicants(&cover);
        prop_assert_eq!(graph.check(&primes), Ok(()));
    }

    #[test]
    fn proptest_minimized_cover_is_no_larger(cover in arb_cover()) {
        let result = minimize(&cover, &MinimizeConfig::default()).unwrap();
        prop_assume!(!result.stats.heuristic);
        prop_assert!(result.cover.num_cubes() <= cover.num_cubes());
        prop_assert!(result.stats.essential_implicants <= result.stats.solution_size);
        prop_assert!(result.stats.solution_size <= result.stats.prime_implicants);
    }

    #[test]
    fn proptest_minimize_is_idempotent(cover in arb_cover()) {
        let first = minimize(&cover, &MinimizeConfig::default()).unwrap();
        let second = minimize(&first.cover, &MinimizeConfig::default()).unwrap();
        prop_assume!(!first.stats.heuristic && !second.stats.heuristic);
        prop_assert_eq!(first.cover.num_cubes(), second.cover.num_cubes());
    }

    #[test]
    fn proptest_disjoint_sharp((n, pair) in two_output_cubes()) {
        let layout = CubeLayout::new(n, 2);
        let a = layout.cube(&pair[0].0, &pair[0].1);
        let b = layout.cube(&pair[1].0, &pair[1].1);
        let mut rest = CubeList::from_cube(&a);
        let empty = layout.disjoint_sharp(&mut rest, &b);
        prop_assert_eq!(empty, rest.is_empty());

        let b_points = cube_points(&layout, &b);
        for minterm in 0..(1u32 << n) {
            for bit in 0..2 {
                let expected = is_on(&layout, &a, minterm, bit)
                    && b_points & point(2, minterm, bit) == 0;
                let hits = rest.iter().filter(|piece| is_on(&layout, piece, minterm, bit)).count();
                // Pieces are pairwise disjoint
                prop_assert_eq!(hits, usize::from(expected));
            }
        }
    }

    #[test]
    fn proptest_intersect_and_covers((n, a, b) in single_output_cubes()) {
        let layout = CubeLayout::new(n, 1);
        let a = layout.cube(&a, &[Some(true)]);
        let b = layout.cube(&b, &[Some(true)]);
        let minterms = 0..(1u32 << n);

        let shared = minterms.clone().any(|m| is_on(&layout, &a, m, 0) && is_on(&layout, &b, m, 0));
        prop_assert_eq!(layout.intersect(&a, &b), shared);

        let covered = minterms.clone().all(|m| !is_on(&layout, &b, m, 0) || is_on(&layout, &a, m, 0));
        prop_assert_eq!(layout.covers(&a, &b), covered);
    }

    #[test]
    fn proptest_star_product((n, mut a, mut b) in single_output_cubes(), var in 0..6usize) {
        let var = var % n;
        a[var] = Some(false);
        b[var] = Some(true);
        let compatible = (0..n)
            .filter(|v| *v != var)
            .all(|v| a[v].is_none() || b[v].is_none() || a[v] == b[v]);

        let layout = CubeLayout::new(n, 1);
        let a = layout.cube(&a, &[Some(true)]);
        let b = layout.cube(&b, &[Some(true)]);
        let product = layout.star_product(&a, &b, var);
        prop_assert_eq!(product.is_some(), compatible);

        if let Some(product) = product {
            prop_assert_eq!(layout.input(&product, var), None);
            for minterm in 0..(1u32 << n) {
                if is_on(&layout, &product, minterm, 0) {
                    prop_assert!(is_on(&layout, &a, minterm, 0) || is_on(&layout, &b, minterm, 0));
                }
            }
        }
    }
}

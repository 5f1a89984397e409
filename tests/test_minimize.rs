//! End-to-end minimization tests
//!
//! Every result is checked against its input with the verifier, then against
//! the known minimum size of the function.

use mcboole_logic::*;

/// Build a cover from `("inputs", "outputs")` strings, with `-` and `d` as
/// don't care
fn cover(inputs: usize, outputs: usize, cubes: &[(&str, &str)]) -> Cover {
    let literal = |c: char| match c {
        '0' => Some(false),
        '1' => Some(true),
        _ => None,
    };
    let mut cover = Cover::new(inputs, outputs);
    for (i, o) in cubes {
        let i: Vec<_> = i.chars().map(literal).collect();
        let o: Vec<_> = o.chars().map(literal).collect();
        cover.add_cube(&i, &o);
    }
    cover
}

/// Cover of the minterms of a single-output function
fn minterms(inputs: usize, on: &[u32]) -> Cover {
    let mut cover = Cover::new(inputs, 1);
    for &m in on {
        let i: Vec<_> = (0..inputs).map(|v| Some(m >> (inputs - 1 - v) & 1 == 1)).collect();
        cover.add_cube(&i, &[Some(true)]);
    }
    cover
}

fn minimize_and_verify(input: &Cover, config: &MinimizeConfig) -> Minimized {
    let result = minimize(input, config).unwrap();
    let comparison = verify::compare(input, &result.cover).unwrap();
    assert!(
        comparison.is_equivalent(),
        "minimized cover differs from its input: {:?}",
        comparison
    );
    assert_eq!(result.cover.num_cubes(), result.stats.solution_size);
    result
}

#[test]
fn test_majority() {
    let input = minterms(3, &[0b011, 0b101, 0b110, 0b111]);
    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    assert_eq!(result.cover.num_cubes(), 3);
    assert_eq!(result.stats.prime_implicants, 3);
    assert_eq!(result.stats.essential_implicants, 3);
    assert_eq!(result.stats.input_literals, 6);
    assert_eq!(result.essentials.num_cubes(), 3);
}

#[test]
fn test_parity_does_not_merge() {
    let input = minterms(3, &[0b001, 0b010, 0b100, 0b111]);
    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    assert_eq!(result.cover.num_cubes(), 4);
    assert_eq!(result.stats.input_literals, 12);
}

#[test]
fn test_cyclic_function() {
    let input = minterms(3, &[0, 1, 2, 5, 6, 7]);
    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    assert_eq!(result.cover.num_cubes(), 3);
    assert_eq!(result.stats.prime_implicants, 6);
    assert_eq!(result.stats.essential_implicants, 0);
    assert!(result.essentials.is_empty());
    assert!(result.stats.max_branching_depth >= 1);
    assert!(!result.stats.heuristic);
}

#[test]
fn test_cyclic_function_without_branching() {
    let input = minterms(3, &[0, 1, 2, 5, 6, 7]);
    let config = MinimizeConfig {
        branch_depth_limit: 0,
        ..MinimizeConfig::default()
    };
    let result = minimize_and_verify(&input, &config);
    assert!(result.stats.heuristic);
    assert!(result.cover.num_cubes() >= 3);
}

#[test]
fn test_full_adder() {
    // sum, carry
    let input = cover(
        3,
        2,
        &[
            ("001", "10"),
            ("010", "10"),
            ("100", "10"),
            ("111", "11"),
            ("011", "01"),
            ("101", "01"),
            ("110", "01"),
        ],
    );
    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    assert_eq!(result.cover.num_cubes(), 7);
}

#[test]
fn test_shared_output_cube() {
    // Both outputs equal a
    let input = cover(2, 2, &[("10", "11"), ("11", "10"), ("11", "01")]);
    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    let cubes: Vec<_> = result.cover.cubes_iter().collect();
    assert_eq!(
        cubes,
        vec![(vec![Some(true), None], vec![Some(true), Some(true)])]
    );
}

#[test]
fn test_dont_cares_enlarge_primes() {
    // f = a'b'c' + a'bc' + ab'c', with abc' don't care: c' is enough
    let input = cover(
        3,
        1,
        &[("000", "1"), ("010", "1"), ("100", "1"), ("110", "d")],
    );
    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    let cubes: Vec<_> = result.cover.cubes_iter().collect();
    assert_eq!(cubes, vec![(vec![None, None, Some(false)], vec![Some(true)])]);
}

#[test]
fn test_dont_care_only_function() {
    let input = cover(2, 1, &[("1-", "d")]);
    let result = minimize(&input, &MinimizeConfig::default()).unwrap();
    assert!(result.cover.is_empty());
    assert_eq!(result.stats.solution_size, 0);
    assert!(verify::compare(&input, &result.cover).unwrap().is_equivalent());
}

#[test]
fn test_redundant_input_cubes() {
    let input = cover(
        4,
        1,
        &[
            ("1---", "1"),
            ("11--", "1"),
            ("1-0-", "1"),
            ("10-1", "1"),
            ("-1-1", "1"),
        ],
    );
    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    // a + bd
    assert_eq!(result.cover.num_cubes(), 2);
    assert_eq!(result.stats.input_literals, 3);
}

#[test]
fn test_minimize_literals_keeps_equivalence() {
    let input = minterms(4, &[0, 1, 2, 3, 5, 7, 8, 10, 13, 15]);
    let plain = minimize_and_verify(&input, &MinimizeConfig::default());
    let config = MinimizeConfig {
        minimize_literals: true,
        ..MinimizeConfig::default()
    };
    let literals = minimize_and_verify(&input, &config);
    assert_eq!(plain.cover.num_cubes(), literals.cover.num_cubes());
}

#[test]
fn test_disjoint_required() {
    let disjoint = cover(2, 1, &[("0-", "1"), ("11", "1")]);
    let config = MinimizeConfig {
        disjoint_required: true,
        ..MinimizeConfig::default()
    };
    let result = minimize_and_verify(&disjoint, &config);
    assert_eq!(result.cover.num_cubes(), 2);

    let overlapping = cover(2, 1, &[("0-", "1"), ("-1", "1")]);
    let err = minimize(&overlapping, &config).unwrap_err();
    assert_eq!(
        err,
        MinimizeError::OverlappingCubes {
            inputs: "01".to_string()
        }
    );
}

#[test]
fn test_wide_cover_spans_several_words() {
    // 40 inputs need two words per input part
    let inputs = 40;
    let mut input = Cover::new(inputs, 1);
    let mut a = vec![None; inputs];
    a[0] = Some(true);
    a[39] = Some(false);
    let mut b = a.clone();
    b[39] = Some(true);
    input.add_cube(&a, &[Some(true)]);
    input.add_cube(&b, &[Some(true)]);

    let result = minimize_and_verify(&input, &MinimizeConfig::default());
    let cubes: Vec<_> = result.cover.cubes_iter().collect();
    assert_eq!(cubes.len(), 1);
    assert_eq!(cubes[0].0[0], Some(true));
    assert!(cubes[0].0[1..].iter().all(Option::is_none));
}

#[test]
fn test_minimize_is_deterministic() {
    let input = minterms(4, &[0, 2, 5, 7, 8, 10, 13, 15, 4, 12]);
    let first = minimize_and_verify(&input, &MinimizeConfig::default());
    let second = minimize_and_verify(&input, &MinimizeConfig::default());
    assert_eq!(first.cover, second.cover);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_concurrent_minimization() {
    let handles: Vec<_> = (0..4u32)
        .map(|k| {
            std::thread::spawn(move || {
                let on: Vec<u32> = (0..16).filter(|m| (m + k) % 3 != 0).collect();
                let input = minterms(4, &on);
                let result = minimize(&input, &MinimizeConfig::default()).unwrap();
                verify::compare(&input, &result.cover).unwrap().is_equivalent()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

//! Equivalence check between two covers
//!
//! Each cube of one cover is sharped by every cube of the other. Whatever
//! survives and still asserts a `1` output is a point where the first cover
//! is on and the second is not. Don't care outputs of either cover never
//! count against it.

use log::{debug, trace};

use crate::cover::Cover;
use crate::cube::CubeList;
use crate::error::MinimizeError;

/// Result of [`compare`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Cubes of the first cover not covered by the second
    pub uncovered_in_a: Cover,
    /// Cubes of the second cover not covered by the first
    pub uncovered_in_b: Cover,
}

impl Comparison {
    /// True iff both covers describe the same function
    pub fn is_equivalent(&self) -> bool {
        self.uncovered_in_a.is_empty() && self.uncovered_in_b.is_empty()
    }
}

/// Compare two covers of the same dimensions
///
/// # Examples
///
/// ```
/// use mcboole_logic::{verify, Cover};
///
/// let mut a = Cover::new(2, 1);
/// a.add_cube(&[Some(true), None], &[Some(true)]);
///
/// let mut b = Cover::new(2, 1);
/// b.add_cube(&[Some(true), Some(false)], &[Some(true)]);
/// b.add_cube(&[Some(true), Some(true)], &[Some(true)]);
///
/// assert!(verify::compare(&a, &b).unwrap().is_equivalent());
/// ```
pub fn compare(a: &Cover, b: &Cover) -> Result<Comparison, MinimizeError> {
    if a.num_inputs() != b.num_inputs() || a.num_outputs() != b.num_outputs() {
        return Err(MinimizeError::DimensionMismatch {
            expected_inputs: a.num_inputs(),
            actual_inputs: b.num_inputs(),
            expected_outputs: a.num_outputs(),
            actual_outputs: b.num_outputs(),
        });
    }

    let comparison = Comparison {
        uncovered_in_a: uncovered(a, b),
        uncovered_in_b: uncovered(b, a),
    };
    debug!(
        "{} cubes of the first cover and {} of the second are not covered by the other",
        comparison.uncovered_in_a.num_cubes(),
        comparison.uncovered_in_b.num_cubes()
    );
    Ok(comparison)
}

/// Cubes of `cover` with a `1` point outside of `other`
fn uncovered(cover: &Cover, other: &Cover) -> Cover {
    let layout = *cover.layout();
    let mut result = Cover::with_layout(layout);
    for cube in cover.cubes() {
        let mut rest = CubeList::from_cube(cube);
        for sharp in other.cubes() {
            if layout.disjoint_sharp(&mut rest, sharp) {
                break;
            }
        }
        let mut missing = rest.iter().filter(|piece| layout.has_do_care_output(piece)).peekable();
        if missing.peek().is_some() {
            for piece in missing {
                trace!("uncovered: {:?}", piece);
            }
            result.push(cube.clone());
        }
    }
    result
}

//! Covers: the sum-of-products form of a multi-output Boolean function
//!
//! A [`Cover`] is what goes in and out of [`minimize`](crate::minimize). It
//! holds its dimensions and a list of packed cubes; callers build and inspect
//! it through `Option<bool>` slices where `None` means don't care.

use std::fmt;

use crate::cube::{Cube, CubeLayout};
use crate::error::MinimizeError;

/// A multi-output function as a list of cubes
///
/// # Examples
///
/// ```
/// use mcboole_logic::Cover;
///
/// let mut cover = Cover::new(2, 1);
/// cover.add_cube(&[Some(true), None], &[Some(true)]);
/// cover.add_cube(&[Some(false), None], &[Some(true)]);
/// assert_eq!(cover.num_cubes(), 2);
/// assert_eq!(cover.num_inputs(), 2);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Cover {
    layout: CubeLayout,
    cubes: Vec<Cube>,
}

impl Cover {
    /// Create an empty cover over `inputs` variables and `outputs` functions
    pub fn new(inputs: usize, outputs: usize) -> Self {
        Cover::with_layout(CubeLayout::new(inputs, outputs))
    }

    pub(crate) fn with_layout(layout: CubeLayout) -> Self {
        Cover {
            layout,
            cubes: Vec::new(),
        }
    }

    /// Layout of the packed cubes
    pub fn layout(&self) -> &CubeLayout {
        &self.layout
    }

    pub fn num_inputs(&self) -> usize {
        self.layout.inputs()
    }

    pub fn num_outputs(&self) -> usize {
        self.layout.outputs()
    }

    pub fn num_cubes(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Add a cube
    ///
    /// Output `None` marks the point as don't care for that output.
    ///
    /// # Panics
    ///
    /// Panics if the slices do not match the dimensions of the cover; see
    /// [`Cover::try_add_cube`] for the fallible version.
    pub fn add_cube(&mut self, inputs: &[Option<bool>], outputs: &[Option<bool>]) {
        if let Err(err) = self.try_add_cube(inputs, outputs) {
            panic!("{}", err);
        }
    }

    /// Add a cube, checking its dimensions first
    pub fn try_add_cube(&mut self, inputs: &[Option<bool>], outputs: &[Option<bool>]) -> Result<(), MinimizeError> {
        if inputs.len() != self.num_inputs() || outputs.len() != self.num_outputs() {
            return Err(MinimizeError::DimensionMismatch {
                expected_inputs: self.num_inputs(),
                actual_inputs: inputs.len(),
                expected_outputs: self.num_outputs(),
                actual_outputs: outputs.len(),
            });
        }
        self.cubes.push(self.layout.cube(inputs, outputs));
        Ok(())
    }

    pub(crate) fn push(&mut self, cube: Cube) {
        debug_assert_eq!(cube.len(), self.layout.words());
        self.cubes.push(cube);
    }

    /// The packed cubes
    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    /// Iterate over the cubes as `(inputs, outputs)`, in the form
    /// [`Cover::add_cube`] takes
    pub fn cubes_iter(&self) -> CubesIter<'_> {
        CubesIter {
            layout: &self.layout,
            cubes: self.cubes.iter(),
        }
    }
}

impl fmt::Debug for Cover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cover")
            .field("inputs", &self.num_inputs())
            .field("outputs", &self.num_outputs())
            .field("cubes", &self.cubes.len())
            .finish()
    }
}

/// Iterator over the cubes of a [`Cover`]
pub struct CubesIter<'a> {
    layout: &'a CubeLayout,
    cubes: std::slice::Iter<'a, Cube>,
}

impl Iterator for CubesIter<'_> {
    type Item = (Vec<Option<bool>>, Vec<Option<bool>>);

    fn next(&mut self) -> Option<Self::Item> {
        let cube = self.cubes.next()?;
        let inputs = (0..self.layout.inputs())
            .map(|var| self.layout.input(cube, var))
            .collect();
        let outputs = (0..self.layout.outputs())
            .map(|bit| self.layout.output(cube, bit))
            .collect();
        Some((inputs, outputs))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cubes.size_hint()
    }
}

impl ExactSizeIterator for CubesIter<'_> {}

//! Owned lists of cubes and disjoint subtraction

use super::{variable_mask, Cube, CubeLayout, Word, SYMBOLS_PER_WORD};

/// An unordered set of cubes stored back to back
///
/// Used for the uncovered remainder of a node and for scratch results of
/// subtraction. A list is never shared; snapshots clone it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CubeList {
    words: Vec<Word>,
    stride: usize,
}

impl CubeList {
    /// Empty list of cubes `stride` words wide
    pub fn new(stride: usize) -> Self {
        debug_assert!(stride > 0);
        CubeList {
            words: Vec::new(),
            stride,
        }
    }

    /// List holding a copy of `cube`
    pub fn from_cube(cube: &[Word]) -> Self {
        CubeList {
            words: cube.to_vec(),
            stride: cube.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len() / self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn push(&mut self, cube: &[Word]) {
        debug_assert_eq!(cube.len(), self.stride);
        self.words.extend_from_slice(cube);
    }

    /// Release every member
    pub fn clear(&mut self) {
        self.words.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &[Word]> + '_ {
        self.words.chunks_exact(self.stride)
    }

    /// Owned copies of the members
    pub fn to_cubes(&self) -> Vec<Cube> {
        self.iter().map(Cube::from).collect()
    }
}

impl CubeLayout {
    /// True iff `cube` intersects some member of `list`
    pub fn intersect_list(&self, cube: &[Word], list: &CubeList) -> bool {
        list.iter().any(|member| self.intersect(cube, member))
    }

    /// True iff `cube` covers every member of `list`
    pub fn covers_list(&self, cube: &[Word], list: &CubeList) -> bool {
        list.iter().all(|member| self.covers(cube, member))
    }

    /// Subtract `sharp` from a list of pairwise disjoint cubes
    ///
    /// Members that partially overlap `sharp` are split on every variable
    /// where `sharp` is specified and the member is not restricted to it; the
    /// pieces outside `sharp` keep their whole output part. What is left inside
    /// `sharp` loses the outputs it shares with `sharp` and is dropped once no
    /// output remains. The list stays pairwise disjoint.
    ///
    /// Returns true iff the list is empty afterwards.
    pub fn disjoint_sharp(&self, list: &mut CubeList, sharp: &[Word]) -> bool {
        debug_assert_eq!(list.stride, self.words());
        let mut result = CubeList::new(list.stride);
        let mut present: Vec<Word> = Vec::with_capacity(list.stride);

        for member in list.iter() {
            if !self.intersect(member, sharp) {
                result.push(member);
                continue;
            }
            present.clear();
            present.extend_from_slice(member);

            for i in 0..self.input_words {
                let outside = (sharp[i] & present[i]) ^ present[i];
                if outside == 0 {
                    continue;
                }
                for k in 0..SYMBOLS_PER_WORD {
                    let mask = variable_mask(k);
                    if outside & mask == 0 {
                        continue;
                    }
                    let saved = present[i];
                    present[i] = saved & !(mask & sharp[i]);
                    result.push(&present);
                    present[i] = saved & (!mask | sharp[i]);
                }
            }

            let mut any_output = false;
            for i in self.input_words..self.words() {
                present[i] &= !sharp[i];
                any_output |= present[i] != 0;
            }
            if any_output {
                result.push(&present);
            }
        }

        *list = result;
        list.is_empty()
    }
}

//! Choice of the split variable and handling of trivial partitions

use super::Generator;
use crate::error::MinimizeError;
use crate::graph::{NodeId, Status};

impl Generator<'_> {
    /// Pick the variable to split `list` on
    ///
    /// Prefers the variable with the fewest don't cares across the list, then
    /// the one with the most balanced 0/1 split. Variables that are don't care
    /// everywhere, or that do not separate the cubes, are skipped. The chosen
    /// variable is moved out of the usable part of `unused`.
    ///
    /// Returns `None` when the partition is already prime, after reducing it to
    /// a single BASIC node.
    pub(super) fn select_input(&mut self, list: &mut Vec<NodeId>) -> Result<Option<usize>, MinimizeError> {
        if list.len() == 1 {
            self.finish_leaf(list[0]);
            return Ok(None);
        }

        let n = list.len();
        let mut best: Option<(usize, usize, usize)> = None;
        for i in 0..self.available {
            let var = self.unused[i];
            let (mut zeros, mut ones, mut dont_cares) = (0, 0, 0);
            for id in list.iter() {
                match self.layout.input(&self.graph[*id].cube, var) {
                    Some(false) => zeros += 1,
                    Some(true) => ones += 1,
                    None => dont_cares += 1,
                }
            }
            let balance = zeros.max(ones);
            if dont_cares == n || balance == n {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_cost, best_balance)) => {
                    dont_cares < best_cost || (dont_cares == best_cost && balance < best_balance)
                }
            };
            if better {
                best = Some((i, dont_cares, balance));
            }
        }

        match best {
            Some((i, _, _)) => {
                self.available -= 1;
                self.unused.swap(i, self.available);
                Ok(Some(self.unused[self.available]))
            }
            None => {
                self.merge_identical(list)?;
                Ok(None)
            }
        }
    }

    /// OR together cubes that share the same input part
    fn merge_identical(&mut self, list: &mut Vec<NodeId>) -> Result<(), MinimizeError> {
        let first = list[0];
        if self.disjoint_required {
            let inputs = (0..self.layout.inputs())
                .map(|var| match self.layout.input(&self.graph[first].cube, var) {
                    Some(true) => '1',
                    Some(false) => '0',
                    None => '-',
                })
                .collect();
            return Err(MinimizeError::OverlappingCubes { inputs });
        }

        for id in list.drain(1..) {
            let node = self.graph.remove_node(id);
            self.layout.or_outputs(&mut self.graph[first].cube, &node.cube);
        }
        self.finish_leaf(first);
        Ok(())
    }

    /// Mark the only node of a leaf BASIC, splitting off its don't cares
    fn finish_leaf(&mut self, id: NodeId) {
        if self.layout.has_dont_care_output(&self.graph[id].cube) {
            self.put_in_dont_care_list(id);
        }
        self.graph[id].status = Status::BASIC;
    }

    /// Split the don't care outputs of `id` into a DONT_CARE ancestor
    fn put_in_dont_care_list(&mut self, id: NodeId) {
        let mut dont_care = self.graph[id].cube.clone();
        self.layout.keep_dont_care_outputs(&mut dont_care);
        self.layout.dont_care_to_do_care(&mut self.graph[id].cube);

        let dc = self.graph.add_node(dont_care);
        self.graph[dc].status = Status::DONT_CARE;
        self.graph.link(dc, id);
        self.dont_cares.push(dc);
    }
}

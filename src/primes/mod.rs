//! Prime implicant generation
//!
//! The cube list is split recursively on one input variable at a time until
//! every partition is trivially prime: a single cube, or several cubes sharing
//! the same input part. Coming back up, the two halves of each split are merged
//! with the star product along the split variable. A merged cube may absorb the
//! cubes it came from or other merged cubes, and every merge is recorded in the
//! [`CoveringGraph`] so that the nodes end up linked to the nodes they
//! intersect.
//!
//! Don't care outputs are handled at the leaves: a cube with don't care outputs
//! has them turned into `1` and a separate DONT_CARE node holding only the don't
//! care part is linked as its ancestor.

mod select;


use log::{debug, trace};

use crate::cube::{Absorption, CoverRelation, CubeLayout};
use crate::error::MinimizeError;
use crate::graph::{CoveringGraph, NodeId};

/// One side of a split
#[derive(Debug)]
enum Branch {
    Empty,
    Leaf(Vec<NodeId>),
    Subtree(Box<Binary>),
}

/// A split on `var` and the cubes merged across it
#[derive(Debug)]
struct Binary {
    var: usize,
    is0: Branch,
    is1: Branch,
    isx: Vec<NodeId>,
}

impl Branch {
    /// Collapse a subtree whose two sides are empty
    fn prune(&mut self) {
        match self {
            Branch::Empty => {}
            Branch::Leaf(list) => {
                if list.is_empty() {
                    *self = Branch::Empty;
                }
            }
            Branch::Subtree(binary) => {
                if matches!(binary.is0, Branch::Empty) && matches!(binary.is1, Branch::Empty) {
                    let isx = std::mem::take(&mut binary.isx);
                    *self = if isx.is_empty() {
                        Branch::Empty
                    } else {
                        Branch::Leaf(isx)
                    };
                }
            }
        }
    }

    /// Move every node of the branch into `list`
    fn collect_into(self, list: &mut Vec<NodeId>) {
        match self {
            Branch::Empty => {}
            Branch::Leaf(nodes) => list.extend(nodes),
            Branch::Subtree(binary) => {
                let Binary { is0, is1, isx, .. } = *binary;
                is0.collect_into(list);
                is1.collect_into(list);
                list.extend(isx);
            }
        }
    }
}

/// Generate the prime implicants of the function described by `cubes`
///
/// Returns the DONT_CARE nodes followed by the prime implicants, all linked in
/// `graph`. Cubes with an empty output part are released first.
pub fn generate(
    graph: &mut CoveringGraph,
    cubes: Vec<NodeId>,
    disjoint_required: bool,
) -> Result<Vec<NodeId>, MinimizeError> {
    let layout = *graph.layout();
    let mut list = Vec::with_capacity(cubes.len());
    for id in cubes {
        if layout.output_is_empty(&graph[id].cube) {
            graph.remove_node(id);
        } else {
            list.push(id);
        }
    }
    if list.is_empty() {
        return Ok(Vec::new());
    }
    debug!("generating prime implicants of {} cubes", list.len());

    let mut generator = Generator {
        graph,
        layout,
        disjoint_required,
        unused: (0..layout.inputs()).collect(),
        available: layout.inputs(),
        dont_cares: Vec::new(),
    };
    let mut root = Branch::Leaf(list);
    generator.partition(&mut root, true)?;

    let mut primes = std::mem::take(&mut generator.dont_cares);
    root.collect_into(&mut primes);
    debug!(
        "{} nodes generated ({} live, peak {})",
        primes.len(),
        generator.graph.len(),
        generator.graph.peak()
    );
    Ok(primes)
}

struct Generator<'g> {
    graph: &'g mut CoveringGraph,
    layout: CubeLayout,
    disjoint_required: bool,
    /// Input variables not yet split on; the first `available` are usable
    unused: Vec<usize>,
    available: usize,
    /// DONT_CARE nodes split off at the leaves
    dont_cares: Vec<NodeId>,
}

impl Generator<'_> {
    /// Make the nodes of a leaf branch prime
    ///
    /// With `return_a_list` the branch is left as a single leaf holding every
    /// prime; otherwise it may become a subtree that keeps the halves apart for
    /// the merges of the levels above.
    fn partition(&mut self, branch: &mut Branch, return_a_list: bool) -> Result<(), MinimizeError> {
        let Branch::Leaf(list) = branch else {
            crate::fatal!("partition called on a branch that is not a leaf");
        };
        let Some(var) = self.select_input(list)? else {
            return Ok(());
        };

        let mut list0 = Vec::new();
        let mut list1 = Vec::new();
        for id in std::mem::take(list) {
            match self.layout.input(&self.graph[id].cube, var) {
                Some(true) => list1.push(id),
                Some(false) => list0.push(id),
                None => {
                    let mut copy = self.graph[id].cube.clone();
                    self.layout.set_input(&mut self.graph[id].cube, var, Some(false));
                    self.layout.set_input(&mut copy, var, Some(true));
                    list0.push(id);
                    list1.push(self.graph.add_node(copy));
                }
            }
        }
        trace!(
            "split on input {}: {} / {} cubes",
            var,
            list0.len(),
            list1.len()
        );

        let mut binary = Box::new(Binary {
            var,
            is0: Branch::Leaf(list0),
            is1: Branch::Leaf(list1),
            isx: Vec::new(),
        });
        self.partition(&mut binary.is0, return_a_list)?;
        self.partition(&mut binary.is1, false)?;
        self.available += 1;

        {
            let Binary { is0, is1, isx, .. } = &mut *binary;
            self.scan_node_to_merge(is0, is1, isx, var);
        }

        *branch = if return_a_list {
            let Binary { is0, is1, isx, .. } = *binary;
            let mut list = isx;
            is0.collect_into(&mut list);
            is1.collect_into(&mut list);
            Branch::Leaf(list)
        } else if matches!(binary.is0, Branch::Empty) && matches!(binary.is1, Branch::Empty) {
            Branch::Leaf(std::mem::take(&mut binary.isx))
        } else {
            Branch::Subtree(binary)
        };
        Ok(())
    }

    /// Try to merge every node of `branch` with the nodes across the split
    fn scan_node_to_merge(
        &mut self,
        branch: &mut Branch,
        other: &mut Branch,
        merged: &mut Vec<NodeId>,
        var: usize,
    ) {
        let list = match branch {
            Branch::Empty => return,
            Branch::Leaf(list) => list,
            Branch::Subtree(binary) => {
                let Binary { is0, is1, isx, .. } = &mut **binary;
                self.scan_node_to_merge(is0, other, merged, var);
                self.scan_node_to_merge(is1, other, merged, var);
                isx
            }
        };

        let mut i = 0;
        while i < list.len() {
            if self.merge_with_rest(other, list[i], merged, var) {
                list.remove(i);
            } else {
                i += 1;
            }
        }
        branch.prune();
    }

    /// Star multiply `node` with every candidate in `branch`
    ///
    /// Returns true once `node` has been absorbed by one of the products; it is
    /// then no longer part of its list and no larger merge exists for it.
    fn merge_with_rest(
        &mut self,
        branch: &mut Branch,
        node: NodeId,
        merged: &mut Vec<NodeId>,
        var: usize,
    ) -> bool {
        let absorbed = match branch {
            Branch::Empty => return false,
            Branch::Leaf(list) => self.merge_with_list(list, node, merged, var),
            Branch::Subtree(binary) => {
                if self.merge_with_list(&mut binary.isx, node, merged, var) {
                    true
                } else {
                    match self.layout.input(&self.graph[node].cube, binary.var) {
                        Some(false) => self.merge_with_rest(&mut binary.is0, node, merged, var),
                        Some(true) => self.merge_with_rest(&mut binary.is1, node, merged, var),
                        None => {
                            self.merge_with_rest(&mut binary.is0, node, merged, var)
                                || self.merge_with_rest(&mut binary.is1, node, merged, var)
                        }
                    }
                }
            }
        };
        branch.prune();
        absorbed
    }

    fn merge_with_list(
        &mut self,
        list: &mut Vec<NodeId>,
        node: NodeId,
        merged: &mut Vec<NodeId>,
        var: usize,
    ) -> bool {
        let mut j = 0;
        while j < list.len() {
            let candidate = list[j];
            let product =
                self.layout
                    .star_product(&self.graph[node].cube, &self.graph[candidate].cube, var);
            if let Some(product) = product {
                let (new_node, relation) = self.graph.merge_and_link(node, candidate, product);
                let candidate_taken = matches!(relation, CoverRelation::Second | CoverRelation::Both);
                let node_taken = matches!(relation, CoverRelation::First | CoverRelation::Both);
                if candidate_taken {
                    list.remove(j);
                }
                self.absorb_into(merged, new_node);
                if node_taken {
                    return true;
                }
                if candidate_taken {
                    continue;
                }
            }
            j += 1;
        }
        false
    }

    /// Check a new node against the nodes already merged at this level
    fn absorb_into(&mut self, merged: &mut Vec<NodeId>, new_node: NodeId) {
        let mut k = 0;
        while k < merged.len() {
            let other = merged[k];
            match self
                .layout
                .absorb(&self.graph[new_node].cube, &self.graph[other].cube)
            {
                Absorption::Equal | Absorption::SecondCovers => {
                    self.graph.absorb_and_unlink(other, new_node);
                    return;
                }
                Absorption::FirstCovers => {
                    self.graph.absorb_and_unlink(new_node, other);
                    merged.remove(k);
                }
                Absorption::Neither => k += 1,
            }
        }
        merged.push(new_node);
    }
}

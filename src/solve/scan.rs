//! Graph walks of the solver
//!
//! Every walk starts with [`Solver::increment_pass`] on its origin. A node
//! stamped with the even `pass` has been fully scanned; one stamped with
//! `odd_pass` has only been scanned toward its descendants and is scanned
//! toward its ancestors when an ancestor walk reaches it again. Walks toward
//! descendants only ever continue toward descendants.

use super::Solver;
use crate::cube::{CubeList, Word};
use crate::graph::{NodeId, Status};

/// Decision being propagated by an affected walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Propagation {
    /// Neighbours lose the retained cube from their uncovered part
    Retained,
    /// Neighbours may have lost their only alternative cover
    Unretained,
}

impl Propagation {
    fn flag(self) -> Status {
        match self {
            Propagation::Retained => Status::AFFECTED_RETAINED,
            Propagation::Unretained => Status::AFFECTED_UNRETAIN,
        }
    }
}

impl Solver<'_> {
    /// Apply a decision on `cube` to a neighbour whose uncovered part it
    /// intersects
    fn affect(&mut self, propagation: Propagation, cube: &[Word], id: NodeId) {
        if propagation == Propagation::Retained {
            let layout = self.layout;
            let node = &mut self.graph[id];
            if layout.disjoint_sharp(&mut node.uncovered, cube) {
                node.status.insert(Status::COVERED);
            }
        }
        if !self.graph[id].status.contains(Status::DECIDED) {
            self.mark_affected(id, propagation.flag());
        }
    }

    pub(super) fn scan_affected_descendants(&mut self, propagation: Propagation, cube: &[Word], current: NodeId) {
        for i in 0..self.graph[current].descendants.len() {
            let next = self.graph[current].descendants[i];
            let node = &self.graph[next];
            if node.count | 1 == self.odd_pass {
                continue;
            }
            if node.status.contains(Status::COVERED) || !self.layout.intersect_list(cube, &node.uncovered) {
                self.graph[next].count = self.pass;
                continue;
            }
            self.graph[next].count = self.odd_pass;
            self.affect(propagation, cube, next);
            self.scan_affected_descendants(propagation, cube, next);
        }
    }

    pub(super) fn scan_affected_ancestors(&mut self, propagation: Propagation, cube: &[Word], current: NodeId) {
        for i in 0..self.graph[current].ancestors.len() {
            let next = self.graph[current].ancestors[i];
            let count = self.graph[next].count;
            if count == self.pass {
                continue;
            }
            self.graph[next].count = self.pass;
            if count == self.odd_pass {
                self.scan_affected_ancestors(propagation, cube, next);
                continue;
            }
            let node = &self.graph[next];
            if node.status.contains(Status::COVERED) || !self.layout.intersect_list(cube, &node.uncovered) {
                continue;
            }
            self.affect(propagation, cube, next);
            self.scan_affected_ancestors(propagation, cube, next);
            self.scan_affected_descendants(propagation, cube, next);
        }
    }

    /// Whether an undecided node can replace `id` as the cover of `uncovered`
    fn replaces(&self, candidate: NodeId, id: NodeId, uncovered: &CubeList) -> bool {
        let node = &self.graph[candidate];
        self.layout.covers_list(&node.cube, uncovered)
            && (!self.minimize_literals || node.cost <= self.graph[id].cost)
    }

    /// Look for an undecided node covering what is left of `id`, and
    /// unretain `id` as inferior if one is found
    pub(super) fn scan_inferior_descendants(&mut self, id: NodeId, uncovered: &CubeList, current: NodeId) -> bool {
        for i in 0..self.graph[current].descendants.len() {
            let next = self.graph[current].descendants[i];
            let node = &self.graph[next];
            if node.count | 1 == self.odd_pass {
                continue;
            }
            if node.status.contains(Status::COVERED) || !self.layout.intersect_list(&node.cube, uncovered) {
                self.graph[next].count = self.pass;
                continue;
            }
            self.graph[next].count = self.odd_pass;
            if !self.graph[next].status.contains(Status::DECIDED) && self.replaces(next, id, uncovered) {
                self.unretain_inferior_node(id);
                return true;
            }
            if self.scan_inferior_descendants(id, uncovered, next) {
                return true;
            }
        }
        false
    }

    pub(super) fn scan_inferior_ancestors(&mut self, id: NodeId, uncovered: &CubeList, current: NodeId) -> bool {
        for i in 0..self.graph[current].ancestors.len() {
            let next = self.graph[current].ancestors[i];
            let count = self.graph[next].count;
            if count == self.pass {
                continue;
            }
            self.graph[next].count = self.pass;
            if count == self.odd_pass {
                if self.scan_inferior_ancestors(id, uncovered, next) {
                    return true;
                }
                continue;
            }
            let node = &self.graph[next];
            if node.status.contains(Status::COVERED) || !self.layout.intersect_list(&node.cube, uncovered) {
                continue;
            }
            if !node.status.contains(Status::DECIDED) && self.replaces(next, id, uncovered) {
                self.unretain_inferior_node(id);
                return true;
            }
            if self.scan_inferior_ancestors(id, uncovered, next)
                || self.scan_inferior_descendants(id, uncovered, next)
            {
                return true;
            }
        }
        false
    }

    /// Subtract from `rest` the undecided nodes reachable from `current`
    ///
    /// Returns true once `rest` is empty, meaning the node the walk started
    /// from is not essential.
    pub(super) fn scan_essential_descendants(&mut self, rest: &mut CubeList, current: NodeId) -> bool {
        for i in 0..self.graph[current].descendants.len() {
            let next = self.graph[current].descendants[i];
            let node = &self.graph[next];
            if node.count | 1 == self.odd_pass {
                continue;
            }
            if node.status.contains(Status::COVERED) || !self.layout.intersect_list(&node.cube, rest) {
                self.graph[next].count = self.pass;
                continue;
            }
            if node.status.contains(Status::DECIDED) {
                self.graph[next].count = self.odd_pass;
                if self.scan_essential_descendants(rest, next) {
                    return true;
                }
            } else {
                self.graph[next].count = self.pass;
                if self.layout.disjoint_sharp(rest, &self.graph[next].cube) {
                    return true;
                }
            }
        }
        false
    }

    pub(super) fn scan_essential_ancestors(&mut self, rest: &mut CubeList, current: NodeId) -> bool {
        for i in 0..self.graph[current].ancestors.len() {
            let next = self.graph[current].ancestors[i];
            let count = self.graph[next].count;
            if count == self.pass {
                continue;
            }
            self.graph[next].count = self.pass;
            if count == self.odd_pass {
                if self.scan_essential_ancestors(rest, next) {
                    return true;
                }
                continue;
            }
            let node = &self.graph[next];
            if node.status.contains(Status::COVERED) || !self.layout.intersect_list(&node.cube, rest) {
                continue;
            }
            if node.status.contains(Status::DECIDED) {
                if self.scan_essential_ancestors(rest, next) || self.scan_essential_descendants(rest, next) {
                    return true;
                }
            } else if self.layout.disjoint_sharp(rest, &self.graph[next].cube) {
                return true;
            }
        }
        false
    }

    /// Stamp every node not yet covered that interacts with `current`
    ///
    /// Returns the number of nodes stamped, `current` excluded.
    pub(super) fn scan_partition(&mut self, current: NodeId) -> usize {
        let mut size = 0;
        let links = self.graph[current].ancestors.len() + self.graph[current].descendants.len();
        for i in 0..links {
            let node = &self.graph[current];
            let next = match node.ancestors.get(i) {
                Some(next) => *next,
                None => node.descendants[i - node.ancestors.len()],
            };
            let other = &self.graph[next];
            if other.count == self.pass {
                continue;
            }
            if other.status.contains(Status::COVERED) {
                self.graph[next].count = self.pass;
                continue;
            }
            if self.layout.intersect_list(&other.cube, &self.graph[current].uncovered) {
                self.graph[next].count = self.pass;
                size += 1 + self.scan_partition(next);
            }
        }
        size
    }

    /// Subtract from `rest` every other retained node reachable from
    /// `current`
    pub(super) fn scan_sparse_descendants(&mut self, rest: &mut CubeList, current: NodeId) {
        for i in 0..self.graph[current].descendants.len() {
            let next = self.graph[current].descendants[i];
            let node = &self.graph[next];
            if node.count | 1 == self.odd_pass {
                continue;
            }
            if node.status.contains(Status::RETAINED) {
                self.layout.disjoint_sharp(rest, &node.cube);
                self.graph[next].count = self.pass;
                continue;
            }
            if self.layout.intersect_list(&node.cube, rest) {
                self.graph[next].count = self.odd_pass;
                self.scan_sparse_descendants(rest, next);
            } else {
                self.graph[next].count = self.pass;
            }
        }
    }

    pub(super) fn scan_sparse_ancestors(&mut self, rest: &mut CubeList, current: NodeId) {
        for i in 0..self.graph[current].ancestors.len() {
            let next = self.graph[current].ancestors[i];
            let count = self.graph[next].count;
            if count == self.pass {
                continue;
            }
            self.graph[next].count = self.pass;
            if count == self.odd_pass {
                self.scan_sparse_ancestors(rest, next);
                continue;
            }
            let node = &self.graph[next];
            if node.status.contains(Status::RETAINED) {
                self.layout.disjoint_sharp(rest, &node.cube);
            } else if self.layout.intersect_list(&node.cube, rest) {
                self.scan_sparse_ancestors(rest, next);
                self.scan_sparse_descendants(rest, next);
            }
        }
    }
}

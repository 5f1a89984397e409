//! Minimum covering of the prime implicants
//!
//! The primes are kept in one vector split in three zones: retained nodes first,
//! then nodes still undecided or unretained as inferior, then unretained nodes
//! whose cube is entirely covered by retained ones. Deciding a node walks the
//! graph to update the neighbours it intersects; those that may now be decided
//! in turn are pushed on the affected stack. When the stack runs dry with
//! undecided nodes left they form cycles, which are split into independent
//! partitions and solved by branching on one node of each.

mod place;
mod scan;

#[cfg(test)]
mod tests;

use log::{debug, trace};

use crate::cube::{CubeLayout, CubeList};
use crate::graph::{CoveringGraph, NodeId, Status};
use crate::MinimizeConfig;

/// Figures reported about one minimization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinimizeStats {
    /// Prime implicants generated, don't care nodes excluded
    pub prime_implicants: usize,
    /// Prime implicants found essential
    pub essential_implicants: usize,
    /// Cubes in the final cover
    pub solution_size: usize,
    /// Deepest level of branching reached
    pub max_branching_depth: usize,
    /// True when the branching depth limit was hit and the cover may not be
    /// minimum
    pub heuristic: bool,
    /// Specified input literals in the final cover
    pub input_literals: usize,
    /// Output connections in the final cover
    pub output_literals: usize,
}

/// Result of [`solve`]
#[derive(Debug)]
pub struct Solution {
    /// Retained nodes, with irredundant outputs
    pub retained: Vec<NodeId>,
    /// Essential prime implicants, a subset of `retained`
    pub essentials: Vec<NodeId>,
    pub stats: MinimizeStats,
}

/// Select a minimum set of the `primes` covering the function
///
/// `primes` is the list returned by [`generate`](crate::primes::generate):
/// DONT_CARE nodes are retained without being part of the solution.
pub fn solve(graph: &mut CoveringGraph, primes: Vec<NodeId>, config: &MinimizeConfig) -> Solution {
    let layout = *graph.layout();
    let mut prime_implicants = 0;
    for &id in &primes {
        let node = &mut graph[id];
        node.cost = layout.input_cost(&node.cube);
        node.uncovered = CubeList::from_cube(&node.cube);
        node.count = 0;
        if !node.status.contains(Status::DONT_CARE) {
            prime_implicants += 1;
        }
    }
    debug!("the function has {} prime implicants", prime_implicants);

    let count = primes.len();
    let mut solver = Solver {
        graph,
        layout,
        minimize_literals: config.minimize_literals,
        depth_limit: config.branch_depth_limit,
        primes,
        retained_end: 0,
        unretained_start: count,
        stack: Vec::with_capacity(count),
        pass: 0,
        odd_pass: 1,
        undecided: 0,
        depth: 0,
        max_depth: 0,
        heuristic: false,
    };

    let essentials = solver.extract_essentials();
    debug!("the function has {} essential prime implicants", essentials.len());

    solver.find_covering();
    solver.make_output_sparse();

    let retained = solver.primes[..solver.retained_end].to_vec();
    let (mut input_literals, mut output_literals) = (0, 0);
    for &id in &retained {
        let cube = &solver.graph[id].cube;
        input_literals += layout.input_cost(cube) as usize;
        output_literals += layout.output_cost(cube) as usize;
    }
    debug!(
        "the solution contains {} cubes, {} input and {} output literals",
        retained.len(),
        input_literals,
        output_literals
    );

    let stats = MinimizeStats {
        prime_implicants,
        essential_implicants: essentials.len(),
        solution_size: retained.len(),
        max_branching_depth: solver.max_depth,
        heuristic: solver.heuristic,
        input_literals,
        output_literals,
    };
    Solution {
        retained,
        essentials,
        stats,
    }
}

/// State of one covering run
struct Solver<'g> {
    graph: &'g mut CoveringGraph,
    layout: CubeLayout,
    minimize_literals: bool,
    depth_limit: usize,
    /// Every prime, ordered by zone
    primes: Vec<NodeId>,
    /// End of the retained zone
    retained_end: usize,
    /// Start of the unretained covered zone
    unretained_start: usize,
    /// Affected nodes waiting to be examined
    stack: Vec<NodeId>,
    /// Even stamp of the current walk
    pass: u64,
    /// `pass + 1`, stamped on nodes only scanned toward their descendants
    odd_pass: u64,
    /// Undecided nodes left in the middle zone after the last placement
    undecided: usize,
    depth: usize,
    max_depth: usize,
    heuristic: bool,
}

/// State of one node of a partition before branching
struct Snapshot {
    node: NodeId,
    status: Status,
    uncovered: CubeList,
}

impl Solver<'_> {
    /// Retain every DONT_CARE node and every essential prime
    fn extract_essentials(&mut self) -> Vec<NodeId> {
        let mut essentials = Vec::new();
        let mut i = self.retained_end;
        while i < self.unretained_start {
            let id = self.primes[i];
            let status = self.graph[id].status;
            if status.contains(Status::DONT_CARE) {
                self.retain_node(id);
                self.unretained_start -= 1;
                self.primes.swap(i, self.unretained_start);
                continue;
            }
            i += 1;
            if !status.contains(Status::BASIC) {
                continue;
            }
            self.graph[id].status.remove(Status::BASIC);

            let layout = self.layout;
            let node = &self.graph[id];
            let mut rest = CubeList::from_cube(&node.cube);
            for a in &node.ancestors {
                layout.disjoint_sharp(&mut rest, &self.graph[*a].cube);
            }
            for d in &node.descendants {
                if layout.disjoint_sharp(&mut rest, &self.graph[*d].cube) {
                    break;
                }
            }
            if !rest.is_empty() {
                self.retain_node(id);
                self.graph[id].status.insert(Status::PRIME_ESSENTIAL);
                essentials.push(id);
            }
        }
        essentials
    }

    /// Decide every node of the middle zone
    fn find_covering(&mut self) {
        loop {
            let Some(id) = self.stack.pop() else {
                self.place_nodes();
                trace!(
                    "depth {}: {} retained, {} undecided",
                    self.depth,
                    self.retained_end,
                    self.undecided
                );
                if self.undecided == 0 {
                    return;
                }
                if self.depth >= self.depth_limit {
                    let id = self.select_node();
                    self.retain_node(id);
                    self.heuristic = true;
                    continue;
                }
                break;
            };
            self.examine(id);
        }

        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        while self.undecided != 0 {
            self.branch();
        }
        self.depth -= 1;
    }

    /// Take the decisions a change in the neighbourhood of `id` allows
    fn examine(&mut self, id: NodeId) {
        if self.graph[id].status.contains(Status::AFFECTED_RETAINED) {
            if self.graph[id].uncovered.is_empty() {
                self.graph[id].status = Status::DECIDED_COVERED;
                return;
            }
            self.increment_pass(id);
            let uncovered = self.graph[id].uncovered.clone();
            if self.scan_inferior_ancestors(id, &uncovered, id)
                || self.scan_inferior_descendants(id, &uncovered, id)
            {
                return;
            }
            self.graph[id].status.remove(Status::AFFECTED_RETAINED);
        }

        if self.graph[id].status.contains(Status::AFFECTED_UNRETAIN) {
            self.increment_pass(id);
            let mut rest = self.graph[id].uncovered.clone();
            if self.scan_essential_ancestors(&mut rest, id)
                || self.scan_essential_descendants(&mut rest, id)
            {
                self.graph[id].status.remove(Status::AFFECTED_UNRETAIN);
                return;
            }
            self.retain_node(id);
        }
    }

    /// Solve one partition of the undecided nodes by trying both decisions on
    /// one of its nodes
    fn branch(&mut self) {
        let start = match self.primes[self.retained_end..self.unretained_start]
            .iter()
            .find(|id| !self.graph[**id].status.contains(Status::DECIDED))
        {
            Some(id) => *id,
            None => crate::fatal!("{} undecided nodes counted but none found", self.undecided),
        };
        self.increment_pass(start);
        let size = 1 + self.scan_partition(start);
        trace!("partition of {} nodes at branching depth {}", size, self.depth);

        let mut saved = Vec::with_capacity(size);
        let mut partition_end = self.retained_end;
        for i in self.retained_end..self.unretained_start {
            let id = self.primes[i];
            let node = &self.graph[id];
            if node.count == self.pass {
                saved.push(Snapshot {
                    node: id,
                    status: node.status,
                    uncovered: node.uncovered.clone(),
                });
                self.primes.swap(i, partition_end);
                partition_end += 1;
            }
        }

        let retained_end = self.retained_end;
        let unretained_start = self.unretained_start;
        self.unretained_start = partition_end;

        let branching = self.select_node();
        trace!("branching on {}: unretained", branching);
        self.unretain_inferior_node(branching);
        self.find_covering();

        for snapshot in saved.iter_mut() {
            let node = &mut self.graph[snapshot.node];
            std::mem::swap(&mut node.status, &mut snapshot.status);
            std::mem::swap(&mut node.uncovered, &mut snapshot.uncovered);
        }

        self.retained_end = retained_end;
        self.unretained_start = partition_end;
        trace!("branching on {}: retained", branching);
        self.retain_node(branching);
        self.find_covering();

        let (mut retain_count, mut retain_cost) = (0, 0);
        let (mut unretain_count, mut unretain_cost) = (0, 0);
        for snapshot in &saved {
            let node = &self.graph[snapshot.node];
            if node.status.contains(Status::RETAINED) {
                retain_count += 1;
                retain_cost += node.cost;
            }
            if snapshot.status.contains(Status::RETAINED) {
                unretain_count += 1;
                unretain_cost += node.cost;
            }
        }

        let unretain_wins = unretain_count < retain_count
            || (unretain_count == retain_count && unretain_cost < retain_cost);
        if unretain_wins {
            trace!(
                "unretaining {} is better: {} cubes against {}",
                branching,
                unretain_count,
                retain_count
            );
            for snapshot in saved {
                let node = &mut self.graph[snapshot.node];
                node.status = snapshot.status;
                node.uncovered = snapshot.uncovered;
            }
        }

        self.retained_end = retained_end;
        self.unretained_start = unretained_start;
        self.place_nodes();
    }

    /// Keep on each retained node only the outputs nothing else provides
    fn make_output_sparse(&mut self) {
        let mut i = 0;
        while i < self.retained_end {
            let id = self.primes[i];
            let mut rest = CubeList::from_cube(&self.graph[id].cube);
            self.increment_pass(id);
            self.scan_sparse_ancestors(&mut rest, id);
            self.scan_sparse_descendants(&mut rest, id);

            if rest.is_empty() {
                if !self.heuristic {
                    crate::fatal!("the solution is redundant: {} is covered by the others", id);
                }
                debug!("dropping redundant cube {}", id);
                self.graph[id].status = Status::DECIDED_COVERED;
                self.retained_end -= 1;
                self.primes.swap(i, self.retained_end);
                continue;
            }

            let layout = self.layout;
            let cube = &mut self.graph[id].cube;
            layout.clear_outputs(cube);
            for part in rest.iter() {
                layout.or_outputs(cube, part);
            }
            i += 1;
        }
    }
}

//! Decisions on single nodes and bookkeeping of the prime vector

use super::scan::Propagation;
use super::Solver;
use crate::graph::{NodeId, Status};

/// Score of an undecided neighbour a decision would only partly affect
const AFFECTED_SCORE: u32 = 1;
/// Score of an undecided neighbour a decision would entirely cover
const COVERED_SCORE: u32 = 4;

impl Solver<'_> {
    /// Put `id` in the solution and update the nodes it covers
    pub(super) fn retain_node(&mut self, id: NodeId) {
        let node = &mut self.graph[id];
        node.uncovered.clear();
        node.status = Status::DECIDED_RETAINED | (node.status & Status::DONT_CARE);
        let cube = node.cube.clone();

        self.increment_pass(id);
        self.scan_affected_ancestors(Propagation::Retained, &cube, id);
        self.scan_affected_descendants(Propagation::Retained, &cube, id);
    }

    /// Leave `id` out of the solution; its neighbours may become essential
    pub(super) fn unretain_inferior_node(&mut self, id: NodeId) {
        self.graph[id].status = Status::DECIDED_INFERIOR;
        let cube = self.graph[id].cube.clone();

        self.increment_pass(id);
        self.scan_affected_ancestors(Propagation::Unretained, &cube, id);
        self.scan_affected_descendants(Propagation::Unretained, &cube, id);
    }

    /// Move covered nodes of the middle zone to the zone they belong to
    ///
    /// Retained nodes join the front zone and unretained covered nodes the
    /// back zone. Undecided and inferior nodes stay in the middle, where they
    /// are counted into `undecided`.
    pub(super) fn place_nodes(&mut self) {
        let mut i = self.retained_end;
        while i < self.unretained_start {
            let status = self.graph[self.primes[i]].status;
            if !status.contains(Status::COVERED) {
                i += 1;
            } else if status.contains(Status::RETAINED) {
                self.primes.swap(i, self.retained_end);
                self.retained_end += 1;
                i = i.max(self.retained_end);
            } else {
                self.unretained_start -= 1;
                self.primes.swap(i, self.unretained_start);
            }
        }

        self.undecided = self.primes[self.retained_end..self.unretained_start]
            .iter()
            .filter(|id| !self.graph[**id].status.contains(Status::DECIDED))
            .count();
    }

    /// Pick the undecided node whose decision affects the most undecided
    /// neighbours
    pub(super) fn select_node(&self) -> NodeId {
        let mut best: Option<(NodeId, u32)> = None;
        for &id in &self.primes[self.retained_end..self.unretained_start] {
            let node = &self.graph[id];
            if node.status.contains(Status::DECIDED) {
                continue;
            }
            let mut value = 0;
            for &other in node.ancestors.iter().chain(&node.descendants) {
                let other = &self.graph[other];
                if other.status.contains(Status::DECIDED)
                    || !self.layout.intersect_list(&node.cube, &other.uncovered)
                {
                    continue;
                }
                value += if self.layout.covers_list(&node.cube, &other.uncovered) {
                    COVERED_SCORE
                } else {
                    AFFECTED_SCORE
                };
            }
            if best.map_or(true, |(_, best_value)| value > best_value) {
                best = Some((id, value));
            }
        }
        match best {
            Some((id, _)) => id,
            None => crate::fatal!("partition with no undecided node"),
        }
    }

    /// Start a new walk from `current`
    pub(super) fn increment_pass(&mut self, current: NodeId) {
        self.pass = match self.pass.checked_add(2) {
            Some(pass) => pass,
            None => {
                for &id in &self.primes {
                    self.graph[id].count = 0;
                }
                2
            }
        };
        self.odd_pass = self.pass | 1;
        self.graph[current].count = self.pass;
    }

    /// Schedule an undecided node for examination
    pub(super) fn mark_affected(&mut self, id: NodeId, flag: Status) {
        let node = &mut self.graph[id];
        if !node.status.intersects(Status::AFFECTED) {
            if self.stack.len() == self.primes.len() {
                crate::fatal!("affected nodes stack is full when pushing {}", id);
            }
            self.stack.push(id);
        }
        node.status.insert(flag);
    }
}

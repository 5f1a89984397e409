//! Validation of a generated covering graph
//!
//! Expensive, meant for tests and debugging. Checks link symmetry, that linked
//! nodes intersect, that every node not covered by its ancestors is marked
//! BASIC, and that every node intersecting a given node can be reached from it
//! through a chain of neighbours that intersect it.

use std::collections::HashSet;
use std::fmt;

use super::{CoveringGraph, NodeId, Status};
use crate::cube::CubeList;

/// First problem found by [`CoveringGraph::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphViolation {
    /// A link points at a node that no longer exists
    Dangling {
        /// Node holding the link
        node: NodeId,
        /// Released node it points at
        target: NodeId,
    },
    /// A link has no matching back-reference
    Asymmetric {
        /// Node holding the link
        node: NodeId,
        /// Node missing the back-reference
        target: NodeId,
    },
    /// The same link appears twice
    DuplicateEdge {
        /// Node holding the duplicate
        node: NodeId,
        /// Target of the duplicated link
        target: NodeId,
    },
    /// A node is linked to itself
    SelfLink {
        /// Offending node
        node: NodeId,
    },
    /// Two linked nodes do not intersect
    Disjoint {
        /// First node
        node: NodeId,
        /// Linked node
        target: NodeId,
    },
    /// A node not covered by its ancestors is not marked BASIC
    NotBasic {
        /// Offending node
        node: NodeId,
    },
    /// Two intersecting nodes cannot reach each other
    Unrelated {
        /// Start of the walk
        node: NodeId,
        /// Intersecting node that was not reached
        target: NodeId,
    },
}

impl fmt::Display for GraphViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphViolation::Dangling { node, target } => {
                write!(f, "node {} links to released node {}", node, target)
            }
            GraphViolation::Asymmetric { node, target } => {
                write!(f, "node {} links to {} without a link back", node, target)
            }
            GraphViolation::DuplicateEdge { node, target } => {
                write!(f, "node {} links to {} twice", node, target)
            }
            GraphViolation::SelfLink { node } => write!(f, "node {} links to itself", node),
            GraphViolation::Disjoint { node, target } => {
                write!(f, "nodes {} and {} are related but disjoint", node, target)
            }
            GraphViolation::NotBasic { node } => {
                write!(f, "node {} is not covered by its ancestors but is not basic", node)
            }
            GraphViolation::Unrelated { node, target } => {
                write!(f, "nodes {} and {} intersect but are not related", node, target)
            }
        }
    }
}

impl std::error::Error for GraphViolation {}

impl CoveringGraph {
    /// Validate the graph built over `nodes`
    pub fn check(&self, nodes: &[NodeId]) -> Result<(), GraphViolation> {
        for &node in nodes {
            if !self.contains(node) {
                return Err(GraphViolation::Dangling { node, target: node });
            }
            self.check_links(node)?;
        }

        let layout = self.layout();
        for &node in nodes {
            let n = &self[node];
            if n.status.contains(Status::DONT_CARE) || n.status.contains(Status::BASIC) {
                continue;
            }
            let mut rest = CubeList::from_cube(&n.cube);
            let covered = n
                .ancestors
                .iter()
                .any(|a| layout.disjoint_sharp(&mut rest, &self[*a].cube));
            if !covered {
                return Err(GraphViolation::NotBasic { node });
            }
        }

        for &node in nodes {
            let reached = self.reach(node);
            let cube = &self[node].cube;
            for &other in nodes {
                if layout.intersect(cube, &self[other].cube) && !reached.contains(&other) {
                    return Err(GraphViolation::Unrelated {
                        node,
                        target: other,
                    });
                }
            }
        }
        Ok(())
    }

    fn check_links(&self, node: NodeId) -> Result<(), GraphViolation> {
        let n = &self[node];
        for (links, back) in [(&n.ancestors, true), (&n.descendants, false)] {
            for (i, &target) in links.iter().enumerate() {
                if target == node {
                    return Err(GraphViolation::SelfLink { node });
                }
                if links[..i].contains(&target) {
                    return Err(GraphViolation::DuplicateEdge { node, target });
                }
                if !self.contains(target) {
                    return Err(GraphViolation::Dangling { node, target });
                }
                let t = &self[target];
                let back_links = if back { &t.descendants } else { &t.ancestors };
                if !back_links.contains(&node) {
                    return Err(GraphViolation::Asymmetric { node, target });
                }
                if !self.layout().intersect(&n.cube, &t.cube) {
                    return Err(GraphViolation::Disjoint { node, target });
                }
            }
        }
        Ok(())
    }

    /// Nodes intersecting `start` reachable from it through intersecting nodes
    fn reach(&self, start: NodeId) -> HashSet<NodeId> {
        let layout = self.layout();
        let cube = &self[start].cube;
        let mut reached = HashSet::from([start]);
        let mut pending = vec![start];
        while let Some(current) = pending.pop() {
            let n = &self[current];
            for &next in n.ancestors.iter().chain(&n.descendants) {
                if !reached.contains(&next) && layout.intersect(cube, &self[next].cube) {
                    reached.insert(next);
                    pending.push(next);
                }
            }
        }
        reached
    }
}

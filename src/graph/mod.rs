//! The covering graph
//!
//! Every prime implicant candidate is a [`Node`] holding its cube together with
//! two adjacency lists, `ancestors` and `descendants`, that link it to the other
//! nodes whose cubes intersect it. The relation is kept symmetric by every
//! surgery operation: if `a` lists `b` as an ancestor then `b` lists `a` as a
//! descendant. There are no duplicate edges and no self links.
//!
//! Nodes live in a [`Pool`] and refer to each other through [`NodeId`]s. A
//! back-reference that should exist but does not is graph corruption and aborts
//! through [`fatal!`](crate::fatal).

mod check;


use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Index, IndexMut};

use crate::arena::{Id, Pool};
use crate::cube::{CoverRelation, Cube, CubeLayout, CubeList};

pub use check::GraphViolation;

/// Handle to a node of a [`CoveringGraph`]
pub type NodeId = Id<Node>;

/// Status flags of a node
///
/// The composite values combine the flags a node carries once a decision about
/// it has been taken.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Status(u16);

impl Status {
    pub const EMPTY: Status = Status(0);
    /// Not covered by the union of its ancestors; candidate for essentiality
    pub const BASIC: Status = Status(1);
    /// Nothing of the cube is left to cover
    pub const COVERED: Status = Status(2);
    /// Part of the solution
    pub const RETAINED: Status = Status(4);
    /// No further decision will be taken about the node
    pub const DECIDED: Status = Status(8);
    /// A retained neighbour changed what this node still has to cover
    pub const AFFECTED_RETAINED: Status = Status(16);
    /// An unretained neighbour may have made this node essential
    pub const AFFECTED_UNRETAIN: Status = Status(32);
    /// Either affected flag
    pub const AFFECTED: Status = Status(48);
    /// Retained because nothing else covers part of it
    pub const PRIME_ESSENTIAL: Status = Status(64);
    /// Holds only don't care outputs; always retained, never printed
    pub const DONT_CARE: Status = Status(128);

    pub const DECIDED_RETAINED: Status = Status(2 | 4 | 8);
    pub const DECIDED_COVERED: Status = Status(2 | 8);
    pub const DECIDED_INFERIOR: Status = Status(8);

    pub fn bits(self) -> u16 {
        self.0
    }

    /// True iff every flag of `other` is set
    pub fn contains(self, other: Status) -> bool {
        self.0 & other.0 == other.0
    }

    /// True iff some flag of `other` is set
    pub fn intersects(self, other: Status) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Status) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Status) {
        self.0 &= !other.0;
    }
}

impl BitOr for Status {
    type Output = Status;

    fn bitor(self, rhs: Status) -> Status {
        Status(self.0 | rhs.0)
    }
}

impl BitAnd for Status {
    type Output = Status;

    fn bitand(self, rhs: Status) -> Status {
        Status(self.0 & rhs.0)
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Status) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Status, &str); 8] = [
            (Status::BASIC, "BASIC"),
            (Status::COVERED, "COVERED"),
            (Status::RETAINED, "RETAINED"),
            (Status::DECIDED, "DECIDED"),
            (Status::AFFECTED_RETAINED, "AFFECTED_RETAINED"),
            (Status::AFFECTED_UNRETAIN, "AFFECTED_UNRETAIN"),
            (Status::PRIME_ESSENTIAL, "PRIME_ESSENTIAL"),
            (Status::DONT_CARE, "DONT_CARE"),
        ];
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        if first {
            write!(f, "EMPTY")?;
        }
        Ok(())
    }
}

/// A prime implicant candidate
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) cube: Cube,
    pub(crate) status: Status,
    /// Input literal count, set when solving starts
    pub(crate) cost: u32,
    /// Part of the cube not yet covered by retained nodes
    pub(crate) uncovered: CubeList,
    /// Last traversal pass that visited the node
    pub(crate) count: u64,
    pub(crate) ancestors: Vec<NodeId>,
    pub(crate) descendants: Vec<NodeId>,
}

impl Node {
    pub fn new(cube: Cube) -> Self {
        let stride = cube.len();
        Node {
            cube,
            status: Status::EMPTY,
            cost: 0,
            uncovered: CubeList::new(stride),
            count: 0,
            ancestors: Vec::new(),
            descendants: Vec::new(),
        }
    }

    pub fn cube(&self) -> &Cube {
        &self.cube
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn uncovered(&self) -> &CubeList {
        &self.uncovered
    }

    pub fn ancestors(&self) -> &[NodeId] {
        &self.ancestors
    }

    pub fn descendants(&self) -> &[NodeId] {
        &self.descendants
    }
}

/// Nodes of one minimization run and the links between them
#[derive(Debug)]
pub struct CoveringGraph {
    layout: CubeLayout,
    nodes: Pool<Node>,
}

impl CoveringGraph {
    pub fn new(layout: CubeLayout) -> Self {
        CoveringGraph {
            layout,
            nodes: Pool::new(),
        }
    }

    pub fn layout(&self) -> &CubeLayout {
        &self.layout
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.live()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.live() == 0
    }

    /// Largest number of nodes alive at once
    pub fn peak(&self) -> usize {
        self.nodes.peak()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id)
    }

    /// Handles of every live node
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.ids()
    }

    pub fn add_node(&mut self, cube: Cube) -> NodeId {
        debug_assert_eq!(cube.len(), self.layout.words());
        self.nodes.alloc(Node::new(cube))
    }

    /// Release a node that has no links left
    pub fn remove_node(&mut self, id: NodeId) -> Node {
        let node = &self.nodes[id];
        if !node.ancestors.is_empty() || !node.descendants.is_empty() {
            crate::fatal!(
                "node {} released with {} ancestors and {} descendants",
                id,
                node.ancestors.len(),
                node.descendants.len()
            );
        }
        self.nodes.free(id)
    }

    /// Record `ancestor` as an ancestor of `descendant`
    pub fn link(&mut self, ancestor: NodeId, descendant: NodeId) {
        if ancestor == descendant || self.nodes[ancestor].descendants.contains(&descendant) {
            return;
        }
        self.nodes[ancestor].descendants.push(descendant);
        self.nodes[descendant].ancestors.push(ancestor);
    }

    /// Place the star product of `n0` and `n1` in the graph
    ///
    /// Depending on which of the two parents the merged cube covers, a new node
    /// is created below both of them, or a covered parent takes the merged cube
    /// in place. Returns the node now holding `merged` and the relation that
    /// decided it: with [`CoverRelation::First`] or [`CoverRelation::Both`] the
    /// returned node is `n0`, with [`CoverRelation::Second`] it is `n1`, and with
    /// [`CoverRelation::Both`] `n1` has been released.
    pub fn merge_and_link(&mut self, n0: NodeId, n1: NodeId, merged: Cube) -> (NodeId, CoverRelation) {
        let relation = self
            .layout
            .cover_relation(&merged, &self.nodes[n0].cube, &self.nodes[n1].cube);

        let node = match relation {
            CoverRelation::Neither => {
                let node = self.add_node(merged);
                self.link(n0, node);
                self.link(n1, node);
                node
            }
            CoverRelation::Both => {
                let status = self.nodes[n1].status;
                let target = &mut self.nodes[n0];
                target.status |= status;
                target.cube = merged;
                self.pass_ancestors(n1, n0);
                self.pass_descendants(n1, n0);
                self.remove_node(n1);
                n0
            }
            CoverRelation::First => {
                self.nodes[n0].cube = merged;
                self.link(n1, n0);
                n0
            }
            CoverRelation::Second => {
                self.nodes[n1].cube = merged;
                self.link(n0, n1);
                n1
            }
        };
        (node, relation)
    }

    /// Move every descendant link of `from` onto `to`
    ///
    /// The matching ancestor entry of each descendant is rewritten. A link that
    /// `to` already has, or one that would point `to` at itself, is dropped on
    /// both sides instead.
    pub fn pass_descendants(&mut self, from: NodeId, to: NodeId) {
        let descendants = std::mem::take(&mut self.nodes[from].descendants);
        for d in descendants {
            if d == to {
                self.unlink_back_reference(to, from, Direction::Ancestors);
                continue;
            }
            let duplicate = self.nodes[to].descendants.contains(&d);
            let ancestors = &mut self.nodes[d].ancestors;
            let Some(pos) = ancestors.iter().position(|a| *a == from) else {
                crate::fatal!(
                    "node {} lists {} as descendant but {} has no matching ancestor",
                    from,
                    d,
                    d
                );
            };
            if duplicate {
                ancestors.remove(pos);
            } else {
                ancestors[pos] = to;
                self.nodes[to].descendants.push(d);
            }
        }
    }

    /// Move every ancestor link of `from` onto `to`
    pub fn pass_ancestors(&mut self, from: NodeId, to: NodeId) {
        let ancestors = std::mem::take(&mut self.nodes[from].ancestors);
        for a in ancestors {
            if a == to {
                self.unlink_back_reference(to, from, Direction::Descendants);
                continue;
            }
            let duplicate = self.nodes[to].ancestors.contains(&a);
            let descendants = &mut self.nodes[a].descendants;
            let Some(pos) = descendants.iter().position(|d| *d == from) else {
                crate::fatal!(
                    "node {} lists {} as ancestor but {} has no matching descendant",
                    from,
                    a,
                    a
                );
            };
            if duplicate {
                descendants.remove(pos);
            } else {
                descendants[pos] = to;
                self.nodes[to].ancestors.push(a);
            }
        }
    }

    /// Drop every ancestor link of `node`
    pub fn remove_ancestors(&mut self, node: NodeId) {
        let ancestors = std::mem::take(&mut self.nodes[node].ancestors);
        for a in ancestors {
            self.unlink_back_reference(a, node, Direction::Descendants);
        }
    }

    /// Remove `victim`, which `survivor` covers
    ///
    /// The descendants of the victim move to the survivor, its ancestor links
    /// are dropped and its status flags are merged into the survivor.
    pub fn absorb_and_unlink(&mut self, survivor: NodeId, victim: NodeId) {
        self.pass_descendants(victim, survivor);
        self.remove_ancestors(victim);
        let status = self.nodes[victim].status;
        self.nodes[survivor].status |= status;
        self.remove_node(victim);
    }

    /// Remove the entry for `other` from one adjacency list of `owner`
    fn unlink_back_reference(&mut self, owner: NodeId, other: NodeId, direction: Direction) {
        let list = match direction {
            Direction::Ancestors => &mut self.nodes[owner].ancestors,
            Direction::Descendants => &mut self.nodes[owner].descendants,
        };
        match list.iter().position(|n| *n == other) {
            Some(pos) => {
                list.remove(pos);
            }
            None => crate::fatal!(
                "inconsistency in the graph: node {} has no {} link back to {}",
                owner,
                direction,
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Ancestors,
    Descendants,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ancestors => write!(f, "ancestor"),
            Direction::Descendants => write!(f, "descendant"),
        }
    }
}

impl Index<NodeId> for CoveringGraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }
}

impl IndexMut<NodeId> for CoveringGraph {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }
}

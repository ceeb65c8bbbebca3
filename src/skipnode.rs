use std::{borrow::Borrow, cmp::Ordering, fmt, iter};

/// Index of a node within its [`Nodes`] arena.
pub type NodeId = usize;

/// The head sentinel always occupies the first slot.
pub const HEAD: NodeId = 0;

/// The tail sentinel always occupies the second slot.
pub const TAIL: NodeId = 1;

// ////////////////////////////////////////////////////////////////////////////
// Rank
// ////////////////////////////////////////////////////////////////////////////

/// What a node holds.
///
/// The variants are declared in order, so the derived ordering compares the
/// variant first and the value second: the head sentinel is less than every
/// value node, and the tail sentinel is greater than every value node.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank<T> {
    /// The head sentinel.
    Head,
    /// A node holding a stored value.
    Value(T),
    /// The tail sentinel.
    Tail,
}

impl<T> Rank<T> {
    /// Compare this node against a search key.
    pub fn cmp_key<Q>(&self, key: &Q) -> Ordering
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match *self {
            Rank::Head => Ordering::Less,
            Rank::Value(ref value) => Ord::cmp(Borrow::<Q>::borrow(value), key),
            Rank::Tail => Ordering::Greater,
        }
    }

    /// Returns the stored value, if this is a value node.
    pub fn value(&self) -> Option<&T> {
        match *self {
            Rank::Value(ref value) => Some(value),
            Rank::Head | Rank::Tail => None,
        }
    }

    /// Consumes the rank returning the value it contains.
    pub fn into_value(self) -> Option<T> {
        match self {
            Rank::Value(value) => Some(value),
            Rank::Head | Rank::Tail => None,
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// SkipNode
// ////////////////////////////////////////////////////////////////////////////

/// SkipNodes make up the SkipSet.  Nodes do not own each other; every node is
/// owned by the [`Nodes`] arena and links refer to other nodes by index.
///
/// `links` is the node's tower: `links[level]` is the next node at `level`,
/// and `links.len()` is the number of levels the node takes part in.  The
/// tower height of a value node is fixed when it is created.
#[derive(Clone, Debug)]
pub struct SkipNode<T> {
    /// The sentinel or value held by this node.
    pub rank: Rank<T>,
    /// Forward links, one per level, lowest level first.
    pub links: Vec<NodeId>,
}

impl<T> SkipNode<T> {
    /// Create a new head node whose `total` links all point at the tail.
    pub fn head(total: usize) -> Self {
        SkipNode {
            rank: Rank::Head,
            links: iter::repeat_n(TAIL, total).collect(),
        }
    }

    /// Create a new tail node.  The tail has no links.
    pub fn tail() -> Self {
        SkipNode {
            rank: Rank::Tail,
            links: Vec::new(),
        }
    }

    /// Create a new value node with a tower of `height` links.  All links
    /// default to the tail and must be spliced in by the caller.
    pub fn new(value: T, height: usize) -> Self {
        SkipNode {
            rank: Rank::Value(value),
            links: iter::repeat_n(TAIL, height).collect(),
        }
    }

    /// The number of levels this node takes part in.
    pub fn height(&self) -> usize {
        self.links.len()
    }

    /// The next node at the given level.
    pub fn next(&self, level: usize) -> NodeId {
        match self.links.get(level) {
            Some(&next) => next,
            None => unreachable!("level {level} is above a tower of {}", self.height()),
        }
    }

    /// Re-point the link at the given level.
    pub fn set_next(&mut self, level: usize, next: NodeId) {
        match self.links.get_mut(level) {
            Some(link) => *link = next,
            None => unreachable!("level {level} is above a tower of {}", self.links.len()),
        }
    }
}

impl<T> fmt::Display for SkipNode<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(value) = self.rank.value() {
            write!(f, "{value}")
        } else {
            Ok(())
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Nodes
// ////////////////////////////////////////////////////////////////////////////

/// Arena owning every node of a set, sentinels included.
///
/// Slot [`HEAD`] holds the head sentinel and slot [`TAIL`] the tail sentinel;
/// neither is ever released.  Released slots are recycled by later
/// allocations.
#[derive(Clone, Debug)]
pub struct Nodes<T> {
    slots: Vec<Option<SkipNode<T>>>,
    vacant: Vec<NodeId>,
}

impl<T> Nodes<T> {
    /// Create an arena holding only the two sentinels, the head having a tower
    /// of `total` links.
    pub fn new(total: usize) -> Self {
        Nodes {
            slots: vec![Some(SkipNode::head(total)), Some(SkipNode::tail())],
            vacant: Vec::new(),
        }
    }

    /// The node stored at `id`.
    pub fn get(&self, id: NodeId) -> &SkipNode<T> {
        match self.slots.get(id) {
            Some(Some(node)) => node,
            _ => unreachable!("link to released node {id}"),
        }
    }

    /// The node stored at `id`, mutably.
    pub fn get_mut(&mut self, id: NodeId) -> &mut SkipNode<T> {
        match self.slots.get_mut(id) {
            Some(Some(node)) => node,
            _ => unreachable!("link to released node {id}"),
        }
    }

    /// Store a node, returning its index.
    pub fn alloc(&mut self, node: SkipNode<T>) -> NodeId {
        if let Some(id) = self.vacant.pop() {
            if let Some(slot) = self.slots.get_mut(id) {
                *slot = Some(node);
                return id;
            }
        }
        self.slots.push(Some(node));
        self.slots.len() - 1
    }

    /// Take a node out of the arena, vacating its slot.
    ///
    /// The caller must have unlinked the node at every level beforehand.
    pub fn release(&mut self, id: NodeId) -> SkipNode<T> {
        debug_assert!(id != HEAD && id != TAIL, "sentinels are never released");
        match self.slots.get_mut(id).and_then(Option::take) {
            Some(node) => {
                self.vacant.push(id);
                node
            }
            None => unreachable!("node {id} released twice"),
        }
    }

    /// Drop every value node, in order, and shrink the arena back to the two
    /// sentinels with the head pointing at the tail on every level.
    pub fn clear(&mut self) {
        let mut next = self.get(HEAD).next(0);
        while next != TAIL {
            next = match self.slots.get_mut(next).and_then(Option::take) {
                Some(node) => node.next(0),
                None => unreachable!("link to released node {next}"),
            };
        }
        self.slots.truncate(2);
        self.slots.shrink_to_fit();
        self.vacant.clear();
        self.vacant.shrink_to_fit();
        for link in &mut self.get_mut(HEAD).links {
            *link = TAIL;
        }
    }

    /// Iterate over the nodes of a level, in order, starting after the head
    /// and stopping before the tail.
    pub fn level(&self, level: usize) -> Level<'_, T> {
        Level {
            nodes: self,
            level,
            next: self.get(HEAD).next(level),
        }
    }

    /// The number of occupied slots, sentinels included.
    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// The number of slots, occupied or vacant, and the number of vacant
    /// slots awaiting reuse.
    #[cfg(test)]
    pub fn footprint(&self) -> (usize, usize) {
        (self.slots.len(), self.vacant.len())
    }
}

/// Iterator over the nodes of a single level.
pub struct Level<'a, T> {
    nodes: &'a Nodes<T>,
    level: usize,
    next: NodeId,
}

impl<'a, T> Iterator for Level<'a, T> {
    type Item = (NodeId, &'a SkipNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == TAIL {
            return None;
        }
        let id = self.next;
        let node = self.nodes.get(id);
        self.next = node.next(self.level);
        Some((id, node))
    }
}

//! An ordered set without duplicates, backed by a skiplist.

use std::{borrow::Borrow, cmp::Ordering, fmt, iter};

use crate::{
    error::Error,
    level_generator::{Geometric, LevelGenerator, geometric::DEFAULT_P},
    skipnode::{HEAD, NodeId, Nodes, Rank, SkipNode, TAIL},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipSet
// ////////////////////////////////////////////////////////////////////////////

/// The skipset provides a way of storing elements such that they are always
/// sorted and never duplicated, while offering `O(log(n))` expected time
/// search, insertion and removal.
///
/// Each stored value lives in a node with a tower of forward links, one per
/// level the node takes part in.  The height of the tower is drawn from the
/// set's [`LevelGenerator`] when the value is inserted and never changes.
/// Level 0 links every node in order; each higher level links a random
/// subset of the level below.
///
/// The set relies on `T`'s [`Ord`] implementation being a total order.
pub struct SkipSet<T, G = Geometric> {
    /// Every node, including the head and tail sentinels.
    nodes: Nodes<T>,
    /// Number of levels currently in use.  Searches start from the top of
    /// these; the head's links above are always the tail.
    level: usize,
    /// Number of values stored.
    len: usize,
    level_generator: G,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> SkipSet<T>
where
    T: Ord,
{
    /// Create a new skipset with the default number of 16 levels and a
    /// promotion probability of 1/2.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset: SkipSet<i64> = SkipSet::new();
    /// assert!(skipset.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default())
    }

    /// Constructs a new, empty skipset with the optimal number of levels for
    /// the intended capacity.  Specifically, it uses `floor(log2(capacity))`
    /// number of levels (and at least one), ensuring that only *a few* nodes
    /// occupy the highest level.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::with_capacity(100);
    /// skipset.extend(0..100);
    /// assert_eq!(skipset.len(), 100);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let levels = capacity
            .checked_ilog2()
            .and_then(|bits| usize::try_from(bits).ok())
            .map_or(1, |levels| levels.max(1));
        Self::with_level_generator(Geometric::new(levels, DEFAULT_P).unwrap_or_default())
    }
}

impl<T, G> SkipSet<T, G>
where
    T: Ord,
    G: LevelGenerator,
{
    /// Create a new skipset whose tower heights are drawn from the given
    /// level generator.  The head sentinel has one link for each of the
    /// generator's levels.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{Geometric, SkipSet};
    ///
    /// let generator = Geometric::with_seed(8, 0.25, 0x1234_abcd)?;
    /// let mut skipset = SkipSet::with_level_generator(generator);
    /// skipset.insert("a")?;
    /// assert!(skipset.contains("a"));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        SkipSet {
            nodes: Nodes::new(level_generator.total().max(1)),
            level: 0,
            len: 0,
            level_generator,
        }
    }

    /// Returns a reference to the stored value equal to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such value is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{Error, SkipSet};
    ///
    /// let mut skipset = SkipSet::new();
    /// skipset.extend([1, 10, 100]);
    /// assert_eq!(skipset.find(&10), Ok(&10));
    /// assert_eq!(skipset.find(&0), Err(Error::NotFound));
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Result<&T, Error>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let pred = self.descend(key, |_, _| {});
        let candidate = self.nodes.get(self.nodes.get(pred).next(0));
        match candidate.rank {
            Rank::Value(ref value) if Borrow::<Q>::borrow(value) == key => Ok(value),
            _ => Err(Error::NotFound),
        }
    }

    /// Returns `true` if a value equal to `key` is stored in the skipset.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// skipset.extend(0..10);
    /// assert!(skipset.contains(&4));
    /// assert!(!skipset.contains(&15));
    /// ```
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_ok()
    }

    /// Insert the value into the skipset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if an equal value is already stored.
    /// The skipset is left untouched and `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::{Error, SkipSet};
    ///
    /// let mut skipset = SkipSet::new();
    ///
    /// assert_eq!(skipset.insert(0), Ok(()));
    /// assert_eq!(skipset.insert(5), Ok(()));
    /// assert_eq!(skipset.insert(5), Err(Error::AlreadyExists));
    /// assert_eq!(skipset.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        let update = self.predecessors(&value);
        let pred = update.first().copied().unwrap_or(HEAD);
        let successor = self.nodes.get(pred).next(0);
        if self.nodes.get(successor).rank.cmp_key(&value) == Ordering::Equal {
            return Err(Error::AlreadyExists);
        }

        let height = self.level_generator.level() + 1;
        debug_assert!(
            height <= update.len(),
            "level generator exceeded its {} levels",
            update.len()
        );
        let height = height.min(update.len());
        // Levels between the old top and the new one have the head as their
        // predecessor, which `update` already holds.
        self.level = self.level.max(height);

        let id = self.nodes.alloc(SkipNode::new(value, height));
        for (level, &pred) in update.iter().enumerate().take(height) {
            let next = self.nodes.get(pred).next(level);
            self.nodes.get_mut(id).set_next(level, next);
            self.nodes.get_mut(pred).set_next(level, id);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the value equal to `key`, or `None` if there is no
    /// such value in the skipset.  Removing an absent value leaves the skipset
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// skipset.extend(0..10);
    /// assert_eq!(skipset.remove(&4), Some(4));
    /// assert!(skipset.remove(&4).is_none());
    /// assert_eq!(skipset.len(), 9);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let update = self.predecessors(key);
        let pred = update.first().copied().unwrap_or(HEAD);
        let target = self.nodes.get(pred).next(0);
        if self.nodes.get(target).rank.cmp_key(key) != Ordering::Equal {
            return None;
        }

        // Every level the node takes part in must be repaired before the node
        // is released.
        let height = self.nodes.get(target).height();
        for (level, &pred) in update.iter().enumerate().take(height) {
            debug_assert_eq!(
                self.nodes.get(pred).next(level),
                target,
                "predecessor at level {level} does not link to the removed node"
            );
            let next = self.nodes.get(target).next(level);
            self.nodes.get_mut(pred).set_next(level, next);
        }
        self.len -= 1;
        self.nodes.release(target).rank.into_value()
    }

    /// Returns the predecessor of `key` at every level: the last node, at each
    /// level, whose value is strictly less than `key`.
    ///
    /// The returned vector has one entry per head link.  Levels at or above
    /// the current top hold the head.
    fn predecessors<Q>(&self, key: &Q) -> Vec<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut update = vec![HEAD; self.nodes.get(HEAD).height()];
        self.descend(key, |level, node| {
            if let Some(slot) = update.get_mut(level) {
                *slot = node;
            }
        });
        update
    }

    /// Descend from the top level down to level 0, stepping forward at each
    /// level while the next node is less than `key`.  Before dropping a level,
    /// `visit` is called with the level and the node the descent stopped at.
    ///
    /// Returns the predecessor of `key` at level 0.
    fn descend<Q>(&self, key: &Q, mut visit: impl FnMut(usize, NodeId)) -> NodeId
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = HEAD;
        for level in (0..self.level).rev() {
            loop {
                let next = self.nodes.get(current).next(level);
                if self.nodes.get(next).rank.cmp_key(key) == Ordering::Less {
                    current = next;
                } else {
                    break;
                }
            }
            visit(level, current);
        }
        current
    }
}

impl<T, G> SkipSet<T, G> {
    /// Clears the skipset, removing all values.
    ///
    /// The current top level is reset as well, so a cleared skipset behaves
    /// exactly like a newly created one.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// skipset.extend(0..10);
    /// skipset.clear();
    /// assert!(skipset.is_empty());
    /// assert_eq!(skipset.height(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.level = 0;
        self.len = 0;
    }

    /// Returns the number of elements in the skipset.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// skipset.extend(0..10);
    /// assert_eq!(skipset.len(), 10);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skipset contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use skipset::SkipSet;
    ///
    /// let mut skipset = SkipSet::new();
    /// assert!(skipset.is_empty());
    ///
    /// skipset.insert(1)?;
    /// assert!(!skipset.is_empty());
    /// # Ok::<(), skipset::Error>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.get(HEAD).next(0) == TAIL
    }

    /// Returns the number of levels currently in use: the height of the
    /// tallest tower inserted since the skipset was created or last cleared.
    ///
    /// Removing values never lowers the height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.level
    }

    /// The stored values, in order.
    fn values(&self) -> impl Iterator<Item = &T> {
        self.nodes.level(0).filter_map(|(_, node)| node.rank.value())
    }

    /// Renders the levels in use, top level first, one line per level.
    ///
    /// ```text
    /// L2: 5
    /// L1: 5 50
    /// L0: 1 5 10 50 100
    /// ```
    #[must_use]
    pub fn debug_structure(&self) -> String
    where
        T: fmt::Display,
    {
        let mut rows = Vec::with_capacity(self.level);
        for level in (0..self.level).rev() {
            let row: Vec<String> = iter::once(format!("L{level}:"))
                .chain(self.nodes.level(level).map(|(_, node)| node.to_string()))
                .collect();
            rows.push(row.join(" "));
        }
        rows.join("\n")
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

#[cfg(test)]
impl<T, G> SkipSet<T, G>
where
    T: Ord,
    G: LevelGenerator,
{
    /// Checks the integrity of the skipset.
    fn check(&self) {
        use std::collections::HashSet;

        let head = self.nodes.get(HEAD);
        assert_eq!(head.height(), self.level_generator.total().max(1));
        assert!(self.level <= head.height());
        for level in self.level..head.height() {
            assert_eq!(head.next(level), TAIL, "unused level {level} is not empty");
        }

        let mut below: Option<HashSet<NodeId>> = None;
        for level in 0..self.level {
            let mut prev = &Rank::Head;
            let mut present = HashSet::new();
            for (id, node) in self.nodes.level(level) {
                assert!(prev < &node.rank, "level {level} is not strictly increasing");
                assert!(node.height() > level);
                assert!(node.height() <= self.level);
                if let Some(ref below) = below {
                    assert!(below.contains(&id), "node at level {level} missing below");
                }
                prev = &node.rank;
                present.insert(id);
            }
            if level == 0 {
                assert_eq!(present.len(), self.len);
            }
            below = Some(present);
        }
        if self.level == 0 {
            assert_eq!(self.len, 0);
        }
        assert_eq!(self.is_empty(), self.len == 0);
        assert_eq!(self.nodes.occupied(), self.len + 2);
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<T, G> Default for SkipSet<T, G>
where
    T: Ord,
    G: LevelGenerator + Default,
{
    #[inline]
    fn default() -> SkipSet<T, G> {
        SkipSet::with_level_generator(G::default())
    }
}

/// This implementation of `PartialEq` only checks that the *values* are equal;
/// it does not check for equivalence of other features (such as the level
/// generators and the node levels).
impl<A, B, GA, GB> PartialEq<SkipSet<B, GB>> for SkipSet<A, GA>
where
    A: PartialEq<B>,
{
    #[inline]
    fn eq(&self, other: &SkipSet<B, GB>) -> bool {
        self.len == other.len && self.values().eq(other.values())
    }
}

impl<T, G> Eq for SkipSet<T, G> where T: Eq {}

/// Values equal to one already stored are skipped.
impl<T, G> Extend<T> for SkipSet<T, G>
where
    T: Ord,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
        for element in iterable {
            // Duplicates are dropped, as documented above.
            let _ = self.insert(element);
        }
    }
}

impl<T> iter::FromIterator<T> for SkipSet<T>
where
    T: Ord,
{
    #[inline]
    fn from_iter<I>(iter: I) -> SkipSet<T>
    where
        I: IntoIterator<Item = T>,
    {
        let mut skipset = SkipSet::new();
        skipset.extend(iter);
        skipset
    }
}

impl<T, G> fmt::Debug for SkipSet<T, G>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;

        for (i, entry) in self.values().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry:?}")?;
        }
        write!(f, "]")
    }
}

impl<T, G> fmt::Display for SkipSet<T, G>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;

        for (i, entry) in self.values().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry}")?;
        }
        write!(f, "]")
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `n > 0` will contain a random subset of the nodes on level `n - 1`.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `n` is `p` times the chance of occupying level `n - 1`
//! (with `0 < p < 1`).
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but if need be custom level generators can be implemented.

pub mod geometric;

pub use self::geometric::{Geometric, GeometricError};

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a [`LevelGenerator`].
///
/// A node assigned level `n` has a tower of `n + 1` forward links, one for
/// each of the levels `0..=n`.
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist.
    #[must_use]
    fn total(&self) -> usize;

    /// Generate a random level for a new node in the range `[0, total)`.
    ///
    /// This function should _never_ return a level greater or equal to
    /// [`total`][LevelGenerator::total].
    #[must_use]
    fn level(&mut self) -> usize;
}

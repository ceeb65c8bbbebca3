//! The contract shared by ordered, duplicate-free containers.
//!
//! Benchmarks and comparisons drive containers through this trait only, so
//! that a [`SkipSet`] can be measured against any other structure offering
//! the same operations.

use crate::{error::Error, level_generator::LevelGenerator, skipset::SkipSet};

/// An ordered container storing each value at most once.
pub trait Container<T> {
    /// Returns `true` if the container holds no values.
    fn is_empty(&self) -> bool;

    /// Returns the number of values held.
    fn len(&self) -> usize;

    /// Returns the stored value equal to `value`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no such value is stored.
    fn find(&self, value: &T) -> Result<&T, Error>;

    /// Stores `value`.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyExists`] if an equal value is already stored.
    fn insert(&mut self, value: T) -> Result<(), Error>;

    /// Removes and returns the value equal to `value`.  Absent values are
    /// ignored.
    fn remove(&mut self, value: &T) -> Option<T>;

    /// Removes every value.
    fn clear(&mut self);
}

impl<T, G> Container<T> for SkipSet<T, G>
where
    T: Ord,
    G: LevelGenerator,
{
    #[inline]
    fn is_empty(&self) -> bool {
        SkipSet::is_empty(self)
    }

    #[inline]
    fn len(&self) -> usize {
        SkipSet::len(self)
    }

    #[inline]
    fn find(&self, value: &T) -> Result<&T, Error> {
        SkipSet::find(self, value)
    }

    #[inline]
    fn insert(&mut self, value: T) -> Result<(), Error> {
        SkipSet::insert(self, value)
    }

    #[inline]
    fn remove(&mut self, value: &T) -> Option<T> {
        SkipSet::remove(self, value)
    }

    #[inline]
    fn clear(&mut self) {
        SkipSet::clear(self);
    }
}

//! A skiplist is a way of storing elements in such a way that elements can be
//! efficiently found, inserted and removed, all in `O(log(n))` on average.
//!
//! Conceptually, the set resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------> [9] ----------> <tail>
//! <head> ----------> [2] ------------------------------------[7] ----------> [9] ----------> <tail>
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------> [9] --> [10] -> <tail>
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --> [9] --> [10] -> <tail>
//! ```
//!
//! where each node `[x]` has references to nodes further down the list,
//! allowing a search to skip ahead.  The `<head>` and `<tail>` sentinels carry
//! no value: the head compares less than every value and the tail compares
//! greater, so every level is terminated by the tail and no traversal ever has
//! to check for the end of a level separately.
//!
//! [`SkipSet`] stores each value at most once.  Values must implement [`Ord`],
//! and that ordering **must** be a total order: it must be consistent, it must
//! be anti-symmetric and it must be transitive.  An inconsistent ordering will
//! not cause memory unsafety, but will leave the set in an unspecified state.
//!
//! ```
//! use skipset::{Error, SkipSet};
//!
//! let mut set = SkipSet::new();
//! for value in [1, 5, 10, 50, 100] {
//!     set.insert(value)?;
//! }
//! assert_eq!(set.find(&10), Ok(&10));
//! assert_eq!(set.find(&99), Err(Error::NotFound));
//! assert_eq!(set.insert(5), Err(Error::AlreadyExists));
//!
//! assert_eq!(set.remove(&10), Some(10));
//! assert_eq!(set.len(), 4);
//! # Ok::<(), Error>(())
//! ```

mod container;
mod error;
pub mod level_generator;
mod skipnode;
mod skipset;

pub use crate::container::Container;
pub use crate::error::Error;
pub use crate::level_generator::{Geometric, GeometricError, LevelGenerator};
pub use crate::skipset::SkipSet;

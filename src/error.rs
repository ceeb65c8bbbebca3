//! Errors surfaced by the set operations.

use thiserror::Error;

/// Errors that can occur when looking up or inserting values.
///
/// Removing a value which is not present is not an error; see
/// [`SkipSet::remove`][crate::SkipSet::remove].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The value is not stored in the set.
    #[error("value not found.")]
    NotFound,
    /// An equal value is already stored in the set.
    #[error("value already exists.")]
    AlreadyExists,
}

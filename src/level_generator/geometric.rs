//! Geometric level generator.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// The number of levels used when none is specified.
pub const DEFAULT_TOTAL: usize = 16;

/// The probability of promotion used when none is specified.
pub const DEFAULT_P: f64 = 0.5;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The probability `p` must be in the range `(0, 1)`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator using a geometric distribution.
///
/// This distribution assumes that if a node is present at some level `n`,
/// then the probability that it is present at level `n + 1` is some constant
/// `p` in `(0, 1)`. This produces a geometric distribution, albeit truncated
/// at the maximum number of levels allowed.
///
/// The default generator uses 16 levels and `p = 0.5`.
#[derive(Debug, Clone)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a node is present in the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// The generator is seeded from the thread-local random number generator.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be greater or
    /// equal to 1.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::with_rng(total, p, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Create a new geometric level generator whose sequence of levels is
    /// fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`Geometric::new`].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::with_rng(total, p, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(total: usize, p: f64, rng: SmallRng) -> Result<Self, GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(Geometric { total, p, rng })
    }

    /// The probability that a node is promoted to the next level.
    #[must_use]
    #[inline]
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl Default for Geometric {
    #[inline]
    fn default() -> Self {
        Geometric {
            total: DEFAULT_TOTAL,
            p: DEFAULT_P,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Generate a level for a new node using a geometric distribution.
    ///
    /// Starting from level 0, a biased coin is flipped and the level is
    /// incremented for as long as it lands on heads (with probability `p`),
    /// stopping at the first tails or once the top level `total - 1` is
    /// reached.
    #[inline]
    fn level(&mut self) -> usize {
        let mut level = 0;
        while level + 1 < self.total && self.rng.random_bool(self.p) {
            level += 1;
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, bail};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{DEFAULT_P, DEFAULT_TOTAL, Geometric, LevelGenerator};
    use crate::level_generator::geometric::GeometricError;

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroMax));
        assert_eq!(
            Geometric::with_seed(0, 0.5, 1).err(),
            Some(GeometricError::ZeroMax)
        );
    }

    #[test]
    fn invalid_p() {
        assert_eq!(
            Geometric::new(1, 0.0).err(),
            Some(GeometricError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(1, 1.0).err(),
            Some(GeometricError::InvalidProbability)
        );
        assert_eq!(
            Geometric::new(1, f64::NAN).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn default() {
        let generator = Geometric::default();
        assert_eq!(generator.total(), DEFAULT_TOTAL);
        assert_eq!(generator.total(), 16);
        assert!((generator.p() - DEFAULT_P).abs() < f64::EPSILON);
    }

    #[test]
    fn seeded_is_reproducible() -> Result<()> {
        let mut a = Geometric::with_seed(16, 0.5, 0x1234_abcd)?;
        let mut b = Geometric::with_seed(16, 0.5, 0x1234_abcd)?;
        let a: Vec<_> = (0..1_000).map(|_| a.level()).collect();
        let b: Vec<_> = (0..1_000).map(|_| b.level()).collect();
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn single_level() -> Result<()> {
        let mut generator = Geometric::new(1, 0.99)?;
        for _ in 0..1_000 {
            assert_eq!(generator.level(), 0);
        }
        Ok(())
    }

    #[test]
    fn halving() -> Result<()> {
        // With p = 0.5, roughly half of all nodes stay on level 0.
        let mut generator = Geometric::with_seed(16, 0.5, 42)?;
        let samples = 100_000;
        let ground = (0..samples).filter(|_| generator.level() == 0).count();
        assert!((45_000..55_000).contains(&ground), "{ground} level-0 nodes");
        Ok(())
    }

    #[rstest]
    fn new(
        #[values(1, 2, 16, 128)] n: usize,
        #[values(0.1, 0.5, 0.99)] p: f64,
    ) -> Result<()> {
        let mut generator = Geometric::new(n, p)?;
        assert_eq!(generator.total(), n);
        for _ in 0..100_000 {
            let level = generator.level();
            assert!((0..n).contains(&level));
        }

        // Make sure that we can produce at least one level-0 node.
        let mut found = false;
        for _ in 0..100_000 {
            if generator.level() == 0 {
                found = true;
                break;
            }
        }
        if !found {
            bail!("Failed to generate a level-0 node.");
        }

        Ok(())
    }

    #[rstest]
    #[case(1, 0.5)]
    #[case(2, 0.5)]
    #[case(4, 0.9)]
    #[case(16, 0.99)]
    fn reaches_top(#[case] n: usize, #[case] p: f64) -> Result<()> {
        let mut generator = Geometric::new(n, p)?;
        for _ in 0..1_000_000 {
            if generator.level() == n - 1 {
                return Ok(());
            }
        }
        bail!("Failed to generate a level-{} node.", n - 1);
    }
}

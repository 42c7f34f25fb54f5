//! Geometric level generator.

use rand::prelude::*;
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// Errors that can occur when creating a [`Geometric`] level generator.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum height must be non-zero.
    #[error("total must be non-zero.")]
    ZeroTotal,
    /// The promotion probability `p` must be in the range `(0, 1)`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
    /// Failed to initialize the random number generator.
    #[error("failed to initialize the random number generator.")]
    RngInitFailed,
}

/// A level generator producing geometrically distributed node heights.
///
/// A node reaching some level is promoted to the next one with probability
/// `p`, so the chance of a node having height `h` is `p^(h-1) * (1 - p)`,
/// truncated at the maximum height.
#[derive(Debug)]
pub struct Geometric {
    /// The maximum height that can be generated.
    total: usize,
    /// The probability that a node present at one level is promoted to the
    /// next.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with heights up to `total`
    /// and promotion probability `p`, seeded from system entropy.
    ///
    /// # Errors
    ///
    /// Fails if `total` is zero, if `p` lies outside `(0, 1)`, or if the
    /// random number generator cannot be initialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::level_generator::Geometric;
    ///
    /// let generator = Geometric::new(32, 0.25).unwrap();
    /// ```
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::from_rng(thread_rng()).map_err(|_err| GeometricError::RngInitFailed)?,
        })
    }

    /// Create a generator with a fixed seed, for reproducible structure in
    /// tests.
    ///
    /// # Errors
    ///
    /// Fails if `total` is zero or if `p` lies outside `(0, 1)`.
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    fn validate(total: usize, p: f64) -> Result<(), GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroTotal);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    /// Generate a height in `[1, total]`: starting from 1, keep promoting
    /// while a uniform draw falls below `p`.
    fn random(&mut self) -> usize {
        let mut height = 1;
        while height < self.total && self.rng.gen::<f64>() < self.p {
            height += 1;
        }
        height
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use anyhow::{bail, Result};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, GeometricError, LevelGenerator};

    #[test]
    fn invalid_total() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroTotal));
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
    }

    #[rstest]
    fn in_range(
        #[values(1, 2, 16, 32)] total: usize,
        #[values(0.1, 0.25, 0.5)] p: f64,
    ) -> Result<()> {
        let mut generator = Geometric::new(total, p)?;
        assert_eq!(generator.total(), total);
        for _ in 0..100_000 {
            let height = generator.random();
            assert!((1..=total).contains(&height));
        }
        Ok(())
    }

    #[test]
    fn covers_extremes() -> Result<()> {
        let mut generator = Geometric::new(4, 0.25)?;
        let mut lowest = false;
        let mut highest = false;
        for _ in 0..1_000_000 {
            match generator.random() {
                1 => lowest = true,
                4 => highest = true,
                _ => {}
            }
            if lowest && highest {
                return Ok(());
            }
        }
        bail!("failed to generate both a height-1 and a height-4 node");
    }

    #[test]
    fn seeded_is_deterministic() -> Result<()> {
        let mut a = Geometric::with_seed(32, 0.25, 0xDEADBEEF)?;
        let mut b = Geometric::with_seed(32, 0.25, 0xDEADBEEF)?;
        for _ in 0..1_000 {
            assert_eq!(a.random(), b.random());
        }
        Ok(())
    }
}

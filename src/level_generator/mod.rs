//! Node-height generation for the skip list.
//!
//! A skip list distributes its nodes probabilistically over a stack of
//! levels: level 0 holds every node, and each level above holds a random
//! subset of the level below it. On insertion, a node is assigned a height
//! drawn from a [`LevelGenerator`]; the list then links the node into that
//! many levels.
//!
//! The default generator, [`Geometric`], promotes a node to the next level
//! with a fixed probability (¼ here), producing a geometric distribution
//! truncated at the maximum height. With that distribution a node carries
//! 4/3 links on average, and a maximum height of 32 comfortably covers
//! lists far beyond any realistic leaderboard size.
//!
//! Each generator owns its own random source, seeded from entropy by
//! default. Tests that need reproducible structure can construct a
//! [`Geometric`] with a fixed seed instead.

pub mod geometric;

pub use self::geometric::{Geometric, GeometricError};

/// A source of node heights for a skip list.
///
/// Implementations decide how many levels a freshly inserted node
/// occupies. The distribution of heights determines the shape, and thus
/// the search performance, of the list.
pub trait LevelGenerator {
    /// The maximum height this generator will ever return, which is also
    /// the number of levels the owning list must allocate in its head.
    fn total(&self) -> usize;

    /// Generate the height for a new node, in `[1, total]`.
    fn random(&mut self) -> usize;
}

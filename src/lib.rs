//! An in-memory leaderboard engine with logarithmic rank queries.
//!
//! The engine keeps a mutable set of `(member, score)` entries under a
//! total order (better scores first, ties broken by ascending member)
//! and answers rank-centric questions: what is a member's rank, who holds
//! a given rank, which entries fill a window of ranks or scores, and who
//! surrounds a member.
//!
//! Two layers make this up:
//!
//! - [`RankedSkipList`], an *indexed* skip list. Entries live in a
//!   probabilistic stack of linked lists:
//!
//!   ```text
//!   <head> ----------------> [dana] ------------------------------------>
//!   <head> ----------------> [dana] ----------> [finn] ----------------->
//!   <head> --> [chie] -----> [dana] --> [elsa] --> [finn] --> [gwen] --->
//!   ```
//!
//!   Every forward link is annotated with a *span*, the number of
//!   bottom-level positions it advances, which is what turns an ordinary
//!   ordered skip list into one that can compute ranks in `O(log n)`
//!   instead of `O(n)`. A side map from member to node gives `O(1)`
//!   membership and score lookups.
//!
//! - [`Leaderboard`], a façade over one list adding the configurable
//!   score direction (high-first or low-first), an update policy for
//!   repeated submissions, per-entry payloads and timestamps, and a
//!   readers-writer lock for concurrent use.
//!
//! # Examples
//!
//! ```
//! use podium::{Leaderboard, LeaderboardConfig, ScoreOrder, UpdatePolicy};
//!
//! let board: Leaderboard<&str> = Leaderboard::new(LeaderboardConfig {
//!     id: "weekly".into(),
//!     name: "Weekly tournament".into(),
//!     order: ScoreOrder::HighFirst,
//!     update_policy: UpdatePolicy::IfBetter,
//! });
//!
//! board.add("alice", 1200, "team:red").unwrap();
//! board.add("bob", 1500, "team:blue").unwrap();
//!
//! assert_eq!(board.rank("bob").unwrap(), 1);
//!
//! // A worse score is rejected under `IfBetter`; the stored entry stays.
//! assert!(board.add("alice", 900, "team:red").is_err());
//! assert_eq!(board.get("alice").unwrap().score, 1200);
//!
//! let top = board.range(1, 10);
//! assert_eq!(top.len(), 2);
//! assert_eq!(top[0].entry.member, "bob");
//! ```

#![warn(missing_docs)]

pub mod leaderboard;
pub mod level_generator;
pub mod ranked_skiplist;
mod skipnode;

pub use crate::leaderboard::{
    Leaderboard, LeaderboardConfig, LeaderboardError, RankedEntry, ScoreOrder, UpdatePolicy,
};
pub use crate::ranked_skiplist::{Entry, RankedSkipList};

//! The leaderboard façade.
//!
//! A [`Leaderboard`] wraps one [`RankedSkipList`] and layers on top of it
//! everything a ranking service needs beyond the raw ordered structure:
//! a configurable score direction (high-first or low-first), an update
//! policy deciding whether a re-submitted score replaces the stored one,
//! a last-updated timestamp per member, and a readers-writer lock so any
//! number of queries can proceed concurrently with exclusive writers.
//!
//! The underlying list always orders higher scores first. A low-first
//! leaderboard stores the *negated* score and restores the sign on every
//! return path, which is why `i64::MIN`, the one value negation cannot
//! represent, is rejected at this boundary.

use chrono::Utc;
use parking_lot::RwLock;
use thiserror::Error;

use crate::ranked_skiplist::{Entry, RankedSkipList};

// ////////////////////////////////////////////////////////////////////////////
// Configuration
// ////////////////////////////////////////////////////////////////////////////

/// The direction in which scores rank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoreOrder {
    /// Higher scores rank better. The default.
    #[default]
    HighFirst,
    /// Lower scores rank better, as in golf or race times.
    LowFirst,
}

impl ScoreOrder {
    /// Whether `new` is strictly better than `old` under this order.
    #[inline]
    pub fn better(self, new: i64, old: i64) -> bool {
        match self {
            ScoreOrder::HighFirst => new > old,
            ScoreOrder::LowFirst => new < old,
        }
    }

    /// The effective score stored in the high-first list.
    #[inline]
    fn encode(self, score: i64) -> i64 {
        match self {
            ScoreOrder::HighFirst => score,
            ScoreOrder::LowFirst => -score,
        }
    }

    /// The user-visible score for a stored one. Negation is its own
    /// inverse, so this is `encode` again.
    #[inline]
    fn decode(self, stored: i64) -> i64 {
        self.encode(stored)
    }
}

/// The rule applied when a member that already has a score submits a new
/// one. A first submission always succeeds regardless of policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Every submission replaces the stored entry. The default.
    #[default]
    Always,
    /// Accept only scores strictly better than the stored one, relative to
    /// the configured [`ScoreOrder`].
    IfBetter,
    /// Accept only scores strictly worse than the stored one, relative to
    /// the configured [`ScoreOrder`].
    IfWorse,
}

/// Configuration for a [`Leaderboard`].
///
/// `id` and `name` are carried for the caller's benefit and never
/// interpreted.
///
/// # Examples
///
/// ```
/// use podium::{LeaderboardConfig, ScoreOrder, UpdatePolicy};
///
/// let config = LeaderboardConfig {
///     id: "season-9".into(),
///     name: "Season 9 ranked".into(),
///     order: ScoreOrder::HighFirst,
///     update_policy: UpdatePolicy::IfBetter,
/// };
/// assert_eq!(config.order, ScoreOrder::HighFirst);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LeaderboardConfig {
    /// Opaque identifier.
    pub id: String,
    /// Opaque display name.
    pub name: String,
    /// Which direction scores rank in.
    pub order: ScoreOrder,
    /// How repeated submissions by the same member are handled.
    pub update_policy: UpdatePolicy,
}

// ////////////////////////////////////////////////////////////////////////////
// Errors
// ////////////////////////////////////////////////////////////////////////////

/// Errors returned by [`Leaderboard`] operations.
///
/// Every error leaves the leaderboard untouched; an operation either
/// completes fully or not at all.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum LeaderboardError {
    /// The member is not on the leaderboard.
    #[error("member does not exist")]
    MemberNotFound,
    /// Rejected by [`UpdatePolicy::IfBetter`]: the submitted score is not
    /// strictly better than the stored one.
    #[error("new score is not better than the existing score")]
    ScoreNotBetter,
    /// Rejected by [`UpdatePolicy::IfWorse`]: the submitted score is not
    /// strictly worse than the stored one.
    #[error("new score is not worse than the existing score")]
    ScoreNotWorse,
    /// The member identifier is empty.
    #[error("member identifier must not be empty")]
    EmptyMember,
    /// The score cannot be negated, so a low-first leaderboard cannot rank
    /// it. Only `i64::MIN` trips this.
    #[error("score cannot be ranked on a low-first leaderboard")]
    ScoreNotInvertible,
}

// ////////////////////////////////////////////////////////////////////////////
// Leaderboard
// ////////////////////////////////////////////////////////////////////////////

/// An entry together with its 1-based rank under the leaderboard's order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedEntry<D> {
    /// 1-based position; rank 1 is the best-placed member.
    pub rank: u64,
    /// The member's entry, with the score in user-visible form.
    pub entry: Entry<D>,
}

/// A concurrent, policy-aware leaderboard over scored members.
///
/// All methods take `&self`; a single readers-writer lock serialises
/// access, so a `Leaderboard` can be shared freely across threads.
///
/// # Examples
///
/// ```
/// use podium::{Leaderboard, LeaderboardConfig};
///
/// let board: Leaderboard<&str> = Leaderboard::new(LeaderboardConfig::default());
/// board.add("alice", 100, "payload").unwrap();
/// board.add("bob", 200, "payload").unwrap();
///
/// assert_eq!(board.rank("bob").unwrap(), 1);
/// assert_eq!(board.rank("alice").unwrap(), 2);
/// assert_eq!(board.total(), 2);
/// ```
pub struct Leaderboard<D> {
    config: LeaderboardConfig,
    list: RwLock<RankedSkipList<D>>,
}

impl<D> Leaderboard<D> {
    /// Create an empty leaderboard with the given configuration.
    pub fn new(config: LeaderboardConfig) -> Self {
        Leaderboard {
            config,
            list: RwLock::new(RankedSkipList::new()),
        }
    }

    /// The configured identifier.
    #[inline]
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// The configured display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The full configuration.
    #[inline]
    pub fn config(&self) -> &LeaderboardConfig {
        &self.config
    }

    /// Remove a member. Returns `true` if the member was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig};
    ///
    /// let board: Leaderboard<()> = Leaderboard::new(LeaderboardConfig::default());
    /// board.add("alice", 100, ()).unwrap();
    /// assert!(board.remove("alice"));
    /// assert!(!board.remove("alice"));
    /// ```
    pub fn remove(&self, member: &str) -> bool {
        self.list.write().remove(member).is_some()
    }

    /// The member's 1-based rank.
    ///
    /// # Errors
    ///
    /// [`LeaderboardError::MemberNotFound`] if the member is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig, LeaderboardError};
    ///
    /// let board: Leaderboard<()> = Leaderboard::new(LeaderboardConfig::default());
    /// board.add("alice", 100, ()).unwrap();
    /// assert_eq!(board.rank("alice").unwrap(), 1);
    /// assert_eq!(board.rank("bob"), Err(LeaderboardError::MemberNotFound));
    /// ```
    pub fn rank(&self, member: &str) -> Result<u64, LeaderboardError> {
        self.list
            .read()
            .rank_of(member)
            .ok_or(LeaderboardError::MemberNotFound)
    }

    /// The number of members on the leaderboard.
    #[inline]
    pub fn total(&self) -> u64 {
        self.list.read().len()
    }

    /// Returns `true` if the leaderboard has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    /// Remove every member.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig};
    ///
    /// let board: Leaderboard<()> = Leaderboard::new(LeaderboardConfig::default());
    /// board.add("alice", 100, ()).unwrap();
    /// board.reset();
    /// assert!(board.is_empty());
    /// ```
    pub fn reset(&self) {
        self.list.write().clear();
    }

    /// Restore the user-visible score on an entry leaving the engine.
    fn reveal(&self, mut entry: Entry<D>) -> Entry<D> {
        entry.score = self.config.order.decode(entry.score);
        entry
    }
}

impl<D> Leaderboard<D>
where
    D: Clone,
{
    /// Submit a score for a member, inserting or updating its entry, and
    /// return the entry with its new rank.
    ///
    /// If the member already has an entry, the configured
    /// [`UpdatePolicy`] decides whether the submission is accepted; a
    /// rejected submission leaves the leaderboard untouched. An accepted
    /// submission replaces the whole entry, including its payload and
    /// timestamp.
    ///
    /// # Errors
    ///
    /// - [`LeaderboardError::EmptyMember`] if `member` is empty.
    /// - [`LeaderboardError::ScoreNotInvertible`] for `i64::MIN` on a
    ///   low-first leaderboard.
    /// - [`LeaderboardError::ScoreNotBetter`] /
    ///   [`LeaderboardError::ScoreNotWorse`] on policy rejection.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig};
    ///
    /// let board: Leaderboard<()> = Leaderboard::new(LeaderboardConfig::default());
    /// let ranked = board.add("alice", 100, ()).unwrap();
    /// assert_eq!(ranked.rank, 1);
    /// assert_eq!(ranked.entry.score, 100);
    /// ```
    pub fn add(
        &self,
        member: impl Into<String>,
        score: i64,
        data: D,
    ) -> Result<RankedEntry<D>, LeaderboardError> {
        let member = member.into();
        if member.is_empty() {
            return Err(LeaderboardError::EmptyMember);
        }
        let order = self.config.order;
        if order == ScoreOrder::LowFirst && score == i64::MIN {
            return Err(LeaderboardError::ScoreNotInvertible);
        }

        let mut list = self.list.write();
        if let Some(existing) = list.get(&member) {
            let current = order.decode(existing.score);
            match self.config.update_policy {
                UpdatePolicy::Always => {}
                UpdatePolicy::IfBetter => {
                    if !order.better(score, current) {
                        return Err(LeaderboardError::ScoreNotBetter);
                    }
                }
                UpdatePolicy::IfWorse => {
                    if !order.better(current, score) {
                        return Err(LeaderboardError::ScoreNotWorse);
                    }
                }
            }
        }

        let mut entry = Entry {
            member,
            score: order.encode(score),
            data,
            updated_at: Utc::now(),
        };
        entry = list.insert(entry).clone();
        let rank = list
            .rank_of(&entry.member)
            .expect("freshly inserted member has a rank");
        Ok(RankedEntry {
            rank,
            entry: self.reveal(entry),
        })
    }

    /// The member's entry, with the score in user-visible form.
    ///
    /// # Errors
    ///
    /// [`LeaderboardError::MemberNotFound`] if the member is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig};
    ///
    /// let board = Leaderboard::new(LeaderboardConfig::default());
    /// board.add("alice", 100, "guild:red").unwrap();
    /// let entry = board.get("alice").unwrap();
    /// assert_eq!(entry.score, 100);
    /// assert_eq!(entry.data, "guild:red");
    /// ```
    pub fn get(&self, member: &str) -> Result<Entry<D>, LeaderboardError> {
        let list = self.list.read();
        let entry = list
            .get(member)
            .ok_or(LeaderboardError::MemberNotFound)?
            .clone();
        Ok(self.reveal(entry))
    }

    /// The member's entry together with its rank.
    ///
    /// # Errors
    ///
    /// [`LeaderboardError::MemberNotFound`] if the member is absent.
    pub fn get_with_rank(&self, member: &str) -> Result<RankedEntry<D>, LeaderboardError> {
        let list = self.list.read();
        let entry = list
            .get(member)
            .ok_or(LeaderboardError::MemberNotFound)?
            .clone();
        let rank = list.rank_of(member).expect("present member has a rank");
        Ok(RankedEntry {
            rank,
            entry: self.reveal(entry),
        })
    }

    /// The entries with ranks `start..=end`, clamped to the board, each
    /// labelled with its rank.
    ///
    /// Ranks are assigned by counting from the clamped start of the
    /// window, not by re-querying per element.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig};
    ///
    /// let board: Leaderboard<()> = Leaderboard::new(LeaderboardConfig::default());
    /// for (member, score) in [("alice", 100), ("bob", 200), ("carol", 50)] {
    ///     board.add(member, score, ()).unwrap();
    /// }
    /// let top = board.range(1, 2);
    /// assert_eq!(top.len(), 2);
    /// assert_eq!(top[0].entry.member, "bob");
    /// assert_eq!(top[1].rank, 2);
    /// ```
    pub fn range(&self, start: i64, end: i64) -> Vec<RankedEntry<D>> {
        let start = start.max(1) as u64;
        let end = end.max(0) as u64;
        let list = self.list.read();
        self.collect_window(&list, start, end)
    }

    /// The window of entries centred on a member: ranks
    /// `[max(1, r − count), min(total, r + count)]` where `r` is the
    /// member's rank.
    ///
    /// # Errors
    ///
    /// [`LeaderboardError::MemberNotFound`] if the member is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig};
    ///
    /// let board: Leaderboard<()> = Leaderboard::new(LeaderboardConfig::default());
    /// for (member, score) in [("alice", 500), ("bob", 400), ("carol", 300)] {
    ///     board.add(member, score, ()).unwrap();
    /// }
    /// let window = board.around("bob", 1).unwrap();
    /// let members: Vec<_> = window.iter().map(|r| r.entry.member.as_str()).collect();
    /// assert_eq!(members, ["alice", "bob", "carol"]);
    /// ```
    pub fn around(&self, member: &str, count: u64) -> Result<Vec<RankedEntry<D>>, LeaderboardError> {
        let list = self.list.read();
        let rank = list
            .rank_of(member)
            .ok_or(LeaderboardError::MemberNotFound)?;
        let start = rank.saturating_sub(count).max(1);
        let end = rank.saturating_add(count).min(list.len());
        Ok(self.collect_window(&list, start, end))
    }

    /// The entries whose user-visible scores lie in `[min, max]`, best
    /// rank first, each labelled with its rank. Empty when `min > max`.
    ///
    /// On a low-first leaderboard the bounds are negated and swapped
    /// before being passed to the underlying list.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Leaderboard, LeaderboardConfig};
    ///
    /// let board: Leaderboard<()> = Leaderboard::new(LeaderboardConfig::default());
    /// for (member, score) in [("alice", 100), ("bob", 200), ("carol", 50)] {
    ///     board.add(member, score, ()).unwrap();
    /// }
    /// let hits = board.score_range(60, 300);
    /// let members: Vec<_> = hits.iter().map(|r| r.entry.member.as_str()).collect();
    /// assert_eq!(members, ["bob", "alice"]);
    /// ```
    pub fn score_range(&self, min: i64, max: i64) -> Vec<RankedEntry<D>> {
        if min > max {
            return Vec::new();
        }
        let (lo, hi) = match self.config.order {
            ScoreOrder::HighFirst => (min, max),
            ScoreOrder::LowFirst => {
                // No low-first entry can hold i64::MIN, so tightening the
                // bounds before negating loses nothing.
                (-max.max(i64::MIN + 1), -min.max(i64::MIN + 1))
            }
        };

        let list = self.list.read();
        let entries = list.score_range(lo, hi);
        let first_rank = match entries.first() {
            Some(first) => list
                .rank_of(&first.member)
                .expect("entry returned by the list is present"),
            None => return Vec::new(),
        };
        entries
            .into_iter()
            .zip(first_rank..)
            .map(|(entry, rank)| RankedEntry {
                rank,
                entry: self.reveal(entry.clone()),
            })
            .collect()
    }

    /// Collect `rank_range(start, end)` and label ranks by counting from
    /// `start`. Callers pass `start >= 1` so the labels line up with the
    /// list's own clamping.
    fn collect_window(
        &self,
        list: &RankedSkipList<D>,
        start: u64,
        end: u64,
    ) -> Vec<RankedEntry<D>> {
        list.rank_range(start, end)
            .into_iter()
            .zip(start..)
            .map(|(entry, rank)| RankedEntry {
                rank,
                entry: self.reveal(entry.clone()),
            })
            .collect()
    }
}

impl<D> Default for Leaderboard<D> {
    fn default() -> Self {
        Self::new(LeaderboardConfig::default())
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

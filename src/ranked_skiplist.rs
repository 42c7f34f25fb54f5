//! An ordered collection of scored members with logarithmic rank queries.
//!
//! [`RankedSkipList`] keeps `(member, score)` entries under a fixed total
//! order: higher scores first, ties broken by ascending member. Every
//! forward link carries a *span*, the number of bottom-level positions the
//! link advances, so the rank of a member and the member at a rank can
//! both be answered in `O(log n)` by summing spans along a single descent.
//! A side map from member to node provides `O(1)` membership tests and
//! score lookups.
//!
//! Members are unique: inserting an entry for a member that is already
//! present replaces the previous entry.

use std::collections::HashMap;
use std::fmt;
use std::iter;
use std::marker::PhantomData;
use std::ptr::NonNull;

use chrono::{DateTime, Utc};

use crate::level_generator::{Geometric, LevelGenerator};
use crate::skipnode::SkipNode;

/// The maximum height of a node tower. With promotion probability ¼ this
/// comfortably covers lists far beyond any realistic leaderboard size.
pub(crate) const MAX_LEVEL: usize = 32;

/// The probability that a node present at one level also appears on the
/// next.
pub(crate) const PROBABILITY: f64 = 0.25;

type Node<D> = SkipNode<Entry<D>>;

// ////////////////////////////////////////////////////////////////////////////
// Entry
// ////////////////////////////////////////////////////////////////////////////

/// A scored member together with its payload and the instant it was last
/// written.
///
/// The list stores whatever score it is handed and never inspects `data`;
/// score direction (high-first versus low-first) is the concern of the
/// layer above.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<D> {
    /// The member identifier. Members are compared lexicographically as
    /// byte sequences, the ordering of `str`.
    pub member: String,
    /// The ranking score.
    pub score: i64,
    /// Caller-supplied payload, stored and returned verbatim.
    pub data: D,
    /// When the entry was created or last replaced.
    pub updated_at: DateTime<Utc>,
}

impl<D> Entry<D> {
    /// Create an entry stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::Entry;
    ///
    /// let entry = Entry::new("alice", 1500, ());
    /// assert_eq!(entry.member, "alice");
    /// assert_eq!(entry.score, 1500);
    /// ```
    pub fn new(member: impl Into<String>, score: i64, data: D) -> Self {
        Entry {
            member: member.into(),
            score,
            data,
            updated_at: Utc::now(),
        }
    }

    /// Whether this entry sorts strictly before the position identified by
    /// `(score, member)`: higher scores first, ties broken by ascending
    /// member.
    #[inline]
    fn precedes(&self, score: i64, member: &str) -> bool {
        self.score > score || (self.score == score && self.member.as_str() < member)
    }
}

// ////////////////////////////////////////////////////////////////////////////
// RankedSkipList
// ////////////////////////////////////////////////////////////////////////////

/// An indexed skip list over scored members.
///
/// The list is a probabilistic stack of linked lists: level 0 holds every
/// node in order, and each level above skips over a geometrically thinning
/// subset. Span-annotated links make positions first-class, so alongside
/// the usual ordered-set operations the list answers [`rank_of`],
/// [`at_rank`] and [`rank_range`] queries in logarithmic time.
///
/// [`rank_of`]: RankedSkipList::rank_of
/// [`at_rank`]: RankedSkipList::at_rank
/// [`rank_range`]: RankedSkipList::rank_range
pub struct RankedSkipList<D> {
    // Sentinel head; owns no entry. All other nodes are heap-allocated and
    // freed by walking level 0.
    head: Box<Node<D>>,
    // The last node on level 0, if any.
    tail: Option<NonNull<Node<D>>>,
    // Highest level currently occupied by any node, at least 1.
    level: usize,
    len: u64,
    // member -> node, kept in lockstep with the level-0 chain.
    index: HashMap<String, NonNull<Node<D>>>,
    level_generator: Geometric,
}

unsafe impl<D: Send> Send for RankedSkipList<D> {}
unsafe impl<D: Sync> Sync for RankedSkipList<D> {}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<D> RankedSkipList<D> {
    /// Create a new empty list with an entropy-seeded level generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::RankedSkipList;
    ///
    /// let list: RankedSkipList<()> = RankedSkipList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        let lg = Geometric::new(MAX_LEVEL, PROBABILITY)
            .expect("the default level generator parameters are valid");
        Self::with_level_generator(lg)
    }

    /// Create a new empty list using the given level generator.
    ///
    /// Supplying a seeded [`Geometric`] makes the tower shape, and thus
    /// the internal structure, reproducible; query results never depend on
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::level_generator::Geometric;
    /// use podium::RankedSkipList;
    ///
    /// let lg = Geometric::with_seed(32, 0.25, 7).unwrap();
    /// let list: RankedSkipList<()> = RankedSkipList::with_level_generator(lg);
    /// assert_eq!(list.len(), 0);
    /// ```
    pub fn with_level_generator(level_generator: Geometric) -> Self {
        RankedSkipList {
            head: Box::new(SkipNode::head(level_generator.total())),
            tail: None,
            level: 1,
            len: 0,
            index: HashMap::new(),
            level_generator,
        }
    }

    /// Insert an entry, replacing any previous entry for the same member.
    ///
    /// Returns a reference to the entry as stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(Entry::new("alice", 100, ()));
    /// list.insert(Entry::new("bob", 200, ()));
    /// assert_eq!(list.rank_of("bob"), Some(1));
    /// assert_eq!(list.rank_of("alice"), Some(2));
    /// ```
    pub fn insert(&mut self, entry: Entry<D>) -> &Entry<D> {
        if self.index.contains_key(&entry.member) {
            self.remove(&entry.member);
        }

        let height = self.level_generator.random();
        if height > self.level {
            // Fresh head links take the pre-insert length as their reach so
            // the splice arithmetic below needs no special case for them.
            for link in &mut self.head.links[self.level..height] {
                link.span = self.len;
            }
            self.level = height;
        }

        // update[i]: last node before the insertion point on level i.
        // rank[i]: number of level-0 positions walked to reach update[i].
        let head: *mut Node<D> = &mut *self.head;
        let mut update: Vec<*mut Node<D>> = vec![head; self.level];
        let mut rank: Vec<u64> = vec![0; self.level];

        unsafe {
            let mut x = head;
            for i in (0..self.level).rev() {
                rank[i] = if i + 1 == self.level { 0 } else { rank[i + 1] };
                while let Some(next) = (&(*x).links)[i].forward {
                    let follows = {
                        let e = next.as_ref().item.as_ref().unwrap();
                        e.precedes(entry.score, &entry.member)
                    };
                    if !follows {
                        break;
                    }
                    rank[i] += (&(*x).links)[i].span;
                    x = next.as_ptr();
                }
                update[i] = x;
            }

            let member = entry.member.clone();
            let node: *mut Node<D> = Box::into_raw(Box::new(SkipNode::new(entry, height)));

            for (i, upd) in update.iter().copied().enumerate().take(height) {
                let walked = rank[0] - rank[i];
                (&mut (*node).links)[i].forward = (&(*upd).links)[i].forward;
                (&mut (*node).links)[i].span = (&(*upd).links)[i].span - walked;
                (&mut (*upd).links)[i].forward = Some(NonNull::new_unchecked(node));
                (&mut (*upd).links)[i].span = walked + 1;
            }
            // The new node passes under the remaining levels.
            for (i, upd) in update.iter().copied().enumerate().skip(height) {
                (&mut (*upd).links)[i].span += 1;
            }

            if (&(*node).links)[0].forward.is_none() {
                self.tail = Some(NonNull::new_unchecked(node));
            }

            self.index.insert(member, NonNull::new_unchecked(node));
            self.len += 1;
            (*node).item.as_ref().unwrap()
        }
    }

    /// Remove a member, returning its entry if it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(Entry::new("alice", 100, ()));
    /// assert_eq!(list.remove("alice").map(|e| e.score), Some(100));
    /// assert!(list.remove("alice").is_none());
    /// ```
    pub fn remove(&mut self, member: &str) -> Option<Entry<D>> {
        let target = *self.index.get(member)?;
        let score = unsafe { target.as_ref() }.item.as_ref().unwrap().score;

        let head: *mut Node<D> = &mut *self.head;
        let mut update: Vec<*mut Node<D>> = vec![head; self.level];

        unsafe {
            let mut x = head;
            for i in (0..self.level).rev() {
                while let Some(next) = (&(*x).links)[i].forward {
                    let follows = {
                        let e = next.as_ref().item.as_ref().unwrap();
                        e.precedes(score, member)
                    };
                    if !follows {
                        break;
                    }
                    x = next.as_ptr();
                }
                update[i] = x;
            }

            debug_assert_eq!((&(*update[0]).links)[0].forward, Some(target));
            let victim = target.as_ptr();

            for (i, upd) in update.iter().copied().enumerate() {
                if (&(*upd).links)[i].forward == Some(target) {
                    (&mut (*upd).links)[i].span += (&(*victim).links)[i].span;
                    (&mut (*upd).links)[i].forward = (&(*victim).links)[i].forward;
                }
                // Either way one bottom-level position disappears from the
                // link's reach.
                (&mut (*upd).links)[i].span -= 1;
            }

            if (&(*victim).links)[0].forward.is_none() {
                self.tail = if update[0] == head {
                    None
                } else {
                    Some(NonNull::new_unchecked(update[0]))
                };
            }

            while self.level > 1 && self.head.links[self.level - 1].forward.is_none() {
                self.head.links[self.level - 1].span = 0;
                self.level -= 1;
            }

            self.index.remove(member);
            self.len -= 1;
            Box::from_raw(victim).into_inner()
        }
    }

    /// The 1-based rank of a member under the list order, or `None` if the
    /// member is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(Entry::new("alice", 100, ()));
    /// list.insert(Entry::new("bob", 200, ()));
    /// assert_eq!(list.rank_of("alice"), Some(2));
    /// assert_eq!(list.rank_of("carol"), None);
    /// ```
    pub fn rank_of(&self, member: &str) -> Option<u64> {
        let target = self.index.get(member)?;
        let score = unsafe { target.as_ref() }.item.as_ref().unwrap().score;

        let mut rank: u64 = 0;
        let mut x: *const Node<D> = &*self.head;
        unsafe {
            for i in (0..self.level).rev() {
                while let Some(next) = (&(*x).links)[i].forward {
                    let follows = {
                        let e = next.as_ref().item.as_ref().unwrap();
                        e.precedes(score, member)
                    };
                    if !follows {
                        break;
                    }
                    rank += (&(*x).links)[i].span;
                    x = next.as_ptr();
                }
            }
            debug_assert_eq!((&(*x).links)[0].forward, Some(*target));
        }
        Some(rank + 1)
    }

    /// The entry at the given 1-based rank, or `None` if the rank is out
    /// of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(Entry::new("alice", 100, ()));
    /// list.insert(Entry::new("bob", 200, ()));
    /// assert_eq!(list.at_rank(1).map(|e| e.member.as_str()), Some("bob"));
    /// assert!(list.at_rank(3).is_none());
    /// ```
    pub fn at_rank(&self, rank: u64) -> Option<&Entry<D>> {
        if rank == 0 || rank > self.len {
            return None;
        }

        let mut traversed: u64 = 0;
        let mut x: *const Node<D> = &*self.head;
        unsafe {
            for i in (0..self.level).rev() {
                while let Some(next) = (&(*x).links)[i].forward {
                    if traversed + (&(*x).links)[i].span > rank {
                        break;
                    }
                    traversed += (&(*x).links)[i].span;
                    x = next.as_ptr();
                }
                if traversed == rank {
                    return (*x).item.as_ref();
                }
            }
        }
        None
    }

    /// The entries with ranks `start..=end`, clamped to `[1, len]`, in
    /// rank order.
    ///
    /// A single descent positions a cursor at `start`; the remaining
    /// entries are collected by walking level 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// for (member, score) in [("alice", 100), ("bob", 200), ("carol", 50)] {
    ///     list.insert(Entry::new(member, score, ()));
    /// }
    /// let members: Vec<_> = list
    ///     .rank_range(1, 10)
    ///     .into_iter()
    ///     .map(|e| e.member.as_str())
    ///     .collect();
    /// assert_eq!(members, ["bob", "alice", "carol"]);
    /// ```
    pub fn rank_range(&self, start: u64, end: u64) -> Vec<&Entry<D>> {
        let start = start.max(1);
        let end = end.min(self.len);
        if start > end {
            return Vec::new();
        }

        let mut out = Vec::with_capacity((end - start + 1) as usize);
        let mut traversed: u64 = 0;
        let mut x: *const Node<D> = &*self.head;
        unsafe {
            'descent: for i in (0..self.level).rev() {
                while let Some(next) = (&(*x).links)[i].forward {
                    if traversed + (&(*x).links)[i].span > start {
                        break;
                    }
                    traversed += (&(*x).links)[i].span;
                    x = next.as_ptr();
                }
                if traversed == start {
                    break 'descent;
                }
            }

            out.push((*x).item.as_ref().unwrap());
            let mut cur = (&(*x).links)[0].forward;
            while out.len() < (end - start + 1) as usize {
                let node = cur.expect("clamped rank range stays within the list");
                out.push(node.as_ref().item.as_ref().unwrap());
                cur = node.as_ref().links[0].forward;
            }
        }
        out
    }

    /// The entries whose scores lie in `[min, max]`, in list order (best
    /// score first, ties by ascending member). Empty when `min > max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// for (member, score) in [("alice", 100), ("bob", 200), ("carol", 50)] {
    ///     list.insert(Entry::new(member, score, ()));
    /// }
    /// let members: Vec<_> = list
    ///     .score_range(60, 250)
    ///     .into_iter()
    ///     .map(|e| e.member.as_str())
    ///     .collect();
    /// assert_eq!(members, ["bob", "alice"]);
    /// ```
    pub fn score_range(&self, min: i64, max: i64) -> Vec<&Entry<D>> {
        if min > max {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut x: *const Node<D> = &*self.head;
        unsafe {
            for i in (0..self.level).rev() {
                while let Some(next) = (&(*x).links)[i].forward {
                    if next.as_ref().item.as_ref().unwrap().score <= max {
                        break;
                    }
                    x = next.as_ptr();
                }
            }

            let mut cur = (&(*x).links)[0].forward;
            while let Some(node) = cur {
                let entry = node.as_ref().item.as_ref().unwrap();
                if entry.score < min {
                    break;
                }
                out.push(entry);
                cur = node.as_ref().links[0].forward;
            }
        }
        out
    }

    /// Look up a member's entry through the side map, without traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(Entry::new("alice", 100, "payload"));
    /// assert_eq!(list.get("alice").map(|e| e.data), Some("payload"));
    /// assert!(list.get("bob").is_none());
    /// ```
    #[inline]
    pub fn get(&self, member: &str) -> Option<&Entry<D>> {
        self.index
            .get(member)
            .map(|node| unsafe { node.as_ref() }.item.as_ref().unwrap())
    }

    /// Returns `true` if the member is present.
    #[inline]
    pub fn contains(&self, member: &str) -> bool {
        self.index.contains_key(member)
    }

    /// The number of entries in the list.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if the list contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The best-ranked entry, or `None` if the list is empty.
    #[inline]
    pub fn front(&self) -> Option<&Entry<D>> {
        self.head.links[0]
            .forward
            .map(|node| unsafe { &*node.as_ptr() }.item.as_ref().unwrap())
    }

    /// The worst-ranked entry, or `None` if the list is empty.
    #[inline]
    pub fn back(&self) -> Option<&Entry<D>> {
        self.tail
            .map(|node| unsafe { &*node.as_ptr() }.item.as_ref().unwrap())
    }

    /// Iterate over the entries in rank order.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(Entry::new("alice", 100, ()));
    /// list.insert(Entry::new("bob", 200, ()));
    /// let scores: Vec<_> = list.iter().map(|e| e.score).collect();
    /// assert_eq!(scores, [200, 100]);
    /// ```
    pub fn iter(&self) -> Iter<'_, D> {
        Iter {
            next: self.head.links[0].forward,
            remaining: self.len as usize,
            _marker: PhantomData,
        }
    }

    /// Remove every entry, releasing all nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use podium::{Entry, RankedSkipList};
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(Entry::new("alice", 100, ()));
    /// list.clear();
    /// assert!(list.is_empty());
    /// ```
    pub fn clear(&mut self) {
        unsafe {
            let mut cur = self.head.links[0].forward;
            while let Some(node) = cur {
                let boxed = Box::from_raw(node.as_ptr());
                cur = boxed.links[0].forward;
            }
        }
        for link in &mut self.head.links {
            link.forward = None;
            link.span = 0;
        }
        self.tail = None;
        self.level = 1;
        self.len = 0;
        self.index.clear();
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

#[cfg(test)]
impl<D> RankedSkipList<D> {
    /// Verify the structural invariants: strict ordering on level 0, exact
    /// spans on every occupied level, a clean tower above the current
    /// level, and a side map in lockstep with the chain.
    fn check(&self) {
        // Level-0 positions, 1-based, and strict ordering.
        let head: *const Node<D> = &*self.head;
        let mut positions: HashMap<*const Node<D>, u64> = HashMap::new();
        positions.insert(head, 0);
        let mut pos = 0;
        let mut prev: Option<&Entry<D>> = None;
        let mut cur = self.head.links[0].forward;
        while let Some(node) = cur {
            let node_ref = unsafe { &*node.as_ptr() };
            let entry = node_ref.item.as_ref().unwrap();
            if let Some(p) = prev {
                assert!(
                    p.precedes(entry.score, &entry.member),
                    "level-0 ordering violated at {:?}",
                    entry.member
                );
            }
            pos += 1;
            positions.insert(node.as_ptr(), pos);
            assert!(node_ref.links.len() <= self.level, "node taller than the list");
            prev = Some(entry);
            cur = node_ref.links[0].forward;
        }
        assert_eq!(pos, self.len, "length does not match the level-0 chain");

        // Tail.
        match self.tail {
            None => assert_eq!(self.len, 0),
            Some(tail) => {
                assert_eq!(positions.get(&(tail.as_ptr() as *const Node<D>)), Some(&self.len));
                assert!(unsafe { tail.as_ref() }.links[0].forward.is_none());
            }
        }

        // Spans, level by level.
        for i in 0..self.level {
            let mut x: *const Node<D> = &*self.head;
            let mut sum = 0;
            unsafe {
                loop {
                    let x_pos = positions[&x];
                    let link = &(&(*x).links)[i];
                    match link.forward {
                        Some(next) => {
                            let next_pos = positions[&(next.as_ptr() as *const Node<D>)];
                            assert_eq!(
                                link.span,
                                next_pos - x_pos,
                                "span mismatch at level {i}"
                            );
                            sum += link.span;
                            x = next.as_ptr();
                        }
                        None => {
                            assert_eq!(
                                link.span,
                                self.len - x_pos,
                                "trailing span mismatch at level {i}"
                            );
                            sum += link.span;
                            break;
                        }
                    }
                }
            }
            assert_eq!(sum, self.len, "span sum mismatch at level {i}");
        }

        // Above the current level the head must be clean.
        for link in &self.head.links[self.level..] {
            assert!(link.forward.is_none());
            assert_eq!(link.span, 0);
        }
        if self.len > 0 {
            assert!(
                self.level == 1 || self.head.links[self.level - 1].forward.is_some(),
                "current level is not maximal"
            );
        } else {
            assert_eq!(self.level, 1);
        }

        // Side map in lockstep with the chain.
        assert_eq!(self.index.len() as u64, self.len);
        for (member, node) in &self.index {
            let entry = unsafe { node.as_ref() }.item.as_ref().unwrap();
            assert_eq!(&entry.member, member, "side map points at the wrong node");
            assert!(positions.contains_key(&(node.as_ptr() as *const Node<D>)));
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<D> Default for RankedSkipList<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Drop for RankedSkipList<D> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<D> Extend<Entry<D>> for RankedSkipList<D> {
    fn extend<I: iter::IntoIterator<Item = Entry<D>>>(&mut self, iterable: I) {
        for entry in iterable {
            self.insert(entry);
        }
    }
}

impl<D> iter::FromIterator<Entry<D>> for RankedSkipList<D> {
    fn from_iter<I>(iterable: I) -> Self
    where
        I: iter::IntoIterator<Item = Entry<D>>,
    {
        let mut list = RankedSkipList::new();
        list.extend(iterable);
        list
    }
}

impl<'a, D> iter::IntoIterator for &'a RankedSkipList<D> {
    type Item = &'a Entry<D>;
    type IntoIter = Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<D> fmt::Debug for RankedSkipList<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "({:?}, {})", entry.member, entry.score)?;
        }
        write!(f, "]")
    }
}

// ///////////////////////////////////////////////
// Iterators
// ///////////////////////////////////////////////

/// An iterator over a [`RankedSkipList`]'s entries in rank order.
pub struct Iter<'a, D> {
    next: Option<NonNull<Node<D>>>,
    remaining: usize,
    _marker: PhantomData<&'a Entry<D>>,
}

impl<'a, D> Iterator for Iter<'a, D> {
    type Item = &'a Entry<D>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        let node_ref = unsafe { &*node.as_ptr() };
        self.next = node_ref.links[0].forward;
        self.remaining -= 1;
        node_ref.item.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<D> ExactSizeIterator for Iter<'_, D> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::prelude::*;

    use super::{Entry, RankedSkipList};
    use crate::level_generator::Geometric;

    fn seeded(seed: u64) -> RankedSkipList<i32> {
        let lg = Geometric::with_seed(super::MAX_LEVEL, super::PROBABILITY, seed).unwrap();
        RankedSkipList::with_level_generator(lg)
    }

    fn members(list: &RankedSkipList<i32>) -> Vec<&str> {
        list.iter().map(|e| e.member.as_str()).collect()
    }

    #[test]
    fn basic_small() {
        let mut list = seeded(1);
        list.check();
        assert!(list.remove("alice").is_none());
        list.check();

        list.insert(Entry::new("alice", 100, 0));
        list.check();
        assert_eq!(list.len(), 1);
        assert!(list.contains("alice"));
        assert!(!list.contains("bob"));
        assert_eq!(list.rank_of("alice"), Some(1));

        list.insert(Entry::new("bob", 200, 0));
        list.check();
        assert_eq!(list.len(), 2);
        assert_eq!(list.rank_of("bob"), Some(1));
        assert_eq!(list.rank_of("alice"), Some(2));

        assert_eq!(list.remove("bob").map(|e| e.score), Some(200));
        list.check();
        assert_eq!(list.rank_of("alice"), Some(1));

        assert_eq!(list.remove("alice").map(|e| e.score), Some(100));
        list.check();
        assert!(list.is_empty());
    }

    #[test]
    fn ordering_and_ties() {
        let mut list = seeded(2);
        for member in ["bob", "alice", "carol"] {
            list.insert(Entry::new(member, 100, 0));
        }
        list.check();
        // Equal scores fall back to ascending member order.
        assert_eq!(members(&list), ["alice", "bob", "carol"]);

        list.insert(Entry::new("dave", 150, 0));
        list.insert(Entry::new("erin", 50, 0));
        list.check();
        assert_eq!(members(&list), ["dave", "alice", "bob", "carol", "erin"]);
    }

    #[test]
    fn insert_existing_replaces() {
        let mut list = seeded(3);
        list.insert(Entry::new("alice", 100, 1));
        list.insert(Entry::new("bob", 200, 1));
        list.insert(Entry::new("alice", 300, 2));
        list.check();

        assert_eq!(list.len(), 2);
        assert_eq!(list.rank_of("alice"), Some(1));
        assert_eq!(list.get("alice").map(|e| (e.score, e.data)), Some((300, 2)));
    }

    #[test]
    fn rank_round_trip() {
        let mut list = seeded(4);
        for i in 0..500 {
            list.insert(Entry::new(format!("member-{i:03}"), (i * 7) % 101, 0));
        }
        list.check();

        for entry in list.iter() {
            let rank = list.rank_of(&entry.member).unwrap();
            assert_eq!(list.at_rank(rank), Some(entry));
        }
    }

    #[test]
    fn at_rank_bounds() {
        let mut list = seeded(5);
        assert!(list.at_rank(0).is_none());
        assert!(list.at_rank(1).is_none());

        for i in 0..10 {
            list.insert(Entry::new(format!("m{i}"), i, 0));
        }
        assert!(list.at_rank(0).is_none());
        assert!(list.at_rank(11).is_none());
        assert_eq!(list.at_rank(1).map(|e| e.score), Some(9));
        assert_eq!(list.at_rank(10).map(|e| e.score), Some(0));
    }

    #[test]
    fn rank_range_windows() {
        let mut list = seeded(6);
        for i in 0..100 {
            list.insert(Entry::new(format!("member-{i:03}"), 1000 - i, 0));
        }

        let window: Vec<i64> = list.rank_range(10, 15).iter().map(|e| e.score).collect();
        assert_eq!(window, [991, 990, 989, 988, 987, 986]);

        // Clamped on both sides.
        assert_eq!(list.rank_range(0, 3).len(), 3);
        assert_eq!(list.rank_range(95, 1000).len(), 6);
        assert_eq!(list.rank_range(1, 100).len(), 100);
        assert!(list.rank_range(60, 40).is_empty());
        assert!(list.rank_range(101, 200).is_empty());
    }

    #[test]
    fn rank_range_empty_list() {
        let list = seeded(7);
        assert!(list.rank_range(1, 10).is_empty());
    }

    #[test]
    fn score_range_windows() {
        let mut list = seeded(8);
        for (member, score) in [
            ("alice", 100),
            ("bob", 200),
            ("carol", 200),
            ("dave", 50),
            ("erin", -10),
        ] {
            list.insert(Entry::new(member, score, 0));
        }

        let hits: Vec<&str> = list
            .score_range(50, 200)
            .iter()
            .map(|e| e.member.as_str())
            .collect();
        assert_eq!(hits, ["bob", "carol", "alice", "dave"]);

        assert!(list.score_range(201, 100).is_empty());
        assert!(list.score_range(300, 400).is_empty());
        let all: Vec<&str> = list
            .score_range(i64::MIN, i64::MAX)
            .iter()
            .map(|e| e.member.as_str())
            .collect();
        assert_eq!(all, ["bob", "carol", "alice", "dave", "erin"]);
    }

    #[test]
    fn front_back_tail() {
        let mut list = seeded(9);
        assert!(list.front().is_none());
        assert!(list.back().is_none());

        list.insert(Entry::new("alice", 100, 0));
        assert_eq!(list.front().map(|e| e.member.as_str()), Some("alice"));
        assert_eq!(list.back().map(|e| e.member.as_str()), Some("alice"));

        list.insert(Entry::new("bob", 200, 0));
        list.insert(Entry::new("carol", 50, 0));
        assert_eq!(list.front().map(|e| e.member.as_str()), Some("bob"));
        assert_eq!(list.back().map(|e| e.member.as_str()), Some("carol"));

        list.remove("carol");
        assert_eq!(list.back().map(|e| e.member.as_str()), Some("alice"));
        list.check();
    }

    #[test]
    fn clear_releases_everything() {
        let mut list = seeded(10);
        for i in 0..100 {
            list.insert(Entry::new(format!("m{i}"), i, 0));
        }
        list.clear();
        list.check();
        assert!(list.is_empty());
        assert!(list.get("m0").is_none());
        assert!(list.rank_of("m0").is_none());

        // The list stays usable after a clear.
        list.insert(Entry::new("alice", 1, 0));
        assert_eq!(list.rank_of("alice"), Some(1));
        list.check();
    }

    #[test]
    fn iter_matches_len() {
        let mut list = seeded(11);
        for i in 0..50 {
            list.insert(Entry::new(format!("m{i:02}"), i % 5, 0));
        }
        let collected: Vec<_> = list.iter().collect();
        assert_eq!(collected.len(), 50);
        assert_eq!(list.iter().size_hint(), (50, Some(50)));
    }

    #[test]
    fn debug_output() {
        let mut list = seeded(12);
        list.insert(Entry::new("alice", 100, 0));
        list.insert(Entry::new("bob", 200, 0));
        assert_eq!(format!("{list:?}"), r#"[("bob", 200), ("alice", 100)]"#);
    }

    /// Mixed random operations against a sorted-vector oracle. The oracle
    /// holds `(score, member)` in list order; ranks are oracle positions
    /// plus one.
    #[test]
    fn stress_against_oracle() {
        let mut rng = SmallRng::seed_from_u64(0x5EED);
        let mut list = seeded(13);
        let mut oracle: Vec<(i64, String)> = Vec::new();

        let oracle_key = |score: i64, member: &str| (-score, member.to_string());

        for step in 0..10_000 {
            let member = format!("member-{:03}", rng.gen_range(0..400));
            let score = rng.gen_range(-50..50);

            if rng.gen_bool(0.7) {
                list.insert(Entry::new(member.clone(), score, 0));
                let key = oracle_key(score, &member);
                oracle.retain(|(_, m)| m != &member);
                let at = oracle
                    .binary_search_by_key(&key, |(s, m)| oracle_key(*s, m))
                    .unwrap_err();
                oracle.insert(at, (score, member.clone()));
            } else {
                let expected = oracle.iter().position(|(_, m)| m == &member);
                let removed = list.remove(&member);
                assert_eq!(removed.is_some(), expected.is_some());
                if let Some(at) = expected {
                    oracle.remove(at);
                }
            }

            assert_eq!(list.len() as usize, oracle.len());

            // Rank round-trip for a random present member.
            if !oracle.is_empty() {
                let (score, member) = &oracle[rng.gen_range(0..oracle.len())];
                let rank = list.rank_of(member).unwrap();
                let expected = oracle.iter().position(|(_, m)| m == member).unwrap() as u64 + 1;
                assert_eq!(rank, expected);
                let entry = list.at_rank(rank).unwrap();
                assert_eq!((&entry.member, entry.score), (member, *score));
            }

            if step % 64 == 0 {
                list.check();
                let got: Vec<(i64, &str)> =
                    list.iter().map(|e| (e.score, e.member.as_str())).collect();
                let want: Vec<(i64, &str)> =
                    oracle.iter().map(|(s, m)| (*s, m.as_str())).collect();
                assert_eq!(got, want);
            }
        }
        list.check();
    }
}

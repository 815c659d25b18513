use parking_lot::RwLock;
use std::{collections::BTreeSet, ops::Range};
use tempus_api::core::entities::Timestamp;

/// Ordered registry of the timestamps that currently hold at least one edge.
///
/// Every accessor takes the lock only for the duration of the call and hands out owned
/// snapshots, so callers never hold the index lock while touching the edge store.
#[derive(Default, Debug)]
pub struct TimeIndex(RwLock<BTreeSet<Timestamp>>);

impl TimeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn one(t: Timestamp) -> Self {
        let s = Self::default();
        s.insert(t);
        s
    }

    /// Returns `true` if `t` was not registered before
    pub fn insert(&self, t: Timestamp) -> bool {
        self.0.write().insert(t)
    }

    /// Returns `true` if `t` was registered
    pub fn remove(&self, t: Timestamp) -> bool {
        self.0.write().remove(&t)
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        self.0.read().contains(&t)
    }

    /// Timestamps in `w` in ascending order. Position `i` in the result is the `i`-th
    /// distinct timestamp of the window.
    pub fn range(&self, w: Range<Timestamp>) -> Vec<Timestamp> {
        if w.start >= w.end {
            return vec![];
        }
        self.0.read().range(w).copied().collect()
    }

    pub fn active(&self, w: Range<Timestamp>) -> bool {
        w.start < w.end && self.0.read().range(w).next().is_some()
    }

    pub fn first(&self) -> Option<Timestamp> {
        self.0.read().first().copied()
    }

    pub fn last(&self) -> Option<Timestamp> {
        self.0.read().last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Timestamp> {
        self.0.read().iter().copied().collect()
    }
}

impl PartialEq for TimeIndex {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || *self.0.read() == *other.0.read()
    }
}

impl FromIterator<Timestamp> for TimeIndex {
    fn from_iter<I: IntoIterator<Item = Timestamp>>(iter: I) -> Self {
        Self(RwLock::new(iter.into_iter().collect()))
    }
}

//! Shared candidate list.
//!
//! # Responsibilities
//! - Hold the ordered set of base addresses tried by the dispatcher
//! - Hand out read-consistent snapshots without blocking writers
//! - Apply replace-all, add-if-absent and promote without losing updates
//!
//! # Design Decisions
//! - `ArcSwap<Vec<String>>`: readers load a snapshot, writers go through
//!   read-copy-update so concurrent mutations are never lost
//! - Promotion is by value; a candidate removed by a concurrent replace
//!   is simply not promoted
//! - The list is never empty: construction falls back to the built-in
//!   default and an empty replacement is ignored

use std::sync::Arc;

use arc_swap::ArcSwap;

/// Address used when nothing else is configured.
pub const DEFAULT_CANDIDATE: &str = "https://fachur.ir";

/// Ordered, deduplicated list of candidate base addresses.
#[derive(Debug)]
pub struct CandidateList {
    inner: ArcSwap<Vec<String>>,
}

impl CandidateList {
    /// Create a list from the given addresses.
    ///
    /// Blank entries and duplicates are dropped. If nothing is left, the
    /// list starts with [`DEFAULT_CANDIDATE`].
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = normalize(addresses);
        if list.is_empty() {
            list.push(DEFAULT_CANDIDATE.to_string());
        }
        Self {
            inner: ArcSwap::from_pointee(list),
        }
    }

    /// Current order as a cheap shared snapshot.
    pub fn snapshot(&self) -> Arc<Vec<String>> {
        self.inner.load_full()
    }

    /// Current order as an owned vector.
    pub fn to_vec(&self) -> Vec<String> {
        self.inner.load().as_ref().clone()
    }

    /// The candidate tried first by the next dispatch.
    pub fn front(&self) -> Option<String> {
        self.inner.load().first().cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }

    /// Atomically replace every candidate.
    ///
    /// Returns `false` and leaves the list untouched when the new set is
    /// empty after dropping blanks.
    pub fn replace_all<I, S>(&self, addresses: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = normalize(addresses);
        if list.is_empty() {
            tracing::debug!("Ignoring empty candidate replacement");
            return false;
        }
        tracing::info!(candidates = ?list, "Replacing candidate list");
        self.inner.store(Arc::new(list));
        true
    }

    /// Append every address not already present (exact match).
    ///
    /// Blank addresses are skipped. Returns how many were appended.
    pub fn add_if_absent<I, S>(&self, addresses: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let additions = normalize(addresses);
        if additions.is_empty() {
            return 0;
        }

        let mut added = 0;
        self.inner.rcu(|current| {
            let mut next = Vec::clone(current);
            for address in &additions {
                if !next.contains(address) {
                    next.push(address.clone());
                }
            }
            added = next.len() - current.len();
            next
        });

        if added > 0 {
            tracing::debug!(added, "Appended candidates");
        }
        added
    }

    /// Move `candidate` to the front, keeping everything else in order.
    ///
    /// Returns `true` if the order changed.
    pub fn promote(&self, candidate: &str) -> bool {
        let mut moved = false;
        self.inner.rcu(|current| {
            moved = false;
            match current.iter().position(|c| c == candidate) {
                Some(index) if index > 0 => {
                    let mut next = Vec::clone(current);
                    let promoted = next.remove(index);
                    next.insert(0, promoted);
                    moved = true;
                    Arc::new(next)
                }
                _ => Arc::clone(current),
            }
        });
        moved
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new([DEFAULT_CANDIDATE])
    }
}

/// Drop blank entries and later duplicates, preserving first-seen order.
fn normalize<I, S>(addresses: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut list: Vec<String> = Vec::new();
    for address in addresses {
        let address = address.into();
        if address.trim().is_empty() || list.contains(&address) {
            continue;
        }
        list.push(address);
    }
    list
}

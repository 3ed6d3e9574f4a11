// src/crawl/frontier.rs
// =============================================================================
// The crawl frontier: pages waiting to be visited, in discovery order.
//
// Two collections work together:
// - queue (VecDeque): FIFO of (url, depth). Popping from the front and
//   pushing to the back gives breadth-first order: every depth-D page is
//   queued before any depth-(D+1) page is taken out.
// - visited (HashSet): every URL ever queued. It only grows, so a URL can be
//   queued at most once per crawl, even after it has been popped.
//
// URLs stored here are always canonical (urls::canonicalize).
// =============================================================================

use std::collections::{HashSet, VecDeque};

// A page waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    /// Link hops from the seed (the seed itself is 0)
    pub depth: usize,
}

#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
}

impl Frontier {
    /// A frontier holding only the seed at depth 0
    pub fn with_seed(seed: String) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed, 0);
        frontier
    }

    /// Queues a URL unless it was ever queued before
    ///
    /// Returns true if the URL was added
    pub fn push(&mut self, url: String, depth: usize) -> bool {
        if !self.visited.insert(url.clone()) {
            return false;
        }
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Takes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Entries still waiting (not the visited count)
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

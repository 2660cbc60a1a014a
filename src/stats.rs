//! Search counters shared by all worker threads.
//!
//! Each counter is its own atomic; there is no cross-counter consistency,
//! so a snapshot taken mid-search may mix slightly different moments.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Default, Debug)]
pub struct SearchStats {
    pub nodes_searched: AtomicU64,
    pub cycles_detected: AtomicU64,
    pub draw_advances_coalesced: AtomicU64,
    pub post_draw_pruned: AtomicU64,
    pub repeated_cards_pruned: AtomicU64,
    /// Length of the longest full winning line found so far, every move counted.
    pub max_depth: AtomicUsize,
    pub solutions_found: AtomicU64,
    /// Nodes waiting in the frontier, as of the last push or pop.
    pub pending: AtomicUsize,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_node(&self) -> u64 {
        self.nodes_searched.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn record_cycle(&self) {
        self.cycles_detected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_coalesce(&self) {
        self.draw_advances_coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_post_draw_prune(&self) {
        self.post_draw_pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repeat_prune(&self) {
        self.repeated_cards_pruned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_win_depth(&self, depth: usize) {
        self.max_depth.fetch_max(depth, Ordering::Relaxed);
    }

    pub fn record_solution(&self) {
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_pending(&self, pending: usize) {
        self.pending.store(pending, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            nodes_searched: self.nodes_searched.load(Ordering::Relaxed),
            cycles_detected: self.cycles_detected.load(Ordering::Relaxed),
            draw_advances_coalesced: self.draw_advances_coalesced.load(Ordering::Relaxed),
            post_draw_pruned: self.post_draw_pruned.load(Ordering::Relaxed),
            repeated_cards_pruned: self.repeated_cards_pruned.load(Ordering::Relaxed),
            max_depth: self.max_depth.load(Ordering::Relaxed),
            solutions_found: self.solutions_found.load(Ordering::Relaxed),
            pending: self.pending.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of `SearchStats` at one moment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub nodes_searched: u64,
    pub cycles_detected: u64,
    pub draw_advances_coalesced: u64,
    pub post_draw_pruned: u64,
    pub repeated_cards_pruned: u64,
    pub max_depth: usize,
    pub solutions_found: u64,
    pub pending: usize,
}

impl StatsSnapshot {
    /// Candidate moves discarded or merged by the pruner.
    pub fn total_pruned(&self) -> u64 {
        self.cycles_detected
            + self.draw_advances_coalesced
            + self.post_draw_pruned
            + self.repeated_cards_pruned
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "solutions={} max_depth={} pending={} nodes={} cycles={} coalesced={} post_draw={} repeated={}",
            self.solutions_found,
            self.max_depth,
            self.pending,
            self.nodes_searched,
            self.cycles_detected,
            self.draw_advances_coalesced,
            self.post_draw_pruned,
            self.repeated_cards_pruned,
        )
    }
}

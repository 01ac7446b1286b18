pub mod activity_selection;
pub mod binary_search;
pub mod cyclic_sort;
pub mod fast_slow;
pub mod fibonacci;
pub mod list_reversal;
pub mod merge_intervals;
pub mod sliding_window;
pub mod subsets;
pub mod topological;
pub mod tree_bfs;
pub mod tree_dfs;
pub mod two_heaps;
pub mod two_pointers;

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::render::Surface;

/// Outcome of rendering one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// The frame was drawn. An empty description leaves the previous one
    /// on screen.
    Continuing { description: String },
    /// The algorithm has nothing left to show; playback stops.
    Finished,
}

impl Frame {
    pub fn describe(description: impl Into<String>) -> Self {
        Frame::Continuing {
            description: description.into(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Frame::Continuing { description } => Some(description),
            Frame::Finished => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Frame::Finished)
    }
}

/// Every pattern renders step `n` from scratch through one of these.
pub type Simulator = fn(&mut dyn Surface, usize) -> Frame;

/// A visualizable pattern and every id it answers to.
#[derive(Debug, Clone, Copy)]
pub struct PatternEntry {
    /// Canonical id
    pub name: &'static str,
    pub title: &'static str,
    pub aliases: &'static [&'static str],
    pub simulate: Simulator,
}

/// All registered patterns, in catalog order.
pub static PATTERNS: &[PatternEntry] = &[
    PatternEntry {
        name: "two-pointers",
        title: "Two pointers converging on a target sum",
        aliases: &[
            "i-two-pointer-patterns",
            "pattern-1-two-pointers-converging-sorted-array-target-sum",
            "two-pointers-converging",
            "1",
        ],
        simulate: two_pointers::simulate,
    },
    PatternEntry {
        name: "sliding-window",
        title: "Fixed-size sliding window sums",
        aliases: &[
            "ii-sliding-window-patterns",
            "pattern-2-sliding-window-fixed-size",
            "sliding-window-fixed",
            "2",
        ],
        simulate: sliding_window::simulate_fixed,
    },
    PatternEntry {
        name: "sliding-window-variable",
        title: "Shortest window reaching a target sum",
        aliases: &[],
        simulate: sliding_window::simulate_variable,
    },
    PatternEntry {
        name: "fast-slow",
        title: "Fast and slow pointers finding a cycle",
        aliases: &[
            "iii-fast-slow-pointers-patterns",
            "pattern-3-fast-slow-pointers-cycle-detection",
            "two-pointers-fast-slow",
            "3",
        ],
        simulate: fast_slow::simulate,
    },
    PatternEntry {
        name: "merge-intervals",
        title: "Merging overlapping intervals",
        aliases: &["iv-merge-intervals-patterns", "pattern-4-merge-intervals", "4"],
        simulate: merge_intervals::simulate,
    },
    PatternEntry {
        name: "cyclic-sort",
        title: "Cyclic sort of the numbers 0..n",
        aliases: &["v-cyclic-sort-patterns", "pattern-5-cyclic-sort", "5"],
        simulate: cyclic_sort::simulate,
    },
    PatternEntry {
        name: "list-reversal",
        title: "In-place reversal of a linked list",
        aliases: &[
            "vi-in-place-reversal-patterns",
            "pattern-6-in-place-reversal-of-linked-list",
            "6",
        ],
        simulate: list_reversal::simulate,
    },
    PatternEntry {
        name: "tree-bfs",
        title: "Level-order tree traversal",
        aliases: &["vii-tree-bfs-patterns", "pattern-7-tree-breadth-first-search", "7"],
        simulate: tree_bfs::simulate,
    },
    PatternEntry {
        name: "tree-dfs",
        title: "Preorder tree traversal",
        aliases: &["viii-tree-dfs-patterns", "pattern-8-tree-depth-first-search", "8"],
        simulate: tree_dfs::simulate,
    },
    PatternEntry {
        name: "two-heaps",
        title: "Running median with two heaps",
        aliases: &["ix-two-heaps-patterns", "pattern-9-two-heaps", "9"],
        simulate: two_heaps::simulate,
    },
    PatternEntry {
        name: "subsets",
        title: "Generating every subset",
        aliases: &["x-subsets-patterns", "pattern-10-subsets", "10"],
        simulate: subsets::simulate,
    },
    PatternEntry {
        name: "binary-search",
        title: "Binary search in a rotated array",
        aliases: &[
            "xi-modified-binary-search-patterns",
            "pattern-11-modified-binary-search",
            "11",
        ],
        simulate: binary_search::simulate,
    },
    PatternEntry {
        name: "topological-sort",
        title: "Depth-first topological sort",
        aliases: &["xii-topological-sort-patterns", "pattern-12-topological-sort", "12"],
        simulate: topological::simulate,
    },
    PatternEntry {
        name: "fibonacci",
        title: "Memoized Fibonacci",
        aliases: &[
            "xiii-dynamic-programming-patterns",
            "pattern-13-dynamic-programming",
            "13",
        ],
        simulate: fibonacci::simulate,
    },
    PatternEntry {
        name: "activity-selection",
        title: "Greedy activity selection",
        aliases: &[
            "xiv-greedy-algorithms-patterns",
            "pattern-14-greedy-algorithms",
            "14",
        ],
        simulate: activity_selection::simulate,
    },
];

static INDEX: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    let mut index = HashMap::new();
    for (i, entry) in PATTERNS.iter().enumerate() {
        index.insert(entry.name, i);
        for alias in entry.aliases {
            index.insert(*alias, i);
        }
    }
    index
});

/// Position of the pattern `id` names in [`PATTERNS`].
pub fn position(id: &str) -> Option<usize> {
    let found = INDEX.get(id).copied();
    if found.is_none() {
        tracing::debug!(id, "no animation registered");
    }
    found
}

pub fn entry(id: &str) -> Option<&'static PatternEntry> {
    position(id).map(|i| &PATTERNS[i])
}

/// Simulator registered under `id`, by canonical name or any alias.
pub fn lookup(id: &str) -> Option<Simulator> {
    entry(id).map(|e| e.simulate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    #[test]
    fn test_every_alias_resolves_to_its_entry() {
        for entry in PATTERNS {
            assert!(lookup(entry.name).is_some(), "{}", entry.name);
            for alias in entry.aliases {
                assert_eq!(super::entry(alias).map(|e| e.name), Some(entry.name));
            }
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let total: usize = PATTERNS.iter().map(|e| 1 + e.aliases.len()).sum();
        assert_eq!(INDEX.len(), total);
    }

    #[test]
    fn test_legacy_ids() {
        assert_eq!(entry("two-pointers-fast-slow").map(|e| e.name), Some("fast-slow"));
        assert_eq!(entry("2").map(|e| e.name), Some("sliding-window"));
        assert_eq!(entry("14").map(|e| e.name), Some("activity-selection"));
        assert!(lookup("sliding-window-variable").is_some());
    }

    #[test]
    fn test_miss_is_none() {
        assert!(lookup("xv-not-a-pattern").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_every_simulator_is_deterministic() {
        for entry in PATTERNS {
            for step in 0..40 {
                let mut a = RecordingSurface::new();
                let mut b = RecordingSurface::new();
                let fa = (entry.simulate)(&mut a, step);
                let fb = (entry.simulate)(&mut b, step);
                assert_eq!(fa, fb, "{} step {step}", entry.name);
                assert_eq!(a.calls(), b.calls(), "{} step {step}", entry.name);
            }
        }
    }

    #[test]
    fn test_every_frame_starts_from_a_clear_surface() {
        for entry in PATTERNS {
            let mut s = RecordingSurface::new();
            (entry.simulate)(&mut s, 3);
            let after_three = s.calls().to_vec();
            (entry.simulate)(&mut s, 1);
            (entry.simulate)(&mut s, 3);
            assert_eq!(s.calls(), &after_three[..], "{}", entry.name);
        }
    }
}

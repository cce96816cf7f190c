//! Aggregate view of skipped entries, for diagnostics.

use std::collections::{BTreeMap, HashMap};

use crate::scanner::{SkipReason, SkippedEntry};

/// Default number of top-level directories listed in a summary.
pub const DEFAULT_ROOT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkipSummary {
    pub total: usize,
    pub by_reason: BTreeMap<SkipReason, usize>,
    /// Top-level path segments with the most skips, as `(name, count)`.
    pub top_roots: Vec<(String, usize)>,
}

/// Counts `skipped` by reason and by first path segment.
///
/// `top_roots` keeps at most `root_limit` segments, ordered by descending
/// count and then by name.
pub fn summarize_skipped(skipped: &[SkippedEntry], root_limit: usize) -> SkipSummary {
    let mut by_reason = BTreeMap::new();
    let mut by_root: HashMap<&str, usize> = HashMap::new();

    for entry in skipped {
        *by_reason.entry(entry.reason).or_insert(0) += 1;
        let root = entry
            .relative_path
            .split('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or(entry.relative_path.as_str());
        *by_root.entry(root).or_insert(0) += 1;
    }

    let mut top_roots: Vec<(String, usize)> = by_root
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    top_roots.sort_by(|(a_name, a_count), (b_name, b_count)| {
        b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
    });
    top_roots.truncate(root_limit);

    SkipSummary {
        total: skipped.len(),
        by_reason,
        top_roots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skipped(path: &str, reason: SkipReason) -> SkippedEntry {
        SkippedEntry {
            relative_path: path.to_string(),
            reason,
            detail: None,
        }
    }

    #[test]
    fn test_counts_by_reason_and_root() {
        let entries = vec![
            skipped("node_modules/a/index.js", SkipReason::Excluded),
            skipped("node_modules/b/index.js", SkipReason::Excluded),
            skipped("assets/logo.png", SkipReason::Binary),
            skipped("data/dump.sql", SkipReason::TooLarge),
            skipped("data/other.sql", SkipReason::TooLarge),
            skipped("Cargo.lock", SkipReason::Excluded),
        ];
        let summary = summarize_skipped(&entries, DEFAULT_ROOT_LIMIT);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.by_reason.get(&SkipReason::Excluded), Some(&3));
        assert_eq!(summary.by_reason.get(&SkipReason::TooLarge), Some(&2));
        assert_eq!(summary.by_reason.get(&SkipReason::Binary), Some(&1));
        assert_eq!(summary.by_reason.get(&SkipReason::Unreadable), None);
        assert_eq!(
            summary.top_roots,
            vec![
                ("data".to_string(), 2),
                ("node_modules".to_string(), 2),
                ("Cargo.lock".to_string(), 1),
                ("assets".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_root_limit_truncates() {
        let entries: Vec<SkippedEntry> = (0..5)
            .map(|i| skipped(&format!("dir{}/file", i), SkipReason::Excluded))
            .collect();
        let summary = summarize_skipped(&entries, 2);
        assert_eq!(summary.top_roots.len(), 2);
        assert_eq!(summary.top_roots[0].0, "dir0");
        assert_eq!(summary.top_roots[1].0, "dir1");
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize_skipped(&[], DEFAULT_ROOT_LIMIT);
        assert_eq!(summary, SkipSummary::default());
    }
}

//! Retention planning for the cache root
//!
//! Decides, for every file found under the cache root, whether the
//! reconciliation pass keeps it or deletes it. Planning is pure: it only
//! looks at names and listing order.

use crate::cache::identity::Identity;
use crate::store::BlobEntry;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// What reconciliation does with one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Newest version of a retained package
    Keep,
    /// Name does not parse as an identity
    Unrecognized,
    /// A newer version of the same package exists
    Outdated,
    /// Newest version, but its package is past the retention limit
    Excess,
}

impl Verdict {
    /// Whether the entry gets deleted
    pub fn is_marked(&self) -> bool {
        !matches!(self, Self::Keep)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Unrecognized => write!(f, "unrecognized"),
            Self::Outdated => write!(f, "outdated"),
            Self::Excess => write!(f, "excess"),
        }
    }
}

/// One listed entry with its verdict
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    pub entry: BlobEntry,
    pub identity: Option<Identity>,
    pub verdict: Verdict,
}

/// Verdicts for a whole directory listing, in listing order
#[derive(Debug, Clone, Default)]
pub struct EvictionPlan {
    pub entries: Vec<PlannedEntry>,
}

impl EvictionPlan {
    /// Plan evictions for `listing` under the given retention limit
    ///
    /// Packages are ranked by the order in which they were first seen in the
    /// listing; only the first `retention_limit` packages keep an entry.
    pub fn new(listing: Vec<BlobEntry>, retention_limit: usize) -> Self {
        let mut entries: Vec<PlannedEntry> = listing
            .into_iter()
            .map(|entry| {
                let identity = Identity::from_file_name(&entry.name);
                let verdict = if identity.is_some() {
                    Verdict::Keep
                } else {
                    Verdict::Unrecognized
                };
                PlannedEntry {
                    entry,
                    identity,
                    verdict,
                }
            })
            .collect();

        // Group indices by package id, groups in first-sighting order.
        // Ids compare case-insensitively; written names are always lower-case.
        let mut group_index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Vec<(usize, semver::Version)>> = Vec::new();
        for (i, planned) in entries.iter().enumerate() {
            let Some(identity) = &planned.identity else {
                continue;
            };
            let slot = *group_index
                .entry(identity.package_id.to_lowercase())
                .or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
            groups[slot].push((i, identity.version.clone()));
        }

        let mut kept = Vec::with_capacity(groups.len());
        for mut members in groups {
            members.sort_by(|(_, a), (_, b)| b.cmp(a));
            kept.push(members[0].0);
            for (outdated, _) in &members[1..] {
                entries[*outdated].verdict = Verdict::Outdated;
            }
        }

        for &excess in kept.iter().skip(retention_limit) {
            entries[excess].verdict = Verdict::Excess;
        }

        Self { entries }
    }

    /// Entries that will be deleted
    pub fn marked(&self) -> impl Iterator<Item = &PlannedEntry> {
        self.entries.iter().filter(|p| p.verdict.is_marked())
    }

    /// Entries that survive
    pub fn kept(&self) -> impl Iterator<Item = &PlannedEntry> {
        self.entries.iter().filter(|p| !p.verdict.is_marked())
    }

    /// Number of entries with the given verdict
    pub fn count(&self, verdict: Verdict) -> usize {
        self.entries.iter().filter(|p| p.verdict == verdict).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn listing(names: &[&str]) -> Vec<BlobEntry> {
        names
            .iter()
            .map(|n| BlobEntry {
                name: n.to_string(),
                location: PathBuf::from("/cache").join(n),
            })
            .collect()
    }

    fn verdicts(plan: &EvictionPlan) -> Vec<(&str, Verdict)> {
        plan.entries
            .iter()
            .map(|p| (p.entry.name.as_str(), p.verdict))
            .collect()
    }

    #[test]
    fn keeps_newest_and_first_sighted_package() {
        let plan = EvictionPlan::new(listing(&["a-1.0.0", "a-1.2.0", "b-2.0.0"]), 1);

        assert_eq!(
            verdicts(&plan),
            vec![
                ("a-1.0.0", Verdict::Outdated),
                ("a-1.2.0", Verdict::Keep),
                ("b-2.0.0", Verdict::Excess),
            ]
        );
    }

    #[test]
    fn group_order_follows_first_sighting() {
        let plan = EvictionPlan::new(listing(&["b-2.0.0", "a-1.0.0", "a-1.2.0"]), 1);

        let kept: Vec<_> = plan.kept().map(|p| p.entry.name.as_str()).collect();
        assert_eq!(kept, vec!["b-2.0.0"]);
        assert_eq!(plan.count(Verdict::Outdated), 1);
        assert_eq!(plan.count(Verdict::Excess), 1);
    }

    #[test]
    fn mixed_case_ids_share_a_group() {
        let plan = EvictionPlan::new(listing(&["Tool-1.0.0", "tool-2.0.0", "b-1.0.0"]), 2);

        assert_eq!(
            verdicts(&plan),
            vec![
                ("Tool-1.0.0", Verdict::Outdated),
                ("tool-2.0.0", Verdict::Keep),
                ("b-1.0.0", Verdict::Keep),
            ]
        );
    }

    #[test]
    fn outdated_removed_even_under_limit() {
        let plan = EvictionPlan::new(listing(&["a-1.0.0", "a-1.2.0", "b-2.0.0"]), 10);

        let marked: Vec<_> = plan.marked().map(|p| p.entry.name.as_str()).collect();
        assert_eq!(marked, vec!["a-1.0.0"]);
    }

    #[test]
    fn versions_compare_numerically() {
        let plan = EvictionPlan::new(listing(&["a-1.10.0", "a-1.9.9", "a-1.10.1", "a-0.99.0"]), 5);

        let kept: Vec<_> = plan.kept().map(|p| p.entry.name.as_str()).collect();
        assert_eq!(kept, vec!["a-1.10.1"]);
        assert_eq!(plan.count(Verdict::Outdated), 3);
    }

    #[test]
    fn unrecognized_always_marked() {
        let plan = EvictionPlan::new(listing(&["README", "a-1.0.0", "a-1.0", ".a-1.0.0.x.partial"]), 10);

        assert_eq!(plan.count(Verdict::Unrecognized), 3);
        assert_eq!(plan.count(Verdict::Keep), 1);
    }

    #[test]
    fn already_pruned_listing_marks_nothing() {
        let names = ["a-1.2.0", "b-2.0.0", "publisher.tool-0.3.1"];
        let plan = EvictionPlan::new(listing(&names), 3);
        assert_eq!(plan.marked().count(), 0);

        let survivors: Vec<_> = plan.kept().map(|p| p.entry.clone()).collect();
        let replanned = EvictionPlan::new(survivors, 3);
        assert_eq!(replanned.marked().count(), 0);
    }

    #[test]
    fn empty_listing() {
        let plan = EvictionPlan::new(Vec::new(), 3);
        assert!(plan.entries.is_empty());
    }
}

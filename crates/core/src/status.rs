//! File change status and its visual priority order

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Status of a single path as reported by the change source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// New file (staged or untracked)
    #[serde(alias = "new")]
    Added,
    /// Copy of another tracked file
    Copied,
    /// Content changed
    Modified,
    /// Moved from another path
    Renamed,
    /// Removed from the working tree or index
    Deleted,
    /// Unresolved merge conflict
    Conflicted,
    /// Reported without a change
    Untouched,
    /// Any status name this build does not know
    #[serde(other)]
    Unknown,
}

impl Status {
    /// All statuses, lowest priority first
    pub const ALL: [Status; 8] = [
        Status::Unknown,
        Status::Untouched,
        Status::Added,
        Status::Copied,
        Status::Modified,
        Status::Renamed,
        Status::Deleted,
        Status::Conflicted,
    ];

    /// Visual priority; higher wins when statuses meet on a shared ancestor
    pub const fn priority(self) -> u8 {
        match self {
            Status::Unknown => 0,
            Status::Untouched => 1,
            Status::Added => 2,
            Status::Copied => 3,
            Status::Modified => 4,
            Status::Renamed => 5,
            Status::Deleted => 6,
            Status::Conflicted => 7,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Added => "added",
            Status::Copied => "copied",
            Status::Modified => "modified",
            Status::Renamed => "renamed",
            Status::Deleted => "deleted",
            Status::Conflicted => "conflicted",
            Status::Untouched => "untouched",
            Status::Unknown => "unknown",
        }
    }
}

/// Total order over statuses by visual priority
///
/// `Greater` means `a` outranks `b`. Equal statuses compare `Equal`; callers
/// decide how to break ties.
pub fn compare(a: Status, b: Status) -> Ordering {
    a.priority().cmp(&b.priority())
}

impl PartialOrd for Status {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Status {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(*self, *other)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicted_outranks_everything() {
        for status in Status::ALL {
            if status != Status::Conflicted {
                assert_eq!(compare(Status::Conflicted, status), Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_warn_statuses_outrank_additions() {
        for high in [Status::Modified, Status::Renamed, Status::Deleted] {
            for low in [Status::Added, Status::Copied] {
                assert_eq!(compare(high, low), Ordering::Greater, "{high} vs {low}");
            }
        }
    }

    #[test]
    fn test_order_is_total_and_consistent() {
        for a in Status::ALL {
            assert_eq!(compare(a, a), Ordering::Equal);
            for b in Status::ALL {
                assert_eq!(compare(a, b), compare(b, a).reverse());
                if a != b {
                    assert_ne!(compare(a, b), Ordering::Equal);
                }
                for c in Status::ALL {
                    if compare(a, b) == Ordering::Greater && compare(b, c) == Ordering::Greater {
                        assert_eq!(compare(a, c), Ordering::Greater);
                    }
                }
            }
        }
    }

    #[test]
    fn test_all_is_sorted_by_priority() {
        let mut sorted = Status::ALL;
        sorted.sort();
        assert_eq!(sorted, Status::ALL);
    }

    #[test]
    fn test_serde_names() {
        let status: Status = serde_json::from_str("\"new\"").unwrap();
        assert_eq!(status, Status::Added);
        assert_eq!(serde_json::to_string(&Status::Conflicted).unwrap(), "\"conflicted\"");
    }

    #[test]
    fn test_unrecognized_name_is_unknown_with_lowest_priority() {
        let status: Status = serde_json::from_str("\"ignored\"").unwrap();
        assert_eq!(status, Status::Unknown);
        for other in Status::ALL {
            if other != Status::Unknown {
                assert_eq!(compare(other, Status::Unknown), Ordering::Greater);
            }
        }
    }
}

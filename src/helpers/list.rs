//! List helpers for badge rows and keyword lists

use serde::Serialize;

/// A truncated list of badges plus the number of hidden entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BadgeList {
    pub shown: Vec<String>,
    pub more: usize,
}

impl BadgeList {
    /// Keep the first `max` items and count the rest ("+N more")
    pub fn truncated(items: &[String], max: usize) -> Self {
        let shown = items.iter().take(max).cloned().collect();
        Self {
            shown,
            more: items.len().saturating_sub(max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    /// Label of the overflow badge, if any
    pub fn more_label(&self) -> Option<String> {
        (self.more > 0).then(|| format!("+{} more", self.more))
    }
}

/// Join keywords with ", ", skipping blanks
pub fn join_keywords(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Remove blank and repeated keywords while keeping the first occurrence
pub fn dedup_keywords(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|k| !k.trim().is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_badges_truncate_with_overflow() {
        let badges = BadgeList::truncated(&strings(&["Rust", "React", "Figma", "Go", "Swift"]), 3);
        assert_eq!(badges.shown, strings(&["Rust", "React", "Figma"]));
        assert_eq!(badges.more, 2);
        assert_eq!(badges.more_label().as_deref(), Some("+2 more"));
    }

    #[test]
    fn test_badges_without_overflow() {
        let badges = BadgeList::truncated(&strings(&["Rust"]), 3);
        assert_eq!(badges.more, 0);
        assert!(badges.more_label().is_none());
        assert!(BadgeList::truncated(&[], 3).is_empty());
    }

    #[test]
    fn test_join_keywords() {
        assert_eq!(join_keywords(&strings(&["ui", " ", "ux "])), "ui, ux");
        assert_eq!(join_keywords(&[]), "");
    }

    #[test]
    fn test_dedup_keywords() {
        assert_eq!(
            dedup_keywords(strings(&["Design", "blog", "design", ""])),
            strings(&["Design", "blog"])
        );
    }
}

//! # Location Tracker
//!
//! An insertion-ordered multimap from a tracked value to every location the
//! value was seen at. Both uniqueness checks reduce to finding values with
//! more than one location, so both are written against this type.
//!
//! Groups come back in the order their value was first tracked, and the
//! locations inside a group keep their tracking order, so reports are
//! deterministic for a given input order.

use std::collections::HashMap;

/// Groups locations by the value found there.
#[derive(Debug, Clone)]
pub struct LocationTracker<L> {
    /// Values in first-seen order.
    order: Vec<String>,
    /// Locations recorded for each value.
    groups: HashMap<String, Vec<L>>,
}

impl<L> Default for LocationTracker<L> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            groups: HashMap::new(),
        }
    }
}

impl<L> LocationTracker<L> {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `location` against `value`.
    ///
    /// Empty values are never tracked; returns `false` when the value was
    /// skipped.
    pub fn track(&mut self, value: impl Into<String>, location: L) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        match self.groups.get_mut(&value) {
            Some(locations) => locations.push(location),
            None => {
                self.order.push(value.clone());
                self.groups.insert(value, vec![location]);
            }
        }
        true
    }

    /// Locations recorded for `value`, if any.
    pub fn get(&self, value: &str) -> Option<&[L]> {
        self.groups.get(value).map(Vec::as_slice)
    }

    /// Number of distinct values tracked.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing has been tracked.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every group, in first-seen order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[L])> {
        self.order.iter().filter_map(move |value| {
            self.groups
                .get(value)
                .map(|locations| (value.as_str(), locations.as_slice()))
        })
    }

    /// Groups whose value was seen at two or more locations.
    pub fn groups_with_more_than_one_member(&self) -> impl Iterator<Item = (&str, &[L])> {
        self.groups().filter(|(_, locations)| locations.len() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_not_tracked() {
        let mut tracker = LocationTracker::new();
        assert!(!tracker.track("", "a.book.yml"));
        assert!(tracker.is_empty());
        assert!(tracker.get("").is_none());
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let mut tracker = LocationTracker::new();
        tracker.track("b", 1);
        tracker.track("a", 2);
        tracker.track("b", 3);
        let groups: Vec<(&str, &[i32])> = tracker.groups().collect();
        assert_eq!(groups, vec![("b", &[1, 3][..]), ("a", &[2][..])]);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn only_repeated_values_are_duplicates() {
        let mut tracker = LocationTracker::new();
        tracker.track("intro", "chapters[0].pages[0].shortName");
        tracker.track("setup", "chapters[0].pages[1].shortName");
        tracker.track("intro", "chapters[1].pages[0].shortName");
        let dups: Vec<_> = tracker.groups_with_more_than_one_member().collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].0, "intro");
        assert_eq!(
            dups[0].1,
            &[
                "chapters[0].pages[0].shortName",
                "chapters[1].pages[0].shortName"
            ]
        );
    }
}

//! Per-element baseline colors
//!
//! The baseline is the background an element had before any override. It
//! is captured once per element instance and kept in a weak association, so
//! an element the page has thrown away loses its entry and a replacement
//! element gets its own capture.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Weak element → baseline association
#[derive(Debug)]
pub struct BaselineMemo<E> {
    entries: Mutex<Vec<(Weak<E>, String)>>,
}

impl<E> BaselineMemo<E> {
    /// Create empty memo
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Baseline for this element, running `capture` on first sight
    pub fn get_or_capture(&self, element: &Arc<E>, capture: impl FnOnce() -> String) -> String {
        let mut entries = self.entries.lock();
        evict_dead(&mut entries);
        if let Some((_, baseline)) = entries.iter().find(|(weak, _)| is_same(weak, element)) {
            return baseline.clone();
        }

        let baseline = capture();
        entries.push((Arc::downgrade(element), baseline.clone()));
        baseline
    }

    /// Number of live elements with a baseline
    #[must_use]
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock();
        evict_dead(&mut entries);
        entries.len()
    }

    /// Check if no live element has a baseline
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for BaselineMemo<E> {
    fn default() -> Self {
        Self::new()
    }
}

// Must run before any pointer comparison: a freed allocation can be reused
// by a new element at the same address.
fn evict_dead<E>(entries: &mut Vec<(Weak<E>, String)>) {
    entries.retain(|(weak, _)| weak.strong_count() > 0);
}

fn is_same<E>(weak: &Weak<E>, element: &Arc<E>) -> bool {
    std::ptr::eq(weak.as_ptr(), Arc::as_ptr(element))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Element;

    #[test]
    fn captures_once_per_instance() {
        let memo = BaselineMemo::new();
        let nav = Arc::new(Element);

        assert_eq!(memo.get_or_capture(&nav, || "rgb(35, 47, 62)".to_string()), "rgb(35, 47, 62)");
        let second = memo.get_or_capture(&nav, || panic!("captured twice"));
        assert_eq!(second, "rgb(35, 47, 62)");
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn new_instance_gets_own_baseline() {
        let memo = BaselineMemo::new();
        let first = Arc::new(Element);
        let second = Arc::new(Element);

        memo.get_or_capture(&first, || "a".to_string());
        assert_eq!(memo.get_or_capture(&second, || "b".to_string()), "b");
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn dropped_elements_are_evicted() {
        let memo = BaselineMemo::new();
        let nav = Arc::new(Element);
        memo.get_or_capture(&nav, || "a".to_string());
        assert_eq!(memo.len(), 1);

        drop(nav);
        assert!(memo.is_empty());
    }

    #[test]
    fn clones_of_same_handle_share_baseline() {
        let memo = BaselineMemo::new();
        let nav = Arc::new(Element);
        let alias = Arc::clone(&nav);
        memo.get_or_capture(&nav, || "a".to_string());
        assert_eq!(memo.get_or_capture(&alias, || panic!("captured twice")), "a");
    }
}

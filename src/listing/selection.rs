//! Shared selected-tag state

use std::sync::{Arc, RwLock};

/// The currently selected tag, shared between every view constructed with a
/// clone of the same store.
///
/// The original design kept this in an implicit module-global; here it is an
/// explicit container injected at view construction, so unrelated view
/// instances only couple when a caller wires them to the same store. Writes
/// are last-write-wins and reads always observe the latest value.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected tag, if any
    pub fn selected(&self) -> Option<String> {
        self.inner.read().expect("selection store poisoned").clone()
    }

    /// Whether the given tag is the current selection
    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected().as_deref() == Some(tag)
    }

    /// Select a tag, replacing any previous selection
    pub fn set(&self, tag: &str) {
        *self.inner.write().expect("selection store poisoned") = Some(tag.to_string());
    }

    /// Clear the selection
    pub fn clear(&self) {
        *self.inner.write().expect("selection store poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let store = SelectionStore::new();
        let other = store.clone();

        store.set("rust");
        other.set("go");

        assert_eq!(store.selected().as_deref(), Some("go"));
        assert!(other.is_selected("go"));
    }

    #[test]
    fn test_clear() {
        let store = SelectionStore::new();
        store.set("rust");
        store.clear();
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_independent_stores_do_not_couple() {
        let a = SelectionStore::new();
        let b = SelectionStore::new();
        a.set("rust");
        assert_eq!(b.selected(), None);
    }
}

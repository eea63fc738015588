//! Per-session record cache
//!
//! Remembers the last version of every record seen in a response, keyed by
//! set number, so a detail view or an admin prefill doesn't need another
//! round trip. Never invalidated; it lives as long as the process.

use crate::catalog::CatalogItem;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    items: HashMap<i64, CatalogItem>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store every record that carries an identifier, newest wins
    pub fn remember_all(&mut self, items: &[CatalogItem]) {
        for item in items {
            if let Some(id) = item.set_number {
                self.items.insert(id, item.clone());
            }
        }
    }

    pub fn get(&self, set_number: i64) -> Option<&CatalogItem> {
        self.items.get(&set_number)
    }

    pub fn forget(&mut self, set_number: i64) {
        self.items.remove(&set_number);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: Option<i64>, name: &str) -> CatalogItem {
        CatalogItem {
            set_number: id,
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_remember_and_get() {
        let mut cache = SessionCache::new();
        cache.remember_all(&[item(Some(1), "a"), item(Some(2), "b")]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(2).unwrap().display_name(), "b");
        assert!(cache.get(3).is_none());
    }

    #[test]
    fn test_newest_wins() {
        let mut cache = SessionCache::new();
        cache.remember_all(&[item(Some(1), "old")]);
        cache.remember_all(&[item(Some(1), "new")]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1).unwrap().display_name(), "new");
    }

    #[test]
    fn test_records_without_identifier_are_skipped() {
        let mut cache = SessionCache::new();
        cache.remember_all(&[item(None, "orphan")]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_forget() {
        let mut cache = SessionCache::new();
        cache.remember_all(&[item(Some(7), "x")]);
        cache.forget(7);
        assert!(cache.is_empty());
    }
}

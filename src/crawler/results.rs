use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Result of offering a page's text to the [`ResultStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The text was stored under its path
    Stored,
    /// A page with the same path was stored earlier; nothing changed
    Duplicate,
    /// The store already holds `max_pages` entries; nothing changed
    Full,
}

/// Path → extracted text, bounded by the session's page budget
///
/// The first write for a path wins. The map never grows past its capacity.
#[derive(Debug)]
pub struct ResultStore {
    sections: Mutex<BTreeMap<String, String>>,
    capacity: usize,
}

impl ResultStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            sections: Mutex::new(BTreeMap::new()),
            capacity,
        }
    }

    /// Stores `text` under `path` if there is room and the path is new
    pub fn insert(&self, path: &str, text: String) -> StoreOutcome {
        let mut sections = self.sections.lock().unwrap_or_else(PoisonError::into_inner);
        if sections.len() >= self.capacity {
            return StoreOutcome::Full;
        }
        if sections.contains_key(path) {
            return StoreOutcome::Duplicate;
        }
        sections.insert(path.to_string(), text);
        StoreOutcome::Stored
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.sections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies out every stored section, ordered by path
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.sections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let store = ResultStore::new(5);
        assert_eq!(store.insert("/about", "first".into()), StoreOutcome::Stored);
        assert_eq!(
            store.insert("/about", "second".into()),
            StoreOutcome::Duplicate
        );
        assert_eq!(store.snapshot()["/about"], "first");
    }

    #[test]
    fn test_capacity_is_enforced() {
        let store = ResultStore::new(2);
        store.insert("/", "home".into());
        store.insert("/a", "a".into());

        assert!(store.is_full());
        assert_eq!(store.insert("/b", "b".into()), StoreOutcome::Full);
        assert_eq!(store.len(), 2);
        assert!(!store.snapshot().contains_key("/b"));
    }

    #[test]
    fn test_snapshot_is_ordered_by_path() {
        let store = ResultStore::new(5);
        store.insert("/team", "t".into());
        store.insert("/", "h".into());
        store.insert("/about", "a".into());

        let keys: Vec<_> = store.snapshot().into_keys().collect();
        assert_eq!(keys, vec!["/", "/about", "/team"]);
    }
}

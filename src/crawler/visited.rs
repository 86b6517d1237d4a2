use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Result of trying to register a URL with the [`VisitedRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First time this URL was seen; the caller owns scheduling it
    New,
    /// Already registered earlier in the session
    Seen,
    /// The registry reached its cap and accepts nothing new
    Full,
}

/// Set of every normalized URL ever scheduled in a session
///
/// Checking and inserting happen under one lock, so two workers finding
/// the same link concurrently cannot both get [`Registration::New`].
#[derive(Debug)]
pub struct VisitedRegistry {
    seen: Mutex<HashSet<String>>,
    cap: usize,
}

impl VisitedRegistry {
    pub fn new(cap: usize) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            cap,
        }
    }

    /// Atomically checks and records `url`
    pub fn register(&self, url: &Url) -> Registration {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(url.as_str()) {
            return Registration::Seen;
        }
        if seen.len() >= self.cap {
            return Registration::Full;
        }
        seen.insert(url.as_str().to_string());
        Registration::New
    }

    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_register_new_then_seen() {
        let registry = VisitedRegistry::new(10);
        assert_eq!(
            registry.register(&url("https://example.com/a")),
            Registration::New
        );
        assert_eq!(
            registry.register(&url("https://example.com/a")),
            Registration::Seen
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_cap_is_enforced() {
        let registry = VisitedRegistry::new(2);
        registry.register(&url("https://example.com/a"));
        registry.register(&url("https://example.com/b"));

        assert_eq!(
            registry.register(&url("https://example.com/c")),
            Registration::Full
        );
        // Already-known URLs are still reported as seen at the cap
        assert_eq!(
            registry.register(&url("https://example.com/a")),
            Registration::Seen
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_registration_yields_one_winner() {
        let registry = std::sync::Arc::new(VisitedRegistry::new(100));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.register(&url("https://example.com/x")))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|r| *r == Registration::New)
            .count();
        assert_eq!(winners, 1);
    }
}

//! Parsed selector caching.
//! Parsing is a pure function of the selector text, so results can be reused freely.

use crate::{MAX_NESTING_CEILING, SelectorList, SyntaxError, parse_selector_list_with_limit};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::rc::Rc;

/// A size-bounded cache of parsed selector lists keyed by selector text.
/// Oldest entries are evicted first. Parse errors are never cached.
#[derive(Debug)]
pub struct SelectorCache {
    /// Parsed lists by source text.
    store: FxHashMap<String, Rc<SelectorList>>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
    /// Maximum number of entries; zero disables caching.
    capacity: usize,
    /// `:not()` nesting limit applied on parse.
    max_nesting: usize,
}

impl SelectorCache {
    /// Create a cache holding at most `capacity` parsed lists.
    #[inline]
    pub fn new(capacity: usize, max_nesting: usize) -> Self {
        Self {
            store: FxHashMap::default(),
            order: VecDeque::with_capacity(capacity),
            capacity,
            max_nesting: max_nesting.min(MAX_NESTING_CEILING),
        }
    }

    /// Return the parsed list for `selector`, parsing on a miss.
    ///
    /// # Errors
    /// Returns the [`SyntaxError`] from parsing; failures are not cached.
    pub fn get_or_parse(&mut self, selector: &str) -> Result<Rc<SelectorList>, SyntaxError> {
        if let Some(hit) = self.store.get(selector) {
            log::trace!(target: "css_selectors", "selector cache hit for {selector:?}");
            return Ok(Rc::clone(hit));
        }
        let parsed = Rc::new(parse_selector_list_with_limit(selector, self.max_nesting)?);
        if self.capacity == 0 {
            return Ok(parsed);
        }
        if self.order.len() >= self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.store.remove(&oldest);
        }
        self.order.push_back(selector.to_owned());
        self.store.insert(selector.to_owned(), Rc::clone(&parsed));
        Ok(parsed)
    }

    /// Number of cached entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every cached entry.
    #[inline]
    pub fn clear(&mut self) {
        self.store.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_NESTING;

    #[test]
    fn hits_share_the_parsed_list() -> Result<(), SyntaxError> {
        let mut cache = SelectorCache::new(4, DEFAULT_MAX_NESTING);
        let first = cache.get_or_parse(".a > .b")?;
        let second = cache.get_or_parse(".a > .b")?;
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn evicts_oldest_and_skips_errors() -> Result<(), SyntaxError> {
        let mut cache = SelectorCache::new(2, DEFAULT_MAX_NESTING);
        let first = cache.get_or_parse("a")?;
        cache.get_or_parse("b")?;
        cache.get_or_parse("c")?;
        assert_eq!(cache.len(), 2);
        assert!(!Rc::ptr_eq(&first, &cache.get_or_parse("a")?));

        assert!(matches!(cache.get_or_parse("a >"), Err(_)));
        assert_eq!(cache.len(), 2);
        Ok(())
    }

    #[test]
    fn zero_capacity_disables_caching() -> Result<(), SyntaxError> {
        let mut cache = SelectorCache::new(0, DEFAULT_MAX_NESTING);
        cache.get_or_parse("a")?;
        assert!(cache.is_empty());
        Ok(())
    }
}

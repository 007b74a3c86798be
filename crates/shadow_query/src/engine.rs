//! A reusable query handle bound to one host tree.

use crate::QueryConfig;
use crate::query::{find_closest, select_all, select_first, test_node};
use composed_tree::ShadowHost;
use css_selectors::{SelectorCache, SelectorList, SyntaxError};
use std::cell::RefCell;
use std::rc::Rc;

/// Runs selector queries against a host tree, reusing parsed selectors.
///
/// The engine never mutates the tree and keeps no state that depends on it,
/// so results are identical to the free functions in this crate.
pub struct QueryEngine<'host, H: ShadowHost> {
    host: &'host H,
    config: QueryConfig,
    cache: RefCell<SelectorCache>,
}

impl<'host, H: ShadowHost> QueryEngine<'host, H> {
    /// Create an engine with the default configuration.
    #[inline]
    pub fn new(host: &'host H) -> Self {
        Self::with_config(host, QueryConfig::default())
    }

    #[inline]
    pub fn with_config(host: &'host H, config: QueryConfig) -> Self {
        let cache = SelectorCache::new(config.parse_cache_capacity, config.max_nesting_depth);
        Self {
            host,
            config,
            cache: RefCell::new(cache),
        }
    }

    #[inline]
    pub const fn host(&self) -> &'host H {
        self.host
    }

    #[inline]
    pub const fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Number of parsed selectors currently cached.
    #[inline]
    pub fn cached_selectors(&self) -> usize {
        self.cache.borrow().len()
    }

    fn parse(&self, selector: &str) -> Result<Rc<SelectorList>, SyntaxError> {
        self.cache.borrow_mut().get_or_parse(selector)
    }

    /// See [`crate::query_selector_all`].
    ///
    /// # Errors
    /// Returns a [`SyntaxError`] if `selector` does not parse.
    pub fn query_selector_all(
        &self,
        selector: &str,
        context: Option<H::Node>,
    ) -> Result<Vec<H::Node>, SyntaxError> {
        let list = self.parse(selector)?;
        let found = select_all(self.host, &list, context);
        log::debug!(target: "shadow_query", "query_selector_all({list}) found {} element(s)", found.len());
        Ok(found)
    }

    /// See [`crate::query_selector`].
    ///
    /// # Errors
    /// Returns a [`SyntaxError`] if `selector` does not parse.
    pub fn query_selector(
        &self,
        selector: &str,
        context: Option<H::Node>,
    ) -> Result<Option<H::Node>, SyntaxError> {
        let list = self.parse(selector)?;
        Ok(select_first(self.host, &list, context))
    }

    /// See [`crate::get_elements_by_class_name`].
    pub fn get_elements_by_class_name(&self, names: &str, context: Option<H::Node>) -> Vec<H::Node> {
        crate::get_elements_by_class_name(self.host, names, context)
    }

    /// See [`crate::get_elements_by_tag_name`].
    pub fn get_elements_by_tag_name(&self, tag_name: &str, context: Option<H::Node>) -> Vec<H::Node> {
        crate::get_elements_by_tag_name(self.host, tag_name, context)
    }

    /// See [`crate::get_elements_by_tag_name_ns`].
    pub fn get_elements_by_tag_name_ns(
        &self,
        namespace: &str,
        local_name: &str,
        context: Option<H::Node>,
    ) -> Vec<H::Node> {
        crate::get_elements_by_tag_name_ns(self.host, namespace, local_name, context)
    }

    pub fn get_element_by_id(&self, id: &str, context: Option<H::Node>) -> Option<H::Node> {
        crate::get_element_by_id(self.host, id, context)
    }

    pub fn get_elements_by_name(&self, name: &str, context: Option<H::Node>) -> Vec<H::Node> {
        crate::get_elements_by_name(self.host, name, context)
    }

    /// See [`crate::matches`].
    ///
    /// # Errors
    /// Returns a [`SyntaxError`] if `selector` does not parse.
    pub fn matches(&self, selector: &str, node: H::Node) -> Result<bool, SyntaxError> {
        let list = self.parse(selector)?;
        Ok(test_node(self.host, &list, node))
    }

    /// See [`crate::closest`].
    ///
    /// # Errors
    /// Returns a [`SyntaxError`] if `selector` does not parse.
    pub fn closest(
        &self,
        selector: &str,
        context: Option<H::Node>,
    ) -> Result<Option<H::Node>, SyntaxError> {
        let list = self.parse(selector)?;
        Ok(find_closest(self.host, &list, context))
    }
}

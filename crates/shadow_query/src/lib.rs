//! DOM queries that pierce shadow roots.
//!
//! The familiar query surface (`querySelector`, `querySelectorAll`,
//! `getElementsBy*`, `matches`, `closest`) evaluated over the composed tree
//! instead of the light tree:
//!
//! ```text
//! selector text ──▶ css_selectors::parse ──▶ SelectorList
//!                                              │
//! host tree ──▶ composed_tree::ComposedDescendants ──▶ matches_selector_list ──▶ results
//! ```
//!
//! Results come back in composed pre-order. A slotted node appears where it
//! is rendered (at its slot), never at its light-tree position, and
//! combinators relate nodes by their composed parents and siblings.
//!
//! The free functions parse on every call. [`QueryEngine`] binds a host tree
//! and keeps a bounded cache of parsed selectors.

#![allow(
    clippy::module_name_repetitions,
    reason = "QueryEngine and QueryConfig read better than Engine and Config"
)]

mod config;
mod engine;
mod query;

pub use config::{DEFAULT_CACHE_CAPACITY, QueryConfig};
pub use css_selectors::{MAX_NESTING_CEILING, SyntaxError};
pub use engine::QueryEngine;
pub use query::{
    closest, get_element_by_id, get_elements_by_class_name, get_elements_by_name,
    get_elements_by_tag_name, get_elements_by_tag_name_ns, matches, query_selector,
    query_selector_all,
};

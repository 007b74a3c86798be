//! Configuration for query engines.
//!
//! Settings can be loaded from environment variables or constructed
//! programmatically. Neither setting changes query results: the nesting limit
//! only decides which selectors are rejected, and the cache only skips re-parsing.

use css_selectors::{DEFAULT_MAX_NESTING, MAX_NESTING_CEILING};
use std::env;

/// Default number of parsed selector lists a [`crate::QueryEngine`] keeps.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Runtime configuration for a [`crate::QueryEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    /// Maximum `:not()` nesting accepted by the selector parser, between 1 and
    /// [`MAX_NESTING_CEILING`]
    pub max_nesting_depth: usize,
    /// Number of parsed selector lists to keep; zero disables the cache
    pub parse_cache_capacity: usize,
}

impl Default for QueryConfig {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING, DEFAULT_CACHE_CAPACITY)
    }
}

impl QueryConfig {
    /// Construct a new `QueryConfig` with explicit values.
    ///
    /// # Arguments
    ///
    /// * `max_nesting_depth` - `:not()` nesting limit, clamped to `1..=MAX_NESTING_CEILING`
    /// * `parse_cache_capacity` - Parsed selector lists to keep, zero to disable caching
    #[inline]
    #[must_use]
    pub const fn new(max_nesting_depth: usize, parse_cache_capacity: usize) -> Self {
        let depth = if max_nesting_depth < 1 {
            1
        } else if max_nesting_depth > MAX_NESTING_CEILING {
            MAX_NESTING_CEILING
        } else {
            max_nesting_depth
        };
        Self {
            max_nesting_depth: depth,
            parse_cache_capacity,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SHADOW_QUERY_MAX_NESTING`: `:not()` nesting limit (default: 32)
    /// - `SHADOW_QUERY_CACHE_CAPACITY`: parse cache size (default: 64, 0 disables)
    ///
    /// Unparseable values fall back to the defaults.
    #[inline]
    #[must_use]
    pub fn from_env() -> Self {
        let max_nesting_depth = env::var("SHADOW_QUERY_MAX_NESTING")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_NESTING);
        let parse_cache_capacity = env::var("SHADOW_QUERY_CACHE_CAPACITY")
            .ok()
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_CAPACITY);
        Self::new(max_nesting_depth, parse_cache_capacity)
    }
}

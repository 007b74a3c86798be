//! Shared helpers for the integration tests.
#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use anyhow::Result;
use html::{Dom, NodeId, parse_html};
use shadow_query::{query_selector, query_selector_all};

/// A scenario written twice: once as a plain tree, once split across shadow roots.
pub struct Fixture {
    pub light: &'static str,
    pub shadow: &'static str,
}

pub fn init_logging() {
    drop(env_logger::builder().is_test(true).try_init());
}

pub fn load(html: &str) -> Result<Dom> {
    init_logging();
    parse_html(html)
}

/// `tag.class1.class2` labels for `nodes`.
pub fn labels(dom: &Dom, nodes: &[NodeId]) -> Vec<String> {
    nodes.iter().map(|&node| dom.describe(node)).collect()
}

/// Run `selector` from the document in both variants, through both
/// `query_selector_all` and `query_selector`, and compare with `expected`.
pub fn check(fixture: &Fixture, selector: &str, expected: &[&str]) -> Result<()> {
    for (variant, html) in [("light", fixture.light), ("shadow", fixture.shadow)] {
        let dom = load(html)?;
        let all = query_selector_all(&dom, selector, None)?;
        assert_eq!(
            labels(&dom, &all),
            expected,
            "{variant} query_selector_all({selector:?})"
        );
        let first = query_selector(&dom, selector, None)?;
        assert_eq!(
            first.map(|node| dom.describe(node)).as_deref(),
            expected.first().copied(),
            "{variant} query_selector({selector:?})"
        );
    }
    Ok(())
}

/// [`check`] for every `(selector, expected)` pair.
pub fn check_all(fixture: &Fixture, cases: &[(&str, &[&str])]) -> Result<()> {
    for (selector, expected) in cases {
        check(fixture, selector, expected)?;
    }
    Ok(())
}

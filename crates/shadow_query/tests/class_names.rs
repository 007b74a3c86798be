#![cfg(test)]

mod common;

use anyhow::Result;
use common::{Fixture, labels, load};
use shadow_query::{QueryEngine, get_elements_by_class_name, query_selector_all};

const CLASS_NAMES: Fixture = Fixture {
    light: include_str!("fixtures/class_names1/light.html"),
    shadow: include_str!("fixtures/class_names1/shadow.html"),
};

const EXPECTED: &[&str] = &[
    "div.container.main",
    "span.container.main.outerText",
    "span.main.container.innerText",
];

fn check_names(names: &str) -> Result<()> {
    for html in [CLASS_NAMES.light, CLASS_NAMES.shadow] {
        let dom = load(html)?;
        let found = get_elements_by_class_name(&dom, names, None);
        assert_eq!(labels(&dom, &found), EXPECTED, "names {names:?}");
    }
    Ok(())
}

#[test]
fn single_space() -> Result<()> {
    check_names("container main")
}

#[test]
fn repeated_spaces() -> Result<()> {
    check_names("container      main")
}

#[test]
fn line_breaks() -> Result<()> {
    check_names("main\n      \n      \n      \n      container")
}

#[test]
fn tabs() -> Result<()> {
    check_names("main\tcontainer")
}

#[test]
fn leading_and_trailing_whitespace() -> Result<()> {
    check_names("  \n main container \t")
}

#[test]
fn agrees_with_compound_class_selector() -> Result<()> {
    let dom = load(CLASS_NAMES.shadow)?;
    let by_class = get_elements_by_class_name(&dom, "container main", None);
    let by_selector = query_selector_all(&dom, ".container.main", None)?;
    assert_eq!(by_class, by_selector);
    Ok(())
}

#[test]
fn empty_names_select_nothing() -> Result<()> {
    let dom = load(CLASS_NAMES.shadow)?;
    assert!(get_elements_by_class_name(&dom, "", None).is_empty());
    assert!(get_elements_by_class_name(&dom, " \t\n", None).is_empty());
    let engine = QueryEngine::new(&dom);
    assert!(engine.get_elements_by_class_name("   ", None).is_empty());
    Ok(())
}

#[test]
fn class_names_are_case_sensitive() -> Result<()> {
    let dom = load(CLASS_NAMES.light)?;
    assert!(get_elements_by_class_name(&dom, "outertext", None).is_empty());
    let found = get_elements_by_class_name(&dom, "outerText", None);
    assert_eq!(labels(&dom, &found), vec!["span.container.main.outerText"]);
    Ok(())
}

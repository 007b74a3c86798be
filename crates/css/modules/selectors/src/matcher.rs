//! CSS selector matching engine.
//! Reference: <https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element>

use crate::{
    AttrOperator, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    ElementAdapter, ElementIndex, SelectorList, SimpleSelector,
};

/// Match a selector list against an element: true if any alternative matches.
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> bool {
    list.selectors
        .iter()
        .any(|selector_item| matches_complex(adapter, element, selector_item))
}

/// Match a complex selector against an element, right to left.
///
/// The rightmost compound is tested against `element`; each combinator then
/// searches the related elements for one matching the compound to its left,
/// backtracking when a later compound fails.
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
) -> bool {
    if !matches_compound(adapter, element, sel.rightmost()) {
        return false;
    }
    match_leftward(adapter, sel, sel.rest.len(), element)
}

/// Given that the compound at `matched` matched `element`, check everything to its left.
fn match_leftward<A: ElementAdapter>(
    adapter: &A,
    sel: &ComplexSelector,
    matched: usize,
    element: A::Handle,
) -> bool {
    let Some(left_index) = matched.checked_sub(1) else {
        return true;
    };
    let (Some(pair), Some(left)) = (sel.rest.get(left_index), sel.compound_at(left_index)) else {
        return false;
    };
    let satisfies = |candidate: A::Handle| {
        matches_compound(adapter, candidate, left)
            && match_leftward(adapter, sel, left_index, candidate)
    };

    match pair.0 {
        Combinator::Descendant => {
            let mut current_parent = adapter.parent(element);
            while let Some(ancestor_element) = current_parent {
                if satisfies(ancestor_element) {
                    return true;
                }
                current_parent = adapter.parent(ancestor_element);
            }
            false
        }
        Combinator::Child => adapter.parent(element).is_some_and(satisfies),
        Combinator::AdjacentSibling => adapter.previous_sibling_element(element).is_some_and(satisfies),
        Combinator::GeneralSibling => {
            let mut current_sibling = adapter.previous_sibling_element(element);
            while let Some(sibling_element) = current_sibling {
                if satisfies(sibling_element) {
                    return true;
                }
                current_sibling = adapter.previous_sibling_element(sibling_element);
            }
            false
        }
    }
}

/// Match a compound selector against a single element using only its local state.
/// Non-element nodes never match.
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &CompoundSelector,
) -> bool {
    adapter.is_element(element)
        && compound
            .simples
            .iter()
            .all(|simple| matches_simple(adapter, element, simple))
}

fn matches_simple<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    simple: &SimpleSelector,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(type_name) => {
            let tag = adapter.tag_name(element);
            if adapter.is_html_element(element) {
                tag.eq_ignore_ascii_case(type_name)
            } else {
                tag == type_name
            }
        }
        SimpleSelector::Class(class_name) => adapter.has_class(element, class_name),
        SimpleSelector::IdSelector(id_value) => adapter
            .element_id(element)
            .is_some_and(|value| value == id_value),
        SimpleSelector::Attribute(attribute) => matches_attribute(adapter, element, attribute),
        // Only the rightmost compound of each alternative is consulted; no traversal.
        SimpleSelector::Not(list) => !list
            .selectors
            .iter()
            .any(|complex| matches_compound(adapter, element, complex.rightmost())),
        SimpleSelector::NthChild(expr) => expr.matches(index_of(adapter, element).position),
        SimpleSelector::NthLastChild(expr) => {
            let index = index_of(adapter, element);
            expr.matches(
                index
                    .count
                    .saturating_sub(index.position)
                    .saturating_add(1),
            )
        }
        SimpleSelector::FirstChild => index_of(adapter, element).position == 1,
        SimpleSelector::LastChild => {
            let index = index_of(adapter, element);
            index.position == index.count
        }
        SimpleSelector::OnlyChild => index_of(adapter, element).count == 1,
    }
}

fn index_of<A: ElementAdapter>(adapter: &A, element: A::Handle) -> ElementIndex {
    adapter
        .element_index(element)
        .unwrap_or(ElementIndex::ONLY_CHILD)
}

fn matches_attribute<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    attribute: &AttributeSelector,
) -> bool {
    let Some(actual) = adapter.attr(element, &attribute.name) else {
        return false;
    };
    let Some((operator, expected)) = &attribute.value else {
        return true;
    };
    let expected = expected.as_str();
    match operator {
        AttrOperator::Equals => actual == expected,
        AttrOperator::Includes => {
            !expected.is_empty()
                && actual
                    .split_ascii_whitespace()
                    .any(|token| token == expected)
        }
        AttrOperator::DashMatch => {
            actual == expected
                || actual
                    .strip_prefix(expected)
                    .is_some_and(|tail| tail.starts_with('-'))
        }
        AttrOperator::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttrOperator::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttrOperator::Substring => !expected.is_empty() && actual.contains(expected),
    }
}

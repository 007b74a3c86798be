//! Query operations over the composed tree.
//!
//! Every operation takes the host tree and an optional context node; `None`
//! means the document. Traversals start at the context's composed children and
//! return elements in composed pre-order, each at most once.

use composed_tree::{ComposedDescendants, ComposedView, ShadowHost, composed_parent};
use css_selectors::{SelectorList, SyntaxError, matches_selector_list, parse_selector_list};

/// Composed element descendants of `context` (or the document).
fn elements<H: ShadowHost>(
    host: &H,
    context: Option<H::Node>,
) -> impl Iterator<Item = H::Node> + '_ {
    let root = context.unwrap_or_else(|| host.document());
    ComposedDescendants::new(host, root).filter(move |&node| host.is_element(node))
}

pub(crate) fn select_all<H: ShadowHost>(
    host: &H,
    list: &SelectorList,
    context: Option<H::Node>,
) -> Vec<H::Node> {
    let view = ComposedView::new(host);
    elements(host, context)
        .filter(|&node| matches_selector_list(&view, node, list))
        .collect()
}

pub(crate) fn select_first<H: ShadowHost>(
    host: &H,
    list: &SelectorList,
    context: Option<H::Node>,
) -> Option<H::Node> {
    let view = ComposedView::new(host);
    elements(host, context).find(|&node| matches_selector_list(&view, node, list))
}

pub(crate) fn test_node<H: ShadowHost>(host: &H, list: &SelectorList, node: H::Node) -> bool {
    host.is_element(node) && matches_selector_list(&ComposedView::new(host), node, list)
}

pub(crate) fn find_closest<H: ShadowHost>(
    host: &H,
    list: &SelectorList,
    context: Option<H::Node>,
) -> Option<H::Node> {
    let view = ComposedView::new(host);
    let mut current = Some(context.unwrap_or_else(|| host.document()));
    while let Some(node) = current {
        if host.is_element(node) && matches_selector_list(&view, node, list) {
            return Some(node);
        }
        current = composed_parent(host, node);
    }
    None
}

/// All elements matching `selector`, in composed document order.
///
/// # Errors
/// Returns a [`SyntaxError`] if `selector` does not parse.
pub fn query_selector_all<H: ShadowHost>(
    host: &H,
    selector: &str,
    context: Option<H::Node>,
) -> Result<Vec<H::Node>, SyntaxError> {
    let list = parse_selector_list(selector)?;
    let found = select_all(host, &list, context);
    log::debug!(target: "shadow_query", "query_selector_all({list}) found {} element(s)", found.len());
    Ok(found)
}

/// First element matching `selector`, or `None`.
///
/// # Errors
/// Returns a [`SyntaxError`] if `selector` does not parse.
pub fn query_selector<H: ShadowHost>(
    host: &H,
    selector: &str,
    context: Option<H::Node>,
) -> Result<Option<H::Node>, SyntaxError> {
    let list = parse_selector_list(selector)?;
    Ok(select_first(host, &list, context))
}

/// Elements carrying every class in the whitespace-separated `names`.
/// Returns nothing when `names` holds no class at all.
pub fn get_elements_by_class_name<H: ShadowHost>(
    host: &H,
    names: &str,
    context: Option<H::Node>,
) -> Vec<H::Node> {
    let list = SelectorList::from_classes(names.split_ascii_whitespace());
    if list.selectors.is_empty() {
        return Vec::new();
    }
    select_all(host, &list, context)
}

/// Elements with local name `tag_name`. HTML elements compare against the
/// ASCII-lowercased name, other elements compare exactly. `"*"` returns every element.
pub fn get_elements_by_tag_name<H: ShadowHost>(
    host: &H,
    tag_name: &str,
    context: Option<H::Node>,
) -> Vec<H::Node> {
    if tag_name == "*" {
        return elements(host, context).collect();
    }
    let lowered = tag_name.to_ascii_lowercase();
    elements(host, context)
        .filter(|&node| {
            let wanted = if host.is_html_element(node) {
                lowered.as_str()
            } else {
                tag_name
            };
            host.local_name(node) == wanted
        })
        .collect()
}

/// Elements with the given namespace and local name. `"*"` matches any value
/// for either argument and an empty `namespace` means no namespace.
pub fn get_elements_by_tag_name_ns<H: ShadowHost>(
    host: &H,
    namespace: &str,
    local_name: &str,
    context: Option<H::Node>,
) -> Vec<H::Node> {
    let wanted_namespace = (!namespace.is_empty()).then_some(namespace);
    elements(host, context)
        .filter(|&node| namespace == "*" || host.namespace(node) == wanted_namespace)
        .filter(|&node| local_name == "*" || host.local_name(node) == local_name)
        .collect()
}

/// First element whose `id` attribute equals `id`.
pub fn get_element_by_id<H: ShadowHost>(
    host: &H,
    id: &str,
    context: Option<H::Node>,
) -> Option<H::Node> {
    if id.is_empty() {
        return None;
    }
    elements(host, context).find(|&node| host.id(node) == Some(id))
}

/// Elements whose `name` attribute equals `name`.
pub fn get_elements_by_name<H: ShadowHost>(
    host: &H,
    name: &str,
    context: Option<H::Node>,
) -> Vec<H::Node> {
    elements(host, context)
        .filter(|&node| host.attribute(node, "name") == Some(name))
        .collect()
}

/// True if `node` is an element matching `selector`. Combinators are resolved
/// against composed ancestors and siblings.
///
/// # Errors
/// Returns a [`SyntaxError`] if `selector` does not parse.
pub fn matches<H: ShadowHost>(host: &H, selector: &str, node: H::Node) -> Result<bool, SyntaxError> {
    let list = parse_selector_list(selector)?;
    Ok(test_node(host, &list, node))
}

/// The nearest of `context` and its composed ancestors that matches `selector`.
///
/// # Errors
/// Returns a [`SyntaxError`] if `selector` does not parse.
pub fn closest<H: ShadowHost>(
    host: &H,
    selector: &str,
    context: Option<H::Node>,
) -> Result<Option<H::Node>, SyntaxError> {
    let list = parse_selector_list(selector)?;
    Ok(find_closest(host, &list, context))
}

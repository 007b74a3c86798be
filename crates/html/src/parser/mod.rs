//! HTML5 parsing using html5ever.
//!
//! html5ever builds an `RcDom`, which is then converted into the arena [`Dom`].
//! Declarative shadow roots (`<template shadowrootmode="open">`) are attached
//! to the template's parent during conversion.

use crate::dom::{Dom, ShadowRootMode};
use anyhow::Result;
use html5ever::tendril::TendrilSink as _;
use html5ever::{ParseOpts, parse_document};
use indextree::NodeId;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Parse a complete HTML document.
///
/// # Errors
/// Returns an error if the input cannot be read or the converted tree is malformed.
pub fn parse_html(html: &str) -> Result<Dom> {
    let rc_dom: RcDom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;
    let mut dom = Dom::new();
    let root = dom.root();
    convert_children(&mut dom, &rc_dom.document, root)?;
    Ok(dom)
}

/// Mode of a declarative shadow root template, if `rc_node` is one.
fn declarative_shadow_mode(rc_node: &Handle) -> Option<ShadowRootMode> {
    let RcNodeData::Element { name, attrs, .. } = &rc_node.data else {
        return None;
    };
    if &*name.local != "template" {
        return None;
    }
    let attrs = attrs.borrow();
    let mode = attrs
        .iter()
        .find(|attr| matches!(&*attr.name.local, "shadowrootmode" | "shadowroot"))?;
    match mode.value.to_ascii_lowercase().as_str() {
        "open" => Some(ShadowRootMode::Open),
        "closed" => Some(ShadowRootMode::Closed),
        _ => None,
    }
}

fn convert_children(dom: &mut Dom, rc_node: &Handle, parent: NodeId) -> Result<()> {
    for child in rc_node.children.borrow().iter() {
        convert_node(dom, child, parent)?;
    }
    Ok(())
}

fn convert_node(dom: &mut Dom, rc_node: &Handle, parent: NodeId) -> Result<()> {
    match &rc_node.data {
        RcNodeData::Document => convert_children(dom, rc_node, parent),
        RcNodeData::Doctype { .. } | RcNodeData::ProcessingInstruction { .. } => Ok(()),
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            // Whitespace between tags would otherwise show up as slottable text.
            if text.trim().is_empty() {
                return Ok(());
            }
            let node = dom.create_text(&text);
            dom.append_child(parent, node)
        }
        RcNodeData::Comment { contents } => {
            let node = dom.create_comment(contents);
            dom.append_child(parent, node)
        }
        RcNodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            if let Some(mode) = declarative_shadow_mode(rc_node) {
                let hosts_shadow = dom
                    .node(parent)
                    .is_some_and(|node| node.shadow_root.is_some());
                if dom.element(parent).is_some() && !hosts_shadow {
                    let shadow_root = dom.attach_shadow(parent, mode)?;
                    if let Some(contents) = template_contents.borrow().as_ref() {
                        convert_children(dom, contents, shadow_root)?;
                    }
                    return Ok(());
                }
                log::debug!(target: "html", "ignoring declarative shadow root on {}", dom.describe(parent));
            }

            let namespace = (!name.ns.is_empty()).then_some(&*name.ns);
            let node = dom.create_element_ns(namespace, &name.local);
            for attr in attrs.borrow().iter() {
                dom.set_attribute(node, &attr.name.local, &attr.value)?;
            }
            dom.append_child(parent, node)?;
            // Template contents are inert and never part of the tree.
            convert_children(dom, rc_node, node)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_html;
    use crate::dom::HTML_NAMESPACE;
    use crate::{Dom, NodeData, NodeId, ShadowRootMode};
    use anyhow::{Result, anyhow};
    use composed_tree::{NodeKind, ShadowHost as _};

    fn find(dom: &Dom, label: &str) -> Option<NodeId> {
        dom.root()
            .descendants(&dom.arena)
            .find(|&node| dom.describe(node) == label)
    }

    #[test]
    fn builds_elements_text_and_comments() -> Result<()> {
        let dom = parse_html("<!DOCTYPE html><div id=a class='x y'>hi<!--note--></div>")?;
        let div = find(&dom, "div.x.y").ok_or_else(|| anyhow!("div missing"))?;
        assert_eq!(dom.attribute(div, "id"), Some("a"));
        assert_eq!(dom.namespace(div), Some(HTML_NAMESPACE));
        let kinds: Vec<NodeKind> = dom.children(div).map(|child| dom.node_kind(child)).collect();
        assert_eq!(kinds, vec![NodeKind::Text, NodeKind::Comment]);
        Ok(())
    }

    #[test]
    fn skips_whitespace_only_text() -> Result<()> {
        let dom = parse_html("<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>")?;
        let list = find(&dom, "ul").ok_or_else(|| anyhow!("ul missing"))?;
        assert_eq!(dom.children(list).count(), 2);
        Ok(())
    }

    #[test]
    fn attaches_declarative_shadow_roots() -> Result<()> {
        let dom = parse_html(
            "<x-host><template shadowrootmode=\"open\"><span class=inner></span><slot></slot></template><p>light</p></x-host>",
        )?;
        let host = find(&dom, "x-host").ok_or_else(|| anyhow!("host missing"))?;
        let shadow = dom
            .shadow_root(host)
            .ok_or_else(|| anyhow!("no shadow root"))?;
        assert!(matches!(
            dom.node(shadow).map(|node| &node.data),
            Some(NodeData::ShadowRoot(ShadowRootMode::Open))
        ));
        let shadow_children: Vec<String> =
            dom.children(shadow).map(|child| dom.describe(child)).collect();
        assert_eq!(shadow_children, vec!["span.inner", "slot"]);
        let light: Vec<String> = dom.children(host).map(|child| dom.describe(child)).collect();
        assert_eq!(light, vec!["p"]);
        Ok(())
    }

    #[test]
    fn plain_templates_stay_inert() -> Result<()> {
        let dom = parse_html("<div><template><span></span></template></div>")?;
        let template = find(&dom, "template").ok_or_else(|| anyhow!("template missing"))?;
        assert_eq!(dom.children(template).count(), 0);
        assert!(find(&dom, "span").is_none());
        Ok(())
    }

    #[test]
    fn svg_elements_keep_their_namespace() -> Result<()> {
        let dom = parse_html("<svg><circle></circle></svg>")?;
        let circle = find(&dom, "circle").ok_or_else(|| anyhow!("circle missing"))?;
        assert_eq!(dom.namespace(circle), Some("http://www.w3.org/2000/svg"));
        Ok(())
    }

    #[test]
    fn foreign_elements_keep_camel_case_names() -> Result<()> {
        let dom = parse_html("<svg><clipPath></clipPath><linearGradient></linearGradient></svg>")?;
        assert!(find(&dom, "clipPath").is_some());
        assert!(find(&dom, "linearGradient").is_some());
        assert!(find(&dom, "clippath").is_none());
        let div = parse_html("<DIV></DIV>")?;
        assert!(find(&div, "div").is_some());
        Ok(())
    }
}

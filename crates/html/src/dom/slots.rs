//! Named slot assignment and the composed-tree host implementation.

use super::{Dom, NodeData};
use composed_tree::{NodeKind, ShadowHost};
use indextree::NodeId;

impl Dom {
    /// Name a slot advertises; `""` for the default slot.
    fn slot_name(&self, slot: NodeId) -> &str {
        self.element(slot)
            .and_then(|element| element.attribute("name"))
            .unwrap_or_default()
    }

    /// Slot name a light child asks for. `None` when the node is not slottable.
    fn slottable_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.data {
            NodeData::Element(element) => Some(element.attribute("slot").unwrap_or_default()),
            NodeData::Text(_) => Some(""),
            _ => None,
        }
    }

    fn is_slot_element(&self, node: NodeId) -> bool {
        self.element(node)
            .is_some_and(|element| element.local_name == "slot")
    }

    /// First slot named `name` in the shadow tree rooted at `shadow_root`.
    fn find_slot(&self, shadow_root: NodeId, name: &str) -> Option<NodeId> {
        shadow_root
            .descendants(&self.arena)
            .find(|&node| self.is_slot_element(node) && self.slot_name(node) == name)
    }

    /// The shadow root whose tree contains `node`, if any.
    fn containing_shadow_root(&self, node: NodeId) -> Option<NodeId> {
        let root = self.tree_root(node);
        (self.node_kind(root) == NodeKind::ShadowRoot).then_some(root)
    }
}

impl ShadowHost for Dom {
    type Node = NodeId;

    fn document(&self) -> NodeId {
        self.root
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.node_kind(node)
    }

    fn raw_parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn raw_children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(node)
    }

    fn shadow_root(&self, element: NodeId) -> Option<NodeId> {
        self.node(element)?.shadow_root
    }

    fn shadow_host(&self, shadow_root: NodeId) -> Option<NodeId> {
        self.node(shadow_root)?.host
    }

    fn is_slot(&self, node: NodeId) -> bool {
        self.is_slot_element(node) && self.containing_shadow_root(node).is_some()
    }

    fn assigned_nodes(&self, slot: NodeId) -> Vec<NodeId> {
        let Some(shadow_root) = self.containing_shadow_root(slot) else {
            return Vec::new();
        };
        let name = self.slot_name(slot);
        // Later slots sharing a name receive nothing.
        if self.find_slot(shadow_root, name) != Some(slot) {
            return Vec::new();
        }
        let Some(host) = self.shadow_host(shadow_root) else {
            return Vec::new();
        };
        self.children(host)
            .filter(|&child| self.slottable_name(child) == Some(name))
            .collect()
    }

    fn assigned_slot(&self, node: NodeId) -> Option<NodeId> {
        let name = self.slottable_name(node)?;
        let shadow_root = self.shadow_root(self.parent(node)?)?;
        self.find_slot(shadow_root, name)
    }

    fn local_name(&self, element: NodeId) -> &str {
        self.element(element)
            .map(|element| element.local_name.as_str())
            .unwrap_or_default()
    }

    fn namespace(&self, element: NodeId) -> Option<&str> {
        self.element(element)?.namespace.as_deref()
    }

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.element(element)?.attribute(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShadowRootMode;
    use anyhow::Result;

    struct Fixture {
        dom: Dom,
        host: NodeId,
        named: NodeId,
        default_slot: NodeId,
        duplicate: NodeId,
        light_named: NodeId,
        light_plain: NodeId,
        light_unknown: NodeId,
    }

    fn fixture() -> Result<Fixture> {
        let mut dom = Dom::new();
        let host = dom.create_element("div");
        dom.append_child(dom.root(), host)?;
        let shadow = dom.attach_shadow(host, ShadowRootMode::Open)?;

        let named = dom.create_element("slot");
        dom.set_attribute(named, "name", "title")?;
        let default_slot = dom.create_element("slot");
        let duplicate = dom.create_element("slot");
        dom.set_attribute(duplicate, "name", "title")?;
        for slot in [named, default_slot, duplicate] {
            dom.append_child(shadow, slot)?;
        }

        let light_named = dom.create_element("h1");
        dom.set_attribute(light_named, "slot", "title")?;
        let light_plain = dom.create_element("p");
        let light_unknown = dom.create_element("span");
        dom.set_attribute(light_unknown, "slot", "missing")?;
        for child in [light_named, light_plain, light_unknown] {
            dom.append_child(host, child)?;
        }

        Ok(Fixture {
            dom,
            host,
            named,
            default_slot,
            duplicate,
            light_named,
            light_plain,
            light_unknown,
        })
    }

    #[test]
    fn assigns_by_name_to_first_matching_slot() -> Result<()> {
        let fx = fixture()?;
        assert_eq!(fx.dom.assigned_nodes(fx.named), vec![fx.light_named]);
        assert_eq!(fx.dom.assigned_nodes(fx.default_slot), vec![fx.light_plain]);
        assert!(fx.dom.assigned_nodes(fx.duplicate).is_empty());
        assert_eq!(fx.dom.assigned_slot(fx.light_named), Some(fx.named));
        assert_eq!(fx.dom.assigned_slot(fx.light_plain), Some(fx.default_slot));
        assert_eq!(fx.dom.assigned_slot(fx.light_unknown), None);
        Ok(())
    }

    #[test]
    fn slots_outside_shadow_trees_are_plain_elements() -> Result<()> {
        let mut fx = fixture()?;
        let light_slot = fx.dom.create_element("slot");
        fx.dom.append_child(fx.dom.root(), light_slot)?;
        assert!(!fx.dom.is_slot(light_slot));
        assert!(fx.dom.assigned_nodes(light_slot).is_empty());
        assert!(fx.dom.is_slot(fx.named));
        Ok(())
    }

    #[test]
    fn shadow_root_links_both_ways() -> Result<()> {
        let fx = fixture()?;
        let shadow = fx.dom.shadow_root(fx.host);
        assert!(shadow.is_some());
        assert_eq!(shadow.and_then(|root| fx.dom.shadow_host(root)), Some(fx.host));
        assert_eq!(shadow.and_then(|root| fx.dom.raw_parent(root)), None);
        Ok(())
    }

    #[test]
    fn second_shadow_root_is_rejected() -> Result<()> {
        let mut fx = fixture()?;
        assert!(matches!(fx.dom.attach_shadow(fx.host, ShadowRootMode::Closed), Err(_)));
        let text = fx.dom.create_text("x");
        assert!(matches!(fx.dom.attach_shadow(text, ShadowRootMode::Open), Err(_)));
        Ok(())
    }
}

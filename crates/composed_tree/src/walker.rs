//! Composed tree navigation functions.

use crate::{NodeKind, ShadowHost};
use css_selectors::ElementIndex;
use rustc_hash::FxHashSet;

/// Content a slot contributes: its assigned nodes, else its fallback children.
fn slot_content<H: ShadowHost>(host: &H, slot: H::Node) -> Vec<H::Node> {
    let assigned = host.assigned_nodes(slot);
    if assigned.is_empty() {
        host.raw_children(slot).collect()
    } else {
        assigned
    }
}

/// Append `node` to `out`, replacing slots by their content recursively.
///
/// `expanding` holds the slots on the current replacement path so a host
/// reporting cyclic assignments still terminates.
fn push_flattened<H: ShadowHost>(
    host: &H,
    node: H::Node,
    out: &mut Vec<H::Node>,
    seen: &mut FxHashSet<H::Node>,
    expanding: &mut FxHashSet<H::Node>,
) {
    if !host.is_slot(node) {
        if seen.insert(node) {
            out.push(node);
        }
        return;
    }
    if !expanding.insert(node) {
        log::warn!(target: "composed_tree", "cyclic slot assignment ignored");
        return;
    }
    for projected in slot_content(host, node) {
        push_flattened(host, projected, out, seen, expanding);
    }
    expanding.remove(&node);
}

/// Children of `node` in the composed tree, in order, each node at most once.
///
/// A shadow host yields its shadow root's children. A slot used as the
/// starting point yields its own content. Slots found among the children are
/// replaced in place by what they project.
pub fn composed_children<H: ShadowHost>(host: &H, node: H::Node) -> Vec<H::Node> {
    let base: Vec<H::Node> = if let Some(shadow_root) = host.shadow_root(node) {
        host.raw_children(shadow_root).collect()
    } else if host.is_slot(node) {
        slot_content(host, node)
    } else {
        host.raw_children(node).collect()
    };

    let mut out = Vec::with_capacity(base.len());
    let mut seen = FxHashSet::default();
    let mut expanding = FxHashSet::default();
    for child in base {
        push_flattened(host, child, &mut out, &mut seen, &mut expanding);
    }
    out
}

/// Parent of `node` in the composed tree.
///
/// Slotted nodes take the place of their slot, so their parent is the slot's
/// composed parent (following assignment chains outward). `None` for the
/// document, for shadow roots, and for nodes that are not rendered: unassigned
/// light children of a host and fallback content of a slot that has assigned nodes.
pub fn composed_parent<H: ShadowHost>(host: &H, node: H::Node) -> Option<H::Node> {
    let mut current = node;
    let mut visited_slots = FxHashSet::default();
    loop {
        if let Some(slot) = host.assigned_slot(current) {
            if !visited_slots.insert(slot) {
                return None;
            }
            current = slot;
            continue;
        }
        let parent = host.raw_parent(current)?;
        if host.kind(parent) == NodeKind::ShadowRoot {
            return host.shadow_host(parent);
        }
        if host.shadow_root(parent).is_some() {
            return None;
        }
        if host.is_slot(parent) {
            if !host.assigned_nodes(parent).is_empty() || !visited_slots.insert(parent) {
                return None;
            }
            current = parent;
            continue;
        }
        return Some(parent);
    }
}

/// `node`'s composed siblings (itself included) and its position among them.
fn siblings_of<H: ShadowHost>(host: &H, node: H::Node) -> Option<(Vec<H::Node>, usize)> {
    let parent = composed_parent(host, node)?;
    let siblings = composed_children(host, parent);
    let position = siblings.iter().position(|&sibling| sibling == node)?;
    Some((siblings, position))
}

/// Node immediately before `node` among its composed siblings.
pub fn composed_previous_sibling<H: ShadowHost>(host: &H, node: H::Node) -> Option<H::Node> {
    let (siblings, position) = siblings_of(host, node)?;
    siblings.get(position.checked_sub(1)?).copied()
}

/// Node immediately after `node` among its composed siblings.
pub fn composed_next_sibling<H: ShadowHost>(host: &H, node: H::Node) -> Option<H::Node> {
    let (siblings, position) = siblings_of(host, node)?;
    siblings.get(position.saturating_add(1)).copied()
}

/// Closest preceding composed sibling that is an element.
pub fn composed_previous_element_sibling<H: ShadowHost>(
    host: &H,
    node: H::Node,
) -> Option<H::Node> {
    let (siblings, position) = siblings_of(host, node)?;
    siblings
        .get(..position)?
        .iter()
        .rev()
        .copied()
        .find(|&sibling| host.is_element(sibling))
}

/// 1-based position of `element` among its composed element siblings.
pub fn composed_element_index<H: ShadowHost>(host: &H, element: H::Node) -> Option<ElementIndex> {
    let parent = composed_parent(host, element)?;
    let mut position = None;
    let mut count = 0_usize;
    for sibling in composed_children(host, parent) {
        if !host.is_element(sibling) {
            continue;
        }
        count = count.saturating_add(1);
        if sibling == element {
            position = Some(count);
        }
    }
    position.map(|position| ElementIndex { position, count })
}

/// Pre-order traversal of the composed descendants of a node, excluding the node itself.
/// Uses an explicit stack, so depth is bounded only by memory.
pub struct ComposedDescendants<'host, H: ShadowHost> {
    /// Tree being walked.
    host: &'host H,
    /// Pending nodes, next one on top.
    stack: Vec<H::Node>,
    /// Nodes already yielded.
    seen: FxHashSet<H::Node>,
}

impl<'host, H: ShadowHost> ComposedDescendants<'host, H> {
    /// Start a traversal below `context`.
    pub fn new(host: &'host H, context: H::Node) -> Self {
        let mut stack = composed_children(host, context);
        stack.reverse();
        Self {
            host,
            stack,
            seen: FxHashSet::default(),
        }
    }
}

impl<H: ShadowHost> Iterator for ComposedDescendants<'_, H> {
    type Item = H::Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if !self.seen.insert(node) {
                continue;
            }
            let children = composed_children(self.host, node);
            self.stack.extend(children.into_iter().rev());
            return Some(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal host: every node is an element unless listed as text, slots are listed explicitly.
    #[derive(Default)]
    struct MockHost {
        parents: Vec<Option<usize>>,
        shadow_roots: Vec<(usize, usize)>,
        texts: Vec<usize>,
        slots: Vec<(usize, Vec<usize>)>,
    }

    impl MockHost {
        fn node(&mut self, parent: Option<usize>) -> usize {
            self.parents.push(parent);
            self.parents.len() - 1
        }
    }

    impl ShadowHost for MockHost {
        type Node = usize;

        fn document(&self) -> usize {
            0
        }

        fn kind(&self, node: usize) -> NodeKind {
            if node == 0 {
                NodeKind::Document
            } else if self.shadow_roots.iter().any(|&(_, root)| root == node) {
                NodeKind::ShadowRoot
            } else if self.texts.contains(&node) {
                NodeKind::Text
            } else {
                NodeKind::Element
            }
        }

        fn raw_parent(&self, node: usize) -> Option<usize> {
            self.parents.get(node).copied().flatten()
        }

        fn raw_children(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
            (0..self.parents.len()).filter(move |&child| self.parents[child] == Some(node))
        }

        fn shadow_root(&self, element: usize) -> Option<usize> {
            self.shadow_roots
                .iter()
                .find(|&&(host, _)| host == element)
                .map(|&(_, root)| root)
        }

        fn shadow_host(&self, shadow_root: usize) -> Option<usize> {
            self.shadow_roots
                .iter()
                .find(|&&(_, root)| root == shadow_root)
                .map(|&(host, _)| host)
        }

        fn is_slot(&self, node: usize) -> bool {
            self.slots.iter().any(|(slot, _)| *slot == node)
        }

        fn assigned_nodes(&self, slot: usize) -> Vec<usize> {
            self.slots
                .iter()
                .find(|(candidate, _)| *candidate == slot)
                .map(|(_, assigned)| assigned.clone())
                .unwrap_or_default()
        }

        fn assigned_slot(&self, node: usize) -> Option<usize> {
            self.slots
                .iter()
                .find(|(_, assigned)| assigned.contains(&node))
                .map(|(slot, _)| *slot)
        }

        fn local_name(&self, _element: usize) -> &str {
            "div"
        }

        fn namespace(&self, _element: usize) -> Option<&str> {
            None
        }

        fn attribute(&self, _element: usize, _name: &str) -> Option<&str> {
            None
        }
    }

    /// document > host[#shadow: wrapper > slot(fallback)] with light children a, b.
    fn slotted_host() -> (MockHost, [usize; 7]) {
        let mut tree = MockHost::default();
        let document = tree.node(None);
        let host = tree.node(Some(document));
        let light_a = tree.node(Some(host));
        let light_b = tree.node(Some(host));
        let root = tree.node(None);
        let wrapper = tree.node(Some(root));
        let slot = tree.node(Some(wrapper));
        tree.shadow_roots.push((host, root));
        tree.slots.push((slot, vec![light_a, light_b]));
        (tree, [document, host, light_a, light_b, root, wrapper, slot])
    }

    #[test]
    fn slots_are_replaced_by_assigned_nodes() {
        let (tree, [document, host, light_a, light_b, _, wrapper, slot]) = slotted_host();
        assert_eq!(composed_children(&tree, document), vec![host]);
        assert_eq!(composed_children(&tree, host), vec![wrapper]);
        assert_eq!(composed_children(&tree, wrapper), vec![light_a, light_b]);
        assert_eq!(composed_parent(&tree, light_a), Some(wrapper));
        assert_eq!(composed_parent(&tree, wrapper), Some(host));
        assert_eq!(composed_parent(&tree, slot), Some(wrapper));
        assert_eq!(composed_previous_sibling(&tree, light_b), Some(light_a));
        assert_eq!(composed_next_sibling(&tree, light_a), Some(light_b));
        assert_eq!(composed_next_sibling(&tree, light_b), None);
        assert_eq!(
            composed_element_index(&tree, light_b),
            Some(ElementIndex {
                position: 2,
                count: 2
            })
        );
    }

    #[test]
    fn unassigned_light_children_are_not_rendered() {
        let (mut tree, [_, host, light_a, light_b, ..]) = slotted_host();
        tree.slots[0].1 = vec![light_b];
        assert_eq!(composed_parent(&tree, light_a), None);
        let all: Vec<usize> = ComposedDescendants::new(&tree, 0).collect();
        assert!(!all.contains(&light_a));
        assert!(all.contains(&light_b));
        assert!(all.contains(&host));
    }

    #[test]
    fn fallback_content_used_only_without_assignment() {
        let (mut tree, [_, _, light_a, _, _, wrapper, slot]) = slotted_host();
        let fallback = tree.node(Some(slot));
        assert_eq!(composed_parent(&tree, fallback), None);
        assert!(!composed_children(&tree, wrapper).contains(&fallback));

        tree.slots[0].1.clear();
        assert_eq!(composed_children(&tree, wrapper), vec![fallback]);
        assert_eq!(composed_parent(&tree, fallback), Some(wrapper));
        assert_eq!(composed_parent(&tree, light_a), None);
    }

    #[test]
    fn duplicate_and_cyclic_assignments_terminate() {
        let (mut tree, [_, _, light_a, light_b, _, wrapper, slot]) = slotted_host();
        let second_slot = tree.node(Some(wrapper));
        tree.slots[0].1 = vec![light_a, second_slot, light_a];
        tree.slots.push((second_slot, vec![slot, light_b]));
        assert_eq!(composed_children(&tree, wrapper), vec![light_a, light_b]);
    }

    #[test]
    fn element_siblings_skip_text() {
        let (mut tree, [_, _, light_a, light_b, ..]) = slotted_host();
        let text = tree.node(None);
        tree.texts.push(text);
        tree.slots[0].1 = vec![light_a, text, light_b];
        assert_eq!(composed_previous_sibling(&tree, light_b), Some(text));
        assert_eq!(composed_previous_element_sibling(&tree, light_b), Some(light_a));
        assert_eq!(composed_element_index(&tree, text), None);
    }
}

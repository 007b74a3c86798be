//! The capability a host tree must expose to be walked in composed order.

use core::hash::Hash;

/// Namespace of HTML elements.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Node categories the walker distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element,
    Text,
    Comment,
    ShadowRoot,
}

/// Read-only access to a tree with shadow roots and slot assignment.
///
/// "Raw" relationships are the ones the host stores: a shadow root's top-level
/// nodes have the shadow root as parent, and a host's light children stay
/// children of the host whether or not they are slotted.
pub trait ShadowHost {
    type Node: Copy + Eq + Hash;

    /// The document node; default context for queries.
    fn document(&self) -> Self::Node;

    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Parent in the host's own tree. `None` for the document and for shadow roots.
    fn raw_parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Children in the host's own tree, in order.
    fn raw_children(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// Shadow root attached to `element`, if it is a shadow host.
    fn shadow_root(&self, element: Self::Node) -> Option<Self::Node>;

    /// Host element of a shadow root.
    fn shadow_host(&self, shadow_root: Self::Node) -> Option<Self::Node>;

    /// True if `node` is a `<slot>` element inside a shadow tree.
    fn is_slot(&self, node: Self::Node) -> bool;

    /// Nodes assigned to `slot`, in assignment order. Empty if none.
    fn assigned_nodes(&self, slot: Self::Node) -> Vec<Self::Node>;

    /// Slot `node` is currently assigned to.
    fn assigned_slot(&self, node: Self::Node) -> Option<Self::Node>;

    /// Local tag name of an element.
    fn local_name(&self, element: Self::Node) -> &str;

    /// Namespace URI of an element, `None` for no namespace.
    fn namespace(&self, element: Self::Node) -> Option<&str>;

    /// Attribute value by (lowercase) name.
    fn attribute(&self, element: Self::Node, name: &str) -> Option<&str>;

    /// Value of the `id` attribute.
    fn id(&self, element: Self::Node) -> Option<&str> {
        self.attribute(element, "id")
    }

    /// True if the element's class list contains `class`.
    fn has_class(&self, element: Self::Node, class: &str) -> bool {
        self.attribute(element, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|token| token == class))
    }

    /// True if `node` is an element.
    fn is_element(&self, node: Self::Node) -> bool {
        self.kind(node) == NodeKind::Element
    }

    /// True if `element` is in the HTML namespace. Only these elements have
    /// their tag names compared ASCII case-insensitively.
    fn is_html_element(&self, element: Self::Node) -> bool {
        self.namespace(element) == Some(HTML_NAMESPACE)
    }
}

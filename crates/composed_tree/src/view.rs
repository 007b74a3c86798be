//! Selector matching over the composed tree.

use crate::ShadowHost;
use crate::walker::{composed_element_index, composed_parent, composed_previous_element_sibling};
use css_selectors::{ElementAdapter, ElementIndex};

/// Adapts a [`ShadowHost`] so selectors see composed relationships only:
/// combinators and structural pseudo-classes never consult raw parents or siblings.
pub struct ComposedView<'host, H: ShadowHost> {
    host: &'host H,
}

impl<'host, H: ShadowHost> ComposedView<'host, H> {
    #[inline]
    pub const fn new(host: &'host H) -> Self {
        Self { host }
    }

    #[inline]
    pub const fn host(&self) -> &'host H {
        self.host
    }
}

impl<H: ShadowHost> ElementAdapter for ComposedView<'_, H> {
    type Handle = H::Node;

    fn parent(&self, element: H::Node) -> Option<H::Node> {
        composed_parent(self.host, element)
    }

    fn previous_sibling_element(&self, element: H::Node) -> Option<H::Node> {
        composed_previous_element_sibling(self.host, element)
    }

    fn is_element(&self, node: H::Node) -> bool {
        self.host.is_element(node)
    }

    fn tag_name(&self, element: H::Node) -> &str {
        self.host.local_name(element)
    }

    fn is_html_element(&self, element: H::Node) -> bool {
        self.host.is_html_element(element)
    }

    fn element_id(&self, element: H::Node) -> Option<&str> {
        self.host.id(element)
    }

    fn has_class(&self, element: H::Node, class: &str) -> bool {
        self.host.has_class(element, class)
    }

    fn attr(&self, element: H::Node, name: &str) -> Option<&str> {
        self.host.attribute(element, name)
    }

    fn element_index(&self, element: H::Node) -> Option<ElementIndex> {
        composed_element_index(self.host, element)
    }
}

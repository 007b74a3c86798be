//! Composed (flattened) tree navigation.
//! Reference: <https://dom.spec.whatwg.org/#concept-shadow-including-tree-order>,
//! <https://drafts.csswg.org/css-scoping/#flattening>
//!
//! The composed tree is never materialized. It is a set of navigation
//! functions over the host's own nodes:
//! - a shadow host's children are its shadow root's children,
//! - every `<slot>` living in a shadow tree is replaced in place by its
//!   assigned nodes, or by its fallback content when nothing is assigned,
//! - light children of a host that are not assigned anywhere are not part of it.

mod host;
mod view;
mod walker;

pub use host::{HTML_NAMESPACE, NodeKind, ShadowHost};
pub use view::ComposedView;
pub use walker::{
    ComposedDescendants, composed_children, composed_element_index, composed_next_sibling,
    composed_parent, composed_previous_element_sibling, composed_previous_sibling,
};

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod dom;
pub mod parser;

pub use dom::{Dom, DomNode, ElementData, NodeData, ShadowRootMode};
pub use indextree::NodeId;
pub use parser::parse_html;

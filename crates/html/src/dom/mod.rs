use anyhow::{Result, anyhow, bail, ensure};
use composed_tree::NodeKind;

pub use composed_tree::HTML_NAMESPACE;
use indextree::{Arena, NodeId};
use smallvec::SmallVec;

mod printing;
mod slots;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowRootMode {
    Open,
    Closed,
}

#[derive(Debug, Clone, Default)]
pub enum NodeData {
    #[default]
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
    ShadowRoot(ShadowRootMode),
}

#[derive(Debug, Clone)]
pub struct ElementData {
    /// Local name; lowercase for HTML elements.
    pub local_name: String,
    /// Namespace URI, `None` for no namespace.
    pub namespace: Option<String>,
    pub attrs: SmallVec<(String, String), 4>,
}

impl ElementData {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub data: NodeData,
    /// Shadow root attached to this element.
    pub shadow_root: Option<NodeId>,
    /// Host element, for shadow roots.
    pub host: Option<NodeId>,
}

/// An arena-backed tree. Shadow roots are parentless arena nodes linked to
/// their host, so walking raw children never crosses a shadow boundary.
pub struct Dom {
    pub(crate) arena: Arena<DomNode>,
    pub(crate) root: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());
        Self { arena, root }
    }

    /// The document node.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.arena.get(id).map(indextree::Node::get)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn node_kind(&self, id: NodeId) -> NodeKind {
        match self.node(id).map(|node| &node.data) {
            None | Some(NodeData::Document) => NodeKind::Document,
            Some(NodeData::Element(_)) => NodeKind::Element,
            Some(NodeData::Text(_)) => NodeKind::Text,
            Some(NodeData::Comment(_)) => NodeKind::Comment,
            Some(NodeData::ShadowRoot(_)) => NodeKind::ShadowRoot,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    /// `id` and every node below it in shadow-including tree order. A host's
    /// shadow tree comes before its light children.
    pub fn shadow_including_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let children: Vec<NodeId> = self.children(node).collect();
            stack.extend(children.into_iter().rev());
            if let Some(shadow_root) = self.node(node).and_then(|data| data.shadow_root) {
                stack.push(shadow_root);
            }
        }
        out
    }

    /// Create a detached HTML element.
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.create_element_ns(Some(HTML_NAMESPACE), local_name)
    }

    /// Create a detached element in `namespace`. HTML names are ASCII-lowercased,
    /// foreign names such as SVG `clipPath` are kept as given.
    pub fn create_element_ns(&mut self, namespace: Option<&str>, local_name: &str) -> NodeId {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let local_name = if namespace == Some(HTML_NAMESPACE) {
            local_name.to_ascii_lowercase()
        } else {
            local_name.to_owned()
        };
        self.arena.new_node(DomNode {
            data: NodeData::Element(ElementData {
                local_name,
                namespace: namespace.map(str::to_owned),
                attrs: SmallVec::new(),
            }),
            ..DomNode::default()
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode {
            data: NodeData::Text(text.to_owned()),
            ..DomNode::default()
        })
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode {
            data: NodeData::Comment(text.to_owned()),
            ..DomNode::default()
        })
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Returns an error if `parent` cannot have children or the append would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        ensure!(
            matches!(
                self.node_kind(parent),
                NodeKind::Document | NodeKind::Element | NodeKind::ShadowRoot
            ),
            "node {parent:?} cannot have children"
        );
        ensure!(
            self.node_kind(child) != NodeKind::ShadowRoot,
            "shadow roots cannot be inserted into a tree"
        );
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|err| anyhow!("cannot append {child:?} to {parent:?}: {err}"))
    }

    /// Set (or replace) an attribute. Names are ASCII-lowercased.
    ///
    /// # Errors
    /// Returns an error if `element` is not an element.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<()> {
        let Some(NodeData::Element(data)) = self
            .arena
            .get_mut(element)
            .map(|node| &mut node.get_mut().data)
        else {
            bail!("node {element:?} is not an element");
        };
        let name = name.to_ascii_lowercase();
        if let Some(existing) = data.attrs.iter_mut().find(|(key, _)| *key == name) {
            value.clone_into(&mut existing.1);
        } else {
            data.attrs.push((name, value.to_owned()));
        }
        Ok(())
    }

    /// Attach a shadow root to `host` and return it.
    ///
    /// # Errors
    /// Returns an error if `host` is not an element or already hosts a shadow root.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> Result<NodeId> {
        ensure!(
            self.node_kind(host) == NodeKind::Element,
            "only elements can host a shadow root"
        );
        ensure!(
            self.node(host).is_some_and(|node| node.shadow_root.is_none()),
            "element {host:?} already hosts a shadow root"
        );
        let shadow_root = self.arena.new_node(DomNode {
            data: NodeData::ShadowRoot(mode),
            shadow_root: None,
            host: Some(host),
        });
        if let Some(node) = self.arena.get_mut(host) {
            node.get_mut().shadow_root = Some(shadow_root);
        }
        log::trace!(target: "html", "attached {mode:?} shadow root {shadow_root:?} to {host:?}");
        Ok(shadow_root)
    }

    /// Short label for an element: tag followed by its classes, e.g. `span.text.hello`.
    pub fn describe(&self, id: NodeId) -> String {
        let Some(element) = self.element(id) else {
            return format!("#{:?}", self.node_kind(id)).to_lowercase();
        };
        let mut label = element.local_name.clone();
        for class in element
            .attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
        {
            label.push('.');
            label.push_str(class);
        }
        label
    }

    /// Root of the tree containing `id`: the document, a shadow root, or a detached node.
    pub(crate) fn tree_root(&self, id: NodeId) -> NodeId {
        id.ancestors(&self.arena).last().unwrap_or(id)
    }
}

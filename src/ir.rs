//! Template tree IR.
//!
//! The host compiler hands us a nested [`TemplateNode`] tree. The pass works on
//! a [`TemplateTree`] arena built from it: nodes are addressed by [`NodeId`],
//! and detaching a node only unlinks it from its parent, so a walk that holds a
//! snapshot of a child list keeps iterating safely.

use serde::{Deserialize, Serialize};

pub type NodeId = usize;

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZED IR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    /// String literal
    Static(String),
    /// Expression source text
    Dynamic(String),
    /// Valueless attribute
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeIR {
    pub name: String,
    #[serde(default = "empty_value")]
    pub value: AttributeValue,
}

fn empty_value() -> AttributeValue {
    AttributeValue::Empty
}

impl AttributeIR {
    pub fn new(name: &str, value: AttributeValue) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }

    /// `{ ... }` attributes carry raw code as their name.
    pub fn is_expression_block(&self) -> bool {
        self.name.starts_with('{')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeIR>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    #[serde(default)]
    pub pos: u32,
    #[serde(default)]
    pub body_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherNode {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub tag_string: Option<String>,
    #[serde(default)]
    pub children: Vec<TemplateNode>,
    #[serde(default)]
    pub pos: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TemplateNode {
    TemplateRoot {
        #[serde(default)]
        children: Vec<TemplateNode>,
    },
    Container {
        #[serde(default)]
        children: Vec<TemplateNode>,
        #[serde(default)]
        pos: u32,
    },
    HtmlElement(ElementNode),
    CustomTag(ElementNode),
    Other(OtherNode),
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARENA
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    TemplateRoot,
    /// Structural wrapper with no tag of its own (if/for/fragment)
    Container,
    HtmlElement,
    CustomTag,
    Other,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub tag_name: Option<String>,
    pub attributes: Vec<AttributeIR>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub pos: u32,
    pub body_text: Option<String>,
    /// Raw source of the opening tag (used by the inline `class` block)
    pub tag_string: Option<String>,
    detached: bool,
}

impl Node {
    fn bare(kind: NodeKind, tag_name: Option<String>) -> Self {
        Self {
            kind,
            tag_name,
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
            pos: 0,
            body_text: None,
            tag_string: None,
            detached: false,
        }
    }

    pub fn container() -> Self {
        Self::bare(NodeKind::Container, None)
    }

    pub fn element(tag_name: &str) -> Self {
        Self::bare(NodeKind::HtmlElement, Some(tag_name.to_string()))
    }

    pub fn custom_tag(tag_name: &str) -> Self {
        Self::bare(NodeKind::CustomTag, Some(tag_name.to_string()))
    }

    pub fn other(tag_name: &str, tag_string: &str) -> Self {
        let mut node = Self::bare(NodeKind::Other, Some(tag_name.to_string()));
        node.tag_string = Some(tag_string.to_string());
        node
    }

    pub fn with_attribute(mut self, name: &str, value: AttributeValue) -> Self {
        self.attributes.push(AttributeIR::new(name, value));
        self
    }

    pub fn with_pos(mut self, pos: u32) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_body_text(mut self, text: &str) -> Self {
        self.body_text = Some(text.to_string());
        self
    }

    pub fn is_tag(&self, name: &str) -> bool {
        self.tag_name
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| &attr.value)
    }
}

#[derive(Debug, Clone)]
pub struct TemplateTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for TemplateTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateTree {
    /// An empty tree holding only a `TemplateRoot`.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::bare(NodeKind::TemplateRoot, None)],
            root: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Unlink a node from its parent. Its id stays valid.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|child| *child != id);
        }
        self.nodes[id].detached = true;
    }

    pub fn is_detached(&self, id: NodeId) -> bool {
        self.nodes[id].detached
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.nodes[id].has_attribute(name)
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&AttributeValue> {
        self.nodes[id].attribute(name)
    }

    /// Replace the value of `name`, or append it if missing.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: AttributeValue) {
        let attributes = &mut self.nodes[id].attributes;
        match attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => attributes.push(AttributeIR::new(name, value)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // IR CONVERSION
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn from_template_node(node: TemplateNode) -> Self {
        let mut tree = Self::new();
        let children = match node {
            TemplateNode::TemplateRoot { children } => children,
            other => vec![other],
        };
        let root = tree.root;
        for child in children {
            tree.insert_ir(root, child);
        }
        tree
    }

    fn insert_ir(&mut self, parent: NodeId, node: TemplateNode) {
        let (arena_node, children) = match node {
            TemplateNode::TemplateRoot { children } => (Node::container(), children),
            TemplateNode::Container { children, pos } => (Node::container().with_pos(pos), children),
            TemplateNode::HtmlElement(el) => element_to_node(NodeKind::HtmlElement, el),
            TemplateNode::CustomTag(el) => element_to_node(NodeKind::CustomTag, el),
            TemplateNode::Other(other) => {
                let mut arena_node = Node::bare(NodeKind::Other, other.tag_name);
                arena_node.tag_string = other.tag_string;
                arena_node.pos = other.pos;
                (arena_node, other.children)
            }
        };
        let id = self.append(parent, arena_node);
        for child in children {
            self.insert_ir(id, child);
        }
    }

    pub fn to_template_node(&self) -> TemplateNode {
        TemplateNode::TemplateRoot {
            children: self.children_to_ir(self.root),
        }
    }

    fn children_to_ir(&self, id: NodeId) -> Vec<TemplateNode> {
        self.nodes[id]
            .children
            .iter()
            .filter(|child| !self.is_detached(**child))
            .map(|child| self.node_to_ir(*child))
            .collect()
    }

    fn node_to_ir(&self, id: NodeId) -> TemplateNode {
        let node = &self.nodes[id];
        let children = self.children_to_ir(id);
        let element = || ElementNode {
            tag_name: node.tag_name.clone().unwrap_or_default(),
            attributes: node.attributes.clone(),
            children: children.clone(),
            pos: node.pos,
            body_text: node.body_text.clone(),
        };
        match node.kind {
            NodeKind::TemplateRoot => TemplateNode::TemplateRoot {
                children: children.clone(),
            },
            NodeKind::Container => TemplateNode::Container {
                children: children.clone(),
                pos: node.pos,
            },
            NodeKind::HtmlElement => TemplateNode::HtmlElement(element()),
            NodeKind::CustomTag => TemplateNode::CustomTag(element()),
            NodeKind::Other => TemplateNode::Other(OtherNode {
                tag_name: node.tag_name.clone(),
                tag_string: node.tag_string.clone(),
                children: children.clone(),
                pos: node.pos,
            }),
        }
    }
}

fn element_to_node(kind: NodeKind, el: ElementNode) -> (Node, Vec<TemplateNode>) {
    let mut node = Node::bare(kind, Some(el.tag_name));
    node.attributes = el.attributes;
    node.pos = el.pos;
    node.body_text = el.body_text;
    (node, el.children)
}

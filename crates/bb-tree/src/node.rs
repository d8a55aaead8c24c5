use crate::parser::{ParseOptions, TreeBuilder};
use crate::tag::ElementType;
use crate::{render, AccessError, ParseError};
use indexmap::IndexMap;

/// Stable handle of one node inside its owning [Document] arena.
///
/// Ids are only meaningful for the document that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind tag of a node, without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Attribute,
}

impl NodeType {
    /// Name used in tree dumps.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Document => "DOCUMENT",
            NodeType::Element => "ELEMENT",
            NodeType::Text => "TEXT",
            NodeType::Attribute => "ATTRIBUTE",
        }
    }
}

/// Payload of an element node: one parsed tag occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Shape the tag occurrence was classified to. Fixed at construction.
    pub element_type: ElementType,

    /// Tag name, case as written.
    pub name: String,

    /// Inline value, only for [ElementType::Value].
    pub value: Option<String>,

    /// Parameter pairs in first-seen order with unique keys.
    pub parameters: IndexMap<String, String>,

    /// Attribute nodes mirroring the parameter entries. Owned by this
    /// element but not part of its child sequence.
    pub(crate) attributes: Vec<NodeId>,
}

/// Payload of an attribute node, mirroring one parameter entry of its
/// owning element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// Closed set of node payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
    Attribute(Attribute),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

/// A parsed BBCode document owning its node tree.
///
/// The tree is built in one pass by [Document::load] and is immutable
/// afterwards. Equality compares the full node arenas, so two documents
/// parsed from equivalent sources compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
}

impl Document {
    pub(crate) fn new() -> Document {
        Document {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
        }
    }

    /// Parse [data] into a fresh document tree.
    ///
    /// Never fails on merely-unbalanced input; the only error is a tag
    /// whose bracket content classifies to no valid form.
    pub fn load(data: impl AsRef<str>) -> Result<Document, ParseError> {
        Self::load_with(data, ParseOptions::default())
    }

    /// Parse with explicit policy switches.
    pub fn load_with(
        data: impl AsRef<str>,
        options: ParseOptions,
    ) -> Result<Document, ParseError> {
        TreeBuilder::build(data.as_ref(), options)
    }

    /// The document root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a traversal handle for [id].
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    /// Full payload of [id], for exhaustive matching.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        match self.data(id).kind {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element(_) => NodeType::Element,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Attribute(_) => NodeType::Attribute,
        }
    }

    /// Node name: the tag name for elements, the parameter key for
    /// attributes, a fixed literal for document and text nodes.
    pub fn name(&self, id: NodeId) -> &str {
        match &self.data(id).kind {
            NodeKind::Document => "#document",
            NodeKind::Element(element) => &element.name,
            NodeKind::Text(_) => "#text",
            NodeKind::Attribute(attribute) => &attribute.key,
        }
    }

    /// Children of [id] in source order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// Child of [id] at [index].
    pub fn child(&self, id: NodeId, index: usize) -> Result<NodeId, AccessError> {
        self.data(id)
            .children
            .get(index)
            .copied()
            .ok_or(AccessError::OutOfRange)
    }

    /// Parent of [id]; `None` only for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Literal content of a text node.
    pub fn text_content(&self, id: NodeId) -> Result<&str, AccessError> {
        match &self.data(id).kind {
            NodeKind::Text(content) => Ok(content),
            _ => Err(AccessError::WrongKind),
        }
    }

    /// Element payload of [id].
    pub fn element(&self, id: NodeId) -> Result<&Element, AccessError> {
        match &self.data(id).kind {
            NodeKind::Element(element) => Ok(element),
            _ => Err(AccessError::WrongKind),
        }
    }

    pub fn element_type(&self, id: NodeId) -> Result<ElementType, AccessError> {
        Ok(self.element(id)?.element_type)
    }

    /// Inline value of a value-form element.
    pub fn value(&self, id: NodeId) -> Result<&str, AccessError> {
        self.element(id)?
            .value
            .as_deref()
            .ok_or(AccessError::WrongKind)
    }

    /// Parameter mapping of an element, empty unless the element is of
    /// the parameter form.
    pub fn parameters(&self, id: NodeId) -> Result<&IndexMap<String, String>, AccessError> {
        Ok(&self.element(id)?.parameters)
    }

    /// Value of the parameter under [key].
    pub fn parameter(&self, id: NodeId, key: &str) -> Result<&str, AccessError> {
        self.element(id)?
            .parameters
            .get(key)
            .map(String::as_str)
            .ok_or(AccessError::NotFound)
    }

    pub fn has_parameter(&self, id: NodeId, key: &str) -> Result<bool, AccessError> {
        Ok(self.element(id)?.parameters.contains_key(key))
    }

    /// Attribute nodes mirroring an element's parameter entries.
    pub fn attributes(&self, id: NodeId) -> Result<&[NodeId], AccessError> {
        Ok(&self.element(id)?.attributes)
    }

    /// Regenerate source-equivalent BBCode for the subtree at [id].
    pub fn reconstruct(&self, id: NodeId) -> String {
        render::reconstruct(self, id)
    }

    /// Indented diagnostic dump of the whole tree.
    pub fn print_tree(&self) -> String {
        render::print_tree(self)
    }

    /// Allocate a node owned by [parent] without attaching it to the
    /// child sequence.
    pub(crate) fn new_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        id
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }
}

/// Borrowed handle pairing a [Document] with one of its nodes.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn document(self) -> &'a Document {
        self.doc
    }

    pub fn node_type(self) -> NodeType {
        self.doc.node_type(self.id)
    }

    pub fn name(self) -> &'a str {
        self.doc.name(self.id)
    }

    pub fn kind(self) -> &'a NodeKind {
        self.doc.kind(self.id)
    }

    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.doc.parent(self.id).map(|id| self.doc.get(id))
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.doc
            .children(self.id)
            .iter()
            .map(move |&id| self.doc.get(id))
    }

    pub fn as_element(self) -> Option<&'a Element> {
        match self.kind() {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    pub fn as_attribute(self) -> Option<&'a Attribute> {
        match self.kind() {
            NodeKind::Attribute(attribute) => Some(attribute),
            _ => None,
        }
    }
}

use crate::lexer::Lexer;
use crate::node::{Attribute, Document, Element, NodeId, NodeKind};
use crate::tag::{classify, ElementType, TagSpec};
use crate::token::Token;
use crate::ParseError;
use indexmap::IndexMap;
use tracing::trace;

/// Policy switches for tree building.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Resolve closing tags against open tags ignoring ascii case.
    ///
    /// Off by default: `[B]bold[/b]` leaves `B` open and records `/b` as
    /// an orphaned closer. Some dialects mix cases freely; turn this on
    /// to accept them.
    pub case_insensitive_tags: bool,
}

/// Single-pass assembler of a [Document] from the lexer's token stream.
///
/// Keeps a stack of currently open elements, innermost last, plus the
/// insertion parent for the next node.
pub(crate) struct TreeBuilder {
    doc: Document,
    open: Vec<NodeId>,
    cursor: NodeId,
    options: ParseOptions,
}

impl TreeBuilder {
    fn new(options: ParseOptions) -> Self {
        let doc = Document::new();
        let cursor = doc.root();
        Self {
            doc,
            open: Vec::new(),
            cursor,
            options,
        }
    }

    /// Consume [text] and build the tree.
    ///
    /// A tag that classifies to no valid form aborts the whole load; no
    /// partial document is returned. Unbalanced tags never fail here.
    pub(crate) fn build(text: &str, options: ParseOptions) -> Result<Document, ParseError> {
        let mut builder = TreeBuilder::new(options);

        for token in Lexer::new(text) {
            match token {
                Token::Text(content) => builder.append_text(content),
                Token::Tag { raw, offset } => {
                    let spec = classify(&raw).map_err(|e| ParseError::MalformedTag {
                        reason: e.to_string(),
                        position: offset,
                    })?;
                    builder.append_tag(spec);
                }
            }
        }

        // Elements still open at end of input stay in the tree as-is;
        // well-formedness checking is a concern layered above.
        trace!(
            nodes = builder.doc.nodes.len(),
            left_open = builder.open.len(),
            "built bbcode tree"
        );
        Ok(builder.doc)
    }

    fn append_text(&mut self, content: String) {
        let id = self.doc.new_node(self.cursor, NodeKind::Text(content));
        self.doc.append_child(self.cursor, id);
    }

    fn append_tag(&mut self, spec: TagSpec) {
        match spec.element_type {
            ElementType::Closing => self.close_element(spec.name),
            _ => self.open_element(spec),
        }
    }

    /// Attach a new element under the insertion parent and nest into it.
    fn open_element(&mut self, spec: TagSpec) {
        let TagSpec {
            element_type,
            name,
            value,
            parameters,
        } = spec;
        let pairs: Vec<(String, String)> = parameters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let id = self.doc.new_node(
            self.cursor,
            NodeKind::Element(Element {
                element_type,
                name,
                value,
                parameters,
                attributes: Vec::new(),
            }),
        );
        self.doc.append_child(self.cursor, id);

        // Mirror each parameter entry as an addressable attribute node.
        for (key, value) in pairs {
            let attribute = self
                .doc
                .new_node(id, NodeKind::Attribute(Attribute { key, value }));
            if let NodeKind::Element(element) = self.doc.kind_mut(id) {
                element.attributes.push(attribute);
            }
        }

        self.open.push(id);
        self.cursor = id;
    }

    /// Resolve a closing marker against the open-element stack.
    ///
    /// The nearest open element with a matching name closes, together
    /// with everything nested deeper than it (`[b][i]x[/b]` closes both
    /// `i` and `b`). A closer matching nothing on the stack is kept as a
    /// childless closing element so reconstruction stays lossless.
    fn close_element(&mut self, name: String) {
        match self
            .open
            .iter()
            .rposition(|&id| self.name_matches(id, &name))
        {
            Some(index) => {
                let matched = self.open[index];
                self.open.truncate(index);
                self.cursor = self
                    .doc
                    .parent(matched)
                    .unwrap_or_else(|| self.doc.root());
            }
            None => {
                let id = self.doc.new_node(
                    self.cursor,
                    NodeKind::Element(Element {
                        element_type: ElementType::Closing,
                        name,
                        value: None,
                        parameters: IndexMap::new(),
                        attributes: Vec::new(),
                    }),
                );
                self.doc.append_child(self.cursor, id);
            }
        }
    }

    fn name_matches(&self, id: NodeId, name: &str) -> bool {
        let open_name = self.doc.name(id);
        if self.options.case_insensitive_tags {
            open_name.eq_ignore_ascii_case(name)
        } else {
            open_name == name
        }
    }
}

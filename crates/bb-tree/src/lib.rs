//! BBCode parsing into a navigable typed tree.
//!
//! [Document::load] runs the whole pipeline: the lexer splits the source
//! into text runs and raw tag occurrences, the classifier resolves each
//! tag's shape, and the tree builder matches opening and closing tags
//! into a rooted node tree. [reconstruct] regenerates source-equivalent
//! markup from any subtree.

pub mod lexer;
pub mod node;
mod parser;
mod render;
mod scanner;
pub mod tag;
pub mod token;

pub use lexer::Lexer;
pub use node::{Attribute, Document, Element, NodeId, NodeKind, NodeRef, NodeType};
pub use parser::ParseOptions;
pub use render::{close_marker, open_marker, print_tree, reconstruct};
pub use tag::{classify, ElementType, TagError, TagSpec};
pub use token::Token;

const OPEN: char = '[';
const CLOSE: char = ']';
const SLASH: char = '/';
const EQUAL: char = '=';
const QUOTE: char = '"';

/// Failure while loading a document.
///
/// Structural imbalance is not an error: unclosed tags and orphaned
/// closers always produce a tree. See the validation support in the
/// convenience layer for strict well-formedness checking.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Bracket content classified to no valid form.
    #[error("malformed tag at offset {position}: {reason}")]
    MalformedTag {
        /// What the classifier rejected.
        reason: String,

        /// Character offset of the offending `[` in the source.
        position: usize,
    },
}

/// Contract violation while reading node fields.
///
/// These are local outcomes of a single accessor call and never corrupt
/// the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The node is not of the kind this accessor serves.
    #[error("node kind does not support this access")]
    WrongKind,

    /// Child index beyond the node's child count.
    #[error("child index out of range")]
    OutOfRange,

    /// No parameter under the requested key.
    #[error("parameter key not found")]
    NotFound,
}

/// Parse [data] into a [Document] tree with default options.
pub fn parse_bbcode(data: impl AsRef<str>) -> Result<Document, ParseError> {
    Document::load(data)
}

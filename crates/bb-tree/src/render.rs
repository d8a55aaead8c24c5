use crate::node::{Document, Element, NodeId, NodeKind};
use crate::tag::ElementType;
use crate::{CLOSE, OPEN, QUOTE, SLASH};

/// Indentation unit of [print_tree], one per depth level.
const INDENT: &str = "  ";

/// Regenerate source-equivalent BBCode for the subtree rooted at [id].
///
/// Re-parsing the result yields a tree with the same shape and field
/// values. The text is not guaranteed byte-identical to the original:
/// parameter whitespace and quoting are normalized, and elements closed
/// implicitly (or never) in the source come out with an explicit closer.
pub fn reconstruct(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.kind(id) {
        NodeKind::Document => {
            for &child in doc.children(id) {
                write_node(doc, child, out);
            }
        }
        NodeKind::Text(content) => out.push_str(content),
        NodeKind::Attribute(attribute) => {
            out.push_str(&attribute.key);
            out.push('=');
            push_parameter_value(&attribute.value, out);
        }
        NodeKind::Element(element) => {
            out.push_str(&open_marker(element));
            if element.element_type != ElementType::Closing {
                for &child in doc.children(id) {
                    write_node(doc, child, out);
                }
                out.push_str(&close_marker(element));
            }
        }
    }
}

/// The opening marker of an element, e.g. `[quote user=John]`.
///
/// For a closing element this is the whole occurrence, `[/name]`.
pub fn open_marker(element: &Element) -> String {
    let mut out = String::new();
    out.push(OPEN);
    match element.element_type {
        ElementType::Closing => {
            out.push(SLASH);
            out.push_str(&element.name);
        }
        ElementType::Simple => out.push_str(&element.name),
        ElementType::Value => {
            out.push_str(&element.name);
            out.push('=');
            out.push_str(element.value.as_deref().unwrap_or_default());
        }
        ElementType::Parameter => {
            out.push_str(&element.name);
            for (key, value) in &element.parameters {
                out.push(' ');
                out.push_str(key);
                out.push('=');
                push_parameter_value(value, &mut out);
            }
        }
    }
    out.push(CLOSE);
    out
}

/// The closing marker of an element, e.g. `[/quote]`. Empty for a
/// closing element, which has no body of its own.
pub fn close_marker(element: &Element) -> String {
    match element.element_type {
        ElementType::Closing => String::new(),
        _ => format!("{OPEN}{SLASH}{}{CLOSE}", element.name),
    }
}

/// Quote a parameter value when it would not survive whitespace
/// splitting otherwise.
fn push_parameter_value(value: &str, out: &mut String) {
    if value.contains(char::is_whitespace) {
        out.push(QUOTE);
        out.push_str(value);
        out.push(QUOTE);
    } else {
        out.push_str(value);
    }
}

/// Indented, depth-first dump of the whole tree.
///
/// One line per node: kind, name, and for elements the shape with its
/// value or parameters inline. Attribute nodes are listed under their
/// element, before its children. Diagnostic output; deterministic for
/// identical input but otherwise without a format contract.
pub fn print_tree(doc: &Document) -> String {
    let mut out = String::new();
    print_node(doc, doc.root(), 0, &mut out);
    out
}

fn print_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(doc.node_type(id).as_str());
    out.push(' ');

    match doc.kind(id) {
        NodeKind::Document => out.push_str("#document"),
        NodeKind::Text(content) => {
            out.push_str(&format!("#text {content:?}"));
        }
        NodeKind::Attribute(attribute) => {
            out.push_str(&format!("{}={:?}", attribute.key, attribute.value));
        }
        NodeKind::Element(element) => {
            out.push_str(&format!("{} ({})", element.name, element.element_type.as_str()));
            if let Some(value) = &element.value {
                out.push_str(&format!(" value={value:?}"));
            }
            for (key, value) in &element.parameters {
                out.push_str(&format!(" {key}={value:?}"));
            }
        }
    }
    out.push('\n');

    if let Ok(attributes) = doc.attributes(id) {
        for &attribute in attributes {
            print_node(doc, attribute, depth + 1, out);
        }
    }
    for &child in doc.children(id) {
        print_node(doc, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_reconstructs_literally() {
        let doc = Document::load("plain [text").unwrap();
        assert_eq!(doc.reconstruct(doc.root()), "plain [text");
    }

    #[test]
    fn simple_element() {
        let doc = Document::load("[b]bold[/b]").unwrap();
        assert_eq!(doc.reconstruct(doc.root()), "[b]bold[/b]");
    }

    #[test]
    fn value_element() {
        let doc = Document::load("[url=https://example.com]x[/url]").unwrap();
        assert_eq!(
            doc.reconstruct(doc.root()),
            "[url=https://example.com]x[/url]"
        );
    }

    #[test]
    fn parameter_element_in_insertion_order() {
        let doc = Document::load("[quote user=John page=3]hi[/quote]").unwrap();
        assert_eq!(
            doc.reconstruct(doc.root()),
            "[quote user=John page=3]hi[/quote]"
        );
    }

    #[test]
    fn parameter_value_with_whitespace_is_quoted() {
        let doc = Document::load("[quote user=\"John Smith\"]hi[/quote]").unwrap();
        assert_eq!(
            doc.reconstruct(doc.root()),
            "[quote user=\"John Smith\"]hi[/quote]"
        );
    }

    #[test]
    fn unclosed_element_gains_explicit_closer() {
        let doc = Document::load("[b]unclosed").unwrap();
        assert_eq!(doc.reconstruct(doc.root()), "[b]unclosed[/b]");
    }

    #[test]
    fn orphan_closer_reconstructs_alone() {
        let doc = Document::load("[/quote]").unwrap();
        assert_eq!(doc.reconstruct(doc.root()), "[/quote]");
    }

    #[test]
    fn subtree_reconstruction() {
        let doc = Document::load("a[b]c[/b]d").unwrap();
        let element = doc.child(doc.root(), 1).unwrap();
        assert_eq!(doc.reconstruct(element), "[b]c[/b]");
    }

    #[test]
    fn attribute_node_reconstruction() {
        let doc = Document::load("[quote user=John]hi[/quote]").unwrap();
        let element = doc.child(doc.root(), 0).unwrap();
        let attribute = doc.attributes(element).unwrap()[0];
        assert_eq!(doc.reconstruct(attribute), "user=John");
    }

    #[test]
    fn dump_is_deterministic_and_indented() {
        let doc = Document::load("[quote user=John]hi[/quote]").unwrap();
        let dump = doc.print_tree();
        assert_eq!(dump, doc.print_tree());
        assert_eq!(
            dump,
            "DOCUMENT #document\n\
             \u{20} ELEMENT quote (PARAMETER) user=\"John\"\n\
             \u{20}   ATTRIBUTE user=\"John\"\n\
             \u{20}   TEXT #text \"hi\"\n"
        );
    }
}

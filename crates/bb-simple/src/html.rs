use bb_tree::{Document, ElementType, NodeKind, NodeRef, ParseError};

/// Convert [bbcode] into HTML with a minimal built-in tag mapping.
///
/// `b`, `i`, `u`, `s`, `code`, `quote` and `url` map to their obvious
/// HTML counterparts; a `url` element links to its inline value when
/// present and to its text content otherwise. Unknown tags contribute
/// their content without markers, orphaned closers contribute nothing.
///
/// Text passes through verbatim. No HTML escaping is performed.
pub fn to_html(bbcode: impl AsRef<str>) -> Result<String, ParseError> {
    let doc = Document::load(bbcode)?;
    let mut out = String::new();
    write_html(doc.get(doc.root()), &mut out);
    Ok(out)
}

fn write_html(node: NodeRef, out: &mut String) {
    match node.kind() {
        NodeKind::Document => write_children(node, out),
        NodeKind::Text(content) => out.push_str(content),
        NodeKind::Attribute(_) => {}
        NodeKind::Element(element) => {
            if element.element_type == ElementType::Closing {
                return;
            }
            match element.name.as_str() {
                "b" => wrap(node, "<strong>", "</strong>", out),
                "i" => wrap(node, "<em>", "</em>", out),
                "u" => wrap(node, "<u>", "</u>", out),
                "s" => wrap(node, "<del>", "</del>", out),
                "code" => wrap(node, "<code>", "</code>", out),
                "quote" => wrap(node, "<blockquote>", "</blockquote>", out),
                "url" => {
                    let href = match &element.value {
                        Some(value) => value.clone(),
                        None => {
                            let mut target = String::new();
                            crate::collect_text(node, &mut target);
                            target
                        }
                    };
                    out.push_str(&format!("<a href=\"{href}\">"));
                    write_children(node, out);
                    out.push_str("</a>");
                }
                _ => write_children(node, out),
            }
        }
    }
}

fn write_children(node: NodeRef, out: &mut String) {
    for child in node.children() {
        write_html(child, out);
    }
}

fn wrap(node: NodeRef, open: &str, close: &str, out: &mut String) {
    out.push_str(open);
    write_children(node, out);
    out.push_str(close);
}

//! Convenience operations over parsed BBCode, for callers that want a
//! result string instead of a tree. Every entry point parses its input
//! fresh; only genuinely malformed tags fail, unbalanced markup never
//! does.

use bb_tree::{close_marker, open_marker, Document, Element, ElementType, NodeKind, NodeRef, ParseError};

mod html;
mod stats;
mod validate;

pub use html::to_html;
pub use stats::{stats, Stats};
pub use validate::{is_valid, validate, Issue, IssueKind};

/// Replacement markers for one tag name, used by [replace_tags].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagReplacement {
    /// Tag name to replace, matched case-sensitively.
    pub tag_name: String,

    /// Emitted instead of the opening marker.
    pub open_replacement: String,

    /// Emitted instead of the closing marker.
    pub close_replacement: String,
}

/// Extract the raw text content, stripping all markup.
pub fn extract_text(bbcode: impl AsRef<str>) -> Result<String, ParseError> {
    let doc = Document::load(bbcode)?;
    let mut out = String::new();
    collect_text(doc.get(doc.root()), &mut out);
    Ok(out)
}

fn collect_text(node: NodeRef, out: &mut String) {
    if let Some(text) = node.as_text() {
        out.push_str(text);
    }
    for child in node.children() {
        collect_text(child, out);
    }
}

/// Check whether a tag with [tag_name] occurs anywhere in [bbcode].
pub fn has_tag(bbcode: impl AsRef<str>, tag_name: &str) -> Result<bool, ParseError> {
    Ok(count_tags(bbcode, tag_name)? > 0)
}

/// Count opening occurrences of [tag_name], at any nesting depth.
/// Orphaned closing markers do not count.
pub fn count_tags(bbcode: impl AsRef<str>, tag_name: &str) -> Result<usize, ParseError> {
    let doc = Document::load(bbcode)?;
    Ok(count_in(doc.get(doc.root()), tag_name))
}

fn count_in(node: NodeRef, tag_name: &str) -> usize {
    let own = match node.as_element() {
        Some(element) if element.element_type != ElementType::Closing => {
            usize::from(element.name == tag_name)
        }
        _ => 0,
    };
    own + node
        .children()
        .map(|child| count_in(child, tag_name))
        .sum::<usize>()
}

/// Collect the target of every `url` element, in document order.
///
/// `[url=target]` contributes its value; `[url]target[/url]` contributes
/// its text content.
pub fn extract_urls(bbcode: impl AsRef<str>) -> Result<Vec<String>, ParseError> {
    let doc = Document::load(bbcode)?;
    let mut urls = Vec::new();
    collect_urls(doc.get(doc.root()), &mut urls);
    Ok(urls)
}

fn collect_urls(node: NodeRef, urls: &mut Vec<String>) {
    if let Some(element) = node.as_element() {
        if element.element_type != ElementType::Closing && element.name == "url" {
            match &element.value {
                Some(value) => urls.push(value.clone()),
                None => {
                    let mut target = String::new();
                    collect_text(node, &mut target);
                    urls.push(target);
                }
            }
        }
    }
    for child in node.children() {
        collect_urls(child, urls);
    }
}

/// Collect the author of every `quote` element, in document order.
///
/// Prefers the `user` parameter, then the `[quote=Name]` value, then the
/// folded `quote` parameter of the `[quote=Name key=value]` shorthand.
/// Quotes carrying none of these are skipped.
pub fn extract_quote_authors(bbcode: impl AsRef<str>) -> Result<Vec<String>, ParseError> {
    let doc = Document::load(bbcode)?;
    let mut authors = Vec::new();
    collect_authors(doc.get(doc.root()), &mut authors);
    Ok(authors)
}

fn collect_authors(node: NodeRef, authors: &mut Vec<String>) {
    if let Some(element) = node.as_element() {
        if element.element_type != ElementType::Closing && element.name == "quote" {
            let author = element
                .parameters
                .get("user")
                .or(element.value.as_ref())
                .or_else(|| element.parameters.get("quote"));
            if let Some(author) = author {
                authors.push(author.clone());
            }
        }
    }
    for child in node.children() {
        collect_authors(child, authors);
    }
}

/// Regenerate the source with every element named [tag_name] replaced by
/// its own content. Orphaned closers of that name disappear as well.
pub fn strip_tag(bbcode: impl AsRef<str>, tag_name: &str) -> Result<String, ParseError> {
    let doc = Document::load(bbcode)?;
    let mut out = String::new();
    render_with(doc.get(doc.root()), &mut out, &|element| {
        (element.name == tag_name).then(|| (String::new(), String::new()))
    });
    Ok(out)
}

/// Regenerate the source with the markers of matching elements rewritten
/// per [replacements]; everything else reconstructs as BBCode.
pub fn replace_tags(
    bbcode: impl AsRef<str>,
    replacements: &[TagReplacement],
) -> Result<String, ParseError> {
    let doc = Document::load(bbcode)?;
    let mut out = String::new();
    render_with(doc.get(doc.root()), &mut out, &|element| {
        replacements
            .iter()
            .find(|r| r.tag_name == element.name)
            .map(|r| (r.open_replacement.clone(), r.close_replacement.clone()))
    });
    Ok(out)
}

/// Depth-first re-rendering with per-element marker substitution.
///
/// The rule returns the substitute (open, close) pair, or `None` to keep
/// the element's BBCode markers. A substituted closing element emits the
/// close replacement only.
fn render_with(
    node: NodeRef,
    out: &mut String,
    rule: &dyn Fn(&Element) -> Option<(String, String)>,
) {
    match node.kind() {
        NodeKind::Document => {
            for child in node.children() {
                render_with(child, out, rule);
            }
        }
        NodeKind::Text(content) => out.push_str(content),
        NodeKind::Attribute(_) => {}
        NodeKind::Element(element) => match rule(element) {
            Some((open, close)) => {
                if element.element_type == ElementType::Closing {
                    out.push_str(&close);
                    return;
                }
                out.push_str(&open);
                for child in node.children() {
                    render_with(child, out, rule);
                }
                out.push_str(&close);
            }
            None => {
                out.push_str(&open_marker(element));
                if element.element_type != ElementType::Closing {
                    for child in node.children() {
                        render_with(child, out, rule);
                    }
                    out.push_str(&close_marker(element));
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_strips_markup() {
        let text = extract_text("[b]bold[/b] and [i]italic[/i]").unwrap();
        assert_eq!(text, "bold and italic");
    }

    #[test]
    fn extract_text_of_malformed_input_fails() {
        assert!(extract_text("a[]b").is_err());
    }

    #[test]
    fn tag_queries() {
        let bbcode = "[b]x[/b][quote][b]y[/b][/quote]";
        assert_eq!(count_tags(bbcode, "b").unwrap(), 2);
        assert_eq!(count_tags(bbcode, "quote").unwrap(), 1);
        assert_eq!(count_tags(bbcode, "i").unwrap(), 0);
        assert!(has_tag(bbcode, "quote").unwrap());
        assert!(!has_tag(bbcode, "i").unwrap());
    }

    #[test]
    fn orphan_closers_do_not_count() {
        assert_eq!(count_tags("[/b]", "b").unwrap(), 0);
    }

    #[test]
    fn urls_from_value_and_content() {
        let urls = extract_urls(
            "[url=https://example.com]x[/url] [url]https://fallback.example[/url]",
        )
        .unwrap();
        assert_eq!(
            urls,
            vec!["https://example.com", "https://fallback.example"]
        );
    }

    #[test]
    fn quote_authors_from_all_shorthands() {
        let authors = extract_quote_authors(
            "[quote user=John]a[/quote][quote=Jane]b[/quote][quote=Joe sig=x]c[/quote][quote]d[/quote]",
        )
        .unwrap();
        assert_eq!(authors, vec!["John", "Jane", "Joe"]);
    }

    #[test]
    fn strip_keeps_content() {
        assert_eq!(strip_tag("[b]x[/b]y", "b").unwrap(), "xy");
        // Other markup is reconstructed, nested matches are stripped too.
        assert_eq!(
            strip_tag("[quote][b]x[/b][/quote]", "b").unwrap(),
            "[quote]x[/quote]"
        );
        assert_eq!(strip_tag("x[/b]y", "b").unwrap(), "xy");
    }

    #[test]
    fn replace_rewrites_markers() {
        let replacements = vec![TagReplacement {
            tag_name: "b".into(),
            open_replacement: "<strong>".into(),
            close_replacement: "</strong>".into(),
        }];
        assert_eq!(
            replace_tags("[b]x[/b] [i]y[/i]", &replacements).unwrap(),
            "<strong>x</strong> [i]y[/i]"
        );
    }

    #[test]
    fn replace_handles_orphan_closer() {
        let replacements = vec![TagReplacement {
            tag_name: "b".into(),
            open_replacement: "<strong>".into(),
            close_replacement: "</strong>".into(),
        }];
        assert_eq!(
            replace_tags("x[/b]", &replacements).unwrap(),
            "x</strong>"
        );
    }
}

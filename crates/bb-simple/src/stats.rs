use bb_tree::{Document, ElementType, NodeKind, NodeRef, ParseError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Aggregate figures over one parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Opening tag occurrences, orphaned closers excluded.
    pub total_tags: usize,

    /// Text nodes in the tree.
    pub text_nodes: usize,

    /// Distinct tag names among `total_tags`.
    pub unique_tags: usize,

    /// Deepest element nesting, 1 for a top-level element.
    pub max_nesting_depth: usize,

    /// Characters over all text nodes.
    pub total_text_length: usize,
}

/// Compute [Stats] for [bbcode] in one tree walk.
pub fn stats(bbcode: impl AsRef<str>) -> Result<Stats, ParseError> {
    let doc = Document::load(bbcode)?;
    let mut stats = Stats::default();
    let mut names = HashSet::new();
    walk(doc.get(doc.root()), 0, &mut stats, &mut names);
    stats.unique_tags = names.len();
    Ok(stats)
}

fn walk(node: NodeRef, depth: usize, stats: &mut Stats, names: &mut HashSet<String>) {
    let mut child_depth = depth;
    match node.kind() {
        NodeKind::Text(content) => {
            stats.text_nodes += 1;
            stats.total_text_length += content.chars().count();
        }
        NodeKind::Element(element) if element.element_type != ElementType::Closing => {
            stats.total_tags += 1;
            names.insert(element.name.clone());
            child_depth += 1;
            stats.max_nesting_depth = stats.max_nesting_depth.max(child_depth);
        }
        _ => {}
    }
    for child in node.children() {
        walk(child, child_depth, stats, names);
    }
}

#[cfg(test)]
mod tests {
    use super::{stats, Stats};

    #[test]
    fn empty_input() {
        assert_eq!(stats("").unwrap(), Stats::default());
    }

    #[test]
    fn nested_document() {
        let collected = stats("[b][i]x[/i][/b]y").unwrap();
        assert_eq!(
            collected,
            Stats {
                total_tags: 2,
                text_nodes: 2,
                unique_tags: 2,
                max_nesting_depth: 2,
                total_text_length: 2,
            }
        );
    }

    #[test]
    fn repeated_tags_count_once_in_unique() {
        let collected = stats("[b]x[/b][b]y[/b]").unwrap();
        assert_eq!(collected.total_tags, 2);
        assert_eq!(collected.unique_tags, 1);
    }

    #[test]
    fn orphan_closers_are_not_tags() {
        let collected = stats("[/b]text").unwrap();
        assert_eq!(collected.total_tags, 0);
        assert_eq!(collected.max_nesting_depth, 0);
        assert_eq!(collected.text_nodes, 1);
        assert_eq!(collected.total_text_length, 4);
    }

    #[test]
    fn text_length_counts_characters() {
        let collected = stats("你好").unwrap();
        assert_eq!(collected.total_text_length, 2);
    }
}

use bb_tree::tag::{classify, ElementType};
use bb_tree::token::Token;
use bb_tree::{Lexer, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Well-formedness defect classes reported by [validate].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// An opening tag without a closing tag of its own, either left open
    /// at end of input or closed implicitly by an outer closer.
    UnclosedTag,

    /// A closing tag matching no open element.
    OrphanClosingTag,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::UnclosedTag => f.write_str("unclosed tag"),
            IssueKind::OrphanClosingTag => f.write_str("orphan closing tag"),
        }
    }
}

/// One structural imbalance in a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,

    /// Tag name as written.
    pub name: String,

    /// Character offset of the tag's opening `[`.
    pub offset: usize,
}

/// Check matching of opening and closing tags.
///
/// The tree builder itself tolerates imbalance; this is the strict pass
/// layered above it. Replays the token stream with an open-tag stack and
/// reports every tag that never got a closer of its own plus every
/// closer that matched nothing. Malformed tags fail the same way
/// [Document::load] does.
///
/// [Document::load]: bb_tree::Document::load
pub fn validate(bbcode: impl AsRef<str>) -> Result<Vec<Issue>, ParseError> {
    let mut open: Vec<(String, usize)> = Vec::new();
    let mut issues = Vec::new();

    for token in Lexer::new(bbcode.as_ref()) {
        let Token::Tag { raw, offset } = token else {
            continue;
        };
        let spec = classify(&raw).map_err(|e| ParseError::MalformedTag {
            reason: e.to_string(),
            position: offset,
        })?;

        if spec.element_type == ElementType::Closing {
            match open.iter().rposition(|(name, _)| name == &spec.name) {
                Some(index) => {
                    // Tags nested deeper than the match are closed
                    // implicitly; strictly speaking they are unclosed.
                    for (name, tag_offset) in open.split_off(index).into_iter().skip(1) {
                        issues.push(Issue {
                            kind: IssueKind::UnclosedTag,
                            name,
                            offset: tag_offset,
                        });
                    }
                }
                None => issues.push(Issue {
                    kind: IssueKind::OrphanClosingTag,
                    name: spec.name,
                    offset,
                }),
            }
        } else {
            open.push((spec.name, offset));
        }
    }

    for (name, offset) in open {
        issues.push(Issue {
            kind: IssueKind::UnclosedTag,
            name,
            offset,
        });
    }

    trace!(issues = issues.len(), "validated bbcode structure");
    Ok(issues)
}

/// True when [validate] reports no issue.
pub fn is_valid(bbcode: impl AsRef<str>) -> Result<bool, ParseError> {
    Ok(validate(bbcode)?.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_input_is_valid() {
        assert!(validate("[b][i]x[/i][/b]").unwrap().is_empty());
        assert!(is_valid("plain text").unwrap());
        assert!(is_valid("").unwrap());
    }

    #[test]
    fn unclosed_tag_is_reported_with_offset() {
        let issues = validate("a[b]x").unwrap();
        assert_eq!(
            issues,
            vec![Issue {
                kind: IssueKind::UnclosedTag,
                name: "b".into(),
                offset: 1,
            }]
        );
    }

    #[test]
    fn orphan_closer_is_reported() {
        let issues = validate("[/q]").unwrap();
        assert_eq!(
            issues,
            vec![Issue {
                kind: IssueKind::OrphanClosingTag,
                name: "q".into(),
                offset: 0,
            }]
        );
    }

    #[test]
    fn implicitly_closed_tags_are_unclosed() {
        let issues = validate("[b][i]x[/b]").unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::UnclosedTag);
        assert_eq!(issues[0].name, "i");
        assert_eq!(issues[0].offset, 3);
    }

    #[test]
    fn case_mismatch_is_two_issues() {
        let issues = validate("[B]x[/b]").unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::OrphanClosingTag);
        assert_eq!(issues[0].name, "b");
        assert_eq!(issues[1].kind, IssueKind::UnclosedTag);
        assert_eq!(issues[1].name, "B");
    }

    #[test]
    fn malformed_tag_fails_validation() {
        assert!(validate("[]").is_err());
    }
}

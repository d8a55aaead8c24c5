use crate::{EQUAL, QUOTE, SLASH};
use indexmap::IndexMap;

/// Syntactic shape of one tag occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    /// `[b]`
    Simple,

    /// `[url=https://example.com]`
    Value,

    /// `[quote user=John]`
    Parameter,

    /// `[/b]`
    Closing,
}

impl ElementType {
    /// Name used in tree dumps.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Simple => "SIMPLE",
            ElementType::Value => "VALUE",
            ElementType::Parameter => "PARAMETER",
            ElementType::Closing => "CLOSING",
        }
    }
}

/// Decomposed form of one tag occurrence, produced by [classify].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagSpec {
    pub element_type: ElementType,

    /// Tag name, case as written.
    pub name: String,

    /// Inline value, only for [ElementType::Value].
    pub value: Option<String>,

    /// Parameter pairs in first-seen order, only non-empty for
    /// [ElementType::Parameter]. A repeated key keeps its first position
    /// and the value of its last occurrence.
    pub parameters: IndexMap<String, String>,
}

/// Bracket content classified to no valid form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("empty tag name")]
    EmptyName,
}

/// Classify the raw content of one tag occurrence.
///
/// `raw` is the text between `[` and `]`, delimiters excluded. Rules, in
/// order:
///
/// 1. Content starting with `/` is a closing marker; the name is the
///    trimmed remainder.
/// 2. Otherwise split on the first whitespace run into head and optional
///    tail.
///    * A head containing `=` splits into name and value at the first
///      `=`. A tail consisting solely of further `key=value` pairs turns
///      the whole tag into the parameter form with the head value folded
///      in under the tag name itself (the `[quote=Name sig=x]`
///      shorthand); any other tail is dropped and the value form stands.
///    * A head without `=` followed by a tail holding at least one
///      `key=value` token is the parameter form; tail tokens without `=`
///      are ignored. Double-quoted values consume through the matching
///      quote, whitespace included.
///    * Anything else is a simple tag.
/// 3. An empty name after trimming is [TagError::EmptyName].
pub fn classify(raw: &str) -> Result<TagSpec, TagError> {
    let content = raw.trim_start();

    if let Some(rest) = content.strip_prefix(SLASH) {
        let name = rest.trim();
        if name.is_empty() {
            return Err(TagError::EmptyName);
        }
        return Ok(TagSpec {
            element_type: ElementType::Closing,
            name: name.to_string(),
            value: None,
            parameters: IndexMap::new(),
        });
    }

    let (head, tail) = match content.find(char::is_whitespace) {
        Some(pos) => (&content[..pos], Some(content[pos..].trim_start())),
        None => (content, None),
    };
    let tail = tail.filter(|t| !t.is_empty());

    if head.is_empty() {
        return Err(TagError::EmptyName);
    }

    if let Some(eq) = head.find(EQUAL) {
        let name = &head[..eq];
        let value = &head[eq + 1..];
        if name.is_empty() {
            return Err(TagError::EmptyName);
        }

        if let Some(pairs) = tail.and_then(parse_pairs_strict) {
            // `[quote=Name sig=x]`: fold the head value in as a parameter
            // keyed by the tag name itself.
            let mut parameters = IndexMap::new();
            parameters.insert(name.to_string(), value.to_string());
            for (key, pair_value) in pairs {
                parameters.insert(key, pair_value);
            }
            return Ok(TagSpec {
                element_type: ElementType::Parameter,
                name: name.to_string(),
                value: None,
                parameters,
            });
        }

        return Ok(TagSpec {
            element_type: ElementType::Value,
            name: name.to_string(),
            value: Some(value.to_string()),
            parameters: IndexMap::new(),
        });
    }

    if let Some(tail) = tail {
        let mut parameters = IndexMap::new();
        for (key, value) in split_tokens(tail).iter().filter_map(|t| parse_pair(t)) {
            parameters.insert(key, value);
        }
        if !parameters.is_empty() {
            return Ok(TagSpec {
                element_type: ElementType::Parameter,
                name: head.to_string(),
                value: None,
                parameters,
            });
        }
    }

    Ok(TagSpec {
        element_type: ElementType::Simple,
        name: head.to_string(),
        value: None,
        parameters: IndexMap::new(),
    })
}

/// Split a parameter tail into whitespace-separated tokens, letting a
/// double-quoted section consume through the matching quote.
fn split_tokens(tail: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in tail.chars() {
        if in_quotes {
            current.push(ch);
            if ch == QUOTE {
                in_quotes = false;
            }
        } else if ch == QUOTE {
            current.push(ch);
            in_quotes = true;
        } else if ch.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Parse one `key=value` token, stripping the surrounding double quotes
/// of a quoted value. Returns `None` for tokens that are no such pair.
fn parse_pair(token: &str) -> Option<(String, String)> {
    let eq = token.find(EQUAL)?;
    let key = &token[..eq];
    if key.is_empty() {
        return None;
    }
    let mut value = &token[eq + 1..];
    if value.len() >= 2 && value.starts_with(QUOTE) && value.ends_with(QUOTE) {
        value = &value[1..value.len() - 1];
    }
    Some((key.to_string(), value.to_string()))
}

/// Parse a tail that must consist solely of `key=value` pairs.
fn parse_pairs_strict(tail: &str) -> Option<Vec<(String, String)>> {
    split_tokens(tail)
        .iter()
        .map(|token| parse_pair(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_tag() {
        let spec = classify("b").unwrap();
        assert_eq!(spec.element_type, ElementType::Simple);
        assert_eq!(spec.name, "b");
        assert_eq!(spec.value, None);
        assert!(spec.parameters.is_empty());
    }

    #[test]
    fn value_tag() {
        let spec = classify("url=https://example.com").unwrap();
        assert_eq!(spec.element_type, ElementType::Value);
        assert_eq!(spec.name, "url");
        assert_eq!(spec.value.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn empty_value_is_kept() {
        let spec = classify("url=").unwrap();
        assert_eq!(spec.element_type, ElementType::Value);
        assert_eq!(spec.value.as_deref(), Some(""));
    }

    #[test]
    fn parameter_tag() {
        let spec = classify("quote user=John").unwrap();
        assert_eq!(spec.element_type, ElementType::Parameter);
        assert_eq!(spec.name, "quote");
        assert_eq!(spec.parameters.get("user").map(String::as_str), Some("John"));
    }

    #[test]
    fn head_value_folds_into_parameters() {
        let spec = classify("quote=John sig=x").unwrap();
        assert_eq!(spec.element_type, ElementType::Parameter);
        assert_eq!(spec.name, "quote");
        assert_eq!(spec.value, None);
        let pairs: Vec<_> = spec
            .parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("quote", "John"), ("sig", "x")]);
    }

    #[test]
    fn junk_tail_after_head_value_degrades_to_value() {
        let spec = classify("quote=John Smith").unwrap();
        assert_eq!(spec.element_type, ElementType::Value);
        assert_eq!(spec.value.as_deref(), Some("John"));
    }

    #[test]
    fn quoted_value_keeps_whitespace() {
        let spec = classify("quote user=\"John Smith\" page=3").unwrap();
        assert_eq!(spec.element_type, ElementType::Parameter);
        assert_eq!(
            spec.parameters.get("user").map(String::as_str),
            Some("John Smith")
        );
        assert_eq!(spec.parameters.get("page").map(String::as_str), Some("3"));
    }

    #[test]
    fn duplicate_key_keeps_first_position_last_value() {
        let spec = classify("tag a=1 b=2 a=3").unwrap();
        let pairs: Vec<_> = spec
            .parameters
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn tail_tokens_without_pair_are_ignored() {
        let spec = classify("quote junk user=John").unwrap();
        assert_eq!(spec.element_type, ElementType::Parameter);
        assert_eq!(spec.parameters.len(), 1);
    }

    #[test]
    fn tail_with_no_pair_at_all_is_simple() {
        let spec = classify("quote junk").unwrap();
        assert_eq!(spec.element_type, ElementType::Simple);
        assert_eq!(spec.name, "quote");
    }

    #[test]
    fn closing_tag() {
        let spec = classify("/quote").unwrap();
        assert_eq!(spec.element_type, ElementType::Closing);
        assert_eq!(spec.name, "quote");
    }

    #[test]
    fn closing_name_is_trimmed() {
        assert_eq!(classify("/ quote ").unwrap().name, "quote");
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(classify(""), Err(TagError::EmptyName));
        assert_eq!(classify("   "), Err(TagError::EmptyName));
        assert_eq!(classify("/"), Err(TagError::EmptyName));
        assert_eq!(classify("=value"), Err(TagError::EmptyName));
    }

    #[test]
    fn name_case_is_preserved() {
        assert_eq!(classify("QuOtE").unwrap().name, "QuOtE");
    }
}

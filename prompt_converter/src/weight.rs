//! Tokenization and emphasis-weight parsing.

use crate::tag::Tag;

/// Multiplier applied by each `{}` layer.
pub const EMPHASIS_BASE: f64 = 1.05;

/// Multiplier applied by each `[]` layer.
pub const DEEMPHASIS_BASE: f64 = 0.95;

/// Splits a comma-separated tag list into tokens.
///
/// Each piece is trimmed and empty pieces are skipped. Spaces inside a tag become
/// underscores and backslash escapes are removed.
///
/// # Examples
///
/// ```
/// use prompt_converter::tokenize;
///
/// let toks = tokenize("1girl,  long hair , ,foo \\(bar\\)");
/// assert_eq!(vec!["1girl", "long_hair", "foo_(bar)"], toks);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.replace(' ', "_").replace('\\', ""))
        .collect()
}

/// Returns the number of layers when `token` is wrapped in `open`/`close`, or
/// `None` when it is not wrapped or the head and tail counts differ.
fn nest_depth(token: &str, open: char, close: char) -> Option<usize> {
    if !token.starts_with(open) || !token.ends_with(close) {
        return None;
    }
    let head = token.chars().take_while(|&c| c == open).count();
    let tail = token.chars().rev().take_while(|&c| c == close).count();
    (head == tail).then_some(head)
}

/// Parses the emphasis syntax of a token.
///
/// Three syntaxes are recognized, in this order:
///
/// * `{{tag}}` - each layer multiplies the weight by 1.05.
/// * `[[tag]]` - each layer multiplies the weight by 0.95.
/// * `(tag:1.3)` - explicit weight. An unparsable weight becomes 1.0.
///
/// Anything else, including brackets whose head and tail counts differ, is kept as
/// is with weight 1.0.
///
/// # Arguments
///
/// * `token` - A token returned by [`tokenize`].
///
/// # Returns
///
/// A tag.
///
/// # Examples
///
/// ```
/// use prompt_converter::parse_weight;
///
/// let tag = parse_weight("(smile:1.2)");
/// assert_eq!("smile", tag.name);
/// assert_eq!(1.2, tag.weight);
/// ```
pub fn parse_weight(token: &str) -> Tag {
    if let Some(n) = nest_depth(token, '{', '}') {
        return Tag::with_weight(&token[n..token.len() - n], EMPHASIS_BASE.powi(n as i32));
    }
    if let Some(n) = nest_depth(token, '[', ']') {
        return Tag::with_weight(&token[n..token.len() - n], DEEMPHASIS_BASE.powi(n as i32));
    }
    if token.len() >= 2 && token.starts_with('(') && token.ends_with(')') {
        let inner = &token[1..token.len() - 1];
        if let Some((name, weight)) = inner.split_once(':') {
            return Tag::with_weight(name, weight.parse().unwrap_or(1.0));
        }
    }
    Tag::new(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" , ,,").is_empty());
    }

    #[test]
    fn test_tokenize_escapes() {
        assert_eq!(vec!["foo_(series)"], tokenize("foo \\(series\\)"));
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(Tag::new("1girl"), parse_weight("1girl"));
    }

    #[test]
    fn test_parse_curly() {
        let tag = parse_weight("{{{solo}}}");
        assert_eq!("solo", tag.name);
        assert!((tag.weight - 1.05f64.powi(3)).abs() < 1e-12);
    }

    #[test]
    fn test_parse_square() {
        let tag = parse_weight("[[smile]]");
        assert_eq!("smile", tag.name);
        assert!((tag.weight - 0.9025).abs() < 1e-12);
    }

    #[test]
    fn test_parse_explicit() {
        assert_eq!(Tag::with_weight("loli", 1.7), parse_weight("(loli:1.7)"));
        assert_eq!(Tag::with_weight("x", -0.5), parse_weight("(x:-0.5)"));
    }

    #[test]
    fn test_parse_explicit_malformed_weight() {
        assert_eq!(Tag::new("smile"), parse_weight("(smile:abc)"));
        assert_eq!(Tag::new("a"), parse_weight("(a:1.2:3)"));
    }

    #[test]
    fn test_parse_parenthesis_without_colon() {
        assert_eq!(Tag::new("(smile)"), parse_weight("(smile)"));
    }

    #[test]
    fn test_parse_mismatched() {
        assert_eq!(Tag::new("{{solo}"), parse_weight("{{solo}"));
        assert_eq!(Tag::new("[smile]]"), parse_weight("[smile]]"));
        assert_eq!(Tag::new("{solo"), parse_weight("{solo"));
    }

    #[test]
    fn test_parse_curly_precedes_square() {
        let tag = parse_weight("{[x]}");
        assert_eq!("[x]", tag.name);
        assert!((tag.weight - 1.05).abs() < 1e-12);
    }
}

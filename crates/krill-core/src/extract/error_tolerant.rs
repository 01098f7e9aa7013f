//! Error-tolerant scanning: decide whether a syntax error hides a call whose
//! argument list cannot be delimited.
//!
//! tree-sitter recovers from unbalanced parentheses and unterminated quotes,
//! so a broken `foo(` shows up as an ERROR or MISSING node rather than a
//! failed parse. Errors that leave every call delimited are tolerated.

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

use super::types::Level;

static LEVEL_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.\s*(debug|info|warning|error|critical)\s*\(").expect("valid level call regex")
});

/// A call that tree-sitter could not delimit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenCall {
    /// Callee name written before the parenthesis; empty when there is none.
    pub method: String,
    /// Byte offset of the opening parenthesis.
    pub paren_byte: usize,
}

/// Check if a node is inside an ERROR subtree.
pub fn is_in_error(node: &Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.is_error() {
            return true;
        }
        current = parent.parent();
    }
    false
}

/// Byte range of the full source lines spanned by `node`.
pub fn enclosing_lines(source: &str, node: &Node) -> std::ops::Range<usize> {
    let start = source[..node.start_byte()]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let end = source[node.end_byte()..]
        .find('\n')
        .map(|i| node.end_byte() + i)
        .unwrap_or(source.len());
    start..end
}

/// First `(` token in the file that no real `)` token closes.
///
/// Parentheses inside strings and comments are never tokens, and MISSING
/// `)` nodes inserted by recovery do not count as closers.
pub fn unclosed_paren(root: Node) -> Option<usize> {
    let mut open: Vec<usize> = Vec::new();
    let mut cursor = root.walk();

    'walk: loop {
        let node = cursor.node();
        if node.child_count() == 0 && !node.is_missing() {
            match node.kind() {
                "(" => open.push(node.start_byte()),
                ")" => {
                    open.pop();
                }
                _ => {}
            }
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }
    open.first().copied()
}

/// A MISSING string terminator inside an argument list: the call it sits
/// in has an unterminated quote.
pub fn unterminated_quote_call(missing: &Node, source: &str) -> Option<BrokenCall> {
    if !matches!(missing.kind(), "string_end" | "\"" | "'") {
        return None;
    }
    let mut current = missing.parent();
    while let Some(node) = current {
        if node.kind() == "argument_list" {
            let paren_byte = node.start_byte();
            return Some(BrokenCall {
                method: callee_name(source, paren_byte),
                paren_byte,
            });
        }
        current = node.parent();
    }
    None
}

/// Look for a level call on the lines around an ERROR node whose opening
/// parenthesis does not start a well-formed argument list. Matches inside
/// strings and comments are not calls.
pub fn broken_level_call(root: Node, error: &Node, source: &str) -> Option<BrokenCall> {
    let lines = enclosing_lines(source, error);
    let text = &source[lines.clone()];

    for caps in LEVEL_CALL.captures_iter(text) {
        let (Some(whole), Some(method)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if inside_string_or_comment(root, lines.start + whole.start()) {
            continue;
        }
        let paren_byte = lines.start + whole.end() - 1;
        if opens_clean_argument_list(root, paren_byte) {
            continue;
        }
        let level = Level::from_method(method.as_str())?;
        return Some(BrokenCall {
            method: level.as_str().to_string(),
            paren_byte,
        });
    }
    None
}

/// Identifier written immediately before `paren_byte`, e.g. `foo` for `foo (`.
pub fn callee_name(source: &str, paren_byte: usize) -> String {
    let before = source[..paren_byte.min(source.len())].trim_end();
    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)
        .unwrap_or(before.len());
    before[start..].to_string()
}

fn inside_string_or_comment(root: Node, byte: usize) -> bool {
    let mut current = root.descendant_for_byte_range(byte, byte + 1);
    while let Some(node) = current {
        if matches!(
            node.kind(),
            "string" | "string_start" | "string_content" | "string_end" | "comment"
        ) {
            return true;
        }
        current = node.parent();
    }
    false
}

fn opens_clean_argument_list(root: Node, paren_byte: usize) -> bool {
    let Some(token) = root.descendant_for_byte_range(paren_byte, paren_byte + 1) else {
        return false;
    };
    if token.kind() != "(" || token.start_byte() != paren_byte {
        return false;
    }
    match token.parent() {
        Some(args) => args.kind() == "argument_list" && !args.has_error(),
        None => false,
    }
}

/// 1-based (line, column) of a byte offset, for diagnostics.
pub fn line_column(source: &str, byte: usize) -> (u32, u32) {
    let before = &source[..byte.min(source.len())];
    let line = before.matches('\n').count() as u32 + 1;
    let column = before
        .rfind('\n')
        .map(|i| before[i + 1..].chars().count())
        .unwrap_or_else(|| before.chars().count()) as u32
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn line_column_is_one_based() {
        let src = "a = 1\nlogger.info(\n";
        assert_eq!(line_column(src, 0), (1, 1));
        assert_eq!(line_column(src, 6), (2, 1));
        assert_eq!(line_column(src, 17), (2, 12));
    }

    #[test]
    fn level_call_pattern() {
        assert!(LEVEL_CALL.is_match("log . warning ("));
        assert!(LEVEL_CALL.is_match("self.log.critical(x"));
        assert!(!LEVEL_CALL.is_match("info("));
        assert!(!LEVEL_CALL.is_match("logger.warn("));
    }

    #[test]
    fn callee_name_before_paren() {
        assert_eq!(callee_name("x = foo(", 7), "foo");
        assert_eq!(callee_name("handler (lambda", 8), "handler");
        assert_eq!(callee_name("log.info(", 8), "info");
        assert_eq!(callee_name("(1, 2", 0), "");
    }

    #[test]
    fn unclosed_paren_finds_first_open() {
        let src = "logger.info('a')\nfoo(\nlogger.debug('b')\n";
        let tree = parse(src);
        assert_eq!(unclosed_paren(tree.root_node()), Some(src.find("foo(").unwrap() + 3));
    }

    #[test]
    fn balanced_source_has_no_unclosed_paren() {
        let tree = parse("f(g(1), ')(')  # (\nx = = 2\n");
        assert_eq!(unclosed_paren(tree.root_node()), None);
    }
}

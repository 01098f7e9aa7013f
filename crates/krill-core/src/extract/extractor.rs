//! Logging call extraction using native tree-sitter.

use std::path::Path;
use std::time::Instant;

use tree_sitter::{Node, Parser, Tree, TreeCursor};

use super::error_tolerant::{self, BrokenCall};
use super::literal::{decode_concatenated, decode_string_literal};
use super::types::{CallSite, Level};
use crate::errors::ExtractionError;

/// Python parser specialised for logging calls.
pub struct LogCallExtractor {
    parser: Parser,
}

impl LogCallExtractor {
    /// Create a new extractor.
    pub fn new() -> Result<Self, ExtractionError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ExtractionError::TreeSitter {
                message: format!("Failed to set language: {}", e),
            })?;
        Ok(Self { parser })
    }

    /// Parse source text held in memory.
    pub fn scan(&mut self, source: impl Into<String>) -> Result<SourceScan, ExtractionError> {
        let start = Instant::now();
        let mut source = source.into();
        if source.starts_with('\u{feff}') {
            source.drain(..'\u{feff}'.len_utf8());
        }

        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| ExtractionError::TreeSitter {
                message: "Failed to parse source".to_string(),
            })?;

        tracing::debug!(
            bytes = source.len(),
            has_errors = tree.root_node().has_error(),
            parse_time_us = start.elapsed().as_micros() as u64,
            "parsed source"
        );
        Ok(SourceScan { source, tree })
    }

    /// Read and parse a source file.
    pub fn scan_file(&mut self, path: &Path) -> Result<SourceScan, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| ExtractionError::NotText {
            path: path.to_path_buf(),
        })?;
        tracing::debug!(path = %path.display(), "scanning source file");
        self.scan(text)
    }
}

/// A parsed source file. Owns the text and the syntax tree so call-site
/// iteration can be restarted any number of times.
pub struct SourceScan {
    source: String,
    tree: Tree,
}

impl SourceScan {
    /// Parse `source` with a throwaway extractor.
    pub fn parse(source: impl Into<String>) -> Result<Self, ExtractionError> {
        LogCallExtractor::new()?.scan(source)
    }

    /// Read and parse `path` with a throwaway extractor.
    pub fn from_path(path: &Path) -> Result<Self, ExtractionError> {
        LogCallExtractor::new()?.scan_file(path)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when tree-sitter had to recover from syntax errors somewhere.
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Logging calls in lexical order. The first extraction error is
    /// yielded once, after the calls that precede it, then iteration ends.
    pub fn call_sites(&self) -> CallSites<'_> {
        CallSites {
            scan: self,
            pending: None,
        }
    }

    /// Root key declared by a module-level `<variable> = "..."` assignment.
    /// When assigned more than once, the last assignment wins.
    pub fn declared_root_key(&self, variable: &str) -> Option<String> {
        let root = self.tree.root_node();
        let mut cursor = root.walk();
        let mut found = None;

        for statement in root.named_children(&mut cursor) {
            if statement.kind() != "expression_statement" {
                continue;
            }
            let Some(assignment) = statement.named_child(0) else {
                continue;
            };
            if assignment.kind() != "assignment" {
                continue;
            }
            let (Some(left), Some(right)) = (
                assignment.child_by_field_name("left"),
                assignment.child_by_field_name("right"),
            ) else {
                continue;
            };
            if left.kind() != "identifier" || self.text(&left) != variable {
                continue;
            }
            if let Some(value) = self.literal_value(&right) {
                found = Some(value);
            }
        }
        found
    }

    fn text(&self, node: &Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Value of a plain string literal or implicit concatenation of them.
    fn literal_value(&self, node: &Node) -> Option<String> {
        match node.kind() {
            "string" => decode_string_literal(self.text(node)),
            "concatenated_string" => {
                let mut cursor = node.walk();
                let parts: Vec<&str> = node
                    .named_children(&mut cursor)
                    .filter(|part| part.kind() == "string")
                    .map(|part| self.text(&part))
                    .collect();
                decode_concatenated(parts)
            }
            _ => None,
        }
    }

    /// Message text of a recognised call; `None` when there is no positional
    /// argument.
    fn message_text(&self, arguments: &Node) -> Option<String> {
        if arguments.kind() != "argument_list" {
            // `logger.info(x for x in xs)`: the generator is the argument.
            return Some(self.text(arguments).to_string());
        }
        let mut cursor = arguments.walk();
        let first = arguments.named_children(&mut cursor).find(|arg| {
            !matches!(
                arg.kind(),
                "keyword_argument" | "dictionary_splat" | "comment"
            )
        })?;
        Some(
            self.literal_value(&first)
                .unwrap_or_else(|| self.text(&first).to_string()),
        )
    }

    fn unbalanced(&self, broken: BrokenCall) -> ExtractionError {
        let (line, column) = error_tolerant::line_column(&self.source, broken.paren_byte);
        ExtractionError::UnbalancedCall {
            method: broken.method,
            line,
            column,
        }
    }

    /// Walk the whole tree once. Call sites are ordered by the position of
    /// their method name, which recovery can never reorder; when a call
    /// cannot be delimited, only the sites before it are kept and the
    /// error comes last.
    fn collect_call_sites(&self) -> Vec<Result<CallSite, ExtractionError>> {
        let root = self.tree.root_node();
        let mut found: Vec<FoundCall> = Vec::new();
        let mut broken: Option<BrokenCall> = None;

        if root.has_error() {
            if let Some(paren_byte) = error_tolerant::unclosed_paren(root) {
                broken = Some(BrokenCall {
                    method: error_tolerant::callee_name(&self.source, paren_byte),
                    paren_byte,
                });
            }
        }

        for node in PreOrder::new(root) {
            match self.visit(root, node) {
                None => {}
                Some(Ok(call)) => found.push(call),
                Some(Err(call)) => {
                    if broken.as_ref().map_or(true, |b| call.paren_byte < b.paren_byte) {
                        broken = Some(call);
                    }
                }
            }
        }

        found.sort_by_key(|call| call.order_byte);
        let cutoff = broken.as_ref().map(|b| b.paren_byte);
        let mut sites: Vec<Result<CallSite, ExtractionError>> = found
            .into_iter()
            .filter(|call| cutoff.map_or(true, |c| call.order_byte < c))
            .enumerate()
            .map(|(i, call)| {
                Ok(CallSite {
                    sequence_index: i as u32,
                    level: call.level,
                    message_text: call.message_text,
                    line: call.line,
                    column: call.column,
                })
            })
            .collect();
        if let Some(call) = broken {
            sites.push(Err(self.unbalanced(call)));
        }

        tracing::debug!(
            call_sites = sites.len(),
            has_errors = root.has_error(),
            "call sites collected"
        );
        sites
    }

    fn visit(&self, root: Node, node: Node) -> Option<Result<FoundCall, BrokenCall>> {
        if node.is_missing() {
            return error_tolerant::unterminated_quote_call(&node, &self.source).map(Err);
        }
        if node.is_error() {
            return error_tolerant::broken_level_call(root, &node, &self.source).map(Err);
        }

        if node.kind() != "call" {
            return None;
        }
        let function = node.child_by_field_name("function")?;
        if function.kind() != "attribute" {
            return None;
        }
        let method = function.child_by_field_name("attribute")?;
        let level = Level::from_method(self.text(&method))?;
        let arguments = node.child_by_field_name("arguments")?;
        if arguments.has_error() {
            return Some(Err(BrokenCall {
                method: level.as_str().to_string(),
                paren_byte: arguments.start_byte(),
            }));
        }
        let message_text = self.message_text(&arguments)?;
        if error_tolerant::is_in_error(&node) {
            tracing::debug!(
                line = node.start_position().row + 1,
                "logging call recovered from inside a syntax error"
            );
        }

        Some(Ok(FoundCall {
            order_byte: method.start_byte(),
            level,
            message_text,
            line: node.start_position().row as u32,
            column: node.start_position().column as u32,
        }))
    }
}

/// A recognised call before sequence numbering.
struct FoundCall {
    order_byte: usize,
    level: Level,
    message_text: String,
    line: u32,
    column: u32,
}

/// Pre-order traversal over every node of a tree.
struct PreOrder<'a> {
    cursor: TreeCursor<'a>,
    started: bool,
    done: bool,
}

impl<'a> PreOrder<'a> {
    fn new(root: Node<'a>) -> Self {
        Self {
            cursor: root.walk(),
            started: false,
            done: false,
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.cursor.node());
        }
        if self.cursor.goto_first_child() {
            return Some(self.cursor.node());
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return Some(self.cursor.node());
            }
            if !self.cursor.goto_parent() {
                self.done = true;
                return None;
            }
        }
    }
}

/// Logging calls of a [`SourceScan`] in source order. The tree is walked
/// on the first call to `next`, not when the iterator is created.
pub struct CallSites<'a> {
    scan: &'a SourceScan,
    pending: Option<std::vec::IntoIter<Result<CallSite, ExtractionError>>>,
}

impl Iterator for CallSites<'_> {
    type Item = Result<CallSite, ExtractionError>;

    fn next(&mut self) -> Option<Self::Item> {
        let scan = self.scan;
        self.pending
            .get_or_insert_with(|| scan.collect_call_sites().into_iter())
            .next()
    }
}

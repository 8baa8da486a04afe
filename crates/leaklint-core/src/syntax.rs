//! Go syntax trees and the generic syntax walker.
//!
//! [`SourceTree`] wraps a tree-sitter parse of one Go compilation unit. It is
//! immutable once built and borrowed read-only by every rule that inspects
//! the file.
//!
//! The walker is a pre-order, depth-first traversal over named nodes in
//! source order (left-to-right, outer-to-inner). Callers either steer it with
//! [`walk`] and a [`Visit`] decision, or use [`collect`] to turn a pure
//! classification callback into a vector of results.

use std::path::PathBuf;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::types::Location;

/// Errors produced while parsing Go source.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The Go grammar could not be loaded into the parser.
    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree.
    #[error("parser produced no syntax tree")]
    Aborted,

    /// The source contains syntax errors.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line of the first error node (1-indexed).
        line: usize,
        /// Column of the first error node (1-indexed).
        column: usize,
    },
}

/// Decision returned by a [`walk`] visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Continue into the node's children.
    Descend,
    /// Do not visit the node's children.
    Skip,
}

/// Immutable syntax tree for one Go source file.
pub struct SourceTree<'src> {
    tree: Tree,
    source: &'src str,
}

impl<'src> SourceTree<'src> {
    /// Parses Go source, rejecting trees that contain syntax errors.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] pointing at the first error node.
    pub fn parse(source: &'src str) -> Result<Self, ParseError> {
        let tree = Self::parse_lenient(source)?;
        let root = tree.root();
        if root.has_error() {
            let (line, column) = first_error(root).map_or((1, 1), |n| {
                let p = n.start_position();
                (p.row + 1, p.column + 1)
            });
            return Err(ParseError::Syntax { line, column });
        }
        Ok(tree)
    }

    /// Parses Go source, keeping error nodes in the tree.
    ///
    /// # Errors
    ///
    /// Returns an error only if the grammar cannot be loaded.
    pub fn parse_lenient(source: &'src str) -> Result<Self, ParseError> {
        let language: Language = tree_sitter_go::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let tree = parser.parse(source, None).ok_or(ParseError::Aborted)?;
        Ok(Self { tree, source })
    }

    /// Root node (`source_file`).
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Full source text.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Source text covered by `node`.
    #[must_use]
    pub fn text(&self, node: Node<'_>) -> &'src str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Location of `node` in `file`.
    #[must_use]
    pub fn location(&self, file: PathBuf, node: Node<'_>) -> Location {
        Location::from_node(file, node)
    }

    /// Name from the `package` clause, if any.
    #[must_use]
    pub fn package_name(&self) -> Option<&'src str> {
        let root = self.root();
        let mut cursor = root.walk();
        let clause = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_clause")?;
        let mut inner = clause.walk();
        let name = clause
            .named_children(&mut inner)
            .find(|n| n.kind() == "package_identifier")?;
        Some(self.text(name))
    }
}

impl std::fmt::Debug for SourceTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceTree")
            .field("root", &self.root().kind())
            .field("bytes", &self.source.len())
            .finish()
    }
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut found = None;
    walk(root, |node| {
        if found.is_some() {
            return Visit::Skip;
        }
        if node.is_error() || node.is_missing() {
            found = Some(node);
            return Visit::Skip;
        }
        if node.has_error() {
            Visit::Descend
        } else {
            Visit::Skip
        }
    });
    found
}

/// Pre-order traversal of the named nodes under (and including) `root`.
///
/// The visitor runs once per named node, in source order. Returning
/// [`Visit::Skip`] prunes that node's subtree.
pub fn walk<'t, F>(root: Node<'t>, mut visit: F)
where
    F: FnMut(Node<'t>) -> Visit,
{
    let mut cursor = root.walk();
    'outer: loop {
        let node = cursor.node();
        let decision = if node.is_named() {
            visit(node)
        } else {
            Visit::Skip
        };
        if decision == Visit::Descend && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                continue 'outer;
            }
            if !cursor.goto_parent() {
                break 'outer;
            }
        }
    }
}

/// Collects every non-`None` classification of the nodes under `root`.
///
/// Results come back in source order; the callback sees every named node.
pub fn collect<'t, T, F>(root: Node<'t>, mut classify: F) -> Vec<T>
where
    F: FnMut(Node<'t>) -> Option<T>,
{
    let mut out = Vec::new();
    walk(root, |node| {
        if let Some(item) = classify(node) {
            out.push(item);
        }
        Visit::Descend
    });
    out
}

/// First named child of `node` that is not a comment, if any.
#[must_use]
pub fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let child = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    child
}

/// A call of the shape `qualifier.Method(...)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorCall<'src> {
    /// Source text of the operand (`os`, `f`, `resp.Body`).
    pub qualifier: &'src str,
    /// The selected method name.
    pub method: &'src str,
    /// Whether the operand is a bare identifier.
    pub qualifier_is_ident: bool,
}

/// Decomposes a `call_expression` whose callee is a selector.
///
/// Bare calls (`open(x)`), calls through index expressions and other shapes
/// return `None`.
#[must_use]
pub fn selector_call<'src>(tree: &SourceTree<'src>, call: Node<'_>) -> Option<SelectorCall<'src>> {
    if call.kind() != "call_expression" {
        return None;
    }
    let function = call.child_by_field_name("function")?;
    if function.kind() != "selector_expression" {
        return None;
    }
    let operand = function.child_by_field_name("operand")?;
    let field = function.child_by_field_name("field")?;
    Some(SelectorCall {
        qualifier: tree.text(operand),
        method: tree.text(field),
        qualifier_is_ident: operand.kind() == "identifier",
    })
}

/// One `import` spec.
#[derive(Debug, Clone, Copy)]
pub struct ImportSpec<'t, 'src> {
    /// Explicit local name (`mylog "..."`), if any.
    pub name: Option<&'src str>,
    /// Import path without quotes.
    pub path: &'src str,
    /// The `import_spec` node.
    pub node: Node<'t>,
}

impl<'src> ImportSpec<'_, 'src> {
    /// Name the package is referenced by in this file.
    ///
    /// That is the explicit alias, or the last path segment.
    #[must_use]
    pub fn local_name(&self) -> &'src str {
        self.name
            .unwrap_or_else(|| self.path.rsplit('/').next().unwrap_or(self.path))
    }
}

/// All import specs of the file, in source order.
#[must_use]
pub fn import_specs<'t, 'src>(tree: &'t SourceTree<'src>) -> Vec<ImportSpec<'t, 'src>> {
    let mut specs = Vec::new();
    walk(tree.root(), |node| match node.kind() {
        "source_file" | "import_declaration" | "import_spec_list" => Visit::Descend,
        "import_spec" => {
            let name = node.child_by_field_name("name").map(|n| tree.text(n));
            if let Some(path) = node.child_by_field_name("path") {
                specs.push(ImportSpec {
                    name,
                    path: unquote(tree.text(path)),
                    node,
                });
            }
            Visit::Skip
        }
        _ => Visit::Skip,
    });
    specs
}

fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .unwrap_or(literal)
}

/// Collapses whitespace runs (including newlines) into single spaces.
#[must_use]
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

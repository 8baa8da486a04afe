//! Release reachability within one function scope.
//!
//! A scope is a function or method declaration together with every function
//! literal nested inside it. Acquisition sites and release calls are gathered
//! in a single pre-order pass, so both lists are in source order.
//!
//! A release covers a site when it starts after the site's statement and
//! before the next site that rebinds the same variable. Releases are not
//! matched to a receiver: any closer call inside that window counts, whether
//! deferred or direct, and direct calls are not checked for reachability on
//! every path.

use leaklint_core::syntax::{first_named_child, selector_call, walk};
use leaklint_core::{SourceTree, Visit};
use tree_sitter::Node;

use super::opener::{classify_assignment, is_assignment, AcquisitionSite};
use super::patterns::PatternTables;

/// How a release call is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    /// `defer x.Close()`.
    Deferred,
    /// `x.Close()` as a plain statement.
    Direct,
}

/// A closer call found in a scope.
#[derive(Debug, Clone, Copy)]
pub struct Release<'t> {
    /// The `defer_statement` or the call itself.
    pub node: Node<'t>,
    /// Deferred or direct.
    pub kind: ReleaseKind,
}

impl Release<'_> {
    /// Byte offset used for ordering against sites.
    #[must_use]
    pub fn position(&self) -> usize {
        self.node.start_byte()
    }
}

/// Sites and releases of one function declaration.
#[derive(Debug)]
pub struct FunctionScope<'t> {
    /// The `function_declaration` or `method_declaration` node.
    pub node: Node<'t>,
    /// Acquisition sites in source order.
    pub sites: Vec<AcquisitionSite<'t>>,
    /// Release calls in source order.
    pub releases: Vec<Release<'t>>,
}

/// Every top-level function and method declaration of the file.
#[must_use]
pub fn function_declarations<'t>(tree: &'t SourceTree<'_>) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    walk(tree.root(), |node| match node.kind() {
        "function_declaration" | "method_declaration" => {
            out.push(node);
            Visit::Skip
        }
        "source_file" => Visit::Descend,
        _ => Visit::Skip,
    });
    out
}

impl<'t> FunctionScope<'t> {
    /// Gathers sites and releases under `node`.
    #[must_use]
    pub fn build(tree: &'t SourceTree<'_>, node: Node<'t>, tables: &PatternTables) -> Self {
        let mut sites = Vec::new();
        let mut releases = Vec::new();

        walk(node, |n| {
            let kind = n.kind();
            if is_assignment(kind) {
                sites.extend(classify_assignment(tree, n, tables));
            } else if let Some(release) = release_at(tree, n, tables) {
                releases.push(release);
            }
            Visit::Descend
        });

        Self {
            node,
            sites,
            releases,
        }
    }

    /// Whether the site at `index` has a release inside its window.
    #[must_use]
    pub fn has_guaranteed_release(&self, index: usize) -> bool {
        self.covering_release(index).is_some()
    }

    /// First release inside the window of the site at `index`.
    #[must_use]
    pub fn covering_release(&self, index: usize) -> Option<&Release<'t>> {
        let site = self.sites.get(index)?;
        let start = site.start();
        let end = self.window_end(index);

        self.releases
            .iter()
            .find(|r| r.position() > start && end.map_or(true, |end| r.position() < end))
    }

    /// Sites without a covering release, in source order.
    pub fn unreleased(&self) -> impl Iterator<Item = &AcquisitionSite<'t>> + '_ {
        self.sites
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.has_guaranteed_release(*index))
            .map(|(_, site)| site)
    }

    /// Start of the next site that rebinds the same variable.
    fn window_end(&self, index: usize) -> Option<usize> {
        let site = &self.sites[index];
        let binding = site.binding?;
        self.sites[index + 1..]
            .iter()
            .find(|later| later.start() > site.start() && later.binding == Some(binding))
            .map(AcquisitionSite::start)
    }
}

fn release_at<'t>(
    tree: &SourceTree<'_>,
    node: Node<'t>,
    tables: &PatternTables,
) -> Option<Release<'t>> {
    let kind = match node.kind() {
        "defer_statement" => ReleaseKind::Deferred,
        "expression_statement" => ReleaseKind::Direct,
        _ => return None,
    };

    let call = first_named_child(node)?;
    let selector = selector_call(tree, call)?;
    if !tables.is_closer(&selector) {
        return None;
    }

    let node = match kind {
        ReleaseKind::Deferred => node,
        ReleaseKind::Direct => call,
    };
    Some(Release { node, kind })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_of<'t>(tree: &'t SourceTree<'_>) -> FunctionScope<'t> {
        let decls = function_declarations(tree);
        assert_eq!(decls.len(), 1, "fixture must hold one function");
        FunctionScope::build(tree, decls[0], &PatternTables::new())
    }

    fn unreleased_lines(src: &str) -> Vec<usize> {
        let tree = SourceTree::parse(src).unwrap();
        let scope = scope_of(&tree);
        scope
            .unreleased()
            .map(|s| s.statement.start_position().row + 1)
            .collect()
    }

    #[test]
    fn deferred_close_covers_site() {
        let src = r#"package p

func read() {
	f, err := os.Open("a.txt")
	if err != nil {
		return
	}
	defer f.Close()
}
"#;
        let tree = SourceTree::parse(src).unwrap();
        let scope = scope_of(&tree);
        assert_eq!(scope.sites.len(), 1);
        assert_eq!(
            scope.covering_release(0).map(|r| r.kind),
            Some(ReleaseKind::Deferred)
        );
    }

    #[test]
    fn missing_release_is_reported() {
        let src = r#"package p

func read() {
	f, err := os.Open("a.txt")
	_, _ = f, err
}
"#;
        assert_eq!(unreleased_lines(src), vec![4]);
    }

    #[test]
    fn commented_defer_still_releases() {
        let src = r#"package p

func read() {
	f, _ := os.Open("a.txt")
	defer /* always */ f.Close()
}
"#;
        assert!(unreleased_lines(src).is_empty());
    }

    #[test]
    fn later_direct_close_is_accepted() {
        let src = r#"package p

func send() {
	conn, err := net.Dial("tcp", "localhost:80")
	if err != nil {
		return
	}
	conn.Write(nil)
	conn.Close()
}
"#;
        let tree = SourceTree::parse(src).unwrap();
        let scope = scope_of(&tree);
        assert_eq!(
            scope.covering_release(0).map(|r| r.kind),
            Some(ReleaseKind::Direct)
        );
    }

    #[test]
    fn release_before_acquisition_does_not_count() {
        let src = r#"package p

func f() {
	old.Close()
	g, _ := os.Create("b")
	_ = g
}
"#;
        assert_eq!(unreleased_lines(src), vec![5]);
    }

    #[test]
    fn closure_acquisition_released_by_outer_defer() {
        let src = r#"package p

func f() {
	var file *os.File
	open := func() {
		file, _ = os.Open("a")
	}
	open()
	defer file.Close()
}
"#;
        assert!(unreleased_lines(src).is_empty());
    }

    #[test]
    fn close_inside_deferred_literal_counts() {
        let src = r#"package p

func f() {
	f, _ := os.Open("a")
	defer func() {
		f.Close()
	}()
}
"#;
        assert!(unreleased_lines(src).is_empty());
    }

    #[test]
    fn rebinding_reports_first_acquisition() {
        let src = r#"package p

func f() {
	f, _ := os.Open("a")
	f, _ = os.Open("b")
	defer f.Close()
}
"#;
        assert_eq!(unreleased_lines(src), vec![4]);
    }

    #[test]
    fn window_only_ends_at_same_binding() {
        let src = r#"package p

func f() {
	a, _ := os.Open("a")
	b, _ := os.Open("b")
	defer a.Close()
}
"#;
        // The single defer lies in both windows; releases are not matched to receivers.
        assert!(unreleased_lines(src).is_empty());
    }

    #[test]
    fn if_initializer_released_in_branch() {
        let src = r#"package p

func f() {
	if f, err := os.Open("a"); err == nil {
		defer f.Close()
	} else {
		return
	}
}
"#;
        assert!(unreleased_lines(src).is_empty());
    }

    #[test]
    fn only_top_level_declarations_are_scopes() {
        let src = r#"package p

var h = func() { x, _ := os.Open("a"); _ = x }

func a() {}

func (s *S) b() {}
"#;
        let tree = SourceTree::parse(src).unwrap();
        let kinds: Vec<_> = function_declarations(&tree)
            .iter()
            .map(|n| n.kind())
            .collect();
        assert_eq!(kinds, vec!["function_declaration", "method_declaration"]);
    }
}

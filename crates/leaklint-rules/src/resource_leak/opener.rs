//! Opener detection on assignment statements.

use leaklint_core::syntax::selector_call;
use leaklint_core::SourceTree;
use tree_sitter::Node;

use super::patterns::{OpenerMatch, PatternTables};

/// One matched opener call and the statement that produced it.
#[derive(Debug, Clone, Copy)]
pub struct AcquisitionSite<'t> {
    /// The assignment (or `var` spec) holding the call.
    pub statement: Node<'t>,
    /// The opener `call_expression`.
    pub call: Node<'t>,
    /// Variable the resource is bound to; `None` for `_` or no left side.
    pub binding: Option<&'t str>,
    /// Qualifier text of the call (`os`, `db`).
    pub qualifier: &'t str,
    /// Method name of the call.
    pub method: &'t str,
    /// Which table tier matched.
    pub matched: OpenerMatch,
}

impl AcquisitionSite<'_> {
    /// Byte offset of the acquiring statement.
    #[must_use]
    pub fn start(&self) -> usize {
        self.statement.start_byte()
    }
}

/// Whether `kind` is an assignment form that can acquire a resource.
#[must_use]
pub fn is_assignment(kind: &str) -> bool {
    matches!(
        kind,
        "short_var_declaration" | "assignment_statement" | "var_spec"
    )
}

/// Classifies every right-hand call of an assignment.
///
/// Each right-hand expression is tested on its own, so `a, b := x.Open(), y.Dial()`
/// yields two sites. Anything that is not a `qualifier.Method(...)` call is
/// not an opener.
#[must_use]
pub fn classify_assignment<'t>(
    tree: &'t SourceTree<'_>,
    statement: Node<'t>,
    tables: &PatternTables,
) -> Vec<AcquisitionSite<'t>> {
    let Some((lhs, rhs)) = operands(statement) else {
        return Vec::new();
    };

    rhs.iter()
        .enumerate()
        .filter_map(|(index, &expr)| {
            let call = selector_call(tree, expr)?;
            let matched = tables.classify(&call)?;

            let bound = if lhs.len() == rhs.len() {
                lhs.get(index)
            } else {
                lhs.first()
            };
            let binding = bound.map(|n| tree.text(*n)).filter(|name| *name != "_");

            Some(AcquisitionSite {
                statement,
                call: expr,
                binding,
                qualifier: call.qualifier,
                method: call.method,
                matched,
            })
        })
        .collect()
}

/// Left and right operand lists of an assignment form.
fn operands(statement: Node<'_>) -> Option<(Vec<Node<'_>>, Vec<Node<'_>>)> {
    match statement.kind() {
        "short_var_declaration" | "assignment_statement" => {
            let left = statement.child_by_field_name("left")?;
            let right = statement.child_by_field_name("right")?;
            Some((expressions(left), expressions(right)))
        }
        "var_spec" => {
            let value = statement.child_by_field_name("value")?;
            let mut cursor = statement.walk();
            let names = statement
                .children_by_field_name("name", &mut cursor)
                .collect();
            Some((names, expressions(value)))
        }
        _ => None,
    }
}

fn expressions(list: Node<'_>) -> Vec<Node<'_>> {
    if list.kind() != "expression_list" {
        return vec![list];
    }
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaklint_core::syntax::collect;

    fn sites(src: &str) -> Vec<(String, Option<String>, OpenerMatch)> {
        let tree = SourceTree::parse(src).unwrap();
        let tables = PatternTables::new();
        let found: Vec<AcquisitionSite<'_>> = collect(tree.root(), |node| {
            is_assignment(node.kind()).then(|| classify_assignment(&tree, node, &tables))
        })
        .into_iter()
        .flatten()
        .collect();
        found
            .iter()
            .map(|s| {
                (
                    format!("{}.{}", s.qualifier, s.method),
                    s.binding.map(str::to_string),
                    s.matched,
                )
            })
            .collect()
    }

    #[test]
    fn short_var_declaration_binds_first_operand() {
        let found = sites("package p\nfunc f() {\n\tf, err := os.Open(\"x\")\n\t_ = err\n}\n");
        assert_eq!(
            found,
            vec![("os.Open".into(), Some("f".into()), OpenerMatch::Known)]
        );
    }

    #[test]
    fn multi_value_assignment_yields_one_site_per_call() {
        let found = sites(
            "package p\nfunc f() {\n\ta, b := os.Create(\"a\"), net.Listen(\"tcp\", \":0\")\n\t_, _ = a, b\n}\n",
        );
        assert_eq!(
            found,
            vec![
                ("os.Create".into(), Some("a".into()), OpenerMatch::Known),
                ("net.Listen".into(), Some("b".into()), OpenerMatch::Known),
            ]
        );
    }

    #[test]
    fn blank_identifier_is_not_a_binding() {
        let found = sites("package p\nfunc f() {\n\t_, _ = os.Open(\"x\")\n}\n");
        assert_eq!(found, vec![("os.Open".into(), None, OpenerMatch::Known)]);
    }

    #[test]
    fn plain_assignment_and_var_spec_are_classified() {
        let found = sites(
            "package p\nfunc f() {\n\tvar db, err = sql.Open(\"pg\", dsn)\n\tconn, err = net.Dial(\"tcp\", addr)\n}\n",
        );
        assert_eq!(
            found,
            vec![
                ("sql.Open".into(), Some("db".into()), OpenerMatch::Known),
                ("net.Dial".into(), Some("conn".into()), OpenerMatch::Known),
            ]
        );
    }

    #[test]
    fn bare_calls_and_non_openers_are_ignored() {
        let found = sites(
            "package p\nfunc f() {\n\tx := open(\"a\")\n\ty := strings.Split(s, \",\")\n\t_, _ = x, y\n}\n",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn generic_fallback_is_tagged() {
        let found = sites("package p\nfunc f() {\n\tspan := tracer.StartSpan(\"op\")\n\t_ = span\n}\n");
        assert_eq!(
            found,
            vec![(
                "tracer.StartSpan".into(),
                Some("span".into()),
                OpenerMatch::Generic
            )]
        );
    }
}

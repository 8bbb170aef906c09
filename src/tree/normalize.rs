//! Wrapper folding
//!
//! Depth is only meaningful once no-op wrappers are gone, otherwise the
//! deepest node would be whatever sits under the most parentheses. A folded
//! node keeps the outermost wrapper's span, so its text evaluates to the
//! same value it did before folding.

use crate::parser::ast::{BinOp, Expr, ExprKind, Property, Span, UnOp};

/// A node whose children are being normalized, with what is needed to
/// rebuild it once they are done
enum Shell {
    /// Paren, one-element array or one-statement program: folds to its child
    Wrap,
    Program,
    Unary(UnOp),
    Binary(BinOp),
    Array,
    /// `computed` flag of each property, in order
    Object(Vec<bool>),
    Member(bool),
    Call,
    Group,
}

enum Task {
    Visit(Expr),
    Build(Shell, Span, usize),
}

/// Fold wrapper nodes top-down until none are left.
///
/// - `( e )` and single-pair bracket wraps become `e`
/// - `[e]` becomes `e`, as does a program with one statement
/// - a chain of prefix unary operators keeps only the outermost operator,
///   applied to the innermost non-unary operand
///
/// The result is a fixed point: normalizing it again changes nothing. Work
/// is kept on a heap stack, so nesting depth is bounded by memory only.
pub fn normalize(expr: Expr) -> Expr {
    let mut tasks = vec![Task::Visit(expr)];
    let mut done: Vec<Expr> = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Visit(expr) => {
                let span = expr.span;
                match split(expr.into_kind()) {
                    Ok((shell, children)) => {
                        tasks.push(Task::Build(shell, span, children.len()));
                        tasks.extend(children.into_iter().rev().map(Task::Visit));
                    }
                    Err(leaf) => done.push(Expr::new(leaf, span)),
                }
            }
            Task::Build(shell, span, count) => {
                let children = done.split_off(done.len() - count);
                done.push(assemble(shell, span, children));
            }
        }
    }

    // Each visit leaves exactly one expression behind
    done.pop().unwrap_or_default()
}

/// Separate a node from its children; leaves come back as `Err`
fn split(kind: ExprKind) -> Result<(Shell, Vec<Expr>), ExprKind> {
    let parts = match kind {
        ExprKind::Paren(inner) => (Shell::Wrap, vec![*inner]),
        ExprKind::Array(items) | ExprKind::Program(items) if items.len() == 1 => {
            (Shell::Wrap, items)
        }
        ExprKind::Program(items) => (Shell::Program, items),
        ExprKind::Array(items) => (Shell::Array, items),
        ExprKind::Group(items) => (Shell::Group, items),
        ExprKind::Unary { op, operand } => (Shell::Unary(op), vec![*operand]),
        ExprKind::Binary { op, left, right } => (Shell::Binary(op), vec![*left, *right]),
        ExprKind::Object(props) => {
            let computed = props.iter().map(|p| p.computed).collect();
            let children = props.into_iter().flat_map(|p| [p.key, p.value]).collect();
            (Shell::Object(computed), children)
        }
        ExprKind::Member {
            object,
            property,
            computed,
        } => (Shell::Member(computed), vec![*object, *property]),
        ExprKind::Call { callee, args } => {
            let mut children = Vec::with_capacity(args.len() + 1);
            children.push(*callee);
            children.extend(args);
            (Shell::Call, children)
        }
        leaf @ (ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Ident(_)) => return Err(leaf),
    };
    Ok(parts)
}

/// Rebuild a node from its normalized children
fn assemble(shell: Shell, span: Span, children: Vec<Expr>) -> Expr {
    let mut children = children.into_iter();

    let kind = match shell {
        Shell::Wrap => return respan(next(&mut children), span),
        Shell::Unary(op) => {
            let operand = next(&mut children);
            let operand_span = operand.span;
            let operand = match operand.into_kind() {
                ExprKind::Unary { operand, .. } => operand,
                other => Box::new(Expr::new(other, operand_span)),
            };
            ExprKind::Unary { op, operand }
        }
        Shell::Binary(op) => {
            let left = Box::new(next(&mut children));
            let right = Box::new(next(&mut children));
            ExprKind::Binary { op, left, right }
        }
        Shell::Member(computed) => {
            let object = Box::new(next(&mut children));
            let property = Box::new(next(&mut children));
            ExprKind::Member {
                object,
                property,
                computed,
            }
        }
        Shell::Call => {
            let callee = Box::new(next(&mut children));
            ExprKind::Call {
                callee,
                args: children.collect(),
            }
        }
        Shell::Program => ExprKind::Program(children.collect()),
        Shell::Array => ExprKind::Array(children.collect()),
        Shell::Group => ExprKind::Group(children.collect()),
        Shell::Object(computed) => {
            let mut props = Vec::with_capacity(computed.len());
            for computed in computed {
                let key = next(&mut children);
                let value = next(&mut children);
                props.push(Property {
                    key,
                    value,
                    computed,
                });
            }
            ExprKind::Object(props)
        }
    };
    Expr::new(kind, span)
}

fn next(children: &mut std::vec::IntoIter<Expr>) -> Expr {
    children.next().unwrap_or_default()
}

fn respan(mut expr: Expr, span: Span) -> Expr {
    expr.span = span;
    expr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::brackets::{parse_brackets, Delimiter};
    use crate::parser::parse::Parser;

    fn parse_raw(source: &str) -> Expr {
        Parser::new(source).unwrap().parse_program().unwrap()
    }

    #[test]
    fn test_paren_chain_folds_to_one_node() {
        let expr = normalize(parse_raw("(((1+2)))"));

        assert_eq!(expr.span, Span::new(0, 9));
        match expr.into_kind() {
            ExprKind::Binary { op, left, .. } => {
                assert_eq!(op, BinOp::Add);
                assert!(matches!(left.kind, ExprKind::Number(n) if n == 1.0));
            }
            other => panic!("Expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_single_element_array_folds() {
        let expr = normalize(parse_raw("[[[+[]]]]"));

        assert_eq!(expr.span, Span::new(0, 9));
        assert!(matches!(expr.kind, ExprKind::Unary { op: UnOp::Plus, .. }));
    }

    #[test]
    fn test_empty_and_multi_arrays_kept() {
        let expr = normalize(parse_raw("[[], [1, 2]]"));

        match expr.into_kind() {
            ExprKind::Array(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(&items[0].kind, ExprKind::Array(v) if v.is_empty()));
                assert!(matches!(&items[1].kind, ExprKind::Array(v) if v.len() == 2));
            }
            other => panic!("Expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_chain_collapses() {
        let expr = normalize(parse_raw("+!+[]"));

        assert_eq!(expr.span, Span::new(0, 5));
        match expr.into_kind() {
            ExprKind::Unary { op, operand } => {
                assert_eq!(op, UnOp::Plus);
                assert_eq!(operand.span, Span::new(3, 5));
                assert!(matches!(operand.kind, ExprKind::Array(ref v) if v.is_empty()));
            }
            other => panic!("Expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_through_parens() {
        let expr = normalize(parse_raw("!(+[])"));

        match expr.into_kind() {
            ExprKind::Unary { op, operand } => {
                assert_eq!(op, UnOp::Not);
                assert!(matches!(operand.kind, ExprKind::Array(_)));
            }
            other => panic!("Expected unary, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_statement_program_kept() {
        let expr = normalize(parse_raw("(1);[2]"));

        match expr.into_kind() {
            ExprKind::Program(items) => {
                assert!(matches!(items[0].kind, ExprKind::Number(_)));
                assert_eq!(items[0].span, Span::new(0, 3));
                assert!(matches!(items[1].kind, ExprKind::Number(_)));
            }
            other => panic!("Expected program, got {:?}", other),
        }
    }

    #[test]
    fn test_bracket_wrap_folds() {
        let expr = normalize(parse_brackets("(((a)(b)))", Delimiter::Paren).unwrap());

        assert_eq!(expr.span, Span::new(0, 10));
        assert!(matches!(expr.kind, ExprKind::Group(ref c) if c.len() == 2));
    }

    #[test]
    fn test_long_chain_normalizes_without_recursion() {
        let source = vec!["!(+[])"; 20_000].join("+");
        let expr = normalize(parse_raw(&source));

        assert_eq!(expr.span, Span::new(0, source.len()));
        let mut node = &expr;
        let mut terms = 1;
        while let ExprKind::Binary { left, right, .. } = &node.kind {
            assert!(matches!(&right.kind, ExprKind::Unary { operand, .. }
                if matches!(operand.kind, ExprKind::Array(_))));
            node = left.as_ref();
            terms += 1;
        }
        assert_eq!(terms, 20_000);
    }

    #[test]
    fn test_deep_bracket_nesting_folds() {
        let depth = 50_000;
        let source = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        let expr = normalize(parse_brackets(&source, Delimiter::Paren).unwrap());

        assert_eq!(expr.span, Span::new(0, source.len()));
        assert!(matches!(expr.kind, ExprKind::Group(ref c) if c.is_empty()));
    }

    #[test]
    fn test_idempotent() {
        for source in ["((1+2)*(3+4))", "[][(![]+[])[+[]]]", "+!+[]+[+[]]", "({a: [[1]]})"] {
            let once = normalize(parse_raw(source));
            assert_eq!(normalize(once.clone()), once, "{}", source);
        }
    }
}

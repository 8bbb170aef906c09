//! Expression tree arena
//!
//! A normalized [`Expr`] is laid out once into a flat `Vec<Node>`; nodes
//! refer to each other through [`NodeId`] indices, so the parent link is a
//! plain back-reference with no ownership. The tree is immutable after
//! construction and is shared between sessions through `Rc<Tree>`.
//!
//! - [`normalize`]: wrapper folding applied before layout
//! - [`locate`]: deepest-node search
//! - [`branches`]: the lazy branch sequence

pub mod branches;
pub mod locate;
pub mod normalize;

use crate::parser::ast::{BinOp, Expr, ExprKind, Span, UnOp};
use std::fmt;

/// Index of a node inside its [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Syntactic category of a node, kept for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    Unary(UnOp),
    Binary(BinOp),
    Array,
    Object,
    Member,
    Call,
    Literal,
    Identifier,
    Group,
}

impl NodeKind {
    fn of(mut expr: &Expr) -> NodeKind {
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner.as_ref();
        }
        match &expr.kind {
            ExprKind::Program(_) => NodeKind::Program,
            ExprKind::Paren(_) => NodeKind::Group,
            ExprKind::Unary { op, .. } => NodeKind::Unary(*op),
            ExprKind::Binary { op, .. } => NodeKind::Binary(*op),
            ExprKind::Array(_) => NodeKind::Array,
            ExprKind::Object(_) => NodeKind::Object,
            ExprKind::Member { .. } => NodeKind::Member,
            ExprKind::Call { .. } => NodeKind::Call,
            ExprKind::Number(_) | ExprKind::Str(_) => NodeKind::Literal,
            ExprKind::Ident(_) => NodeKind::Identifier,
            ExprKind::Group(_) => NodeKind::Group,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Program => write!(f, "program"),
            NodeKind::Unary(op) => write!(f, "unary {}", op.symbol()),
            NodeKind::Binary(op) => write!(f, "binary {}", op.symbol()),
            NodeKind::Array => write!(f, "array"),
            NodeKind::Object => write!(f, "object"),
            NodeKind::Member => write!(f, "member"),
            NodeKind::Call => write!(f, "call"),
            NodeKind::Literal => write!(f, "literal"),
            NodeKind::Identifier => write!(f, "identifier"),
            NodeKind::Group => write!(f, "group"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub span: Span,
    pub parent: Option<NodeId>,
    /// Span-ascending, non-overlapping
    pub children: Vec<NodeId>,
    /// Distance from the root
    pub depth: usize,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Immutable node arena together with the source text it spans
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    source: String,
    nodes: Vec<Node>,
}

impl Tree {
    /// Lay `expr` out in pre-order, so the root is always `NodeId(0)` and
    /// ascending ids are a left-to-right pre-order walk.
    pub fn from_expr(source: &str, expr: &Expr) -> Tree {
        let mut nodes: Vec<Node> = Vec::new();
        let mut pending: Vec<(&Expr, Option<NodeId>)> = vec![(expr, None)];

        while let Some((expr, parent)) = pending.pop() {
            let id = NodeId(nodes.len());
            let depth = match parent {
                Some(parent) => {
                    let parent_node = &mut nodes[parent.0];
                    parent_node.children.push(id);
                    parent_node.depth + 1
                }
                None => 0,
            };

            nodes.push(Node {
                span: expr.span,
                parent,
                children: Vec::new(),
                depth,
                kind: NodeKind::of(expr),
            });

            // Reversed so the leftmost child is popped (and numbered) first
            for child in expr.children().into_iter().rev() {
                pending.push((child, Some(id)));
            }
        }

        Tree {
            source: source.to_string(),
            nodes,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `id`
    pub fn text(&self, id: NodeId) -> &str {
        self.node(id).span.text(&self.source)
    }

    /// All node ids in left-to-right pre-order
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Ids of `id`'s ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).parent, move |p| self.node(*p).parent)
    }

    /// Whether `ancestor` lies strictly above `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Strategy};

    #[test]
    fn test_layout_is_preorder() {
        let tree = parse("[1+2, [3, 4]]", Strategy::Grammar).unwrap();
        let texts: Vec<&str> = tree.preorder().map(|id| tree.text(id)).collect();

        assert_eq!(texts, vec!["[1+2, [3, 4]]", "1+2", "1", "2", "[3, 4]", "3", "4"]);
    }

    #[test]
    fn test_parent_and_depth() {
        let tree = parse("(1+2)*3", Strategy::Grammar).unwrap();
        let root = tree.root();
        let left = tree.node(root).children[0];
        let one = tree.node(left).children[0];

        assert_eq!(tree.node(root).parent, None);
        assert_eq!(tree.node(root).depth, 0);
        assert_eq!(tree.node(left).parent, Some(root));
        assert_eq!(tree.node(one).depth, 2);
        assert_eq!(tree.ancestors(one).collect::<Vec<_>>(), vec![left, root]);
        assert!(tree.is_ancestor(root, one));
        assert!(!tree.is_ancestor(one, root));
    }

    #[test]
    fn test_children_inside_parent_span() {
        let tree = parse("[][(![]+[])[+[]]]", Strategy::Grammar).unwrap();
        for id in tree.preorder() {
            let node = tree.node(id);
            for pair in node.children.windows(2) {
                assert!(tree.node(pair[0]).span.end <= tree.node(pair[1]).span.start);
            }
            for child in &node.children {
                assert!(node.span.contains(&tree.node(*child).span));
            }
        }
    }

    #[test]
    fn test_object_properties_flattened() {
        let tree = parse("({a: 1, [b]: 2})", Strategy::Grammar).unwrap();
        let root = tree.node(tree.root());

        assert_eq!(root.kind, NodeKind::Object);
        let texts: Vec<&str> = root.children.iter().map(|c| tree.text(*c)).collect();
        assert_eq!(texts, vec!["a", "1", "b", "2"]);
    }
}

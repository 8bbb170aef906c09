// AST (Abstract Syntax Tree) definitions for the expression dialect

/// Byte range into the source text, start inclusive, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Whether `other` lies within this span
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one byte
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Resolve this span against its source text
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Equality
    LooseEq,
    LooseNe,
    StrictEq,
    StrictNe,
    // Relational
    Lt,
    Le,
    Gt,
    Ge,
    // Logical (short-circuit)
    And,
    Or,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::LooseEq => "==",
            BinOp::LooseNe => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::UShr => ">>>",
        }
    }
}

/// Prefix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,    // !x
    Plus,   // +x
    Neg,    // -x
    BitNot, // ~x
    Typeof, // typeof x
    Void,   // void x
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Plus => "+",
            UnOp::Neg => "-",
            UnOp::BitNot => "~",
            UnOp::Typeof => "typeof",
            UnOp::Void => "void",
        }
    }
}

/// One `key: value` entry of an object literal
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: Expr,
    pub value: Expr,
    /// `[key]: value` rather than `key: value`
    pub computed: bool,
}

/// Expression categories produced by the parsers
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `;`-separated statements; the root of a grammar-aware parse
    Program(Vec<Expr>),
    /// Single-operand wrap: `( e )`, or a bracket pair holding exactly one pair
    Paren(Box<Expr>),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Number(f64),
    Str(String),
    Ident(String),
    /// Bracket pair with no semantic category (bracket-matching strategy)
    Group(Vec<Expr>),
}

/// An expression together with the source text it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Sub-expressions in source order.
    ///
    /// Object properties contribute their key and value directly: a
    /// `key: value` span is not an expression on its own.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Program(items) | ExprKind::Array(items) | ExprKind::Group(items) => {
                items.iter().collect()
            }
            ExprKind::Paren(inner) => vec![inner.as_ref()],
            ExprKind::Unary { operand, .. } => vec![operand.as_ref()],
            ExprKind::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            ExprKind::Object(props) => props.iter().flat_map(|p| [&p.key, &p.value]).collect(),
            ExprKind::Member {
                object, property, ..
            } => vec![object.as_ref(), property.as_ref()],
            ExprKind::Call { callee, args } => {
                let mut children = vec![callee.as_ref()];
                children.extend(args.iter());
                children
            }
            ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Ident(_) => Vec::new(),
        }
    }

    /// Take the kind out, leaving an empty program behind.
    ///
    /// `Expr` has a custom `Drop`, so its fields cannot be moved out by a
    /// plain `match expr.kind`.
    pub fn into_kind(mut self) -> ExprKind {
        std::mem::replace(&mut self.kind, ExprKind::Program(Vec::new()))
    }
}

impl Default for Expr {
    /// An empty program
    fn default() -> Self {
        Self::new(ExprKind::Program(Vec::new()), Span::default())
    }
}

impl Drop for Expr {
    // A long `a+b+c+...` chain nests one box per operand. Tear it down with
    // a heap stack so dropping it cannot overflow the thread's stack.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.kind, &mut pending);
        while let Some(mut expr) = pending.pop() {
            detach_children(&mut expr.kind, &mut pending);
        }
    }
}

/// Move every direct child of `kind` into `out`, leaving empty programs
/// behind in the boxes
fn detach_children(kind: &mut ExprKind, out: &mut Vec<Expr>) {
    match kind {
        ExprKind::Program(items) | ExprKind::Array(items) | ExprKind::Group(items) => {
            out.append(items)
        }
        ExprKind::Paren(inner) | ExprKind::Unary { operand: inner, .. } => {
            out.push(std::mem::take(&mut **inner))
        }
        ExprKind::Binary { left, right, .. } => {
            out.push(std::mem::take(&mut **left));
            out.push(std::mem::take(&mut **right));
        }
        ExprKind::Object(props) => out.extend(props.drain(..).flat_map(|p| [p.key, p.value])),
        ExprKind::Member {
            object, property, ..
        } => {
            out.push(std::mem::take(&mut **object));
            out.push(std::mem::take(&mut **property));
        }
        ExprKind::Call { callee, args } => {
            out.push(std::mem::take(&mut **callee));
            out.append(args);
        }
        ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Ident(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(n: f64) -> Expr {
        Expr::new(ExprKind::Number(n), Span::default())
    }

    #[test]
    fn test_into_kind_moves_children_out() {
        let expr = Expr::new(
            ExprKind::Binary {
                op: BinOp::Add,
                left: Box::new(number(1.0)),
                right: Box::new(number(2.0)),
            },
            Span::new(0, 3),
        );

        match expr.into_kind() {
            ExprKind::Binary { left, right, .. } => {
                assert_eq!(*left, number(1.0));
                assert_eq!(*right, number(2.0));
            }
            other => panic!("Expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_deep_chain_drops_without_recursion() {
        let mut expr = number(0.0);
        for _ in 0..200_000 {
            expr = Expr::new(
                ExprKind::Binary {
                    op: BinOp::Add,
                    left: Box::new(expr),
                    right: Box::new(number(1.0)),
                },
                Span::default(),
            );
        }
        for _ in 0..200_000 {
            expr = Expr::new(
                ExprKind::Unary {
                    op: UnOp::Not,
                    operand: Box::new(expr),
                },
                Span::default(),
            );
        }
        drop(expr);
    }
}

//! Branch rendering
//!
//! A rendering is a fresh copy of the original source with every node of one
//! branch replaced by the display string of its value. Nodes are evaluated
//! from their *original* text, never from an earlier rendering.

use crate::interpreter::{HostError, HostEvaluator};
use crate::parser::ast::Span;
use crate::runtime::{display, Environment};
use crate::tree::branches::Branch;
use crate::tree::{NodeId, Tree};

/// A node's value could not be computed or displayed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{cause} (evaluating {}..{})", .span.start, .span.end)]
pub struct EvaluationError {
    #[source]
    pub cause: HostError,
    /// Span of the failing node in the original source
    pub span: Span,
}

/// One spliced node
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub node: NodeId,
    /// Where the node sits in the original source
    pub original: Span,
    /// Where its display string sits in the rendered text
    pub rendered: Span,
}

/// Rendered text plus the location of each substitution in it
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub text: String,
    pub substitutions: Vec<Substitution>,
}

/// Render `branch` over the source of `tree`
pub fn render(
    tree: &Tree,
    branch: &Branch,
    evaluator: &mut dyn HostEvaluator,
    env: &mut Environment,
) -> Result<String, EvaluationError> {
    render_marked(tree, branch, evaluator, env).map(|rendering| rendering.text)
}

/// Like [`render`], keeping track of where each value was spliced
pub fn render_marked(
    tree: &Tree,
    branch: &Branch,
    evaluator: &mut dyn HostEvaluator,
    env: &mut Environment,
) -> Result<Rendering, EvaluationError> {
    let source = tree.source();
    let mut nodes: Vec<NodeId> = branch.iter().collect();
    nodes.sort_by_key(|id| tree.node(*id).span.start);

    let mut text = String::with_capacity(source.len());
    let mut substitutions = Vec::with_capacity(nodes.len());
    let mut cursor = 0;

    for id in nodes {
        let span = tree.node(id).span;
        let shown = evaluator
            .evaluate(span.text(source), env)
            .and_then(|value| display(&value))
            .map_err(|cause| EvaluationError { cause, span })?;

        text.push_str(&source[cursor..span.start]);
        let start = text.len();
        text.push_str(&shown);
        substitutions.push(Substitution {
            node: id,
            original: span,
            rendered: Span::new(start, text.len()),
        });
        cursor = span.end;
    }
    text.push_str(&source[cursor..]);

    Ok(Rendering {
        text,
        substitutions,
    })
}

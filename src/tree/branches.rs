//! Branch sequence generator
//!
//! Walks from a start node up to the root. At every node on that path the
//! internal children not yet seen are drained first, each through its own
//! bounded sub-walk, and only then is the node itself revealed. Children
//! that finished draining are carried along as *companions* so later
//! branches keep showing them as resolved.
//!
//! The walk is an explicit stack of [`Frame`]s instead of recursion, so the
//! sequence can be pulled lazily one branch at a time.

use crate::tree::{NodeId, Tree};
use std::rc::Rc;

/// Nodes evaluated and substituted together in one step, in walk order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Branch(pub Vec<NodeId>);

impl Branch {
    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }
}

#[derive(Debug, Clone)]
struct Frame {
    node: NodeId,
    /// Child the walk climbed out of, already revealed
    skip: Option<NodeId>,
    companions: Vec<NodeId>,
    next_child: usize,
    /// Whether the walk continues to the parent once this frame is done
    climb: bool,
}

impl Frame {
    fn start(node: NodeId) -> Frame {
        Frame {
            node,
            skip: None,
            companions: Vec::new(),
            next_child: 0,
            climb: true,
        }
    }

    fn climb_from(parent: NodeId, child: NodeId) -> Frame {
        Frame {
            node: parent,
            skip: Some(child),
            companions: vec![child],
            next_child: 0,
            climb: true,
        }
    }

    fn descend(node: NodeId) -> Frame {
        Frame {
            node,
            skip: None,
            companions: Vec::new(),
            next_child: 0,
            climb: false,
        }
    }
}

/// Lazy, single-pass sequence of [`Branch`]es
#[derive(Debug, Clone)]
pub struct Branches {
    tree: Rc<Tree>,
    stack: Vec<Frame>,
}

/// Build the branch sequence of `tree` starting the walk at `start`.
///
/// A tree whose root is a leaf has nothing to reveal and yields no branches.
pub fn branches(tree: Rc<Tree>, start: NodeId) -> Branches {
    let stack = if tree.node(tree.root()).is_leaf() {
        Vec::new()
    } else {
        vec![Frame::start(start)]
    };
    Branches { tree, stack }
}

impl Branches {
    pub fn tree(&self) -> &Rc<Tree> {
        &self.tree
    }
}

impl Iterator for Branches {
    type Item = Branch;

    fn next(&mut self) -> Option<Branch> {
        loop {
            let tree = &self.tree;
            let top = self.stack.last_mut()?;
            let children = &tree.node(top.node).children;

            let mut descend = None;
            while let Some(&child) = children.get(top.next_child) {
                top.next_child += 1;
                if Some(child) != top.skip && !tree.node(child).is_leaf() {
                    descend = Some(child);
                    break;
                }
            }

            if let Some(child) = descend {
                self.stack.push(Frame::descend(child));
                continue;
            }

            // Children exhausted: reveal this node behind every enclosing companion list
            let frame = self.stack.pop()?;
            let mut nodes: Vec<NodeId> = self
                .stack
                .iter()
                .flat_map(|f| f.companions.iter().copied())
                .collect();
            nodes.push(frame.node);

            match self.stack.last_mut() {
                Some(parent) => parent.companions.push(frame.node),
                None if frame.climb => {
                    if let Some(parent) = self.tree.node(frame.node).parent {
                        self.stack.push(Frame::climb_from(parent, frame.node));
                    }
                }
                None => {}
            }

            return Some(Branch(nodes));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Strategy};
    use crate::tree::locate::locate;

    fn texts(source: &str) -> Vec<Vec<String>> {
        let tree = Rc::new(parse(source, Strategy::Grammar).unwrap());
        let start = locate(&tree);
        branches(tree.clone(), start)
            .map(|b| b.iter().map(|id| tree.text(id).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_worked_scenario() {
        assert_eq!(
            texts("((1+2)*(3+4))"),
            vec![
                vec!["1"],
                vec!["(1+2)"],
                vec!["(1+2)", "(3+4)"],
                vec!["((1+2)*(3+4))"],
            ]
        );
    }

    #[test]
    fn test_companions_ride_along() {
        let whole = "[1+(2+0), [3+4, 5+6]]";
        assert_eq!(
            texts(whole),
            vec![
                vec!["2"],
                vec!["(2+0)"],
                vec!["1+(2+0)"],
                vec!["1+(2+0)", "3+4"],
                vec!["1+(2+0)", "3+4", "5+6"],
                vec!["1+(2+0)", "[3+4, 5+6]"],
                vec![whole],
            ]
        );
    }

    #[test]
    fn test_leaf_root_is_empty() {
        assert!(texts("[]").is_empty());
        assert!(texts("42").is_empty());
    }

    #[test]
    fn test_single_internal_node() {
        assert_eq!(texts("![]"), vec![vec!["[]"], vec!["![]"]]);
    }
}

//! Deepest-node locator

use crate::tree::{NodeId, Tree};

/// The deepest node of `tree`, leaves included.
///
/// Ties go to the node met first in a left-to-right pre-order walk.
pub fn locate(tree: &Tree) -> NodeId {
    let mut deepest = tree.root();
    let mut stack = vec![tree.root()];

    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.depth > tree.node(deepest).depth {
            deepest = id;
        }
        stack.extend(node.children.iter().rev());
    }

    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Strategy};

    #[test]
    fn test_locate_first_of_ties() {
        let tree = parse("((1+2)*(3+4))", Strategy::Grammar).unwrap();
        let start = locate(&tree);

        assert_eq!(tree.text(start), "1");
        assert_eq!(tree.node(start).depth, 2);
    }

    #[test]
    fn test_locate_unique_deepest() {
        let tree = parse("1+(2*(3-[4,5][0]))", Strategy::Grammar).unwrap();
        assert_eq!(tree.text(locate(&tree)), "4");
    }

    #[test]
    fn test_locate_leaf_root() {
        let tree = parse("[]", Strategy::Grammar).unwrap();
        assert_eq!(locate(&tree), tree.root());
    }

    #[test]
    fn test_locate_deterministic() {
        let tree = parse("[]+[]+{}+a.b", Strategy::Grammar).unwrap();
        assert_eq!(locate(&tree), locate(&tree));
    }
}

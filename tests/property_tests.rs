// Property tests over randomly generated JSFuck-style expressions

use peel::interpreter::Interpreter;
use peel::parser::parse::Parser;
use peel::parser::{parse, Delimiter, Strategy as ParseStrategy};
use peel::runtime::{display, Environment};
use peel::stepper::Session;
use peel::tree::branches::{branches, Branch};
use peel::tree::locate::locate;
use peel::tree::normalize::normalize;
use peel::tree::{NodeId, Tree};
use proptest::prelude::*;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Expressions that always evaluate without error
fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("[]".to_string()),
        Just("![]".to_string()),
        Just("+[]".to_string()),
        Just("1".to_string()),
        Just("'a'".to_string()),
    ];

    leaf.prop_recursive(5, 48, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{} + {}", a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({}+{})", a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("[{},{}]", a, b)),
            inner.clone().prop_map(|a| format!("!{}", a)),
            // `++` would lex as an increment
            inner.clone().prop_map(|a| if a.starts_with('+') {
                format!("+({})", a)
            } else {
                format!("+{}", a)
            }),
            inner.clone().prop_map(|a| format!("[{}]", a)),
            inner.clone().prop_map(|a| format!("({})", a)),
            // Adding `[]` first makes the object a string, so indexing never throws
            inner.clone().prop_map(|a| format!("({}+[])[1]", a)),
            inner.clone().prop_map(|a| format!("String({})", a)),
            (inner.clone(), inner.clone(), inner.clone())
                .prop_map(|(a, b, c)| format!("[{},{}]['concat']({})", a, b, c)),
            (inner.clone(), inner).prop_map(|(a, b)| format!("({{'k':{},[{}]:1}})", a, b)),
        ]
    })
}

fn tree_of(source: &str) -> Rc<Tree> {
    tree_with(source, ParseStrategy::Grammar)
}

fn tree_with(source: &str, strategy: ParseStrategy) -> Rc<Tree> {
    Rc::new(parse(source, strategy).expect("generated source parses"))
}

fn all_branches(tree: &Rc<Tree>) -> Vec<Branch> {
    branches(Rc::clone(tree), locate(tree)).collect()
}

proptest! {
    #[test]
    fn prop_every_internal_node_revealed_once(source in expression()) {
        let tree = tree_of(&source);
        let start = locate(&tree);
        let mut revealed: FxHashMap<NodeId, usize> = FxHashMap::default();

        for branch in all_branches(&tree) {
            for id in branch.iter() {
                prop_assert!(!tree.node(id).is_leaf() || id == start);
            }
            if let Some(&last) = branch.nodes().last() {
                *revealed.entry(last).or_default() += 1;
            }
        }

        for id in tree.preorder().filter(|id| !tree.node(*id).is_leaf()) {
            prop_assert_eq!(revealed.get(&id).copied(), Some(1), "node {} of {:?}", id, source);
        }
    }

    #[test]
    fn prop_descendants_are_revealed_first(source in expression()) {
        let tree = tree_of(&source);
        let sequence = all_branches(&tree);

        // Index of the branch each node is revealed in (its last element)
        let revealed: FxHashMap<NodeId, usize> = sequence
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.nodes().last().map(|id| (*id, i)))
            .collect();

        for (&id, &index) in &revealed {
            for ancestor in tree.ancestors(id) {
                if let Some(&later) = revealed.get(&ancestor) {
                    prop_assert!(later > index);
                }
            }
        }
    }

    #[test]
    fn prop_branch_spans_are_disjoint(source in expression()) {
        let tree = tree_of(&source);

        for branch in all_branches(&tree) {
            let nodes = branch.nodes();
            for (i, a) in nodes.iter().enumerate() {
                for b in &nodes[i + 1..] {
                    prop_assert!(!tree.node(*a).span.overlaps(&tree.node(*b).span));
                }
            }
        }
    }

    #[test]
    fn prop_normalize_is_idempotent(source in expression()) {
        let program = Parser::new(&source)
            .and_then(|mut p| p.parse_program())
            .expect("generated source parses");
        let once = normalize(program);
        prop_assert_eq!(normalize(once.clone()), once);
    }

    #[test]
    fn prop_locate_is_deepest_and_first(source in expression()) {
        let tree = tree_of(&source);
        let found = locate(&tree);
        let depth = tree.node(found).depth;

        for id in tree.preorder() {
            prop_assert!(tree.node(id).depth <= depth);
            if id.0 < found.0 {
                prop_assert!(tree.node(id).depth < depth);
            }
        }
        prop_assert_eq!(locate(&tree), found);
    }

    #[test]
    fn prop_skipping_matches_single_steps(source in expression(), count in 1usize..6) {
        let tree = tree_of(&source);
        let total = all_branches(&tree).len();
        prop_assume!(count <= total);

        let mut jumped = Session::new(Rc::clone(&tree));
        let mut walked = Session::new(Rc::clone(&tree));
        let mut interpreter = Interpreter::new();
        let mut env = Environment::with_globals();

        let text = jumped.advance(count, &mut interpreter, &mut env).unwrap();
        for _ in 0..count {
            walked.advance(1, &mut interpreter, &mut env).unwrap();
        }

        prop_assert_eq!(walked.last_rendered(), Some(text.as_str()));
        prop_assert_eq!(jumped.step(), count + 1);
        prop_assert_eq!(walked.step(), jumped.step());
    }

    #[test]
    fn prop_last_step_shows_the_value(source in expression()) {
        let tree = tree_of(&source);
        prop_assume!(!tree.node(tree.root()).is_leaf());

        let mut session = Session::new(Rc::clone(&tree));
        let mut interpreter = Interpreter::new();
        let mut env = Environment::with_globals();

        let mut last = None;
        while !session.is_finished() {
            last = Some(session.advance(1, &mut interpreter, &mut env).unwrap());
        }

        let value = interpreter.run(&source, &mut env).unwrap();
        prop_assert_eq!(last, Some(display(&value).unwrap()));
    }

    #[test]
    fn prop_bracket_pairs_peel_in_order(source in expression()) {
        let tree = tree_with(&source, ParseStrategy::Brackets(Delimiter::Paren));
        let sequence = all_branches(&tree);
        let revealed: FxHashMap<NodeId, usize> = sequence
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.nodes().last().map(|id| (*id, i)))
            .collect();

        for id in tree.preorder().filter(|id| !tree.node(*id).is_leaf()) {
            let index = revealed.get(&id).copied();
            prop_assert!(index.is_some(), "pair {} of {:?}", id, source);
            for ancestor in tree.ancestors(id) {
                prop_assert!(revealed.get(&ancestor).copied() > index);
            }
        }

        // Every pair's text is a complete expression, so each step renders
        prop_assume!(!sequence.is_empty());
        let mut session = Session::new(Rc::clone(&tree));
        let mut interpreter = Interpreter::new();
        let mut env = Environment::with_globals();
        let mut last = None;
        while !session.is_finished() {
            last = Some(session.advance(1, &mut interpreter, &mut env).unwrap());
        }

        let value = interpreter.run(&source, &mut env).unwrap();
        prop_assert_eq!(last, Some(display(&value).unwrap()));
    }
}

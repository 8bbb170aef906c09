//! Evaluation stepper
//!
//! A [`Session`] walks the branch sequence of one tree, rendering the source
//! with each branch's nodes replaced by their values. Advancing by `n` skips
//! `n - 1` branches and renders the `n`-th; renderings are independent of
//! each other, so skipping loses nothing.
//!
//! A branch whose rendering fails is parked and retried by the next
//! [`Session::advance`], which gives the caller a chance to fix the
//! environment (for example by binding a missing name) and try again.

pub mod render;

pub use render::{render, render_marked, EvaluationError, Rendering, Substitution};

use crate::interpreter::HostEvaluator;
use crate::runtime::Environment;
use crate::tree::branches::{branches, Branch, Branches};
use crate::tree::locate::locate;
use crate::tree::Tree;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    /// Every branch has been rendered
    #[error("no steps left")]
    Finished,

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("cannot advance by zero steps")]
    ZeroSteps,
}

/// Stepping state over one normalized tree
#[derive(Debug, Clone)]
pub struct Session {
    tree: Rc<Tree>,
    branches: Branches,
    /// Next branch of the sequence, pulled one ahead of the caller
    upcoming: Option<Branch>,
    /// Number of the next branch to be pulled, from 1
    step: usize,
    /// Branch whose rendering failed, pulled again before the sequence
    retry: Option<Branch>,
    last: Option<(Branch, Rendering)>,
}

impl Session {
    pub fn new(tree: Rc<Tree>) -> Self {
        let mut branches = branches(Rc::clone(&tree), locate(&tree));
        let upcoming = branches.next();
        Session {
            tree,
            branches,
            upcoming,
            step: 1,
            retry: None,
            last: None,
        }
    }

    /// Rewind to the first step; the tree is not re-parsed
    pub fn restart(&mut self) {
        self.branches = branches(Rc::clone(&self.tree), locate(&self.tree));
        self.upcoming = self.branches.next();
        self.step = 1;
        self.retry = None;
        self.last = None;
    }

    /// Pull `count` branches and render the last one
    pub fn advance(
        &mut self,
        count: usize,
        evaluator: &mut dyn HostEvaluator,
        env: &mut Environment,
    ) -> Result<String, StepError> {
        if count == 0 {
            return Err(StepError::ZeroSteps);
        }

        for _ in 1..count {
            self.pull().ok_or(StepError::Finished)?;
            self.step += 1;
        }
        let branch = self.pull().ok_or(StepError::Finished)?;

        match render_marked(&self.tree, &branch, evaluator, env) {
            Ok(rendering) => {
                self.step += 1;
                let text = rendering.text.clone();
                self.last = Some((branch, rendering));
                Ok(text)
            }
            Err(err) => {
                self.retry = Some(branch);
                Err(StepError::Evaluation(err))
            }
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn tree(&self) -> &Rc<Tree> {
        &self.tree
    }

    /// Text of the most recent successful rendering
    pub fn last_rendered(&self) -> Option<&str> {
        self.last.as_ref().map(|(_, rendering)| rendering.text.as_str())
    }

    pub fn last_rendering(&self) -> Option<&Rendering> {
        self.last.as_ref().map(|(_, rendering)| rendering)
    }

    /// Branch behind [`Session::last_rendered`]
    pub fn current_branch(&self) -> Option<&Branch> {
        self.last.as_ref().map(|(branch, _)| branch)
    }

    /// Branch waiting to be retried after a failed rendering
    pub fn pending_retry(&self) -> Option<&Branch> {
        self.retry.as_ref()
    }

    /// Whether the next [`Session::advance`] is bound to fail with `Finished`
    pub fn is_finished(&self) -> bool {
        self.retry.is_none() && self.upcoming.is_none()
    }

    fn pull(&mut self) -> Option<Branch> {
        if let Some(branch) = self.retry.take() {
            return Some(branch);
        }
        let branch = self.upcoming.take();
        if branch.is_some() {
            self.upcoming = self.branches.next();
        }
        branch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{HostError, Interpreter};
    use crate::parser::{parse, Strategy};
    use crate::runtime::Value;

    fn session(source: &str) -> Session {
        Session::new(Rc::new(parse(source, Strategy::Grammar).unwrap()))
    }

    fn advance(session: &mut Session, count: usize) -> Result<String, StepError> {
        session.advance(count, &mut Interpreter::new(), &mut Environment::with_globals())
    }

    #[test]
    fn test_worked_scenario() {
        let mut session = session("((1+2)*(3+4))");

        assert_eq!(advance(&mut session, 1).unwrap(), "((1+2)*(3+4))");
        assert_eq!(advance(&mut session, 1).unwrap(), "(3*(3+4))");
        assert_eq!(advance(&mut session, 1).unwrap(), "(3*7)");
        assert!(!session.is_finished());
        assert_eq!(advance(&mut session, 1).unwrap(), "21");
        assert_eq!(session.step(), 5);

        assert!(session.is_finished());
        assert_eq!(advance(&mut session, 1), Err(StepError::Finished));
    }

    #[test]
    fn test_multi_step_matches_single_steps() {
        let mut jumped = session("((1+2)*(3+4))");
        let mut walked = session("((1+2)*(3+4))");

        let text = advance(&mut jumped, 3).unwrap();
        for _ in 0..3 {
            advance(&mut walked, 1).unwrap();
        }

        assert_eq!(text, "(3*7)");
        assert_eq!(walked.last_rendered(), Some(text.as_str()));
        assert_eq!(jumped.step(), walked.step());
    }

    #[test]
    fn test_overshoot_finishes() {
        let mut session = session("((1+2)*(3+4))");
        assert_eq!(advance(&mut session, 9), Err(StepError::Finished));
    }

    #[test]
    fn test_zero_steps() {
        let mut session = session("1+1");
        assert_eq!(advance(&mut session, 0), Err(StepError::ZeroSteps));
        assert_eq!(session.step(), 1);
    }

    #[test]
    fn test_restart() {
        let mut session = session("((1+2)*(3+4))");
        advance(&mut session, 2).unwrap();

        session.restart();
        assert_eq!(session.step(), 1);
        assert_eq!(session.last_rendered(), None);
        assert_eq!(advance(&mut session, 4).unwrap(), "21");
    }

    #[test]
    fn test_failed_branch_is_retried() {
        let mut session = session("[x+1, 2]");
        let mut interpreter = Interpreter::new();
        let mut env = Environment::with_globals();

        let err = session.advance(1, &mut interpreter, &mut env).unwrap_err();
        match err {
            StepError::Evaluation(err) => {
                assert_eq!(err.cause, HostError::Reference("x is not defined".to_string()));
            }
            other => panic!("Expected evaluation error, got {:?}", other),
        }
        assert_eq!(session.step(), 1);
        assert!(session.pending_retry().is_some());

        env.define("x", Value::Number(41.0));
        assert_eq!(session.advance(1, &mut interpreter, &mut env).unwrap(), "[41+1, 2]");
        assert_eq!(session.step(), 2);
        assert!(session.pending_retry().is_none());
    }

    #[test]
    fn test_finished_through_shared_reference() {
        let mut session = session("+[]");
        let finished = |s: &Session| s.is_finished();

        // The start leaf renders first
        assert_eq!(advance(&mut session, 1).unwrap(), "+[]");
        assert!(!finished(&session));
        assert_eq!(advance(&mut session, 1).unwrap(), "0");
        assert!(finished(&session));

        session.restart();
        assert!(!finished(&session));
    }

    #[test]
    fn test_leaf_program_has_no_steps() {
        let mut session = session("[]");
        assert!(session.is_finished());
        assert_eq!(advance(&mut session, 1), Err(StepError::Finished));
    }
}

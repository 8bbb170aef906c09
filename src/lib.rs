//! # Introduction
//!
//! peel takes JSFuck-style obfuscated JavaScript apart one layer at a time.
//! Starting from the most deeply nested subexpression it repeatedly evaluates
//! a *branch* of independent subexpressions and splices their values into a
//! copy of the source, so the program visibly collapses toward its literal
//! meaning.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Parser → Normalizer → Tree → Locator → Branches → Session → render
//! ```
//!
//! 1. [`parser`]: tokenises the source (or matches bracket pairs) into an
//!    expression tree, normalized on the way out.
//! 2. [`tree`]: the immutable node arena, the deepest-node locator and the
//!    lazy branch sequence.
//! 3. [`stepper`]: [`stepper::Session`] counts steps, restarts, skips ahead
//!    and renders branches.
//! 4. [`runtime`]: the JavaScript [`runtime::Value`] model, the global
//!    [`runtime::Environment`] and the canonical display strings.
//! 5. [`interpreter`]: the [`interpreter::HostEvaluator`] seam and a
//!    reference interpreter for the JavaScript subset JSFuck needs.
//! 6. [`ui`] and [`repl`]: the terminal front ends; not part of the stable
//!    library API.

pub mod interpreter;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod stepper;
pub mod tree;
pub mod ui;

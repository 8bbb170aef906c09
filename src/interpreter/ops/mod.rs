pub mod access;
pub mod binary;
pub mod unary;

// Most of this module is `impl Interpreter`; the pure operator semantics are
// re-exported for callers that already hold evaluated operands.
pub use binary::{apply_binary, loose_equals};
pub use unary::apply_unary;

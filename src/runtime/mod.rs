//! Runtime model shared by the stepper and the evaluator
//!
//! - [`value`]: the [`Value`] enum and its reference types
//! - [`environment`]: the persistent global binding table
//! - [`display`]: canonical display strings substituted into renderings

pub mod display;
pub mod environment;
pub mod value;

pub use display::display;
pub use environment::Environment;
pub use value::Value;

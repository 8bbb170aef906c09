//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, command line
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   rendering, branch, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Session`],
//! an [`Interpreter`] and an [`Environment`], then call [`App::run`] to start
//! the event loop.
//!
//! [`Session`]: crate::stepper::Session
//! [`Interpreter`]: crate::interpreter::Interpreter
//! [`Environment`]: crate::runtime::Environment
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;

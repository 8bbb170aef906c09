//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: the original program, with the current branch's nodes shaded
//! - [`rendered`]: the current rendering, with substituted values shaded
//! - [`branch`]: the nodes of the current branch and their values
//! - [`status`]: status bar with keybindings, step counter and command line
//! - `utils`: highlighting and layout helpers shared by the panes
//!
//! # Architecture
//!
//! Each pane module exports a primary `render_*` function and, where the pane
//! scrolls, a scroll state type owned by the app.

mod utils;

pub mod branch;
pub mod rendered;
pub mod source;
pub mod status;

pub use branch::{render_branch_pane, BranchRenderData, BranchScrollState};
pub use rendered::{render_rendered_pane, RenderedScrollState};
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};

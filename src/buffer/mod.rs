//! Buffer module: the text model behind the input surface.
//!
//! This module contains:
//! - [`RenderBuffer`]: wrapped display lines plus paragraph boundaries
//! - [`Redraw`]: what the screen needs after a mutation
//! - [`wrap`] / [`display_width`]: Unicode-width-aware measuring and wrapping
//! - [`erase_cluster`]: backspace that removes whole combining clusters

mod backspace;
#[allow(clippy::module_inception)]
mod buffer;
mod wrap;

pub use backspace::erase_cluster;
pub use buffer::{rows, Redraw, RenderBuffer};
pub use wrap::{display_width, expand_tabs, is_zero_width, wrap};

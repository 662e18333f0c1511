//! Rendering module
//!
//! Headless display buffers the navigation agent draws into.

mod line;

pub use line::LineRenderer;

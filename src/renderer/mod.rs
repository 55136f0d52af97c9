//! Rendering module
//!
//! `shapes` turns a snapshot into an ordered list of 2D primitives. `canvas`
//! paints that list with the browser's 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use shapes::{Color, Shape, build};

//! The external drawing interface.
//!
//! Mica never rasterizes anything itself (spec.md non-goals: "producing
//! pixels"). `Canvas` is the minimal seam a host rasterizer implements so
//! the layer tree can describe custom-drawn content without Mica depending
//! on a GPU or software rasterizer crate.

use crate::color::{BorderRadius, Color};
use crate::geometry::Frame;

/// A single instruction a `ViewNode` with custom drawing emits per frame.
/// Intentionally tiny: Mica describes *what* to draw, never *how*.
pub enum DrawCommand {
    FillRect { frame: Frame, color: Color, radius: BorderRadius },
    StrokeRect { frame: Frame, color: Color, width: f64 },
}

/// Implemented by the host rasterizer. Mica calls `draw` once per custom
/// layer per frame with the commands accumulated since the last call.
pub trait Canvas {
    fn draw(&mut self, commands: &[DrawCommand]);
}

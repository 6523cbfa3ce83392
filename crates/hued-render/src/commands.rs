// SPDX-License-Identifier: MIT
//
// CommandList — a surface that records instead of painting.
//
// Useful when the real target lives somewhere else (a GPU canvas, a
// widget toolkit) and for asserting exactly which primitives the bar
// renderer issued. Replaying a list onto any other surface reproduces
// the same drawing.

use hued_color::Rgb;

use crate::geometry::{Quad, Rect};
use crate::surface::Surface;

/// One recorded primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: Rgb },
    VerticalGradient { rect: Rect, top: Rgb, bottom: Rgb },
    Bilinear { rect: Rect, quad: Quad },
}

impl DrawOp {
    /// The rectangle this op covers.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::FillRect { rect, .. } | Self::VerticalGradient { rect, .. } | Self::Bilinear { rect, .. } => *rect,
        }
    }

    /// Issue this op against `surface`.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        match *self {
            Self::FillRect { rect, color } => surface.fill_rect(rect, color),
            Self::VerticalGradient { rect, top, bottom } => surface.fill_vertical_gradient(rect, top, bottom),
            Self::Bilinear { rect, quad } => surface.fill_bilinear(rect, quad),
        }
    }
}

/// Records every draw call in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl CommandList {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Replay all recorded ops onto `surface`, in order.
    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for op in &self.ops {
            op.apply(surface);
        }
    }
}

impl Surface for CommandList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgb, bottom: Rgb) {
        self.ops.push(DrawOp::VerticalGradient { rect, top, bottom });
    }

    fn fill_bilinear(&mut self, rect: Rect, quad: Quad) {
        self.ops.push(DrawOp::Bilinear { rect, quad });
    }
}

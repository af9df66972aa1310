//! Recording drawing surface for tests.

use super::{Blend, Layer, Painter};
use crate::brush::BrushKind;
use crate::math::Vec2;

/// One captured draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Stamp {
        brush: BrushKind,
        center: Vec2,
        w: f32,
        h: f32,
        rotation: f32,
        alpha: f32,
        blend: Blend,
    },
    StrokeQuadratic {
        from: Vec2,
        ctrl: Vec2,
        to: Vec2,
        width: f32,
        alpha: f32,
    },
    Blit {
        offset: Vec2,
        alpha: f32,
        blend: Blend,
        /// Number of ops in the source layer at blit time
        src_ops: usize,
    },
}

/// Layer double that records every draw call
#[derive(Debug, Clone, Default)]
pub struct RecordingLayer {
    pub w: f32,
    pub h: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordingLayer {
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            w,
            h,
            ops: Vec::new(),
        }
    }

    pub fn stamps_of(&self, kind: BrushKind) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Stamp { brush, .. } if *brush == kind))
            .count()
    }

    pub fn blits(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Blit { .. }))
            .count()
    }
}

impl Layer for RecordingLayer {
    fn width(&self) -> f32 {
        self.w
    }

    fn height(&self) -> f32 {
        self.h
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn stamp(
        &mut self,
        brush: BrushKind,
        center: Vec2,
        w: f32,
        h: f32,
        rotation: f32,
        alpha: f32,
        blend: Blend,
    ) {
        self.ops.push(DrawOp::Stamp {
            brush,
            center,
            w,
            h,
            rotation,
            alpha,
            blend,
        });
    }

    fn stroke_quadratic(
        &mut self,
        from: Vec2,
        ctrl: Vec2,
        to: Vec2,
        width: f32,
        _rgb: (u8, u8, u8),
        alpha: f32,
    ) {
        self.ops.push(DrawOp::StrokeQuadratic {
            from,
            ctrl,
            to,
            width,
            alpha,
        });
    }

    fn blit(&mut self, src: &Self, offset: Vec2, alpha: f32, blend: Blend) {
        self.ops.push(DrawOp::Blit {
            offset,
            alpha,
            blend,
            src_ops: src.ops.len(),
        });
    }
}

/// Painter double producing [`RecordingLayer`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordingPainter;

impl Painter for RecordingPainter {
    type Layer = RecordingLayer;

    fn create_layer(&self, width: f32, height: f32) -> Result<RecordingLayer, String> {
        Ok(RecordingLayer::new(width, height))
    }
}

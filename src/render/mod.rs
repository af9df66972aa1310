//! Drawing surface abstraction
//!
//! Growth entities and effects draw through [`Layer`], never against the
//! browser directly, so the whole scene runs headless under `cargo test`.
//! [`CanvasLayer`] is the Canvas2D implementation; tests use a recording
//! double that captures draw ops.

pub mod canvas;
#[cfg(test)]
pub(crate) mod recording;

pub use canvas::{CanvasLayer, CanvasPainter};

use crate::brush::BrushKind;
use crate::math::Vec2;

/// Compositing mode for a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    Normal,
    /// Overlapping draws darken rather than replace; simulates ink layering
    Multiply,
}

/// A 2D raster surface the garden draws into
pub trait Layer {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    fn clear(&mut self);

    /// Rotated, alpha-blended brush stamp, `w`×`h` pixels centered on `center`
    fn stamp(
        &mut self,
        brush: BrushKind,
        center: Vec2,
        w: f32,
        h: f32,
        rotation: f32,
        alpha: f32,
        blend: Blend,
    );

    /// Round-capped stroke along a quadratic curve
    fn stroke_quadratic(
        &mut self,
        from: Vec2,
        ctrl: Vec2,
        to: Vec2,
        width: f32,
        rgb: (u8, u8, u8),
        alpha: f32,
    );

    /// Composite another layer's contents, top-left corner at `offset`
    fn blit(&mut self, src: &Self, offset: Vec2, alpha: f32, blend: Blend);
}

/// Creates offscreen layers for growth-entity caches
pub trait Painter {
    type Layer: Layer;

    fn create_layer(&self, width: f32, height: f32) -> Result<Self::Layer, String>;
}

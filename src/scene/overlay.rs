//! Text overlay boundary.
//!
//! The host owns the actual glyph elements; the scene only spawns a
//! visual per glyph and mirrors each body's transform onto it every
//! frame. A trait seam keeps the stage testable without a DOM.

use crate::math::Vec2;

/// Handle to one glyph visual
pub type GlyphId = usize;

/// Positioned glyph visuals the scene updates each frame
pub trait GlyphOverlay {
    /// Create a visual for one glyph at its layout position (top-left)
    fn spawn(&mut self, ch: char, x: f32, y: f32, size: f32) -> GlyphId;

    /// Mirror a body's transform: translation relative to the layout
    /// position, rotation in radians, and a uniform scale bump
    fn set_transform(&mut self, glyph: GlyphId, translate: Vec2, rotation: f32, scale: f32);

    /// Hide a glyph permanently (its body reached the ground)
    fn hide(&mut self, glyph: GlyphId);
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// Overlay double that records spawns, transforms, and hides
    #[derive(Debug, Default)]
    pub struct RecordingOverlay {
        pub spawned: Vec<char>,
        pub hidden: Vec<GlyphId>,
        pub transforms: Vec<(GlyphId, Vec2, f32, f32)>,
    }

    impl GlyphOverlay for RecordingOverlay {
        fn spawn(&mut self, ch: char, _x: f32, _y: f32, _size: f32) -> GlyphId {
            self.spawned.push(ch);
            self.spawned.len() - 1
        }

        fn set_transform(&mut self, glyph: GlyphId, translate: Vec2, rotation: f32, scale: f32) {
            self.transforms.push((glyph, translate, rotation, scale));
        }

        fn hide(&mut self, glyph: GlyphId) {
            self.hidden.push(glyph);
        }
    }
}

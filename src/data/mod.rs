//! Poem input and glyph layout.

mod poem;

pub use poem::{layout_glyphs, GlyphSlot, Poem};

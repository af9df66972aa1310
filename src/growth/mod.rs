//! Growth entities: the organisms born where glyphs strike the ground.
//!
//! Both variants share the same outer contract: advance one tick, render
//! onto the shared surface, report death so the compositor can prune.
//! Dispatch is a tagged variant, not a trait object, so entities stay
//! generic over the drawing layer.

mod flower;
mod tree;

pub use flower::SimpleFlower;
pub use tree::{Branch, InkTree};

use crate::math::Vec2;
use crate::render::{Layer, Painter};

/// A procedurally animated organism with a bounded lifecycle:
/// growing, holding, fading, dead.
pub enum GrowthEntity<L: Layer> {
    Flower(SimpleFlower<L>),
    Tree(InkTree<L>),
}

impl<L: Layer> GrowthEntity<L> {
    /// Advance one tick and draw onto the shared surface.
    pub fn advance_and_render<P: Painter<Layer = L>>(&mut self, painter: &P, screen: &mut L) {
        match self {
            GrowthEntity::Flower(f) => f.advance_and_render(painter, screen),
            GrowthEntity::Tree(t) => t.advance_and_render(screen),
        }
    }

    /// Terminal; the compositor removes the entity exactly once.
    pub fn is_dead(&self) -> bool {
        match self {
            GrowthEntity::Flower(f) => f.is_dead(),
            GrowthEntity::Tree(t) => t.is_dead(),
        }
    }

    pub fn origin(&self) -> Vec2 {
        match self {
            GrowthEntity::Flower(f) => f.origin(),
            GrowthEntity::Tree(t) => t.origin(),
        }
    }
}

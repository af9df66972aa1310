//! Staged bloom-and-fade flower.
//!
//! The shape is sampled once at birth; growth only eases it in. When the
//! grow period ends the flower rasterizes itself once into an offscreen
//! cache and every later frame blits that cache: the organism's final
//! shape must not change after it stops growing.

use std::f32::consts::TAU;

use crate::animation::{ease, Easing, LifePhase, Lifecycle};
use crate::brush::BrushKind;
use crate::math::{InkRng, Vec2};
use crate::render::{Blend, Layer, Painter};

/// Ticks from birth to full bloom
pub const GROW_PERIOD: u32 = 60;
/// Ticks held at full opacity once bloomed
pub const HOLD_TICKS: u32 = 300;
/// Ticks of linear fade to transparent
pub const FADE_TICKS: u32 = 60;

const PETAL_COUNT: usize = 5;

#[derive(Debug, Clone, Copy)]
struct Petal {
    angle: f32,
    dist: f32,
    size: f32,
}

/// A single ink flower anchored at a ground point
pub struct SimpleFlower<L: Layer> {
    origin: Vec2,
    scale: f32,
    /// Horizontal drift of the stem tip
    stem_curve: f32,
    stem_height: f32,
    petals: [Petal; PETAL_COUNT],
    age: u32,
    clock: Lifecycle,
    cache: Option<L>,
    cache_size: Vec2,
    /// Root anchor inside the cache image
    cache_root: Vec2,
}

impl<L: Layer> SimpleFlower<L> {
    pub fn new(origin: Vec2, rng: &mut InkRng) -> Self {
        let scale = rng.range(0.8, 1.8);
        let stem_curve = rng.signed(20.0);
        let stem_height = rng.range(60.0, 100.0) * scale;

        let mut petals = [Petal {
            angle: 0.0,
            dist: 0.0,
            size: 0.0,
        }; PETAL_COUNT];
        for (i, petal) in petals.iter_mut().enumerate() {
            *petal = Petal {
                angle: TAU / PETAL_COUNT as f32 * i as f32 + rng.range(0.0, 0.5),
                dist: rng.range(10.0, 15.0) * scale,
                size: rng.range(15.0, 25.0) * scale,
            };
        }

        // Cache bounds generously cover the stem sweep and petal spread
        let cache_size = Vec2::new(
            (800.0 * scale).ceil(),
            (stem_height * 2.0 + 400.0 * scale).ceil(),
        );
        let cache_root = Vec2::new(cache_size.x / 2.0, cache_size.y - 100.0 * scale);

        Self {
            origin,
            scale,
            stem_curve,
            stem_height,
            petals,
            age: 0,
            clock: Lifecycle::new(HOLD_TICKS, FADE_TICKS),
            cache: None,
            cache_size,
            cache_root,
        }
    }

    pub fn advance_and_render<P: Painter<Layer = L>>(&mut self, painter: &P, screen: &mut L) {
        if self.age < GROW_PERIOD {
            self.age += 1;
            let origin = self.origin;
            self.paint(screen, origin, 1.0);
            return;
        }

        if self.clock.phase() == LifePhase::Growing {
            // One-shot rasterization on the tick growth completes
            match painter.create_layer(self.cache_size.x, self.cache_size.y) {
                Ok(mut cache) => {
                    let root = self.cache_root;
                    self.paint(&mut cache, root, 1.0);
                    self.cache = Some(cache);
                }
                // Layer creation failed; fall back to direct redraw below
                Err(_) => {}
            }
            self.clock.settle();
        } else {
            self.clock.tick();
        }

        if self.clock.is_dead() {
            return;
        }

        let alpha = self.clock.alpha();
        if let Some(cache) = &self.cache {
            screen.blit(cache, self.origin - self.cache_root, alpha, Blend::Multiply);
        } else {
            let origin = self.origin;
            self.paint(screen, origin, alpha);
        }
    }

    /// Draw the flower at its current growth progress, rooted at `root`.
    /// The same routine serves live growth and the one-shot cache bake.
    fn paint(&self, target: &mut L, root: Vec2, alpha: f32) {
        let prog = self.age as f32 / GROW_PERIOD as f32;
        let grow = ease(prog, Easing::EaseOutCubic);
        let scale = self.scale;

        if prog > 0.1 {
            target.stamp(
                BrushKind::Root,
                root,
                40.0 * scale,
                40.0 * scale,
                0.0,
                0.3 * grow * alpha,
                Blend::Normal,
            );
        }

        let tip = root + Vec2::new(self.stem_curve * grow, -self.stem_height * grow);
        let ctrl = root + Vec2::new(self.stem_curve * grow, -self.stem_height * 0.5 * grow);
        target.stroke_quadratic(root, ctrl, tip, 5.0 * scale, (40, 40, 40), 0.5 * alpha);

        target.stamp(
            BrushKind::SoftBlack,
            tip,
            30.0 * scale,
            30.0 * scale,
            0.0,
            0.6 * grow * alpha,
            Blend::Normal,
        );

        if prog > 0.3 {
            let bloom = ease((prog - 0.3) / 0.7, Easing::EaseOutCubic);
            for p in &self.petals {
                let center = tip + Vec2::from_angle(p.angle).scale(p.dist * bloom);
                let d = p.size * bloom * 2.0;
                target.stamp(
                    BrushKind::SoftRed,
                    center,
                    d,
                    d,
                    0.0,
                    0.7 * bloom * alpha,
                    Blend::Multiply,
                );
            }
        }
    }

    pub fn is_dead(&self) -> bool {
        self.clock.is_dead()
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn phase(&self) -> LifePhase {
        self.clock.phase()
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }
}

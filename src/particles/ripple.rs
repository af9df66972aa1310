//! Radial ink shockwave burst.
//!
//! Forty stamps ride outward from the press point on decaying radial
//! speed, wobbling and swelling as they go, multiply-blended so the
//! rings darken where they overlap.

use std::f32::consts::TAU;

use crate::brush::BrushKind;
use crate::math::{InkRng, Vec2};
use crate::render::{Blend, Layer};

const PARTICLE_COUNT: usize = 40;
const MAX_AGE: u32 = 120;
/// Multiplicative radial-speed decay per tick
const SPEED_DECAY: f32 = 0.96;
/// Stamp growth per tick, pixels
const SIZE_GROWTH: f32 = 0.3;
/// Slow global spin added to every particle's rotation
const SPIN_RATE: f32 = 0.01;

#[derive(Debug, Clone)]
struct RippleParticle {
    angle: f32,
    dist: f32,
    speed: f32,
    size: f32,
    wobble: f32,
}

/// One shockwave burst anchored at its press point
#[derive(Debug, Clone)]
pub struct InkRipple {
    origin: Vec2,
    age: u32,
    particles: Vec<RippleParticle>,
}

impl InkRipple {
    pub fn new(origin: Vec2, rng: &mut InkRng) -> Self {
        let mut particles = Vec::with_capacity(PARTICLE_COUNT);
        for i in 0..PARTICLE_COUNT {
            let base_angle = TAU * i as f32 / PARTICLE_COUNT as f32;
            particles.push(RippleParticle {
                angle: base_angle + rng.signed(0.1),
                dist: rng.range(10.0, 20.0),
                speed: rng.range(2.0, 3.5),
                size: rng.range(30.0, 50.0),
                wobble: rng.signed(0.025),
            });
        }
        Self {
            origin,
            age: 0,
            particles,
        }
    }

    pub fn update(&mut self) {
        self.age += 1;
        for p in &mut self.particles {
            p.speed *= SPEED_DECAY;
            p.dist += p.speed;
            p.angle += p.wobble;
            p.size += SIZE_GROWTH;
        }
    }

    pub fn draw(&self, layer: &mut impl Layer) {
        let alpha = 1.0 - self.age as f32 / MAX_AGE as f32;
        if alpha <= 0.0 {
            return;
        }
        let spin = self.age as f32 * SPIN_RATE;
        for p in &self.particles {
            let center = self.origin + Vec2::from_angle(p.angle).scale(p.dist);
            layer.stamp(
                BrushKind::Ripple,
                center,
                p.size,
                p.size,
                p.angle + spin,
                alpha,
                Blend::Multiply,
            );
        }
    }

    /// Eligible for removal by the compositor
    pub fn is_dead(&self) -> bool {
        self.age >= MAX_AGE
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingLayer;

    fn ripple() -> InkRipple {
        InkRipple::new(Vec2::new(100.0, 100.0), &mut InkRng::new(17))
    }

    #[test]
    fn test_particle_count_fixed_at_creation() {
        let r = ripple();
        assert_eq!(r.particle_count(), 40);
        let mut r = r;
        for _ in 0..50 {
            r.update();
        }
        assert_eq!(r.particle_count(), 40);
    }

    #[test]
    fn test_birth_parameter_ranges() {
        for seed in 0..20 {
            let r = InkRipple::new(Vec2::ZERO, &mut InkRng::new(seed));
            for p in &r.particles {
                assert!((10.0..20.0).contains(&p.dist));
                assert!((2.0..3.5).contains(&p.speed));
                assert!((30.0..50.0).contains(&p.size));
                assert!(p.wobble.abs() < 0.025);
            }
        }
    }

    #[test]
    fn test_age_monotonic_and_dead_at_max() {
        let mut r = ripple();
        let mut prev = r.age();
        for _ in 0..119 {
            r.update();
            assert!(r.age() > prev);
            prev = r.age();
            assert!(!r.is_dead());
        }
        r.update();
        assert_eq!(r.age(), 120);
        assert!(r.is_dead());
    }

    #[test]
    fn test_speed_decays_and_size_grows() {
        let mut r = ripple();
        let speed0: Vec<f32> = r.particles.iter().map(|p| p.speed).collect();
        let size0: Vec<f32> = r.particles.iter().map(|p| p.size).collect();
        r.update();
        for (i, p) in r.particles.iter().enumerate() {
            assert!((p.speed - speed0[i] * 0.96).abs() < 1e-5);
            assert!((p.size - (size0[i] + 0.3)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_draw_emits_multiply_stamps() {
        let r = ripple();
        let mut layer = RecordingLayer::new(800.0, 600.0);
        r.draw(&mut layer);
        assert_eq!(layer.stamps_of(BrushKind::Ripple), 40);
    }

    #[test]
    fn test_draw_is_noop_once_faded() {
        let mut r = ripple();
        for _ in 0..120 {
            r.update();
        }
        let mut layer = RecordingLayer::new(800.0, 600.0);
        r.draw(&mut layer);
        assert!(layer.ops.is_empty(), "fully faded ripple must not draw");
    }
}

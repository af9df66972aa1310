//! Recursive branching ink tree.
//!
//! Unlike the flower, the tree draws incrementally and persistently onto
//! its own private layer: every branch stamp lands once and stays, and
//! the compositor blits that layer each frame with the current fade
//! alpha. Growth is a worklist of active branches, each traversed at a
//! constant speed; a finished branch forks, flowers, or both.

use std::f32::consts::TAU;

use crate::animation::Lifecycle;
use crate::brush::BrushKind;
use crate::math::{InkRng, Vec2};
use crate::render::{Blend, Layer, Painter};

/// Trunk stroke width at the root
pub const ROOT_WIDTH: f32 = 22.0;
/// Branches never fork past this depth
pub const MAX_DEPTH: u32 = 6;
/// Branches thinner than this stop forking
pub const MIN_WIDTH: f32 = 2.0;
/// Pixels of branch length traversed per tick
const STEP_LENGTH: f32 = 3.0;

const HOLD_TICKS: u32 = 300;
const FADE_TICKS: u32 = 60;

/// One segment of the tree, traversed over a fixed step count
#[derive(Debug, Clone, Copy)]
pub struct Branch {
    pub start: Vec2,
    pub end: Vec2,
    pub angle_deg: f32,
    pub width: f32,
    pub depth: u32,
    pub step: u32,
    pub total_steps: u32,
}

/// What happens at a branch's endpoint when its traversal completes
struct Completion {
    /// (angle_deg, width, depth) for each spawned child
    children: Vec<(f32, f32, u32)>,
    cluster: bool,
}

/// Forking rules: interior branches fork 1–2 children and sometimes
/// flower; terminal branches (too deep or too thin) always flower.
fn plan_completion(b: &Branch, rng: &mut InkRng) -> Completion {
    if b.depth < MAX_DEPTH && b.width > MIN_WIDTH {
        let split_chance = (0.6 - b.depth as f32 * 0.05).max(0.0);
        let child_count = if rng.chance(split_chance) { 2 } else { 1 };
        let children = (0..child_count)
            .map(|_| (b.angle_deg + rng.signed(40.0), b.width * 0.8, b.depth + 1))
            .collect();
        Completion {
            children,
            cluster: rng.chance(0.4),
        }
    } else {
        Completion {
            children: Vec::new(),
            cluster: true,
        }
    }
}

/// A branching ink tree anchored at a ground point
pub struct InkTree<L: Layer> {
    origin: Vec2,
    scale: f32,
    /// Private persistent canvas; never cleared, never replayed
    layer: L,
    /// Local origin inside the private layer
    layer_origin: Vec2,
    growing: bool,
    active: Vec<Branch>,
    clock: Lifecycle,
    rng: InkRng,
}

impl<L: Layer> InkTree<L> {
    pub fn new<P: Painter<Layer = L>>(
        origin: Vec2,
        mut rng: InkRng,
        painter: &P,
    ) -> Result<Self, String> {
        let scale = rng.range(0.5, 0.9);
        let size = 1800.0 * scale;
        let layer = painter.create_layer(size, size)?;
        let layer_origin = Vec2::new(size / 2.0, size * 0.85);

        let mut tree = Self {
            origin,
            scale,
            layer,
            layer_origin,
            growing: true,
            active: Vec::new(),
            clock: Lifecycle::new(HOLD_TICKS, FADE_TICKS),
            rng,
        };
        tree.start_branch(Vec2::ZERO, -90.0, ROOT_WIDTH, 0);
        Ok(tree)
    }

    fn start_branch(&mut self, start: Vec2, angle_deg: f32, width: f32, depth: u32) {
        let len = self.rng.range(70.0, 150.0) * self.scale;
        let end = start + Vec2::from_angle(angle_deg.to_radians()).scale(len);
        let total_steps = ((len / STEP_LENGTH).ceil() as u32).max(1);
        self.active.push(Branch {
            start,
            end,
            angle_deg,
            width,
            depth,
            step: 0,
            total_steps,
        });
    }

    /// Advance every active branch by one step, stamping ink as it goes.
    fn grow_step(&mut self) {
        // Faint wash under the first steps of the trunk only
        if let Some(first) = self.active.first() {
            if first.depth == 0 && first.step < 5 {
                self.layer.stamp(
                    BrushKind::Root,
                    self.layer_origin,
                    80.0 * self.scale,
                    40.0 * self.scale,
                    0.0,
                    0.1,
                    Blend::Normal,
                );
            }
        }

        let mut idx = self.active.len();
        while idx > 0 {
            idx -= 1;
            let mut b = self.active[idx];

            let t = b.step as f32 / b.total_steps as f32;
            let pos = b.start.lerp(&b.end, t) + self.layer_origin;
            // Stroke thins to 80% of its base width by the branch tip
            let width = b.width * (1.0 - t * 0.2);

            // Brush dries toward the tips: 30% dry near the trunk,
            // always dry past depth 2
            let dry = self.rng.chance(0.3) || b.depth > 2;
            let (brush, alpha) = if dry {
                (BrushKind::DryBlack, 0.7)
            } else {
                (BrushKind::WetBlack, 0.9)
            };
            let stamp_scale = (width / 40.0) * self.rng.range(0.8, 1.2);
            let d = 128.0 * stamp_scale;
            let rotation = self.rng.range(0.0, TAU);
            self.layer.stamp(brush, pos, d, d, rotation, alpha, Blend::Normal);

            b.step += 1;
            if b.step >= b.total_steps {
                self.active.swap_remove(idx);
                let outcome = plan_completion(&b, &mut self.rng);
                for (angle_deg, width, depth) in outcome.children {
                    self.start_branch(b.end, angle_deg, width, depth);
                }
                if outcome.cluster {
                    self.flower_cluster(b.end);
                }
            } else {
                self.active[idx] = b;
            }
        }

        if self.active.is_empty() {
            self.growing = false;
            self.clock.settle();
        }
    }

    /// Scatter of 3–6 small plum stamps around a branch endpoint
    fn flower_cluster(&mut self, at: Vec2) {
        let count = self.rng.range_usize(3, 7);
        for _ in 0..count {
            let center = at
                + Vec2::new(self.rng.signed(15.0), self.rng.signed(15.0))
                + self.layer_origin;
            let size = self.rng.range(15.0, 40.0);
            let d = size * 2.0;
            let brush = if self.rng.chance(0.5) {
                BrushKind::RedPlum
            } else {
                BrushKind::PalePlum
            };
            let rotation = self.rng.range(0.0, TAU);
            self.layer
                .stamp(brush, center, d, d, rotation, 0.7, Blend::Multiply);
        }
    }

    pub fn advance_and_render(&mut self, screen: &mut L) {
        if self.growing {
            self.grow_step();
        }
        if !self.growing {
            self.clock.tick();
        }
        if self.clock.is_dead() {
            return;
        }
        screen.blit(
            &self.layer,
            self.origin - self.layer_origin,
            self.clock.alpha(),
            Blend::Multiply,
        );
    }

    pub fn is_dead(&self) -> bool {
        self.clock.is_dead()
    }

    pub fn is_growing(&self) -> bool {
        self.growing
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn active_branches(&self) -> &[Branch] {
        &self.active
    }
}

//! The compositor: one tick per display refresh.
//!
//! The stage exclusively owns the live ripple and growth collections,
//! the character side-table, and the gesture state. Each frame runs in a
//! fixed order (press glow, character transforms, ambient forces,
//! ripples, growth entities) with the physics step feeding positions at
//! the top of the frame. Nothing blocks, nothing runs concurrently;
//! lifecycle flags checked each frame are the only cancellation.

use crate::brush::BrushKind;
use crate::config::SceneConfig;
use crate::data::{layout_glyphs, Poem};
use crate::growth::{GrowthEntity, InkTree, SimpleFlower};
use crate::interaction::{CharacterTable, PressTracker};
use crate::math::{InkRng, Vec2};
use crate::particles::InkRipple;
use crate::physics::{BodyId, PhysicsWorld};
use crate::render::{Blend, Layer, Painter};
use crate::scene::GlyphOverlay;

/// Seconds advanced per frame by the fixed-step engine
const FIXED_DT: f32 = 1.0 / 60.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    body: BodyId,
    target: Vec2,
}

/// Scene state and per-frame orchestration
pub struct Stage<P: Painter> {
    config: SceneConfig,
    viewport: Viewport,
    physics: PhysicsWorld,
    characters: CharacterTable,
    gesture: PressTracker,
    drag: Option<DragState>,
    ripples: Vec<InkRipple>,
    growth: Vec<GrowthEntity<P::Layer>>,
    rng: InkRng,
}

impl<P: Painter> Stage<P> {
    pub fn new(config: SceneConfig, viewport: Viewport, seed: u32) -> Self {
        let mut physics = PhysicsWorld::new(config.gravity);
        physics.add_ground(
            Vec2::new(viewport.width / 2.0, viewport.height + 50.0),
            viewport.width * 2.0,
            200.0,
        );
        Self {
            gesture: PressTracker::new(config.long_press_ms, config.press_move_tolerance),
            config,
            viewport,
            physics,
            characters: CharacterTable::new(),
            drag: None,
            ripples: Vec::new(),
            growth: Vec::new(),
            rng: InkRng::new(seed),
        }
    }

    /// Create one body + overlay visual per visible glyph
    pub fn seed_poem(&mut self, poem: &Poem, overlay: &mut dyn GlyphOverlay) {
        let slots = layout_glyphs(
            poem,
            self.viewport.width,
            self.viewport.height,
            self.config.glyph_size,
            self.config.line_height,
        );
        for slot in slots {
            let glyph = overlay.spawn(slot.ch, slot.x, slot.y, slot.size);
            let size = Vec2::new(slot.size, slot.size);
            let center = Vec2::new(slot.x, slot.y) + size.scale(0.5);
            let body = self.physics.add_char_body(center, slot.size, slot.size);
            self.characters
                .insert(body, glyph, Vec2::new(slot.x, slot.y), size);
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport { width, height };
    }

    /// Swap in new tunables. Gravity only applies at construction; the
    /// remaining fields take effect on the next frame.
    pub fn set_config(&mut self, config: SceneConfig) {
        self.gesture = PressTracker::new(config.long_press_ms, config.press_move_tolerance);
        self.config = config;
    }

    // --- pointer boundary -------------------------------------------------

    pub fn press_start(&mut self, at: Vec2, now_ms: f64) {
        self.gesture.press_start(at, now_ms);

        // Any direct tap frees a resting glyph; the first char body hit
        // becomes the drag target
        let hits = self.physics.bodies_at_point(at);
        let mut drag_body = None;
        for id in hits {
            self.physics.set_dynamic(id);
            if drag_body.is_none() && self.characters.set_dragging(id, true) {
                drag_body = Some(id);
            }
        }
        if let Some(body) = drag_body {
            self.drag = Some(DragState { body, target: at });
            // A drag suspends long-press detection for this gesture
            self.gesture.cancel();
        }
    }

    pub fn press_move(&mut self, at: Vec2) {
        self.gesture.press_move(at);
        if let Some(drag) = &mut self.drag {
            drag.target = at;
        }
    }

    pub fn press_end(&mut self) {
        self.gesture.press_end();
        if let Some(drag) = self.drag.take() {
            self.characters.set_dragging(drag.body, false);
        }
    }

    // --- per-frame tick ---------------------------------------------------

    pub fn frame(
        &mut self,
        now_ms: f64,
        painter: &P,
        screen: &mut P::Layer,
        overlay: &mut dyn GlyphOverlay,
    ) {
        screen.clear();

        if let Some(progress) = self.gesture.progress(now_ms) {
            self.draw_press_glow(screen, progress);
        }
        if self.gesture.take_fire(now_ms) {
            let origin = self.gesture.origin();
            self.trigger_shockwave(origin);
        }

        self.physics.step(FIXED_DT);
        for body in self.physics.drain_ground_contacts() {
            self.handle_ground_contact(body, painter, overlay);
        }

        self.update_character_transforms(overlay);
        self.apply_ambient_forces(now_ms);
        self.apply_drag_spring();

        let screen_ref = &mut *screen;
        self.ripples.retain_mut(|ripple| {
            ripple.update();
            ripple.draw(screen_ref);
            !ripple.is_dead()
        });

        self.growth.retain_mut(|entity| {
            entity.advance_and_render(painter, screen_ref);
            !entity.is_dead()
        });
    }

    /// Growing red glow under a pending press: a swelling halo plus a
    /// steadier core, both intensifying with hold progress
    fn draw_press_glow(&self, screen: &mut P::Layer, progress: f32) {
        let at = self.gesture.origin();
        let halo = 60.0 + progress * 80.0;
        screen.stamp(
            BrushKind::SoftRed,
            at,
            halo,
            halo,
            0.0,
            0.1 + progress * 0.2,
            Blend::Multiply,
        );
        screen.stamp(
            BrushKind::SoftRed,
            at,
            30.0,
            30.0,
            0.0,
            0.3 + progress * 0.4,
            Blend::Multiply,
        );
    }

    /// Ripple plus an outward radial impulse on every live body,
    /// proportional to mass and falling off with distance
    fn trigger_shockwave(&mut self, origin: Vec2) {
        self.ripples.push(InkRipple::new(origin, &mut self.rng));

        let targets: Vec<BodyId> = self
            .characters
            .entries()
            .iter()
            .filter(|e| !e.removed)
            .map(|e| e.body)
            .collect();
        for id in targets {
            let Some(pos) = self.physics.position(id) else {
                continue;
            };
            // Static bodies caught in the blast come loose
            self.physics.set_dynamic(id);
            let Some(mass) = self.physics.mass(id) else {
                continue;
            };
            let delta = pos - origin;
            // Distance floor guards the degenerate zero-offset case
            let dist = delta.length().max(1.0);
            let falloff = (self.config.shockwave_reference_dist / dist).max(0.1);
            let impulse = delta
                .scale(1.0 / dist)
                .scale(self.config.shockwave_strength * mass * falloff * FIXED_DT);
            self.physics.apply_impulse(id, impulse);
        }
    }

    /// First ground contact tears the character down and plants a
    /// growth entity at its landing x on the ground line
    fn handle_ground_contact(
        &mut self,
        body: BodyId,
        painter: &P,
        overlay: &mut dyn GlyphOverlay,
    ) {
        let Some(pos) = self.physics.position(body) else {
            return;
        };
        let Some(glyph) = self.characters.take_ground_contact(body) else {
            return;
        };
        overlay.hide(glyph);
        self.physics.remove_body(body);

        let origin = Vec2::new(pos.x, self.viewport.height);
        let entity = if self.rng.chance(self.config.flower_chance) {
            GrowthEntity::Flower(SimpleFlower::new(origin, &mut self.rng))
        } else {
            match InkTree::new(origin, self.rng.fork(), painter) {
                Ok(tree) => GrowthEntity::Tree(tree),
                // No private layer, no tree; a flower blooms instead
                Err(_) => GrowthEntity::Flower(SimpleFlower::new(origin, &mut self.rng)),
            }
        };
        self.growth.push(entity);
    }

    /// Mirror body transforms onto the glyph visuals
    fn update_character_transforms(&self, overlay: &mut dyn GlyphOverlay) {
        for entry in self.characters.entries() {
            if entry.removed {
                continue;
            }
            let (Some(pos), Some(angle)) = (
                self.physics.position(entry.body),
                self.physics.angle(entry.body),
            ) else {
                continue;
            };
            let layout_center = entry.origin + entry.size.scale(0.5);
            let scale = if entry.dragging { 1.2 } else { 1.0 };
            overlay.set_transform(entry.glyph, pos - layout_center, angle, scale);
        }
    }

    /// Sinusoidal sway with a per-body phase, plus a slight upward bias.
    /// Static, removed, and dragged bodies are left alone.
    fn apply_ambient_forces(&mut self, now_ms: f64) {
        let swing = (now_ms * self.config.sway_rate) as f32;
        let targets: Vec<BodyId> = self
            .characters
            .entries()
            .iter()
            .filter(|e| !e.removed && !e.dragging)
            .map(|e| e.body)
            .collect();
        for id in targets {
            if self.physics.is_static(id) {
                continue;
            }
            let Some(mass) = self.physics.mass(id) else {
                continue;
            };
            let sway = (swing + self.physics.phase_of(id)).sin() * self.config.sway_strength;
            let impulse = Vec2::new(sway, -self.config.lift_strength).scale(mass * FIXED_DT);
            self.physics.apply_impulse(id, impulse);
        }
    }

    /// Critically-damped spring pulling the dragged body to the pointer
    fn apply_drag_spring(&mut self) {
        let Some(drag) = self.drag else {
            return;
        };
        let (Some(pos), Some(vel), Some(mass)) = (
            self.physics.position(drag.body),
            self.physics.velocity(drag.body),
            self.physics.mass(drag.body),
        ) else {
            self.drag = None;
            return;
        };
        let accel = (drag.target - pos).scale(self.config.drag_stiffness)
            - vel.scale(self.config.drag_damping);
        self.physics.apply_impulse(drag.body, accel.scale(mass * FIXED_DT));
    }

    // --- observers --------------------------------------------------------

    pub fn ripple_count(&self) -> usize {
        self.ripples.len()
    }

    pub fn growth_count(&self) -> usize {
        self.growth.len()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::{RecordingLayer, RecordingPainter};
    use crate::scene::overlay::recording::RecordingOverlay;

    const DT_MS: f64 = 1000.0 / 60.0;

    fn small_poem() -> Poem {
        Poem {
            title: "꽃".to_string(),
            author: "시".to_string(),
            body: vec!["피다".to_string()],
        }
    }

    fn stage() -> Stage<RecordingPainter> {
        Stage::new(
            SceneConfig::default(),
            Viewport {
                width: 800.0,
                height: 600.0,
            },
            42,
        )
    }

    fn run_frames(
        stage: &mut Stage<RecordingPainter>,
        overlay: &mut RecordingOverlay,
        start_ms: f64,
        count: usize,
    ) -> f64 {
        let mut now = start_ms;
        for _ in 0..count {
            let mut screen = RecordingLayer::new(800.0, 600.0);
            stage.frame(now, &RecordingPainter, &mut screen, overlay);
            now += DT_MS;
        }
        now
    }

    #[test]
    fn test_seed_poem_pairs_bodies_and_glyphs() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        // 꽃 + 시 + 피다 = 4 visible glyphs
        assert_eq!(s.character_count(), 4);
        assert_eq!(overlay.spawned.len(), 4);
        // plus the ground body
        assert_eq!(s.physics.body_count(), 5);
    }

    #[test]
    fn test_static_glyphs_receive_transforms_but_do_not_fall() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        run_frames(&mut s, &mut overlay, 0.0, 10);
        // Every live glyph gets a transform every frame
        assert_eq!(overlay.transforms.len(), 4 * 10);
        // All translations are zero: nothing has been freed yet
        for (_, translate, _, _) in &overlay.transforms {
            assert!(translate.length() < 1e-3);
        }
    }

    #[test]
    fn test_landing_spawns_one_growth_entity() {
        // Scenario: a freed glyph falls, touches ground once, and by the
        // next tick is hidden, detached, and replaced by one entity
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        let entry = s.characters.entries()[0];
        s.physics.set_dynamic(entry.body);

        let mut now = 0.0;
        for _ in 0..2000 {
            let mut screen = RecordingLayer::new(800.0, 600.0);
            s.frame(now, &RecordingPainter, &mut screen, &mut overlay);
            now += DT_MS;
            if s.characters.entries()[0].removed {
                break;
            }
        }

        assert!(s.characters.entries()[0].removed, "glyph never landed");
        assert_eq!(overlay.hidden, vec![entry.glyph]);
        assert!(!s.physics.contains(entry.body), "body must be detached");
        assert_eq!(s.growth_count(), 1);
        // The others are untouched
        assert_eq!(s.character_count(), 4);
        assert!(!s.characters.entries()[1].removed);
    }

    #[test]
    fn test_ground_contact_is_idempotent_at_stage_level() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        let body = s.characters.entries()[0].body;

        s.handle_ground_contact(body, &RecordingPainter, &mut overlay);
        assert_eq!(s.growth_count(), 1);
        assert_eq!(overlay.hidden.len(), 1);

        s.handle_ground_contact(body, &RecordingPainter, &mut overlay);
        assert_eq!(s.growth_count(), 1, "repeat contact must not respawn");
        assert_eq!(overlay.hidden.len(), 1);
    }

    #[test]
    fn test_growth_origin_sits_on_ground_line() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        let body = s.characters.entries()[0].body;
        let x = s.physics.position(body).unwrap().x;

        s.handle_ground_contact(body, &RecordingPainter, &mut overlay);
        let origin = s.growth[0].origin();
        assert!((origin.x - x).abs() < 1e-3);
        assert!((origin.y - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_odds_favor_flowers() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&Poem::built_in(), &mut overlay);
        let bodies: Vec<BodyId> = s.characters.entries().iter().map(|e| e.body).collect();
        for body in bodies {
            s.handle_ground_contact(body, &RecordingPainter, &mut overlay);
        }
        let flowers = s
            .growth
            .iter()
            .filter(|g| matches!(g, GrowthEntity::Flower(_)))
            .count();
        let trees = s.growth.len() - flowers;
        assert_eq!(s.growth.len(), s.character_count());
        assert!(flowers > trees * 3, "flowers {} vs trees {}", flowers, trees);
    }

    #[test]
    fn test_long_press_in_empty_scene_fires_one_ripple_and_nothing_else() {
        // Scenario: hold at (100,100) in an empty scene
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.press_start(Vec2::new(100.0, 100.0), 0.0);

        let now = run_frames(&mut s, &mut overlay, 0.0, 95); // past 1500 ms
        assert_eq!(s.ripple_count(), 1);
        assert_eq!(s.growth_count(), 0);

        // Holding longer never fires again
        run_frames(&mut s, &mut overlay, now, 20);
        assert_eq!(s.ripple_count(), 1);
    }

    #[test]
    fn test_press_glow_drawn_while_holding() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.press_start(Vec2::new(50.0, 60.0), 0.0);
        let mut screen = RecordingLayer::new(800.0, 600.0);
        s.frame(700.0, &RecordingPainter, &mut screen, &mut overlay);
        assert_eq!(screen.stamps_of(BrushKind::SoftRed), 2);
        s.press_end();
        let mut screen = RecordingLayer::new(800.0, 600.0);
        s.frame(720.0, &RecordingPainter, &mut screen, &mut overlay);
        assert_eq!(screen.stamps_of(BrushKind::SoftRed), 0);
    }

    #[test]
    fn test_moving_press_cancels_shockwave() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.press_start(Vec2::new(100.0, 100.0), 0.0);
        s.press_move(Vec2::new(130.0, 100.0));
        run_frames(&mut s, &mut overlay, 0.0, 120);
        assert_eq!(s.ripple_count(), 0);
    }

    #[test]
    fn test_shockwave_frees_static_bodies_and_pushes_them() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        let body = s.characters.entries()[0].body;
        assert!(s.physics.is_static(body));
        let before = s.physics.position(body).unwrap();

        s.trigger_shockwave(before + Vec2::new(-60.0, 40.0));
        assert!(!s.physics.is_static(body));
        run_frames(&mut s, &mut overlay, 0.0, 5);
        let after = s.physics.position(body).unwrap();
        assert!(after.distance(&before) > 0.5, "blast must move the body");
    }

    #[test]
    fn test_shockwave_survives_body_at_exact_origin() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        let at = s.physics.position(s.characters.entries()[0].body).unwrap();
        // Zero distance exercises the falloff floor
        s.trigger_shockwave(at);
        run_frames(&mut s, &mut overlay, 0.0, 2);
    }

    #[test]
    fn test_tap_on_glyph_starts_drag_and_disarms_press() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        // One step so the point query sees the colliders
        run_frames(&mut s, &mut overlay, 0.0, 1);

        let entry = s.characters.entries()[0];
        let center = entry.origin + entry.size.scale(0.5);
        s.press_start(center, 100.0);

        assert!(!s.physics.is_static(entry.body), "tap frees the glyph");
        assert!(s.characters.is_dragging(entry.body));
        assert!(s.drag.is_some());
        // Long press is disarmed for this gesture
        run_frames(&mut s, &mut overlay, 100.0, 120);
        assert_eq!(s.ripple_count(), 0);

        s.press_end();
        assert!(!s.characters.is_dragging(entry.body));
        assert!(s.drag.is_none());
    }

    #[test]
    fn test_dragged_glyph_gets_scale_bump() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        run_frames(&mut s, &mut overlay, 0.0, 1);
        let entry = s.characters.entries()[0];
        let center = entry.origin + entry.size.scale(0.5);
        s.press_start(center, 50.0);

        overlay.transforms.clear();
        run_frames(&mut s, &mut overlay, 60.0, 1);
        let bumped = overlay
            .transforms
            .iter()
            .find(|(glyph, _, _, _)| *glyph == entry.glyph)
            .expect("dragged glyph still gets transforms");
        assert!((bumped.3 - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_drag_spring_pulls_body_toward_pointer() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        run_frames(&mut s, &mut overlay, 0.0, 1);
        let entry = s.characters.entries()[0];
        let start = entry.origin + entry.size.scale(0.5);
        s.press_start(start, 50.0);

        let target = start + Vec2::new(120.0, -40.0);
        s.press_move(target);
        run_frames(&mut s, &mut overlay, 60.0, 240);
        let pos = s.physics.position(entry.body).unwrap();
        assert!(
            pos.distance(&target) < pos.distance(&start) + 1.0,
            "body should head toward the pointer"
        );
        assert!((pos.x - start.x).abs() > 10.0);
    }

    #[test]
    fn test_ripples_are_pruned_at_max_age() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.press_start(Vec2::new(100.0, 100.0), 0.0);
        run_frames(&mut s, &mut overlay, 0.0, 95);
        assert_eq!(s.ripple_count(), 1);
        // 120 ticks of ripple life
        run_frames(&mut s, &mut overlay, 95.0 * DT_MS, 121);
        assert_eq!(s.ripple_count(), 0);
    }

    #[test]
    fn test_growth_entities_are_pruned_when_dead() {
        let mut s = stage();
        let mut overlay = RecordingOverlay::default();
        s.seed_poem(&small_poem(), &mut overlay);
        let body = s.characters.entries()[0].body;
        s.handle_ground_contact(body, &RecordingPainter, &mut overlay);
        assert_eq!(s.growth_count(), 1);
        // Generous bound: covers a flower (422 ticks) and a tree, whose
        // growth phase adds at most a few hundred ticks before the hold
        run_frames(&mut s, &mut overlay, 0.0, 900);
        assert_eq!(s.growth_count(), 0);
    }
}

//! Side-table pairing each poem glyph with its physics body.
//!
//! The table never owns the simulation; it owns the glyph association,
//! the layout origin the on-screen transform is computed against, and
//! the removal latch that keeps ground contacts idempotent.

use crate::math::Vec2;
use crate::physics::BodyId;
use crate::scene::GlyphId;

/// One glyph's entry, created at initialization and removed at most once
#[derive(Debug, Clone, Copy)]
pub struct CharacterEntry {
    pub body: BodyId,
    pub glyph: GlyphId,
    /// Top-left layout position at initialization
    pub origin: Vec2,
    pub size: Vec2,
    pub dragging: bool,
    pub removed: bool,
}

/// The character ↔ body side-table
#[derive(Debug, Default)]
pub struct CharacterTable {
    entries: Vec<CharacterEntry>,
}

impl CharacterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, body: BodyId, glyph: GlyphId, origin: Vec2, size: Vec2) {
        self.entries.push(CharacterEntry {
            body,
            glyph,
            origin,
            size,
            dragging: false,
            removed: false,
        });
    }

    pub fn entries(&self) -> &[CharacterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find_mut(&mut self, body: BodyId) -> Option<&mut CharacterEntry> {
        self.entries.iter_mut().find(|e| e.body == body)
    }

    /// First ground contact for `body` returns its glyph for teardown;
    /// repeats and unknown bodies return `None`.
    pub fn take_ground_contact(&mut self, body: BodyId) -> Option<GlyphId> {
        let entry = self.find_mut(body)?;
        if entry.removed {
            return None;
        }
        entry.removed = true;
        entry.dragging = false;
        Some(entry.glyph)
    }

    /// Returns false for stale handles and removed entries
    pub fn set_dragging(&mut self, body: BodyId, dragging: bool) -> bool {
        match self.find_mut(body) {
            Some(entry) if !entry.removed => {
                entry.dragging = dragging;
                true
            }
            _ => false,
        }
    }

    pub fn is_dragging(&self, body: BodyId) -> bool {
        self.entries
            .iter()
            .any(|e| e.body == body && e.dragging && !e.removed)
    }
}

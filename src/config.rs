//! Scene tunables.
//!
//! Defaults reproduce the reference scene; a partial YAML document can
//! override individual fields.

use serde::Deserialize;

/// Parameters controlling interaction and physics feel
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Downward gravity, px/s²
    pub gravity: f32,
    /// Hold time before a press fires the shockwave, ms
    pub long_press_ms: f64,
    /// Pointer travel that cancels a pending long press, px
    pub press_move_tolerance: f32,
    /// Base shockwave impulse per unit mass
    pub shockwave_strength: f32,
    /// Distance at which the shockwave falloff factor is 1
    pub shockwave_reference_dist: f32,
    /// Odds that a landed glyph becomes a flower (otherwise a tree)
    pub flower_chance: f32,
    /// Horizontal sway impulse amplitude per unit mass
    pub sway_strength: f32,
    /// Sway oscillation rate, radians per ms
    pub sway_rate: f64,
    /// Constant upward bias per unit mass
    pub lift_strength: f32,
    /// Drag spring stiffness, 1/s²
    pub drag_stiffness: f32,
    /// Drag spring damping, 1/s
    pub drag_damping: f32,
    /// Glyph box edge, px
    pub glyph_size: f32,
    /// Poem line advance, px
    pub line_height: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: 980.0,            // pixel-space scene, roughly 1 g
            long_press_ms: 1500.0,
            press_move_tolerance: 20.0,
            shockwave_strength: 260.0,
            shockwave_reference_dist: 1000.0,
            flower_chance: 0.9,
            sway_strength: 18.0,
            sway_rate: 0.002,
            lift_strength: 4.0,
            drag_stiffness: 60.0,
            drag_damping: 8.0,
            glyph_size: 32.0,
            line_height: 40.0,
        }
    }
}

impl SceneConfig {
    /// Parse overrides from YAML; absent fields keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("config parse error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = SceneConfig::default();
        assert_eq!(cfg.long_press_ms, 1500.0);
        assert_eq!(cfg.press_move_tolerance, 20.0);
        assert!((cfg.flower_chance - 0.9).abs() < 1e-6);
        assert!(cfg.gravity > 0.0);
    }

    #[test]
    fn test_partial_yaml_override() {
        let cfg = SceneConfig::from_yaml("flower_chance: 0.5\ngravity: 500.0\n").unwrap();
        assert!((cfg.flower_chance - 0.5).abs() < 1e-6);
        assert!((cfg.gravity - 500.0).abs() < 1e-6);
        // Untouched fields keep defaults
        assert_eq!(cfg.long_press_ms, 1500.0);
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        assert!(SceneConfig::from_yaml("gravity: [not a number]").is_err());
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let cfg = SceneConfig::from_yaml("{}").unwrap();
        assert_eq!(cfg.glyph_size, SceneConfig::default().glyph_size);
    }
}

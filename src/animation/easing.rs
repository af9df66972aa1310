//! Easing functions for smooth animations

/// Easing function types
#[derive(Debug, Clone, Copy, Default)]
pub enum Easing {
    /// Linear interpolation
    Linear,
    /// Fast start, quadratic decelerate
    EaseOut,
    /// Fast start, cubic decelerate (default for ink bloom)
    #[default]
    EaseOutCubic,
    /// Smooth ease-in-out
    EaseInOut,
}

/// Apply easing function to a value t in range [0, 1].
///
/// Input is clamped first: frame-timing jitter can push a progress
/// fraction past 1, and an overshoot must never invert sizes or alphas.
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
    }
}

//! Animation primitives shared by the growth entities
//!
//! Easing curves for bloom motion, and the settled-phase clock that
//! every organism follows once it stops growing.

mod easing;
mod lifecycle;

pub use easing::{ease, Easing};
pub use lifecycle::{LifePhase, Lifecycle};

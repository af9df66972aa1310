//! Rigid-body engine boundary.
//!
//! The solver itself is an external collaborator (rapier). This module
//! exposes only the narrow surface the garden needs: body creation,
//! static/dynamic toggling, impulses, collision-start events, and point
//! queries. The core never reaches into the solver mid-frame.

mod world;

pub use world::{BodyId, PhysicsWorld};

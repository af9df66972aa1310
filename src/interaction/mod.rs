//! Pointer gestures and the character side-table.

mod characters;
mod gesture;

pub use characters::{CharacterEntry, CharacterTable};
pub use gesture::PressTracker;

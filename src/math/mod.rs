pub mod rng;
pub mod vec2;

pub use rng::InkRng;
pub use vec2::Vec2;

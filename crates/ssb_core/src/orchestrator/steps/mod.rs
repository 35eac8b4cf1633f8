//! Pipeline step implementations, one per phase of a slideshow run.

mod assign;
mod concat;
mod discover;
mod render;

pub use assign::AssignEffectsStep;
pub use concat::ConcatStep;
pub use discover::DiscoverStep;
pub use render::RenderStep;

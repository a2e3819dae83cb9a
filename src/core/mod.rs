//! Core building blocks shared by every game engine: player identifiers,
//! board geometry, tensors, and outcome vectors.

pub mod grid;
pub mod player;
pub mod scores;
pub mod tensor;

pub use grid::{Coords, Delta, Grid, Square};
pub use player::PlayerId;
pub use scores::ScoreVector;
pub use tensor::Tensor;

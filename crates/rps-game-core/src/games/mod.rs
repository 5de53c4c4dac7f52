//! Move sets and outcome judging.

mod moves;

pub use moves::{Move, MoveSet, ParseMoveSetError};

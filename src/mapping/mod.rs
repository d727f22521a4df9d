// Mapping module

pub mod cell;
pub mod evaluator;
pub mod grid_map;

pub use cell::*;
pub use evaluator::*;
pub use grid_map::*;

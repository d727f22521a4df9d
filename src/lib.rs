//! rust_hector_matching - grid-based scan matching for 2D SLAM
//!
//! This crate provides a generic occupancy grid with a map <-> world
//! transform and a Gauss-Newton scan matcher that refines a robot pose
//! against such a grid.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod mapping;
pub mod slam;

// Re-export common types for convenience
pub use common::{Point2D, Pose2D, GridSize, Hessian, Gradient};
pub use common::{Cell, MapCoordinates, ScanLikelihood, DrawInterface, DebugInfo};
pub use common::{SlamError, SlamResult};
pub use mapping::{GridMap, GridLikelihood, MapExtents, MapProperties, OccupancyCell, HoleCell};
pub use slam::{MatchMode, MatchResult, ScanMatcher, ScanMatcherConfig};

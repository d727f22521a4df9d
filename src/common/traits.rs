//! Common traits defining the seams between grid maps, likelihood
//! evaluators and the scan matcher

use crate::common::types::*;

/// A single grid cell.
///
/// Concrete variants (occupancy, hole/free, ...) are chosen by the caller
/// through the grid's type parameter; the grid itself only reads `value`.
pub trait Cell: Default {
    /// Scalar content of the cell. `0.0` means "nothing recorded".
    fn value(&self) -> f32;

    /// Revert the cell to its empty state
    fn reset(&mut self);
}

/// Conversion between map (cell index) and world (metric) coordinates
pub trait MapCoordinates {
    /// World coordinates for the given map coordinates
    fn map_to_world(&self, map_point: &Point2D) -> Point2D;

    /// Map coordinates for the given world coordinates
    fn world_to_map(&self, world_point: &Point2D) -> Point2D;

    /// World pose for the given map pose. Yaw is not affected.
    fn map_to_world_pose(&self, map_pose: &Pose2D) -> Pose2D {
        let p = self.map_to_world(&map_pose.position());
        Pose2D::new(p.x, p.y, map_pose.yaw)
    }

    /// Map pose for the given world pose. Yaw is not affected.
    fn world_to_map_pose(&self, world_pose: &Pose2D) -> Pose2D {
        let p = self.world_to_map(&world_pose.position());
        Pose2D::new(p.x, p.y, world_pose.yaw)
    }
}

/// Source of the Hessian/gradient pair of a scan against a map.
///
/// Both the pose and the returned derivatives are expressed in map
/// coordinates.
pub trait ScanLikelihood: MapCoordinates {
    fn hessian_and_gradient(&self, map_pose: &Pose2D, scan: &[Point2D]) -> (Hessian, Gradient);
}

/// Optional drawing hook for observing a scan match
pub trait DrawInterface {
    fn set_scale(&mut self, scale: f64);

    fn set_color(&mut self, r: f64, g: f64, b: f64);

    fn draw_point(&mut self, world_point: &Point2D);

    fn draw_arrow(&mut self, world_pose: &Pose2D);
}

/// Optional hook receiving the Hessian of every matching pass
pub trait DebugInfo {
    fn add_hessian_matrix(&mut self, hessian: &Hessian);
}

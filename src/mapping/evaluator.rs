//! Adapter turning a grid map plus a derivative source into a
//! [`ScanLikelihood`] the scan matcher can consume

use crate::common::{Cell, Gradient, Hessian, MapCoordinates, Point2D, Pose2D, ScanLikelihood};
use crate::mapping::grid_map::GridMap;

/// Borrows a grid read-only and pairs its coordinate transform with a
/// function computing the Hessian and gradient of a scan against it.
pub struct GridLikelihood<'a, C, F>
where
    C: Cell,
    F: Fn(&GridMap<C>, &Pose2D, &[Point2D]) -> (Hessian, Gradient),
{
    grid: &'a GridMap<C>,
    derivatives: F,
}

impl<'a, C, F> GridLikelihood<'a, C, F>
where
    C: Cell,
    F: Fn(&GridMap<C>, &Pose2D, &[Point2D]) -> (Hessian, Gradient),
{
    pub fn new(grid: &'a GridMap<C>, derivatives: F) -> Self {
        Self { grid, derivatives }
    }

    pub fn grid(&self) -> &GridMap<C> {
        self.grid
    }
}

impl<'a, C, F> MapCoordinates for GridLikelihood<'a, C, F>
where
    C: Cell,
    F: Fn(&GridMap<C>, &Pose2D, &[Point2D]) -> (Hessian, Gradient),
{
    fn map_to_world(&self, map_point: &Point2D) -> Point2D {
        self.grid.map_to_world(map_point)
    }

    fn world_to_map(&self, world_point: &Point2D) -> Point2D {
        self.grid.world_to_map(world_point)
    }
}

impl<'a, C, F> ScanLikelihood for GridLikelihood<'a, C, F>
where
    C: Cell,
    F: Fn(&GridMap<C>, &Pose2D, &[Point2D]) -> (Hessian, Gradient),
{
    fn hessian_and_gradient(&self, map_pose: &Pose2D, scan: &[Point2D]) -> (Hessian, Gradient) {
        (self.derivatives)(self.grid, map_pose, scan)
    }
}

//! Generic 2D grid map with a map <-> world coordinate transform
//!
//! Cells live in a contiguous row-major array (`index = y * width + x`).
//! Map coordinates are cell units, world coordinates are metres:
//!
//! ```text
//! map   = (world + offset) / resolution
//! world = map * resolution - offset
//! ```

use std::ops::Deref;

use itertools::iproduct;
use nalgebra::{Affine2, Matrix3, Point2};

use crate::common::{Cell, GridSize, MapCoordinates, Point2D, SlamError, SlamResult};

/// Resolution, size and offset of a grid map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProperties {
    resolution: f64,
    dimensions: GridSize,
    offset: Point2D,
}

impl MapProperties {
    /// * `resolution` - metres per cell
    /// * `dimensions` - map size in cells
    /// * `offset` - metric translation applied before scaling to cells
    pub fn new(resolution: f64, dimensions: GridSize, offset: Point2D) -> Self {
        Self {
            resolution,
            dimensions,
            offset,
        }
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn dimensions(&self) -> GridSize {
        self.dimensions
    }

    pub fn offset(&self) -> Point2D {
        self.offset
    }

    /// Cells per metre
    pub fn scale_to_map(&self) -> f64 {
        1.0 / self.resolution
    }

    pub fn cell_count(&self) -> usize {
        self.dimensions.cell_count()
    }

    pub fn has_equal_dimension_properties(&self, other: &MapProperties) -> bool {
        self.dimensions == other.dimensions
    }

    pub fn has_equal_transformation_properties(&self, other: &MapProperties) -> bool {
        self.resolution == other.resolution && self.offset == other.offset
    }

    /// Whether a point in map coordinates lies outside `[0, size - 1]`
    pub fn point_out_of_map_bounds(&self, map_point: &Point2D) -> bool {
        let max_x = self.dimensions.width as f64 - 1.0;
        let max_y = self.dimensions.height as f64 - 1.0;
        map_point.x < 0.0 || map_point.x > max_x || map_point.y < 0.0 || map_point.y > max_y
    }
}

/// Bounding box (in cells) of all non-empty cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapExtents {
    pub x_max: usize,
    pub y_max: usize,
    pub x_min: usize,
    pub y_min: usize,
}

impl MapExtents {
    fn around(x: usize, y: usize) -> Self {
        Self {
            x_max: x,
            y_max: y,
            x_min: x,
            y_min: y,
        }
    }

    fn include(self, x: usize, y: usize) -> Self {
        Self {
            x_max: self.x_max.max(x),
            y_max: self.y_max.max(y),
            x_min: self.x_min.min(x),
            y_min: self.y_min.min(y),
        }
    }
}

/// Fixed-size grid of cells of type `C`
#[derive(Debug, Clone)]
pub struct GridMap<C: Cell> {
    cells: Vec<C>,
    properties: MapProperties,
    map_t_world: Affine2<f64>,
    world_t_map: Affine2<f64>,
    update_generation: i64,
}

impl<C: Cell> GridMap<C> {
    /// Create a grid with every cell default-constructed and reset.
    ///
    /// Fails if the transform between world and map coordinates cannot be
    /// inverted, which happens for a zero or non-finite resolution.
    pub fn new(resolution: f64, dimensions: GridSize, offset: Point2D) -> SlamResult<Self> {
        if resolution.is_finite() && resolution < 0.0 {
            return Err(SlamError::InvalidParameter(format!(
                "resolution must be positive, got {}",
                resolution
            )));
        }

        let properties = MapProperties::new(resolution, dimensions, offset);
        let scale = properties.scale_to_map();
        let map_t_world = Matrix3::new(
            scale, 0.0, scale * offset.x,
            0.0, scale, scale * offset.y,
            0.0, 0.0, 1.0,
        );
        let world_t_map = Matrix3::new(
            resolution, 0.0, -offset.x,
            0.0, resolution, -offset.y,
            0.0, 0.0, 1.0,
        );
        let finite = |m: &Matrix3<f64>| m.iter().all(|v| v.is_finite());
        if scale == 0.0 || !finite(&map_t_world) || !finite(&world_t_map) {
            return Err(SlamError::NonInvertibleTransform(resolution));
        }
        let map_t_world = Affine2::from_matrix_unchecked(map_t_world);
        let world_t_map = Affine2::from_matrix_unchecked(world_t_map);

        let cells = (0..dimensions.cell_count())
            .map(|_| {
                let mut cell = C::default();
                cell.reset();
                cell
            })
            .collect();

        Ok(Self {
            cells,
            properties,
            map_t_world,
            world_t_map,
            update_generation: -1,
        })
    }

    pub fn properties(&self) -> &MapProperties {
        &self.properties
    }

    pub fn dimensions(&self) -> GridSize {
        self.properties.dimensions
    }

    pub fn resolution(&self) -> f64 {
        self.properties.resolution
    }

    pub fn width(&self) -> usize {
        self.properties.dimensions.width
    }

    pub fn height(&self) -> usize {
        self.properties.dimensions.height
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.width() + x
    }

    /// Cell at grid coordinates. Panics when out of range.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> &C {
        &self.cells[self.index_of(x, y)]
    }

    /// Mutable cell at grid coordinates. Panics when out of range.
    #[inline]
    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut C {
        let index = self.index_of(x, y);
        &mut self.cells[index]
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> &C {
        &self.cells[index]
    }

    #[inline]
    pub fn cell_at_mut(&mut self, index: usize) -> &mut C {
        &mut self.cells[index]
    }

    /// Bounds-checked cell access
    pub fn try_cell(&self, x: usize, y: usize) -> Option<&C> {
        if x < self.width() && y < self.height() {
            Some(self.cell(x, y))
        } else {
            None
        }
    }

    /// Bounds-checked mutable cell access
    pub fn try_cell_mut(&mut self, x: usize, y: usize) -> Option<&mut C> {
        if x < self.width() && y < self.height() {
            Some(self.cell_mut(x, y))
        } else {
            None
        }
    }

    pub fn point_out_of_map_bounds(&self, map_point: &Point2D) -> bool {
        self.properties.point_out_of_map_bounds(map_point)
    }

    /// Reset map
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Reset every cell to its empty state without reallocating
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| c.reset());
    }

    /// Mark the start of a new update pass
    pub fn set_updated(&mut self) {
        self.update_generation += 1;
    }

    /// Starts at -1 and grows by one per [`GridMap::set_updated`]
    pub fn update_generation(&self) -> i64 {
        self.update_generation
    }

    /// Smallest box containing every cell with a non-zero value.
    ///
    /// Scans the whole grid; returns `None` when all cells are empty.
    pub fn extents(&self) -> Option<MapExtents> {
        iproduct!(0..self.width(), 0..self.height())
            .filter(|&(x, y)| self.cell(x, y).value() != 0.0)
            .fold(None, |extents: Option<MapExtents>, (x, y)| {
                Some(match extents {
                    Some(e) => e.include(x, y),
                    None => MapExtents::around(x, y),
                })
            })
    }

    /// Convert a pose covariance from map units to world units.
    ///
    /// Translational terms scale with resolution squared, mixed
    /// translation/rotation terms with resolution, the rotational term is
    /// unchanged.
    pub fn covariance_to_world(&self, map_cov: &Matrix3<f64>) -> Matrix3<f64> {
        let res = self.resolution();
        let res_sq = res * res;
        let mut world_cov = Matrix3::zeros();

        world_cov[(0, 0)] = map_cov[(0, 0)] * res_sq;
        world_cov[(1, 1)] = map_cov[(1, 1)] * res_sq;
        world_cov[(1, 0)] = map_cov[(1, 0)] * res_sq;
        world_cov[(0, 1)] = world_cov[(1, 0)];

        world_cov[(2, 0)] = map_cov[(2, 0)] * res;
        world_cov[(0, 2)] = world_cov[(2, 0)];
        world_cov[(2, 1)] = map_cov[(2, 1)] * res;
        world_cov[(1, 2)] = world_cov[(2, 1)];

        world_cov[(2, 2)] = map_cov[(2, 2)];
        world_cov
    }
}

impl<C: Cell> MapCoordinates for GridMap<C> {
    fn map_to_world(&self, map_point: &Point2D) -> Point2D {
        self.world_t_map
            .transform_point(&Point2::from(*map_point))
            .into()
    }

    fn world_to_map(&self, world_point: &Point2D) -> Point2D {
        self.map_t_world
            .transform_point(&Point2::from(*world_point))
            .into()
    }
}

impl<C: Cell> Deref for GridMap<C> {
    type Target = [C];

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

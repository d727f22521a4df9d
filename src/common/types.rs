//! Common types used throughout rust_hector_matching

use nalgebra::{Matrix3, Point2, Vector2, Vector3};

use crate::utils::angle::normalize_angle;

/// Second derivative of the scan negative log-likelihood w.r.t. (x, y, yaw)
pub type Hessian = Matrix3<f64>;

/// First derivative of the scan log-likelihood w.r.t. (x, y, yaw)
pub type Gradient = Vector3<f64>;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<Point2<f64>> for Point2D {
    fn from(p: Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2D> for Point2<f64> {
    fn from(p: Point2D) -> Self {
        Point2::new(p.x, p.y)
    }
}

/// 2D pose (position + orientation)
///
/// The frame (map cells or world metres) is not part of the type; callers
/// track which frame a value lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub yaw: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, yaw: f64) -> Self {
        Self { x, y, yaw }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, yaw: 0.0 }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.yaw)
    }

    /// Normalize yaw to (-pi, pi]
    pub fn normalize_yaw(&mut self) {
        self.yaw = normalize_angle(self.yaw);
    }

    /// Express a point given in this pose's local frame in the parent frame
    pub fn transform_point(&self, local: &Point2D) -> Point2D {
        let (sin, cos) = self.yaw.sin_cos();
        Point2D::new(
            cos * local.x - sin * local.y + self.x,
            sin * local.x + cos * local.y + self.y,
        )
    }
}

impl From<Vector3<f64>> for Pose2D {
    fn from(v: Vector3<f64>) -> Self {
        Self { x: v[0], y: v[1], yaw: v[2] }
    }
}

impl std::ops::Add<Vector3<f64>> for Pose2D {
    type Output = Pose2D;

    fn add(self, change: Vector3<f64>) -> Pose2D {
        Pose2D::from(self.to_vector() + change)
    }
}

/// Grid dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn square(size: usize) -> Self {
        Self { width: size, height: size }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

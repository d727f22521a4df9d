//! Visualization utilities for rust_hector_matching
//!
//! Records what the scan matcher reports through its diagnostic hooks and
//! renders it with gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{DebugInfo, DrawInterface, Hessian, Point2D, Pose2D, SlamError, SlamResult};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";

    // Semantic colors
    pub const SCAN: &str = "#35C788";
    pub const TRAIL: &str = RED;
}

/// An arrow drawn through [`DrawInterface::draw_arrow`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedArrow {
    pub pose: Pose2D,
    pub color: [f64; 3],
    pub scale: f64,
}

/// A point drawn through [`DrawInterface::draw_point`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPoint {
    pub point: Point2D,
    pub color: [f64; 3],
    pub scale: f64,
}

/// In-memory [`DrawInterface`] that keeps every primitive it receives
#[derive(Debug, Clone)]
pub struct ScanMatchRecorder {
    scale: f64,
    color: [f64; 3],
    arrows: Vec<RecordedArrow>,
    points: Vec<RecordedPoint>,
}

impl ScanMatchRecorder {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            color: [0.0, 0.0, 0.0],
            arrows: Vec::new(),
            points: Vec::new(),
        }
    }

    pub fn arrows(&self) -> &[RecordedArrow] {
        &self.arrows
    }

    pub fn points(&self) -> &[RecordedPoint] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.arrows.clear();
        self.points.clear();
    }

    /// Render the recorded arrows and points into a gnuplot figure
    pub fn to_figure(&self, title: &str) -> Figure {
        let mut fg = Figure::new();
        {
            let axes = fg.axes2d();

            let px: Vec<f64> = self.points.iter().map(|p| p.point.x).collect();
            let py: Vec<f64> = self.points.iter().map(|p| p.point.y).collect();
            axes.points(&px, &py, &[
                Caption("Scan"),
                Color(colors::SCAN),
                PointSymbol('.'),
            ]);

            let tx: Vec<f64> = self.arrows.iter().map(|a| a.pose.x).collect();
            let ty: Vec<f64> = self.arrows.iter().map(|a| a.pose.y).collect();
            axes.lines(&tx, &ty, &[Caption("Estimate"), Color(colors::TRAIL), LineWidth(1.0)]);

            for arrow in &self.arrows {
                let color = hex_color(arrow.color);
                let len = arrow.scale * 2.0;
                let end_x = arrow.pose.x + len * arrow.pose.yaw.cos();
                let end_y = arrow.pose.y + len * arrow.pose.yaw.sin();
                axes.points(&[arrow.pose.x], &[arrow.pose.y], &[
                    Color(color.as_str()),
                    PointSymbol('O'),
                    PointSize(0.8),
                ]);
                axes.lines(&[arrow.pose.x, end_x], &[arrow.pose.y, end_y], &[
                    Color(color.as_str()),
                    LineWidth(2.0),
                ]);
            }

            axes.set_title(title, &[]);
            axes.set_x_label("X [m]", &[]);
            axes.set_y_label("Y [m]", &[]);
            axes.set_aspect_ratio(AutoOption::Fix(1.0));
        }
        fg
    }

    /// Save plot to PNG file
    pub fn save_png(&self, path: &str, title: &str, width: u32, height: u32) -> SlamResult<()> {
        self.to_figure(title)
            .save_to_png(path, width, height)
            .map_err(|e| SlamError::VisualizationError(e.to_string()))
    }
}

impl Default for ScanMatchRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawInterface for ScanMatchRecorder {
    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn set_color(&mut self, r: f64, g: f64, b: f64) {
        self.color = [r, g, b];
    }

    fn draw_point(&mut self, world_point: &Point2D) {
        self.points.push(RecordedPoint {
            point: *world_point,
            color: self.color,
            scale: self.scale,
        });
    }

    fn draw_arrow(&mut self, world_pose: &Pose2D) {
        self.arrows.push(RecordedArrow {
            pose: *world_pose,
            color: self.color,
            scale: self.scale,
        });
    }
}

/// [`DebugInfo`] collecting the Hessian of every matching pass
#[derive(Debug, Clone, Default)]
pub struct HessianLog {
    pub hessians: Vec<Hessian>,
}

impl DebugInfo for HessianLog {
    fn add_hessian_matrix(&mut self, hessian: &Hessian) {
        self.hessians.push(*hessian);
    }
}

fn hex_color(rgb: [f64; 3]) -> String {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_tracks_color_and_scale() {
        let mut rec = ScanMatchRecorder::new();
        rec.set_scale(0.05);
        rec.set_color(0.0, 1.0, 0.0);
        rec.draw_arrow(&Pose2D::new(1.0, 2.0, 0.3));
        rec.set_color(1.0, 0.0, 0.0);
        rec.draw_point(&Point2D::new(0.5, 0.5));

        assert_eq!(rec.arrows().len(), 1);
        assert_eq!(rec.arrows()[0].color, [0.0, 1.0, 0.0]);
        assert_eq!(rec.arrows()[0].scale, 0.05);
        assert_eq!(rec.points()[0].color, [1.0, 0.0, 0.0]);

        rec.clear();
        assert!(rec.arrows().is_empty());
        assert!(rec.points().is_empty());
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color([1.0, 0.0, 0.0]), colors::RED);
        assert_eq!(hex_color([0.0, 0.0, 1.0]), colors::BLUE);
        assert_eq!(hex_color([0.0, 2.0, -1.0]), colors::GREEN);
        assert_eq!(hex_color([0.0, 0.0, 0.0]), colors::BLACK);
    }

    #[test]
    fn test_hessian_log() {
        let mut log = HessianLog::default();
        log.add_hessian_matrix(&Hessian::identity());
        assert_eq!(log.hessians.len(), 1);
    }
}

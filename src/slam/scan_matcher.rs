/*!
 * Gauss-Newton scan-to-map matching
 *
 * Refines a pose estimate so that a laser scan best explains an occupancy
 * grid. Every pass asks a [`ScanLikelihood`] for the Hessian and gradient of
 * the scan at the current estimate (in map coordinates), solves
 * `H * step = gradient` and adds the step to the estimate.
 *
 * The default mode always runs `max_iterations + 1` passes; there is no
 * convergence test. [`MatchMode::EarlyExit`] is available when stopping on a
 * small step is wanted instead.
 */

use log::{debug, trace, warn};
use nalgebra::{Matrix3, Vector3};

use crate::common::{
    Cell, DebugInfo, DrawInterface, Gradient, Hessian, MapCoordinates, Point2D, Pose2D,
    ScanLikelihood, SlamError, SlamResult,
};
use crate::mapping::grid_map::GridMap;
use crate::utils::angle::normalize_angle;

/// How the pass loop terminates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchMode {
    /// Run exactly `max_iterations + 1` passes
    FixedIterations,
    /// Like `FixedIterations`, but stop after the first applied step whose
    /// norm is below `min_step`
    EarlyExit { min_step: f64 },
}

impl Default for MatchMode {
    fn default() -> Self {
        MatchMode::FixedIterations
    }
}

/// Configuration for the scan matcher
#[derive(Debug, Clone)]
pub struct ScanMatcherConfig {
    /// Refinement passes after the initial one
    pub max_iterations: usize,
    /// Largest rotation a single pass may apply [rad]
    pub max_angle_step: f64,
    pub mode: MatchMode,
}

impl Default for ScanMatcherConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            max_angle_step: 0.2,
            mode: MatchMode::FixedIterations,
        }
    }
}

impl ScanMatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    pub fn with_max_angle_step(mut self, max_angle_step: f64) -> Self {
        self.max_angle_step = max_angle_step;
        self
    }

    pub fn with_early_exit(mut self, min_step: f64) -> Self {
        self.mode = MatchMode::EarlyExit { min_step };
        self
    }
}

/// Outcome of a scan match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Refined pose in world coordinates
    pub pose: Pose2D,
    /// Hessian of the last pass, in map coordinates
    pub hessian: Hessian,
    /// Number of passes that queried the likelihood
    pub iterations: usize,
    /// Number of passes that actually moved the estimate
    pub updates: usize,
}

impl MatchResult {
    fn unchanged(pose: Pose2D) -> Self {
        Self {
            pose,
            hessian: Hessian::zeros(),
            iterations: 0,
            updates: 0,
        }
    }

    /// Pose covariance in world units: the inverse of the last Hessian,
    /// rescaled from cells to metres.
    pub fn covariance_world<C: Cell>(&self, grid: &GridMap<C>) -> SlamResult<Matrix3<f64>> {
        let map_cov = self
            .hessian
            .try_inverse()
            .ok_or_else(|| SlamError::NumericalError("hessian is singular".to_string()))?;
        Ok(grid.covariance_to_world(&map_cov))
    }
}

/// Gauss-Newton scan matcher with optional diagnostic hooks
pub struct ScanMatcher<'h> {
    config: ScanMatcherConfig,
    draw_interface: Option<&'h mut dyn DrawInterface>,
    debug_info: Option<&'h mut dyn DebugInfo>,
}

impl<'h> ScanMatcher<'h> {
    pub fn new(config: ScanMatcherConfig) -> Self {
        Self {
            config,
            draw_interface: None,
            debug_info: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ScanMatcherConfig::default())
    }

    /// Report the prior, every intermediate estimate and the scan
    pub fn with_draw_interface(mut self, draw_interface: &'h mut dyn DrawInterface) -> Self {
        self.draw_interface = Some(draw_interface);
        self
    }

    /// Report the Hessian of every pass
    pub fn with_debug_info(mut self, debug_info: &'h mut dyn DebugInfo) -> Self {
        self.debug_info = Some(debug_info);
        self
    }

    pub fn config(&self) -> &ScanMatcherConfig {
        &self.config
    }

    /// Match with the configured iteration budget
    pub fn match_pose<E>(&mut self, prior_world: &Pose2D, likelihood: &E, scan: &[Point2D]) -> MatchResult
    where
        E: ScanLikelihood + ?Sized,
    {
        let max_iterations = self.config.max_iterations;
        self.match_data(prior_world, likelihood, scan, max_iterations)
    }

    /// Refine `prior_world` against the map behind `likelihood`.
    ///
    /// An empty scan returns the prior untouched without querying the
    /// likelihood. Otherwise the estimate is refined in map coordinates for
    /// `max_iterations + 1` passes, its yaw normalized to (-pi, pi] and
    /// converted back to world coordinates. The returned Hessian is the one
    /// from the last pass, even if that pass could not move the estimate.
    pub fn match_data<E>(
        &mut self,
        prior_world: &Pose2D,
        likelihood: &E,
        scan: &[Point2D],
        max_iterations: usize,
    ) -> MatchResult
    where
        E: ScanLikelihood + ?Sized,
    {
        if scan.is_empty() {
            return MatchResult::unchanged(*prior_world);
        }

        let mut estimate = likelihood.world_to_map_pose(prior_world);

        if let Some(draw) = self.draw_interface.as_deref_mut() {
            draw.set_scale(0.05);
            draw.set_color(0.0, 1.0, 0.0);
            draw.draw_arrow(prior_world);
            draw_scan(&mut *draw, &estimate, likelihood, scan);
            draw.set_color(1.0, 0.0, 0.0);
        }

        let mut hessian = Hessian::zeros();
        let mut iterations = 0;
        let mut updates = 0;

        for pass in 0..=max_iterations {
            let (h, gradient) = likelihood.hessian_and_gradient(&estimate, scan);
            hessian = h;
            iterations += 1;

            let step = self.estimate_transformation_step(&hessian, &gradient);
            if let Some(step) = step {
                estimate = estimate + step;
                updates += 1;
            }
            trace!("pass {}: estimate {:?}, step {:?}", pass, estimate, step);

            if let Some(debug_info) = self.debug_info.as_deref_mut() {
                debug_info.add_hessian_matrix(&hessian);
            }
            if pass > 0 {
                if let Some(draw) = self.draw_interface.as_deref_mut() {
                    draw.set_color(pass as f64 / max_iterations as f64, 0.0, 0.0);
                    draw.draw_arrow(&likelihood.map_to_world_pose(&estimate));
                }
            }

            if let (MatchMode::EarlyExit { min_step }, Some(step)) = (self.config.mode, step) {
                if step.norm() < min_step {
                    debug!("step {:.3e} below {:.3e}, stopping after {} passes", step.norm(), min_step, iterations);
                    break;
                }
            }
        }

        if let Some(draw) = self.draw_interface.as_deref_mut() {
            draw.set_color(0.0, 0.0, 1.0);
            draw_scan(&mut *draw, &estimate, likelihood, scan);
        }

        estimate.yaw = normalize_angle(estimate.yaw);

        MatchResult {
            pose: likelihood.map_to_world_pose(&estimate),
            hessian,
            iterations,
            updates,
        }
    }

    /// Solve one Gauss-Newton step, `None` when the pass carries no usable
    /// information. The rotational part is clamped to `max_angle_step`.
    fn estimate_transformation_step(&self, hessian: &Hessian, gradient: &Gradient) -> Option<Vector3<f64>> {
        if hessian[(0, 0)] == 0.0 || hessian[(1, 1)] == 0.0 {
            debug!("degenerate hessian, skipping pass");
            return None;
        }

        let mut step = match solve_step(hessian, gradient) {
            Some(step) => step,
            None => {
                debug!("singular hessian, skipping pass");
                return None;
            }
        };

        let max_angle = self.config.max_angle_step;
        if step[2] > max_angle {
            warn!("search direction angle change too large: {:.3} rad", step[2]);
            step[2] = max_angle;
        } else if step[2] < -max_angle {
            warn!("search direction angle change too large: {:.3} rad", step[2]);
            step[2] = -max_angle;
        }

        Some(step)
    }
}

impl Default for ScanMatcher<'_> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Solve `H * step = gradient` with an LU decomposition
pub fn solve_step(hessian: &Hessian, gradient: &Gradient) -> Option<Vector3<f64>> {
    hessian
        .lu()
        .solve(gradient)
        .filter(|step| step.iter().all(|v| v.is_finite()))
}

fn draw_scan<E>(draw: &mut dyn DrawInterface, map_pose: &Pose2D, likelihood: &E, scan: &[Point2D])
where
    E: MapCoordinates + ?Sized,
{
    draw.set_scale(0.02);
    for point in scan {
        draw.draw_point(&likelihood.map_to_world(&map_pose.transform_point(point)));
    }
}

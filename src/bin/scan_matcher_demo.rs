// Gauss-Newton scan matching sample
//
// Refines a noisy prior pose against a grid map. The Hessian and gradient
// come from a synthetic quadratic likelihood centred on the true pose,
// standing in for an occupancy evaluator.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use rust_hector_matching::utils::{pose_difference_larger_than, to_degrees, to_radians};
use rust_hector_matching::{
    GridLikelihood, GridMap, GridSize, Hessian, MapCoordinates, OccupancyCell, Point2D, Pose2D,
    ScanMatcher, ScanMatcherConfig, SlamError, SlamResult,
};
use rust_hector_matching::utils::ScanMatchRecorder;

const RESOLUTION: f64 = 0.05;
const MAP_SIZE: usize = 400;
const SCAN_POINTS: usize = 360;

fn build_room() -> SlamResult<GridMap<OccupancyCell>> {
    let mut grid = GridMap::<OccupancyCell>::new(RESOLUTION, GridSize::square(MAP_SIZE), Point2D::new(10.0, 10.0))?;
    grid.set_updated();
    let generation = grid.update_generation() as i32;
    for i in 40..360 {
        for &(x, y) in &[(i, 40), (i, 359), (40, i), (359, i)] {
            let cell = grid.cell_mut(x, y);
            cell.log_odds = 2.0;
            cell.update_index = generation;
        }
    }
    Ok(grid)
}

fn main() -> SlamResult<()> {
    env_logger::init();

    let grid = build_room()?;
    if let Some(e) = grid.extents() {
        println!("Map extents: x [{}, {}], y [{}, {}]", e.x_min, e.x_max, e.y_min, e.y_max);
    }

    let truth = Pose2D::new(1.0, -0.5, 0.3);
    let truth_map = grid.world_to_map_pose(&truth);

    let mut rng = StdRng::seed_from_u64(7);
    let xy_noise = Normal::new(0.0, 0.1).map_err(|e| SlamError::InvalidParameter(e.to_string()))?;
    let yaw_noise = Normal::new(0.0, to_radians(15.0)).map_err(|e| SlamError::InvalidParameter(e.to_string()))?;
    let prior = Pose2D::new(
        truth.x + xy_noise.sample(&mut rng),
        truth.y + xy_noise.sample(&mut rng),
        truth.yaw + yaw_noise.sample(&mut rng),
    );

    // Scan points in the sensor frame, in map cells
    let scan: Vec<Point2D> = (0..SCAN_POINTS)
        .map(|i| {
            let a = to_radians(i as f64 * 360.0 / SCAN_POINTS as f64);
            Point2D::new(60.0 * a.cos(), 60.0 * a.sin())
        })
        .collect();

    let likelihood = GridLikelihood::new(&grid, move |_, pose: &Pose2D, points: &[Point2D]| {
        let w = points.len() as f64;
        let h = Hessian::from_diagonal(&Vector3::new(w, w, 10.0 * w));
        (h, h * (truth_map.to_vector() - pose.to_vector()))
    });

    let mut recorder = ScanMatchRecorder::new();
    let config = ScanMatcherConfig::new().with_max_iterations(5);
    let result = ScanMatcher::new(config)
        .with_draw_interface(&mut recorder)
        .match_pose(&prior, &likelihood, &scan);

    println!("Truth:  x={:.3} y={:.3} yaw={:.2} deg", truth.x, truth.y, to_degrees(truth.yaw));
    println!("Prior:  x={:.3} y={:.3} yaw={:.2} deg", prior.x, prior.y, to_degrees(prior.yaw));
    println!(
        "Result: x={:.3} y={:.3} yaw={:.2} deg ({} passes, {} updates)",
        result.pose.x,
        result.pose.y,
        to_degrees(result.pose.yaw),
        result.iterations,
        result.updates
    );
    match result.covariance_world(&grid) {
        Ok(cov) => println!("Covariance (world):\n{}", cov),
        Err(e) => eprintln!("{}", e),
    }

    if pose_difference_larger_than(&result.pose, &truth, 0.01, to_radians(1.0)) {
        println!("Estimate still differs from the true pose");
    }

    std::fs::create_dir_all("img/slam")?;
    match recorder.save_png("img/slam/scan_matching.png", "Scan Matching", 800, 800) {
        Ok(()) => println!("Plot saved to img/slam/scan_matching.png"),
        Err(e) => eprintln!("{}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_hector_matching::Cell;

    #[test]
    fn test_build_room_walls() {
        let grid = build_room().unwrap();
        let e = grid.extents().unwrap();
        assert_eq!((e.x_min, e.x_max, e.y_min, e.y_max), (40, 359, 40, 359));
        assert_eq!(grid.update_generation(), 0);
        assert!(grid.cell(40, 200).is_occupied());
        assert_eq!(grid.cell(200, 200).value(), 0.0);
    }
}

//! End-to-end checks of the grid map and scan matcher public API

use approx::assert_relative_eq;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rust_hector_matching::utils::{normalize_angle, pose_difference_larger_than};
use rust_hector_matching::{
    Cell, Gradient, GridLikelihood, GridMap, GridSize, Hessian, HoleCell, MapCoordinates,
    OccupancyCell, Point2D, Pose2D, ScanMatcher, SlamError,
};

fn reference_grid() -> GridMap<OccupancyCell> {
    GridMap::new(0.1, GridSize::square(100), Point2D::new(5.0, 5.0)).unwrap()
}

fn ring_scan(radius: f64, n: usize) -> Vec<Point2D> {
    (0..n)
        .map(|i| {
            let a = i as f64 * 2.0 * std::f64::consts::PI / n as f64;
            Point2D::new(radius * a.cos(), radius * a.sin())
        })
        .collect()
}

#[test]
fn grid_transform_round_trip_on_random_points() {
    let grid = reference_grid();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let p = Point2D::new(rng.gen_range(0.0..99.0), rng.gen_range(0.0..99.0));
        let back = grid.world_to_map(&grid.map_to_world(&p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
    }
}

#[test]
fn grid_corners_map_to_expected_world_points() {
    let grid = reference_grid();
    let low = grid.map_to_world(&Point2D::new(0.0, 0.0));
    let high = grid.map_to_world(&Point2D::new(99.0, 99.0));
    assert_relative_eq!(low.x, -5.0, epsilon = 1e-9);
    assert_relative_eq!(low.y, -5.0, epsilon = 1e-9);
    assert_relative_eq!(high.x, 4.9, epsilon = 1e-9);
    assert_relative_eq!(high.y, 4.9, epsilon = 1e-9);
}

#[test]
fn zero_resolution_grid_is_rejected() {
    let result = GridMap::<HoleCell>::new(0.0, GridSize::new(10, 10), Point2D::origin());
    assert!(matches!(result, Err(SlamError::NonInvertibleTransform(_))));
}

#[test]
fn extents_follow_written_cells() {
    let mut grid = GridMap::<HoleCell>::new(0.05, GridSize::new(30, 20), Point2D::origin()).unwrap();
    assert!(grid.extents().is_none());

    grid.cell_mut(3, 4).hole = true;
    let e = grid.extents().unwrap();
    assert_eq!((e.x_max, e.y_max, e.x_min, e.y_min), (3, 4, 3, 4));

    let index = grid.index_of(25, 19);
    grid.cell_at_mut(index).hole = true;
    let e = grid.extents().unwrap();
    assert_eq!((e.x_max, e.y_max, e.x_min, e.y_min), (25, 19, 3, 4));

    grid.clear();
    assert!(grid.iter().all(|c| c.value() == 0.0));
    assert!(grid.extents().is_none());
}

#[test]
fn empty_scan_is_identity_for_any_budget() {
    let grid = reference_grid();
    let likelihood = GridLikelihood::new(&grid, |_, _: &Pose2D, _: &[Point2D]| {
        panic!("likelihood must not be queried for an empty scan")
    });
    let prior = Pose2D::new(0.7, -1.3, -2.9);
    for k in [0, 1, 5, 50].iter() {
        let result = ScanMatcher::default().match_data(&prior, &likelihood, &[], *k);
        assert_eq!(result.pose, prior);
    }
}

#[test]
fn match_recovers_offset_pose_on_grid() {
    let grid = reference_grid();
    let truth = Pose2D::new(0.4, -0.3, 0.35);
    let truth_map = grid.world_to_map_pose(&truth);
    let likelihood = GridLikelihood::new(&grid, move |_, pose: &Pose2D, scan: &[Point2D]| {
        let w = scan.len() as f64;
        let h = Hessian::from_diagonal(&Vector3::new(w, w, 5.0 * w));
        (h, h * (truth_map.to_vector() - pose.to_vector()))
    });

    let prior = Pose2D::new(0.2, -0.1, 0.0);
    let result = ScanMatcher::default().match_data(&prior, &likelihood, &ring_scan(20.0, 90), 5);

    assert!(!pose_difference_larger_than(&result.pose, &truth, 1e-6, 1e-6));
    assert_eq!(result.iterations, 6);
    assert_relative_eq!(result.hessian[(0, 0)], 90.0);
}

#[test]
fn rotation_per_pass_never_exceeds_clamp() {
    let grid = reference_grid();
    let likelihood = GridLikelihood::new(&grid, |_, _: &Pose2D, _: &[Point2D]| {
        (Hessian::identity() * 0.01, Gradient::new(0.0, 0.0, 3.0))
    });
    let prior = Pose2D::new(0.0, 0.0, 0.0);
    let result = ScanMatcher::default().match_data(&prior, &likelihood, &ring_scan(10.0, 16), 0);
    assert_relative_eq!(result.pose.yaw, 0.2, epsilon = 1e-12);
    assert_relative_eq!(result.pose.x, 0.0, epsilon = 1e-9);
}

#[test]
fn degenerate_hessian_keeps_translation() {
    let grid = reference_grid();
    let likelihood = GridLikelihood::new(&grid, |_, _: &Pose2D, _: &[Point2D]| {
        let mut h = Hessian::identity();
        h[(0, 0)] = 0.0;
        (h, Gradient::new(5.0, -5.0, 0.1))
    });
    let prior = Pose2D::new(1.5, -2.5, 7.0);
    let result = ScanMatcher::default().match_data(&prior, &likelihood, &ring_scan(10.0, 16), 10);
    assert_relative_eq!(result.pose.x, prior.x, epsilon = 1e-9);
    assert_relative_eq!(result.pose.y, prior.y, epsilon = 1e-9);
    assert_relative_eq!(result.pose.yaw, normalize_angle(7.0), epsilon = 1e-12);
    assert_eq!(result.updates, 0);
}

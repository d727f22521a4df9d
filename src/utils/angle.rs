//! Angle and pose helpers
//!
//! All angles are in radians.

use std::f64::consts::PI;

use crate::common::Pose2D;

const TWO_PI: f64 = 2.0 * PI;

/// Normalize angle to [0, 2pi) using a floored modulo
pub fn normalize_angle_pos(angle: f64) -> f64 {
    ((angle % TWO_PI) + TWO_PI) % TWO_PI
}

/// Normalize angle to (-pi, pi]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = normalize_angle_pos(angle);
    if a > PI {
        a - TWO_PI
    } else {
        a
    }
}

pub fn sqr(val: f64) -> f64 {
    val * val
}

pub fn to_degrees(rad: f64) -> f64 {
    rad * (180.0 / PI)
}

pub fn to_radians(deg: f64) -> f64 {
    deg * (PI / 180.0)
}

/// Check whether two poses differ by more than the given thresholds.
///
/// True if the planar distance exceeds `distance_thresh`, or if the
/// shortest angular gap between the headings exceeds `angle_thresh`.
/// Headings are expected to already lie in (-pi, pi].
pub fn pose_difference_larger_than(
    pose1: &Pose2D,
    pose2: &Pose2D,
    distance_thresh: f64,
    angle_thresh: f64,
) -> bool {
    if pose1.position().distance(&pose2.position()) > distance_thresh {
        return true;
    }

    let mut angle_diff = pose1.yaw - pose2.yaw;
    if angle_diff > PI {
        angle_diff -= TWO_PI;
    } else if angle_diff < -PI {
        angle_diff += TWO_PI;
    }

    angle_diff.abs() > angle_thresh
}

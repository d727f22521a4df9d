//! Utility modules for rust_hector_matching

pub mod angle;
pub mod visualization;

pub use angle::*;
pub use visualization::{colors, HessianLog, ScanMatchRecorder};

// SLAM algorithms module

pub mod scan_matcher;

pub use scan_matcher::{MatchMode, MatchResult, ScanMatcher, ScanMatcherConfig};

//! Common types, traits, and error definitions for rust_hector_matching
//!
//! This module provides the building blocks shared by the grid maps and
//! the scan matcher.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;

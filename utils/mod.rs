//! Utility functions and data structures
//!
//! This module contains helper code used throughout the early kernel.

pub mod logger;

// Re-export commonly used utilities
pub use self::logger::{default_level, BootLogger};

//! Architecture support
//!
//! The register model and derived queries compile on every host so they can
//! be tested; only the privileged access port is restricted to AArch64.

pub mod arm64;

pub use arm64::*;

//! BHARMOS - early boot layer of an AArch64 kernel
//!
//! This crate provides the pieces the kernel needs before anything else
//! exists: a data-driven model of AArch64 system register layouts, a single
//! privileged access port that moves raw values in and out of those
//! registers, derived queries such as the current exception level, and a
//! byte-oriented console used to report boot state.

#![cfg_attr(not(test), no_std)]

// Architecture-specific code
pub mod arch;

// Boot sequence glue
pub mod boot;

pub mod config;

// Device drivers
pub mod drivers;

// Utility code
pub mod utils;

use core::fmt;

pub use arch::arm64::cpu::sysreg::LayoutError;
pub use arch::arm64::ExceptionLevel;

/// BHARMOS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common error type for BHARMOS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An override value does not fit the width of its field
    FieldOverflow {
        register: &'static str,
        field: &'static str,
        value: u64,
        width: u32,
    },
    /// The register layout has no field with this name
    UnknownField {
        register: &'static str,
        field: &'static str,
    },
    /// A snapshot was encoded against a descriptor it was not decoded from
    DescriptorMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// The register cannot be written
    ReadOnlyRegister(&'static str),
    /// Vector base address is not 2 KiB aligned
    MisalignedVectorBase(u64),
    /// A decoded value that the architecture does not allow
    UnexpectedHardwareState {
        register: &'static str,
        field: &'static str,
        value: u64,
    },
    /// Invalid register layout
    Layout(LayoutError),
}

impl Error {
    /// Whether the boot sequence must stop on this error.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Error::UnexpectedHardwareState { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FieldOverflow {
                register,
                field,
                value,
                width,
            } => write!(
                f,
                "value {:#x} does not fit {}-bit field {}.{}",
                value, width, register, field
            ),
            Error::UnknownField { register, field } => {
                write!(f, "{} has no field named {}", register, field)
            }
            Error::DescriptorMismatch { expected, found } => write!(
                f,
                "snapshot of {} cannot be encoded as {}",
                found, expected
            ),
            Error::ReadOnlyRegister(name) => write!(f, "{} is read-only", name),
            Error::MisalignedVectorBase(addr) => {
                write!(f, "vector base {:#x} is not 2 KiB aligned", addr)
            }
            Error::UnexpectedHardwareState {
                register,
                field,
                value,
            } => write!(
                f,
                "unexpected hardware state: {}.{} = {:#x}",
                register, field, value
            ),
            Error::Layout(err) => write!(f, "invalid register layout: {}", err),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(err: LayoutError) -> Self {
        Error::Layout(err)
    }
}

/// Result type alias
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_hardware_state_is_fatal() {
        let fatal = Error::UnexpectedHardwareState {
            register: "CurrentEL",
            field: "EL",
            value: 7,
        };
        assert!(fatal.is_fatal());
        assert!(!Error::ReadOnlyRegister("CurrentEL").is_fatal());
        assert!(!Error::FieldOverflow {
            register: "CurrentEL",
            field: "EL",
            value: 4,
            width: 2,
        }
        .is_fatal());
    }

    #[test]
    fn test_error_display() {
        let err = Error::FieldOverflow {
            register: "SCTLR_EL1",
            field: "TCF",
            value: 4,
            width: 2,
        };
        assert_eq!(
            err.to_string(),
            "value 0x4 does not fit 2-bit field SCTLR_EL1.TCF"
        );
        assert_eq!(
            Error::ReadOnlyRegister("CurrentEL").to_string(),
            "CurrentEL is read-only"
        );
    }
}

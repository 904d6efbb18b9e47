//! ARM64 (AArch64) Architecture Support for BHARMOS
//!
//! This module provides the AArch64 pieces the early kernel relies on:
//! - System register layouts and the privileged access port
//! - Derived queries (exception level, exception syndrome, saved state)
//!
//! ## Architecture Overview
//!
//! ARM64 uses the AArch64 execution state with the following exception levels:
//! - EL0: Application level (User)
//! - EL1: OS kernel level (Supervisor)
//! - EL2: Hypervisor level (for virtualization)
//! - EL3: Secure monitor level (for TrustZone)
//!
//! BHARMOS is entered at EL1 or higher; the boot banner reports which.
//!
//! ## References
//! - [ARM Architecture Reference Manual ARMv8-A](https://developer.arm.com/documentation/ddi0487/latest)

use core::fmt;

pub mod cpu;


// Re-export key types and functions
pub use cpu::*;

/// ARM64 architecture version
pub const ARCH_VERSION: &str = "arm64";

/// ARM64 exception levels (EL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ExceptionLevel {
    /// EL0 - Application level
    EL0 = 0,
    /// EL1 - OS kernel level
    EL1 = 1,
    /// EL2 - Hypervisor level
    EL2 = 2,
    /// EL3 - Secure monitor level
    EL3 = 3,
}

impl ExceptionLevel {
    /// Convert a raw `CurrentEL.EL` value, `None` outside `0..=3`.
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match raw {
            0 => Some(ExceptionLevel::EL0),
            1 => Some(ExceptionLevel::EL1),
            2 => Some(ExceptionLevel::EL2),
            3 => Some(ExceptionLevel::EL3),
            _ => None,
        }
    }

    /// Numeric level
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// ASCII digit for the level, `b'0'..=b'3'`
    pub const fn as_ascii_digit(self) -> u8 {
        b'0' + self as u8
    }
}

impl fmt::Display for ExceptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EL{}", self.as_u8())
    }
}

// ARM64 PSTATE (Processor State) flags
bitflags::bitflags! {
    /// PSTATE flags as saved in SPSR_ELx
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PStateFlags: u64 {
        /// Negative condition flag
        const N = 1 << 31;
        /// Zero condition flag
        const Z = 1 << 30;
        /// Carry condition flag
        const C = 1 << 29;
        /// Overflow condition flag
        const V = 1 << 28;
        /// Debug mask bit
        const D = 1 << 9;
        /// Asynchronous abort mask bit
        const A = 1 << 8;
        /// IRQ mask bit
        const I = 1 << 7;
        /// FIQ mask bit
        const F = 1 << 6;
    }
}

/// ARM64 exception syndrome class (ESR_ELx.EC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionClass {
    /// Unknown reason
    Unknown,
    /// Trapped WFI or WFE instruction
    WfiWfe,
    /// Trapped access to SVE/SIMD/FP registers
    SimdFp,
    /// Illegal execution state
    IllegalExecution,
    /// SVC instruction in AArch64 state
    Svc64,
    /// HVC instruction in AArch64 state
    Hvc64,
    /// SMC instruction in AArch64 state
    Smc64,
    /// Trapped MSR, MRS or System instruction
    MsrMrs,
    /// Trapped SVE access
    Sve,
    /// Instruction abort from a lower exception level
    InstrAbortLowerEl,
    /// Instruction abort taken without a change in exception level
    InstrAbortCurrentEl,
    /// PC alignment fault
    PcAlignment,
    /// Data abort from a lower exception level
    DataAbortLowerEl,
    /// Data abort taken without a change in exception level
    DataAbortCurrentEl,
    /// SP alignment fault
    SpAlignment,
    /// Trapped floating-point exception from AArch64 state
    Fp64,
    /// SError interrupt
    SError,
    /// Breakpoint from a lower exception level
    BreakpointLowerEl,
    /// Breakpoint taken without a change in exception level
    BreakpointCurrentEl,
    /// Software step from a lower exception level
    SoftwareStepLowerEl,
    /// Software step taken without a change in exception level
    SoftwareStepCurrentEl,
    /// Watchpoint from a lower exception level
    WatchpointLowerEl,
    /// Watchpoint taken without a change in exception level
    WatchpointCurrentEl,
    /// BRK instruction in AArch64 state
    Brk64,
    /// Any other class, carrying the raw 6-bit value
    Other(u8),
}

impl ExceptionClass {
    /// Decode a 6-bit EC value
    pub const fn from_raw(ec: u8) -> Self {
        match ec {
            0x00 => ExceptionClass::Unknown,
            0x01 => ExceptionClass::WfiWfe,
            0x07 => ExceptionClass::SimdFp,
            0x0E => ExceptionClass::IllegalExecution,
            0x15 => ExceptionClass::Svc64,
            0x16 => ExceptionClass::Hvc64,
            0x17 => ExceptionClass::Smc64,
            0x18 => ExceptionClass::MsrMrs,
            0x19 => ExceptionClass::Sve,
            0x20 => ExceptionClass::InstrAbortLowerEl,
            0x21 => ExceptionClass::InstrAbortCurrentEl,
            0x22 => ExceptionClass::PcAlignment,
            0x24 => ExceptionClass::DataAbortLowerEl,
            0x25 => ExceptionClass::DataAbortCurrentEl,
            0x26 => ExceptionClass::SpAlignment,
            0x2C => ExceptionClass::Fp64,
            0x2F => ExceptionClass::SError,
            0x30 => ExceptionClass::BreakpointLowerEl,
            0x31 => ExceptionClass::BreakpointCurrentEl,
            0x32 => ExceptionClass::SoftwareStepLowerEl,
            0x33 => ExceptionClass::SoftwareStepCurrentEl,
            0x34 => ExceptionClass::WatchpointLowerEl,
            0x35 => ExceptionClass::WatchpointCurrentEl,
            0x3C => ExceptionClass::Brk64,
            other => ExceptionClass::Other(other),
        }
    }

    /// Raw 6-bit EC value
    pub const fn raw(self) -> u8 {
        match self {
            ExceptionClass::Unknown => 0x00,
            ExceptionClass::WfiWfe => 0x01,
            ExceptionClass::SimdFp => 0x07,
            ExceptionClass::IllegalExecution => 0x0E,
            ExceptionClass::Svc64 => 0x15,
            ExceptionClass::Hvc64 => 0x16,
            ExceptionClass::Smc64 => 0x17,
            ExceptionClass::MsrMrs => 0x18,
            ExceptionClass::Sve => 0x19,
            ExceptionClass::InstrAbortLowerEl => 0x20,
            ExceptionClass::InstrAbortCurrentEl => 0x21,
            ExceptionClass::PcAlignment => 0x22,
            ExceptionClass::DataAbortLowerEl => 0x24,
            ExceptionClass::DataAbortCurrentEl => 0x25,
            ExceptionClass::SpAlignment => 0x26,
            ExceptionClass::Fp64 => 0x2C,
            ExceptionClass::SError => 0x2F,
            ExceptionClass::BreakpointLowerEl => 0x30,
            ExceptionClass::BreakpointCurrentEl => 0x31,
            ExceptionClass::SoftwareStepLowerEl => 0x32,
            ExceptionClass::SoftwareStepCurrentEl => 0x33,
            ExceptionClass::WatchpointLowerEl => 0x34,
            ExceptionClass::WatchpointCurrentEl => 0x35,
            ExceptionClass::Brk64 => 0x3C,
            ExceptionClass::Other(ec) => ec,
        }
    }
}

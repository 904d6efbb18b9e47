//! System register model and access for ARM64
//!
//! Register layouts are explicit field tables ([`RegisterDescriptor`]),
//! decoded into [`RegisterSnapshot`]s by pure functions. The only code that
//! touches real registers sits behind the [`RegisterPort`] trait.
//! Reference: ARM DDI 0487, D13 (AArch64 System Register Descriptions)

/// Field tables and layout validation
pub mod layout;

/// Decoded register values
pub mod snapshot;

/// Register tables for the supported registers
pub mod defs;

/// SCTLR_EL1 layout
pub mod sctlr;

/// Access port trait
pub mod port;

/// In-memory register file
pub mod emulated;

// Re-export commonly used types
pub use defs::{ALL_REGISTERS, CURRENT_EL, ELR_EL1, ESR_EL1, FAR_EL1, SPSR_EL1, VBAR_EL1};
pub use emulated::EmulatedSysRegs;
pub use layout::{Field, FieldKind, LayoutError, RegisterDescriptor, MAX_FIELDS, REGISTER_WIDTH};
pub use port::RegisterPort;
pub use sctlr::SCTLR_EL1;
pub use snapshot::{decode, encode, RegisterSnapshot};

/// `(op0, op1, CRn, CRm, op2)` operands of MRS/MSR
///
/// The hardware port assembles every access in the generic
/// `S<op0>_<op1>_C<n>_C<m>_<op2>` form from these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysRegEncoding {
    pub op0: u8,
    pub op1: u8,
    pub crn: u8,
    pub crm: u8,
    pub op2: u8,
}

impl SysRegEncoding {
    pub const fn new(op0: u8, op1: u8, crn: u8, crm: u8, op2: u8) -> Self {
        Self {
            op0,
            op1,
            crn,
            crm,
            op2,
        }
    }
}

/// Supported system registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SysReg {
    /// CurrentEL - Current Exception Level
    CurrentEl,
    /// SCTLR_EL1 - System Control Register (EL1)
    SctlrEl1,
    /// ESR_EL1 - Exception Syndrome Register (EL1)
    EsrEl1,
    /// ELR_EL1 - Exception Link Register (EL1)
    ElrEl1,
    /// FAR_EL1 - Fault Address Register (EL1)
    FarEl1,
    /// SPSR_EL1 - Saved Program Status Register (EL1)
    SpsrEl1,
    /// VBAR_EL1 - Vector Base Address Register (EL1)
    VbarEl1,
}

impl SysReg {
    /// Number of supported registers
    pub const COUNT: usize = 7;

    /// Every supported register, in declaration order
    pub const ALL: [SysReg; Self::COUNT] = [
        SysReg::CurrentEl,
        SysReg::SctlrEl1,
        SysReg::EsrEl1,
        SysReg::ElrEl1,
        SysReg::FarEl1,
        SysReg::SpsrEl1,
        SysReg::VbarEl1,
    ];

    /// Architectural register name
    pub const fn name(self) -> &'static str {
        match self {
            SysReg::CurrentEl => "CurrentEL",
            SysReg::SctlrEl1 => "SCTLR_EL1",
            SysReg::EsrEl1 => "ESR_EL1",
            SysReg::ElrEl1 => "ELR_EL1",
            SysReg::FarEl1 => "FAR_EL1",
            SysReg::SpsrEl1 => "SPSR_EL1",
            SysReg::VbarEl1 => "VBAR_EL1",
        }
    }

    /// MRS/MSR encoding
    pub const fn encoding(self) -> SysRegEncoding {
        match self {
            SysReg::CurrentEl => SysRegEncoding::new(3, 0, 4, 2, 2),
            SysReg::SctlrEl1 => SysRegEncoding::new(3, 0, 1, 0, 0),
            SysReg::EsrEl1 => SysRegEncoding::new(3, 0, 5, 2, 0),
            SysReg::ElrEl1 => SysRegEncoding::new(3, 0, 4, 0, 1),
            SysReg::FarEl1 => SysRegEncoding::new(3, 0, 6, 0, 0),
            SysReg::SpsrEl1 => SysRegEncoding::new(3, 0, 4, 0, 0),
            SysReg::VbarEl1 => SysRegEncoding::new(3, 0, 12, 0, 0),
        }
    }

    /// CurrentEL has no MSR form.
    pub const fn is_writable(self) -> bool {
        !matches!(self, SysReg::CurrentEl)
    }

    /// Register table for this register
    pub fn descriptor(self) -> &'static RegisterDescriptor {
        match self {
            SysReg::CurrentEl => &CURRENT_EL,
            SysReg::SctlrEl1 => &SCTLR_EL1,
            SysReg::EsrEl1 => &ESR_EL1,
            SysReg::ElrEl1 => &ELR_EL1,
            SysReg::FarEl1 => &FAR_EL1,
            SysReg::SpsrEl1 => &SPSR_EL1,
            SysReg::VbarEl1 => &VBAR_EL1,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

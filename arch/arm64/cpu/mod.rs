//! CPU module for ARM64
//!
//! This module provides CPU-specific functionality including:
//! - System register layouts and the access port
//! - Queries derived from register values
//! - The hardware port and halt loop on AArch64 targets

pub mod sysreg;

use crate::arch::arm64::{ExceptionClass, ExceptionLevel, PStateFlags};
use crate::{Error, Result};
use sysreg::{
    RegisterDescriptor, RegisterPort, RegisterSnapshot, SysReg, CURRENT_EL, ESR_EL1, SPSR_EL1,
    VBAR_EL1,
};

cfg_if::cfg_if! {
    if #[cfg(target_arch = "aarch64")] {
        pub mod regs;
        pub use regs::Aarch64SysRegs;

        /// Park the core for good
        pub fn halt() -> ! {
            loop {
                aarch64_cpu::asm::wfe();
            }
        }
    } else {
        /// Park the thread for good
        pub fn halt() -> ! {
            loop {
                core::hint::spin_loop();
            }
        }
    }
}

/// Alignment required of VBAR_EL1
pub const VECTOR_TABLE_ALIGN: u64 = 0x800;

/// Get current exception level
pub fn current_exception_level<P: RegisterPort + ?Sized>(port: &P) -> Result<ExceptionLevel> {
    read_exception_level(port, &CURRENT_EL)
}

/// Read CurrentEL through `layout` and derive the exception level
pub fn read_exception_level<P: RegisterPort + ?Sized>(
    port: &P,
    layout: &RegisterDescriptor,
) -> Result<ExceptionLevel> {
    exception_level_from(&port.read(layout))
}

/// Exception level recorded in a CurrentEL snapshot.
///
/// A value outside `0..=3`, or a snapshot without an `EL` field, means the
/// hardware is not in a state this kernel can run in.
pub fn exception_level_from(snapshot: &RegisterSnapshot<'_>) -> Result<ExceptionLevel> {
    let descriptor = snapshot.descriptor();
    if descriptor.reg() != SysReg::CurrentEl {
        return Err(Error::DescriptorMismatch {
            expected: CURRENT_EL.name(),
            found: descriptor.name(),
        });
    }

    let el = snapshot.get("EL").ok_or(Error::UnexpectedHardwareState {
        register: descriptor.name(),
        field: "EL",
        value: snapshot.raw(),
    })?;

    ExceptionLevel::from_raw(el).ok_or(Error::UnexpectedHardwareState {
        register: descriptor.name(),
        field: "EL",
        value: el,
    })
}

/// Decoded ESR_EL1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionSyndrome {
    /// Exception class
    pub class: ExceptionClass,
    /// 32-bit trapped instruction
    pub il: bool,
    /// Instruction specific syndrome
    pub iss: u32,
}

impl ExceptionSyndrome {
    /// Split a raw ESR value
    pub fn from_snapshot(snapshot: &RegisterSnapshot<'_>) -> Result<Self> {
        Ok(Self {
            class: ExceptionClass::from_raw(snapshot.field("EC")? as u8),
            il: snapshot.field("IL")? != 0,
            iss: snapshot.field("ISS")? as u32,
        })
    }
}

/// Read and decode ESR_EL1
pub fn exception_syndrome<P: RegisterPort + ?Sized>(port: &P) -> Result<ExceptionSyndrome> {
    ExceptionSyndrome::from_snapshot(&port.read(&ESR_EL1))
}

/// Mode field of SPSR_EL1, `M[4:0]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedMode {
    /// EL0 with SP_EL0
    EL0t,
    /// EL1 with SP_EL0
    EL1t,
    /// EL1 with SP_EL1
    EL1h,
    /// EL2 with SP_EL0
    EL2t,
    /// EL2 with SP_EL2
    EL2h,
    /// EL3 with SP_EL0
    EL3t,
    /// EL3 with SP_EL3
    EL3h,
    /// Exception taken from AArch32, raw `M[4:0]`
    AArch32(u8),
    /// Reserved AArch64 encoding, raw `M[3:0]`
    Unknown(u8),
}

impl SavedMode {
    /// Decode `nRW` and `M[3:0]`
    pub const fn from_raw(nrw: bool, m: u8) -> Self {
        if nrw {
            return SavedMode::AArch32(0x10 | (m & 0xF));
        }
        match m & 0xF {
            0b0000 => SavedMode::EL0t,
            0b0100 => SavedMode::EL1t,
            0b0101 => SavedMode::EL1h,
            0b1000 => SavedMode::EL2t,
            0b1001 => SavedMode::EL2h,
            0b1100 => SavedMode::EL3t,
            0b1101 => SavedMode::EL3h,
            other => SavedMode::Unknown(other),
        }
    }

    /// Exception level the mode belongs to, AArch64 modes only
    pub const fn exception_level(self) -> Option<ExceptionLevel> {
        match self {
            SavedMode::EL0t => Some(ExceptionLevel::EL0),
            SavedMode::EL1t | SavedMode::EL1h => Some(ExceptionLevel::EL1),
            SavedMode::EL2t | SavedMode::EL2h => Some(ExceptionLevel::EL2),
            SavedMode::EL3t | SavedMode::EL3h => Some(ExceptionLevel::EL3),
            SavedMode::AArch32(_) | SavedMode::Unknown(_) => None,
        }
    }
}

/// Decoded SPSR_EL1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedProgramStatus {
    pub mode: SavedMode,
    pub flags: PStateFlags,
}

impl SavedProgramStatus {
    pub fn from_snapshot(snapshot: &RegisterSnapshot<'_>) -> Result<Self> {
        let nrw = snapshot.field("nRW")? != 0;
        let m = snapshot.field("M")? as u8;
        Ok(Self {
            mode: SavedMode::from_raw(nrw, m),
            flags: PStateFlags::from_bits_truncate(snapshot.raw()),
        })
    }
}

/// Read and decode SPSR_EL1
pub fn saved_program_status<P: RegisterPort + ?Sized>(port: &P) -> Result<SavedProgramStatus> {
    SavedProgramStatus::from_snapshot(&port.read(&SPSR_EL1))
}

/// Current exception vector base address
pub fn vector_base<P: RegisterPort + ?Sized>(port: &P) -> Result<u64> {
    let vba = port.read(&VBAR_EL1).field("VBA")?;
    Ok(vba << 11)
}

/// Point VBAR_EL1 at a new vector table.
///
/// # Safety
/// `addr` must hold a valid vector table for EL1. Exceptions taken after the
/// write vector through it.
pub unsafe fn set_vector_base<P: RegisterPort + ?Sized>(port: &mut P, addr: u64) -> Result<()> {
    if addr % VECTOR_TABLE_ALIGN != 0 {
        return Err(Error::MisalignedVectorBase(addr));
    }
    unsafe { port.modify(&VBAR_EL1, &[("VBA", addr >> 11)])? };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysreg::{EmulatedSysRegs, Field};
    use test_case::test_case;

    // CurrentEL with a 3-bit EL field, as a layout that can hold levels above 3
    static WIDE_EL_FIELDS: &[Field] = &[
        Field::res0("RES0_0", 0, 2),
        Field::value("EL", 2, 3, "Exception level"),
        Field::res0("RES0_5", 5, 59),
    ];

    static NO_EL_FIELDS: &[Field] = &[Field::res0("RES0_0", 0, 64)];

    #[test_case(0b0000, ExceptionLevel::EL0)]
    #[test_case(0b0100, ExceptionLevel::EL1)]
    #[test_case(0b1000, ExceptionLevel::EL2)]
    #[test_case(0b1100, ExceptionLevel::EL3)]
    #[test_case(0b0111, ExceptionLevel::EL1 ; "reserved bits ignored")]
    #[test_case(0xFFFF_FFFF_FFFF_FFF0, ExceptionLevel::EL0 ; "high noise ignored")]
    fn test_current_exception_level(raw: u64, expected: ExceptionLevel) {
        let regs = EmulatedSysRegs::new().with_value(SysReg::CurrentEl, raw);
        assert_eq!(current_exception_level(&regs), Ok(expected));
    }

    #[test]
    fn test_out_of_range_el_is_fatal() {
        let layout =
            RegisterDescriptor::try_new("CurrentEL", SysReg::CurrentEl, WIDE_EL_FIELDS).unwrap();
        let err = exception_level_from(&layout.decode(0b10000)).unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedHardwareState {
                register: "CurrentEL",
                field: "EL",
                value: 4,
            }
        );
        assert!(err.is_fatal());

        let regs = EmulatedSysRegs::new().with_value(SysReg::CurrentEl, 0b11100);
        assert_eq!(
            read_exception_level(&regs, &layout),
            Err(Error::UnexpectedHardwareState {
                register: "CurrentEL",
                field: "EL",
                value: 7,
            })
        );
    }

    #[test]
    fn test_missing_el_field_is_fatal() {
        let layout =
            RegisterDescriptor::try_new("CurrentEL", SysReg::CurrentEl, NO_EL_FIELDS).unwrap();
        let err = exception_level_from(&layout.decode(0b1000)).unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedHardwareState {
                register: "CurrentEL",
                field: "EL",
                value: 0b1000,
            }
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_exception_level_from_wrong_register() {
        let snapshot = VBAR_EL1.decode(0b0100);
        assert_eq!(
            exception_level_from(&snapshot),
            Err(Error::DescriptorMismatch {
                expected: "CurrentEL",
                found: "VBAR_EL1",
            })
        );
    }

    #[test]
    fn test_exception_syndrome_svc() {
        let regs = EmulatedSysRegs::new().with_value(SysReg::EsrEl1, 0x5600_002A);
        let syndrome = exception_syndrome(&regs).unwrap();
        assert_eq!(syndrome.class, ExceptionClass::Svc64);
        assert!(syndrome.il);
        assert_eq!(syndrome.iss, 0x2A);
    }

    #[test]
    fn test_exception_syndrome_data_abort() {
        // Data abort at EL1, 16-bit instruction flag clear, DFSC translation fault level 3
        let regs = EmulatedSysRegs::new().with_value(SysReg::EsrEl1, (0x25 << 26) | 0x07);
        let syndrome = exception_syndrome(&regs).unwrap();
        assert_eq!(syndrome.class, ExceptionClass::DataAbortCurrentEl);
        assert!(!syndrome.il);
        assert_eq!(syndrome.iss, 0x07);
    }

    #[test_case(0b00101, SavedMode::EL1h)]
    #[test_case(0b00100, SavedMode::EL1t)]
    #[test_case(0b00000, SavedMode::EL0t)]
    #[test_case(0b01001, SavedMode::EL2h)]
    #[test_case(0b01101, SavedMode::EL3h)]
    #[test_case(0b00001, SavedMode::Unknown(1))]
    #[test_case(0b10011, SavedMode::AArch32(0x13) ; "aarch32 supervisor")]
    fn test_saved_mode(m: u64, expected: SavedMode) {
        let regs = EmulatedSysRegs::new().with_value(SysReg::SpsrEl1, m);
        assert_eq!(saved_program_status(&regs).unwrap().mode, expected);
    }

    #[test]
    fn test_saved_program_status_flags() {
        let regs = EmulatedSysRegs::new().with_value(SysReg::SpsrEl1, 0x6000_03C5);
        let status = saved_program_status(&regs).unwrap();
        assert_eq!(status.mode, SavedMode::EL1h);
        assert_eq!(status.mode.exception_level(), Some(ExceptionLevel::EL1));
        assert_eq!(
            status.flags,
            PStateFlags::Z | PStateFlags::C | PStateFlags::D | PStateFlags::A | PStateFlags::I | PStateFlags::F
        );
    }

    #[test]
    fn test_vector_base_round_trip() {
        let mut regs = EmulatedSysRegs::new();
        unsafe { set_vector_base(&mut regs, 0x4008_0800).unwrap() };
        assert_eq!(vector_base(&regs), Ok(0x4008_0800));
        assert_eq!(regs.write_count(), 1);
    }

    #[test_case(0x4008_0001)]
    #[test_case(0x4008_0400)]
    fn test_set_vector_base_rejects_misaligned(addr: u64) {
        let mut regs = EmulatedSysRegs::new().with_value(SysReg::VbarEl1, 0x4000_0000);
        let result = unsafe { set_vector_base(&mut regs, addr) };
        assert_eq!(result, Err(Error::MisalignedVectorBase(addr)));
        assert_eq!(regs.value(SysReg::VbarEl1), 0x4000_0000);
        assert_eq!(regs.write_count(), 0);
    }
}

//! Register access port
//!
//! [`RegisterPort`] is the only seam through which raw values reach or leave
//! a system register. The hardware implementation lives in
//! [`crate::arch::arm64::cpu::regs`]; [`super::EmulatedSysRegs`] backs tests.

use super::layout::RegisterDescriptor;
use super::snapshot::{decode, encode, RegisterSnapshot};
use super::SysReg;
use crate::{Error, Result};

/// Moves raw 64-bit values in and out of system registers.
///
/// Every access orders against surrounding memory operations: an
/// implementation must not let the compiler move loads or stores across a
/// read or a write, and writes must be complete and context-synchronized
/// before `write_raw` returns.
pub trait RegisterPort {
    /// Read the raw register value.
    fn read_raw(&self, reg: SysReg) -> u64;

    /// Write a raw register value.
    ///
    /// # Safety
    /// The write takes effect immediately and may change how every following
    /// instruction executes (SCTLR_EL1 toggles the MMU and caches, VBAR_EL1
    /// moves the exception vectors). The caller must make sure the new value
    /// is consistent with the state the rest of the kernel relies on.
    unsafe fn write_raw(&mut self, reg: SysReg, value: u64) -> Result<()>;

    /// Read a register and decode it with `descriptor`.
    fn read<'d>(&self, descriptor: &'d RegisterDescriptor) -> RegisterSnapshot<'d> {
        let raw = self.read_raw(descriptor.reg());
        log::trace!("mrs {} -> {:#018x}", descriptor.name(), raw);
        decode(descriptor, raw)
    }

    /// Write a fully formed value.
    ///
    /// Read-only registers are rejected before anything is written.
    ///
    /// # Safety
    /// See [`write_raw`](Self::write_raw).
    unsafe fn write(&mut self, descriptor: &RegisterDescriptor, raw: u64) -> Result<()> {
        let reg = descriptor.reg();
        if !reg.is_writable() {
            return Err(Error::ReadOnlyRegister(reg.name()));
        }
        log::debug!("msr {} <- {:#018x}", descriptor.name(), raw);
        unsafe { self.write_raw(reg, raw) }
    }

    /// Read, replace some fields, write back. Returns the value written.
    ///
    /// An encode error leaves the register untouched.
    ///
    /// # Safety
    /// See [`write_raw`](Self::write_raw).
    unsafe fn modify(
        &mut self,
        descriptor: &RegisterDescriptor,
        overrides: &[(&'static str, u64)],
    ) -> Result<u64> {
        let reg = descriptor.reg();
        if !reg.is_writable() {
            return Err(Error::ReadOnlyRegister(reg.name()));
        }
        let snapshot = self.read(descriptor);
        let raw = encode(descriptor, &snapshot, overrides)?;
        unsafe { self.write(descriptor, raw)? };
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::arm64::cpu::sysreg::{EmulatedSysRegs, CURRENT_EL, SCTLR_EL1, VBAR_EL1};

    #[test]
    fn test_read_decodes() {
        let regs = EmulatedSysRegs::new().with_value(SysReg::CurrentEl, 0b1000);
        let snapshot = regs.read(&CURRENT_EL);
        assert_eq!(snapshot.get("EL"), Some(2));
        assert_eq!(snapshot.raw(), 0b1000);
    }

    #[test]
    fn test_write_read_only_register() {
        let mut regs = EmulatedSysRegs::at_exception_level(crate::ExceptionLevel::EL1);
        let result = unsafe { regs.write(&CURRENT_EL, 0b1100) };
        assert_eq!(result, Err(Error::ReadOnlyRegister("CurrentEL")));
        assert_eq!(regs.value(SysReg::CurrentEl), 0b0100);
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn test_modify_keeps_other_bits() {
        let mut regs = EmulatedSysRegs::new().with_value(SysReg::SctlrEl1, 0x30D0_0800);
        let written = unsafe { regs.modify(&SCTLR_EL1, &[("M", 1), ("I", 1)]) }.unwrap();
        assert_eq!(written, 0x30D0_1801);
        assert_eq!(regs.value(SysReg::SctlrEl1), 0x30D0_1801);
        assert_eq!(regs.write_count(), 1);
    }

    #[test]
    fn test_modify_overflow_writes_nothing() {
        let mut regs = EmulatedSysRegs::new().with_value(SysReg::SctlrEl1, 0x30D0_0800);
        let result = unsafe { regs.modify(&SCTLR_EL1, &[("TCF", 4)]) };
        assert_eq!(
            result,
            Err(Error::FieldOverflow {
                register: "SCTLR_EL1",
                field: "TCF",
                value: 4,
                width: 2,
            })
        );
        assert_eq!(regs.value(SysReg::SctlrEl1), 0x30D0_0800);
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn test_modify_partial_override_list_is_all_or_nothing() {
        let mut regs = EmulatedSysRegs::new().with_value(SysReg::VbarEl1, 0x4000_0000);
        let result = unsafe { regs.modify(&VBAR_EL1, &[("VBA", 0x1), ("RES0_0", 0x800)]) };
        assert!(matches!(result, Err(Error::FieldOverflow { field: "RES0_0", .. })));
        assert_eq!(regs.value(SysReg::VbarEl1), 0x4000_0000);
        assert_eq!(regs.write_count(), 0);
    }
}

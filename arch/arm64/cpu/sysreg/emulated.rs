//! In-memory register file
//!
//! Stands in for the hardware port on hosted builds and in tests. Values are
//! stored as written; nothing is masked, so reserved-bit handling is visible.

use super::port::RegisterPort;
use super::SysReg;
use crate::{Error, ExceptionLevel, Result};

/// Register file backed by plain memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmulatedSysRegs {
    values: [u64; SysReg::COUNT],
    writes: usize,
}

impl EmulatedSysRegs {
    /// All registers zero, which reads as EL0
    pub const fn new() -> Self {
        Self {
            values: [0; SysReg::COUNT],
            writes: 0,
        }
    }

    /// Register file whose CurrentEL reports `el`
    pub const fn at_exception_level(el: ExceptionLevel) -> Self {
        let mut regs = Self::new();
        regs.values[SysReg::CurrentEl.index()] = (el.as_u8() as u64) << 2;
        regs
    }

    /// Builder form of [`set`](Self::set)
    pub const fn with_value(mut self, reg: SysReg, value: u64) -> Self {
        self.values[reg.index()] = value;
        self
    }

    /// Preload a register, bypassing the port and the write counter.
    ///
    /// Works for read-only registers too, which is how tests model the
    /// hardware changing underneath the kernel.
    pub fn set(&mut self, reg: SysReg, value: u64) {
        self.values[reg.index()] = value;
    }

    /// Current stored value
    pub fn value(&self, reg: SysReg) -> u64 {
        self.values[reg.index()]
    }

    /// Number of writes accepted through the port
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl RegisterPort for EmulatedSysRegs {
    fn read_raw(&self, reg: SysReg) -> u64 {
        self.values[reg.index()]
    }

    unsafe fn write_raw(&mut self, reg: SysReg, value: u64) -> Result<()> {
        if !reg.is_writable() {
            return Err(Error::ReadOnlyRegister(reg.name()));
        }
        self.values[reg.index()] = value;
        self.writes += 1;
        Ok(())
    }
}

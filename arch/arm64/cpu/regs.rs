//! Hardware register access for ARM64
//!
//! [`Aarch64SysRegs`] is the one implementation of [`RegisterPort`] that
//! executes `mrs`/`msr`. Every access is a single instruction in a single
//! macro-generated `asm!` block, addressed by the register's
//! [`SysRegEncoding`] in the generic `S<op0>_<op1>_C<n>_C<m>_<op2>` form.
//! None of the blocks is `nomem`, so the compiler treats each one as a memory
//! clobber and cannot move loads or stores across it.

use aarch64_cpu::asm::barrier;

use super::sysreg::{RegisterPort, SysReg, SysRegEncoding};
use crate::{Error, Result};

/// Read the system register `$reg`
macro_rules! mrs {
    ($reg:expr) => {{
        const ENC: SysRegEncoding = $reg.encoding();
        let value: u64;
        // SAFETY: the port is only constructed at EL1 or higher, where every
        // register in `SysReg` is readable.
        unsafe {
            core::arch::asm!(
                "mrs {x}, S{op0}_{op1}_C{crn}_C{crm}_{op2}",
                x = out(reg) value,
                op0 = const ENC.op0,
                op1 = const ENC.op1,
                crn = const ENC.crn,
                crm = const ENC.crm,
                op2 = const ENC.op2,
                options(nostack, preserves_flags),
            );
        }
        value
    }};
}

/// Write the system register `$reg`, as a full barrier
macro_rules! msr {
    ($reg:expr, $value:expr) => {{
        const ENC: SysRegEncoding = $reg.encoding();
        let value: u64 = $value;
        // SAFETY: writability at the current level is the port's contract;
        // the effect of the value is the caller's.
        unsafe {
            barrier::dsb(barrier::SY);
            core::arch::asm!(
                "msr S{op0}_{op1}_C{crn}_C{crm}_{op2}, {x}",
                x = in(reg) value,
                op0 = const ENC.op0,
                op1 = const ENC.op1,
                crn = const ENC.crn,
                crm = const ENC.crm,
                op2 = const ENC.op2,
                options(nostack, preserves_flags),
            );
            barrier::isb(barrier::SY);
        }
    }};
}

/// System registers of the executing core
#[derive(Debug)]
pub struct Aarch64SysRegs {
    _private: (),
}

impl Aarch64SysRegs {
    /// Create the port.
    ///
    /// # Safety
    /// The caller must be executing at EL1 or higher. Accessing EL1 registers
    /// from EL0 raises an undefined instruction exception.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl RegisterPort for Aarch64SysRegs {
    #[inline]
    fn read_raw(&self, reg: SysReg) -> u64 {
        match reg {
            SysReg::CurrentEl => mrs!(SysReg::CurrentEl),
            SysReg::SctlrEl1 => mrs!(SysReg::SctlrEl1),
            SysReg::EsrEl1 => mrs!(SysReg::EsrEl1),
            SysReg::ElrEl1 => mrs!(SysReg::ElrEl1),
            SysReg::FarEl1 => mrs!(SysReg::FarEl1),
            SysReg::SpsrEl1 => mrs!(SysReg::SpsrEl1),
            SysReg::VbarEl1 => mrs!(SysReg::VbarEl1),
        }
    }

    #[inline]
    unsafe fn write_raw(&mut self, reg: SysReg, value: u64) -> Result<()> {
        match reg {
            SysReg::CurrentEl => return Err(Error::ReadOnlyRegister(reg.name())),
            SysReg::SctlrEl1 => msr!(SysReg::SctlrEl1, value),
            SysReg::EsrEl1 => msr!(SysReg::EsrEl1, value),
            SysReg::ElrEl1 => msr!(SysReg::ElrEl1, value),
            SysReg::FarEl1 => msr!(SysReg::FarEl1, value),
            SysReg::SpsrEl1 => msr!(SysReg::SpsrEl1, value),
            SysReg::VbarEl1 => msr!(SysReg::VbarEl1, value),
        }
        Ok(())
    }
}

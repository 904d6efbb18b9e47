//! Register tables
//!
//! Layouts follow ARM DDI 0487 for an ARMv8.0-A baseline; bits that later
//! extensions define are listed as RES0 here. Every table is a `static`, so a
//! bad table fails to compile.

use super::layout::{Field, RegisterDescriptor};
use super::sctlr::SCTLR_EL1;
use super::SysReg;

const CURRENT_EL_FIELDS: &[Field] = &[
    Field::res0("RES0_0", 0, 2),
    Field::value("EL", 2, 2, "Current exception level"),
    Field::res0("RES0_4", 4, 60),
];

/// CurrentEL - Current Exception Level
pub static CURRENT_EL: RegisterDescriptor =
    RegisterDescriptor::new("CurrentEL", SysReg::CurrentEl, CURRENT_EL_FIELDS);

const ESR_EL1_FIELDS: &[Field] = &[
    Field::value("ISS", 0, 25, "Instruction specific syndrome"),
    Field::value("IL", 25, 1, "Instruction length for synchronous exceptions"),
    Field::value("EC", 26, 6, "Exception class"),
    Field::res0("RES0_32", 32, 32),
];

/// ESR_EL1 - Exception Syndrome Register
pub static ESR_EL1: RegisterDescriptor =
    RegisterDescriptor::new("ESR_EL1", SysReg::EsrEl1, ESR_EL1_FIELDS);

const ELR_EL1_FIELDS: &[Field] = &[Field::value("ADDR", 0, 64, "Return address")];

/// ELR_EL1 - Exception Link Register
pub static ELR_EL1: RegisterDescriptor =
    RegisterDescriptor::new("ELR_EL1", SysReg::ElrEl1, ELR_EL1_FIELDS);

const FAR_EL1_FIELDS: &[Field] = &[Field::value(
    "VA",
    0,
    64,
    "Faulting virtual address for synchronous exceptions taken to EL1",
)];

/// FAR_EL1 - Fault Address Register
pub static FAR_EL1: RegisterDescriptor =
    RegisterDescriptor::new("FAR_EL1", SysReg::FarEl1, FAR_EL1_FIELDS);

const SPSR_EL1_FIELDS: &[Field] = &[
    Field::value("M", 0, 4, "Exception level and selected stack pointer"),
    Field::value("nRW", 4, 1, "Execution state, 0 for AArch64"),
    Field::res0("RES0_5", 5, 1),
    Field::value("F", 6, 1, "FIQ interrupt mask"),
    Field::value("I", 7, 1, "IRQ interrupt mask"),
    Field::value("A", 8, 1, "SError interrupt mask"),
    Field::value("D", 9, 1, "Debug exception mask"),
    Field::value("BTYPE", 10, 2, "Branch type indicator (FEAT_BTI)"),
    Field::value("SSBS", 12, 1, "Speculative store bypass (FEAT_SSBS)"),
    Field::value("ALLINT", 13, 1, "All IRQ or FIQ interrupts mask (FEAT_NMI)"),
    Field::res0("RES0_14", 14, 6),
    Field::value("IL", 20, 1, "Illegal execution state"),
    Field::value("SS", 21, 1, "Software step"),
    Field::value("PAN", 22, 1, "Privileged access never (FEAT_PAN)"),
    Field::value("UAO", 23, 1, "User access override (FEAT_UAO)"),
    Field::value("DIT", 24, 1, "Data independent timing (FEAT_DIT)"),
    Field::value("TCO", 25, 1, "Tag check override (FEAT_MTE)"),
    Field::res0("RES0_26", 26, 2),
    Field::value("V", 28, 1, "Overflow condition flag"),
    Field::value("C", 29, 1, "Carry condition flag"),
    Field::value("Z", 30, 1, "Zero condition flag"),
    Field::value("N", 31, 1, "Negative condition flag"),
    Field::res0("RES0_32", 32, 32),
];

/// SPSR_EL1 - Saved Program Status Register, for exceptions taken from AArch64
pub static SPSR_EL1: RegisterDescriptor =
    RegisterDescriptor::new("SPSR_EL1", SysReg::SpsrEl1, SPSR_EL1_FIELDS);

const VBAR_EL1_FIELDS: &[Field] = &[
    Field::res0("RES0_0", 0, 11),
    Field::value("VBA", 11, 53, "Vector base address, bits [63:11]"),
];

/// VBAR_EL1 - Vector Base Address Register
pub static VBAR_EL1: RegisterDescriptor =
    RegisterDescriptor::new("VBAR_EL1", SysReg::VbarEl1, VBAR_EL1_FIELDS);

/// Every register table, in [`SysReg::ALL`] order
pub static ALL_REGISTERS: [&RegisterDescriptor; SysReg::COUNT] = [
    &CURRENT_EL,
    &SCTLR_EL1,
    &ESR_EL1,
    &ELR_EL1,
    &FAR_EL1,
    &SPSR_EL1,
    &VBAR_EL1,
];

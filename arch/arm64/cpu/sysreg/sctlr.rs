//! System Control Register layout for ARM64
//!
//! SCTLR_EL1 controls MMU, alignment, caching and endianness for EL1 and EL0.
//! Reference: ARM DDI 0487, SCTLR_EL1

use super::layout::{Field, RegisterDescriptor};
use super::SysReg;

const SCTLR_EL1_FIELDS: &[Field] = &[
    Field::value("M", 0, 1, "MMU enable for EL1&0 stage 1 address translation"),
    Field::value("A", 1, 1, "Alignment check enable"),
    Field::value("C", 2, 1, "Stage 1 cacheability control for data accesses"),
    Field::value("SA", 3, 1, "SP alignment check enable for EL1"),
    Field::value("SA0", 4, 1, "SP alignment check enable for EL0"),
    Field::value("CP15BEN", 5, 1, "System instruction memory barrier enable (AArch32 EL0)"),
    Field::value("nAA", 6, 1, "Non-aligned access (FEAT_LSE2)"),
    Field::value("ITD", 7, 1, "IT disable (AArch32 EL0)"),
    Field::value("SED", 8, 1, "SETEND instruction disable (AArch32 EL0)"),
    Field::value("UMA", 9, 1, "User mask access to PSTATE.{D, A, I, F}"),
    Field::value("EnRCTX", 10, 1, "EL0 access to CFP, DVP and CPP RCTX (FEAT_SPECRES)"),
    Field::value("EOS", 11, 1, "Exception exit is context synchronizing (FEAT_ExS)"),
    Field::value("I", 12, 1, "Stage 1 cacheability control for instruction accesses"),
    Field::value("EnDB", 13, 1, "Pointer authentication with APDBKey_EL1 (FEAT_PAuth)"),
    Field::value("DZE", 14, 1, "EL0 DC ZVA enable"),
    Field::value("UCT", 15, 1, "EL0 access to CTR_EL0 enable"),
    Field::value("nTWI", 16, 1, "EL0 WFI does not trap"),
    Field::res0("RES0_17", 17, 1),
    Field::value("nTWE", 18, 1, "EL0 WFE does not trap"),
    Field::value("WXN", 19, 1, "Write permission implies execute-never"),
    Field::value("TSCXT", 20, 1, "Trap EL0 access to SCXTNUM_EL0 (FEAT_CSV2)"),
    Field::value("IESB", 21, 1, "Implicit error synchronization event (FEAT_IESB)"),
    Field::value("EIS", 22, 1, "Exception entry is context synchronizing (FEAT_ExS)"),
    Field::value("SPAN", 23, 1, "Set privileged access never on exception to EL1 (FEAT_PAN)"),
    Field::value("E0E", 24, 1, "Endianness of data accesses at EL0"),
    Field::value("EE", 25, 1, "Endianness of data accesses at EL1 and stage 1 table walks"),
    Field::value("UCI", 26, 1, "EL0 cache maintenance instructions enable"),
    Field::value("EnDA", 27, 1, "Pointer authentication with APDAKey_EL1 (FEAT_PAuth)"),
    Field::value("nTLSMD", 28, 1, "No trap of LDM/STM to device memory (FEAT_LSMAOC)"),
    Field::value("LSMAOE", 29, 1, "LDM/STM atomicity and ordering enable (FEAT_LSMAOC)"),
    Field::value("EnIB", 30, 1, "Pointer authentication with APIBKey_EL1 (FEAT_PAuth)"),
    Field::value("EnIA", 31, 1, "Pointer authentication with APIAKey_EL1 (FEAT_PAuth)"),
    Field::res0("RES0_32", 32, 3),
    Field::value("BT0", 35, 1, "PAC branch type compatibility at EL0 (FEAT_BTI)"),
    Field::value("BT1", 36, 1, "PAC branch type compatibility at EL1 (FEAT_BTI)"),
    Field::value("ITFSB", 37, 1, "Tag check fault synchronization (FEAT_MTE)"),
    Field::value("TCF0", 38, 2, "Tag check fault behavior at EL0 (FEAT_MTE)"),
    Field::value("TCF", 40, 2, "Tag check fault behavior at EL1 (FEAT_MTE)"),
    Field::value("ATA0", 42, 1, "Allocation tag access at EL0 (FEAT_MTE)"),
    Field::value("ATA", 43, 1, "Allocation tag access at EL1 (FEAT_MTE)"),
    Field::value("DSSBS", 44, 1, "Default PSTATE.SSBS on exception entry (FEAT_SSBS)"),
    Field::value("TWEDEn", 45, 1, "TWE delay enable (FEAT_TWED)"),
    Field::value("TWEDEL", 46, 4, "TWE delay (FEAT_TWED)"),
    Field::res0("RES0_50", 50, 14),
];

/// SCTLR_EL1 - System Control Register EL1
pub static SCTLR_EL1: RegisterDescriptor =
    RegisterDescriptor::new("SCTLR_EL1", SysReg::SctlrEl1, SCTLR_EL1_FIELDS);

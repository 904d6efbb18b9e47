//! Build script for BHARMOS
//!
//! Generates the linker script for bare-metal AArch64 builds and passes it to
//! the kernel binary. Hosted builds (tests, the emulated boot report) link
//! normally.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    if arch == "aarch64" && os == "none" {
        let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
        let script = generate_aarch64_linker_script(&out_dir);
        println!("cargo:rustc-link-arg-bins=-T{}", script.display());
    }
}

fn generate_aarch64_linker_script(out_dir: &str) -> PathBuf {
    let script = r#"
/* AArch64 linker script for BHARMOS, QEMU virt */
ENTRY(_start)

MEMORY {
    RAM (rwx) : ORIGIN = 0x40080000, LENGTH = 128M  /* Image load address for -kernel */
}

SECTIONS {
    .text : {
        KEEP(*(.text.boot))    /* _start must be first */
        *(.text .text.*)
    } > RAM

    .rodata : ALIGN(8) {
        *(.rodata .rodata.*)
    } > RAM

    .data : ALIGN(8) {
        *(.data .data.*)
    } > RAM

    .bss (NOLOAD) : ALIGN(16) {
        __bss_start = .;
        *(.bss .bss.*)
        *(COMMON)
        . = ALIGN(16);
        __bss_end = .;
    } > RAM

    /* Boot stack, primary CPU only */
    .stack (NOLOAD) : ALIGN(4096) {
        __boot_stack_bottom = .;
        . = . + 64 * 1024;
        __boot_stack_top = .;
    } > RAM

    /DISCARD/ : {
        *(.eh_frame)
        *(.comment)
        *(.note*)
    }
}
"#;

    let path = Path::new(out_dir).join("link-aarch64.ld");
    fs::write(&path, script).expect("failed to write linker script");
    path
}

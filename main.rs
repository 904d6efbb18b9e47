//! BHARMOS main entry point
//!
//! On `aarch64-unknown-none` this is the kernel image: `_start` sets up the
//! boot stack, clears `.bss` and jumps to `kernel_main`. On a hosted target it
//! runs the same boot report against an emulated register file at EL1.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(all(target_os = "none", not(target_arch = "aarch64")))]
compile_error!("bare-metal builds are only supported on aarch64");

#[cfg(all(target_arch = "aarch64", target_os = "none"))]
mod kernel {
    use core::arch::global_asm;
    use core::panic::PanicInfo;

    use bharmos::arch::arm64::cpu::{self, Aarch64SysRegs};
    use bharmos::boot;
    use bharmos::config::BootConfig;
    use bharmos::drivers::uart::MmioByteSink;
    use bharmos::utils::BootLogger;

    static LOGGER: BootLogger<MmioByteSink> = BootLogger::new();

    // x0 holds the device tree address on entry and is left untouched.
    global_asm!(
        ".section .text.boot, \"ax\"",
        ".global _start",
        "_start:",
        "    mrs     x1, mpidr_el1",
        "    and     x1, x1, #0xff",
        "    cbnz    x1, 2f",
        "    ldr     x1, =__boot_stack_top",
        "    mov     sp, x1",
        "    ldr     x1, =__bss_start",
        "    ldr     x2, =__bss_end",
        "1:  cmp     x1, x2",
        "    b.hs    3f",
        "    str     xzr, [x1], #8",
        "    b       1b",
        "3:  bl      {main}",
        "2:  wfe",
        "    b       2b",
        main = sym kernel_main,
    );

    extern "C" fn kernel_main(_dtb: usize) -> ! {
        let config = BootConfig::default();

        // SAFETY: QEMU virt maps the PL011 data register at `uart_base`. The
        // two sinks are used one after the other on a single core.
        let (Some(mut console), Some(log_sink)) = (unsafe {
            (
                MmioByteSink::new(config.uart_base),
                MmioByteSink::new(config.uart_base),
            )
        }) else {
            cpu::halt()
        };
        LOGGER.install(log_sink, config.log_level).ok();

        // SAFETY: QEMU enters the kernel image at EL1, or EL2 with
        // virtualization enabled.
        let regs = unsafe { Aarch64SysRegs::new() };
        boot::kmain(&regs, &mut console)
    }

    #[panic_handler]
    fn panic(info: &PanicInfo<'_>) -> ! {
        log::error!("{}", info);
        cpu::halt()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    use std::io::{self, Write};

    use bharmos::arch::arm64::cpu::sysreg::EmulatedSysRegs;
    use bharmos::boot;
    use bharmos::config::BootConfig;
    use bharmos::drivers::uart::ByteSink;
    use bharmos::utils::BootLogger;
    use bharmos::ExceptionLevel;

    struct HostSink<W>(W);

    impl<W: Write> ByteSink for HostSink<W> {
        fn write_byte(&mut self, byte: u8) {
            let _ = self.0.write_all(&[byte]);
        }
    }

    static LOGGER: BootLogger<HostSink<io::Stderr>> = BootLogger::new();

    let config = BootConfig::default();
    LOGGER.install(HostSink(io::stderr()), config.log_level).ok();

    let regs = EmulatedSysRegs::at_exception_level(ExceptionLevel::EL1);
    let mut console = HostSink(io::stdout());
    if let Err(err) = boot::run(&regs, &mut console) {
        boot::report_fatal(&mut console, &err);
        let _ = console.0.flush();
        std::process::exit(1);
    }
}

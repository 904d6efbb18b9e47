//! Boot sequence
//!
//! Prints the banner, reports the exception level the kernel was entered at,
//! and turns hardware-state errors into a halt. The register port and the
//! console are passed in, so the whole sequence runs against
//! [`EmulatedSysRegs`](crate::arch::arm64::cpu::sysreg::EmulatedSysRegs) and a
//! [`BufferSink`](crate::drivers::uart::BufferSink) on the host.

use crate::arch::arm64::cpu::{
    self,
    sysreg::{RegisterDescriptor, RegisterPort, CURRENT_EL},
};
use crate::config::BANNER;
use crate::drivers::uart::{ByteSink, SinkWriter};
use crate::{Error, ExceptionLevel, Result};

const EL_PREFIX: &str = "Current EL: ";

/// Write the banner, then `Current EL: <digit>`.
///
/// The banner is written before the register is read, so it is on the
/// console even when the read fails.
pub fn report_exception_level<P, S>(port: &P, sink: &mut S) -> Result<ExceptionLevel>
where
    P: RegisterPort + ?Sized,
    S: ByteSink + ?Sized,
{
    report_exception_level_with(port, &CURRENT_EL, sink)
}

/// [`report_exception_level`] reading CurrentEL through `layout`
pub fn report_exception_level_with<P, S>(
    port: &P,
    layout: &RegisterDescriptor,
    sink: &mut S,
) -> Result<ExceptionLevel>
where
    P: RegisterPort + ?Sized,
    S: ByteSink + ?Sized,
{
    sink.write_str(BANNER);

    let el = cpu::read_exception_level(port, layout)?;
    sink.write_str(EL_PREFIX);
    sink.write_byte(el.as_ascii_digit());
    sink.write_byte(b'\n');
    Ok(el)
}

/// Run the boot sequence and return the entry exception level
pub fn run<P, S>(port: &P, sink: &mut S) -> Result<ExceptionLevel>
where
    P: RegisterPort + ?Sized,
    S: ByteSink + ?Sized,
{
    let el = report_exception_level(port, sink)?;
    log::info!("entered at {}", el);
    if el < ExceptionLevel::EL1 {
        log::warn!("running at {}, system registers are not accessible", el);
    }
    Ok(el)
}

/// Kernel main: boot, then park the core
pub fn kmain<P, S>(port: &P, sink: &mut S) -> !
where
    P: RegisterPort + ?Sized,
    S: ByteSink + ?Sized,
{
    match run(port, sink) {
        Ok(_) => cpu::halt(),
        Err(err) => fatal(sink, err),
    }
}

/// Put a fatal error on the console
pub fn report_fatal<S: ByteSink + ?Sized>(sink: &mut S, err: &Error) {
    let mut out = SinkWriter::new(sink);
    let _ = core::fmt::Write::write_fmt(&mut out, format_args!("FATAL: {}\n", err));
}

/// Log `err`, print it, and halt
pub fn fatal<S: ByteSink + ?Sized>(sink: &mut S, err: Error) -> ! {
    log::error!("{}", err);
    report_fatal(sink, &err);
    cpu::halt()
}

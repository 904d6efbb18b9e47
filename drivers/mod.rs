//! Device drivers module
//!
//! Only the boot console lives here. Everything else the kernel talks to
//! comes up after the early boot layer.

pub mod uart;

pub use uart::{BufferSink, ByteSink, MmioByteSink, SinkWriter};

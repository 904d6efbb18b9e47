//! Boot console logger
//!
//! Backend for the `log` facade used before anything else in the kernel is
//! up. Records are written as `[LEVEL] target: message` lines through a
//! [`ByteSink`]. Until a sink is installed every record is dropped, which is
//! what host tests see.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

use crate::drivers::uart::{ByteSink, SinkWriter};

/// Level selected by the `debug`/`verbose` features
pub const fn default_level() -> LevelFilter {
    if cfg!(feature = "verbose") {
        LevelFilter::Trace
    } else if cfg!(feature = "debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Write one record as a single console line
pub fn format_record<S: ByteSink>(out: &mut SinkWriter<S>, record: &Record<'_>) -> fmt::Result {
    writeln!(out, "[{}] {}: {}", record.level(), record.target(), record.args())
}

struct Console<S> {
    out: SinkWriter<S>,
    level: LevelFilter,
}

/// `log` backend writing to a boot console
pub struct BootLogger<S> {
    console: Mutex<Option<Console<S>>>,
}

impl<S: ByteSink + Send> BootLogger<S> {
    /// Logger with no sink attached
    pub const fn new() -> Self {
        Self {
            console: Mutex::new(None),
        }
    }

    /// Attach `sink`, replacing any previous one, without registering.
    pub fn attach(&self, sink: S, level: LevelFilter) {
        *self.console.lock() = Some(Console {
            out: SinkWriter::new(sink),
            level,
        });
    }

    /// Attach `sink` and register as the global logger.
    ///
    /// Fails if another logger was registered first; the sink stays attached
    /// either way.
    pub fn install(&'static self, sink: S, level: LevelFilter) -> Result<(), SetLoggerError>
    where
        S: 'static,
    {
        self.attach(sink, level);
        log::set_logger(self)?;
        log::set_max_level(level);
        Ok(())
    }

    /// Run `f` on the attached sink while holding the lock
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.console.lock().as_mut().map(|console| f(console.out.sink()))
    }

    /// Detach and return the sink
    pub fn take(&self) -> Option<S> {
        self.console
            .lock()
            .take()
            .map(|console| console.out.into_inner())
    }
}

impl<S: ByteSink + Send> Default for BootLogger<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ByteSink + Send> Log for BootLogger<S> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.console
            .try_lock()
            .and_then(|console| console.as_ref().map(|c| metadata.level() <= c.level))
            .unwrap_or(false)
    }

    fn log(&self, record: &Record<'_>) {
        // try_lock: a panic raised while logging must still reach the halt loop.
        if let Some(mut guard) = self.console.try_lock() {
            if let Some(console) = guard.as_mut() {
                if record.level() <= console.level {
                    let _ = format_record(&mut console.out, record);
                }
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::uart::BufferSink;
    use log::Level;

    #[test]
    fn test_format_record() {
        let mut out = SinkWriter::new(BufferSink::<64>::new());
        format_record(
            &mut out,
            &Record::builder()
                .level(Level::Error)
                .target("bharmos::boot")
                .args(format_args!("CurrentEL.EL = {:#x}", 7))
                .build(),
        )
        .unwrap();
        assert_eq!(out.sink().as_str(), Some("[ERROR] bharmos::boot: CurrentEL.EL = 0x7\n"));
    }

    #[test]
    fn test_default_level_from_features() {
        let expected = if cfg!(feature = "verbose") {
            LevelFilter::Trace
        } else if cfg!(feature = "debug") {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        assert_eq!(default_level(), expected);
    }

    #[test]
    fn test_logger_without_sink_drops_records() {
        let logger = BootLogger::<BufferSink<16>>::new();
        let metadata = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&metadata));
        logger.log(&Record::builder().level(Level::Error).args(format_args!("lost")).build());
        assert!(logger.with_sink(|_| ()).is_none());
        assert!(logger.take().is_none());
    }

    #[test]
    fn test_logger_filters_by_level() {
        let logger = BootLogger::<BufferSink<64>>::new();
        logger.attach(BufferSink::new(), LevelFilter::Info);
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("test")
                .args(format_args!("msr SCTLR_EL1"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .target("test")
                .args(format_args!("halt"))
                .build(),
        );
        let sink = logger.take().unwrap();
        assert_eq!(sink.as_bytes(), b"[ERROR] test: halt\n");
    }
}

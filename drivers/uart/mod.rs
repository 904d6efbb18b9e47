//! Boot console output
//!
//! The early kernel writes text one byte at a time. [`ByteSink`] is that
//! interface; [`MmioByteSink`] drives a UART data register, [`BufferSink`]
//! captures output in memory, and [`SinkWriter`] adapts either to
//! [`core::fmt::Write`].

use core::fmt;
use core::ptr::NonNull;

use heapless::Vec;
use volatile::VolatilePtr;

/// Byte-at-a-time output
pub trait ByteSink {
    /// Emit one byte. Output is best effort and never fails.
    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }
}

/// Single memory-mapped transmit register, such as the PL011 `UARTDR`
#[derive(Debug)]
pub struct MmioByteSink {
    data: NonNull<u8>,
}

// SAFETY: the sink only performs volatile stores to a device register; the
// register has no memory that another thread could observe torn.
unsafe impl Send for MmioByteSink {}

impl MmioByteSink {
    /// Create a sink writing to `addr`.
    ///
    /// Returns `None` for a null address.
    ///
    /// # Safety
    /// `addr` must be a mapped, writable device byte register for as long as
    /// the sink exists, and nothing else may write to it concurrently.
    pub unsafe fn new(addr: usize) -> Option<Self> {
        NonNull::new(addr as *mut u8).map(|data| Self { data })
    }

    /// Address of the data register
    pub fn addr(&self) -> usize {
        self.data.as_ptr() as usize
    }
}

impl ByteSink for MmioByteSink {
    #[inline]
    fn write_byte(&mut self, byte: u8) {
        // SAFETY: validity of the register is the constructor's contract.
        unsafe { VolatilePtr::new(self.data) }.write(byte);
    }
}

/// In-memory sink, bytes past the capacity are dropped
#[derive(Debug, Clone, Default)]
pub struct BufferSink<const N: usize> {
    buf: Vec<u8, N>,
    dropped: usize,
}

impl<const N: usize> BufferSink<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            dropped: 0,
        }
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Output as text, `None` if it is not valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.buf).ok()
    }

    /// Number of bytes that did not fit
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.dropped = 0;
    }
}

impl<const N: usize> ByteSink for BufferSink<N> {
    fn write_byte(&mut self, byte: u8) {
        if self.buf.push(byte).is_err() {
            self.dropped += 1;
        }
    }
}

/// [`fmt::Write`] over a [`ByteSink`]
#[derive(Debug)]
pub struct SinkWriter<S> {
    sink: S,
}

impl<S: ByteSink> SinkWriter<S> {
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: ByteSink> fmt::Write for SinkWriter<S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sink.write_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_buffer_sink_collects_bytes() {
        let mut sink = BufferSink::<16>::new();
        sink.write_str("EL");
        sink.write_byte(b'1');
        assert_eq!(sink.as_bytes(), b"EL1");
        assert_eq!(sink.as_str(), Some("EL1"));
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn test_buffer_sink_drops_overflow() {
        let mut sink = BufferSink::<4>::new();
        sink.write_str("BHARMOS");
        assert_eq!(sink.as_bytes(), b"BHAR");
        assert_eq!(sink.dropped(), 3);

        sink.clear();
        assert!(sink.as_bytes().is_empty());
        assert_eq!(sink.dropped(), 0);
    }

    #[test]
    fn test_mmio_sink_writes_each_byte() {
        let mut register = 0u8;
        let mut sink = unsafe { MmioByteSink::new(&mut register as *mut u8 as usize) }.unwrap();
        sink.write_byte(b'A');
        sink.write_byte(b'Z');
        assert_eq!(sink.addr(), &register as *const u8 as usize);
        drop(sink);
        assert_eq!(register, b'Z');
    }

    #[test]
    fn test_mmio_sink_rejects_null() {
        assert!(unsafe { MmioByteSink::new(0) }.is_none());
    }

    #[test]
    fn test_sink_writer_formats() {
        let mut writer = SinkWriter::new(BufferSink::<32>::new());
        writeln!(writer, "Current EL: {}", 2).unwrap();
        assert_eq!(writer.sink().as_bytes(), b"Current EL: 2\n");
    }

    #[test]
    fn test_sink_through_mut_ref() {
        let mut sink = BufferSink::<8>::new();
        let mut writer = SinkWriter::new(&mut sink);
        writer.write_str("ok").unwrap();
        drop(writer);
        assert_eq!(sink.as_bytes(), b"ok");
    }
}

//! Byte transports the bridge reads from and writes to.

/// Write side of a transport. Writes are fire-and-forget: bytes the
/// transport cannot take right now are dropped.
pub trait Sink {
    /// Queue `data` for transmission.
    fn write(&mut self, data: &[u8]);
}

/// A logical channel to the host, which may be closed.
pub trait Channel: Sink {
    /// `true` while the host listens on this channel.
    fn is_open(&self) -> bool;

    /// Called once per loop iteration before any data is handled.
    fn refresh(&mut self) {}
}

/// Read side of a transport.
pub trait Source {
    /// Number of bytes that can be read without waiting.
    fn readable(&self) -> usize;

    /// Read up to `buf.len()` bytes, never blocks. Returns `0` when
    /// nothing is pending.
    fn read(&mut self, buf: &mut [u8]) -> usize;
}

/// A [`Sink`] writing to a UART through [`embedded_io::Write`].
pub struct UartSink<W> {
    port: W,
}

impl<W: embedded_io::Write> UartSink<W> {
    /// Wraps a UART transmitter.
    pub fn new(port: W) -> Self {
        Self { port }
    }

    /// Underlying transmitter.
    pub fn port(&mut self) -> &mut W {
        &mut self.port
    }

    /// Returns the wrapped transmitter.
    pub fn release(self) -> W {
        self.port
    }
}

impl<W: embedded_io::Write> Sink for UartSink<W> {
    fn write(&mut self, data: &[u8]) {
        use embedded_io::Error;

        if let Err(e) = self.port.write_all(data) {
            log::warn!("uart: dropped {} bytes ({:?})", data.len(), e.kind());
        }
    }
}

//! Output of decoded frames and diagnostics.

use crate::frame::{Frame, FrameError};
use crate::io::{Channel, Sink};

/// Sent to the logical channels after an echoed payload.
pub const ACK: &[u8] = b"\nOK\n";

/// Sent to the UART after a forwarded payload.
pub const UART_EOL: &[u8] = b"\n";

/// Route a decode result.
///
/// A frame is echoed with [`ACK`] to `primary` and every mirror that is
/// open, and forwarded with [`UART_EOL`] to `uart` unconditionally. A
/// rejected line produces its diagnostic on the open channels only.
pub fn on_frame(
    result: Result<Frame<'_>, FrameError>,
    primary: &mut dyn Channel,
    mirrors: &mut [&mut dyn Channel],
    uart: &mut dyn Sink,
) {
    match result {
        Ok(frame) => {
            log::debug!("frame: {} bytes", frame.header_length);
            broadcast(primary, mirrors, frame.payload);
            broadcast(primary, mirrors, ACK);

            uart.write(frame.payload);
            uart.write(UART_EOL);
        }
        Err(e) => {
            log::warn!("line rejected: {}", e);
            broadcast(primary, mirrors, e.diagnostic());
        }
    }
}

/// Write `data` to every open channel.
pub fn broadcast(primary: &mut dyn Channel, mirrors: &mut [&mut dyn Channel], data: &[u8]) {
    if primary.is_open() {
        primary.write(data);
    }
    for mirror in mirrors.iter_mut() {
        if mirror.is_open() {
            mirror.write(data);
        }
    }
}

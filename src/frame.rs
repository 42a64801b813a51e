//! Frame header parsing.
//!
//! A frame is one line of the form
//!
//! ```text
//! #xxxx#ssssssssss\n
//! #                    -> header start
//!  xxxx                -> payload length N, 4 hex digits, at least 1
//!      #               -> header end
//!       ssssssssss     -> payload, N bytes
//!                 \n   -> terminator, stripped by the line assembler
//! ```

use core::fmt;

/// Header delimiter, found at offsets `0` and `5`.
pub const DELIMITER: u8 = b'#';

/// Length of `#xxxx#`.
pub const HEADER_LEN: usize = 6;

/// Shortest line that can hold a frame: the header and one payload byte.
pub const MIN_LINE_LEN: usize = HEADER_LEN + 1;

/// A decoded frame, borrowed from the receive buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Payload length announced by the header.
    pub header_length: u32,
    /// Exactly `header_length` bytes following the header.
    pub payload: &'a [u8],
}

/// Reasons a line is rejected. Every variant is recoverable: the line is
/// dropped and the receiver is ready for the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Line is shorter than [`MIN_LINE_LEN`].
    LineTooShort,
    /// `#` missing at offset 0 or 5.
    InvalidFormat,
    /// Header is not 4 hex digits, or announces 0 bytes.
    InvalidHeader,
    /// Fewer payload bytes than the header announces.
    PayloadTruncated,
    /// Receive buffer filled up before a terminator arrived.
    TooLong,
}

impl FrameError {
    /// Diagnostic line sent back to the host.
    pub fn diagnostic(&self) -> &'static [u8] {
        match self {
            FrameError::LineTooShort => b"FAIL too short\n",
            FrameError::InvalidFormat => b"FAIL invalid format\n",
            FrameError::InvalidHeader => b"FAIL invalid header byte count\n",
            FrameError::PayloadTruncated => b"FAIL shorter than specified\n",
            FrameError::TooLong => b"FAIL too long\n",
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FrameError::LineTooShort => "line too short",
            FrameError::InvalidFormat => "invalid format",
            FrameError::InvalidHeader => "invalid header byte count",
            FrameError::PayloadTruncated => "payload shorter than specified",
            FrameError::TooLong => "line too long",
        };
        f.write_str(text)
    }
}

/// Decode one line (terminator already stripped).
///
/// Bytes past the announced payload length are ignored.
pub fn decode(line: &[u8]) -> Result<Frame<'_>, FrameError> {
    if line.len() < MIN_LINE_LEN {
        return Err(FrameError::LineTooShort);
    }

    if line[0] != DELIMITER || line[HEADER_LEN - 1] != DELIMITER {
        return Err(FrameError::InvalidFormat);
    }

    let header_length = header_bytecount(&line[1..HEADER_LEN - 1])?;

    let end = HEADER_LEN + header_length as usize;
    if end > line.len() {
        return Err(FrameError::PayloadTruncated);
    }

    Ok(Frame {
        header_length,
        payload: &line[HEADER_LEN..end],
    })
}

// Big-endian hex, case-insensitive.
fn header_bytecount(digits: &[u8]) -> Result<u32, FrameError> {
    let mut value = 0u32;
    for &c in digits {
        let d = (c as char)
            .to_digit(16)
            .ok_or(FrameError::InvalidHeader)?;
        value = (value << 4) | d;
    }

    if value == 0 {
        return Err(FrameError::InvalidHeader);
    }
    Ok(value)
}

/// Build the `#xxxx#` header for a payload of `len` bytes.
pub fn encode_header(len: u16) -> [u8; HEADER_LEN] {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    [
        DELIMITER,
        HEX[(len >> 12) as usize & 0xf],
        HEX[(len >> 8) as usize & 0xf],
        HEX[(len >> 4) as usize & 0xf],
        HEX[len as usize & 0xf],
        DELIMITER,
    ]
}

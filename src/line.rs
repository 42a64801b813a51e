//! Line assembly from non-blocking reads.

use core::cmp::min;
use core::ops::Range;

/// Default receive buffer size.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Line terminator.
pub const TERMINATOR: u8 = b'\n';

/// What happens to bytes that arrive in the same read as a terminator,
/// after it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Trailing {
    /// Drop them. A host that batches several lines into one transfer
    /// loses everything after the first line; matches deployed devices.
    #[default]
    Discard,
    /// Keep them as the start of the next line. They are scanned on the
    /// next [`commit()`](LineAssembler::commit), one line per call.
    Retain,
}

/// Result of appending bytes to the assembler.
#[derive(Debug, PartialEq, Eq)]
pub enum Assembly<'a> {
    /// No terminator yet, bytes are kept for the next read.
    Pending,
    /// A complete line, terminator excluded. The buffer is already reset,
    /// the slice stays valid until the assembler is touched again.
    Line(&'a [u8]),
    /// Buffer filled up without a terminator, everything was discarded.
    Overflow,
}

/// Accumulates bytes until a [`TERMINATOR`] is seen.
///
/// Bytes are either copied in with [`feed()`](LineAssembler::feed), or read
/// straight into [`spare()`](LineAssembler::spare) and then announced with
/// [`commit()`](LineAssembler::commit).
pub struct LineAssembler<const N: usize = DEFAULT_CAPACITY> {
    buf: [u8; N],
    len: usize,
    // [0, scanned) is known to hold no terminator
    scanned: usize,
    // retained bytes of the previous read, still at their old position
    carry: Range<usize>,
    trailing: Trailing,
}

impl<const N: usize> LineAssembler<N> {
    /// Creates an empty assembler.
    pub const fn new(trailing: Trailing) -> Self {
        Self {
            buf: [0; N],
            len: 0,
            scanned: 0,
            carry: 0..0,
            trailing,
        }
    }

    /// Buffer capacity.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes held for the line being assembled.
    pub fn len(&self) -> usize {
        self.len + self.carry.len()
    }

    /// `true` if no partial line is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Trailing bytes policy.
    pub fn trailing(&self) -> Trailing {
        self.trailing
    }

    /// Free part of the buffer. Fill it, then call
    /// [`commit()`](LineAssembler::commit) with the number of bytes written.
    pub fn spare(&mut self) -> &mut [u8] {
        self.settle();
        &mut self.buf[self.len..]
    }

    /// Copy `data` into the buffer and look for a terminator.
    ///
    /// Bytes that do not fit into the remaining capacity are ignored.
    pub fn feed(&mut self, data: &[u8]) -> Assembly<'_> {
        let spare = self.spare();
        let count = min(data.len(), spare.len());
        spare[..count].copy_from_slice(&data[..count]);
        self.commit(count)
    }

    /// Account for `count` bytes written into [`spare()`](LineAssembler::spare)
    /// and look for a terminator in everything not scanned yet.
    pub fn commit(&mut self, count: usize) -> Assembly<'_> {
        self.settle();
        self.len = min(self.len + count, N);

        let end = self.len;
        let found = self.buf[self.scanned..end]
            .iter()
            .position(|&b| b == TERMINATOR)
            .map(|offset| self.scanned + offset);

        if let Some(pos) = found {
            self.len = 0;
            self.scanned = 0;
            if self.trailing == Trailing::Retain && pos + 1 < end {
                self.carry = pos + 1..end;
            }
            return Assembly::Line(&self.buf[..pos]);
        }

        if end >= N {
            self.reset();
            return Assembly::Overflow;
        }

        self.scanned = end;
        Assembly::Pending
    }

    /// Drop any partial line and retained bytes.
    pub fn reset(&mut self) {
        self.len = 0;
        self.scanned = 0;
        self.carry = 0..0;
    }

    // Move retained bytes to the front once the previous line is released.
    fn settle(&mut self) {
        if self.carry.is_empty() {
            return;
        }
        let carried = self.carry.len();
        self.buf.copy_within(self.carry.clone(), 0);
        self.carry = 0..0;
        self.len = carried;
        self.scanned = 0;
    }
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new(Trailing::default())
    }
}

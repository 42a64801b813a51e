#![allow(dead_code)]
use std::collections::VecDeque;

use usb_device::class::UsbClass;
use usbd_class_tester::prelude::*;
use winkdings::frame::encode_header;
use winkdings::line::Trailing;
use winkdings::{Board, Channel, Sink, Source};

/// In-memory logical channel. Reads return at most `max_read` bytes.
pub struct FakeChannel {
    pub open: bool,
    pub rx: VecDeque<u8>,
    pub written: Vec<u8>,
    pub max_read: usize,
    pub refreshed: usize,
}

impl FakeChannel {
    pub fn open() -> Self {
        Self {
            open: true,
            rx: VecDeque::new(),
            written: Vec::new(),
            max_read: usize::MAX,
            refreshed: 0,
        }
    }

    pub fn closed() -> Self {
        Self {
            open: false,
            ..Self::open()
        }
    }

    pub fn chunked(max_read: usize) -> Self {
        Self {
            max_read,
            ..Self::open()
        }
    }

    pub fn push(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }

    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written)
    }
}

impl Sink for FakeChannel {
    fn write(&mut self, data: &[u8]) {
        self.written.extend_from_slice(data);
    }
}

impl Channel for FakeChannel {
    fn is_open(&self) -> bool {
        self.open
    }

    fn refresh(&mut self) {
        self.refreshed += 1;
    }
}

impl Source for FakeChannel {
    fn readable(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let count = buf.len().min(self.max_read).min(self.rx.len());
        for (dst, src) in buf.iter_mut().zip(self.rx.drain(..count)) {
            *dst = src;
        }
        count
    }
}

#[derive(Default)]
pub struct FakeUart {
    pub written: Vec<u8>,
}

impl Sink for FakeUart {
    fn write(&mut self, data: &[u8]) {
        self.written.extend_from_slice(data);
    }
}

/// Board with a settable clock that records every indicator write.
#[derive(Default)]
pub struct TestBoard {
    pub now: u64,
    pub led: Vec<bool>,
}

impl Board for TestBoard {
    fn now_millis(&self) -> u64 {
        self.now
    }

    fn set_indicator(&mut self, on: bool) {
        self.led.push(on);
    }
}

/// Same as [`TestBoard`], keeping bytes after a terminator.
#[derive(Default)]
pub struct RetainBoard {
    pub now: u64,
}

impl Board for RetainBoard {
    const GREETING: &'static str = "hi\n";
    const TRAILING: Trailing = Trailing::Retain;

    fn now_millis(&self) -> u64 {
        self.now
    }

    fn set_indicator(&mut self, _on: bool) {}
}

/// `#xxxx#` + payload + `\n`.
pub fn framed(payload: &[u8]) -> Vec<u8> {
    let mut line = encode_header(payload.len() as u16).to_vec();
    line.extend_from_slice(payload);
    line.push(b'\n');
    line
}

/// `len` printable bytes, never a terminator.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

/// What an open logical channel receives for an accepted payload.
pub fn echoed(payload: &[u8]) -> Vec<u8> {
    let mut out = payload.to_vec();
    out.extend_from_slice(b"\nOK\n");
    out
}

pub trait DeviceExt<C> {
    fn write(
        &mut self,
        cls: &mut C,
        req: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> AnyResult<Vec<u8>>;

    fn set_line_state(&mut self, cls: &mut C, value: u16, index: u16) -> AnyResult<Vec<u8>>;
}

impl<'a, C, M> DeviceExt<C> for Device<'a, C, M>
where
    C: UsbClass<EmulatedUsbBus>,
    M: UsbDeviceCtx<C<'a> = C>,
{
    fn write(
        &mut self,
        cls: &mut C,
        req: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> AnyResult<Vec<u8>> {
        if data.len() > u16::MAX as usize {
            return Err(AnyUsbError::DataConversion);
        }
        self.control_write(
            cls,
            CtrRequestType::to_device().class().interface(),
            req,
            value,
            index,
            data.len() as u16,
            data,
        )
    }

    fn set_line_state(&mut self, cls: &mut C, value: u16, index: u16) -> AnyResult<Vec<u8>> {
        self.write(cls, 0x22, value, index, &[])
    }
}

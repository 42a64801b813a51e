#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
//!
//! Length-framed line bridge between a WebUSB serial channel, a CDC ACM
//! port and a UART, for a `usb-device` device.
//!
//! ## About
//!
//! A web page connects to the device over WebUSB and sends command lines.
//! Each line carries its own payload length:
//!
//! ```text
//! #0005#hello\n
//! ```
//!
//! `#`, four hex digits with the payload length, `#`, the payload and a
//! newline. A valid line is answered with the payload followed by
//! `"\nOK\n"` on every open logical channel (WebUSB and CDC), and the
//! payload followed by `"\n"` is written to the UART. An invalid line gets
//! a `FAIL ...` diagnostic on the open logical channels and nothing on the
//! UART. See [`frame`] for the exact rules.
//!
//! An indicator LED shows the USB state: fast blink while unmounted, slow
//! blink while mounted, very slow while suspended, steady on while a page
//! has the WebUSB channel open.
//!
//! The library is split into a transport-agnostic core and adapters:
//!
//! * [`Bridge`] - receive buffer, line parsing, dispatch, link state and
//!   the blink. It only sees the [`Sink`], [`Channel`] and [`Source`]
//!   traits and the [`Board`] trait.
//! * [`WebSerialClass`] - the vendor interface, a `usb-device` class.
//! * [`CdcChannel`] - a `usbd-serial` port used as a mirror channel.
//! * [`UartSink`] - any `embedded_io::Write` transmitter.
//! * [`LinkWatcher`] - turns `usb_dev.state()` changes into link events.
//!
//! ### Limitations
//!
//! * Only one line is handled per [`tick()`](Bridge::tick). By default
//! bytes that arrive after a newline in the same read are dropped, as
//! deployed hosts send one line per transfer. Set
//! [`Board::TRAILING`] to [`Trailing::Retain`] to keep them.
//!
//! * Lines longer than the receive buffer (1024 bytes by default) are
//! rejected with `FAIL too long`.
//!
//! * USB descriptors beyond the interfaces themselves (BOS, WebUSB landing
//! page, MS OS 2.0) are not provided.
//!
//! ## Example
//!
//! Controller initialization (clocks, GPIO, the USB peripheral and the
//! UART) is not in the scope of the example.
//!
//! ```ignore
//! use usb_device::prelude::*;
//! use winkdings::*;
//!
//! struct BluePill {
//!     led: Led,
//!     timer: MonoTimer,
//! }
//!
//! impl Board for BluePill {
//!     const GREETING: &'static str = "\r\nMy device\r\n";
//!
//!     fn now_millis(&self) -> u64 {
//!         self.timer.millis()
//!     }
//!
//!     fn set_indicator(&mut self, on: bool) {
//!         self.led.set(on);
//!     }
//! }
//!
//! let mut webserial = WebSerialClass::new(&usb_bus_alloc);
//! let mut cdc = CdcChannel::new(&usb_bus_alloc);
//! let mut usb_dev = UsbDeviceBuilder::new(&usb_bus_alloc, UsbVidPid(0xcafe, 0x4011))
//!     .composite_with_iads()
//!     .build();
//!
//! let mut uart = UartSink::new(tx);
//! let mut watcher = LinkWatcher::new();
//! let mut bridge: Bridge<BluePill> = Bridge::new(BluePill { led, timer });
//!
//! loop {
//!     usb_dev.poll(&mut [&mut webserial, &mut cdc]);
//!
//!     if let Some(event) = watcher.update(usb_dev.state()) {
//!         bridge.on_event(event, &mut webserial);
//!     }
//!     while let Some(event) = webserial.take_event() {
//!         bridge.on_event(event, &mut webserial);
//!     }
//!
//!     bridge.tick(&mut webserial, &mut [&mut cdc], &mut uart);
//! }
//! ```
//!

mod bridge;

pub mod cdc;
pub mod class;
pub mod dispatch;
pub mod frame;
pub mod io;
pub mod line;
pub mod link;
pub mod watch;

#[doc(inline)]
pub use crate::bridge::{Board, Bridge};
#[doc(inline)]
pub use crate::cdc::CdcChannel;
#[doc(inline)]
pub use crate::class::WebSerialClass;
#[doc(inline)]
pub use crate::frame::{Frame, FrameError};
#[doc(inline)]
pub use crate::io::{Channel, Sink, Source, UartSink};
#[doc(inline)]
pub use crate::line::Trailing;
#[doc(inline)]
pub use crate::link::{BlinkInterval, LinkEvent, LinkState};
#[doc(inline)]
pub use crate::watch::LinkWatcher;

//! `usb-device` class for the WebUSB serial channel.

use heapless::Deque;
use usb_device::class_prelude::*;
use usb_device::UsbError;

use crate::io::{Channel, Sink, Source};
use crate::link::LinkEvent;

const USB_CLASS_VENDOR_SPECIFIC: u8 = 0xFF;
const USB_SUBCLASS_NONE: u8 = 0x00;
const USB_PROTOCOL_NONE: u8 = 0x00;

/// Same request code as CDC; WebUSB serial pages use it to connect and
/// disconnect. `wValue != 0` means connected.
pub const SET_CONTROL_LINE_STATE: u8 = 0x22;

/// Bulk endpoint packet size.
pub const MAX_PACKET_SIZE: usize = 64;

/// Host to device FIFO size.
pub const RX_FIFO_SIZE: usize = 256;

/// Device to host FIFO size.
pub const TX_FIFO_SIZE: usize = 512;

const EVENT_QUEUE_SIZE: usize = 4;

/// Vendor-specific interface carrying the WebUSB serial channel.
///
/// One bulk OUT and one bulk IN endpoint, buffered by byte FIFOs so that
/// [`Source::read()`] and [`Sink::write()`] never block. Connect and
/// disconnect requests from the host are queued as
/// [`LinkEvent::ChannelOpen`] and [`LinkEvent::ChannelClose`], collect
/// them with [`take_event()`](WebSerialClass::take_event) after each
/// `usb_dev.poll()`.
///
/// A transfer that ends on a full packet is closed with a zero-length
/// packet.
pub struct WebSerialClass<'a, B: UsbBus> {
    if_num: InterfaceNumber,
    read_ep: EndpointOut<'a, B>,
    write_ep: EndpointIn<'a, B>,
    connected: bool,
    rx: Deque<u8, RX_FIFO_SIZE>,
    tx: Deque<u8, TX_FIFO_SIZE>,
    // last packet was full, the host waits for a short one
    zlp: bool,
    events: Deque<LinkEvent, EVENT_QUEUE_SIZE>,
}

impl<B: UsbBus> UsbClass<B> for WebSerialClass<'_, B> {
    fn get_configuration_descriptors(
        &self,
        writer: &mut DescriptorWriter,
    ) -> usb_device::Result<()> {
        writer.interface(
            self.if_num,
            USB_CLASS_VENDOR_SPECIFIC,
            USB_SUBCLASS_NONE,
            USB_PROTOCOL_NONE,
        )?;
        writer.endpoint(&self.write_ep)?;
        writer.endpoint(&self.read_ep)?;

        Ok(())
    }

    // Handle a control request from the host.
    fn control_out(&mut self, xfer: ControlOut<B>) {
        let req = *xfer.request();

        if req.request_type != control::RequestType::Class {
            return;
        }

        if req.recipient != control::Recipient::Interface {
            return;
        }

        if req.index != u8::from(self.if_num) as u16 {
            return;
        }

        match req.request {
            SET_CONTROL_LINE_STATE => {
                self.set_connected(req.value != 0);
                xfer.accept().ok();
            }
            _ => {
                xfer.reject().ok();
            }
        }
    }

    fn endpoint_out(&mut self, addr: EndpointAddress) {
        if addr == self.read_ep.address() {
            self.fill_rx();
        }
    }

    fn endpoint_in_complete(&mut self, addr: EndpointAddress) {
        if addr == self.write_ep.address() {
            self.flush_tx();
        }
    }

    fn reset(&mut self) {
        // The watcher reports the unmount, no ChannelClose here.
        self.connected = false;
        self.rx.clear();
        self.tx.clear();
        self.zlp = false;
        self.events.clear();
    }

    fn poll(&mut self) {
        self.fill_rx();
        self.flush_tx();
    }
}

impl<'a, B: UsbBus> WebSerialClass<'a, B> {
    /// Allocates the interface and both endpoints.
    pub fn new(alloc: &'a UsbBusAllocator<B>) -> Self {
        Self {
            if_num: alloc.interface(),
            read_ep: alloc.bulk(MAX_PACKET_SIZE as u16),
            write_ep: alloc.bulk(MAX_PACKET_SIZE as u16),
            connected: false,
            rx: Deque::new(),
            tx: Deque::new(),
            zlp: false,
            events: Deque::new(),
        }
    }

    /// Interface number of the vendor interface.
    pub fn interface(&self) -> InterfaceNumber {
        self.if_num
    }

    /// `true` while the host has the channel open.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Oldest connect or disconnect notification not yet collected.
    pub fn take_event(&mut self) -> Option<LinkEvent> {
        self.events.pop_front()
    }

    /// Bytes waiting to be sent to the host.
    pub fn pending_tx(&self) -> usize {
        self.tx.len()
    }

    /// `true` while a zero-length packet is owed to the host.
    pub fn zlp_pending(&self) -> bool {
        self.zlp
    }

    fn set_connected(&mut self, connected: bool) {
        log::debug!("webserial: line state {}", connected);
        self.connected = connected;

        let event = if connected {
            LinkEvent::ChannelOpen
        } else {
            LinkEvent::ChannelClose
        };
        if self.events.is_full() {
            self.events.pop_front();
        }
        self.events.push_back(event).ok();
    }

    // Move one packet from the OUT endpoint into the FIFO. Without room
    // for a full packet the endpoint keeps NAKing the host.
    fn fill_rx(&mut self) {
        if self.rx.capacity() - self.rx.len() < MAX_PACKET_SIZE {
            return;
        }

        let mut packet = [0u8; MAX_PACKET_SIZE];
        match self.read_ep.read(&mut packet) {
            Ok(count) => {
                log::trace!("webserial: rx {} bytes", count);
                for &b in &packet[..count] {
                    self.rx.push_back(b).ok();
                }
            }
            Err(UsbError::WouldBlock) => {}
            Err(e) => {
                log::warn!("webserial: read failed: {:?}", e);
            }
        }
    }

    // Hand the next packet to the IN endpoint if it is free.
    fn flush_tx(&mut self) {
        if self.tx.is_empty() {
            if self.zlp {
                match self.write_ep.write(&[]) {
                    Ok(_) => self.zlp = false,
                    Err(UsbError::WouldBlock) => {}
                    Err(e) => {
                        log::warn!("webserial: zlp failed: {:?}", e);
                        self.zlp = false;
                    }
                }
            }
            return;
        }

        let mut packet = [0u8; MAX_PACKET_SIZE];
        let mut count = 0;
        for (dst, &src) in packet.iter_mut().zip(self.tx.iter()) {
            *dst = src;
            count += 1;
        }

        match self.write_ep.write(&packet[..count]) {
            Ok(written) => {
                log::trace!("webserial: tx {} bytes", written);
                for _ in 0..written {
                    self.tx.pop_front();
                }
                self.zlp = written == MAX_PACKET_SIZE && self.tx.is_empty();
            }
            Err(UsbError::WouldBlock) => {}
            Err(e) => {
                log::warn!("webserial: write failed: {:?}", e);
            }
        }
    }
}

impl<B: UsbBus> Sink for WebSerialClass<'_, B> {
    fn write(&mut self, data: &[u8]) {
        let mut dropped = 0;
        for &b in data {
            if self.tx.push_back(b).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::warn!("webserial: tx full, dropped {} bytes", dropped);
        }
        self.flush_tx();
    }
}

impl<B: UsbBus> Channel for WebSerialClass<'_, B> {
    fn is_open(&self) -> bool {
        self.connected
    }
}

impl<B: UsbBus> Source for WebSerialClass<'_, B> {
    fn readable(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for dst in buf.iter_mut() {
            match self.rx.pop_front() {
                Some(b) => {
                    *dst = b;
                    count += 1;
                }
                None => break,
            }
        }
        self.fill_rx();
        count
    }
}

//! CDC ACM port as a mirror channel.

use usb_device::class_prelude::*;
use usb_device::UsbError;
use usbd_serial::SerialPort;

use crate::io::{Channel, Sink};

/// Default text written when a terminal opens the port.
pub const CDC_GREETING: &str = "\r\nWinkdings BluePill WebUSB device (CDC)\r\n";

/// A [`usbd_serial::SerialPort`] used as an output-only [`Channel`].
///
/// The port counts as open while the host asserts both DTR and RTS, which
/// is what terminal programs do on open. Data sent by the host is not
/// interpreted.
///
/// Pass it to `usb_dev.poll()` like any other class.
pub struct CdcChannel<'a, B: UsbBus> {
    serial: SerialPort<'a, B>,
    greeting: &'static str,
    open: bool,
}

impl<'a, B: UsbBus> CdcChannel<'a, B> {
    /// Allocates a CDC ACM port with the default greeting.
    pub fn new(alloc: &'a UsbBusAllocator<B>) -> Self {
        Self::with_greeting(alloc, CDC_GREETING)
    }

    /// Allocates a CDC ACM port that writes `greeting` when opened.
    pub fn with_greeting(alloc: &'a UsbBusAllocator<B>, greeting: &'static str) -> Self {
        Self {
            serial: SerialPort::new(alloc),
            greeting,
            open: false,
        }
    }

    /// Underlying port, e.g. to read the host's line coding.
    pub fn serial(&self) -> &SerialPort<'a, B> {
        &self.serial
    }
}

impl<B: UsbBus> UsbClass<B> for CdcChannel<'_, B> {
    fn get_configuration_descriptors(
        &self,
        writer: &mut DescriptorWriter,
    ) -> usb_device::Result<()> {
        self.serial.get_configuration_descriptors(writer)
    }

    fn reset(&mut self) {
        self.open = false;
        self.serial.reset();
    }

    fn poll(&mut self) {
        self.serial.poll();
    }

    fn control_in(&mut self, xfer: ControlIn<B>) {
        self.serial.control_in(xfer);
    }

    fn control_out(&mut self, xfer: ControlOut<B>) {
        self.serial.control_out(xfer);
    }

    fn endpoint_out(&mut self, addr: EndpointAddress) {
        self.serial.endpoint_out(addr);
    }

    fn endpoint_in_complete(&mut self, addr: EndpointAddress) {
        self.serial.endpoint_in_complete(addr);
    }
}

impl<B: UsbBus> Sink for CdcChannel<'_, B> {
    fn write(&mut self, data: &[u8]) {
        match self.serial.write(data) {
            Ok(written) if written < data.len() => {
                log::warn!("cdc: dropped {} bytes", data.len() - written);
            }
            Ok(_) | Err(UsbError::WouldBlock) => {}
            Err(e) => {
                log::warn!("cdc: write failed: {:?}", e);
            }
        }
    }
}

impl<B: UsbBus> Channel for CdcChannel<'_, B> {
    fn is_open(&self) -> bool {
        self.open
    }

    fn refresh(&mut self) {
        let open = self.serial.dtr() && self.serial.rts();
        if open && !self.open {
            log::debug!("cdc: opened");
            let greeting = self.greeting;
            self.write(greeting.as_bytes());
        }
        self.open = open;
    }
}

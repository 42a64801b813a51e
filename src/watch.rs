//! Link events from `usb-device` state changes.

use usb_device::device::UsbDeviceState;

use crate::link::LinkEvent;

/// Turns successive [`UsbDeviceState`] samples into [`LinkEvent`]s.
///
/// Feed it `usb_dev.state()` after every `usb_dev.poll()`.
#[derive(Clone, Copy, Debug)]
pub struct LinkWatcher {
    last: UsbDeviceState,
}

impl LinkWatcher {
    /// Starts from [`UsbDeviceState::Default`].
    pub const fn new() -> Self {
        Self {
            last: UsbDeviceState::Default,
        }
    }

    /// Last state seen.
    pub fn state(&self) -> UsbDeviceState {
        self.last
    }

    /// Record `state`, returning the event for the transition, if any.
    pub fn update(&mut self, state: UsbDeviceState) -> Option<LinkEvent> {
        let prev = self.last;
        if prev == state {
            return None;
        }
        self.last = state;

        match (prev, state) {
            (UsbDeviceState::Suspend, UsbDeviceState::Configured) => Some(LinkEvent::Resume),
            (_, UsbDeviceState::Configured) => Some(LinkEvent::Mount),
            (_, UsbDeviceState::Suspend) => Some(LinkEvent::Suspend),
            (
                UsbDeviceState::Configured | UsbDeviceState::Suspend,
                UsbDeviceState::Default | UsbDeviceState::Addressed,
            ) => Some(LinkEvent::Unmount),
            _ => None,
        }
    }
}

impl Default for LinkWatcher {
    fn default() -> Self {
        Self::new()
    }
}

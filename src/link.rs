//! USB link state and the indicator blink it drives.

/// Coarse USB session phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
    /// Not configured by a host.
    #[default]
    Unmounted,
    /// Configured, vendor channel closed.
    Mounted,
    /// Bus suspended.
    Suspended,
    /// Vendor channel opened by the host.
    ChannelOpen,
}

/// Notification from the USB side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// Device was configured.
    Mount,
    /// Device lost its configuration.
    Unmount,
    /// Bus was suspended.
    Suspend,
    /// Bus resumed after a suspend.
    Resume,
    /// Host opened the vendor channel.
    ChannelOpen,
    /// Host closed the vendor channel.
    ChannelClose,
}

impl LinkState {
    /// State after `event`. Every event is valid in every state.
    pub fn next(self, event: LinkEvent) -> LinkState {
        match event {
            LinkEvent::Mount | LinkEvent::Resume | LinkEvent::ChannelClose => LinkState::Mounted,
            LinkEvent::Unmount => LinkState::Unmounted,
            LinkEvent::Suspend => LinkState::Suspended,
            LinkEvent::ChannelOpen => LinkState::ChannelOpen,
        }
    }

    /// Indicator behaviour for this state.
    pub fn blink_interval(self, timings: &BlinkTimings) -> BlinkInterval {
        match self {
            LinkState::Unmounted => BlinkInterval::Period(timings.unmounted_ms),
            LinkState::Mounted => BlinkInterval::Period(timings.mounted_ms),
            LinkState::Suspended => BlinkInterval::Period(timings.suspended_ms),
            LinkState::ChannelOpen => BlinkInterval::AlwaysOn,
        }
    }
}

/// How the indicator behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlinkInterval {
    /// Toggle every given number of milliseconds. `0` holds the level.
    Period(u32),
    /// Held on, never toggled.
    AlwaysOn,
}

impl BlinkInterval {
    /// `true` if the blink task leaves the level alone.
    pub fn is_fixed(&self) -> bool {
        matches!(self, BlinkInterval::AlwaysOn | BlinkInterval::Period(0))
    }
}

/// Blink periods, in milliseconds, per [`LinkState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlinkTimings {
    /// Period while unmounted.
    pub unmounted_ms: u32,
    /// Period while mounted with the vendor channel closed.
    pub mounted_ms: u32,
    /// Period while the bus is suspended.
    pub suspended_ms: u32,
}

impl BlinkTimings {
    /// 100 ms unmounted, 500 ms mounted, 2500 ms suspended.
    pub const DEFAULT: BlinkTimings = BlinkTimings {
        unmounted_ms: 100,
        mounted_ms: 500,
        suspended_ms: 2500,
    };
}

impl Default for BlinkTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Periodic indicator toggling.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blinker {
    last_toggle: u64,
    level: bool,
    held: bool,
}

impl Blinker {
    /// Indicator off, first toggle one period after time `0`.
    pub const fn new() -> Self {
        Self {
            last_toggle: 0,
            level: false,
            held: false,
        }
    }

    /// Current level.
    pub fn level(&self) -> bool {
        self.level
    }

    /// Timestamp of the last toggle.
    pub fn last_toggle(&self) -> u64 {
        self.last_toggle
    }

    /// Set the level from outside, e.g. when the indicator is forced on.
    ///
    /// The level is held until the next periodic update, which restarts
    /// the blink one full period later.
    pub fn force(&mut self, level: bool) {
        self.level = level;
        self.held = true;
    }

    /// Run once per loop iteration. Returns the new level when it changed.
    ///
    /// The toggle timestamp advances by whole periods so the blink keeps
    /// its phase even if iterations are late.
    pub fn update(&mut self, now_ms: u64, interval: BlinkInterval) -> Option<bool> {
        let period = match interval {
            BlinkInterval::Period(ms) if ms > 0 => ms as u64,
            _ => {
                self.held = true;
                return None;
            }
        };

        if self.held {
            self.held = false;
            self.last_toggle = now_ms;
        }

        if now_ms.wrapping_sub(self.last_toggle) < period {
            return None;
        }
        self.last_toggle = self.last_toggle.wrapping_add(period);
        self.level = !self.level;
        Some(self.level)
    }
}

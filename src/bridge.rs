use crate::dispatch;
use crate::frame::{self, FrameError};
use crate::io::{Channel, Sink, Source};
use crate::line::{Assembly, LineAssembler, Trailing, DEFAULT_CAPACITY};
use crate::link::{BlinkInterval, BlinkTimings, Blinker, LinkEvent, LinkState};

/// Board services used by [`Bridge`], and its compile-time settings.
///
/// [`Bridge`] calls the functions from [`tick()`](Bridge::tick) and
/// [`on_event()`](Bridge::on_event), never from an interrupt.
pub trait Board {
    /// Written to the vendor channel when the host opens it.
    const GREETING: &'static str = "\r\nWinkdings BluePill WebUSB device\r\n";

    /// Indicator blink periods. Default is 100/500/2500 ms for
    /// unmounted/mounted/suspended.
    const BLINK: BlinkTimings = BlinkTimings::DEFAULT;

    /// What to do with bytes that follow a terminator in the same read.
    /// Default is [`Trailing::Discard`].
    ///
    /// Hosts that send one line per transfer see no difference.
    const TRAILING: Trailing = Trailing::Discard;

    /// Monotonic time in milliseconds.
    fn now_millis(&self) -> u64;

    /// Drive the indicator.
    fn set_indicator(&mut self, on: bool);
}

/// Receives framed lines from the vendor channel and routes them.
///
/// Owns the receive buffer, the link state and the blink state. Nothing
/// here is shared, the caller's loop holds the only `&mut`.
pub struct Bridge<B: Board, const N: usize = DEFAULT_CAPACITY> {
    board: B,
    link: LinkState,
    blinker: Blinker,
    assembler: LineAssembler<N>,
}

impl<B: Board, const N: usize> Bridge<B, N> {
    /// Creates a bridge in [`LinkState::Unmounted`].
    pub fn new(board: B) -> Self {
        Self {
            board,
            link: LinkState::Unmounted,
            blinker: Blinker::new(),
            assembler: LineAssembler::new(B::TRAILING),
        }
    }

    /// Current link state.
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// Current indicator behaviour.
    pub fn blink_interval(&self) -> BlinkInterval {
        self.link.blink_interval(&B::BLINK)
    }

    /// Last level written to the indicator.
    pub fn indicator(&self) -> bool {
        self.blinker.level()
    }

    /// Bytes of a partial line waiting for a terminator.
    pub fn pending(&self) -> usize {
        self.assembler.len()
    }

    /// Board reference.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Mutable board reference.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Returns the board.
    pub fn release(self) -> B {
        self.board
    }

    /// Apply a link notification.
    ///
    /// Opening the channel forces the indicator on and writes
    /// [`Board::GREETING`] to `vendor`.
    pub fn on_event(&mut self, event: LinkEvent, vendor: &mut dyn Sink) {
        let prev = self.link;
        self.link = prev.next(event);
        log::info!("link: {:?} -> {:?} ({:?})", prev, self.link, event);

        if event == LinkEvent::ChannelOpen {
            self.blinker.force(true);
            self.board.set_indicator(true);
            vendor.write(B::GREETING.as_bytes());
        }
    }

    /// One loop iteration: read from `vendor` if it is open, handle at most
    /// one line, then update the indicator.
    ///
    /// `mirrors` are the other logical channels, they get the same echo
    /// and diagnostics as `vendor`. `uart` gets accepted payloads only.
    pub fn tick<V>(
        &mut self,
        vendor: &mut V,
        mirrors: &mut [&mut dyn Channel],
        uart: &mut dyn Sink,
    ) where
        V: Source + Channel,
    {
        for mirror in mirrors.iter_mut() {
            mirror.refresh();
        }
        vendor.refresh();

        if vendor.is_open() {
            self.receive(vendor, mirrors, uart);
        }

        self.update_indicator();
    }

    fn receive<V>(
        &mut self,
        vendor: &mut V,
        mirrors: &mut [&mut dyn Channel],
        uart: &mut dyn Sink,
    ) where
        V: Source + Channel,
    {
        let count = if vendor.readable() > 0 {
            vendor.read(self.assembler.spare())
        } else {
            0
        };

        let mut overflow = false;
        match self.assembler.commit(count) {
            Assembly::Pending => {}
            Assembly::Line(line) if line.is_empty() => {
                log::trace!("empty line ignored");
            }
            Assembly::Line(line) => {
                dispatch::on_frame(frame::decode(line), vendor, mirrors, uart);
            }
            Assembly::Overflow => overflow = true,
        }

        if overflow {
            // the rest of the oversized line is likely already queued
            let dropped = vendor.read(self.assembler.spare());
            log::trace!("overflow: drained {} bytes", dropped);
            dispatch::on_frame(Err(FrameError::TooLong), vendor, mirrors, uart);
        }
    }

    fn update_indicator(&mut self) {
        let now = self.board.now_millis();
        let interval = self.link.blink_interval(&B::BLINK);
        if let Some(level) = self.blinker.update(now, interval) {
            self.board.set_indicator(level);
        }
    }
}

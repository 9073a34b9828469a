//! Recording doubles for host tests.
//!
//! Pins, SPI bus, transport and delay all append to one shared [`EventLog`] so
//! tests can assert ordering across components (reset pulse vs. first command,
//! window setup vs. first pixel byte).

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, SpiBus};

use crate::framebuffer::Framebuffer;
use crate::st7789::{FlushStats, FrameSink};
use crate::transport::Transport;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    Spi(Vec<u8>),
    SpiFlush,
    Select(bool),
    DataMode(bool),
    Write(Vec<u8>),
    DelayMs(u32),
}

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self { Self::default() }

    pub fn push(
        &self,
        event: Event,
    ) {
        self.0.borrow_mut().push(event);
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Event> { core::mem::take(&mut *self.0.borrow_mut()) }
}

pub struct MockPin {
    name: &'static str,
    log: EventLog,
}

impl MockPin {
    pub fn new(
        name: &'static str,
        log: &EventLog,
    ) -> Self {
        Self { name, log: log.clone() }
    }
}

impl PinErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.name, true));
        Ok(())
    }
}

pub struct MockSpi {
    log: EventLog,
}

impl MockSpi {
    pub fn new(log: &EventLog) -> Self { Self { log: log.clone() } }
}

impl SpiErrorType for MockSpi {
    type Error = Infallible;
}

impl SpiBus for MockSpi {
    fn read(
        &mut self,
        words: &mut [u8],
    ) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(
        &mut self,
        words: &[u8],
    ) -> Result<(), Self::Error> {
        self.log.push(Event::Spi(words.to_vec()));
        Ok(())
    }

    fn transfer(
        &mut self,
        read: &mut [u8],
        write: &[u8],
    ) -> Result<(), Self::Error> {
        read.fill(0);
        self.log.push(Event::Spi(write.to_vec()));
        Ok(())
    }

    fn transfer_in_place(
        &mut self,
        words: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.log.push(Event::Spi(words.to_vec()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::SpiFlush);
        Ok(())
    }
}

/// Transport that records the framing calls instead of pin toggles.
pub struct RecordingTransport {
    log: EventLog,
}

impl RecordingTransport {
    pub fn new(log: &EventLog) -> Self { Self { log: log.clone() } }
}

impl Transport for RecordingTransport {
    fn select(
        &mut self,
        active: bool,
    ) {
        self.log.push(Event::Select(active));
    }

    fn set_data_mode(
        &mut self,
        is_data: bool,
    ) {
        self.log.push(Event::DataMode(is_data));
    }

    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        self.log.push(Event::Write(bytes.to_vec()));
    }
}

pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self { Self { log: log.clone() } }
}

impl DelayNs for MockDelay {
    fn delay_ns(
        &mut self,
        _ns: u32,
    ) {
    }

    fn delay_ms(
        &mut self,
        ms: u32,
    ) {
        self.log.push(Event::DelayMs(ms));
    }
}

/// Frame sink that keeps a copy of every flushed frame.
#[derive(Default)]
pub struct SnapshotSink {
    pub frames: Vec<Vec<Rgb565>>,
}

impl FrameSink for SnapshotSink {
    fn flush<const W: usize, const H: usize>(
        &mut self,
        fb: &Framebuffer<W, H>,
    ) -> FlushStats {
        self.frames.push(fb.pixels().to_vec());
        FlushStats { pixels: W * H, chunks: 1 }
    }
}

/// Pull out the command bytes (writes made while DC was low), in order.
pub fn commands(events: &[Event]) -> Vec<u8> {
    let mut data_mode = true;
    let mut out = Vec::new();
    for event in events {
        match event {
            Event::DataMode(is_data) => data_mode = *is_data,
            Event::Write(bytes) if !data_mode => out.extend_from_slice(bytes),
            _ => {}
        }
    }
    out
}

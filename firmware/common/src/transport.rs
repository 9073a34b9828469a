//! Byte transport between the panel driver and the LCD controller.
//!
//! The controller samples a data/command line (DC) and frames every burst with
//! an active-low chip-select (CS). The driver only needs three level-style
//! operations, so the seam is a tiny trait with two implementations:
//!
//! - [`SpiTransport`]: a hardware SPI peripheral plus CS/DC GPIOs
//! - [`BitBangTransport`]: four GPIOs clocked in software (MSB-first, mode 0)
//!
//! Link failures are not modeled. Bus and pin errors are discarded, the panel
//! is assumed wired and ready once initialized, and nothing above this layer
//! retries.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Command/data byte sink framed by chip-select.
pub trait Transport {
    /// Assert (`true`, line driven low) or release (`false`, line high) chip-select.
    fn select(
        &mut self,
        active: bool,
    );

    /// Drive the DC line: `true` for data bytes, `false` for command bytes.
    fn set_data_mode(
        &mut self,
        is_data: bool,
    );

    /// Shift bytes out in order. Chip-select is left as the caller set it.
    fn write(
        &mut self,
        bytes: &[u8],
    );
}

/// Set a pin level, ignoring the (infallible on every supported HAL) result.
#[inline]
fn drive<P: OutputPin>(
    pin: &mut P,
    high: bool,
) {
    if high {
        pin.set_high().ok();
    } else {
        pin.set_low().ok();
    }
}

// =============================================================================
// Hardware SPI
// =============================================================================

/// Transport over a hardware SPI bus with GPIO chip-select and DC lines.
pub struct SpiTransport<SPI, CS, DC> {
    spi: SPI,
    cs: CS,
    dc: DC,
}

impl<SPI, CS, DC> SpiTransport<SPI, CS, DC>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
{
    /// Wrap the bus and control pins. CS is released and DC set to data.
    pub fn new(
        spi: SPI,
        mut cs: CS,
        mut dc: DC,
    ) -> Self {
        drive(&mut cs, true);
        drive(&mut dc, true);
        Self { spi, cs, dc }
    }

    /// Give back the bus and pins.
    pub fn release(self) -> (SPI, CS, DC) { (self.spi, self.cs, self.dc) }
}

impl<SPI, CS, DC> Transport for SpiTransport<SPI, CS, DC>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
{
    fn select(
        &mut self,
        active: bool,
    ) {
        if !active {
            // Last byte must be on the wire before CS rises.
            self.spi.flush().ok();
        }
        drive(&mut self.cs, !active);
    }

    fn set_data_mode(
        &mut self,
        is_data: bool,
    ) {
        drive(&mut self.dc, is_data);
    }

    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        self.spi.write(bytes).ok();
    }
}

// =============================================================================
// Software (bit-banged) SPI
// =============================================================================

/// Transport that clocks bytes out on two GPIOs, for boards whose LCD pins are
/// not routed to a free SPI peripheral.
pub struct BitBangTransport<SCK, MOSI, CS, DC> {
    sck: SCK,
    mosi: MOSI,
    cs: CS,
    dc: DC,
}

impl<SCK, MOSI, CS, DC> BitBangTransport<SCK, MOSI, CS, DC>
where
    SCK: OutputPin,
    MOSI: OutputPin,
    CS: OutputPin,
    DC: OutputPin,
{
    /// Take the four lines. Clock idles low, CS released, DC set to data.
    pub fn new(
        mut sck: SCK,
        mut mosi: MOSI,
        mut cs: CS,
        mut dc: DC,
    ) -> Self {
        drive(&mut sck, false);
        drive(&mut mosi, false);
        drive(&mut cs, true);
        drive(&mut dc, true);
        Self { sck, mosi, cs, dc }
    }

    #[inline]
    fn write_byte(
        &mut self,
        byte: u8,
    ) {
        for bit in (0..8).rev() {
            drive(&mut self.mosi, (byte >> bit) & 0x01 != 0);
            drive(&mut self.sck, true);
            drive(&mut self.sck, false);
        }
    }
}

impl<SCK, MOSI, CS, DC> Transport for BitBangTransport<SCK, MOSI, CS, DC>
where
    SCK: OutputPin,
    MOSI: OutputPin,
    CS: OutputPin,
    DC: OutputPin,
{
    fn select(
        &mut self,
        active: bool,
    ) {
        drive(&mut self.cs, !active);
    }

    fn set_data_mode(
        &mut self,
        is_data: bool,
    ) {
        drive(&mut self.dc, is_data);
    }

    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Event, EventLog, MockPin, MockSpi};

    #[test]
    fn test_spi_transport_idles_released() {
        let log = EventLog::new();
        let _t = SpiTransport::new(MockSpi::new(&log), MockPin::new("cs", &log), MockPin::new("dc", &log));
        assert_eq!(log.take(), vec![Event::Pin("cs", true), Event::Pin("dc", true)]);
    }

    #[test]
    fn test_spi_transport_select_is_active_low() {
        let log = EventLog::new();
        let mut t = SpiTransport::new(MockSpi::new(&log), MockPin::new("cs", &log), MockPin::new("dc", &log));
        log.take();

        t.select(true);
        t.set_data_mode(false);
        t.write(&[0x2A]);
        t.select(false);

        assert_eq!(
            log.take(),
            vec![
                Event::Pin("cs", false),
                Event::Pin("dc", false),
                Event::Spi(vec![0x2A]),
                Event::SpiFlush,
                Event::Pin("cs", true),
            ]
        );
    }

    #[test]
    fn test_bitbang_transport_select_is_active_low() {
        let log = EventLog::new();
        let mut t = BitBangTransport::new(
            MockPin::new("sck", &log),
            MockPin::new("mosi", &log),
            MockPin::new("cs", &log),
            MockPin::new("dc", &log),
        );
        assert_eq!(
            log.take(),
            vec![Event::Pin("sck", false), Event::Pin("mosi", false), Event::Pin("cs", true), Event::Pin("dc", true)]
        );

        t.select(true);
        t.set_data_mode(false);
        t.set_data_mode(true);
        t.select(false);

        assert_eq!(
            log.take(),
            vec![Event::Pin("cs", false), Event::Pin("dc", false), Event::Pin("dc", true), Event::Pin("cs", true)]
        );
    }

    #[test]
    fn test_bitbang_clocks_msb_first() {
        let log = EventLog::new();
        let mut t = BitBangTransport::new(
            MockPin::new("sck", &log),
            MockPin::new("mosi", &log),
            MockPin::new("cs", &log),
            MockPin::new("dc", &log),
        );
        log.take();

        t.write(&[0b1010_0001]);

        let bits: Vec<bool> = log
            .take()
            .into_iter()
            .filter_map(|e| match e {
                Event::Pin("mosi", level) => Some(level),
                _ => None,
            })
            .collect();
        assert_eq!(bits, vec![true, false, true, false, false, false, false, true]);
    }

    #[test]
    fn test_bitbang_pulses_clock_once_per_bit() {
        let log = EventLog::new();
        let mut t = BitBangTransport::new(
            MockPin::new("sck", &log),
            MockPin::new("mosi", &log),
            MockPin::new("cs", &log),
            MockPin::new("dc", &log),
        );
        log.take();

        t.write(&[0xFF, 0x00]);

        let rising = log.take().into_iter().filter(|e| *e == Event::Pin("sck", true)).count();
        assert_eq!(rising, 16);
    }
}
